//! `/actions-log`: cross-module action tracker.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
    OnHold,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    Low,
    Medium,
    High,
    Critical,
    Urgent,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: RecordId,
    pub title: String,
    pub status: ActionStatus,
    pub priority: ActionPriority,
    /// Module that raised the action (`audit`, `nonconformance`, ...).
    #[serde(default)]
    pub action_source: Option<String>,
    #[serde(default)]
    pub source_id: Option<RecordId>,
    #[serde(default)]
    pub assigned_to: Option<RecordId>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress_percent: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub status: Option<ActionStatus>,
    pub priority: Option<ActionPriority>,
    pub assigned_to: Option<RecordId>,
    pub action_source: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: ActionPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ActionPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: RecordId,
    pub action_id: RecordId,
    pub update_type: String,
    pub description: String,
    #[serde(default)]
    pub progress_percent: Option<f64>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressInput {
    pub update_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionAnalytics {
    #[serde(default)]
    pub total_actions: u64,
    #[serde(default)]
    pub completed_actions: u64,
    #[serde(default)]
    pub overdue_actions: u64,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub by_source: Extra,
    #[serde(default)]
    pub by_priority: Extra,
}

facade!(ActionsLog);

impl ActionsLog<'_> {
    pub async fn list(&self, filter: &ActionFilter) -> ClientResult<Page<ActionRecord>> {
        let request = ApiRequest::get("/actions-log/actions").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<ActionRecord> {
        self.client
            .send(ApiRequest::get(format!("/actions-log/actions/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create(&self, action: &ActionInput) -> ClientResult<ActionRecord> {
        let request = ApiRequest::post("/actions-log/actions").json(action)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, update: &ActionUpdate) -> ClientResult<ActionRecord> {
        let request = ApiRequest::put(format!("/actions-log/actions/{id}")).json(update)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn add_progress(&self, id: RecordId, progress: &ProgressInput) -> ClientResult<ProgressEntry> {
        let request = ApiRequest::post(format!("/actions-log/actions/{id}/progress")).json(progress)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn analytics(&self) -> ClientResult<ActionAnalytics> {
        self.client
            .send(ApiRequest::get("/actions-log/analytics"), Shape::Enveloped)
            .await
    }
}
