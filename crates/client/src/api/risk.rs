//! `/risk`: risk and opportunity register.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Risk,
    Opportunity,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub id: RecordId,
    pub risk_number: String,
    pub item_type: ItemType,
    pub title: String,
    pub category: String,
    pub status: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub likelihood: Option<String>,
    #[serde(default)]
    pub risk_score: Option<u32>,
    #[serde(default)]
    pub assigned_to: Option<RecordId>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub item_type: Option<ItemType>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub assigned_to: Option<RecordId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskInput {
    pub item_type: ItemType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigation_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RiskStats {
    #[serde(default)]
    pub total_risks: u64,
    #[serde(default)]
    pub total_opportunities: u64,
    #[serde(default)]
    pub high_severity: u64,
    #[serde(default)]
    pub overdue: u64,
    #[serde(default)]
    pub by_category: Extra,
    #[serde(default)]
    pub by_status: Extra,
}

facade!(Risks);

impl Risks<'_> {
    pub async fn list(&self, filter: &RiskFilter) -> ClientResult<Page<RiskItem>> {
        let request = ApiRequest::get("/risk").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<RiskItem> {
        self.client
            .send(ApiRequest::get(format!("/risk/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create(&self, item: &RiskInput) -> ClientResult<RiskItem> {
        let request = ApiRequest::post("/risk").json(item)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, item: &RiskInput) -> ClientResult<RiskItem> {
        let request = ApiRequest::put(format!("/risk/{id}")).json(item)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/risk/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn stats(&self) -> ClientResult<RiskStats> {
        self.client
            .send(ApiRequest::get("/risk/stats"), Shape::Enveloped)
            .await
    }
}
