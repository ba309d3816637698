//! `/complaints`: customer complaints, communications and investigations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    UnderInvestigation,
    Resolved,
    Closed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: RecordId,
    pub complaint_number: String,
    pub customer_name: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub classification: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub batch_id: Option<RecordId>,
    #[serde(default)]
    pub non_conformance_id: Option<RecordId>,
    #[serde(with = "qms_core::timestamp")]
    pub complaint_date: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplaintFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub status: Option<ComplaintStatus>,
    pub classification: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplaintInput {
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_contact: Option<String>,
    pub description: String,
    pub classification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplaintUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplaintStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    pub id: RecordId,
    pub complaint_id: RecordId,
    /// `email`, `phone`, `letter`, ...
    pub channel: String,
    pub message: String,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub communication_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunicationInput {
    pub channel: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investigation {
    pub id: RecordId,
    pub complaint_id: RecordId,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub root_cause: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InvestigationInput {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investigator_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComplaintTrends {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub by_classification: Extra,
    #[serde(default)]
    pub series: Vec<TrendPoint>,
}

facade!(Complaints);

impl Complaints<'_> {
    pub async fn list(&self, filter: &ComplaintFilter) -> ClientResult<Page<Complaint>> {
        let request = ApiRequest::get("/complaints").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<Complaint> {
        self.client
            .send(ApiRequest::get(format!("/complaints/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create(&self, complaint: &ComplaintInput) -> ClientResult<Complaint> {
        let request = ApiRequest::post("/complaints").json(complaint)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, update: &ComplaintUpdate) -> ClientResult<Complaint> {
        let request = ApiRequest::put(format!("/complaints/{id}")).json(update)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn add_communication(
        &self,
        id: RecordId,
        communication: &CommunicationInput,
    ) -> ClientResult<Communication> {
        let request = ApiRequest::post(format!("/complaints/{id}/communications")).json(communication)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn record_investigation(
        &self,
        id: RecordId,
        investigation: &InvestigationInput,
    ) -> ClientResult<Investigation> {
        let request = ApiRequest::post(format!("/complaints/{id}/investigation")).json(investigation)?;
        self.client.send(request, Shape::Enveloped).await
    }

    /// `period` is a server-side bucket such as `month` or `week`.
    pub async fn trends(&self, period: &str) -> ClientResult<ComplaintTrends> {
        let request = ApiRequest::get("/complaints/trends").query(&serde_json::json!({ "period": period }))?;
        self.client.send(request, Shape::Enveloped).await
    }
}
