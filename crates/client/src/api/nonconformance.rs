//! `/nonconformance`: NC register, CAPA and root cause analysis.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NcStatus {
    Open,
    UnderInvestigation,
    RootCauseIdentified,
    CapaAssigned,
    InProgress,
    Completed,
    Verified,
    Closed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonConformanceRecord {
    pub id: RecordId,
    pub nc_number: String,
    pub title: String,
    pub status: NcStatus,
    pub severity: Severity,
    pub source: String,
    #[serde(default)]
    pub batch_reference: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<RecordId>,
    #[serde(default)]
    pub target_resolution_date: Option<NaiveDate>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub reported_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NcFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub status: Option<NcStatus>,
    pub severity: Option<Severity>,
    pub source: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NcInput {
    pub title: String,
    pub description: String,
    pub source: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_resolution_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NcUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NcStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capa {
    pub id: RecordId,
    pub non_conformance_id: RecordId,
    pub capa_number: String,
    pub title: String,
    pub action_type: String,
    pub status: String,
    pub responsible_person: RecordId,
    pub target_completion_date: NaiveDate,
    #[serde(default)]
    pub progress_percentage: Option<u8>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapaInput {
    pub title: String,
    pub description: String,
    /// `corrective` or `preventive`.
    pub action_type: String,
    pub responsible_person: RecordId,
    pub target_completion_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CapaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_completion_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapaVerification {
    pub verification_result: String,
    pub is_effective: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiveWhys {
    pub problem: String,
    pub whys: Vec<String>,
    pub root_cause: String,
}

/// Causes grouped by the 6M categories.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ishikawa {
    pub problem: String,
    pub man: Vec<String>,
    pub machine: Vec<String>,
    pub method: Vec<String>,
    pub material: Vec<String>,
    pub measurement: Vec<String>,
    pub environment: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RootCauseAnalysis {
    pub id: RecordId,
    pub non_conformance_id: RecordId,
    pub method: String,
    #[serde(default)]
    pub root_cause: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NcDashboard {
    #[serde(default)]
    pub total_non_conformances: u64,
    #[serde(default)]
    pub open_non_conformances: u64,
    #[serde(default)]
    pub overdue_capas: u64,
    #[serde(default)]
    pub by_severity: Extra,
    #[serde(default)]
    pub by_source: Extra,
}

facade!(NonConformance);

impl NonConformance<'_> {
    pub async fn list(&self, filter: &NcFilter) -> ClientResult<Page<NonConformanceRecord>> {
        let request = ApiRequest::get("/nonconformance").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<NonConformanceRecord> {
        self.client
            .send(ApiRequest::get(format!("/nonconformance/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create(&self, nc: &NcInput) -> ClientResult<NonConformanceRecord> {
        let request = ApiRequest::post("/nonconformance").json(nc)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, update: &NcUpdate) -> ClientResult<NonConformanceRecord> {
        let request = ApiRequest::put(format!("/nonconformance/{id}")).json(update)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn capas(&self, id: RecordId) -> ClientResult<Vec<Capa>> {
        self.client
            .send(ApiRequest::get(format!("/nonconformance/{id}/capas")), Shape::Enveloped)
            .await
    }

    pub async fn create_capa(&self, id: RecordId, capa: &CapaInput) -> ClientResult<Capa> {
        let request = ApiRequest::post(format!("/nonconformance/{id}/capas")).json(capa)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update_capa(&self, capa_id: RecordId, update: &CapaUpdate) -> ClientResult<Capa> {
        let request = ApiRequest::put(format!("/nonconformance/capas/{capa_id}")).json(update)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn verify_capa(&self, capa_id: RecordId, verification: &CapaVerification) -> ClientResult<Capa> {
        let request = ApiRequest::post(format!("/nonconformance/capas/{capa_id}/verify")).json(verification)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn five_whys(&self, id: RecordId, analysis: &FiveWhys) -> ClientResult<RootCauseAnalysis> {
        let request = ApiRequest::post(format!("/nonconformance/{id}/rca/five-whys")).json(analysis)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn ishikawa(&self, id: RecordId, analysis: &Ishikawa) -> ClientResult<RootCauseAnalysis> {
        let request = ApiRequest::post(format!("/nonconformance/{id}/rca/ishikawa")).json(analysis)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn dashboard(&self) -> ClientResult<NcDashboard> {
        self.client
            .send(ApiRequest::get("/nonconformance/dashboard"), Shape::Enveloped)
            .await
    }
}
