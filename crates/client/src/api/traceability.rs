//! `/traceability`: batches, one-up/one-down tracing and recalls.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::{ApiRequest, Blob};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchType {
    RawMilk,
    Additive,
    Culture,
    Packaging,
    FinalProduct,
    Intermediate,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    InProduction,
    Completed,
    Quarantined,
    Released,
    Recalled,
    Disposed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: RecordId,
    pub batch_number: String,
    pub batch_type: BatchType,
    pub status: BatchStatus,
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub supplier_id: Option<RecordId>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(with = "qms_core::timestamp")]
    pub production_date: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub batch_type: Option<BatchType>,
    pub status: Option<BatchStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchInput {
    pub batch_type: BatchType,
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parent_batch_ids: Vec<RecordId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BatchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
    /// Towards customers: what was made from this batch.
    Forward,
    /// Towards suppliers: what went into this batch.
    Backward,
}

impl TraceDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TraceDirection::Forward => "forward",
            TraceDirection::Backward => "backward",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceNode {
    pub batch_id: RecordId,
    pub batch_number: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub relationship_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceResult {
    pub starting_batch: Batch,
    #[serde(default)]
    pub trace_path: Vec<TraceNode>,
    #[serde(default)]
    pub depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallStatus {
    Draft,
    Initiated,
    InProgress,
    Completed,
    Cancelled,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recall {
    pub id: RecordId,
    pub recall_number: String,
    pub recall_type: String,
    pub status: RecallStatus,
    pub title: String,
    #[serde(default)]
    pub affected_products: Option<String>,
    #[serde(default)]
    pub total_quantity_affected: Option<f64>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub issue_discovered_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecallFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub status: Option<RecallStatus>,
    pub recall_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecallInput {
    /// `class_i`, `class_ii` or `class_iii`.
    pub recall_type: String,
    pub title: String,
    pub description: String,
    pub reason: String,
    pub hazard_description: Option<String>,
    pub batch_ids: Vec<RecordId>,
    pub assigned_to: RecordId,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceabilityReportRequest {
    pub starting_batch_id: RecordId,
    /// `full_trace`, `forward_trace` or `backward_trace`.
    pub report_type: String,
    pub trace_depth: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceabilityReport {
    pub id: RecordId,
    pub report_number: String,
    pub report_type: String,
    pub starting_batch_id: RecordId,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

facade!(Traceability);

impl Traceability<'_> {
    pub async fn batches(&self, filter: &BatchFilter) -> ClientResult<Page<Batch>> {
        let request = ApiRequest::get("/traceability/batches").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn batch(&self, id: RecordId) -> ClientResult<Batch> {
        self.client
            .send(ApiRequest::get(format!("/traceability/batches/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create_batch(&self, batch: &BatchInput) -> ClientResult<Batch> {
        let request = ApiRequest::post("/traceability/batches").json(batch)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update_batch(&self, id: RecordId, update: &BatchUpdate) -> ClientResult<Batch> {
        let request = ApiRequest::put(format!("/traceability/batches/{id}")).json(update)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn trace(&self, id: RecordId, direction: TraceDirection, depth: u32) -> ClientResult<TraceResult> {
        let request = ApiRequest::get(format!("/traceability/batches/{id}/trace/{}", direction.as_str()))
            .query(&serde_json::json!({ "depth": depth }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn recalls(&self, filter: &RecallFilter) -> ClientResult<Page<Recall>> {
        let request = ApiRequest::get("/traceability/recalls").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn recall(&self, id: RecordId) -> ClientResult<Recall> {
        self.client
            .send(ApiRequest::get(format!("/traceability/recalls/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create_recall(&self, recall: &RecallInput) -> ClientResult<Recall> {
        let request = ApiRequest::post("/traceability/recalls").json(recall)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update_recall_status(
        &self,
        id: RecordId,
        status: RecallStatus,
        notes: Option<&str>,
    ) -> ClientResult<Recall> {
        let request = ApiRequest::put(format!("/traceability/recalls/{id}/status"))
            .json(&serde_json::json!({ "status": status, "notes": notes }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn generate_report(&self, report: &TraceabilityReportRequest) -> ClientResult<TraceabilityReport> {
        let request = ApiRequest::post("/traceability/reports").json(report)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn export_report(&self, id: RecordId) -> ClientResult<Blob> {
        self.client
            .download(ApiRequest::get(format!("/traceability/reports/{id}/export")))
            .await
    }
}
