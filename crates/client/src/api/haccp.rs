//! `/haccp`: products, hazard analysis, CCPs and their monitoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::{ApiRequest, Blob};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaccpProduct {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub haccp_plan_approved: bool,
    #[serde(default)]
    pub haccp_plan_version: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_life: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardType {
    Biological,
    Chemical,
    Physical,
    Allergen,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: RecordId,
    pub product_id: RecordId,
    pub hazard_type: HazardType,
    pub hazard_name: String,
    #[serde(default)]
    pub likelihood: Option<u8>,
    #[serde(default)]
    pub severity: Option<u8>,
    #[serde(default)]
    pub risk_score: Option<u32>,
    #[serde(default)]
    pub is_ccp: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
pub struct HazardInput {
    pub hazard_type: HazardType,
    pub hazard_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub likelihood: u8,
    pub severity: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_measures: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_step_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ccp {
    pub id: RecordId,
    pub product_id: RecordId,
    #[serde(default)]
    pub hazard_id: Option<RecordId>,
    pub ccp_number: String,
    pub ccp_name: String,
    #[serde(default)]
    pub critical_limit_min: Option<f64>,
    #[serde(default)]
    pub critical_limit_max: Option<f64>,
    #[serde(default)]
    pub critical_limit_unit: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CcpInput {
    pub hazard_id: Option<RecordId>,
    pub ccp_number: String,
    pub ccp_name: String,
    pub critical_limit_min: Option<f64>,
    pub critical_limit_max: Option<f64>,
    pub critical_limit_unit: Option<String>,
    pub monitoring_frequency: Option<String>,
    pub corrective_actions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringLog {
    pub id: RecordId,
    pub ccp_id: RecordId,
    #[serde(default)]
    pub batch_number: Option<String>,
    pub measured_value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    pub is_within_limits: bool,
    #[serde(with = "qms_core::timestamp")]
    pub monitoring_time: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitoringInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    pub measured_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationLog {
    pub id: RecordId,
    pub ccp_id: RecordId,
    pub verification_method: String,
    pub is_compliant: bool,
    #[serde(default)]
    pub findings: Option<String>,
    #[serde(with = "qms_core::timestamp")]
    pub verification_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationInput {
    pub verification_method: String,
    pub is_compliant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub findings: Option<String>,
}

/// Codex decision tree answers, Q1 through Q4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionTreeAnswers {
    pub q1_control_measures: bool,
    pub q2_step_designed_to_eliminate: bool,
    pub q3_contamination_possible: bool,
    pub q4_subsequent_step_eliminates: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTreeResult {
    pub hazard_id: RecordId,
    pub is_ccp: bool,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub low_threshold: u32,
    pub medium_threshold: u32,
    pub high_threshold: u32,
    #[serde(default)]
    pub likelihood_scale: Option<u8>,
    #[serde(default)]
    pub severity_scale: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HaccpDashboard {
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub approved_plans: u64,
    #[serde(default)]
    pub total_ccps: u64,
    #[serde(default)]
    pub out_of_spec_count: u64,
    #[serde(default)]
    pub recent_logs: Vec<MonitoringLog>,
}

facade!(Haccp);

impl Haccp<'_> {
    pub async fn products(&self, filter: &ProductFilter) -> ClientResult<Page<HaccpProduct>> {
        let request = ApiRequest::get("/haccp/products").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn product(&self, id: RecordId) -> ClientResult<HaccpProduct> {
        self.client
            .send(ApiRequest::get(format!("/haccp/products/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create_product(&self, product: &ProductInput) -> ClientResult<HaccpProduct> {
        let request = ApiRequest::post("/haccp/products").json(product)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update_product(&self, id: RecordId, product: &ProductInput) -> ClientResult<HaccpProduct> {
        let request = ApiRequest::put(format!("/haccp/products/{id}")).json(product)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn delete_product(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/haccp/products/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn hazards(&self, product_id: RecordId) -> ClientResult<Vec<Hazard>> {
        self.client
            .send(
                ApiRequest::get(format!("/haccp/products/{product_id}/hazards")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn create_hazard(&self, product_id: RecordId, hazard: &HazardInput) -> ClientResult<Hazard> {
        let request = ApiRequest::post(format!("/haccp/products/{product_id}/hazards")).json(hazard)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update_hazard(&self, id: RecordId, hazard: &HazardInput) -> ClientResult<Hazard> {
        let request = ApiRequest::put(format!("/haccp/hazards/{id}")).json(hazard)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn delete_hazard(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/haccp/hazards/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn ccps(&self, product_id: RecordId) -> ClientResult<Vec<Ccp>> {
        self.client
            .send(
                ApiRequest::get(format!("/haccp/products/{product_id}/ccps")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn create_ccp(&self, product_id: RecordId, ccp: &CcpInput) -> ClientResult<Ccp> {
        let request = ApiRequest::post(format!("/haccp/products/{product_id}/ccps")).json(ccp)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn monitoring_logs(&self, ccp_id: RecordId, page: PageRequest) -> ClientResult<Page<MonitoringLog>> {
        let request = ApiRequest::get(format!("/haccp/ccps/{ccp_id}/monitoring-logs")).query(&page)?;
        self.client.send(request, Shape::Enveloped).await
    }

    /// The server evaluates the value against the critical limits and sets
    /// `is_within_limits`.
    pub async fn record_monitoring(&self, ccp_id: RecordId, log: &MonitoringInput) -> ClientResult<MonitoringLog> {
        let request = ApiRequest::post(format!("/haccp/ccps/{ccp_id}/monitoring-logs")).json(log)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn verification_logs(&self, ccp_id: RecordId) -> ClientResult<Vec<VerificationLog>> {
        self.client
            .send(
                ApiRequest::get(format!("/haccp/ccps/{ccp_id}/verification-logs")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn record_verification(
        &self,
        ccp_id: RecordId,
        log: &VerificationInput,
    ) -> ClientResult<VerificationLog> {
        let request = ApiRequest::post(format!("/haccp/ccps/{ccp_id}/verification-logs")).json(log)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn run_decision_tree(
        &self,
        hazard_id: RecordId,
        answers: &DecisionTreeAnswers,
    ) -> ClientResult<DecisionTreeResult> {
        let request = ApiRequest::post(format!("/haccp/hazards/{hazard_id}/decision-tree")).json(answers)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn risk_thresholds(&self, product_id: RecordId) -> ClientResult<RiskThresholds> {
        self.client
            .send(
                ApiRequest::get(format!("/haccp/products/{product_id}/risk-thresholds")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn update_risk_thresholds(
        &self,
        product_id: RecordId,
        thresholds: &RiskThresholds,
    ) -> ClientResult<RiskThresholds> {
        let request =
            ApiRequest::put(format!("/haccp/products/{product_id}/risk-thresholds")).json(thresholds)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn dashboard(&self) -> ClientResult<HaccpDashboard> {
        self.client
            .send(ApiRequest::get("/haccp/dashboard"), Shape::Enveloped)
            .await
    }

    pub async fn export_plan(&self, product_id: RecordId) -> ClientResult<Blob> {
        self.client
            .download(ApiRequest::get(format!("/haccp/products/{product_id}/export")))
            .await
    }
}
