//! `/dashboard`: cross-module analytics.
//!
//! Analytics endpoints may be missing on older backends. Their response types
//! implement [`Placeholder`] so a caller can render an empty widget instead of
//! an error:
//!
//! ```ignore
//! let stats = client.dashboard().stats().await.unwrap_or_else(|_| DashboardStats::placeholder());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

/// A render-safe stand-in for an analytics payload that could not be loaded.
pub trait Placeholder: Sized {
    fn placeholder() -> Self;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub pending_approvals: u64,
    #[serde(default)]
    pub open_non_conformances: u64,
    #[serde(default)]
    pub overdue_capas: u64,
    #[serde(default)]
    pub active_haccp_plans: u64,
    #[serde(default)]
    pub upcoming_audits: u64,
    #[serde(default)]
    pub training_compliance: f64,
    #[serde(default)]
    pub supplier_alerts: u64,
}

impl Placeholder for DashboardStats {
    fn placeholder() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: RecordId,
    pub action: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_id: Option<RecordId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(with = "qms_core::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleCompliance {
    pub module: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceMetrics {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub modules: Vec<ModuleCompliance>,
}

impl Placeholder for ComplianceMetrics {
    fn placeholder() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    #[serde(default)]
    pub non_conformances: u64,
    #[serde(default)]
    pub complaints: u64,
    #[serde(default)]
    pub audits: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub points: Vec<TrendPoint>,
}

impl Placeholder for Trends {
    fn placeholder() -> Self {
        Self::default()
    }
}

facade!(Dashboard);

impl Dashboard<'_> {
    pub async fn stats(&self) -> ClientResult<DashboardStats> {
        self.client
            .send(ApiRequest::get("/dashboard/stats"), Shape::Enveloped)
            .await
    }

    pub async fn recent_activity(&self, limit: Option<u32>) -> ClientResult<Vec<Activity>> {
        let request =
            ApiRequest::get("/dashboard/recent-activity").query(&serde_json::json!({ "limit": limit }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn compliance_metrics(&self, period: &str) -> ClientResult<ComplianceMetrics> {
        let request =
            ApiRequest::get("/dashboard/compliance-metrics").query(&serde_json::json!({ "period": period }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn trends(&self, period: &str) -> ClientResult<Trends> {
        let request = ApiRequest::get("/dashboard/trends").query(&serde_json::json!({ "period": period }))?;
        self.client.send(request, Shape::Enveloped).await
    }
}
