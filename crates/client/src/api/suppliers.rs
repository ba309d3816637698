//! `/suppliers`: supplier register, materials, evaluations and incoming
//! deliveries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::{ApiRequest, MultipartForm, Upload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierStatus {
    Active,
    Inactive,
    Suspended,
    Blacklisted,
    PendingApproval,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: RecordId,
    pub supplier_code: String,
    pub name: String,
    pub status: SupplierStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub next_evaluation_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SupplierFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub status: Option<SupplierStatus>,
    pub category: Option<String>,
    pub risk_level: Option<RiskLevel>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SupplierInput {
    pub supplier_code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: RecordId,
    pub material_code: String,
    pub name: String,
    pub supplier_id: RecordId,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub approval_status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterialFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub supplier_id: Option<RecordId>,
    pub search: Option<String>,
    pub allergens: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialInput {
    pub material_code: String,
    pub name: String,
    pub supplier_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub allergens: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: RecordId,
    pub supplier_id: RecordId,
    pub evaluation_date: NaiveDate,
    pub quality_score: f64,
    pub delivery_score: f64,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationInput {
    pub evaluation_period: String,
    pub quality_score: f64,
    pub delivery_score: f64,
    pub price_score: f64,
    pub communication_score: f64,
    pub technical_support_score: f64,
    pub hygiene_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Pending,
    Passed,
    Failed,
    Quarantined,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: RecordId,
    pub delivery_number: String,
    pub supplier_id: RecordId,
    pub material_id: RecordId,
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub batch_number: Option<String>,
    pub inspection_status: InspectionStatus,
    #[serde(with = "qms_core::timestamp")]
    pub delivery_date: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub supplier_id: Option<RecordId>,
    pub inspection_status: Option<InspectionStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryInput {
    pub delivery_number: String,
    pub supplier_id: RecordId,
    pub material_id: RecordId,
    pub quantity: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectionResult {
    pub inspection_status: InspectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierDocument {
    pub id: RecordId,
    pub supplier_id: RecordId,
    pub document_type: String,
    pub file_name: String,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierAlert {
    pub id: RecordId,
    #[serde(default)]
    pub supplier_id: Option<RecordId>,
    pub alert_type: String,
    pub severity: String,
    pub title: String,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub severity: Option<String>,
    pub is_resolved: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SupplierStats {
    #[serde(default)]
    pub total_suppliers: u64,
    #[serde(default)]
    pub active_suppliers: u64,
    #[serde(default)]
    pub overdue_evaluations: u64,
    #[serde(default)]
    pub high_risk_suppliers: u64,
    #[serde(default)]
    pub pending_inspections: u64,
    #[serde(default)]
    pub average_score: f64,
}

facade!(Suppliers);

impl Suppliers<'_> {
    pub async fn list(&self, filter: &SupplierFilter) -> ClientResult<Page<Supplier>> {
        let request = ApiRequest::get("/suppliers").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<Supplier> {
        self.client
            .send(ApiRequest::get(format!("/suppliers/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create(&self, supplier: &SupplierInput) -> ClientResult<Supplier> {
        let request = ApiRequest::post("/suppliers").json(supplier)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, supplier: &SupplierInput) -> ClientResult<Supplier> {
        let request = ApiRequest::put(format!("/suppliers/{id}")).json(supplier)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/suppliers/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn materials(&self, filter: &MaterialFilter) -> ClientResult<Page<Material>> {
        let request = ApiRequest::get("/suppliers/materials").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn create_material(&self, material: &MaterialInput) -> ClientResult<Material> {
        let request = ApiRequest::post("/suppliers/materials").json(material)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn evaluations(&self, supplier_id: RecordId) -> ClientResult<Vec<Evaluation>> {
        self.client
            .send(
                ApiRequest::get(format!("/suppliers/{supplier_id}/evaluations")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn create_evaluation(
        &self,
        supplier_id: RecordId,
        evaluation: &EvaluationInput,
    ) -> ClientResult<Evaluation> {
        let request = ApiRequest::post(format!("/suppliers/{supplier_id}/evaluations")).json(evaluation)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn deliveries(&self, filter: &DeliveryFilter) -> ClientResult<Page<Delivery>> {
        let request = ApiRequest::get("/suppliers/deliveries").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn register_delivery(&self, delivery: &DeliveryInput) -> ClientResult<Delivery> {
        let request = ApiRequest::post("/suppliers/deliveries").json(delivery)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn inspect_delivery(&self, id: RecordId, result: &InspectionResult) -> ClientResult<Delivery> {
        let request = ApiRequest::post(format!("/suppliers/deliveries/{id}/inspect")).json(result)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn upload_document(
        &self,
        supplier_id: RecordId,
        document_type: &str,
        expiry_date: Option<NaiveDate>,
        file: Upload,
    ) -> ClientResult<SupplierDocument> {
        let mut form = MultipartForm::new().text("document_type", document_type);
        if let Some(expiry) = expiry_date {
            form = form.text("expiry_date", expiry.to_string());
        }
        let request = ApiRequest::post(format!("/suppliers/{supplier_id}/documents"))
            .multipart(form.file("file", file));
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn alerts(&self, filter: &AlertFilter) -> ClientResult<Page<SupplierAlert>> {
        let request = ApiRequest::get("/suppliers/alerts").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn resolve_alert(&self, id: RecordId) -> ClientResult<SupplierAlert> {
        self.client
            .send(ApiRequest::post(format!("/suppliers/alerts/{id}/resolve")), Shape::Enveloped)
            .await
    }

    pub async fn stats(&self) -> ClientResult<SupplierStats> {
        self.client
            .send(ApiRequest::get("/suppliers/dashboard/stats"), Shape::Enveloped)
            .await
    }
}
