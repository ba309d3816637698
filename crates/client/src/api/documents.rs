//! `/documents`: controlled documents, versions, approvals, distribution.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::{ApiRequest, Blob, MultipartForm, Upload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    UnderReview,
    Approved,
    Obsolete,
    Archived,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    pub status: DocumentStatus,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub department_id: Option<RecordId>,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<DocumentStatus>,
    pub document_type: Option<String>,
    pub department_id: Option<RecordId>,
}

/// Metadata sent alongside the file when creating a document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub document_number: Option<String>,
    pub category: Option<String>,
    pub document_type: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<RecordId>,
    pub review_date: Option<NaiveDate>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: RecordId,
    pub version_number: String,
    #[serde(default)]
    pub change_description: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub created_by: Option<RecordId>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentApproval {
    pub id: RecordId,
    pub approver_id: RecordId,
    pub approval_order: u32,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionRequest {
    pub user_ids: Vec<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Csv,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub pending_approvals: u64,
    #[serde(default)]
    pub expiring_soon: u64,
    #[serde(default)]
    pub by_status: Extra,
    #[serde(default)]
    pub by_category: Extra,
}

facade!(Documents);

impl Documents<'_> {
    pub async fn list(&self, filter: &DocumentFilter) -> ClientResult<Page<Document>> {
        let request = ApiRequest::get("/documents").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<Document> {
        self.client
            .send(ApiRequest::get(format!("/documents/{id}")), Shape::Enveloped)
            .await
    }

    /// Upload a new controlled document: metadata fields plus the `file` part.
    pub async fn create(&self, metadata: &DocumentMetadata, file: Upload) -> ClientResult<Document> {
        let form = MultipartForm::from_fields(metadata)?.file("file", file);
        let request = ApiRequest::post("/documents").multipart(form);
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, update: &DocumentUpdate) -> ClientResult<Document> {
        let request = ApiRequest::put(format!("/documents/{id}")).json(update)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/documents/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn versions(&self, id: RecordId) -> ClientResult<Vec<DocumentVersion>> {
        self.client
            .send(ApiRequest::get(format!("/documents/{id}/versions")), Shape::Enveloped)
            .await
    }

    pub async fn upload_version(
        &self,
        id: RecordId,
        change_description: &str,
        file: Upload,
    ) -> ClientResult<DocumentVersion> {
        let form = MultipartForm::new()
            .text("change_description", change_description)
            .file("file", file);
        let request = ApiRequest::post(format!("/documents/{id}/versions")).multipart(form);
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn approvals(&self, id: RecordId) -> ClientResult<Vec<DocumentApproval>> {
        self.client
            .send(ApiRequest::get(format!("/documents/{id}/approvals")), Shape::Enveloped)
            .await
    }

    /// Start the approval chain; approvers sign in the given order.
    pub async fn submit_for_approval(
        &self,
        id: RecordId,
        approver_ids: &[RecordId],
    ) -> ClientResult<Vec<DocumentApproval>> {
        let approvers: Vec<_> = approver_ids
            .iter()
            .enumerate()
            .map(|(i, approver_id)| serde_json::json!({ "approver_id": approver_id, "approval_order": i + 1 }))
            .collect();
        let request = ApiRequest::post(format!("/documents/{id}/approvals"))
            .json(&serde_json::json!({ "approvers": approvers }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn approve(
        &self,
        id: RecordId,
        approval_id: RecordId,
        comments: Option<&str>,
    ) -> ClientResult<DocumentApproval> {
        self.decide(id, approval_id, "approve", comments).await
    }

    pub async fn reject(
        &self,
        id: RecordId,
        approval_id: RecordId,
        comments: Option<&str>,
    ) -> ClientResult<DocumentApproval> {
        self.decide(id, approval_id, "reject", comments).await
    }

    async fn decide(
        &self,
        id: RecordId,
        approval_id: RecordId,
        decision: &str,
        comments: Option<&str>,
    ) -> ClientResult<DocumentApproval> {
        let request = ApiRequest::post(format!("/documents/{id}/approvals/{approval_id}/{decision}"))
            .json(&serde_json::json!({ "comments": comments }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn templates(&self) -> ClientResult<Vec<DocumentTemplate>> {
        self.client
            .send(ApiRequest::get("/documents/templates"), Shape::Enveloped)
            .await
    }

    pub async fn distribute(&self, id: RecordId, distribution: &DistributionRequest) -> ClientResult<()> {
        let request = ApiRequest::post(format!("/documents/{id}/distribute")).json(distribution)?;
        self.client.send_discard(request, Shape::Enveloped).await
    }

    pub async fn download(&self, id: RecordId) -> ClientResult<Blob> {
        self.client
            .download(ApiRequest::get(format!("/documents/{id}/download")))
            .await
    }

    pub async fn export(&self, filter: &DocumentFilter, format: ExportFormat) -> ClientResult<Blob> {
        let request = ApiRequest::get("/documents/export")
            .query(filter)?
            .query(&serde_json::json!({ "format": format }))?;
        self.client.download(request).await
    }

    pub async fn stats(&self) -> ClientResult<DocumentStats> {
        self.client
            .send(ApiRequest::get("/documents/stats"), Shape::Enveloped)
            .await
    }
}
