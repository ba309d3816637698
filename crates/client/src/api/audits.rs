//! `/audits`: audit programmes, schedules, checklists and findings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::{ApiRequest, Blob, MultipartForm, Upload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditType {
    Internal,
    External,
    Supplier,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Planned,
    InProgress,
    Completed,
    Closed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    pub id: RecordId,
    pub title: String,
    pub audit_type: AuditType,
    pub status: AuditStatus,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub program_id: Option<RecordId>,
    #[serde(default)]
    pub lead_auditor_id: Option<RecordId>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub audit_type: Option<AuditType>,
    pub status: Option<AuditStatus>,
    pub program_id: Option<RecordId>,
    pub auditor_id: Option<RecordId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditInput {
    pub title: String,
    pub audit_type: AuditType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_auditor_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_member_ids: Vec<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditProgram {
    pub id: RecordId,
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub objectives: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditProgramInput {
    pub name: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objectives: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: RecordId,
    pub audit_id: RecordId,
    pub description: String,
    /// `minor`, `major` or `critical`.
    pub severity: String,
    pub status: String,
    #[serde(default)]
    pub clause_ref: Option<String>,
    #[serde(default)]
    pub related_nc_id: Option<RecordId>,
    #[serde(default)]
    pub target_completion_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FindingInput {
    pub description: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrective_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_person_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_completion_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FindingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrective_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_completion_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: RecordId,
    pub audit_id: RecordId,
    pub question: String,
    #[serde(default)]
    pub clause_ref: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub is_conforming: Option<bool>,
    #[serde(default)]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChecklistItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_conforming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditPlan {
    pub audit_id: RecordId,
    #[serde(default)]
    pub agenda: Option<String>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConflictQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub auditor_ids: Vec<RecordId>,
    pub exclude_audit_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleConflict {
    pub audit_id: RecordId,
    #[serde(default)]
    pub auditor_id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuditAttachment {
    pub id: RecordId,
    pub audit_id: RecordId,
    pub filename: String,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

facade!(Audits);

impl Audits<'_> {
    pub async fn list(&self, filter: &AuditFilter) -> ClientResult<Page<Audit>> {
        let request = ApiRequest::get("/audits").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<Audit> {
        self.client
            .send(ApiRequest::get(format!("/audits/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create(&self, audit: &AuditInput) -> ClientResult<Audit> {
        let request = ApiRequest::post("/audits").json(audit)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, audit: &AuditInput) -> ClientResult<Audit> {
        let request = ApiRequest::put(format!("/audits/{id}")).json(audit)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/audits/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn programs(&self, page: PageRequest) -> ClientResult<Page<AuditProgram>> {
        let request = ApiRequest::get("/audits/programs").query(&page)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn create_program(&self, program: &AuditProgramInput) -> ClientResult<AuditProgram> {
        let request = ApiRequest::post("/audits/programs").json(program)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn findings(&self, audit_id: RecordId) -> ClientResult<Vec<Finding>> {
        self.client
            .send(ApiRequest::get(format!("/audits/{audit_id}/findings")), Shape::Enveloped)
            .await
    }

    pub async fn create_finding(&self, audit_id: RecordId, finding: &FindingInput) -> ClientResult<Finding> {
        let request = ApiRequest::post(format!("/audits/{audit_id}/findings")).json(finding)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update_finding(&self, finding_id: RecordId, update: &FindingUpdate) -> ClientResult<Finding> {
        let request = ApiRequest::put(format!("/audits/findings/{finding_id}")).json(update)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn checklist(&self, audit_id: RecordId) -> ClientResult<Vec<ChecklistItem>> {
        self.client
            .send(ApiRequest::get(format!("/audits/{audit_id}/checklist")), Shape::Enveloped)
            .await
    }

    pub async fn update_checklist_item(
        &self,
        item_id: RecordId,
        update: &ChecklistItemUpdate,
    ) -> ClientResult<ChecklistItem> {
        let request = ApiRequest::put(format!("/audits/checklist/{item_id}")).json(update)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn plan(&self, audit_id: RecordId) -> ClientResult<AuditPlan> {
        self.client
            .send(ApiRequest::get(format!("/audits/{audit_id}/plan")), Shape::Enveloped)
            .await
    }

    pub async fn schedule_conflicts(&self, query: &ConflictQuery) -> ClientResult<Vec<ScheduleConflict>> {
        let request = ApiRequest::get("/audits/schedule/conflicts").query(query)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn upload_attachment(&self, audit_id: RecordId, file: Upload) -> ClientResult<AuditAttachment> {
        let request = ApiRequest::post(format!("/audits/{audit_id}/attachments"))
            .multipart(MultipartForm::new().file("file", file));
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn export_report(&self, audit_id: RecordId) -> ClientResult<Blob> {
        self.client
            .download(ApiRequest::get(format!("/audits/{audit_id}/report")))
            .await
    }
}
