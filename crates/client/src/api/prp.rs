//! `/prp`: prerequisite programmes, checklists and their follow-up actions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrpCategory {
    BuildingAndFacilities,
    CleaningAndSanitation,
    PestControl,
    StaffHygiene,
    WasteManagement,
    EquipmentCalibration,
    Maintenance,
    PersonnelTraining,
    SupplierControl,
    RecallProcedures,
    WaterQuality,
    AirQuality,
    Transportation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrpProgram {
    pub id: RecordId,
    pub program_code: String,
    pub name: String,
    pub category: PrpCategory,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub responsible_person: Option<RecordId>,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgramFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub category: Option<PrpCategory>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramInput {
    pub program_code: String,
    pub name: String,
    pub category: PrpCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_person: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: RecordId,
    pub program_id: RecordId,
    pub checklist_code: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub compliance_percentage: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItemResult {
    pub item_id: RecordId,
    pub response: String,
    pub is_compliant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub id: RecordId,
    pub program_id: RecordId,
    pub hazard_identified: String,
    #[serde(default)]
    pub risk_score: Option<u32>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessmentInput {
    pub program_id: RecordId,
    pub hazard_identified: String,
    pub likelihood_score: u8,
    pub severity_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_controls: Option<String>,
}

/// Corrective and preventive actions share one record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrpAction {
    pub id: RecordId,
    #[serde(default)]
    pub program_id: Option<RecordId>,
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub responsible_person: Option<RecordId>,
    #[serde(default)]
    pub target_completion_date: Option<NaiveDate>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrpActionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_id: Option<RecordId>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
    pub responsible_person: RecordId,
    pub target_completion_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub program_id: Option<RecordId>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PrpDashboard {
    #[serde(default)]
    pub total_programs: u64,
    #[serde(default)]
    pub active_programs: u64,
    #[serde(default)]
    pub overdue_checklists: u64,
    #[serde(default)]
    pub compliance_rate: f64,
    #[serde(default)]
    pub open_actions: u64,
}

facade!(Prp);

impl Prp<'_> {
    pub async fn programs(&self, filter: &ProgramFilter) -> ClientResult<Page<PrpProgram>> {
        let request = ApiRequest::get("/prp/programs").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn program(&self, id: RecordId) -> ClientResult<PrpProgram> {
        self.client
            .send(ApiRequest::get(format!("/prp/programs/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create_program(&self, program: &ProgramInput) -> ClientResult<PrpProgram> {
        let request = ApiRequest::post("/prp/programs").json(program)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update_program(&self, id: RecordId, program: &ProgramInput) -> ClientResult<PrpProgram> {
        let request = ApiRequest::put(format!("/prp/programs/{id}")).json(program)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn checklists(&self, program_id: RecordId, page: PageRequest) -> ClientResult<Page<Checklist>> {
        let request = ApiRequest::get(format!("/prp/programs/{program_id}/checklists")).query(&page)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn complete_checklist(
        &self,
        checklist_id: RecordId,
        results: &[ChecklistItemResult],
    ) -> ClientResult<Checklist> {
        let request = ApiRequest::post(format!("/prp/checklists/{checklist_id}/complete"))
            .json(&serde_json::json!({ "results": results }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn risk_assessments(&self, filter: &ActionFilter) -> ClientResult<Page<RiskAssessment>> {
        let request = ApiRequest::get("/prp/risk-assessments").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn create_risk_assessment(&self, assessment: &RiskAssessmentInput) -> ClientResult<RiskAssessment> {
        let request = ApiRequest::post("/prp/risk-assessments").json(assessment)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn corrective_actions(&self, filter: &ActionFilter) -> ClientResult<Page<PrpAction>> {
        let request = ApiRequest::get("/prp/corrective-actions").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn create_corrective_action(&self, action: &PrpActionInput) -> ClientResult<PrpAction> {
        let request = ApiRequest::post("/prp/corrective-actions").json(action)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn preventive_actions(&self, filter: &ActionFilter) -> ClientResult<Page<PrpAction>> {
        let request = ApiRequest::get("/prp/preventive-actions").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn create_preventive_action(&self, action: &PrpActionInput) -> ClientResult<PrpAction> {
        let request = ApiRequest::post("/prp/preventive-actions").json(action)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn dashboard(&self) -> ClientResult<PrpDashboard> {
        self.client
            .send(ApiRequest::get("/prp/dashboard"), Shape::Enveloped)
            .await
    }
}
