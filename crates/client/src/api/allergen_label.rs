//! `/allergen-label`: allergen risk assessments and label artwork control.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::{ApiRequest, MultipartForm, Upload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergenAssessment {
    pub id: RecordId,
    pub product_id: RecordId,
    #[serde(default)]
    pub allergens_present: Vec<String>,
    #[serde(default)]
    pub cross_contact_risks: Vec<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub precautionary_labeling: Option<String>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssessmentFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub product_id: Option<RecordId>,
    pub risk_level: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentInput {
    pub product_id: RecordId,
    pub allergens_present: Vec<String>,
    pub cross_contact_risks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precautionary_labeling: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_measures: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTemplate {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub product_id: Option<RecordId>,
    #[serde(default)]
    pub current_version: Option<u32>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelTemplateInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelVersion {
    pub id: RecordId,
    pub template_id: RecordId,
    pub version_number: u32,
    pub status: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub change_description: Option<String>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub approved_at: Option<DateTime<Utc>>,
}

facade!(AllergenLabel);

impl AllergenLabel<'_> {
    pub async fn assessments(&self, filter: &AssessmentFilter) -> ClientResult<Page<AllergenAssessment>> {
        let request = ApiRequest::get("/allergen-label/assessments").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn assessment(&self, id: RecordId) -> ClientResult<AllergenAssessment> {
        self.client
            .send(
                ApiRequest::get(format!("/allergen-label/assessments/{id}")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn create_assessment(&self, assessment: &AssessmentInput) -> ClientResult<AllergenAssessment> {
        let request = ApiRequest::post("/allergen-label/assessments").json(assessment)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update_assessment(
        &self,
        id: RecordId,
        assessment: &AssessmentInput,
    ) -> ClientResult<AllergenAssessment> {
        let request = ApiRequest::put(format!("/allergen-label/assessments/{id}")).json(assessment)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn templates(&self) -> ClientResult<Vec<LabelTemplate>> {
        self.client
            .send(ApiRequest::get("/allergen-label/templates"), Shape::Enveloped)
            .await
    }

    pub async fn create_template(&self, template: &LabelTemplateInput) -> ClientResult<LabelTemplate> {
        let request = ApiRequest::post("/allergen-label/templates").json(template)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn upload_label_version(
        &self,
        template_id: RecordId,
        change_description: Option<&str>,
        artwork: Upload,
    ) -> ClientResult<LabelVersion> {
        let mut form = MultipartForm::new();
        if let Some(description) = change_description.filter(|d| !d.trim().is_empty()) {
            form = form.text("change_description", description);
        }
        let request = ApiRequest::post(format!("/allergen-label/templates/{template_id}/versions"))
            .multipart(form.file("file", artwork));
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn approve_label_version(
        &self,
        template_id: RecordId,
        version_id: RecordId,
    ) -> ClientResult<LabelVersion> {
        self.client
            .send(
                ApiRequest::post(format!(
                    "/allergen-label/templates/{template_id}/versions/{version_id}/approve"
                )),
                Shape::Enveloped,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_input_carries_product_id() {
        let assessment = AssessmentInput {
            product_id: RecordId::from(12),
            allergens_present: vec!["egg".to_string()],
            cross_contact_risks: Vec::new(),
            risk_level: Some("high".to_string()),
            precautionary_labeling: None,
            control_measures: None,
        };

        let value = serde_json::to_value(&assessment).unwrap();
        assert_eq!(value["product_id"], 12);
        assert_eq!(value["risk_level"], "high");
        assert!(value.get("control_measures").is_none());
    }
}
