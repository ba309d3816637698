//! `/management-reviews`: periodic FSMS management reviews.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Planned,
    InProgress,
    Completed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementReview {
    pub id: RecordId,
    pub title: String,
    pub status: ReviewStatus,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
    #[serde(default)]
    pub chairperson_id: Option<RecordId>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub minutes: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub status: Option<ReviewStatus>,
    pub search: Option<String>,
}

/// Body of create and update calls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chairperson_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
}

/// One ISO 22000 §9.3.2 input (audit results, customer feedback, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub id: RecordId,
    pub review_id: RecordId,
    pub input_type: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReviewInput {
    pub input_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAction {
    pub id: RecordId,
    pub review_id: RecordId,
    pub title: String,
    #[serde(default)]
    pub assigned_to: Option<RecordId>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReviewAction {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

facade!(ManagementReviews);

impl ManagementReviews<'_> {
    pub async fn list(&self, filter: &ReviewFilter) -> ClientResult<Page<ManagementReview>> {
        let request = ApiRequest::get("/management-reviews").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<ManagementReview> {
        self.client
            .send(ApiRequest::get(format!("/management-reviews/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create(&self, review: &ReviewDraft) -> ClientResult<ManagementReview> {
        let request = ApiRequest::post("/management-reviews").json(review)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, review: &ReviewDraft) -> ClientResult<ManagementReview> {
        let request = ApiRequest::put(format!("/management-reviews/{id}")).json(review)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn add_input(&self, id: RecordId, input: &NewReviewInput) -> ClientResult<ReviewInput> {
        let request = ApiRequest::post(format!("/management-reviews/{id}/inputs")).json(input)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn actions(&self, id: RecordId) -> ClientResult<Vec<ReviewAction>> {
        self.client
            .send(
                ApiRequest::get(format!("/management-reviews/{id}/actions")),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn add_action(&self, id: RecordId, action: &NewReviewAction) -> ClientResult<ReviewAction> {
        let request = ApiRequest::post(format!("/management-reviews/{id}/actions")).json(action)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn complete(&self, id: RecordId) -> ClientResult<ManagementReview> {
        self.client
            .send(
                ApiRequest::post(format!("/management-reviews/{id}/complete")),
                Shape::Enveloped,
            )
            .await
    }
}
