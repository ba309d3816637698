//! `/interested-parties`: ISO 22000 §4.2 stakeholder register.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestedParty {
    pub id: RecordId,
    pub name: String,
    /// `customer`, `regulator`, `supplier`, `employee`, ...
    pub category: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub influence_level: Option<String>,
    #[serde(default)]
    pub expectations: Vec<Expectation>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PartyFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PartyInput {
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influence_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    pub id: RecordId,
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpectationInput {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_date: Option<NaiveDate>,
}

facade!(InterestedParties);

impl InterestedParties<'_> {
    pub async fn list(&self, filter: &PartyFilter) -> ClientResult<Page<InterestedParty>> {
        let request = ApiRequest::get("/interested-parties").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<InterestedParty> {
        self.client
            .send(ApiRequest::get(format!("/interested-parties/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create(&self, party: &PartyInput) -> ClientResult<InterestedParty> {
        let request = ApiRequest::post("/interested-parties").json(party)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, party: &PartyInput) -> ClientResult<InterestedParty> {
        let request = ApiRequest::put(format!("/interested-parties/{id}")).json(party)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/interested-parties/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn add_expectation(&self, id: RecordId, expectation: &ExpectationInput) -> ClientResult<Expectation> {
        let request = ApiRequest::post(format!("/interested-parties/{id}/expectations")).json(expectation)?;
        self.client.send(request, Shape::Enveloped).await
    }
}
