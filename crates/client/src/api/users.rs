//! `/users`: account administration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department_id: Option<RecordId>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub search: Option<String>,
    pub role: Option<String>,
    pub department_id: Option<RecordId>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<RecordId>,
}

facade!(Users);

impl Users<'_> {
    pub async fn list(&self, filter: &UserFilter) -> ClientResult<Page<User>> {
        let request = ApiRequest::get("/users").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<User> {
        self.client
            .send(ApiRequest::get(format!("/users/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn create(&self, user: &NewUser) -> ClientResult<User> {
        let request = ApiRequest::post("/users").json(user)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn update(&self, id: RecordId, update: &UserUpdate) -> ClientResult<User> {
        let request = ApiRequest::put(format!("/users/{id}")).json(update)?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/users/{id}")), Shape::Enveloped)
            .await
    }

    pub async fn activate(&self, id: RecordId) -> ClientResult<User> {
        self.client
            .send(ApiRequest::post(format!("/users/{id}/activate")), Shape::Enveloped)
            .await
    }

    pub async fn deactivate(&self, id: RecordId) -> ClientResult<User> {
        self.client
            .send(ApiRequest::post(format!("/users/{id}/deactivate")), Shape::Enveloped)
            .await
    }

    pub async fn reset_password(&self, id: RecordId, new_password: &str) -> ClientResult<()> {
        let request = ApiRequest::post(format!("/users/{id}/reset-password"))
            .json(&serde_json::json!({ "new_password": new_password }))?;
        self.client.send_discard(request, Shape::Enveloped).await
    }
}
