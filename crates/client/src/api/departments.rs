//! `/departments`: organisational units. Every endpoint here answers without
//! the envelope.

use serde::{Deserialize, Serialize};

use qms_core::{RecordId, Shape};

use crate::api::Extra;
use crate::api::users::User;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: RecordId,
    pub department_code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_department_id: Option<RecordId>,
    #[serde(default)]
    pub manager_id: Option<RecordId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DepartmentFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub parent_department_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DepartmentInput {
    pub department_code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_department_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<RecordId>,
}

facade!(Departments);

impl Departments<'_> {
    pub async fn list(&self, filter: &DepartmentFilter) -> ClientResult<Vec<Department>> {
        let request = ApiRequest::get("/departments").query(filter)?;
        self.client.send(request, Shape::Bare).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<Department> {
        self.client
            .send(ApiRequest::get(format!("/departments/{id}")), Shape::Bare)
            .await
    }

    pub async fn create(&self, department: &DepartmentInput) -> ClientResult<Department> {
        let request = ApiRequest::post("/departments").json(department)?;
        self.client.send(request, Shape::Bare).await
    }

    pub async fn update(&self, id: RecordId, department: &DepartmentInput) -> ClientResult<Department> {
        let request = ApiRequest::put(format!("/departments/{id}")).json(department)?;
        self.client.send(request, Shape::Bare).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/departments/{id}")), Shape::Bare)
            .await
    }

    pub async fn users(&self, id: RecordId) -> ClientResult<Vec<User>> {
        self.client
            .send(ApiRequest::get(format!("/departments/{id}/users")), Shape::Bare)
            .await
    }
}
