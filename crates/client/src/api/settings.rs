//! `/settings`: system configuration key/value pairs.
//!
//! The list endpoint answers with a bare array; single-setting endpoints use
//! the envelope.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use qms_core::Shape;

use crate::error::ClientResult;
use crate::request::{ApiRequest, Blob, MultipartForm, Upload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_editable: Option<bool>,
    #[serde(default, with = "qms_core::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub imported: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

facade!(Settings);

impl Settings<'_> {
    pub async fn list(&self, category: Option<&str>) -> ClientResult<Vec<Setting>> {
        let request = ApiRequest::get("/settings").query(&serde_json::json!({ "category": category }))?;
        self.client.send(request, Shape::Bare).await
    }

    pub async fn get(&self, key: &str) -> ClientResult<Setting> {
        self.client
            .send(ApiRequest::get(format!("/settings/{}", encode(key))), Shape::Enveloped)
            .await
    }

    pub async fn update(&self, key: &str, value: Value) -> ClientResult<Setting> {
        let request = ApiRequest::put(format!("/settings/{}", encode(key)))
            .json(&serde_json::json!({ "value": value }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn bulk_update(&self, values: &BTreeMap<String, Value>) -> ClientResult<Vec<Setting>> {
        let request = ApiRequest::put("/settings/bulk").json(&serde_json::json!({ "settings": values }))?;
        self.client.send(request, Shape::Enveloped).await
    }

    pub async fn reset(&self, key: &str) -> ClientResult<Setting> {
        self.client
            .send(
                ApiRequest::post(format!("/settings/{}/reset", encode(key))),
                Shape::Enveloped,
            )
            .await
    }

    pub async fn export(&self) -> ClientResult<Blob> {
        self.client.download(ApiRequest::get("/settings/export")).await
    }

    pub async fn import(&self, file: Upload) -> ClientResult<ImportSummary> {
        let request = ApiRequest::post("/settings/import").multipart(MultipartForm::new().file("file", file));
        self.client.send(request, Shape::Enveloped).await
    }
}

fn encode(key: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(key)
}
