//! `/notifications`: the caller's inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qms_core::{Page, PageRequest, RecordId, Shape};

use crate::api::Extra;
use crate::error::ClientResult;
use crate::request::ApiRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub priority: Option<NotificationPriority>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(with = "qms_core::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationFilter {
    #[serde(flatten)]
    pub page: PageRequest,
    pub unread_only: Option<bool>,
    pub notification_type: Option<String>,
    pub priority: Option<NotificationPriority>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct UnreadCount {
    #[serde(default)]
    pub unread_count: u64,
}

facade!(Notifications);

impl Notifications<'_> {
    pub async fn list(&self, filter: &NotificationFilter) -> ClientResult<Page<Notification>> {
        let request = ApiRequest::get("/notifications").query(filter)?;
        self.client.send(request, Shape::Enveloped).await
    }

    /// Served without the envelope.
    pub async fn unread_count(&self) -> ClientResult<u64> {
        let count: UnreadCount = self
            .client
            .send(ApiRequest::get("/notifications/unread-count"), Shape::Bare)
            .await?;
        Ok(count.unread_count)
    }

    pub async fn mark_read(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::put(format!("/notifications/{id}/read")), Shape::Enveloped)
            .await
    }

    pub async fn mark_all_read(&self) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::put("/notifications/read-all"), Shape::Enveloped)
            .await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .send_discard(ApiRequest::delete(format!("/notifications/{id}")), Shape::Enveloped)
            .await
    }
}
