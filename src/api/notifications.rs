use super::{ApiClient, Endpoint, Method, Subscription, Tag};
use crate::error::{Error, Result};
use crate::model::{notification::NotificationList, Message, Notification};

pub static GET_ALL: Endpoint =
    Endpoint::query("getNotifications", "/notifications", &[Tag::Notifications]);
pub static MARK_READ: Endpoint = Endpoint::mutation(
    "markNotificationRead",
    Method::Patch,
    "/notifications/mark-read/:id",
    &[Tag::Notifications],
);
pub static MARK_ALL_READ: Endpoint = Endpoint::mutation(
    "markAllNotificationsRead",
    Method::Patch,
    "/notifications/mark-all-read",
    &[Tag::Notifications],
);
pub static DELETE: Endpoint = Endpoint::mutation(
    "deleteNotification",
    Method::Delete,
    "/notifications/:id",
    &[Tag::Notifications],
);

/// Notification routes. Broadcasts (no `user_id`) are read-only.
pub struct NotificationsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn notifications(&self) -> NotificationsApi<'_> {
        NotificationsApi { client: self }
    }
}

impl NotificationsApi<'_> {
    /// The user's own notifications plus broadcasts.
    pub async fn all(&self) -> Result<Vec<Notification>> {
        let list: NotificationList = self.client.query(&GET_ALL, &[], &[]).await?;
        Ok(list.notifications)
    }

    pub async fn watch(&self) -> Result<Subscription<NotificationList>> {
        self.client.watch(&GET_ALL, &[], &[]).await
    }

    pub async fn mark_read(&self, notification: &Notification) -> Result<Message> {
        ensure_personal(notification)?;
        self.client
            .mutate(&MARK_READ, &[("id", notification.id.as_str())], None)
            .await
    }

    pub async fn mark_all_read(&self) -> Result<Message> {
        self.client.mutate(&MARK_ALL_READ, &[], None).await
    }

    pub async fn delete(&self, notification: &Notification) -> Result<Message> {
        ensure_personal(notification)?;
        self.client
            .mutate(&DELETE, &[("id", notification.id.as_str())], None)
            .await
    }
}

fn ensure_personal(notification: &Notification) -> Result<()> {
    if notification.is_broadcast() {
        return Err(Error::InvalidRequest(
            "Announcements sent to everyone can't be changed".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::{client_with_store, MockTransport};
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn broadcasts_cannot_be_modified() {
        let transport = MockTransport::new();
        let client = client_with_store(transport.clone(), Arc::new(MemoryStore::new()));
        let broadcast = Notification::example("n1", None);

        assert!(matches!(
            client.notifications().mark_read(&broadcast).await,
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            client.notifications().delete(&broadcast).await,
            Err(Error::InvalidRequest(_))
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn marking_read_refreshes_inbox() {
        let transport = MockTransport::new();
        let mut note = Notification::example("n2", Some("u1"));
        transport.ok(Method::Get, "/notifications", json!({"notifications": [note]}));
        transport.ok(
            Method::Patch,
            "/notifications/mark-read/n2",
            json!({"message": "Marked as read"}),
        );
        let client = client_with_store(transport.clone(), Arc::new(MemoryStore::new()));
        let inbox = client.notifications().watch().await.unwrap();

        note.is_read = true;
        transport.ok(Method::Get, "/notifications", json!({"notifications": [note]}));
        client.notifications().mark_read(&note).await.unwrap();
        assert!(inbox.current().unwrap().unwrap().notifications[0].is_read);
    }
}
