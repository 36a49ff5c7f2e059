use super::{json_body, ApiClient, Endpoint, Method, Tag};
use crate::error::Result;
use crate::model::{user::UserEnvelope, User, UserUpdate};

pub static GET_BY_ID: Endpoint = Endpoint::query("getUserById", "/users/:id", &[Tag::Users]);
pub static UPDATE: Endpoint =
    Endpoint::mutation("updateUser", Method::Put, "/users/:id", &[Tag::Users, Tag::Auth]);

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }
}

impl UsersApi<'_> {
    pub async fn by_id(&self, id: Option<&str>) -> Result<Option<User>> {
        let envelope: Option<UserEnvelope> =
            self.client.query_dependent(&GET_BY_ID, "id", id).await?;
        Ok(envelope.map(|e| e.user))
    }

    /// Edit a profile. When it is the signed-in user's own profile the
    /// session copy is replaced too.
    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<User> {
        let envelope: UserEnvelope = self
            .client
            .mutate(&UPDATE, &[("id", id)], json_body(update)?)
            .await?;
        let session = self.client.session();
        if session.current_user().map_or(false, |user| user.id == id) {
            session.update_user(envelope.user.clone()).await?;
        }
        Ok(envelope.user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::{client_with_store, MockTransport};
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn own_profile_update_refreshes_session() {
        let transport = MockTransport::new();
        let mut incomplete = User::example();
        incomplete.email = None;
        let client = client_with_store(transport.clone(), Arc::new(MemoryStore::new()));
        client
            .session()
            .sign_in("jwt".to_string(), incomplete)
            .await
            .unwrap();
        assert!(!client.session().profile_completed().await.unwrap());

        transport.ok(Method::Put, "/users/u1", json!({"user": User::example()}));
        let update = UserUpdate {
            email: User::example().email,
            ..Default::default()
        };
        client.users().update("u1", &update).await.unwrap();
        assert_eq!(client.session().current_user(), Some(User::example()));
        assert!(client.session().profile_completed().await.unwrap());
    }
}
