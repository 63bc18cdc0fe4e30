//! User administration endpoints.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value, json};

use super::client::{RestClient, decode};
use crate::domain::ports::{UsersApi, UsersApiError};
use crate::domain::{User, UserDraft, UserId, UserPatch};

/// Body of `POST /users`. The password is only sent when one was typed.
fn draft_body(draft: &UserDraft) -> Value {
    let mut body = json!({
        "name": draft.name,
        "email": draft.email.as_ref(),
        "role": draft.role.as_str(),
        "status": draft.status.as_str(),
    });
    if let Some(department) = draft.department_id {
        body["department_id"] = json!(department.to_string());
    }
    if let Some(password) = draft.password() {
        body["password"] = json!(password);
    }
    body
}

/// Body of `PATCH /users/{id}` with only the fields being changed.
fn patch_body(patch: &UserPatch) -> Value {
    let mut body = Map::new();
    if let Some(name) = &patch.name {
        body.insert("name".to_owned(), json!(name.trim()));
    }
    if let Some(email) = &patch.email {
        body.insert("email".to_owned(), json!(email.as_ref()));
    }
    if let Some(role) = patch.role {
        body.insert("role".to_owned(), json!(role.as_str()));
    }
    if let Some(department) = patch.department_id {
        body.insert("department_id".to_owned(), json!(department.to_string()));
    }
    if let Some(status) = patch.status {
        body.insert("status".to_owned(), json!(status.as_str()));
    }
    if let Some(password) = patch.password() {
        body.insert("password".to_owned(), json!(password));
    }
    Value::Object(body)
}

#[async_trait]
impl UsersApi for RestClient {
    async fn list(&self) -> Result<Vec<User>, UsersApiError> {
        let request = self.request(Method::GET, "users")?;
        let body = self.execute(request).await?;
        Ok(decode(&body, "user list")?)
    }

    async fn create(&self, draft: &UserDraft) -> Result<(), UsersApiError> {
        let request = self.request(Method::POST, "users")?.json(&draft_body(draft));
        self.execute(request).await?;
        Ok(())
    }

    async fn update(&self, id: UserId, patch: &UserPatch) -> Result<(), UsersApiError> {
        if patch.is_empty() {
            return Ok(());
        }
        let request = self
            .request(Method::PATCH, &format!("users/{id}"))?
            .json(&patch_body(patch));
        self.execute(request).await?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UsersApiError> {
        let request = self.request(Method::DELETE, &format!("users/{id}"))?;
        self.execute(request).await?;
        Ok(())
    }

    async fn sync_directory(&self) -> Result<(), UsersApiError> {
        let request = self.request(Method::POST, "users/ldap/sync")?;
        self.execute(request).await?;
        Ok(())
    }
}
