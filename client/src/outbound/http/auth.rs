//! Login endpoint.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::client::{HttpFailure, RestClient, decode};
use crate::domain::ports::{AuthApi, AuthApiError};
use crate::domain::{AccessToken, AuthContext, LoginCredentials, User};

#[derive(Deserialize)]
struct LoginResponseDto {
    access_token: String,
    user: User,
}

fn parse_login(body: &[u8]) -> Result<AuthContext, HttpFailure> {
    let LoginResponseDto { access_token, user } = decode(body, "login")?;
    let token = AccessToken::new(access_token).ok_or_else(|| HttpFailure::Decode {
        message: "login response carried an empty access token".to_owned(),
    })?;
    Ok(AuthContext::new(token, user))
}

#[async_trait]
impl AuthApi for RestClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthContext, AuthApiError> {
        let body = json!({
            "email": credentials.email(),
            "password": credentials.password(),
        });
        let request = self.request(Method::POST, "auth/login")?.json(&body);
        let response = self.execute(request).await?;
        Ok(parse_login(&response)?)
    }
}
