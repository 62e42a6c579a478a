//! Auth endpoints
//!
//! - `POST /auth/login` - Exchange credentials for a bearer token
//! - `POST /auth/register` - Create an account
//! - `GET /auth/me` - Current user profile
//! - `POST /auth/access-token/redeem` - Exchange a shared access code for a token

use reqwest::Method;

use super::api::ApiClient;
use super::error::ClientResult;
use super::types::{RedeemRequest, RedeemedToken, RegisterRequest, TokenResponse, UserProfile};

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// Sent as an OAuth2 password form; the email goes in `username`.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        let builder = self
            .request(Method::POST, "/auth/login")
            .form(&[("username", email), ("password", password)]);
        self.send_json(builder).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<UserProfile> {
        let builder = self.request(Method::POST, "/auth/register").json(request);
        self.send_json(builder).await
    }

    /// Profile of the user owning the stored token
    pub async fn me(&self) -> ClientResult<UserProfile> {
        self.send_json(self.request(Method::GET, "/auth/me")).await
    }

    /// Profile of the user owning `token`, regardless of what is stored
    pub async fn me_with_token(&self, token: &str) -> ClientResult<UserProfile> {
        self.send_json(self.request_with_token(Method::GET, "/auth/me", token))
            .await
    }

    pub async fn redeem_access_token(&self, code: &str) -> ClientResult<RedeemedToken> {
        let builder = self
            .request(Method::POST, "/auth/access-token/redeem")
            .json(&RedeemRequest { code });
        self.send_json(builder).await
    }
}
