//! REST client for the platform API.
//!
//! Every authenticated call carries `Authorization: Bearer <token>`. Failures
//! come back as [`ApiError`] with the server's `message` already extracted.

mod error;

pub use error::ApiError;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ApiPaths, ClientConfig};
use crate::models::{
    ErrorResponse, ForgotPasswordRequest, Ingredient, ListPayload, ListQuery, LoginRequest,
    LoginResponse, MessageResponse, Page, ProfileDraft, ResetPasswordRequest, UserProfile,
};
use crate::resource::{Resource, ResourceApi, SearchMode};

const USER_AGENT: &str = "nutriadmin-cli";

/// Unauthenticated identity endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Ask the identity service to email a reset token.
    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, ApiError>;

    /// Set a new password with an emailed reset token.
    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError>;
}

/// Lightweight API client for the admin dashboard.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Url,
    paths: ApiPaths,
    client: Client,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the configured API.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: with_trailing_slash(config.api_base_url.clone()),
            paths: config.paths.clone(),
            client,
            token: None,
        })
    }

    /// Attach (or drop) the bearer token used for authenticated calls.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn api_url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn resource_url(&self, path: &str, id: &str) -> Result<Url, ApiError> {
        let mut url = self.api_url(path)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.token.as_deref() {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Err(ApiError::MissingToken),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "api response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = ErrorResponse::from_body(&body)
            .and_then(|error| error.user_message().map(str::to_string));
        warn!(%status, message = message.as_deref().unwrap_or(""), "api call failed");

        if status == StatusCode::UNAUTHORIZED {
            Err(ApiError::Unauthorized { message })
        } else {
            Err(ApiError::Server { status, message })
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_message(&self, request: RequestBuilder) -> Result<MessageResponse, ApiError> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        // Identity endpoints answer with an empty body, plain text, or `{message}`.
        Ok(serde_json::from_slice(&body).unwrap_or_else(|_| MessageResponse {
            message: Some(String::from_utf8_lossy(&body).trim().to_string())
                .filter(|text| !text.is_empty()),
        }))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.api_url(path)?;
        self.send_json(self.client.post(url).json(body)).await
    }

    /// Fetch the profile of `user_id`.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        let url = self.resource_url(&self.paths.user_profile, user_id)?;
        self.send_json(self.authorized(self.client.get(url))?).await
    }

    /// Update the profile of `user_id`.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn update_profile(
        &self,
        user_id: &str,
        draft: &ProfileDraft,
    ) -> Result<UserProfile, ApiError> {
        let url = self.resource_url(&self.paths.user_profile, user_id)?;
        self.send_json(self.authorized(self.client.put(url).json(draft))?)
            .await
    }

    /// Look up catalogue ingredients, optionally filtered by name.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn list_ingredients(&self, search: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let url = self.api_url(&self.paths.ingredients)?;
        let mut request = self.client.get(url);
        if let Some(term) = search.map(str::trim).filter(|term| !term.is_empty()) {
            request = request.query(&[("search", term)]);
        }
        let payload: ListPayload<Ingredient> =
            self.send_json(self.authorized(request)?).await?;
        Ok(payload.into_page(&ListQuery::default()).items)
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json(&self.paths.login, request).await
    }

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.api_url(&self.paths.forgot_password)?;
        self.send_message(self.client.post(url).json(request)).await
    }

    async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.api_url(&self.paths.reset_password)?;
        self.send_message(self.client.post(url).json(request)).await
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for ApiClient {
    async fn list(&self, query: &ListQuery) -> Result<Page<R>, ApiError> {
        let url = self.api_url(R::path(&self.paths))?;
        let mut request = self.client.get(url);
        if R::SEARCH == SearchMode::Server {
            if let Some(term) = query.search_term() {
                request = request.query(&[("search", term)]);
            }
            request = request.query(&[("page", query.page), ("pageSize", query.page_size)]);
        }
        let payload: ListPayload<R> = self.send_json(self.authorized(request)?).await?;
        Ok(payload.into_page(query))
    }

    async fn get(&self, id: &str) -> Result<R, ApiError> {
        let url = self.resource_url(R::path(&self.paths), id)?;
        self.send_json(self.authorized(self.client.get(url))?).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, ApiError> {
        let url = self.api_url(R::path(&self.paths))?;
        self.send_json(self.authorized(self.client.post(url).json(draft))?)
            .await
    }

    async fn update(&self, id: &str, draft: &R::Draft) -> Result<R, ApiError> {
        let url = self.resource_url(R::path(&self.paths), id)?;
        self.send_json(self.authorized(self.client.put(url).json(draft))?)
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.resource_url(R::path(&self.paths), id)?;
        self.send(self.authorized(self.client.delete(url))?).await?;
        Ok(())
    }
}

/// `Url::join` replaces the last segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipe;

    fn client(base: &str) -> ApiClient {
        let mut config = ClientConfig::with_defaults();
        config.api_base_url = Url::parse(base).unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_its_prefix() {
        let api = client("https://admin.example.com/api");
        assert_eq!(
            api.api_url("Recipes").unwrap().as_str(),
            "https://admin.example.com/api/Recipes"
        );
        assert_eq!(
            api.api_url("/Auth/login").unwrap().as_str(),
            "https://admin.example.com/api/Auth/login"
        );
    }

    #[test]
    fn resource_urls_escape_ids() {
        let api = client("https://admin.example.com/api/");
        assert_eq!(
            api.resource_url("news", "a b/c").unwrap().as_str(),
            "https://admin.example.com/api/news/a%20b%2Fc"
        );
        assert_eq!(
            api.resource_url("UserProfile/", "42").unwrap().as_str(),
            "https://admin.example.com/api/UserProfile/42"
        );
    }

    #[test]
    fn authorized_requires_a_token() {
        let api = client("http://localhost:5000/api/");
        let request = api.client.get("http://localhost:5000/api/users");
        assert!(matches!(
            api.authorized(request),
            Err(ApiError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn list_without_token_fails_before_sending() {
        let api = client("http://127.0.0.1:9/api/");
        let result = ResourceApi::<Recipe>::list(&api, &ListQuery::default()).await;
        assert!(matches!(result, Err(ApiError::MissingToken)));
    }
}
