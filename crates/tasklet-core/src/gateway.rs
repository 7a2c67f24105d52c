//! The remote task gateway.
//!
//! [`TaskGateway`] is the seam the view drivers talk to; [`HttpGateway`] is
//! the reqwest implementation of the `/todo/*` and `/auth/*` endpoints.
//! Every task call requires a bearer token and is never sent without one.

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tasklet_shared::{
    ApiMessage, LoginRequest, LoginResponse, SessionUser, SignupRequest, TaskCreate, TaskDto,
    TaskListQuery,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::GatewayError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub trait TaskGateway: Send + Sync {
    /// `query` is `None` for the unpaginated listing used by bulk removal
    /// and statistics.
    fn list(
        &self,
        token: &str,
        query: Option<&TaskListQuery>,
    ) -> impl Future<Output = Result<Vec<TaskDto>, GatewayError>> + Send;

    fn get(
        &self,
        token: &str,
        id: &str,
    ) -> impl Future<Output = Result<TaskDto, GatewayError>> + Send;

    fn create(
        &self,
        token: &str,
        task: &TaskCreate,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Sends the full record; the gateway matches it by `id`.
    fn update(
        &self,
        token: &str,
        task: &TaskDto,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    fn delete(
        &self,
        token: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tasklet/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed building HTTP client for the task gateway")?;

        debug!(base = %base, ?timeout, "built task gateway client");
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email, request_id))]
    pub async fn login(&self, request: &LoginRequest) -> Result<SessionUser, GatewayError> {
        let url = self.endpoint("auth/login", &[]);
        let builder = self.request(Method::POST, url, None).json(request);
        let body = self.send(builder).await?;
        let response: LoginResponse = serde_json::from_str(&body)?;
        Ok(response.data)
    }

    /// Returns the gateway's confirmation message, if any.
    #[tracing::instrument(skip(self, request), fields(email = %request.email, request_id))]
    pub async fn register(
        &self,
        request: &SignupRequest,
    ) -> Result<Option<String>, GatewayError> {
        let url = self.endpoint("auth/register", &[]);
        let builder = self.request(Method::POST, url, None).json(request);
        let body = self.send(builder).await?;
        Ok(decode_or_default::<ApiMessage>(&body).message)
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        // Base URLs are checked to be hierarchical in `parse_base_url`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(path.split('/'));
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let builder = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and returns the body of a 2xx answer.
    async fn send(&self, builder: RequestBuilder) -> Result<String, GatewayError> {
        let response = builder.send().await.inspect_err(|err| {
            warn!(error = %err, "task gateway request failed");
        })?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "task gateway answered");

        if status.is_success() {
            return Ok(body);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }

        let message = decode_or_default::<ApiMessage>(&body).message;
        warn!(
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "task gateway rejected request"
        );
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn authorized(token: &str) -> Result<&str, GatewayError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(GatewayError::Unauthenticated);
        }
        Ok(token)
    }
}

impl TaskGateway for HttpGateway {
    #[tracing::instrument(skip(self, token), fields(request_id))]
    async fn list(
        &self,
        token: &str,
        query: Option<&TaskListQuery>,
    ) -> Result<Vec<TaskDto>, GatewayError> {
        let token = Self::authorized(token)?;
        let url = match query {
            Some(query) => {
                let page = query.page.to_string();
                let limit = query.limit.to_string();
                self.endpoint(
                    "todo/getAll",
                    &[
                        ("search", query.search.as_str()),
                        ("page", page.as_str()),
                        ("limit", limit.as_str()),
                    ],
                )
            }
            None => self.endpoint("todo/getAll", &[]),
        };

        let body = self.send(self.request(Method::GET, url, Some(token))).await?;
        let tasks: Vec<TaskDto> = serde_json::from_str(&body)?;
        debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    #[tracing::instrument(skip(self, token), fields(request_id))]
    async fn get(&self, token: &str, id: &str) -> Result<TaskDto, GatewayError> {
        let token = Self::authorized(token)?;
        let url = self.endpoint("todo/getById", &[("id", id)]);
        let body = self.send(self.request(Method::GET, url, Some(token))).await?;

        let task: Option<TaskDto> = serde_json::from_str(&body)?;
        task.ok_or(GatewayError::NotFound)
    }

    #[tracing::instrument(skip(self, token, task), fields(name = %task.name, request_id))]
    async fn create(&self, token: &str, task: &TaskCreate) -> Result<(), GatewayError> {
        let token = Self::authorized(token)?;
        let url = self.endpoint("todo/create", &[]);
        self.send(self.request(Method::POST, url, Some(token)).json(task))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, token, task), fields(id = %task.id, status = task.status, request_id))]
    async fn update(&self, token: &str, task: &TaskDto) -> Result<(), GatewayError> {
        let token = Self::authorized(token)?;
        let url = self.endpoint("todo/update", &[("id", task.id.as_str())]);
        self.send(self.request(Method::PUT, url, Some(token)).json(task))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, token), fields(request_id))]
    async fn delete(&self, token: &str, id: &str) -> Result<(), GatewayError> {
        let token = Self::authorized(token)?;
        let url = self.endpoint("todo/delete", &[("id", id)]);
        self.send(self.request(Method::DELETE, url, Some(token)))
            .await?;
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("gateway URL is empty");
    }
    let url = Url::parse(trimmed).with_context(|| format!("invalid gateway URL: {trimmed}"))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("gateway URL must be an http(s) URL: {trimmed}");
    }
    Ok(url)
}

fn decode_or_default<T: DeserializeOwned + Default>(body: &str) -> T {
    serde_json::from_str(body).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpGateway {
        HttpGateway::new(base, Duration::from_secs(5)).expect("gateway")
    }

    #[test]
    fn endpoints_keep_the_base_path() {
        let plain = gateway("http://localhost:8080");
        assert_eq!(
            plain.endpoint("todo/getAll", &[]).as_str(),
            "http://localhost:8080/todo/getAll"
        );

        let nested = gateway("https://example.com/api/");
        assert_eq!(
            nested
                .endpoint("todo/delete", &[("id", "a b&c")])
                .as_str(),
            "https://example.com/api/todo/delete?id=a+b%26c"
        );

        let no_slash = gateway("https://example.com/api");
        assert_eq!(
            no_slash.endpoint("auth/login", &[]).as_str(),
            "https://example.com/api/auth/login"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(HttpGateway::new("", Duration::from_secs(1)).is_err());
        assert!(HttpGateway::new("mailto:a@b.c", Duration::from_secs(1)).is_err());
        assert!(HttpGateway::new("ftp://host", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn blank_token_is_unauthenticated() {
        assert!(matches!(
            HttpGateway::authorized("  "),
            Err(GatewayError::Unauthenticated)
        ));
        assert_eq!(HttpGateway::authorized(" t ").ok(), Some("t"));
    }
}
