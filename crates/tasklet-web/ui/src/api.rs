use gloo::net::http::{
  Request,
  RequestBuilder,
  Response
};
use serde::de::DeserializeOwned;
use tasklet_shared::{
  ApiMessage,
  LoginRequest,
  LoginResponse,
  SessionUser,
  SignupRequest,
  TaskCreate,
  TaskDto,
  TaskListQuery
};

const DEFAULT_API_URL: &str =
  "http://localhost:8080";

pub fn api_base() -> &'static str {
  option_env!("TASKLET_API_URL")
    .filter(|url| !url.trim().is_empty())
    .unwrap_or(DEFAULT_API_URL)
}

fn join(base: &str, path: &str) -> String {
  format!(
    "{}/{}",
    base.trim_end_matches('/'),
    path.trim_start_matches('/')
  )
}

#[derive(
  Debug, Clone, PartialEq, thiserror::Error,
)]
pub enum ApiError {
  #[error("not signed in")]
  Unauthenticated,
  #[error("task not found")]
  NotFound,
  #[error(
    "gateway answered {status}{}",
    suffix(.message)
  )]
  Status {
    status:  u16,
    message: Option<String>
  },
  #[error("network error: {0}")]
  Network(String),
  #[error("decode error: {0}")]
  Decode(String)
}

fn suffix(
  message: &Option<String>
) -> String {
  message
    .as_deref()
    .map(|m| format!(": {m}"))
    .unwrap_or_default()
}

impl ApiError {
  pub fn gateway_message(
    &self
  ) -> Option<&str> {
    match self {
      | Self::Status {
        message, ..
      } => message.as_deref(),
      | _ => None
    }
  }

  /// Gateway message when there is one,
  /// else the view's fallback text.
  pub fn message_or(
    &self,
    fallback: &str
  ) -> String {
    self
      .gateway_message()
      .unwrap_or(fallback)
      .to_string()
  }
}

fn network(err: gloo::net::Error) -> ApiError {
  ApiError::Network(err.to_string())
}

/// Browser client for the task gateway.
/// Carries the bearer token of the
/// current session, if any.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
  base:  String,
  token: Option<String>
}

impl ApiClient {
  pub fn new(
    base: &str,
    token: Option<&str>
  ) -> Self {
    Self {
      base:  base.to_string(),
      token: token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
    }
  }

  pub fn for_session(
    user: Option<&SessionUser>
  ) -> Self {
    Self::new(
      api_base(),
      user.and_then(SessionUser::bearer)
    )
  }

  pub fn has_token(&self) -> bool {
    self.token.is_some()
  }

  fn url(&self, path: &str) -> String {
    join(&self.base, path)
  }

  fn authorized(
    &self,
    builder: RequestBuilder
  ) -> Result<RequestBuilder, ApiError> {
    let token = self
      .token
      .as_deref()
      .ok_or(ApiError::Unauthenticated)?;
    Ok(builder.header(
      "Authorization",
      &format!("Bearer {token}")
    ))
  }

  async fn check(
    response: Response
  ) -> Result<Response, ApiError> {
    if response.ok() {
      return Ok(response);
    }
    let status = response.status();
    if status == 404 {
      return Err(ApiError::NotFound);
    }
    let message = response
      .json::<ApiMessage>()
      .await
      .ok()
      .and_then(|body| body.message);
    tracing::warn!(
      status,
      message = message.as_deref(),
      "gateway rejected request"
    );
    Err(ApiError::Status {
      status,
      message
    })
  }

  async fn decode<T: DeserializeOwned>(
    response: Response
  ) -> Result<T, ApiError> {
    Self::check(response)
      .await?
      .json::<T>()
      .await
      .map_err(|err| {
        ApiError::Decode(err.to_string())
      })
  }

  pub async fn list(
    &self,
    query: Option<&TaskListQuery>
  ) -> Result<Vec<TaskDto>, ApiError> {
    let mut builder = self.authorized(
      Request::get(
        &self.url("todo/getAll")
      )
    )?;
    if let Some(query) = query {
      let page = query.page.to_string();
      let limit = query.limit.to_string();
      builder = builder.query([
        ("search", query.search.as_str()),
        ("page", page.as_str()),
        ("limit", limit.as_str())
      ]);
    }
    let response = builder
      .send()
      .await
      .map_err(network)?;
    Self::decode(response).await
  }

  pub async fn get(
    &self,
    id: &str
  ) -> Result<TaskDto, ApiError> {
    let response = self
      .authorized(
        Request::get(
          &self.url("todo/getById")
        )
      )?
      .query([("id", id)])
      .send()
      .await
      .map_err(network)?;
    Self::decode::<Option<TaskDto>>(
      response
    )
    .await?
    .ok_or(ApiError::NotFound)
  }

  pub async fn create(
    &self,
    task: &TaskCreate
  ) -> Result<(), ApiError> {
    let request = self
      .authorized(Request::post(
        &self.url("todo/create")
      ))?
      .json(task)
      .map_err(network)?;
    let response =
      request.send().await.map_err(network)?;
    Self::check(response).await?;
    Ok(())
  }

  pub async fn update(
    &self,
    task: &TaskDto
  ) -> Result<(), ApiError> {
    let request = self
      .authorized(Request::put(
        &self.url("todo/update")
      ))?
      .query([("id", task.id.as_str())])
      .json(task)
      .map_err(network)?;
    let response =
      request.send().await.map_err(network)?;
    Self::check(response).await?;
    Ok(())
  }

  pub async fn delete(
    &self,
    id: &str
  ) -> Result<(), ApiError> {
    let response = self
      .authorized(Request::delete(
        &self.url("todo/delete")
      ))?
      .query([("id", id)])
      .send()
      .await
      .map_err(network)?;
    Self::check(response).await?;
    Ok(())
  }

  pub async fn login(
    &self,
    credentials: &LoginRequest
  ) -> Result<SessionUser, ApiError> {
    let response =
      Request::post(&self.url("auth/login"))
        .json(credentials)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    let body: LoginResponse =
      Self::decode(response).await?;
    Ok(body.data)
  }

  /// Returns the gateway's confirmation
  /// message, if it sent one.
  pub async fn register(
    &self,
    signup: &SignupRequest
  ) -> Result<Option<String>, ApiError> {
    let response = Request::post(
      &self.url("auth/register")
    )
    .json(signup)
    .map_err(network)?
    .send()
    .await
    .map_err(network)?;
    let response =
      Self::check(response).await?;
    Ok(response
      .json::<ApiMessage>()
      .await
      .ok()
      .and_then(|body| body.message))
  }
}
