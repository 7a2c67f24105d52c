use gloo::storage::{
  LocalStorage,
  Storage
};
use tasklet_shared::SessionUser;
use yew::{
  Callback,
  hook,
  use_context
};

use crate::api::ApiClient;

pub const SESSION_STORAGE_KEY: &str =
  "tasklet.session";

/// Signed-in user shared with every page
/// through a `ContextProvider`.
#[derive(Clone, PartialEq)]
pub struct SessionContext {
  pub user:   Option<SessionUser>,
  pub update: Callback<Option<SessionUser>>
}

impl SessionContext {
  pub fn is_signed_in(&self) -> bool {
    self
      .user
      .as_ref()
      .and_then(SessionUser::bearer)
      .is_some()
  }

  pub fn client(&self) -> ApiClient {
    ApiClient::for_session(
      self.user.as_ref()
    )
  }

  pub fn sign_in(&self, user: SessionUser) {
    self.update.emit(Some(user));
  }

  pub fn sign_out(&self) {
    self.update.emit(None);
  }
}

#[hook]
pub fn use_session() -> SessionContext {
  use_context::<SessionContext>()
    .unwrap_or_else(|| SessionContext {
      user:   None,
      update: Callback::noop()
    })
}

pub fn load_session() -> Option<SessionUser>
{
  match LocalStorage::get::<SessionUser>(
    SESSION_STORAGE_KEY
  ) {
    | Ok(user) if user.bearer().is_some() => {
      Some(user)
    }
    | Ok(_) => None,
    | Err(err) => {
      tracing::debug!(
        error = %err,
        "no stored session"
      );
      None
    }
  }
}

pub fn save_session(
  user: Option<&SessionUser>
) {
  match user {
    | Some(user) => {
      if let Err(err) = LocalStorage::set(
        SESSION_STORAGE_KEY,
        user
      ) {
        tracing::warn!(
          error = %err,
          "failed to persist session"
        );
      }
    }
    | None => {
      LocalStorage::delete(
        SESSION_STORAGE_KEY
      );
    }
  }
}
