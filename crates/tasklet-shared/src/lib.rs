pub mod staging;
pub mod stats;
pub mod validate;
pub mod view;

use std::collections::BTreeMap;

use serde::{
  Deserialize,
  Serialize
};

pub const PAGE_SIZE: u32 = 10;
pub const SEARCH_DEBOUNCE_MS: u64 = 500;
pub const UNDO_DELETE_MS: u64 = 5_000;
pub const NAME_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize =
  120;

pub const FETCH_TASK_FAILED: &str =
  "An error occurred while fetching \
   the task details.";
pub const UPDATE_STATUS_FAILED: &str =
  "An error occurred while updating \
   the task status.";
pub const UPDATE_TASK_FAILED: &str =
  "An error occurred while updating \
   the task.";
pub const CREATE_TASK_FAILED: &str =
  "Failed to create task";
pub const DELETE_TASK_FAILED: &str =
  "An error occurred while deleting \
   the task.";
pub const LOGIN_FAILED: &str =
  "Invalid email or password.";
pub const SIGNUP_FAILED: &str =
  "Signup failed. Try again.";

/// A task record as owned by the
/// gateway. Fields the client does not
/// model are kept in `extra` so that
/// updates can send the full record
/// back.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
  #[serde(rename = "_id")]
  pub id:          String,
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub status:      bool,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub created_at:  Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub updated_at:  Option<String>,
  #[serde(flatten)]
  pub extra:
    BTreeMap<String, serde_json::Value>
}

impl TaskDto {
  pub fn is_completed(&self) -> bool {
    self.status
  }

  pub fn status_label(
    &self
  ) -> &'static str {
    if self.status {
      "Completed"
    } else {
      "Active"
    }
  }

  /// Full record with only `status`
  /// inverted.
  pub fn toggled(&self) -> Self {
    Self {
      status: !self.status,
      ..self.clone()
    }
  }

  pub fn with_details(
    &self,
    draft: &TaskDraft
  ) -> Self {
    Self {
      name: draft.name.clone(),
      description: draft
        .description
        .clone(),
      ..self.clone()
    }
  }
}

/// Validated name and description, as
/// produced by
/// [`validate::task_draft`].
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct TaskDraft {
  pub name:        String,
  pub description: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskCreate {
  pub name:        String,
  pub description: String,
  pub status:      bool
}

impl From<TaskDraft> for TaskCreate {
  fn from(draft: TaskDraft) -> Self {
    Self {
      name:        draft.name,
      description: draft.description,
      status:      false
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskListQuery {
  pub search: String,
  pub page:   u32,
  pub limit:  u32
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskIdArg {
  pub id: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct LoginRequest {
  pub email:    String,
  pub password: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct SignupRequest {
  pub email:    String,
  pub password: String,
  pub name:     String
}

/// The authenticated user as returned
/// by the login endpoint.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct SessionUser {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub name:  String,
  pub token: String
}

impl SessionUser {
  pub fn bearer(&self) -> Option<&str> {
    let token = self.token.trim();
    if token.is_empty() {
      None
    } else {
      Some(token)
    }
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct LoginResponse {
  pub data: SessionUser
}

/// Error (and some success) bodies
/// carry a human readable `message`.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
)]
pub struct ApiMessage {
  #[serde(default)]
  pub message: Option<String>
}
