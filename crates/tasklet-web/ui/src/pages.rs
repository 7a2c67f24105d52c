mod login;
mod not_found;
mod signup;
mod statistics;
mod task_add;
mod task_detail;
mod task_edit;
mod task_list;

use chrono::DateTime;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use signup::SignupPage;
pub use statistics::StatisticsPage;
pub use task_add::AddTaskPage;
pub use task_detail::TaskDetailPage;
pub use task_edit::EditTaskPage;
pub use task_list::TaskListPage;
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  InputEvent,
  TargetCast,
  UseStateHandle
};

use crate::api::ApiError;

const TASK_NOT_FOUND: &str =
  "The requested task could not be \
   found.";

/// Mirrors an `<input>` into a string
/// state.
fn bind_input(
  state: &UseStateHandle<String>
) -> Callback<InputEvent> {
  let state = state.clone();
  Callback::from(move |e: InputEvent| {
    let input: HtmlInputElement =
      e.target_unchecked_into();
    state.set(input.value());
  })
}

/// Text shown when a single task could
/// not be loaded.
fn load_error_message(
  err: &ApiError,
  fallback: &str
) -> String {
  match err {
    | ApiError::NotFound => {
      TASK_NOT_FOUND.to_string()
    }
    | ApiError::Unauthenticated => {
      "Sign in to see your tasks."
        .to_string()
    }
    | _ => fallback.to_string()
  }
}

/// RFC 3339 timestamps are shown in the
/// offset they were written with; other
/// strings pass through unchanged.
fn format_timestamp(raw: &str) -> String {
  DateTime::parse_from_rfc3339(raw)
    .map(|at| {
      at.format("%Y-%m-%d %H:%M")
        .to_string()
    })
    .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_render_or_pass_through() {
    assert_eq!(
      format_timestamp(
        "2026-01-02T03:04:05.000Z"
      ),
      "2026-01-02 03:04"
    );
    assert_eq!(
      format_timestamp("yesterday"),
      "yesterday"
    );
  }

  #[test]
  fn missing_task_has_its_own_message() {
    assert_eq!(
      load_error_message(
        &ApiError::NotFound,
        "fallback"
      ),
      TASK_NOT_FOUND
    );
    assert_eq!(
      load_error_message(
        &ApiError::Network(
          "offline".to_string()
        ),
        "fallback"
      ),
      "fallback"
    );
  }
}
