use std::sync::LazyLock;

use regex::Regex;

use crate::{
  DESCRIPTION_MAX_CHARS,
  LoginRequest,
  NAME_MAX_CHARS,
  SignupRequest,
  TaskDraft
};

static EMAIL_RE: LazyLock<Option<Regex>> =
  LazyLock::new(|| {
    Regex::new(r"\S+@\S+\.\S+").ok()
  });

pub const USERNAME_MIN_CHARS: usize = 3;
pub const PASSWORD_MIN_CHARS: usize = 6;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  thiserror::Error,
)]
pub enum ValidationError {
  #[error(
    "Title must be between 1 and 50 \
     characters."
  )]
  NameLength,
  #[error(
    "Description cannot exceed 120 \
     characters."
  )]
  DescriptionLength,
  #[error(
    "Username must be at least 3 \
     characters long."
  )]
  UsernameLength,
  #[error("Please enter a valid email.")]
  Email,
  #[error(
    "Password must be at least 6 \
     characters long and contain both \
     lowercase and uppercase letters."
  )]
  Password,
  #[error(
    "Email and password are required."
  )]
  MissingCredentials
}

/// Lengths are checked on the text as
/// typed, in characters; the draft holds
/// the trimmed fields. A name of only
/// whitespace is rejected.
pub fn task_draft(
  name: &str,
  description: &str
) -> Result<TaskDraft, ValidationError>
{
  if name.trim().is_empty()
    || name.chars().count() > NAME_MAX_CHARS
  {
    return Err(
      ValidationError::NameLength
    );
  }

  if description.chars().count()
    > DESCRIPTION_MAX_CHARS
  {
    return Err(
      ValidationError::DescriptionLength
    );
  }

  Ok(TaskDraft {
    name:        name.trim().to_string(),
    description: description
      .trim()
      .to_string()
  })
}

pub fn is_valid_email(
  email: &str
) -> bool {
  EMAIL_RE
    .as_ref()
    .is_some_and(|re| re.is_match(email))
}

pub fn is_strong_password(
  password: &str
) -> bool {
  password.chars().count()
    >= PASSWORD_MIN_CHARS
    && password
      .chars()
      .any(|c| c.is_ascii_lowercase())
    && password
      .chars()
      .any(|c| c.is_ascii_uppercase())
}

/// Checks run in form order: username,
/// email, password.
pub fn signup(
  name: &str,
  email: &str,
  password: &str
) -> Result<SignupRequest, ValidationError>
{
  if name.chars().count()
    < USERNAME_MIN_CHARS
  {
    return Err(
      ValidationError::UsernameLength
    );
  }
  if !is_valid_email(email) {
    return Err(ValidationError::Email);
  }
  if !is_strong_password(password) {
    return Err(
      ValidationError::Password
    );
  }

  Ok(SignupRequest {
    email:    email.to_string(),
    password: password.to_string(),
    name:     name.to_string()
  })
}

/// Login only requires both fields; the
/// gateway decides whether they match.
pub fn login(
  email: &str,
  password: &str
) -> Result<LoginRequest, ValidationError>
{
  if email.trim().is_empty()
    || password.is_empty()
  {
    return Err(
      ValidationError::MissingCredentials
    );
  }

  Ok(LoginRequest {
    email:    email.trim().to_string(),
    password: password.to_string()
  })
}
