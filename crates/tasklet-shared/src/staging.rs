//! Undoable deletion for the task
//! detail view.
//!
//! `Idle -> Staged -> Committing ->
//! {Committed | Idle}`. A staged delete
//! can be undone until its timer fires;
//! once the request is in flight the
//! outcome is left to the gateway.

use tracing::{
  debug,
  warn
};

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub enum DeletionStage {
  #[default]
  Idle,
  Staged {
    task_id: String
  },
  Committing {
    task_id: String
  },
  Committed {
    task_id: String
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  thiserror::Error,
)]
pub enum StageError {
  #[error(
    "a deletion is already pending for \
     task {0}"
  )]
  AlreadyPending(String),
  #[error("task {0} was already deleted")]
  AlreadyCommitted(String)
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub struct DeletionStaging {
  stage: DeletionStage,
  error: Option<String>
}

impl DeletionStaging {
  pub fn stage(&self) -> &DeletionStage {
    &self.stage
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn is_idle(&self) -> bool {
    self.stage == DeletionStage::Idle
  }

  /// Whether the "deleted, undo?"
  /// notice should be on screen.
  pub fn shows_notice(&self) -> bool {
    matches!(
      self.stage,
      DeletionStage::Staged { .. }
        | DeletionStage::Committing { .. }
    )
  }

  pub fn can_undo(&self) -> bool {
    matches!(
      self.stage,
      DeletionStage::Staged { .. }
    )
  }

  pub fn is_committed(&self) -> bool {
    matches!(
      self.stage,
      DeletionStage::Committed { .. }
    )
  }

  pub fn begin(
    &mut self,
    task_id: &str
  ) -> Result<(), StageError> {
    match &self.stage {
      | DeletionStage::Idle => {}
      | DeletionStage::Staged {
        task_id: pending
      }
      | DeletionStage::Committing {
        task_id: pending
      } => {
        return Err(
          StageError::AlreadyPending(
            pending.clone()
          )
        );
      }
      | DeletionStage::Committed {
        task_id: done
      } => {
        return Err(
          StageError::AlreadyCommitted(
            done.clone()
          )
        );
      }
    }

    debug!(task_id, "staged deletion");
    self.error = None;
    self.stage = DeletionStage::Staged {
      task_id: task_id.to_string()
    };
    Ok(())
  }

  /// Cancels a staged deletion. Has no
  /// effect once the timer has fired.
  pub fn undo(&mut self) -> bool {
    if !self.can_undo() {
      return false;
    }
    debug!("undid staged deletion");
    self.stage = DeletionStage::Idle;
    true
  }

  /// Timer elapsed: returns the id to
  /// delete.
  pub fn fire(
    &mut self
  ) -> Option<String> {
    let DeletionStage::Staged {
      task_id
    } = &self.stage
    else {
      return None;
    };
    let task_id = task_id.clone();
    self.stage =
      DeletionStage::Committing {
        task_id: task_id.clone()
      };
    Some(task_id)
  }

  /// Records the gateway's answer. A
  /// failure returns to `Idle` with the
  /// message and without the undo
  /// notice.
  pub fn settle(
    &mut self,
    result: Result<(), String>
  ) -> bool {
    let DeletionStage::Committing {
      task_id
    } = &self.stage
    else {
      return false;
    };
    let task_id = task_id.clone();

    match result {
      | Ok(()) => {
        debug!(%task_id, "deletion committed");
        self.stage =
          DeletionStage::Committed {
            task_id
          };
      }
      | Err(message) => {
        warn!(%task_id, error = %message, "deletion failed, task restored");
        self.stage = DeletionStage::Idle;
        self.error = Some(message);
      }
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn undo_before_timer_returns_to_idle() {
    let mut staging =
      DeletionStaging::default();
    staging
      .begin("t1")
      .expect("stage from idle");
    assert!(staging.shows_notice());
    assert!(staging.undo());
    assert!(staging.is_idle());
    assert_eq!(staging.fire(), None);
  }

  #[test]
  fn second_stage_is_rejected() {
    let mut staging =
      DeletionStaging::default();
    staging
      .begin("t1")
      .expect("stage from idle");
    assert_eq!(
      staging.begin("t2"),
      Err(StageError::AlreadyPending(
        "t1".to_string()
      ))
    );
  }

  #[test]
  fn fired_stage_cannot_be_undone() {
    let mut staging =
      DeletionStaging::default();
    staging
      .begin("t1")
      .expect("stage from idle");
    assert_eq!(
      staging.fire().as_deref(),
      Some("t1")
    );
    assert!(!staging.can_undo());
    assert!(!staging.undo());
    assert!(staging.shows_notice());

    assert!(staging.settle(Ok(())));
    assert!(staging.is_committed());
    assert!(!staging.shows_notice());
  }

  #[test]
  fn failed_commit_restores_task_with_message(
  ) {
    let mut staging =
      DeletionStaging::default();
    staging
      .begin("t1")
      .expect("stage from idle");
    staging.fire();
    assert!(staging.settle(Err(
      "gone wrong".to_string()
    )));
    assert!(staging.is_idle());
    assert!(!staging.shows_notice());
    assert_eq!(
      staging.error(),
      Some("gone wrong")
    );

    staging
      .begin("t1")
      .expect("retry after failure");
    assert_eq!(staging.error(), None);
  }

  #[test]
  fn settle_without_commit_is_ignored() {
    let mut staging =
      DeletionStaging::default();
    assert!(!staging.settle(Ok(())));
    staging
      .begin("t1")
      .expect("stage from idle");
    assert!(!staging.settle(Ok(())));
  }
}
