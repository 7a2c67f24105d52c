use crate::TaskDto;

#[derive(
  Debug, Clone, Copy, Default, PartialEq,
)]
pub struct TaskStats {
  pub total:             usize,
  pub completed:         usize,
  pub active:            usize,
  pub completed_percent: f64,
  pub active_percent:    f64
}

impl TaskStats {
  /// With no tasks the completed share
  /// is 0% and the active share 100%.
  pub fn from_tasks(
    tasks: &[TaskDto]
  ) -> Self {
    let total = tasks.len();
    let completed = tasks
      .iter()
      .filter(|task| task.status)
      .count();
    let active = total - completed;

    let completed_percent = if total == 0
    {
      0.0
    } else {
      completed as f64 / total as f64
        * 100.0
    };

    Self {
      total,
      completed,
      active,
      completed_percent,
      active_percent: 100.0
        - completed_percent
    }
  }

  pub fn completed_label(
    &self
  ) -> String {
    format!(
      "{} ({:.2}%)",
      self.completed,
      self.completed_percent
    )
  }

  pub fn active_label(&self) -> String {
    format!(
      "{} ({:.2}%)",
      self.active, self.active_percent
    )
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use super::*;

  fn tasks(statuses: &[bool]) -> Vec<TaskDto> {
    statuses
      .iter()
      .enumerate()
      .map(|(i, status)| TaskDto {
        id: i.to_string(),
        name: format!("t{i}"),
        description: String::new(),
        status: *status,
        created_at: None,
        updated_at: None,
        extra: BTreeMap::new()
      })
      .collect()
  }

  #[test]
  fn percentages_use_two_decimals() {
    let stats = TaskStats::from_tasks(
      &tasks(&[true, false, false])
    );
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.active, 2);
    assert_eq!(
      stats.completed_label(),
      "1 (33.33%)"
    );
    assert_eq!(
      stats.active_label(),
      "2 (66.67%)"
    );
  }

  #[test]
  fn empty_list_is_all_active() {
    let stats =
      TaskStats::from_tasks(&[]);
    assert_eq!(stats.total, 0);
    assert_eq!(
      stats.completed_label(),
      "0 (0.00%)"
    );
    assert_eq!(
      stats.active_label(),
      "0 (100.00%)"
    );
  }
}
