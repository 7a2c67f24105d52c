//! Task list view state: the fetched
//! page, the local status filter, the
//! page cursor, and fetch sequencing.
//!
//! The state is runtime free. Drivers
//! call [`TaskListState::begin_fetch`]
//! before issuing a listing request and
//! hand the response back through
//! [`TaskListState::finish_fetch`] with
//! the ticket's id; a response for any
//! id other than the latest issued one
//! is discarded.

use serde::{
  Deserialize,
  Serialize
};
use tracing::debug;

use crate::{
  PAGE_SIZE,
  TaskDto,
  TaskListQuery
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub enum StatusFilter {
  #[default]
  All,
  Active,
  Completed
}

impl StatusFilter {
  pub fn all() -> [Self; 3] {
    [
      Self::All,
      Self::Active,
      Self::Completed
    ]
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::All => "All",
      | Self::Active => "Active",
      | Self::Completed => "Completed"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "all" => Some(Self::All),
      | "active" => Some(Self::Active),
      | "completed" | "done" => {
        Some(Self::Completed)
      }
      | _ => None
    }
  }

  pub fn matches(
    self,
    task: &TaskDto
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Active => !task.status,
      | Self::Completed => task.status
    }
  }
}

/// Prunes an already fetched page,
/// keeping gateway order.
pub fn filter_tasks(
  tasks: &[TaskDto],
  filter: StatusFilter
) -> Vec<&TaskDto> {
  tasks
    .iter()
    .filter(|task| filter.matches(task))
    .collect()
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct RequestId(u64);

impl RequestId {
  pub fn get(self) -> u64 {
    self.0
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
  pub id:    RequestId,
  pub query: TaskListQuery
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum FetchOutcome {
  Applied,
  Stale,
  /// No request was issued because
  /// there are no credentials.
  Skipped
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskListState {
  tasks:     Vec<TaskDto>,
  filter:    StatusFilter,
  search:    String,
  page:      u32,
  page_size: u32,
  latest:    u64,
  loading:   bool,
  error:     Option<String>
}

impl Default for TaskListState {
  fn default() -> Self {
    Self::new(PAGE_SIZE)
  }
}

impl TaskListState {
  pub fn new(page_size: u32) -> Self {
    Self {
      tasks:     vec![],
      filter:    StatusFilter::All,
      search:    String::new(),
      page:      1,
      page_size: page_size.max(1),
      latest:    0,
      loading:   false,
      error:     None
    }
  }

  pub fn query(&self) -> TaskListQuery {
    TaskListQuery {
      search: self.search.clone(),
      page:   self.page,
      limit:  self.page_size
    }
  }

  pub fn begin_fetch(
    &mut self
  ) -> FetchTicket {
    self.latest =
      self.latest.saturating_add(1);
    self.loading = true;
    let ticket = FetchTicket {
      id:    RequestId(self.latest),
      query: self.query()
    };
    debug!(
      request_id = self.latest,
      page = self.page,
      search = %self.search,
      "issued task list fetch"
    );
    ticket
  }

  pub fn is_latest(
    &self,
    id: RequestId
  ) -> bool {
    id.0 == self.latest
  }

  /// On error the previous page stays
  /// on screen next to the message.
  pub fn finish_fetch(
    &mut self,
    id: RequestId,
    result: Result<Vec<TaskDto>, String>
  ) -> FetchOutcome {
    if !self.is_latest(id) {
      debug!(
        request_id = id.0,
        latest = self.latest,
        "discarding stale task list \
         response"
      );
      return FetchOutcome::Stale;
    }

    self.loading = false;
    match result {
      | Ok(tasks) => {
        self.tasks = tasks;
        self.error = None;
      }
      | Err(message) => {
        self.error = Some(message);
      }
    }
    FetchOutcome::Applied
  }

  pub fn set_filter(
    &mut self,
    filter: StatusFilter
  ) {
    self.filter = filter;
  }

  /// Returns `true` when the gateway
  /// must be asked again.
  pub fn set_search(
    &mut self,
    search: &str
  ) -> bool {
    if self.search == search {
      return false;
    }
    self.search = search.to_string();
    true
  }

  pub fn set_page_size(
    &mut self,
    page_size: u32
  ) -> bool {
    let page_size = page_size.max(1);
    if self.page_size == page_size {
      return false;
    }
    self.page_size = page_size;
    true
  }

  pub fn set_page(
    &mut self,
    page: u32
  ) -> bool {
    let page = page.max(1);
    if self.page == page {
      return false;
    }
    self.page = page;
    true
  }

  pub fn next_page(&mut self) -> bool {
    if !self.has_more() {
      return false;
    }
    self.page =
      self.page.saturating_add(1);
    true
  }

  pub fn prev_page(&mut self) -> bool {
    if !self.has_prev() {
      return false;
    }
    self.page -= 1;
    true
  }

  /// Heuristic: a full page suggests
  /// another one exists. Counts the
  /// unfiltered page.
  pub fn has_more(&self) -> bool {
    self.tasks.len()
      == self.page_size as usize
  }

  pub fn has_prev(&self) -> bool {
    self.page > 1
  }

  pub fn visible(&self) -> Vec<&TaskDto> {
    filter_tasks(&self.tasks, self.filter)
  }

  pub fn tasks(&self) -> &[TaskDto] {
    &self.tasks
  }

  pub fn find(
    &self,
    id: &str
  ) -> Option<&TaskDto> {
    self
      .tasks
      .iter()
      .find(|task| task.id == id)
  }

  /// The record to send for a status
  /// toggle, or `None` if the task is
  /// not on the current page.
  pub fn toggle_request(
    &self,
    id: &str
  ) -> Option<TaskDto> {
    self.find(id).map(TaskDto::toggled)
  }

  /// Replaces a task in place after the
  /// gateway accepted an update.
  pub fn apply_update(
    &mut self,
    updated: TaskDto
  ) -> bool {
    match self
      .tasks
      .iter_mut()
      .find(|task| task.id == updated.id)
    {
      | Some(slot) => {
        *slot = updated;
        true
      }
      | None => false
    }
  }

  pub fn filter(&self) -> StatusFilter {
    self.filter
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn page_size(&self) -> u32 {
    self.page_size
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use super::*;

  fn task(
    id: &str,
    status: bool
  ) -> TaskDto {
    TaskDto {
      id: id.to_string(),
      name: format!("task {id}"),
      description: String::new(),
      status,
      created_at: None,
      updated_at: None,
      extra: BTreeMap::new()
    }
  }

  fn page_of(n: usize) -> Vec<TaskDto> {
    (0..n)
      .map(|i| task(&i.to_string(), false))
      .collect()
  }

  fn ids(tasks: &[&TaskDto]) -> Vec<String> {
    tasks
      .iter()
      .map(|task| task.id.clone())
      .collect()
  }

  #[test]
  fn filter_prunes_without_reordering() {
    let page = vec![
      task("a", false),
      task("b", true),
      task("c", false),
    ];

    assert_eq!(
      ids(&filter_tasks(
        &page,
        StatusFilter::Active
      )),
      vec!["a", "c"]
    );
    assert_eq!(
      ids(&filter_tasks(
        &page,
        StatusFilter::Completed
      )),
      vec!["b"]
    );
    assert_eq!(
      ids(&filter_tasks(
        &page,
        StatusFilter::All
      )),
      vec!["a", "b", "c"]
    );
  }

  #[test]
  fn filter_change_does_not_touch_query()
  {
    let mut state =
      TaskListState::default();
    let before = state.query();
    state.set_filter(
      StatusFilter::Completed
    );
    assert_eq!(state.query(), before);
  }

  #[test]
  fn has_more_follows_unfiltered_page_length(
  ) {
    let mut state =
      TaskListState::new(10);
    let ticket = state.begin_fetch();
    state.finish_fetch(
      ticket.id,
      Ok(page_of(7))
    );
    assert!(!state.has_more());
    assert!(!state.next_page());

    let ticket = state.begin_fetch();
    let mut full = page_of(10);
    full[0].status = true;
    state.finish_fetch(
      ticket.id,
      Ok(full)
    );
    state.set_filter(
      StatusFilter::Completed
    );
    assert_eq!(state.visible().len(), 1);
    assert!(state.has_more());
    assert!(state.next_page());
    assert_eq!(state.query().page, 2);
  }

  #[test]
  fn prev_page_stops_at_first_page() {
    let mut state =
      TaskListState::default();
    assert!(!state.has_prev());
    assert!(!state.prev_page());

    let ticket = state.begin_fetch();
    state.finish_fetch(
      ticket.id,
      Ok(page_of(10))
    );
    assert!(state.next_page());
    assert!(state.has_prev());
    assert!(state.prev_page());
    assert_eq!(state.page(), 1);
  }

  #[test]
  fn stale_response_is_discarded() {
    let mut state =
      TaskListState::default();
    let slow = state.begin_fetch();
    state.set_search("milk");
    let fast = state.begin_fetch();
    assert_eq!(fast.query.search, "milk");

    assert_eq!(
      state.finish_fetch(
        fast.id,
        Ok(vec![task("new", false)])
      ),
      FetchOutcome::Applied
    );
    assert!(!state.is_loading());

    assert_eq!(
      state.finish_fetch(
        slow.id,
        Ok(vec![task("old", false)])
      ),
      FetchOutcome::Stale
    );
    assert_eq!(state.tasks()[0].id, "new");
  }

  #[test]
  fn failed_fetch_keeps_previous_page() {
    let mut state =
      TaskListState::default();
    let ticket = state.begin_fetch();
    state.finish_fetch(
      ticket.id,
      Ok(vec![task("a", false)])
    );

    let ticket = state.begin_fetch();
    state.finish_fetch(
      ticket.id,
      Err("boom".to_string())
    );
    assert_eq!(state.tasks().len(), 1);
    assert_eq!(state.error(), Some("boom"));
    assert!(!state.is_loading());
  }

  #[test]
  fn search_change_reports_refetch_need() {
    let mut state =
      TaskListState::default();
    assert!(!state.set_search(""));
    assert!(state.set_search("rent"));
    assert!(!state.set_search("rent"));
  }

  #[test]
  fn toggle_request_flips_only_status() {
    let mut state =
      TaskListState::default();
    let ticket = state.begin_fetch();
    let mut original = task("a", false);
    original.extra.insert(
      "user".to_string(),
      serde_json::json!("u-1")
    );
    state.finish_fetch(
      ticket.id,
      Ok(vec![original.clone()])
    );

    let request = state
      .toggle_request("a")
      .expect("task on page");
    assert!(request.status);
    assert_eq!(
      TaskDto {
        status: false,
        ..request.clone()
      },
      original
    );
    assert!(state.toggle_request("zz").is_none());

    assert!(state.apply_update(request));
    assert!(state.tasks()[0].status);
  }

  #[test]
  fn filter_keys_parse_case_insensitively() {
    assert_eq!(
      StatusFilter::from_key("Active"),
      Some(StatusFilter::Active)
    );
    assert_eq!(
      StatusFilter::from_key(" ALL "),
      Some(StatusFilter::All)
    );
    assert_eq!(
      StatusFilter::from_key("done"),
      Some(StatusFilter::Completed)
    );
    assert_eq!(
      StatusFilter::from_key("later"),
      None
    );
  }
}
