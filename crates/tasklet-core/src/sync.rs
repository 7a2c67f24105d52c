//! Drives a [`TaskListState`] against a [`TaskGateway`].
//!
//! Search, page and page size changes re-fetch; a filter change only
//! prunes the page already on hand. Fetches may overlap: each one takes a
//! request id and only the latest one is allowed to write the list.

use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::Mutex;
use tasklet_shared::view::{FetchOutcome, StatusFilter, TaskListState};
use tasklet_shared::{FETCH_TASK_FAILED, TaskDto};
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::gateway::TaskGateway;

/// Result of a "remove completed" run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkRemoval {
    pub requested: usize,
    pub failed: usize,
}

impl BulkRemoval {
    pub fn removed(&self) -> usize {
        self.requested - self.failed
    }
}

pub struct TaskViewSync<G> {
    gateway: Arc<G>,
    token: Option<String>,
    state: Arc<Mutex<TaskListState>>,
}

impl<G> Clone for TaskViewSync<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            token: self.token.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<G: TaskGateway> TaskViewSync<G> {
    pub fn new(gateway: Arc<G>, token: Option<&str>) -> Self {
        Self::with_state(gateway, token, TaskListState::default())
    }

    pub fn with_state(gateway: Arc<G>, token: Option<&str>, state: TaskListState) -> Self {
        Self {
            gateway,
            token: token
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn snapshot(&self) -> TaskListState {
        self.state.lock().clone()
    }

    /// Runs `f` against the state without fetching.
    pub fn inspect<R>(&self, f: impl FnOnce(&TaskListState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Fetches the current page. Without a token nothing is sent and the
    /// view stays idle.
    pub async fn refresh(&self) -> Result<FetchOutcome, GatewayError> {
        let Some(token) = self.token.as_deref() else {
            debug!("no session token; skipping task list fetch");
            return Ok(FetchOutcome::Skipped);
        };

        let ticket = self.state.lock().begin_fetch();
        let result = self.gateway.list(token, Some(&ticket.query)).await;

        let mut state = self.state.lock();
        match result {
            Ok(tasks) => Ok(state.finish_fetch(ticket.id, Ok(tasks))),
            Err(err) => {
                warn!(request_id = ticket.id.get(), error = %err, "task list fetch failed");
                match state.finish_fetch(ticket.id, Err(FETCH_TASK_FAILED.to_string())) {
                    FetchOutcome::Applied => Err(err),
                    outcome => Ok(outcome),
                }
            }
        }
    }

    pub fn set_filter(&self, filter: StatusFilter) {
        debug!(filter = filter.label(), "status filter changed");
        self.state.lock().set_filter(filter);
    }

    /// `search` is the already debounced text. Returns `None` when it did
    /// not change and nothing was fetched.
    pub async fn set_search(&self, search: &str) -> Result<Option<FetchOutcome>, GatewayError> {
        let changed = self.state.lock().set_search(search);
        self.refresh_if(changed).await
    }

    pub async fn set_page_size(
        &self,
        page_size: u32,
    ) -> Result<Option<FetchOutcome>, GatewayError> {
        let changed = self.state.lock().set_page_size(page_size);
        self.refresh_if(changed).await
    }

    pub async fn next_page(&self) -> Result<Option<FetchOutcome>, GatewayError> {
        let moved = self.state.lock().next_page();
        self.refresh_if(moved).await
    }

    pub async fn prev_page(&self) -> Result<Option<FetchOutcome>, GatewayError> {
        let moved = self.state.lock().prev_page();
        self.refresh_if(moved).await
    }

    /// Flips a task on the current page. The list is only changed once the
    /// gateway accepted the update.
    #[tracing::instrument(skip(self))]
    pub async fn toggle(&self, id: &str) -> Result<TaskDto, GatewayError> {
        let token = self.token()?;
        let request = self
            .state
            .lock()
            .toggle_request(id)
            .ok_or(GatewayError::NotFound)?;

        self.gateway.update(token, &request).await?;

        self.state.lock().apply_update(request.clone());
        debug!(status = request.status, "task status toggled");
        Ok(request)
    }

    /// Deletes every completed task, not just those on the current page,
    /// then re-fetches the page.
    #[tracing::instrument(skip(self))]
    pub async fn remove_completed(&self) -> Result<BulkRemoval, GatewayError> {
        let token = self.token()?;
        let all = self.gateway.list(token, None).await?;
        let completed: Vec<&TaskDto> = all.iter().filter(|task| task.status).collect();

        let results = join_all(
            completed
                .iter()
                .map(|task| self.gateway.delete(token, &task.id)),
        )
        .await;

        let mut summary = BulkRemoval {
            requested: completed.len(),
            failed: 0,
        };
        for (task, result) in completed.iter().zip(results) {
            if let Err(err) = result {
                summary.failed += 1;
                warn!(id = %task.id, error = %err, "failed to remove completed task");
            }
        }
        info!(
            requested = summary.requested,
            failed = summary.failed,
            "removed completed tasks"
        );

        if let Err(err) = self.refresh().await {
            warn!(error = %err, "re-fetch after removing completed tasks failed");
        }
        Ok(summary)
    }

    async fn refresh_if(&self, needed: bool) -> Result<Option<FetchOutcome>, GatewayError> {
        if !needed {
            return Ok(None);
        }
        self.refresh().await.map(Some)
    }

    fn token(&self) -> Result<&str, GatewayError> {
        self.token.as_deref().ok_or(GatewayError::Unauthenticated)
    }
}
