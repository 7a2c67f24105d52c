use std::sync::Arc;
use std::time::Duration;

use tasklet_shared::staging::DeletionStaging;
use tasklet_shared::{DELETE_TASK_FAILED, UNDO_DELETE_MS};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::gateway::TaskGateway;
use crate::timer::{self, TimerHandle};

/// Runs the undoable delete of one detail view.
///
/// [`DeletionStager::stage`] starts the undo window; when it elapses the
/// delete request is sent on its own task so that dropping the stager
/// afterwards never cuts a request short. Dropping the stager while the
/// window is still open cancels the deletion.
pub struct DeletionStager<G> {
    gateway: Arc<G>,
    token: Option<String>,
    window: Duration,
    state: Arc<watch::Sender<DeletionStaging>>,
    timer: Option<TimerHandle>,
}

impl<G> DeletionStager<G>
where
    G: TaskGateway + 'static,
{
    pub fn new(gateway: Arc<G>, token: Option<&str>) -> Self {
        let (tx, _rx) = watch::channel(DeletionStaging::default());
        Self {
            gateway,
            token: token.map(str::to_string),
            window: Duration::from_millis(UNDO_DELETE_MS),
            state: Arc::new(tx),
            timer: None,
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn current(&self) -> DeletionStaging {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DeletionStaging> {
        self.state.subscribe()
    }

    /// Must be called from within a tokio runtime.
    #[tracing::instrument(skip(self))]
    pub fn stage(&mut self, task_id: &str) -> Result<(), GatewayError> {
        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(GatewayError::Unauthenticated)?
            .to_string();

        let mut rejected = None;
        self.state.send_if_modified(|staging| match staging.begin(task_id) {
            Ok(()) => true,
            Err(err) => {
                rejected = Some(err);
                false
            }
        });
        if let Some(err) = rejected {
            return Err(err.into());
        }

        let state = Arc::clone(&self.state);
        let gateway = Arc::clone(&self.gateway);
        self.timer = Some(timer::schedule(self.window, move || {
            commit(state, gateway, token);
        }));
        info!(window_ms = self.window.as_millis() as u64, "deletion staged");
        Ok(())
    }

    /// Returns `false` once the undo window has closed.
    pub fn undo(&mut self) -> bool {
        let undone = self.state.send_if_modified(DeletionStaging::undo);
        if undone {
            if let Some(timer) = self.timer.take() {
                timer.cancel();
            }
            info!("staged deletion undone");
        }
        undone
    }

    /// Ends the view. A deletion still inside its window is cancelled; one
    /// already sent is awaited so the request is never cut short.
    pub async fn close(mut self) -> DeletionStaging {
        if self.undo() {
            debug!("view closed; staged deletion cancelled");
            return self.current();
        }
        self.settled().await
    }

    /// Waits until nothing is staged or in flight and returns the state.
    pub async fn settled(&self) -> DeletionStaging {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|staging| !staging.shows_notice()).await {
            Ok(staging) => staging.clone(),
            Err(_) => self.current(),
        }
    }
}

impl<G> Drop for DeletionStager<G> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take()
            && timer.is_pending()
        {
            debug!("view torn down; cancelling staged deletion");
            timer.cancel();
        }
    }
}

fn commit<G>(state: Arc<watch::Sender<DeletionStaging>>, gateway: Arc<G>, token: String)
where
    G: TaskGateway + 'static,
{
    let mut fired = None;
    state.send_if_modified(|staging| {
        fired = staging.fire();
        fired.is_some()
    });
    let Some(task_id) = fired else {
        return;
    };

    info!(%task_id, "undo window closed; deleting task");
    tokio::spawn(async move {
        let result = gateway
            .delete(&token, &task_id)
            .await
            .map_err(|err| {
                warn!(%task_id, error = %err, "staged deletion failed");
                DELETE_TASK_FAILED.to_string()
            });
        state.send_modify(|staging| {
            staging.settle(result);
        });
    });
}
