#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tasklet_core::error::GatewayError;
use tasklet_core::gateway::TaskGateway;
use tasklet_shared::{TaskCreate, TaskDto, TaskListQuery};
use tokio::sync::Barrier;

pub const TOKEN: &str = "tok-test";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Option<TaskListQuery>),
    Get(String),
    Create(TaskCreate),
    Update(TaskDto),
    Delete(String),
}

/// In-memory gateway that records every call it receives.
#[derive(Default)]
pub struct RecordingGateway {
    tasks: Mutex<Vec<TaskDto>>,
    calls: Mutex<Vec<Call>>,
    list_delays: Mutex<VecDeque<Duration>>,
    delete_delay: Mutex<Duration>,
    failing_deletes: Mutex<HashSet<String>>,
    fail_updates: Mutex<bool>,
    fail_lists: Mutex<bool>,
    delete_barrier: Mutex<Option<Arc<Barrier>>>,
}

pub fn task(id: &str, name: &str, status: bool) -> TaskDto {
    let mut extra = BTreeMap::new();
    extra.insert("user".to_string(), serde_json::json!("u-1"));
    TaskDto {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("about {name}"),
        status,
        created_at: Some("2026-01-02T03:04:05.000Z".to_string()),
        updated_at: None,
        extra,
    }
}

impl RecordingGateway {
    pub fn with_tasks(tasks: Vec<TaskDto>) -> Arc<Self> {
        let gateway = Self::default();
        *gateway.tasks.lock() = tasks;
        Arc::new(gateway)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Delete(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<TaskDto> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Update(task) => Some(task.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, Call::List(_)))
            .count()
    }

    pub fn stored(&self) -> Vec<TaskDto> {
        self.tasks.lock().clone()
    }

    /// Delays for the next list calls, in order.
    pub fn delay_lists(&self, delays: &[Duration]) {
        self.list_delays.lock().extend(delays.iter().copied());
    }

    pub fn delay_deletes(&self, delay: Duration) {
        *self.delete_delay.lock() = delay;
    }

    pub fn fail_delete_of(&self, id: &str) {
        self.failing_deletes.lock().insert(id.to_string());
    }

    pub fn fail_updates(&self) {
        *self.fail_updates.lock() = true;
    }

    pub fn fail_lists(&self) {
        *self.fail_lists.lock() = true;
    }

    /// Every delete waits on the barrier, so `n` deletes only finish if
    /// they are in flight at the same time.
    pub fn require_concurrent_deletes(&self, n: usize) {
        *self.delete_barrier.lock() = Some(Arc::new(Barrier::new(n)));
    }

    fn check(token: &str) -> Result<(), GatewayError> {
        if token != TOKEN {
            return Err(GatewayError::Unauthenticated);
        }
        Ok(())
    }

    fn server_error() -> GatewayError {
        GatewayError::Status {
            status: 500,
            message: Some("boom".to_string()),
        }
    }
}

impl TaskGateway for RecordingGateway {
    async fn list(
        &self,
        token: &str,
        query: Option<&TaskListQuery>,
    ) -> Result<Vec<TaskDto>, GatewayError> {
        Self::check(token)?;
        self.calls.lock().push(Call::List(query.cloned()));

        let delay = self.list_delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_lists.lock() {
            return Err(Self::server_error());
        }

        let tasks = self.tasks.lock().clone();
        let Some(query) = query else {
            return Ok(tasks);
        };
        let needle = query.search.to_lowercase();
        let skip = (query.page.saturating_sub(1) * query.limit) as usize;
        Ok(tasks
            .into_iter()
            .filter(|task| task.name.to_lowercase().contains(&needle))
            .skip(skip)
            .take(query.limit as usize)
            .collect())
    }

    async fn get(&self, token: &str, id: &str) -> Result<TaskDto, GatewayError> {
        Self::check(token)?;
        self.calls.lock().push(Call::Get(id.to_string()));
        self.tasks
            .lock()
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn create(&self, token: &str, task: &TaskCreate) -> Result<(), GatewayError> {
        Self::check(token)?;
        self.calls.lock().push(Call::Create(task.clone()));
        let mut tasks = self.tasks.lock();
        let id = format!("t{}", tasks.len() + 1);
        tasks.push(TaskDto {
            id,
            name: task.name.clone(),
            description: task.description.clone(),
            status: task.status,
            created_at: None,
            updated_at: None,
            extra: BTreeMap::new(),
        });
        Ok(())
    }

    async fn update(&self, token: &str, task: &TaskDto) -> Result<(), GatewayError> {
        Self::check(token)?;
        self.calls.lock().push(Call::Update(task.clone()));
        if *self.fail_updates.lock() {
            return Err(Self::server_error());
        }
        let mut tasks = self.tasks.lock();
        let slot = tasks
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or(GatewayError::NotFound)?;
        *slot = task.clone();
        Ok(())
    }

    async fn delete(&self, token: &str, id: &str) -> Result<(), GatewayError> {
        Self::check(token)?;
        self.calls.lock().push(Call::Delete(id.to_string()));

        let barrier = self.delete_barrier.lock().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        let delay = *self.delete_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing_deletes.lock().contains(id) {
            return Err(Self::server_error());
        }
        self.tasks.lock().retain(|task| task.id != id);
        Ok(())
    }
}
