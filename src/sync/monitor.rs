use log::debug;
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use super::remote::RemoteStore;

/// Reachability of the remote store as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "checking"),
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

type Listener = Arc<dyn Fn(ConnectionStatus) + Send + Sync>;

struct MonitorState {
    status: ConnectionStatus,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
    /// Cleared by `stop`; nothing is broadcast while false.
    active: bool,
}

fn lock(state: &Mutex<MonitorState>) -> MutexGuard<'_, MonitorState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle returned by [`ConnectionMonitor::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    id: u64,
    state: Weak<Mutex<MonitorState>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(state) = self.state.upgrade() {
            lock(&state).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Periodically probes `GET /health` and tells subscribers about changes.
pub struct ConnectionMonitor {
    remote: Arc<dyn RemoteStore>,
    interval: Duration,
    timeout: Duration,
    state: Arc<Mutex<MonitorState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionMonitor {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(remote: Arc<dyn RemoteStore>, interval: Duration, timeout: Duration) -> Self {
        Self {
            remote,
            interval,
            timeout,
            state: Arc::new(Mutex::new(MonitorState {
                status: ConnectionStatus::Checking,
                listeners: Vec::new(),
                next_id: 0,
                active: true,
            })),
            task: Mutex::new(None),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        lock(&self.state).status
    }

    /// Register a listener. It is called right away with the current status,
    /// then on every change until unsubscribed or the monitor stops.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ConnectionStatus) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let (id, current) = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, listener.clone()));
            (id, state.status)
        };
        listener(current);
        Subscription { id, state: Arc::downgrade(&self.state) }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.state).listeners.len()
    }

    /// Probe now and then on every interval. Calling it while already running
    /// does nothing.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        lock(&self.state).active = true;

        let remote = self.remote.clone();
        let state = self.state.clone();
        let interval = self.interval;
        let timeout = self.timeout;
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                run_probe(remote.as_ref(), timeout, &state).await;
            }
        }));
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the timer. No listener call starts after this returns; on a
    /// multi-thread runtime a call already under way on another worker may
    /// still be finishing.
    pub fn stop(&self) {
        lock(&self.state).active = false;
        let handle = self
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Run a single probe outside the timer.
    pub async fn check_now(&self) -> ConnectionStatus {
        run_probe(self.remote.as_ref(), self.timeout, &self.state).await
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_probe(
    remote: &dyn RemoteStore,
    timeout: Duration,
    state: &Mutex<MonitorState>,
) -> ConnectionStatus {
    set_status(state, ConnectionStatus::Checking);
    let status = match tokio::time::timeout(timeout, remote.health()).await {
        Ok(Ok(_)) => ConnectionStatus::Connected,
        Ok(Err(e)) => {
            debug!("Health check failed: {}", e);
            ConnectionStatus::Disconnected
        }
        Err(_) => {
            debug!("Health check timed out after {:?}", timeout);
            ConnectionStatus::Disconnected
        }
    };
    set_status(state, status);
    status
}

/// Record `status` and, while active, tell listeners about a change.
/// `active` is rechecked before each call so a listener that stops the
/// monitor silences the rest of the broadcast.
fn set_status(state: &Mutex<MonitorState>, status: ConnectionStatus) {
    let listeners: Vec<Listener> = {
        let mut state = lock(state);
        if state.status == status {
            return;
        }
        state.status = status;
        if !state.active {
            return;
        }
        state.listeners.iter().map(|(_, l)| l.clone()).collect()
    };
    for listener in listeners {
        if !lock(state).active {
            break;
        }
        listener(status);
    }
}
