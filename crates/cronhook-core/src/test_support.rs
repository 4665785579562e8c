//! Hand-written collaborators for registry and dispatcher tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::time::Instant;

use cronhook_protocols::{
    Event, EventQuery, EventStore, StoreError, TimerEngine, TimerEntry, TimerError, TimerJob,
    Transport, TransportError,
};

struct ManualEntryState {
    expression: String,
    job: TimerJob,
    active: AtomicBool,
    fires: AtomicU64,
}

struct ManualEntry(Arc<ManualEntryState>);

impl TimerEntry for ManualEntry {
    fn expression(&self) -> &str {
        &self.0.expression
    }

    fn stop(&self) {
        self.0.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.0.active.load(Ordering::SeqCst)
    }

    fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn fire_count(&self) -> u64 {
        self.0.fires.load(Ordering::SeqCst)
    }
}

/// Timer engine that only ticks when a test tells it to.
///
/// Accepts any expression with six whitespace-separated fields.
pub(crate) struct ManualTimerEngine {
    started: AtomicBool,
    entries: Mutex<Vec<Arc<ManualEntryState>>>,
}

impl ManualTimerEngine {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            started: AtomicBool::new(false),
            entries: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Tick every active entry registered for `expression` and wait for the jobs.
    pub(crate) async fn fire(&self, expression: &str) -> usize {
        let jobs: Vec<TimerJob> = self
            .entries
            .lock()
            .iter()
            .filter(|e| e.expression == expression && e.active.load(Ordering::SeqCst))
            .map(|e| {
                e.fires.fetch_add(1, Ordering::SeqCst);
                e.job.clone()
            })
            .collect();

        let count = jobs.len();
        for job in jobs {
            job().await;
        }
        count
    }

    /// Jobs for `expression`, stopped or not. Lets a test replay a tick that
    /// was already in flight when its entry was stopped.
    pub(crate) fn jobs_for(&self, expression: &str) -> Vec<TimerJob> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.expression == expression)
            .map(|e| e.job.clone())
            .collect()
    }

    pub(crate) fn active_entries(&self) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.active.load(Ordering::SeqCst))
            .count()
    }

    pub(crate) fn total_entries(&self) -> usize {
        self.entries.lock().len()
    }
}

impl TimerEngine for ManualTimerEngine {
    fn start(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    fn add_job(&self, expression: &str, job: TimerJob) -> Result<Box<dyn TimerEntry>, TimerError> {
        let fields = expression.split_whitespace().count();
        if fields != 6 {
            return Err(TimerError::InvalidExpression {
                expression: expression.to_string(),
                reason: format!("expected 6 fields, got {}", fields),
            });
        }

        let state = Arc::new(ManualEntryState {
            expression: expression.to_string(),
            job,
            active: AtomicBool::new(true),
            fires: AtomicU64::new(0),
        });
        self.entries.lock().push(state.clone());
        Ok(Box::new(ManualEntry(state)))
    }
}

/// Transport that fails a fixed number of times before succeeding.
pub(crate) struct ScriptedTransport {
    failures: u64,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedTransport {
    pub(crate) fn succeeding() -> Arc<Self> {
        Self::failing_first(0)
    }

    pub(crate) fn always_failing() -> Arc<Self> {
        Self::failing_first(u64::MAX)
    }

    pub(crate) fn failing_first(failures: u64) -> Arc<Self> {
        Arc::new(Self {
            failures,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn attempts(&self) -> usize {
        self.calls.lock().len()
    }

    pub(crate) fn attempts_for(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|(u, _)| u == url).count()
    }

    pub(crate) fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<(), TransportError> {
        let attempt = {
            let mut calls = self.calls.lock();
            calls.push((url.to_string(), Instant::now()));
            calls.len() as u64
        };

        if attempt <= self.failures {
            Err(TransportError::RequestFailed(format!("scripted failure #{}", attempt)))
        } else {
            Ok(())
        }
    }
}

/// Event store returning a fixed list, or failing every query.
pub(crate) struct StaticStore {
    events: Option<Vec<Event>>,
}

impl StaticStore {
    pub(crate) fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: Some(events),
        }
    }

    pub(crate) fn unavailable() -> Self {
        Self { events: None }
    }
}

#[async_trait]
impl EventStore for StaticStore {
    async fn find_events(&self, query: &EventQuery) -> Result<Vec<Event>, StoreError> {
        match self.events {
            Some(ref events) => Ok(events.iter().filter(|e| query.matches(e)).cloned().collect()),
            None => Err(StoreError::Unavailable("database is down".to_string())),
        }
    }
}
