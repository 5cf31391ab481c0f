//! Lookup state machine: `Idle -> Loading -> {Success, Failure} -> Idle`.
//!
//! [`LookupController`] owns the [`LookupState`] and is the only place it is
//! mutated. Observers get a read-only view via [`LookupController::subscribe`].

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{error::LookupError, model::WeatherRecord, source::RecordSource};

pub const PLACEHOLDER: &str = "Enter weather ID";
pub const TRIGGER_LABEL: &str = "Get Weather Data";
pub const LOADING_LABEL: &str = "Loading...";

/// State behind the lookup form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupState {
    pub lookup_id: String,
    pub record: Option<WeatherRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

impl LookupState {
    /// The trigger is disabled while loading or when the id is blank.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.lookup_id.trim().is_empty()
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.loading { LOADING_LABEL } else { TRIGGER_LABEL }
    }
}

#[derive(Debug)]
pub struct LookupController {
    source: Arc<dyn RecordSource>,
    state: watch::Sender<LookupState>,
}

impl LookupController {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        let (state, _) = watch::channel(LookupState::default());
        Self { source, state }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LookupState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }

    pub fn set_lookup_id(&self, id: impl Into<String>) {
        let id = id.into();
        self.state.send_modify(|s| s.lookup_id = id);
    }

    pub fn can_submit(&self) -> bool {
        self.state.borrow().can_submit()
    }

    pub fn trigger_label(&self) -> &'static str {
        self.state.borrow().trigger_label()
    }

    /// Fetch the record for the current `lookup_id`.
    ///
    /// Outcomes land in the state rather than the return value. Overlapping
    /// calls are not guarded against; callers must honour [`Self::can_submit`].
    pub async fn lookup(&self) {
        let id = self.state.borrow().lookup_id.clone();

        if id.trim().is_empty() {
            self.state
                .send_modify(|s| s.error = Some(LookupError::InvalidId.user_message()));
            return;
        }

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.record = None;
        });

        debug!(id = %id, "lookup started");
        let outcome = self.source.fetch(&id).await;

        self.state.send_modify(|s| {
            match outcome {
                Ok(record) => s.record = Some(record),
                Err(err) => {
                    warn!(id = %id, error = %err, "lookup failed");
                    s.error = Some(err.user_message());
                }
            }
            s.loading = false;
        });
    }
}
