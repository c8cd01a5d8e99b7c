//! Proof session lifecycle
//!
//! [`ProofSessionController`] owns the one active request/response cycle:
//!
//! ```text
//! Idle --prove/solve--> Requesting { generation } --resolve--> Idle
//! ```
//!
//! Every submission takes a fresh [`Generation`]. Requests are never
//! cancelled, so an older request may still resolve after a newer one was
//! issued; [`ProofSessionController::resolve`] drops any resolution whose
//! generation is not the one currently in flight, which keeps the view tied
//! to the most recently issued request no matter in which order replies
//! arrive.

pub mod dispatch;

pub use dispatch::{exchange, Dispatch, Resolution, ThreadDispatcher};

use crate::input::FormulaEntry;
use crate::protocol::{ProofRequest, SessionOutcome};
use crate::render::{DerivationRenderer, DerivationView};
use crate::typeset::Typesetter;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Token identifying one submitted request
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Requesting { generation: Generation },
}

/// Label shown above the derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLabel {
    Idle,
    Pending,
    Solution,
    Partial,
    Failed,
}

impl SessionLabel {
    pub fn title(self) -> &'static str {
        match self {
            SessionLabel::Idle => "Derivation",
            SessionLabel::Pending => "Solving...",
            SessionLabel::Solution => "Solution",
            SessionLabel::Partial => "Partial result",
            SessionLabel::Failed => "No solution",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A message surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// Whether a resolution changed the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Applied,
    /// The resolution belonged to a superseded request and was dropped
    Discarded,
}

pub struct ProofSessionController<D: Dispatch, T: Typesetter> {
    dispatcher: D,
    renderer: DerivationRenderer<T>,
    state: SessionState,
    generation: Generation,
    label: SessionLabel,
    last_outcome: Option<SessionOutcome>,
    notices: Vec<Notice>,
}

impl<D: Dispatch, T: Typesetter> ProofSessionController<D, T> {
    pub fn new(dispatcher: D, typesetter: T) -> Self {
        Self {
            dispatcher,
            renderer: DerivationRenderer::new(typesetter),
            state: SessionState::Idle,
            generation: 0,
            label: SessionLabel::Idle,
            last_outcome: None,
            notices: Vec::new(),
        }
    }

    /// Submit a single formula to `/prover`
    pub fn prove(&mut self, formula: &str) -> Generation {
        self.submit(ProofRequest::prove(formula))
    }

    /// Submit the collected entries to `/solve`
    pub fn solve(&mut self, entries: &[FormulaEntry]) -> Generation {
        self.submit(ProofRequest::solve(entries))
    }

    fn submit(&mut self, request: ProofRequest) -> Generation {
        self.generation += 1;
        let generation = self.generation;

        // The previous derivation goes away before the reply is in
        self.renderer.clear();
        self.label = SessionLabel::Pending;
        self.last_outcome = None;
        self.state = SessionState::Requesting { generation };

        debug!(generation, endpoint = request.endpoint().path(), "dispatching request");
        self.dispatcher.dispatch(generation, request);
        generation
    }

    /// Apply a resolution if it belongs to the request in flight.
    pub fn resolve(&mut self, resolution: Resolution) -> Resolved {
        let Resolution {
            generation,
            outcome,
        } = resolution;

        match self.state {
            SessionState::Requesting { generation: current } if current == generation => {}
            _ => {
                warn!(
                    generation,
                    current = self.generation,
                    outcome = outcome.name(),
                    "discarding stale resolution"
                );
                return Resolved::Discarded;
            }
        }

        self.state = SessionState::Idle;
        info!(generation, outcome = outcome.name(), "request resolved");

        match &outcome {
            SessionOutcome::Success(steps) => {
                let summary = self.renderer.render(steps);
                self.label = SessionLabel::Solution;
                debug!(rows = summary.rows, empty_cells = summary.empty_cells, "derivation rendered");
            }
            SessionOutcome::Partial { steps, info } => {
                let summary = self.renderer.render(steps);
                self.label = SessionLabel::Partial;
                self.notices.push(Notice::error(info.clone()));
                debug!(rows = summary.rows, empty_cells = summary.empty_cells, "partial derivation rendered");
            }
            SessionOutcome::Failure(message) | SessionOutcome::NetworkError(message) => {
                self.renderer.clear();
                self.label = SessionLabel::Failed;
                self.notices.push(Notice::error(message.clone()));
            }
        }

        self.last_outcome = Some(outcome);
        Resolved::Applied
    }

    /// Apply every resolution that has already arrived. Never blocks.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(resolution) = self.dispatcher.next_resolution(None) {
            if self.resolve(resolution) == Resolved::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Block until the request in flight resolves or `timeout` elapses.
    ///
    /// Returns the outcome of the current request, or `None` on timeout.
    pub fn wait(&mut self, timeout: Duration) -> Option<&SessionOutcome> {
        let deadline = Instant::now() + timeout;

        while self.is_requesting() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            match self.dispatcher.next_resolution(Some(remaining)) {
                Some(resolution) => {
                    self.resolve(resolution);
                }
                None => return None,
            }
        }

        self.last_outcome.as_ref()
    }

    /// Clear the derivation view. Safe to call at any time.
    pub fn clear(&mut self) {
        self.renderer.clear();
        if !self.is_requesting() {
            self.label = SessionLabel::Idle;
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self.state, SessionState::Requesting { .. })
    }

    /// Generation of the most recently issued request (0 before any)
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn label(&self) -> SessionLabel {
        self.label
    }

    pub fn view(&self) -> &DerivationView {
        self.renderer.view()
    }

    pub fn renderer(&self) -> &DerivationRenderer<T> {
        &self.renderer
    }

    pub fn last_outcome(&self) -> Option<&SessionOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand over the pending notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }
}
