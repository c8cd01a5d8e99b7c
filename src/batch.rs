//! Headless proving: submit once, print the derivation, exit

use crate::input::{preview_into, FormulaInputManager, Preview, Side};
use crate::protocol::SessionOutcome;
use crate::service::ProofService;
use crate::session::{ProofSessionController, ThreadDispatcher};
use crate::typeset::{Node, TexTypesetter};
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("no reply from the prover within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// What to submit
#[derive(Debug, Clone)]
pub enum Job {
    Prove(String),
    /// Sequents as `(left, right)` pairs
    Solve(Vec<(String, String)>),
}

impl Job {
    /// Pair up a flat `left right left right ...` list
    pub fn solve_from_flat(sides: &[String]) -> Self {
        Job::Solve(
            sides
                .chunks(2)
                .map(|pair| {
                    let left = pair.first().cloned().unwrap_or_default();
                    let right = pair.get(1).cloned().unwrap_or_default();
                    (left, right)
                })
                .collect(),
        )
    }
}

/// Run one job against `service` and print the result to `out`.
///
/// Returns whether the prover produced a complete derivation.
pub fn run<S: ProofService, W: Write>(
    service: S,
    job: &Job,
    timeout: Duration,
    out: &mut W,
) -> Result<bool, BatchError> {
    let mut session = ProofSessionController::new(ThreadDispatcher::new(service), TexTypesetter);

    match job {
        Job::Prove(formula) => {
            let mut preview = Node::new();
            if !preview_into(&TexTypesetter, formula, &mut preview) {
                warn!("formula does not typeset; submitting it anyway");
            }
            session.prove(formula);
        }
        Job::Solve(sequents) => {
            let mut inputs = FormulaInputManager::new();
            for (left, right) in sequents {
                let id = inputs.add_entry();
                inputs.set_text(id, Side::Left, left.as_str());
                inputs.set_text(id, Side::Right, right.as_str());
                if let Preview::Rejected(_) = inputs.preview_entry(id, &TexTypesetter) {
                    warn!(%id, "sequent does not typeset; submitting it anyway");
                }
            }
            session.solve(&inputs.collect());
        }
    }

    let complete = match session.wait(timeout) {
        Some(SessionOutcome::Success(_)) => true,
        Some(_) => false,
        None => return Err(BatchError::Timeout(timeout)),
    };

    writeln!(out, "{}", session.label().title())?;
    for row in session.view().rows() {
        writeln!(out, "{}", row)?;
    }
    let prefix = session.last_outcome().map_or("", SessionOutcome::notice_prefix);
    for notice in session.take_notices() {
        writeln!(out, "{}{}", prefix, notice.text)?;
    }

    Ok(complete)
}
