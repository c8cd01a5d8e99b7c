//! Data contract with the remote prover
//!
//! The service exposes two JSON endpoints:
//!
//! - `POST /prover` takes one [`RawFormula`] and proves it,
//! - `POST /solve` takes a list of [`RawSequent`]s and solves them together.
//!
//! Both answer with a JSON array of [`ProofStep`]s on success, or with an
//! [`ErrorBody`] on failure. How a reply maps onto a [`SessionOutcome`] is
//! decided by [`classify`].

mod outcome;

pub use outcome::{classify, SessionOutcome, EMPTY_RESPONSE};

use crate::input::FormulaEntry;
use serde::{Deserialize, Serialize};

/// Content type sent with every request
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A single unparsed formula in TeX notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFormula {
    pub oid: usize,
    pub formula: String,
}

/// A single unparsed sequent; both sides are in TeX notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSequent {
    pub oid: usize,
    pub left: String,
    pub right: String,
}

/// One step of a derivation as returned by the service.
///
/// Steps have no identity beyond their position in the returned list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofStep {
    pub name: String,
    pub left: String,
    pub right: String,
    pub just: String,
}

impl ProofStep {
    pub fn new(
        name: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
        just: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            left: left.into(),
            right: right.into(),
            just: just.into(),
        }
    }
}

/// Body of a non-200 reply.
///
/// `result` is only honoured on status 500, where it carries the steps
/// derived before the service gave up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub info: Option<String>,
    pub result: Option<Vec<ProofStep>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Prover,
    Solve,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Prover => "/prover",
            Endpoint::Solve => "/solve",
        }
    }
}

/// A request ready to be sent. Built fresh for every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofRequest {
    Prove(RawFormula),
    Solve(Vec<RawSequent>),
}

impl ProofRequest {
    /// Single-formula request; the formula always has ordinal 0.
    pub fn prove(formula: &str) -> Self {
        ProofRequest::Prove(RawFormula {
            oid: 0,
            formula: formula.to_string(),
        })
    }

    /// Multi-sequent request, one sequent per collected entry, in order.
    pub fn solve(entries: &[FormulaEntry]) -> Self {
        ProofRequest::Solve(
            entries
                .iter()
                .map(|entry| RawSequent {
                    oid: entry.ordinal,
                    left: entry.left.clone(),
                    right: entry.right.clone(),
                })
                .collect(),
        )
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            ProofRequest::Prove(_) => Endpoint::Prover,
            ProofRequest::Solve(_) => Endpoint::Solve,
        }
    }

    /// Serialized request body
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            ProofRequest::Prove(formula) => serde_json::to_vec(formula),
            ProofRequest::Solve(sequents) => serde_json::to_vec(sequents),
        }
    }
}
