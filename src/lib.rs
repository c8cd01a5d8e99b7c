//! # Introduction
//!
//! provetty is a terminal front end for a remote sequent prover.  The user
//! types formulas in TeX notation, the prover answers with a derivation, and
//! each step is typeset and shown as one aligned row.
//!
//! ## Request pipeline
//!
//! ```text
//! Input → ProofRequest → Dispatch (worker thread) → classify → Session → Renderer → TUI
//! ```
//!
//! 1. [`input`]: ordered list of sequent entries with typeset previews.
//! 2. [`protocol`]: JSON request and response shapes, and [`protocol::classify`]
//!    which turns a raw reply into a [`protocol::SessionOutcome`].
//! 3. [`service`]: the [`service::ProofService`] seam and its HTTP
//!    implementation.
//! 4. [`session`]: [`session::ProofSessionController`], which owns the one
//!    active request and ignores replies to superseded ones.
//! 5. [`render`] and [`typeset`]: turn proof steps into rows of typeset
//!    glyphs.
//! 6. [`ui`] and [`batch`]: the interactive page, and a one-shot mode that
//!    prints the derivation to stdout.
//!
//! ## Endpoints
//!
//! `POST /prover` takes `{"oid": 0, "formula": ...}`; `POST /solve` takes a
//! list of `{"oid", "left", "right"}` sequents. Both answer with a list of
//! `{"name", "left", "right", "just"}` steps.

pub mod batch;
pub mod config;
pub mod input;
pub mod logging;
pub mod protocol;
pub mod render;
pub mod service;
pub mod session;
pub mod typeset;
pub mod ui;
