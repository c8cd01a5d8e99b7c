//! Delivery of requests to the prover and of outcomes back to the session

use super::Generation;
use crate::protocol::{classify, ProofRequest, SessionOutcome};
use crate::service::{ProofService, TransportError};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error};

/// An outcome tagged with the generation of the request that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub generation: Generation,
    pub outcome: SessionOutcome,
}

/// Sends requests and hands back their resolutions, in whatever order they
/// complete. There is no cancellation: every dispatched request eventually
/// resolves.
pub trait Dispatch {
    fn dispatch(&mut self, generation: Generation, request: ProofRequest);

    /// Next finished resolution. `None` as `wait` never blocks.
    fn next_resolution(&mut self, wait: Option<Duration>) -> Option<Resolution>;
}

/// Runs each request on its own worker thread.
///
/// Workers only perform the exchange and classify the reply; the outcome is
/// sent back over a channel and applied by the session on its own thread.
pub struct ThreadDispatcher<S: ProofService> {
    service: Arc<S>,
    sender: Sender<Resolution>,
    receiver: Receiver<Resolution>,
}

impl<S: ProofService> ThreadDispatcher<S> {
    pub fn new(service: S) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            service: Arc::new(service),
            sender,
            receiver,
        }
    }
}

impl<S: ProofService> Dispatch for ThreadDispatcher<S> {
    fn dispatch(&mut self, generation: Generation, request: ProofRequest) {
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();

        let spawned = thread::Builder::new()
            .name(format!("proof-request-{}", generation))
            .spawn(move || {
                let outcome = exchange(service.as_ref(), &request);
                debug!(generation, outcome = outcome.name(), "request finished");
                // The receiver lives as long as the session; a send error
                // only means the session is gone.
                let _ = sender.send(Resolution {
                    generation,
                    outcome,
                });
            });

        if let Err(e) = spawned {
            error!(generation, error = %e, "could not spawn request worker");
            let _ = self.sender.send(Resolution {
                generation,
                outcome: SessionOutcome::NetworkError(TransportError::Spawn(e.to_string()).to_string()),
            });
        }
    }

    fn next_resolution(&mut self, wait: Option<Duration>) -> Option<Resolution> {
        match wait {
            None => self.receiver.try_recv().ok(),
            Some(timeout) => match self.receiver.recv_timeout(timeout) {
                Ok(resolution) => Some(resolution),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
            },
        }
    }
}

/// Perform one request and classify whatever comes back
pub fn exchange<S: ProofService + ?Sized>(service: &S, request: &ProofRequest) -> SessionOutcome {
    match service.submit(request) {
        Ok(reply) => classify(reply.status, &reply.body),
        Err(e) => SessionOutcome::NetworkError(e.to_string()),
    }
}
