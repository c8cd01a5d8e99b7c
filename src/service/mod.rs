//! Transport to the remote prover

use crate::protocol::{ProofRequest, CONTENT_TYPE};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE as CONTENT_TYPE_HEADER;
use std::io::Read;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Largest reply body read from the service (1 MiB)
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("could not read response body: {0}")]
    Body(#[from] std::io::Error),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: u64 },

    #[error("could not start request worker: {0}")]
    Spawn(String),
}

/// Raw reply: status and body, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Something that can carry a [`ProofRequest`] to the prover.
pub trait ProofService: Send + Sync + 'static {
    fn submit(&self, request: &ProofRequest) -> Result<ServiceReply, TransportError>;
}

/// [`ProofService`] speaking HTTP to a prover at `base_url`
#[derive(Debug, Clone)]
pub struct HttpProofService {
    client: Client,
    base_url: String,
}

impl HttpProofService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ProofService for HttpProofService {
    fn submit(&self, request: &ProofRequest) -> Result<ServiceReply, TransportError> {
        let url = format!("{}{}", self.base_url, request.endpoint().path());
        let body = request.to_json()?;
        debug!(%url, bytes = body.len(), "posting request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE)
            .body(body)
            .send()?;

        let status = response.status().as_u16();
        let mut body = Vec::new();
        response.take(MAX_BODY_BYTES + 1).read_to_end(&mut body)?;
        if body.len() as u64 > MAX_BODY_BYTES {
            return Err(TransportError::BodyTooLarge {
                limit: MAX_BODY_BYTES,
            });
        }

        debug!(status, bytes = body.len(), "reply received");
        Ok(ServiceReply { status, body })
    }
}
