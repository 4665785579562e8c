//! Delivery transport errors.
//!
//! These never leave a dispatch run; they only drive the retry loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}
