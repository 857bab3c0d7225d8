use crate::domain::value_objects::{Isbn, PickupLocation};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Typed error channel for the vendor operations.
///
/// The vendor wire protocol is out of scope; all this subsystem sees is an
/// opaque remote operation that either succeeds or fails with one of these.
#[derive(Debug, Clone, Error)]
pub enum VendorError {
    /// The HTTP round trip exceeded the configured timeout.
    #[error("vendor call timed out after {0:?}")]
    Timeout(Duration),

    /// Transport or protocol-level failure (connection refused, bad payload).
    #[error("vendor protocol error: {0}")]
    Protocol(String),

    /// The vendor processed the call and refused it.
    ///
    /// `user_message` is set only when the vendor supplied a message safe and
    /// useful to show to the patron (e.g. "your account is blocked"); it is
    /// the only error content that ever reaches the result page.
    #[error("vendor rejected the operation: {reason}")]
    Rejected {
        reason: String,
        user_message: Option<String>,
    },
}

impl VendorError {
    /// The patron-facing message, if this error carries one.
    ///
    /// Errors without one collapse to a generic failure message in the UI.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { user_message, .. } => user_message.as_deref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Outcome of the availability precheck ("find item") operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindItemOutcome {
    pub requestable: bool,
    /// Site codes the patron may choose from; empty when not requestable.
    pub pickup_locations: Vec<String>,
}

/// Confirmation returned by a successful "request item" operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfirmation {
    pub request_number: String,
}

/// Port for the consortial direct-borrowing vendor.
///
/// Both operations are slow (round trips can approach the configured
/// timeout); callers are responsible for applying that timeout and for
/// deciding where the calls may block.
#[allow(dead_code)]
#[async_trait]
pub trait BorrowDirectClient: Send + Sync {
    /// Ask whether this patron could request this item.
    async fn find_item(
        &self,
        patron_barcode: &str,
        library_symbol: &str,
        isbn: &Isbn,
    ) -> Result<FindItemOutcome, VendorError>;

    /// Place the actual borrowing request.
    async fn request_item(
        &self,
        patron_barcode: &str,
        library_symbol: &str,
        pickup_location: &PickupLocation,
        isbn: Option<&Isbn>,
    ) -> Result<RequestConfirmation, VendorError>;
}
