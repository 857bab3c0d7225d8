use crate::domain::citation::CitationRequest;
use crate::domain::value_objects::RequestId;
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Citation request lookup port.
///
/// The host resolver owns citation requests and their persistence; this
/// subsystem only ever reads them. A request must exist before any of this
/// subsystem's operations run against it.
#[allow(dead_code)]
#[async_trait]
pub trait CitationRequestRepository: Send + Sync {
    /// Look up a citation request by id.
    ///
    /// Returns `None` when no request with that id exists.
    async fn get(&self, request_id: RequestId) -> Result<Option<CitationRequest>>;
}
