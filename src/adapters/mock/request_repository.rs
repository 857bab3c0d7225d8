use crate::domain::citation::CitationRequest;
use crate::domain::value_objects::RequestId;
use crate::ports::request_repository::{
    CitationRequestRepository as CitationRequestRepositoryTrait, Result,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of CitationRequestRepository
///
/// The host resolver owns citation requests; this adapter stands in for its
/// persistence in tests and in standalone wiring.
#[allow(dead_code)]
pub struct RequestRepository {
    requests: Mutex<HashMap<RequestId, CitationRequest>>,
}

#[allow(dead_code)]
impl RequestRepository {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Register a citation request for testing purposes
    pub fn add_request(&self, request: CitationRequest) {
        self.requests.lock().unwrap().insert(request.id, request);
    }
}

impl Default for RequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CitationRequestRepositoryTrait for RequestRepository {
    async fn get(&self, request_id: RequestId) -> Result<Option<CitationRequest>> {
        Ok(self.requests.lock().unwrap().get(&request_id).cloned())
    }
}
