use crate::domain::dispatch::DispatchStatus;
use crate::domain::value_objects::{RequestId, ServiceId};
use crate::ports::dispatch_registry::{DispatchRegistry as DispatchRegistryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of DispatchRegistry
///
/// Records the latest transition per (request, service) so tests can assert
/// on the dispatch marker the way the host framework would read it.
#[allow(dead_code)]
pub struct DispatchRegistry {
    records: Mutex<HashMap<(RequestId, String), (DispatchStatus, Option<String>)>>,
}

#[allow(dead_code)]
impl DispatchRegistry {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Latest dispatch status for (request, service), for test assertions
    pub fn status_of(
        &self,
        request_id: RequestId,
        service_id: &ServiceId,
    ) -> Option<DispatchStatus> {
        self.records
            .lock()
            .unwrap()
            .get(&(request_id, service_id.as_str().to_string()))
            .map(|(status, _)| *status)
    }

    /// Error text recorded with the latest transition, if any
    pub fn error_of(&self, request_id: RequestId, service_id: &ServiceId) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(&(request_id, service_id.as_str().to_string()))
            .and_then(|(_, error)| error.clone())
    }
}

impl Default for DispatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DispatchRegistryTrait for DispatchRegistry {
    async fn mark(
        &self,
        request_id: RequestId,
        service_id: &ServiceId,
        status: DispatchStatus,
        error: Option<String>,
    ) -> Result<()> {
        self.records
            .lock()
            .unwrap()
            .insert(
                (request_id, service_id.as_str().to_string()),
                (status, error),
            );
        Ok(())
    }
}
