use crate::domain::responses::{ServiceResponse, ServiceResponseKind};
use crate::domain::value_objects::{RequestId, ServiceId};
use crate::ports::response_store::{Result, ServiceResponseStore as ServiceResponseStoreTrait};
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory implementation of ServiceResponseStore
///
/// Mirrors the storage-layer uniqueness constraint on `request_status`
/// responses: adding a second status for the same request is an error,
/// exactly as the partial unique index makes it in Postgres.
#[allow(dead_code)]
pub struct ResponseStore {
    responses: Mutex<Vec<ServiceResponse>>,
}

#[allow(dead_code)]
impl ResponseStore {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
        }
    }

    /// Seed a response for testing purposes
    pub fn seed(&self, response: ServiceResponse) {
        self.responses.lock().unwrap().push(response);
    }

    /// All responses for a request, for test assertions
    pub fn snapshot(&self, request_id: RequestId) -> Vec<ServiceResponse> {
        self.responses
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.request_id == request_id)
            .cloned()
            .collect()
    }

    /// Total number of stored responses, for test assertions
    pub fn count_all(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Count responses of a kind for a request, for test assertions
    pub fn count_of_kind(&self, request_id: RequestId, kind: ServiceResponseKind) -> usize {
        self.responses
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.request_id == request_id && r.kind == kind)
            .count()
    }
}

impl Default for ResponseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceResponseStoreTrait for ResponseStore {
    async fn add(&self, response: ServiceResponse) -> Result<()> {
        let mut responses = self.responses.lock().unwrap();

        if response.kind == ServiceResponseKind::RequestStatus
            && responses
                .iter()
                .any(|r| r.request_id == response.request_id && r.kind == response.kind)
        {
            return Err(format!(
                "unique constraint violation: request_status already exists for request {}",
                response.request_id
            )
            .into());
        }

        responses.push(response);
        Ok(())
    }

    async fn update(&self, response: &ServiceResponse) -> Result<()> {
        let mut responses = self.responses.lock().unwrap();
        match responses.iter_mut().find(|r| r.id == response.id) {
            Some(existing) => {
                *existing = response.clone();
                Ok(())
            }
            None => Err(format!("no response with id {:?} to update", response.id).into()),
        }
    }

    async fn list_for_request(&self, request_id: RequestId) -> Result<Vec<ServiceResponse>> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.request_id == request_id)
            .cloned()
            .collect())
    }

    async fn find_request_prompt(
        &self,
        request_id: RequestId,
        service_id: &ServiceId,
    ) -> Result<Option<ServiceResponse>> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                r.request_id == request_id
                    && r.service_id == *service_id
                    && r.kind == ServiceResponseKind::RequestPrompt
            })
            .cloned())
    }

    async fn find_status(&self, request_id: RequestId) -> Result<Option<ServiceResponse>> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                r.request_id == request_id && r.kind == ServiceResponseKind::RequestStatus
            })
            .cloned())
    }
}
