use crate::domain::value_objects::{Isbn, PickupLocation};
use crate::ports::vendor_client::{
    BorrowDirectClient as BorrowDirectClientTrait, FindItemOutcome, RequestConfirmation,
    VendorError,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted behavior for the find-item operation
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum FindItemScript {
    Requestable(Vec<String>),
    NotRequestable,
    Fail(VendorError),
}

/// Scripted behavior for the request-item operation
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum RequestItemScript {
    Confirm(String),
    Fail(VendorError),
}

/// Mock implementation of BorrowDirectClient
///
/// Supports stateful testing: behavior is scripted up front, received calls
/// are recorded for assertions, and an optional artificial delay lets tests
/// observe the in-progress window of the background submission.
#[allow(dead_code)]
pub struct VendorClient {
    find_item_script: Mutex<FindItemScript>,
    request_item_script: Mutex<RequestItemScript>,
    delay: Mutex<Option<Duration>>,
    find_item_calls: Mutex<Vec<String>>,
    request_item_calls: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl VendorClient {
    pub fn new() -> Self {
        Self {
            find_item_script: Mutex::new(FindItemScript::NotRequestable),
            request_item_script: Mutex::new(RequestItemScript::Confirm("BD-0000001".to_string())),
            delay: Mutex::new(None),
            find_item_calls: Mutex::new(Vec::new()),
            request_item_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script_find_item(&self, script: FindItemScript) {
        *self.find_item_script.lock().unwrap() = script;
    }

    pub fn script_request_item(&self, script: RequestItemScript) {
        *self.request_item_script.lock().unwrap() = script;
    }

    /// Delay every vendor call, to simulate the slow round trip
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// ISBNs passed to find_item so far
    pub fn find_item_calls(&self) -> Vec<String> {
        self.find_item_calls.lock().unwrap().clone()
    }

    /// (barcode, pickup_location) pairs passed to request_item so far
    pub fn request_item_calls(&self) -> Vec<(String, String)> {
        self.request_item_calls.lock().unwrap().clone()
    }

    async fn apply_delay(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for VendorClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BorrowDirectClientTrait for VendorClient {
    async fn find_item(
        &self,
        _patron_barcode: &str,
        _library_symbol: &str,
        isbn: &Isbn,
    ) -> Result<FindItemOutcome, VendorError> {
        self.find_item_calls
            .lock()
            .unwrap()
            .push(isbn.as_str().to_string());
        self.apply_delay().await;

        let script = self.find_item_script.lock().unwrap().clone();
        match script {
            FindItemScript::Requestable(pickup_locations) => Ok(FindItemOutcome {
                requestable: true,
                pickup_locations,
            }),
            FindItemScript::NotRequestable => Ok(FindItemOutcome {
                requestable: false,
                pickup_locations: Vec::new(),
            }),
            FindItemScript::Fail(error) => Err(error),
        }
    }

    async fn request_item(
        &self,
        patron_barcode: &str,
        _library_symbol: &str,
        pickup_location: &PickupLocation,
        _isbn: Option<&Isbn>,
    ) -> Result<RequestConfirmation, VendorError> {
        self.request_item_calls.lock().unwrap().push((
            patron_barcode.to_string(),
            pickup_location.as_str().to_string(),
        ));
        self.apply_delay().await;

        let script = self.request_item_script.lock().unwrap().clone();
        match script {
            RequestItemScript::Confirm(request_number) => {
                Ok(RequestConfirmation { request_number })
            }
            RequestItemScript::Fail(error) => Err(error),
        }
    }
}
