use crate::ports::patron_auth::{AuthError, PatronAuthenticator as PatronAuthenticatorTrait};
use async_trait::async_trait;

/// Fixed-barcode implementation of PatronAuthenticator
///
/// For tests, and for deployments that front the service with their own
/// authentication and resolve the barcode before this subsystem runs.
#[allow(dead_code)]
pub struct StaticPatronAuth {
    barcode: String,
}

#[allow(dead_code)]
impl StaticPatronAuth {
    pub fn new(barcode: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
        }
    }
}

#[async_trait]
impl PatronAuthenticatorTrait for StaticPatronAuth {
    async fn patron_barcode(&self) -> Result<String, AuthError> {
        Ok(self.barcode.clone())
    }
}
