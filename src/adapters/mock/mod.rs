pub mod dispatch_registry;
pub mod patron_auth;
pub mod request_repository;
pub mod response_store;
pub mod vendor_client;

#[allow(unused_imports)]
pub use dispatch_registry::DispatchRegistry;
#[allow(unused_imports)]
pub use patron_auth::StaticPatronAuth;
#[allow(unused_imports)]
pub use request_repository::RequestRepository;
#[allow(unused_imports)]
pub use response_store::ResponseStore;
#[allow(unused_imports)]
pub use vendor_client::{FindItemScript, RequestItemScript, VendorClient};
