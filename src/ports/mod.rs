#[allow(unused_imports)]
pub mod dispatch_registry;
#[allow(unused_imports)]
pub mod local_availability;
#[allow(unused_imports)]
pub mod patron_auth;
#[allow(unused_imports)]
pub mod request_repository;
#[allow(unused_imports)]
pub mod response_store;
#[allow(unused_imports)]
pub mod vendor_client;

#[allow(unused_imports)]
pub use dispatch_registry::*;
#[allow(unused_imports)]
pub use local_availability::*;
#[allow(unused_imports)]
pub use patron_auth::*;
#[allow(unused_imports)]
pub use request_repository::*;
#[allow(unused_imports)]
pub use response_store::*;
#[allow(unused_imports)]
pub use vendor_client::*;
