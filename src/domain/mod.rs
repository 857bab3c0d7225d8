pub mod citation;
pub mod dispatch;
pub mod responses;
pub mod search_url;
pub mod value_objects;
pub mod whitelist;

pub use citation::*;
pub use dispatch::*;
pub use responses::*;
pub use value_objects::*;
pub use whitelist::UrlWhitelist;
