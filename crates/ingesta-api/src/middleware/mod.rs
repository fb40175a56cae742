pub mod recovery;
pub mod security_headers;

pub use recovery::handle_panic;
pub use security_headers::{security_headers_middleware, SecurityHeadersConfig};
