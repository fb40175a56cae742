//! API constants

/// Versioned API prefix
pub const API_PREFIX: &str = "/api/v1";

/// Multipart field carrying the uploaded document
pub const UPLOAD_FIELD: &str = "file";

/// Headroom on top of the file size ceiling for multipart framing, so oversize files
/// still reach the validator and get a descriptive 400.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
