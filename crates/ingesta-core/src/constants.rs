//! Ingestion defaults shared by configuration and tests.

/// Folder prefix for stored objects when `BUCKET_FOLDER_NAME` is not set.
pub const DEFAULT_BUCKET_FOLDER: &str = "ingesta";

/// Secret version read when `SECRET_VERSION` is not set.
pub const DEFAULT_SECRET_VERSION: &str = "latest";

/// Upload size ceiling: 5 MiB.
pub const MAX_FILE_SIZE_MB: usize = 5;
pub const MAX_FILE_SIZE_BYTES: usize = MAX_FILE_SIZE_MB * 1024 * 1024;

/// Extensions accepted by the validator (lower-case, no dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Terms whose presence in the OCR text marks an invoice or receipt.
pub const FINANCIAL_KEYWORDS: &[&str] = &["factura", "recibo", "invoice", "receipt"];

/// Storage retry budget: attempts in total, not retries after the first.
pub const UPLOAD_MAX_ATTEMPTS: u32 = 3;
pub const UPLOAD_RETRY_DELAY_SECS: u64 = 2;

/// Consecutive guarded failures before the breaker opens.
pub const BREAKER_FAILURE_THRESHOLD: u32 = 3;

pub const GOOGLE_VISION_ENDPOINT: &str = "https://vision.googleapis.com";
pub const GOOGLE_SECRET_MANAGER_ENDPOINT: &str = "https://secretmanager.googleapis.com";
