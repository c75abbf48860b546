//! Utility modules supporting provider calls.
//!
//! - [`HttpClient`]: shared reqwest client with configured timeouts
//! - [`RetryConfig`]: configuration for retry logic with exponential backoff
//! - [`with_retry`]: execute an operation with automatic retry on transient errors
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use answer_engine::providers::ProviderError;
//! use answer_engine::utils::{with_retry, RetryConfig};
//!
//! # async fn fetch_data() -> Result<String, ProviderError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), ProviderError> {
//! let config = RetryConfig::default().max_attempts(3);
//! let result = with_retry(config, || async { fetch_data().await }).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;

pub use http::HttpClient;
pub use retry::{with_retry, RetryConfig};
