// APIモジュール
pub mod file_ops;
pub mod types;

pub use file_ops::StripeFs;
pub use types::{ApiError, ApiResult};
