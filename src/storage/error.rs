use thiserror::Error;

/// ストレージエラー
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Stripe not found: object {object_id}, stripe {stripe_index}")]
    StripeNotFound { object_id: u64, stripe_index: u64 },

    #[error("Invalid target index: {0}")]
    InvalidTarget(usize),
}

pub type StorageResult<T> = Result<T, StorageError>;
