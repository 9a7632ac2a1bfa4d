// ストライピングエンジンモジュール
pub mod engine;
pub mod placement;
pub mod striper;

pub use engine::StripingEngine;
pub use placement::{placement_of, target_for_stripe, TargetPlacement};
pub use striper::{StripeInfo, Striper, StripingError, StripingResult};
