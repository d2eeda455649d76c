//! Filter implementations for the candidate pipeline.

pub mod gender_neutral;
pub mod minimum_chance;
pub mod non_pwd;

// Re-export for convenience
pub use gender_neutral::GenderNeutralFilter;
pub use minimum_chance::MinimumChanceFilter;
pub use non_pwd::NonPwdFilter;
