pub mod classifier;
pub mod error_model;
pub mod patterns;
