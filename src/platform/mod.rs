pub mod detector;
pub mod platform;
