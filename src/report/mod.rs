pub mod markdown;
pub mod report_model;
pub mod writer;
