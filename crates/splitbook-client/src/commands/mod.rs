pub mod common;
pub mod records;
pub mod report;
pub mod submit;
