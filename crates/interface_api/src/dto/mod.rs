//! Data Transfer Objects for API requests and responses

pub mod forms;
pub mod submission;
