//! Request handlers

pub mod documents;
pub mod health;
pub mod page;
pub mod submissions;
