//! API Handlers

pub mod artists;
pub mod favorites;
pub mod users;
