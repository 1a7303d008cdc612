//! HTTP Route Handlers

pub mod models;
pub mod predictions;
pub mod quotes;
