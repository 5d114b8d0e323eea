mod client;
mod error_handler;

pub use client::{ClientKey, client_key};
pub use error_handler::log_errors;
