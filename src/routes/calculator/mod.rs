mod handler;
mod model;
mod page;

pub use handler::{calculate, health, index, submit_form, validate_input, view};
