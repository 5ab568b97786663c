//! Interactive evaluation page: an input field, an output field and a run
//! action gated on runtime readiness.

pub mod app;
pub mod events;
pub mod handler;
pub mod ui;

pub use handler::run_tui;
