//! Questionnaire Terminal User Interface (TUI)
//!
//! Hosts the field list editor on a single full-screen page: a title, one
//! row per question, the submit and add controls, and a status bar.

pub mod app;
pub mod components;
pub mod focus;
pub mod ui;

pub use app::App;
pub use focus::{Control, Focus};
