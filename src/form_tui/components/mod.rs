//! Reusable UI components for the questionnaire TUI

pub mod field_row;
pub mod text_input;

pub use field_row::{FieldRow, ROW_HEIGHT};
pub use text_input::{TextInput, TextInputView};
