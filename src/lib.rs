//! Editable questionnaire forms for the terminal.
//!
//! [`editor::FieldListEditor`] holds the ordered list of questions and applies
//! [`events::FormEvent`]s to it; [`submit`] delivers the list to a sink; and
//! [`form_tui`] is the interactive page around it.

pub mod cli;
pub mod config;
pub mod editor;
pub mod errors;
pub mod events;
pub mod form_tui;
pub mod models;
pub mod submit;

pub use editor::FieldListEditor;
pub use errors::FormError;
pub use events::FormEvent;
pub use models::{derive_name, Field, FieldId};
pub use submit::{LogSink, SubmitFormat, SubmitSink, Submission, WriterSink};
