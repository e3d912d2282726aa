//! User-interaction events that drive the field list editor

use std::fmt;
use std::str::FromStr;

use crate::errors::FormError;

/// A discrete interaction with the form, applied in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// The question text of the field at `index` was edited
    LabelEdited { index: usize, label: String },
    /// The answer of the field at `index` was edited
    ValueEdited { index: usize, value: String },
    /// The add control was activated
    AddClicked,
    /// The delete control of the field at `index` was activated
    DeleteClicked { index: usize },
    /// The submit control was activated
    SubmitClicked,
}

impl FormEvent {
    /// Position targeted by the event, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            FormEvent::LabelEdited { index, .. }
            | FormEvent::ValueEdited { index, .. }
            | FormEvent::DeleteClicked { index } => Some(*index),
            FormEvent::AddClicked | FormEvent::SubmitClicked => None,
        }
    }
}

/// Text form: `add`, `delete:N`, `label:N:TEXT`, `value:N:TEXT`, `submit`.
///
/// TEXT is everything after the second colon and may itself contain colons.
impl FromStr for FormEvent {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormError::InvalidEvent(s.to_string());
        let mut parts = s.splitn(3, ':');
        let kind = parts.next().unwrap_or_default().trim().to_lowercase();
        let index = parts.next();
        let text = parts.next();

        let parse_index = |raw: Option<&str>| -> Result<usize, FormError> {
            raw.and_then(|i| i.trim().parse().ok()).ok_or_else(invalid)
        };

        match kind.as_str() {
            "add" if index.is_none() => Ok(FormEvent::AddClicked),
            "submit" if index.is_none() => Ok(FormEvent::SubmitClicked),
            "delete" if text.is_none() => Ok(FormEvent::DeleteClicked {
                index: parse_index(index)?,
            }),
            "label" => Ok(FormEvent::LabelEdited {
                index: parse_index(index)?,
                label: text.ok_or_else(invalid)?.to_string(),
            }),
            "value" => Ok(FormEvent::ValueEdited {
                index: parse_index(index)?,
                value: text.ok_or_else(invalid)?.to_string(),
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for FormEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormEvent::LabelEdited { index, label } => write!(f, "label:{}:{}", index, label),
            FormEvent::ValueEdited { index, value } => write!(f, "value:{}:{}", index, value),
            FormEvent::AddClicked => write!(f, "add"),
            FormEvent::DeleteClicked { index } => write!(f, "delete:{}", index),
            FormEvent::SubmitClicked => write!(f, "submit"),
        }
    }
}
