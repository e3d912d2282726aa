//! Keyboard focus over the form's controls
//!
//! Focus follows a field by its id, not its position, so deleting another
//! field never moves focus to a different question.

use crate::models::{Field, FieldId};

/// Control within a field row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Label,
    Value,
    Delete,
}

impl Control {
    pub fn is_text_input(&self) -> bool {
        matches!(self, Control::Label | Control::Value)
    }
}

/// Focusable element of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Row { id: FieldId, control: Control },
    Submit,
    Add,
}

impl Focus {
    /// Focus on the first control of the first row, or on submit for an empty form
    pub fn first(fields: &[Field]) -> Self {
        fields
            .first()
            .map(|field| Focus::Row { id: field.id, control: Control::Label })
            .unwrap_or(Focus::Submit)
    }

    pub fn row_id(&self) -> Option<FieldId> {
        match self {
            Focus::Row { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn control(&self) -> Option<Control> {
        match self {
            Focus::Row { control, .. } => Some(*control),
            _ => None,
        }
    }
}

/// Every focusable element in display order
pub fn focus_order(fields: &[Field]) -> Vec<Focus> {
    let mut order = Vec::with_capacity(fields.len() * 3 + 2);
    for field in fields {
        for control in [Control::Label, Control::Value, Control::Delete] {
            order.push(Focus::Row { id: field.id, control });
        }
    }
    order.push(Focus::Submit);
    order.push(Focus::Add);
    order
}

/// Next element in display order, wrapping around
pub fn next(fields: &[Field], current: Focus) -> Focus {
    step(fields, current, 1)
}

/// Previous element in display order, wrapping around
pub fn previous(fields: &[Field], current: Focus) -> Focus {
    step(fields, current, -1)
}

fn step(fields: &[Field], current: Focus, delta: isize) -> Focus {
    let order = focus_order(fields);
    let len = order.len() as isize;
    match order.iter().position(|focus| *focus == current) {
        Some(pos) => order[(pos as isize + delta).rem_euclid(len) as usize],
        None => Focus::first(fields),
    }
}

/// Same column one row up; from the controls row, the last field row
pub fn row_up(fields: &[Field], current: Focus) -> Focus {
    match current {
        Focus::Row { id, control } => match fields.iter().position(|f| f.id == id) {
            Some(pos) if pos > 0 => Focus::Row { id: fields[pos - 1].id, control },
            Some(_) => current,
            None => Focus::first(fields),
        },
        Focus::Submit | Focus::Add => fields
            .last()
            .map(|field| Focus::Row { id: field.id, control: Control::Label })
            .unwrap_or(current),
    }
}

/// Same column one row down; from the last row, the submit control
pub fn row_down(fields: &[Field], current: Focus) -> Focus {
    match current {
        Focus::Row { id, control } => match fields.iter().position(|f| f.id == id) {
            Some(pos) if pos + 1 < fields.len() => Focus::Row { id: fields[pos + 1].id, control },
            Some(_) => Focus::Submit,
            None => Focus::first(fields),
        },
        other => other,
    }
}

/// Where focus lands after the field that was at `removed_index` is deleted
pub fn after_delete(fields: &[Field], removed_index: usize, control: Control) -> Focus {
    fields
        .get(removed_index)
        .or_else(|| removed_index.checked_sub(1).and_then(|i| fields.get(i)))
        .map(|field| Focus::Row { id: field.id, control })
        .unwrap_or(Focus::Submit)
}
