//! The field list editor
//!
//! Owns the ordered list of form fields. Fields are addressed by position;
//! every mutation builds a new list and swaps it in, so a snapshot taken
//! before a mutation keeps showing the old state.

use std::sync::Arc;

use tracing::debug;

use crate::errors::FormError;
use crate::events::FormEvent;
use crate::models::{Field, FieldId};
use crate::submit::{Submission, SubmitSink};

/// Label of the field every editor session starts with
pub const SEED_LABEL: &str = "First Name?";

#[derive(Debug, Clone)]
pub struct FieldListEditor {
    fields: Arc<Vec<Field>>,
}

impl Default for FieldListEditor {
    fn default() -> Self {
        Self::initialize()
    }
}

impl FieldListEditor {
    /// Start a session with the single seeded field.
    pub fn initialize() -> Self {
        Self {
            fields: Arc::new(vec![Field::new(SEED_LABEL)]),
        }
    }

    pub fn new() -> Self {
        Self::initialize()
    }

    /// Shared, immutable view of the current list.
    pub fn snapshot(&self) -> Arc<Vec<Field>> {
        Arc::clone(&self.fields)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Current position of the field with the given id.
    pub fn position(&self, id: FieldId) -> Option<usize> {
        self.fields.iter().position(|field| field.id == id)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.label.as_str()).collect()
    }

    /// Replace the label of the field at `index`; its name is re-derived.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_label(&mut self, index: usize, label: &str) {
        self.replace_at(index, |field| field.with_label(label));
        debug!(labels = ?self.labels(), "Label changed");
    }

    /// Replace the value of the field at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_value(&mut self, index: usize, value: &str) {
        self.replace_at(index, |field| field.with_value(value));
    }

    /// Append a blank field to the end of the list.
    pub fn add_field(&mut self) {
        let mut updated = Vec::with_capacity(self.fields.len() + 1);
        updated.extend(self.fields.iter().cloned());
        updated.push(Field::blank());
        self.fields = Arc::new(updated);
        debug!(labels = ?self.labels(), "Field added");
    }

    /// Remove the field at `index`; later fields move up one position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn delete_field(&mut self, index: usize) {
        self.assert_in_range(index);
        let updated: Vec<Field> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, field)| field.clone())
            .collect();
        self.fields = Arc::new(updated);
        debug!(index, remaining = self.fields.len(), "Field deleted");
    }

    /// Hand out the current list for delivery. The list is left as it is.
    pub fn submit(&self) -> Submission {
        Submission::new(self.snapshot())
    }

    /// Apply one interaction event.
    ///
    /// Unlike the direct operations, an out-of-range index is reported as
    /// [`FormError::IndexOutOfRange`] and the list is left unchanged.
    /// Returns the submission for [`FormEvent::SubmitClicked`].
    pub fn apply(&mut self, event: &FormEvent) -> Result<Option<Submission>, FormError> {
        if let Some(index) = event.index() {
            self.check_index(index)?;
        }

        match event {
            FormEvent::LabelEdited { index, label } => self.set_label(*index, label),
            FormEvent::ValueEdited { index, value } => self.set_value(*index, value),
            FormEvent::AddClicked => self.add_field(),
            FormEvent::DeleteClicked { index } => self.delete_field(*index),
            FormEvent::SubmitClicked => return Ok(Some(self.submit())),
        }

        Ok(None)
    }

    /// Apply events in order, delivering each submission to `sink`.
    ///
    /// Stops at the first event that fails to apply or deliver; events
    /// after it are not applied. Returns the number of submissions delivered.
    pub fn replay(&mut self, events: &[FormEvent], sink: &mut dyn SubmitSink) -> Result<usize, FormError> {
        let mut delivered = 0;
        for (offset, event) in events.iter().enumerate() {
            let failed = |source| FormError::at_event(offset + 1, event, source);
            if let Some(submission) = self.apply(event).map_err(failed)? {
                sink.deliver(&submission).map_err(failed)?;
                delivered += 1;
            }
        }
        debug!(events = events.len(), delivered, fields = self.len(), "Replayed form events");
        Ok(delivered)
    }

    fn check_index(&self, index: usize) -> Result<(), FormError> {
        if index < self.fields.len() {
            Ok(())
        } else {
            Err(FormError::IndexOutOfRange {
                index,
                len: self.fields.len(),
            })
        }
    }

    fn assert_in_range(&self, index: usize) {
        assert!(
            index < self.fields.len(),
            "field index {} out of range for {} fields",
            index,
            self.fields.len()
        );
    }

    fn replace_at(&mut self, index: usize, update: impl FnOnce(&Field) -> Field) {
        self.assert_in_range(index);
        let mut updated: Vec<Field> = self.fields.as_ref().clone();
        updated[index] = update(&self.fields[index]);
        self.fields = Arc::new(updated);
    }
}
