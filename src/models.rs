use serde::Serialize;
use uuid::Uuid;

/// Stable identity of a field, assigned once when the field is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(Uuid);

impl FieldId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FieldId {
    fn default() -> Self {
        Self::new()
    }
}

/// One question/answer pair of the form.
///
/// `name` is always `derive_name(&label)`; it is only ever written together with `label`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    #[serde(skip)]
    pub id: FieldId,
    pub label: String,
    pub name: String,
    pub value: String,
}

impl Field {
    /// A field with the given label, its derived name and an empty value.
    pub fn new(label: &str) -> Self {
        Self {
            id: FieldId::new(),
            label: label.to_string(),
            name: derive_name(label),
            value: String::new(),
        }
    }

    /// A field with empty label, name and value.
    pub fn blank() -> Self {
        Self::new("")
    }

    /// Copy of this field with a new label and recomputed name.
    pub fn with_label(&self, label: &str) -> Self {
        Self {
            id: self.id,
            label: label.to_string(),
            name: derive_name(label),
            value: self.value.clone(),
        }
    }

    /// Copy of this field with a new value.
    pub fn with_value(&self, value: &str) -> Self {
        Self {
            id: self.id,
            label: self.label.clone(),
            name: self.name.clone(),
            value: value.to_string(),
        }
    }

    /// Identifier of the label (question) input.
    pub fn label_input_id(&self) -> String {
        format!("label_{}", self.name)
    }

    /// Identifier of the value (answer) input.
    pub fn value_input_id(&self) -> String {
        self.name.clone()
    }
}

/// Derive a machine-safe name from a label.
///
/// Steps run in this order: drop every character that is not an ASCII letter,
/// ASCII digit or space; turn each space into `_`; lower-case.
pub fn derive_name(label: &str) -> String {
    let kept: String = label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();

    kept.replace(' ', "_").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_name() {
        assert_eq!(derive_name("First Name?"), "first_name");
        assert_eq!(derive_name("Last Name!"), "last_name");
        assert_eq!(derive_name(""), "");
        assert_eq!(derive_name("What's your e-mail?"), "whats_your_email");
        assert_eq!(derive_name("Zip Code 2"), "zip_code_2");
    }

    #[test]
    fn test_derive_name_spaces_next_to_punctuation() {
        // Punctuation goes first, so both surrounding spaces survive
        assert_eq!(derive_name("a - b"), "a__b");
        assert_eq!(derive_name(" ?"), "_");
    }

    #[test]
    fn test_derive_name_drops_non_ascii() {
        assert_eq!(derive_name("Café Öl"), "caf_l");
        assert_eq!(derive_name("名前"), "");
        assert_eq!(derive_name("tab\there"), "tabhere");
    }

    #[test]
    fn test_field_copies_keep_identity() {
        let field = Field::new("First Name?");
        let relabeled = field.with_label("Surname");
        assert_eq!(relabeled.id, field.id);
        assert_eq!(relabeled.name, "surname");

        let answered = relabeled.with_value("Smith");
        assert_eq!(answered.id, field.id);
        assert_eq!(answered.label, "Surname");
        assert_eq!(answered.value, "Smith");
        // Originals are untouched
        assert_eq!(field.label, "First Name?");
        assert_eq!(relabeled.value, "");
    }

    #[test]
    fn test_input_ids_follow_name() {
        let field = Field::new("First Name?");
        assert_eq!(field.label_input_id(), "label_first_name");
        assert_eq!(field.value_input_id(), "first_name");

        let blank = Field::blank();
        assert_eq!(blank.label_input_id(), "label_");
        assert_eq!(blank.value_input_id(), "");
        assert_ne!(blank.id, field.id);
    }

    #[test]
    fn test_field_serialization_omits_id() {
        let field = Field::new("First Name?").with_value("Ada");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"label": "First Name?", "name": "first_name", "value": "Ada"})
        );
    }
}
