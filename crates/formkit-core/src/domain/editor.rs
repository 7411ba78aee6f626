//! Field editor
//!
//! Builds and rearranges the ordered field list of one form in memory.
//! Nothing here touches storage; callers persist [`FieldEditor::schema`].

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::schema::{FieldDefinition, FieldType, FormSchema, FormSettings};
use crate::error::{FormsError, Result};

/// Partial update for a field; `None` leaves the attribute alone
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// `Some(None)` clears the placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<BTreeMap<String, serde_json::Value>>,
}

impl FieldPatch {
    fn apply(self, field: &mut FieldDefinition) {
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(placeholder) = self.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(required) = self.is_required {
            field.is_required = required;
        }
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(choices) = self.choices {
            field.options.choices = choices;
        }
        if let Some(rules) = self.validation_rules {
            field.validation_rules = rules;
        }
    }
}

/// Working copy of a form schema
#[derive(Clone, Debug, Default)]
pub struct FieldEditor {
    schema: FormSchema,
    issued_ids: HashSet<String>,
}

impl FieldEditor {
    pub fn new(title: impl Into<String>) -> Self {
        Self::from_schema(FormSchema::new(title))
    }

    /// Load a persisted schema; orders are normalized to its sequence
    pub fn from_schema(mut schema: FormSchema) -> Self {
        renumber(&mut schema.fields);
        let issued_ids = schema.fields.iter().map(|f| f.id.clone()).collect();
        Self { schema, issued_ids }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn into_schema(self) -> FormSchema {
        self.schema
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.schema.fields
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.schema.fields.iter().find(|f| f.id == field_id)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.schema.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.schema.description = description.into();
    }

    pub fn set_settings(&mut self, settings: FormSettings) {
        self.schema.settings = settings;
    }

    /// Append a new field of `field_type` with defaults
    pub fn add_field(&mut self, field_type: FieldType) -> &FieldDefinition {
        let id = self.next_id();
        let order = self.schema.fields.len() as u32 + 1;
        self.schema
            .fields
            .push(FieldDefinition::new(id, field_type, order));
        tracing::debug!(field_type = %field_type, order, "field added");
        &self.schema.fields[self.schema.fields.len() - 1]
    }

    /// Merge `patch` into the addressed field
    pub fn update_field(&mut self, field_id: &str, patch: FieldPatch) -> Result<&FieldDefinition> {
        let index = self.index_of(field_id)?;
        patch.apply(&mut self.schema.fields[index]);
        Ok(&self.schema.fields[index])
    }

    /// Remove a field and close the gap it leaves in the order
    pub fn remove_field(&mut self, field_id: &str) -> Result<FieldDefinition> {
        let index = self.index_of(field_id)?;
        let removed = self.schema.fields.remove(index);
        renumber(&mut self.schema.fields);
        tracing::debug!(field_id, "field removed");
        Ok(removed)
    }

    /// Move `source_id` to the slot currently held by `target_id`
    ///
    /// Array-move, not a swap: the source is taken out and re-inserted at the
    /// target's index, then every field is renumbered 1..=N. Unknown ids and
    /// `source_id == target_id` leave the list untouched.
    pub fn reorder(&mut self, source_id: &str, target_id: &str) -> &[FieldDefinition] {
        if source_id == target_id {
            return &self.schema.fields;
        }
        let fields = &mut self.schema.fields;
        let old_index = fields.iter().position(|f| f.id == source_id);
        let new_index = fields.iter().position(|f| f.id == target_id);
        if let (Some(old_index), Some(new_index)) = (old_index, new_index) {
            let moved = fields.remove(old_index);
            fields.insert(new_index, moved);
            renumber(fields);
            tracing::debug!(source_id, target_id, old_index, new_index, "field moved");
        }
        &self.schema.fields
    }

    fn index_of(&self, field_id: &str) -> Result<usize> {
        self.schema
            .fields
            .iter()
            .position(|f| f.id == field_id)
            .ok_or_else(|| FormsError::field_not_found(field_id))
    }

    fn next_id(&mut self) -> String {
        loop {
            let id = generate_field_id();
            if self.issued_ids.insert(id.clone()) {
                return id;
            }
        }
    }
}

fn generate_field_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!(
        "field_{}_{}",
        Utc::now().timestamp_millis(),
        suffix.to_ascii_lowercase()
    )
}

fn renumber(fields: &mut [FieldDefinition]) {
    for (index, field) in fields.iter_mut().enumerate() {
        field.order = index as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(editor: &FieldEditor) -> Vec<u32> {
        editor.fields().iter().map(|f| f.order).collect()
    }

    fn ids(editor: &FieldEditor) -> Vec<String> {
        editor.fields().iter().map(|f| f.id.clone()).collect()
    }

    fn editor_with(n: usize) -> FieldEditor {
        let mut editor = FieldEditor::new("Survey");
        for i in 0..n {
            editor.add_field(FieldType::ALL[i % FieldType::ALL.len()]);
        }
        editor
    }

    #[test]
    fn test_add_field_defaults() {
        let mut editor = FieldEditor::new("Signup");
        let field = editor.add_field(FieldType::Email).clone();

        assert!(field.id.starts_with("field_"));
        assert_eq!(field.label, "Email Field");
        assert!(!field.is_required);
        assert!(field.options.choices.is_empty());
        assert_eq!(field.order, 1);
    }

    #[test]
    fn test_add_field_orders_are_contiguous() {
        let editor = editor_with(25);
        let expected: Vec<u32> = (1..=25).collect();
        assert_eq!(orders(&editor), expected);

        let unique: HashSet<String> = ids(&editor).into_iter().collect();
        assert_eq!(unique.len(), 25);
    }

    #[test]
    fn test_two_fields_reorder() {
        let mut editor = FieldEditor::new("Contact");
        let first = editor.add_field(FieldType::Text).id.clone();
        let second = editor.add_field(FieldType::Email).id.clone();
        assert_eq!(orders(&editor), vec![1, 2]);

        editor.reorder(&first, &second);

        assert_eq!(orders(&editor), vec![1, 2]);
        assert_eq!(ids(&editor), vec![second, first]);
    }

    #[test]
    fn test_reorder_same_id_is_noop() {
        let mut editor = editor_with(4);
        let before = editor.fields().to_vec();
        let id = before[2].id.clone();

        editor.reorder(&id, &id);
        assert_eq!(editor.fields(), before.as_slice());
    }

    #[test]
    fn test_reorder_unknown_id_is_noop() {
        let mut editor = editor_with(3);
        let before = editor.fields().to_vec();
        let id = before[0].id.clone();

        editor.reorder(&id, "missing");
        editor.reorder("missing", &id);
        assert_eq!(editor.fields(), before.as_slice());
    }

    #[test]
    fn test_reorder_neighbours_back_and_forth_restores_order() {
        let mut editor = editor_with(5);
        let before = editor.fields().to_vec();

        for i in 0..4 {
            let a = before[i].id.clone();
            let b = before[i + 1].id.clone();
            editor.reorder(&a, &b);
            assert_ne!(editor.fields(), before.as_slice());
            editor.reorder(&b, &a);
            assert_eq!(editor.fields(), before.as_slice());
        }
    }

    #[test]
    fn test_reorder_is_undone_by_moving_back_to_old_slot() {
        let mut editor = editor_with(6);
        let before = editor.fields().to_vec();
        let a = before[1].id.clone();
        let b = before[4].id.clone();

        editor.reorder(&a, &b);
        assert_eq!(editor.fields()[4].id, a);
        assert_eq!(editor.fields()[3].id, b);

        let now_at_old_slot = editor.fields()[1].id.clone();
        editor.reorder(&a, &now_at_old_slot);
        assert_eq!(editor.fields(), before.as_slice());
    }

    #[test]
    fn test_move_first_to_last() {
        let mut editor = editor_with(5);
        let before = ids(&editor);
        let first = before[0].clone();
        let last = before[4].clone();

        editor.reorder(&first, &last);

        let mut expected = before[1..].to_vec();
        expected.push(first);
        assert_eq!(ids(&editor), expected);
        assert_eq!(orders(&editor), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_update_field_merges_patch() {
        let mut editor = FieldEditor::new("Order");
        let id = editor.add_field(FieldType::Select).id.clone();

        let patch = FieldPatch {
            label: Some("Size".into()),
            placeholder: Some(Some("Pick one".into())),
            is_required: Some(true),
            choices: Some(vec!["S".into(), "M".into(), "L".into()]),
            ..Default::default()
        };
        let field = editor.update_field(&id, patch).unwrap().clone();

        assert_eq!(field.label, "Size");
        assert_eq!(field.placeholder.as_deref(), Some("Pick one"));
        assert!(field.is_required);
        assert_eq!(field.options.choices.len(), 3);
        assert_eq!(field.order, 1);

        let clear = FieldPatch {
            placeholder: Some(None),
            ..Default::default()
        };
        assert_eq!(editor.update_field(&id, clear).unwrap().placeholder, None);
    }

    #[test]
    fn test_update_unknown_field_is_an_error() {
        let mut editor = editor_with(2);
        let before = editor.fields().to_vec();

        let err = editor
            .update_field("nope", FieldPatch { label: Some("x".into()), ..Default::default() })
            .unwrap_err();

        assert!(matches!(err, FormsError::FieldNotFound(_)));
        assert_eq!(editor.fields(), before.as_slice());
    }

    #[test]
    fn test_remove_field_renumbers() {
        let mut editor = editor_with(4);
        let doomed = editor.fields()[1].id.clone();

        let removed = editor.remove_field(&doomed).unwrap();

        assert_eq!(removed.id, doomed);
        assert_eq!(orders(&editor), vec![1, 2, 3]);
        assert!(editor.field(&doomed).is_none());
        assert!(matches!(
            editor.remove_field(&doomed),
            Err(FormsError::FieldNotFound(_))
        ));
    }

    #[test]
    fn test_removed_ids_are_not_reissued() {
        let mut editor = editor_with(1);
        let first = editor.fields()[0].id.clone();
        editor.remove_field(&first).unwrap();

        for _ in 0..50 {
            let id = editor.add_field(FieldType::Text).id.clone();
            assert_ne!(id, first);
        }
    }

    #[test]
    fn test_from_schema_normalizes_order() {
        let mut schema = FormSchema::new("Imported");
        schema.fields.push(FieldDefinition::new("a", FieldType::Text, 4));
        schema.fields.push(FieldDefinition::new("b", FieldType::Text, 9));

        let editor = FieldEditor::from_schema(schema);
        assert_eq!(orders(&editor), vec![1, 2]);
    }
}
