//! Form schema value objects

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{FormsError, Result};

/// Versioned content of a form
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub title: String,
    pub description: String,
    pub fields: Vec<FieldDefinition>,
    pub settings: FormSettings,
}

impl FormSchema {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Check the schema before it is persisted
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(FormsError::invalid_schema("title must not be empty"));
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for (index, field) in self.fields.iter().enumerate() {
            if field.id.trim().is_empty() {
                return Err(FormsError::invalid_schema(format!(
                    "field at position {} has no id",
                    index + 1
                )));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(FormsError::invalid_schema(format!(
                    "duplicate field id {}",
                    field.id
                )));
            }
            if field.label.trim().is_empty() {
                return Err(FormsError::invalid_schema(format!(
                    "field {} has an empty label",
                    field.id
                )));
            }
            if field.order as usize != index + 1 {
                return Err(FormsError::invalid_schema(format!(
                    "field {} has order {} at position {}",
                    field.id,
                    field.order,
                    index + 1
                )));
            }
            if field.field_type.requires_choices() && field.options.choices.is_empty() {
                return Err(FormsError::invalid_schema(format!(
                    "{} field {} needs at least one choice",
                    field.field_type, field.id
                )));
            }
        }
        Ok(())
    }
}

/// One input control's metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: Option<String>,
    pub is_required: bool,
    pub options: FieldOptions,
    /// 1-based position within the schema
    pub order: u32,
    pub validation_rules: BTreeMap<String, serde_json::Value>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, field_type: FieldType, order: u32) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: field_type.default_label(),
            placeholder: None,
            is_required: false,
            options: FieldOptions::default(),
            order,
            validation_rules: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOptions {
    pub choices: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    Textarea,
    Select,
    Checkbox,
    Radio,
    File,
    Url,
    Tel,
}

impl FieldType {
    pub const ALL: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Number,
        FieldType::Date,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::File,
        FieldType::Url,
        FieldType::Tel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::File => "file",
            FieldType::Url => "url",
            FieldType::Tel => "tel",
        }
    }

    /// Label given to a freshly added field
    pub fn default_label(&self) -> String {
        let name = match self {
            FieldType::Text => "Text",
            FieldType::Email => "Email",
            FieldType::Number => "Number",
            FieldType::Date => "Date",
            FieldType::Textarea => "Text Area",
            FieldType::Select => "Dropdown",
            FieldType::Checkbox => "Checkbox",
            FieldType::Radio => "Radio",
            FieldType::File => "File Upload",
            FieldType::Url => "URL",
            FieldType::Tel => "Phone",
        };
        format!("{} Field", name)
    }

    /// Types that make no sense without a choice list.
    /// Checkboxes may carry choices but a lone checkbox is valid.
    pub fn requires_choices(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }

    pub fn accepts_choices(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FormsError::invalid_schema(format!("unknown field type {}", s)))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormSettings {
    pub theme: Theme,
    pub success_message: String,
    pub notifications: Notifications,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            success_message: "Thank you for your submission!".to_string(),
            notifications: Notifications::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub primary_color: String,
    pub background_color: String,
    pub text_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#3b82f6".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#111827".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Notifications {
    pub email: bool,
    pub webhook: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_schema() -> FormSchema {
        let mut schema = FormSchema::new("Contact");
        schema.fields.push(FieldDefinition::new("name", FieldType::Text, 1));
        schema.fields.push(FieldDefinition::new("email", FieldType::Email, 2));
        schema
    }

    #[test]
    fn test_valid_schema() {
        assert!(contact_schema().validate().is_ok());
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let mut schema = contact_schema();
        schema.title = "   ".into();
        let err = schema.validate().unwrap_err();
        assert!(matches!(err, FormsError::InvalidSchema(_)));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut schema = contact_schema();
        schema.fields[1].id = "name".into();
        assert!(schema.validate().unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_order_gap_is_rejected() {
        let mut schema = contact_schema();
        schema.fields[1].order = 3;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_select_needs_choices() {
        let mut schema = contact_schema();
        schema.fields.push(FieldDefinition::new("topic", FieldType::Select, 3));
        assert!(schema.validate().is_err());

        schema.fields[2].options.choices = vec!["Sales".into(), "Support".into()];
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_field_type_parsing() {
        assert_eq!("TEL".parse::<FieldType>().unwrap(), FieldType::Tel);
        assert_eq!(" textarea ".parse::<FieldType>().unwrap(), FieldType::Textarea);
        assert!("slider".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_default_labels() {
        assert_eq!(FieldType::Email.default_label(), "Email Field");
        assert_eq!(FieldType::Tel.default_label(), "Phone Field");
    }
}
