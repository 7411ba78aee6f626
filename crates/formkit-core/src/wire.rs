//! Wire format and the mapping to the canonical schema
//!
//! The REST contract speaks camelCase JSON and carries a field's position
//! twice (`position` and `order`). Internally there is one attribute. The
//! functions here are the only place the two shapes meet; they are total and
//! do no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{
    FieldDefinition, FieldOptions, FieldType, FormSchema, FormSettings, FormStatus, FormVersion,
    FormView, Notifications, Theme,
};
use crate::error::FormsError;

// =============================================================================
// Envelope
// =============================================================================

/// Response envelope shared by every endpoint
///
/// Callers branch on `success`, never on the HTTP status alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            code: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            code: None,
        }
    }

    pub fn error(err: &FormsError) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(err.message().to_string()),
            code: Some(err.code().to_string()),
        }
    }

    /// Turn a failed envelope into an error; `fallback` is used when the
    /// server sent no code
    pub fn into_error(self, fallback: FormsError) -> FormsError {
        match (self.code, self.message) {
            (Some(code), Some(message)) => FormsError::from_code(&code, message),
            (Some(code), None) => FormsError::from_code(&code, fallback.message()),
            (None, Some(message)) => match fallback {
                FormsError::InvalidSchema(_) => FormsError::InvalidSchema(message),
                FormsError::NotFound(_) => FormsError::NotFound(message),
                FormsError::PermissionDenied(_) => FormsError::PermissionDenied(message),
                FormsError::ActiveVersion(_) => FormsError::ActiveVersion(message),
                FormsError::FieldNotFound(_) => FormsError::FieldNotFound(message),
                FormsError::Transport(_) => FormsError::Transport(message),
            },
            (None, None) => fallback,
        }
    }
}

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSchema {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<WireField>,
    #[serde(default)]
    pub settings: WireSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, alias = "required")]
    pub is_required: bool,
    #[serde(default)]
    pub options: WireFieldOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub validation_rules: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireFieldOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSettings {
    #[serde(default)]
    pub theme: WireTheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(default)]
    pub notifications: WireNotifications,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireNotifications {
    #[serde(default)]
    pub email: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVersion {
    pub id: String,
    pub form_id: String,
    pub version_number: u32,
    pub schema: WireSchema,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireForm {
    pub id: String,
    pub schema: WireSchema,
    #[serde(default)]
    pub status: FormStatus,
    #[serde(default)]
    pub current_version: Option<u32>,
    #[serde(default)]
    pub version_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of create-version, create-form and save-schema requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRequest {
    pub schema: WireSchema,
}

// =============================================================================
// Mapping
// =============================================================================

pub fn schema_to_wire(schema: &FormSchema) -> WireSchema {
    WireSchema {
        title: schema.title.clone(),
        description: schema.description.clone(),
        fields: schema.fields.iter().map(field_to_wire).collect(),
        settings: settings_to_wire(&schema.settings),
    }
}

/// Inbound fields are ordered by `position`, then `order`, then arrival;
/// the result is always numbered 1..=N.
pub fn schema_from_wire(wire: WireSchema) -> FormSchema {
    let mut fields: Vec<(u32, WireField)> = wire
        .fields
        .into_iter()
        .map(|f| (f.position.or(f.order).unwrap_or(u32::MAX), f))
        .collect();
    fields.sort_by_key(|(key, _)| *key);

    FormSchema {
        title: wire.title,
        description: wire.description,
        fields: fields
            .into_iter()
            .enumerate()
            .map(|(index, (_, f))| field_from_wire(f, index as u32 + 1))
            .collect(),
        settings: settings_from_wire(wire.settings),
    }
}

pub fn version_to_wire(version: &FormVersion) -> WireVersion {
    WireVersion {
        id: version.id.clone(),
        form_id: version.form_id.clone(),
        version_number: version.version_number,
        schema: schema_to_wire(&version.schema),
        created_at: version.created_at,
    }
}

pub fn version_from_wire(wire: WireVersion) -> FormVersion {
    FormVersion {
        id: wire.id,
        form_id: wire.form_id,
        version_number: wire.version_number,
        schema: schema_from_wire(wire.schema),
        created_at: wire.created_at,
    }
}

pub fn form_to_wire(view: &FormView) -> WireForm {
    WireForm {
        id: view.id.clone(),
        schema: schema_to_wire(&view.schema),
        status: view.status,
        current_version: view.current_version,
        version_count: view.version_count,
        created_at: view.created_at,
        updated_at: view.updated_at,
    }
}

pub fn form_from_wire(wire: WireForm) -> FormView {
    FormView {
        id: wire.id,
        schema: schema_from_wire(wire.schema),
        status: wire.status,
        current_version: wire.current_version,
        version_count: wire.version_count,
        created_at: wire.created_at,
        updated_at: wire.updated_at,
    }
}

fn field_to_wire(field: &FieldDefinition) -> WireField {
    WireField {
        id: field.id.clone(),
        field_type: field.field_type,
        label: field.label.clone(),
        placeholder: field.placeholder.clone(),
        is_required: field.is_required,
        options: WireFieldOptions {
            choices: (!field.options.choices.is_empty()).then(|| field.options.choices.clone()),
        },
        position: Some(field.order),
        order: Some(field.order),
        validation_rules: field.validation_rules.clone(),
    }
}

fn field_from_wire(wire: WireField, order: u32) -> FieldDefinition {
    FieldDefinition {
        id: wire.id,
        field_type: wire.field_type,
        label: wire.label,
        placeholder: wire.placeholder.filter(|p| !p.is_empty()),
        is_required: wire.is_required,
        options: FieldOptions {
            choices: wire.options.choices.unwrap_or_default(),
        },
        order,
        validation_rules: wire.validation_rules,
    }
}

fn settings_to_wire(settings: &FormSettings) -> WireSettings {
    WireSettings {
        theme: WireTheme {
            primary_color: Some(settings.theme.primary_color.clone()),
            background_color: Some(settings.theme.background_color.clone()),
            text_color: Some(settings.theme.text_color.clone()),
        },
        success_message: Some(settings.success_message.clone()),
        notifications: WireNotifications {
            email: settings.notifications.email,
            webhook: settings.notifications.webhook.clone(),
        },
    }
}

fn settings_from_wire(wire: WireSettings) -> FormSettings {
    let defaults = FormSettings::default();
    let theme_defaults = Theme::default();
    FormSettings {
        theme: Theme {
            primary_color: wire.theme.primary_color.unwrap_or(theme_defaults.primary_color),
            background_color: wire
                .theme
                .background_color
                .unwrap_or(theme_defaults.background_color),
            text_color: wire.theme.text_color.unwrap_or(theme_defaults.text_color),
        },
        success_message: wire.success_message.unwrap_or(defaults.success_message),
        notifications: Notifications {
            email: wire.notifications.email,
            webhook: wire.notifications.webhook.filter(|w| !w.is_empty()),
        },
    }
}
