//! Form aggregate and its version history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::events::FormEvent;
use crate::domain::schema::FormSchema;
use crate::error::{FormsError, Result};

/// Immutable, numbered snapshot of a form schema
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormVersion {
    pub id: String,
    pub form_id: String,
    pub version_number: u32,
    pub schema: FormSchema,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
}

/// Read model of a form without its history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormView {
    pub id: String,
    pub schema: FormSchema,
    pub status: FormStatus,
    pub current_version: Option<u32>,
    pub version_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form aggregate
///
/// Owns the live schema and an append-only list of versions. Version numbers
/// come from a per-form counter that only moves forward, so a number is never
/// handed out twice even after the version carrying it was deleted.
#[derive(Clone, Debug)]
pub struct Form {
    id: String,
    schema: FormSchema,
    status: FormStatus,
    current_version: Option<u32>,
    versions: Vec<FormVersion>,
    next_version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<FormEvent>,
}

impl Form {
    pub fn create(schema: FormSchema) -> Result<Self> {
        schema.validate()?;
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        Ok(Self {
            events: vec![FormEvent::Created { form_id: id.clone() }],
            id,
            schema,
            status: FormStatus::Draft,
            current_version: None,
            versions: Vec::new(),
            next_version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn current_version(&self) -> Option<u32> {
        self.current_version
    }

    /// Versions in creation order
    pub fn versions(&self) -> &[FormVersion] {
        &self.versions
    }

    /// Versions newest first
    pub fn versions_desc(&self) -> Vec<FormVersion> {
        let mut versions = self.versions.clone();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        versions
    }

    pub fn version(&self, version_number: u32) -> Option<&FormVersion> {
        self.versions
            .iter()
            .find(|v| v.version_number == version_number)
    }

    pub fn view(&self) -> FormView {
        FormView {
            id: self.id.clone(),
            schema: self.schema.clone(),
            status: self.status,
            current_version: self.current_version,
            version_count: self.versions.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Replace the live schema without touching the history
    pub fn save_schema(&mut self, schema: FormSchema) -> Result<()> {
        schema.validate()?;
        self.schema = schema;
        self.touch();
        Ok(())
    }

    /// Append a version holding `schema` and make it the active one
    pub fn snapshot(&mut self, schema: FormSchema) -> Result<&FormVersion> {
        schema.validate()?;
        let index = self.append(schema);
        let version_number = self.versions[index].version_number;
        self.events.push(FormEvent::VersionCreated {
            form_id: self.id.clone(),
            version_number,
        });
        Ok(&self.versions[index])
    }

    /// Snapshot the live schema and mark the form published
    pub fn publish(&mut self) -> Result<&FormVersion> {
        let schema = self.schema.clone();
        schema.validate()?;
        let index = self.append(schema);
        self.status = FormStatus::Published;
        let version_number = self.versions[index].version_number;
        self.events.push(FormEvent::Published {
            form_id: self.id.clone(),
            version_number,
        });
        Ok(&self.versions[index])
    }

    /// Append a new version cloned from `version_number`
    ///
    /// History is never rewritten: restoring the same version twice yields
    /// two new versions.
    pub fn restore(&mut self, version_number: u32) -> Result<&FormVersion> {
        let schema = self
            .version(version_number)
            .map(|v| v.schema.clone())
            .ok_or_else(|| FormsError::version_not_found(&self.id, version_number))?;
        let index = self.append(schema);
        let new_version = self.versions[index].version_number;
        self.events.push(FormEvent::VersionRestored {
            form_id: self.id.clone(),
            from_version: version_number,
            new_version,
        });
        Ok(&self.versions[index])
    }

    /// Remove a version that is not the active one
    pub fn delete_version(&mut self, version_number: u32) -> Result<FormVersion> {
        if self.current_version == Some(version_number) {
            return Err(FormsError::active_version(version_number));
        }
        let index = self
            .versions
            .iter()
            .position(|v| v.version_number == version_number)
            .ok_or_else(|| FormsError::version_not_found(&self.id, version_number))?;
        let removed = self.versions.remove(index);
        self.events.push(FormEvent::VersionDeleted {
            form_id: self.id.clone(),
            version_number,
        });
        self.touch();
        Ok(removed)
    }

    pub fn take_events(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.events)
    }

    fn append(&mut self, schema: FormSchema) -> usize {
        let version_number = self.next_version;
        self.next_version += 1;
        self.versions.push(FormVersion {
            id: uuid::Uuid::new_v4().to_string(),
            form_id: self.id.clone(),
            version_number,
            schema: schema.clone(),
            created_at: Utc::now(),
        });
        self.schema = schema;
        self.current_version = Some(version_number);
        self.touch();
        self.versions.len() - 1
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{FieldDefinition, FieldType};

    fn schema(title: &str) -> FormSchema {
        let mut schema = FormSchema::new(title);
        schema.fields.push(FieldDefinition::new("f1", FieldType::Text, 1));
        schema
    }

    fn form_with_three_versions() -> Form {
        let mut form = Form::create(schema("v0")).unwrap();
        for title in ["v1", "v2", "v3"] {
            form.snapshot(schema(title)).unwrap();
        }
        form
    }

    #[test]
    fn test_snapshot_numbers_increase() {
        let form = form_with_three_versions();
        let numbers: Vec<u32> = form.versions().iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(form.current_version(), Some(3));
        assert_eq!(form.schema().title, "v3");
    }

    #[test]
    fn test_restore_appends_clone() {
        let mut form = form_with_three_versions();
        let restored = form.restore(1).unwrap().clone();

        assert_eq!(restored.version_number, 4);
        assert_eq!(restored.schema, form.version(1).unwrap().schema);
        assert_ne!(restored.id, form.version(1).unwrap().id);
        assert_eq!(form.current_version(), Some(4));
        assert_eq!(form.versions().len(), 4);
    }

    #[test]
    fn test_restore_unknown_version() {
        let mut form = form_with_three_versions();
        let err = form.restore(9).unwrap_err();
        assert!(matches!(err, FormsError::NotFound(_)));
        assert_eq!(form.versions().len(), 3);
    }

    #[test]
    fn test_active_version_cannot_be_deleted() {
        let mut form = form_with_three_versions();
        let err = form.delete_version(3).unwrap_err();
        assert!(matches!(err, FormsError::ActiveVersion(_)));
        assert_eq!(form.versions().len(), 3);
    }

    #[test]
    fn test_deleted_numbers_are_not_reused() {
        let mut form = form_with_three_versions();
        form.delete_version(2).unwrap();
        let next = form.snapshot(schema("v4")).unwrap();
        assert_eq!(next.version_number, 4);

        let desc: Vec<u32> = form.versions_desc().iter().map(|v| v.version_number).collect();
        assert_eq!(desc, vec![4, 3, 1]);
    }

    #[test]
    fn test_publish_snapshots_live_schema() {
        let mut form = Form::create(schema("draft")).unwrap();
        form.save_schema(schema("edited")).unwrap();
        assert!(form.versions().is_empty());

        let version = form.publish().unwrap().clone();
        assert_eq!(version.schema.title, "edited");
        assert_eq!(form.status(), FormStatus::Published);
    }

    #[test]
    fn test_events_are_drained() {
        let mut form = form_with_three_versions();
        let events = form.take_events();
        assert_eq!(events.len(), 4);
        assert!(form.take_events().is_empty());
    }
}
