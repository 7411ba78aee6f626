//! In-memory form repository
//!
//! Constructed explicitly and shared through an `Arc`; each instance has its
//! own data, so tests never see each other's forms.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{Form, FormEvent, FormSchema, FormVersion, FormView};
use crate::error::{FormsError, Result};
use crate::ports::{FormStore, VersionStore};

#[derive(Default)]
pub struct InMemoryFormRepository {
    forms: DashMap<String, Form>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Run `op` against one form and publish the events it raised
    fn with_form<T>(&self, form_id: &str, op: impl FnOnce(&mut Form) -> Result<T>) -> Result<T> {
        let mut form = self
            .forms
            .get_mut(form_id)
            .ok_or_else(|| FormsError::form_not_found(form_id))?;
        let result = op(&mut form);
        let events = form.take_events();
        drop(form);
        publish(events);
        result
    }
}

fn publish(events: Vec<FormEvent>) {
    for event in events {
        tracing::info!(form_id = event.form_id(), ?event, "form event");
    }
}

#[async_trait]
impl VersionStore for InMemoryFormRepository {
    async fn list_versions(&self, form_id: &str) -> Result<Vec<FormVersion>> {
        self.forms
            .get(form_id)
            .map(|form| form.versions().to_vec())
            .ok_or_else(|| FormsError::form_not_found(form_id))
    }

    async fn create_version(&self, form_id: &str, schema: &FormSchema) -> Result<FormVersion> {
        self.with_form(form_id, |form| form.snapshot(schema.clone()).cloned())
    }

    async fn restore_version(&self, form_id: &str, version_number: u32) -> Result<FormVersion> {
        self.with_form(form_id, |form| form.restore(version_number).cloned())
    }

    async fn delete_version(&self, form_id: &str, version_number: u32) -> Result<()> {
        self.with_form(form_id, |form| form.delete_version(version_number).map(|_| ()))
    }
}

#[async_trait]
impl FormStore for InMemoryFormRepository {
    async fn create_form(&self, schema: &FormSchema) -> Result<FormView> {
        let mut form = Form::create(schema.clone())?;
        publish(form.take_events());
        let view = form.view();
        self.forms.insert(form.id().to_string(), form);
        Ok(view)
    }

    async fn get_form(&self, form_id: &str) -> Result<FormView> {
        self.forms
            .get(form_id)
            .map(|form| form.view())
            .ok_or_else(|| FormsError::form_not_found(form_id))
    }

    async fn list_forms(&self) -> Result<Vec<FormView>> {
        let mut forms: Vec<FormView> = self.forms.iter().map(|form| form.view()).collect();
        forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(forms)
    }

    async fn save_schema(&self, form_id: &str, schema: &FormSchema) -> Result<FormView> {
        self.with_form(form_id, |form| {
            form.save_schema(schema.clone())?;
            Ok(form.view())
        })
    }

    async fn publish_form(&self, form_id: &str) -> Result<FormView> {
        self.with_form(form_id, |form| {
            form.publish()?;
            Ok(form.view())
        })
    }

    async fn delete_form(&self, form_id: &str) -> Result<()> {
        self.forms
            .remove(form_id)
            .map(|(_, form)| {
                tracing::info!(form_id, versions = form.versions().len(), "form deleted");
            })
            .ok_or_else(|| FormsError::form_not_found(form_id))
    }
}
