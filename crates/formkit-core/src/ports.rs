//! Ports (hexagonal architecture)
//!
//! Interfaces the persistence collaborator must implement. Both the in-memory
//! repository and the REST client satisfy them.

use async_trait::async_trait;

use crate::domain::{FormSchema, FormVersion, FormView};
use crate::error::Result;

/// Version history storage for forms
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// All versions of a form, in no particular order
    async fn list_versions(&self, form_id: &str) -> Result<Vec<FormVersion>>;

    /// Persist `schema` as a new version; the store assigns the number
    async fn create_version(&self, form_id: &str, schema: &FormSchema) -> Result<FormVersion>;

    /// Append a new version whose schema is a copy of `version_number`
    async fn restore_version(&self, form_id: &str, version_number: u32) -> Result<FormVersion>;

    /// Remove a version; the active version is refused
    async fn delete_version(&self, form_id: &str, version_number: u32) -> Result<()>;
}

/// Form lifecycle storage
#[async_trait]
pub trait FormStore: Send + Sync {
    async fn create_form(&self, schema: &FormSchema) -> Result<FormView>;

    async fn get_form(&self, form_id: &str) -> Result<FormView>;

    async fn list_forms(&self) -> Result<Vec<FormView>>;

    /// Replace the live schema; history is untouched
    async fn save_schema(&self, form_id: &str, schema: &FormSchema) -> Result<FormView>;

    /// Snapshot the live schema and mark the form published
    async fn publish_form(&self, form_id: &str) -> Result<FormView>;

    /// Delete a form together with its versions
    async fn delete_form(&self, form_id: &str) -> Result<()>;
}
