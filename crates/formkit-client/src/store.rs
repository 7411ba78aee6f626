//! Port implementations over HTTP

use async_trait::async_trait;
use formkit_core::wire::{
    form_from_wire, schema_to_wire, version_from_wire, SchemaRequest, WireForm, WireVersion,
};
use formkit_core::{FormSchema, FormStore, FormVersion, FormView, Result, VersionStore};

use crate::{Client, Operation};

#[async_trait]
impl VersionStore for Client {
    async fn list_versions(&self, form_id: &str) -> Result<Vec<FormVersion>> {
        let versions: Vec<WireVersion> = self
            .get(&["api", "forms", form_id, "versions"], Operation::ListVersions)
            .await?;
        Ok(versions.into_iter().map(version_from_wire).collect())
    }

    async fn create_version(&self, form_id: &str, schema: &FormSchema) -> Result<FormVersion> {
        let body = SchemaRequest {
            schema: schema_to_wire(schema),
        };
        let version: WireVersion = self
            .post(
                &["api", "forms", form_id, "versions"],
                Some(&body),
                Operation::CreateVersion,
            )
            .await?;
        Ok(version_from_wire(version))
    }

    async fn restore_version(&self, form_id: &str, version_number: u32) -> Result<FormVersion> {
        let number = version_number.to_string();
        let version: WireVersion = self
            .post::<_, ()>(
                &["api", "forms", form_id, "versions", &number, "restore"],
                None,
                Operation::RestoreVersion,
            )
            .await?;
        Ok(version_from_wire(version))
    }

    async fn delete_version(&self, form_id: &str, version_number: u32) -> Result<()> {
        let number = version_number.to_string();
        self.delete(
            &["api", "forms", form_id, "versions", &number],
            Operation::DeleteVersion,
        )
        .await
    }
}

#[async_trait]
impl FormStore for Client {
    async fn create_form(&self, schema: &FormSchema) -> Result<FormView> {
        let body = SchemaRequest {
            schema: schema_to_wire(schema),
        };
        let form: WireForm = self
            .post(&["api", "forms"], Some(&body), Operation::Form)
            .await?;
        Ok(form_from_wire(form))
    }

    async fn get_form(&self, form_id: &str) -> Result<FormView> {
        let form: WireForm = self.get(&["api", "forms", form_id], Operation::Form).await?;
        Ok(form_from_wire(form))
    }

    async fn list_forms(&self) -> Result<Vec<FormView>> {
        let forms: Vec<WireForm> = self.get(&["api", "forms"], Operation::Form).await?;
        Ok(forms.into_iter().map(form_from_wire).collect())
    }

    async fn save_schema(&self, form_id: &str, schema: &FormSchema) -> Result<FormView> {
        let body = SchemaRequest {
            schema: schema_to_wire(schema),
        };
        let form: WireForm = self
            .put(&["api", "forms", form_id], &body, Operation::Form)
            .await?;
        Ok(form_from_wire(form))
    }

    async fn publish_form(&self, form_id: &str) -> Result<FormView> {
        let form: WireForm = self
            .post::<_, ()>(&["api", "forms", form_id, "publish"], None, Operation::Form)
            .await?;
        Ok(form_from_wire(form))
    }

    async fn delete_form(&self, form_id: &str) -> Result<()> {
        self.delete(&["api", "forms", form_id], Operation::Form).await
    }
}
