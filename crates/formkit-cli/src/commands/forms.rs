//! Form commands

use formkit_client::Client;
use formkit_core::wire::form_to_wire;
use formkit_core::FormStore;

use super::read_schema;
use crate::output::{FieldRow, FormRow, OutputFormat};
use crate::FormCommands;

pub async fn handle(action: FormCommands, client: &Client, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        FormCommands::List => {
            let forms = client.list_forms().await?;
            let wire: Vec<_> = forms.iter().map(form_to_wire).collect();
            format.print(&wire, forms.iter().map(FormRow::from).collect())?;
        }
        FormCommands::Get { id } => {
            let form = client.get_form(&id).await?;
            let rows: Vec<FieldRow> = form.schema.fields.iter().map(FieldRow::from).collect();
            format.print(&form_to_wire(&form), rows)?;
        }
        FormCommands::Create { file } => {
            let schema = read_schema(&file)?;
            schema.validate()?;
            let form = client.create_form(&schema).await?;
            println!("Created form: {}", form.id);
        }
        FormCommands::Save { id, file } => {
            let schema = read_schema(&file)?;
            schema.validate()?;
            client.save_schema(&id, &schema).await?;
            println!("Saved schema of form {}", id);
        }
        FormCommands::Publish { id } => {
            let form = client.publish_form(&id).await?;
            let version = form.current_version.unwrap_or_default();
            println!("Published form {} as version {}", id, version);
        }
        FormCommands::Delete { id } => {
            client.delete_form(&id).await?;
            println!("Deleted form {}", id);
        }
    }
    Ok(())
}
