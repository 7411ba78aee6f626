//! Version history commands

use std::sync::Arc;

use colored::Colorize;
use formkit_client::Client;
use formkit_core::wire::version_to_wire;
use formkit_core::{FormsError, Severity, VersionHistoryManager};

use super::read_schema;
use crate::output::{self, FieldRow, OutputFormat, VersionRow};
use crate::VersionCommands;

pub async fn handle(action: VersionCommands, client: Client, format: OutputFormat) -> anyhow::Result<()> {
    let history = VersionHistoryManager::new(Arc::new(client));

    let result = match action {
        VersionCommands::List { form_id } => match history.list_versions(&form_id).await {
            Ok(versions) => {
                let wire: Vec<_> = versions.iter().map(version_to_wire).collect();
                let rows = versions.iter().map(VersionRow::from).collect();
                format.print(&wire, rows)?;
                Ok(())
            }
            Err(err) => Err(err),
        },
        VersionCommands::Get { form_id, version } => {
            match history.get_version(&form_id, version).await {
                Ok(Some(found)) => {
                    let rows: Vec<FieldRow> =
                        found.schema.fields.iter().map(FieldRow::from).collect();
                    format.print(&version_to_wire(&found), rows)?;
                    Ok(())
                }
                Ok(None) => Err(FormsError::version_not_found(&form_id, version)),
                Err(err) => Err(err),
            }
        }
        VersionCommands::Create { form_id, file } => {
            let schema = read_schema(&file)?;
            history.create_version(&form_id, &schema).await.map(|created| {
                println!("Created version {}", created.version_number);
            })
        }
        VersionCommands::Restore { form_id, version } => history
            .restore_version(&form_id, version)
            .await
            .map(|created| {
                println!(
                    "Restored version {} as version {}",
                    version, created.version_number
                );
            }),
        VersionCommands::Delete { form_id, version } => history
            .delete_version(&form_id, version)
            .await
            .map(|()| println!("Deleted version {}", version)),
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) if err.severity() == Severity::Warning => {
            output::report(&err);
            println!("{}", "Nothing was changed.".dimmed());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formkit_client::ClientConfig;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> Client {
        Client::with_config(ClientConfig {
            base_url: server.uri(),
            retry_delay: Duration::from_millis(1),
            max_retry_delay: Duration::from_millis(5),
            ..Default::default()
        })
        .unwrap()
    }

    fn delete(version: u32) -> VersionCommands {
        VersionCommands::Delete {
            form_id: "f1".into(),
            version,
        }
    }

    #[tokio::test]
    async fn test_refused_delete_of_active_version_exits_cleanly() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/forms/f1/versions/3"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "cannot delete active version 3",
                "code": "active_version"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = handle(delete(3), client(&server), OutputFormat::Json).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_missing_version_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/forms/f1/versions/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "message": "version 9 not found",
                "code": "not_found"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = handle(delete(9), client(&server), OutputFormat::Json)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
