//! Field commands on a local schema file

use std::path::Path;

use formkit_core::wire::schema_to_wire;
use formkit_core::{FieldEditor, FieldPatch};

use super::{read_schema, write_schema};
use crate::output::{FieldRow, OutputFormat};
use crate::FieldCommands;

const NEW_FORM_TITLE: &str = "Untitled form";

pub fn handle(action: FieldCommands, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        FieldCommands::Show { file } => {
            let editor = open(&file, false)?;
            show(&editor, format)?;
        }
        FieldCommands::Add {
            file,
            field_type,
            label,
            required,
            choices,
        } => {
            let mut editor = open(&file, true)?;
            let id = editor.add_field(field_type).id.clone();
            let patch = FieldPatch {
                label,
                is_required: required.then_some(true),
                choices: (!choices.is_empty()).then_some(choices),
                ..Default::default()
            };
            editor.update_field(&id, patch)?;
            save(&file, &editor)?;
            println!("Added field {}", id);
        }
        FieldCommands::Update {
            file,
            id,
            label,
            placeholder,
            clear_placeholder,
            required,
            field_type,
            choices,
        } => {
            let mut editor = open(&file, false)?;
            let placeholder = if clear_placeholder {
                Some(None)
            } else {
                placeholder.map(Some)
            };
            editor.update_field(
                &id,
                FieldPatch {
                    label,
                    placeholder,
                    is_required: required,
                    field_type,
                    choices,
                    validation_rules: None,
                },
            )?;
            save(&file, &editor)?;
            println!("Updated field {}", id);
        }
        FieldCommands::Remove { file, id } => {
            let mut editor = open(&file, false)?;
            let removed = editor.remove_field(&id)?;
            save(&file, &editor)?;
            println!("Removed field {} ({})", removed.id, removed.label);
        }
        FieldCommands::Reorder {
            file,
            source,
            target,
        } => {
            let mut editor = open(&file, false)?;
            for id in [&source, &target] {
                if editor.field(id).is_none() {
                    anyhow::bail!("field not found: {}", id);
                }
            }
            editor.reorder(&source, &target);
            save(&file, &editor)?;
            show(&editor, format)?;
        }
    }
    Ok(())
}

fn open(path: &Path, create: bool) -> anyhow::Result<FieldEditor> {
    if create && !path.exists() {
        return Ok(FieldEditor::new(NEW_FORM_TITLE));
    }
    Ok(FieldEditor::from_schema(read_schema(path)?))
}

/// Schemas are validated before they hit the disk
fn save(path: &Path, editor: &FieldEditor) -> anyhow::Result<()> {
    editor.schema().validate()?;
    write_schema(path, editor.schema())
}

fn show(editor: &FieldEditor, format: OutputFormat) -> anyhow::Result<()> {
    let rows = editor.fields().iter().map(FieldRow::from).collect();
    format.print(&schema_to_wire(editor.schema()), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formkit_core::FieldType;

    fn add(file: &Path, field_type: FieldType, choices: Vec<String>) {
        handle(
            FieldCommands::Add {
                file: file.to_path_buf(),
                field_type,
                label: None,
                required: false,
                choices,
            },
            OutputFormat::Json,
        )
        .unwrap();
    }

    #[test]
    fn test_add_creates_file_and_reorder_persists() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("contact.json");

        add(&file, FieldType::Text, vec![]);
        add(&file, FieldType::Email, vec![]);

        let schema = read_schema(&file).unwrap();
        assert_eq!(schema.title, NEW_FORM_TITLE);
        let ids: Vec<String> = schema.fields.iter().map(|f| f.id.clone()).collect();
        assert_eq!(schema.fields[1].label, "Email Field");

        handle(
            FieldCommands::Reorder {
                file: file.clone(),
                source: ids[0].clone(),
                target: ids[1].clone(),
            },
            OutputFormat::Json,
        )
        .unwrap();

        let schema = read_schema(&file).unwrap();
        assert_eq!(schema.fields[0].id, ids[1]);
        assert_eq!(schema.fields[0].order, 1);
        assert_eq!(schema.fields[1].order, 2);
    }

    #[test]
    fn test_select_without_choices_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("survey.json");

        let result = handle(
            FieldCommands::Add {
                file: file.clone(),
                field_type: FieldType::Select,
                label: None,
                required: false,
                choices: vec![],
            },
            OutputFormat::Json,
        );
        assert!(result.is_err());
        assert!(!file.exists());

        add(&file, FieldType::Select, vec!["a".into(), "b".into()]);
        assert_eq!(read_schema(&file).unwrap().fields[0].options.choices, vec!["a", "b"]);
    }

    #[test]
    fn test_update_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("form.json");
        add(&file, FieldType::Text, vec![]);
        add(&file, FieldType::Number, vec![]);
        let first = read_schema(&file).unwrap().fields[0].id.clone();

        handle(
            FieldCommands::Update {
                file: file.clone(),
                id: first.clone(),
                label: Some("Full name".into()),
                placeholder: Some("Jane Doe".into()),
                clear_placeholder: false,
                required: Some(true),
                field_type: None,
                choices: None,
            },
            OutputFormat::Json,
        )
        .unwrap();

        let field = read_schema(&file).unwrap().fields[0].clone();
        assert_eq!(field.label, "Full name");
        assert_eq!(field.placeholder.as_deref(), Some("Jane Doe"));
        assert!(field.is_required);

        handle(
            FieldCommands::Remove {
                file: file.clone(),
                id: first,
            },
            OutputFormat::Json,
        )
        .unwrap();
        let schema = read_schema(&file).unwrap();
        assert_eq!(schema.fields.len(), 1);
        assert_eq!(schema.fields[0].order, 1);
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("form.json");
        add(&file, FieldType::Text, vec![]);

        let result = handle(
            FieldCommands::Remove {
                file: file.clone(),
                id: "field_missing".into(),
            },
            OutputFormat::Json,
        );
        assert!(result.unwrap_err().to_string().contains("field not found"));
    }
}
