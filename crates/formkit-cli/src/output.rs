//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use formkit_core::{FieldDefinition, FormVersion, FormView, FormsError, Severity};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Render `data` as JSON/YAML, or `rows` as a table
    pub fn render<T: Serialize, R: Tabled>(&self, data: &T, rows: Vec<R>) -> anyhow::Result<String> {
        Ok(match self {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Yaml => serde_yaml::to_string(data)?,
            OutputFormat::Table => Table::new(rows).with(Style::rounded()).to_string(),
        })
    }

    pub fn print<T: Serialize, R: Tabled>(&self, data: &T, rows: Vec<R>) -> anyhow::Result<()> {
        println!("{}", self.render(data, rows)?);
        Ok(())
    }
}

#[derive(Tabled)]
pub struct FormRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Active")]
    pub current_version: String,
    #[tabled(rename = "Versions")]
    pub version_count: usize,
    #[tabled(rename = "Updated")]
    pub updated_at: String,
}

impl From<&FormView> for FormRow {
    fn from(form: &FormView) -> Self {
        Self {
            id: form.id.clone(),
            title: form.schema.title.clone(),
            status: format!("{:?}", form.status).to_lowercase(),
            current_version: form
                .current_version
                .map(|n| format!("v{}", n))
                .unwrap_or_else(|| "-".into()),
            version_count: form.version_count,
            updated_at: form.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct VersionRow {
    #[tabled(rename = "Version")]
    pub version: String,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Fields")]
    pub fields: usize,
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<&FormVersion> for VersionRow {
    fn from(version: &FormVersion) -> Self {
        Self {
            version: format!("v{}", version.version_number),
            id: version.id.clone(),
            title: version.schema.title.clone(),
            fields: version.schema.fields.len(),
            created_at: version.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct FieldRow {
    #[tabled(rename = "#")]
    pub order: u32,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Type")]
    pub field_type: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Required")]
    pub required: String,
    #[tabled(rename = "Choices")]
    pub choices: String,
}

impl From<&FieldDefinition> for FieldRow {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            order: field.order,
            id: field.id.clone(),
            field_type: field.field_type.to_string(),
            label: field.label.clone(),
            required: if field.is_required { "yes" } else { "no" }.to_string(),
            choices: field.options.choices.join(", "),
        }
    }
}

/// Print a domain error; conflicts are warnings, not failures
pub fn report(err: &FormsError) {
    match err.severity() {
        Severity::Warning => eprintln!("{} {}", "warning:".yellow().bold(), err),
        Severity::Error => eprintln!("{} {}", "error:".red().bold(), err),
    }
}
