//! FormKit core
//!
//! Form schema editing and version history for the FormKit form builder.
//!
//! ## Architecture
//!
//! - **Domain Layer**: schema value objects, the `Form` aggregate, the field editor
//! - **Application Layer**: `VersionHistoryManager`, the client-side read model of a form's history
//! - **Ports Layer**: `VersionStore` / `FormStore`, the persistence collaborator
//! - **Infrastructure Layer**: `InMemoryFormRepository`
//! - **Wire**: the REST JSON shapes and the pure mapping to the canonical schema
//!
//! ## Example
//!
//! ```rust
//! use formkit_core::{FieldEditor, FieldType};
//!
//! let mut editor = FieldEditor::new("Contact us");
//! let name = editor.add_field(FieldType::Text).id.clone();
//! let email = editor.add_field(FieldType::Email).id.clone();
//! editor.reorder(&name, &email);
//! assert_eq!(editor.fields()[0].id, email);
//! ```

pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;
pub mod wire;
pub mod error;

pub use domain::{
    FieldDefinition, FieldEditor, FieldOptions, FieldPatch, FieldType, Form, FormEvent,
    FormSchema, FormSettings, FormStatus, FormVersion, FormView, Notifications, Theme,
};
pub use application::{HistoryState, LoadStatus, VersionHistoryManager};
pub use ports::{FormStore, VersionStore};
pub use infrastructure::InMemoryFormRepository;
pub use error::{ErrorKind, FormsError, Result, Severity};
