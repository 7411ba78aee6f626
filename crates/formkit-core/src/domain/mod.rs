//! FormKit domain model
//!
//! - **Value objects**: `FormSchema`, `FieldDefinition`, `FormSettings`
//! - **Aggregate**: `Form`, owner of an append-only list of `FormVersion`s
//! - **Domain service**: `FieldEditor`, ordered field editing
//! - **Events**: `FormEvent`, drained by repositories after each mutation

pub mod schema;
pub mod form;
pub mod editor;
pub mod events;

pub use schema::*;
pub use form::*;
pub use editor::*;
pub use events::*;
