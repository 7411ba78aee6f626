//! Form events
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormEvent {
    Created { form_id: String },
    VersionCreated { form_id: String, version_number: u32 },
    VersionRestored { form_id: String, from_version: u32, new_version: u32 },
    VersionDeleted { form_id: String, version_number: u32 },
    Published { form_id: String, version_number: u32 },
}

impl FormEvent {
    pub fn form_id(&self) -> &str {
        match self {
            FormEvent::Created { form_id }
            | FormEvent::VersionCreated { form_id, .. }
            | FormEvent::VersionRestored { form_id, .. }
            | FormEvent::VersionDeleted { form_id, .. }
            | FormEvent::Published { form_id, .. } => form_id,
        }
    }
}
