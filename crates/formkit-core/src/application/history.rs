//! Version history manager
//!
//! Sequences calls to a [`VersionStore`] and keeps a per-form read model of
//! the version list. The cache changes only when a list fetch succeeds; a
//! failed operation records its message and leaves the last good list alone.
//!
//! Overlapping calls are not queued. Each operation takes a ticket from a
//! monotonic counter. A listing lands only when its ticket is newer than the
//! last list fetch that finished for that form, so a slow, older fetch cannot
//! overwrite a newer one. The status keeps its own watermark: a failed write
//! marks the form as errored but never rejects a listing still in flight.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::{FormSchema, FormVersion};
use crate::error::{FormsError, Result};
use crate::ports::VersionStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Local view of one form's history
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryState {
    pub status: LoadStatus,
    /// Last successfully fetched list, newest first
    pub versions: Vec<FormVersion>,
    pub last_error: Option<FormsError>,
    /// Ticket of the newest list fetch that landed, success or failure
    listed_ticket: u64,
    /// Ticket of the newest operation that set `status`
    status_ticket: u64,
}

impl HistoryState {
    /// The version the form currently points at, as far as the cache knows
    pub fn latest(&self) -> Option<&FormVersion> {
        self.versions.first()
    }
}

pub struct VersionHistoryManager {
    store: Arc<dyn VersionStore>,
    states: DashMap<String, HistoryState>,
    tickets: AtomicU64,
}

impl VersionHistoryManager {
    pub fn new(store: Arc<dyn VersionStore>) -> Self {
        Self {
            store,
            states: DashMap::new(),
            tickets: AtomicU64::new(0),
        }
    }

    /// Snapshot of the cached state for `form_id`
    pub fn state(&self, form_id: &str) -> HistoryState {
        self.states
            .get(form_id)
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Fetch every version, newest first, and replace the cache
    pub async fn list_versions(&self, form_id: &str) -> Result<Vec<FormVersion>> {
        let ticket = self.begin(form_id);
        match self.store.list_versions(form_id).await {
            Ok(mut versions) => {
                versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
                self.apply_listing(form_id, ticket, versions.clone());
                Ok(versions)
            }
            Err(err) => {
                self.record_list_error(form_id, ticket, &err);
                Err(err)
            }
        }
    }

    /// Look up one version by number
    ///
    /// `Ok(None)` means the fetch worked and the number is not in it.
    pub async fn get_version(
        &self,
        form_id: &str,
        version_number: u32,
    ) -> Result<Option<FormVersion>> {
        let versions = self.list_versions(form_id).await?;
        Ok(versions
            .into_iter()
            .find(|v| v.version_number == version_number))
    }

    /// Persist `schema` as a new version, then refresh
    pub async fn create_version(&self, form_id: &str, schema: &FormSchema) -> Result<FormVersion> {
        let ticket = self.begin(form_id);
        match self.store.create_version(form_id, schema).await {
            Ok(version) => {
                tracing::info!(form_id, version = version.version_number, "version created");
                self.refresh_after_write(form_id).await;
                Ok(version)
            }
            Err(err) => {
                self.record_error(form_id, ticket, &err);
                Err(err)
            }
        }
    }

    /// Append a copy of `version_number` as a new version, then refresh
    pub async fn restore_version(&self, form_id: &str, version_number: u32) -> Result<FormVersion> {
        let ticket = self.begin(form_id);
        match self.store.restore_version(form_id, version_number).await {
            Ok(version) => {
                tracing::info!(
                    form_id,
                    from = version_number,
                    version = version.version_number,
                    "version restored"
                );
                self.refresh_after_write(form_id).await;
                Ok(version)
            }
            Err(err) => {
                self.record_error(form_id, ticket, &err);
                Err(err)
            }
        }
    }

    /// Delete a non-active version, then refresh
    ///
    /// Refusal to delete the active version comes back as
    /// [`FormsError::ActiveVersion`], which carries warning severity.
    pub async fn delete_version(&self, form_id: &str, version_number: u32) -> Result<()> {
        let ticket = self.begin(form_id);
        match self.store.delete_version(form_id, version_number).await {
            Ok(()) => {
                tracing::info!(form_id, version = version_number, "version deleted");
                self.refresh_after_write(form_id).await;
                Ok(())
            }
            Err(err) => {
                self.record_error(form_id, ticket, &err);
                Err(err)
            }
        }
    }

    /// The write already happened; a failed refresh is only recorded
    async fn refresh_after_write(&self, form_id: &str) {
        if let Err(err) = self.list_versions(form_id).await {
            tracing::warn!(form_id, error = %err, "refresh after write failed");
        }
    }

    fn begin(&self, form_id: &str) -> u64 {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.states.entry(form_id.to_string()).or_default();
        state.status = LoadStatus::Loading;
        ticket
    }

    fn apply_listing(&self, form_id: &str, ticket: u64, versions: Vec<FormVersion>) -> bool {
        let mut state = self.states.entry(form_id.to_string()).or_default();
        if ticket <= state.listed_ticket {
            tracing::debug!(form_id, ticket, listed = state.listed_ticket, "stale listing dropped");
            return false;
        }
        state.listed_ticket = ticket;
        state.versions = versions;
        if ticket > state.status_ticket {
            state.status_ticket = ticket;
            state.status = LoadStatus::Loaded;
            state.last_error = None;
        }
        true
    }

    /// A failed fetch also retires older listings still in flight
    fn record_list_error(&self, form_id: &str, ticket: u64, err: &FormsError) -> bool {
        let mut state = self.states.entry(form_id.to_string()).or_default();
        if ticket > state.listed_ticket {
            state.listed_ticket = ticket;
        }
        drop(state);
        self.record_error(form_id, ticket, err)
    }

    /// Failed writes only touch the status; they never reject a listing
    fn record_error(&self, form_id: &str, ticket: u64, err: &FormsError) -> bool {
        tracing::warn!(form_id, error = %err, severity = ?err.severity(), "version operation failed");
        let mut state = self.states.entry(form_id.to_string()).or_default();
        if ticket <= state.status_ticket {
            return false;
        }
        state.status_ticket = ticket;
        state.status = LoadStatus::Error;
        state.last_error = Some(err.clone());
        true
    }
}
