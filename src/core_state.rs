//! Screen state for the provider directory.
//!
//! `CoreState` is the single owner of the `ProviderStore` for a session.
//! Front ends receive it by reference; nothing else mutates the collection.
//! It also tracks the views bound to a record (open form, open detail,
//! pending delete) so a removal can close them.

use crate::compose::{ComposeError, ComposeSession};
use crate::models::{Provider, ProviderField, ProviderId};
use crate::providers::{ProviderError, ProviderStore};

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

/// Errors from CoreState operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error("No delete is awaiting confirmation")]
    NoPendingDelete,
}

impl CoreError {
    /// True when the error refers to a record that no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::Provider(ProviderError::NotFound(_))
                | CoreError::Compose(ComposeError::Provider(ProviderError::NotFound(_)))
        )
    }

    /// True when a draft was rejected and the form stays open.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Provider(ProviderError::Validation(_))
                | CoreError::Compose(ComposeError::Provider(ProviderError::Validation(_)))
        )
    }
}

/// A destructive action waiting for the user to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub id: ProviderId,
    pub prompt: String,
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct CoreState {
    providers: ProviderStore,
    compose: ComposeSession,
    /// Record shown in the detail view.
    detail: Option<ProviderId>,
    pending_delete: Option<DeleteConfirmation>,
    query: String,
}

impl CoreState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Reads ───────────────────────────────────────────────

    pub fn providers(&self) -> &ProviderStore {
        &self.providers
    }

    pub fn compose(&self) -> &ComposeSession {
        &self.compose
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Rows for the list view: the store filtered by the current query.
    pub fn visible(&self) -> Vec<Provider> {
        self.providers.search(&self.query)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    // ── Compose session ─────────────────────────────────────

    pub fn begin_add(&mut self) -> Result<(), CoreError> {
        Ok(self.compose.begin_add()?)
    }

    pub fn begin_edit(&mut self, id: &ProviderId) -> Result<(), CoreError> {
        Ok(self.compose.begin_edit(&self.providers, id)?)
    }

    pub fn set_field(
        &mut self,
        field: ProviderField,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        Ok(self.compose.set_field(field, value)?)
    }

    pub fn cancel_compose(&mut self) -> bool {
        self.compose.cancel()
    }

    /// Commit the open form. A staged delete of the edited record is
    /// dropped, since its prompt no longer describes the record.
    pub fn submit(&mut self) -> Result<Provider, CoreError> {
        let provider = self.compose.submit(&mut self.providers)?;
        if self.pending_delete.as_ref().is_some_and(|p| p.id == provider.id) {
            self.pending_delete = None;
            tracing::debug!(provider_id = %provider.id, "Pending delete dropped after edit");
        }
        Ok(provider)
    }

    // ── Detail view ─────────────────────────────────────────

    pub fn detail(&self) -> Option<&Provider> {
        self.detail.as_ref().and_then(|id| self.providers.get(id))
    }

    pub fn open_detail(&mut self, id: &ProviderId) -> Result<&Provider, CoreError> {
        let provider = self
            .providers
            .get(id)
            .ok_or(ProviderError::NotFound(*id))?;
        self.detail = Some(*id);
        Ok(provider)
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    // ── Delete with confirmation ────────────────────────────

    pub fn pending_delete(&self) -> Option<&DeleteConfirmation> {
        self.pending_delete.as_ref()
    }

    /// Stage a delete. Nothing is removed until `confirm_delete`.
    pub fn request_delete(
        &mut self,
        id: &ProviderId,
    ) -> Result<&DeleteConfirmation, CoreError> {
        let provider = self
            .providers
            .get(id)
            .ok_or(ProviderError::NotFound(*id))?;
        let confirmation = DeleteConfirmation {
            id: *id,
            prompt: format!("Delete {}? This cannot be undone.", provider.name()),
        };
        tracing::debug!(provider_id = %id, "Delete awaiting confirmation");
        Ok(self.pending_delete.insert(confirmation))
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.pending_delete.take().is_some()
    }

    /// Remove the staged record.
    pub fn confirm_delete(&mut self) -> Result<Provider, CoreError> {
        let pending = self.pending_delete.take().ok_or(CoreError::NoPendingDelete)?;
        self.remove(&pending.id)
    }

    /// Remove a record and close every view bound to it.
    fn remove(&mut self, id: &ProviderId) -> Result<Provider, CoreError> {
        let removed = self.providers.remove(id)?;
        if self.detail == Some(*id) {
            self.detail = None;
        }
        self.compose.close_if_editing(id);
        if self.pending_delete.as_ref().is_some_and(|p| p.id == *id) {
            self.pending_delete = None;
        }
        Ok(removed)
    }
}
