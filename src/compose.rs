//! Provider form session: at most one add-or-edit form open at a time.
//!
//! Lifecycle: IDLE → COMPOSING (add | edit) → IDLE
//!
//! Submitting a draft that fails validation keeps the form open with the
//! draft intact. Cancel discards the draft without touching the store.

use serde::{Deserialize, Serialize};

use crate::models::{Provider, ProviderField, ProviderFields, ProviderId};
use crate::providers::{ProviderError, ProviderStore};

/// Errors from compose session transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("A provider form is already open")]
    AlreadyComposing,
    #[error("No provider form is open")]
    NotComposing,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Whether the open form creates a record or edits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposeMode {
    Add,
    Edit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ComposeState {
    #[default]
    Idle,
    Composing {
        draft: ProviderFields,
        target: Option<ProviderId>,
    },
}

#[derive(Debug, Default)]
pub struct ComposeSession {
    state: ComposeState,
}

impl ComposeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ComposeState {
        &self.state
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.state, ComposeState::Composing { .. })
    }

    pub fn draft(&self) -> Option<&ProviderFields> {
        match &self.state {
            ComposeState::Composing { draft, .. } => Some(draft),
            ComposeState::Idle => None,
        }
    }

    /// Record being edited. `None` when idle or adding.
    pub fn target(&self) -> Option<ProviderId> {
        match &self.state {
            ComposeState::Composing { target, .. } => *target,
            ComposeState::Idle => None,
        }
    }

    pub fn mode(&self) -> Option<ComposeMode> {
        match &self.state {
            ComposeState::Composing { target: None, .. } => Some(ComposeMode::Add),
            ComposeState::Composing { target: Some(_), .. } => Some(ComposeMode::Edit),
            ComposeState::Idle => None,
        }
    }

    /// Open an empty form for a new provider.
    pub fn begin_add(&mut self) -> Result<(), ComposeError> {
        self.ensure_idle()?;
        self.state = ComposeState::Composing {
            draft: ProviderFields::default(),
            target: None,
        };
        tracing::debug!("Compose session opened for add");
        Ok(())
    }

    /// Open a form pre-filled with an existing record's fields.
    pub fn begin_edit(
        &mut self,
        store: &ProviderStore,
        id: &ProviderId,
    ) -> Result<(), ComposeError> {
        self.ensure_idle()?;
        let provider = store.get(id).ok_or(ProviderError::NotFound(*id))?;
        self.state = ComposeState::Composing {
            draft: provider.fields.clone(),
            target: Some(*id),
        };
        tracing::debug!(provider_id = %id, "Compose session opened for edit");
        Ok(())
    }

    pub fn set_field(
        &mut self,
        field: ProviderField,
        value: impl Into<String>,
    ) -> Result<(), ComposeError> {
        match &mut self.state {
            ComposeState::Composing { draft, .. } => {
                draft.set(field, value);
                Ok(())
            }
            ComposeState::Idle => Err(ComposeError::NotComposing),
        }
    }

    /// Discard the draft. Returns false if no form was open.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.is_composing();
        self.state = ComposeState::Idle;
        if was_open {
            tracing::debug!("Compose session cancelled");
        }
        was_open
    }

    /// Commit the draft: add when no target, update otherwise.
    ///
    /// On validation failure the form stays open with the same draft. If the
    /// edit target has vanished the form closes and `NotFound` is returned.
    pub fn submit(&mut self, store: &mut ProviderStore) -> Result<Provider, ComposeError> {
        let (draft, target) = match std::mem::take(&mut self.state) {
            ComposeState::Composing { draft, target } => (draft, target),
            ComposeState::Idle => return Err(ComposeError::NotComposing),
        };

        let result = match &target {
            None => store.add(draft.clone()),
            Some(id) => store.update(id, draft.clone()),
        };

        match result {
            Ok(provider) => {
                tracing::debug!(provider_id = %provider.id, "Compose session submitted");
                Ok(provider)
            }
            Err(ProviderError::Validation(e)) => {
                self.state = ComposeState::Composing { draft, target };
                Err(ProviderError::Validation(e).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Close the form if it is editing `id`. Returns true if it was closed.
    pub fn close_if_editing(&mut self, id: &ProviderId) -> bool {
        if self.target() == Some(*id) {
            self.state = ComposeState::Idle;
            tracing::debug!(provider_id = %id, "Compose session closed, record removed");
            return true;
        }
        false
    }

    fn ensure_idle(&self) -> Result<(), ComposeError> {
        if self.is_composing() {
            return Err(ComposeError::AlreadyComposing);
        }
        Ok(())
    }
}
