//! Provider directory: front-end commands.
//!
//! Each command takes the screen state, performs one user action and returns
//! a serialisable view or a `CommandError` carrying a user-facing message:
//! - `list_providers` / `search_providers`: rows for the list view
//! - `get_provider_detail` / `close_provider_detail`: detail view
//! - `begin_add_provider` / `begin_edit_provider` / `set_provider_field` /
//!   `get_provider_form` / `submit_provider_form` / `cancel_provider_form`:
//!   the add-or-edit form
//! - `request_provider_delete` / `confirm_provider_delete` /
//!   `cancel_provider_delete`: destructive delete behind a confirmation

use serde::{Deserialize, Serialize};

use crate::compose::ComposeMode;
use crate::core_state::{CoreError, CoreState};
use crate::models::{Provider, ProviderField, ProviderFields, ProviderId};

// ═══════════════════════════════════════════
// View types: serialised to the front end
// ═══════════════════════════════════════════

/// One row in the provider list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCard {
    pub id: String,
    pub name: String,
    pub specialty: String,
}

impl From<&Provider> for ProviderCard {
    fn from(p: &Provider) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.fields.name.clone(),
            specialty: p.fields.specialty.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderListView {
    pub query: String,
    pub rows: Vec<ProviderCard>,
    /// Size of the whole collection, before filtering.
    pub total: usize,
}

/// One labelled input (or read-only value) in a form or detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub field: ProviderField,
    pub label: String,
    pub placeholder: String,
    pub accessibility_label: String,
    pub multiline: bool,
    pub required: bool,
    pub value: String,
}

fn field_views(values: &ProviderFields) -> Vec<FieldView> {
    ProviderField::ALL
        .into_iter()
        .map(|field| FieldView {
            field,
            label: field.label().to_string(),
            placeholder: field.placeholder(),
            accessibility_label: field.accessibility_label(),
            multiline: field.multiline(),
            required: field.required(),
            value: values.get(field).to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDetail {
    pub id: String,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub mode: ComposeMode,
    pub title: String,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePrompt {
    pub id: String,
    pub prompt: String,
}

// ═══════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The referenced provider no longer exists; the list should be refreshed.
    NotFound,
    /// The draft was rejected; the form stays open.
    Validation,
    InvalidRequest,
}

/// Error returned to the front end: a stable code plus a message to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

impl From<CoreError> for CommandError {
    fn from(e: CoreError) -> Self {
        let code = if e.is_not_found() {
            ErrorCode::NotFound
        } else if e.is_validation() {
            ErrorCode::Validation
        } else {
            ErrorCode::InvalidRequest
        };
        Self {
            code,
            message: e.to_string(),
        }
    }
}

// ═══════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════

fn parse_id(provider_id: &str) -> Result<ProviderId, CommandError> {
    if provider_id.trim().is_empty() {
        return Err(CommandError::invalid("Provider ID is required"));
    }
    provider_id
        .parse()
        .map_err(|_| CommandError::invalid(format!("Invalid provider ID: {provider_id}")))
}

fn current_form(state: &CoreState) -> Option<FormView> {
    let compose = state.compose();
    let (mode, draft) = (compose.mode()?, compose.draft()?);
    let title = match mode {
        ComposeMode::Add => "Add Provider or Facility",
        ComposeMode::Edit => "Edit Provider",
    };
    Some(FormView {
        mode,
        title: title.to_string(),
        fields: field_views(draft),
    })
}

fn form_or_err(state: &CoreState) -> Result<FormView, CommandError> {
    current_form(state).ok_or_else(|| CommandError::invalid("No provider form is open"))
}

// ═══════════════════════════════════════════
// List + search
// ═══════════════════════════════════════════

/// Rows for the current search query.
pub fn list_providers(state: &CoreState) -> ProviderListView {
    ProviderListView {
        query: state.query().to_string(),
        rows: state.visible().iter().map(ProviderCard::from).collect(),
        total: state.providers().len(),
    }
}

/// Changes the search query and returns the filtered rows.
pub fn search_providers(state: &mut CoreState, query: &str) -> ProviderListView {
    state.set_query(query);
    list_providers(state)
}

// ═══════════════════════════════════════════
// Detail
// ═══════════════════════════════════════════

pub fn get_provider_detail(
    state: &mut CoreState,
    provider_id: &str,
) -> Result<ProviderDetail, CommandError> {
    let id = parse_id(provider_id)?;
    let provider = state.open_detail(&id)?;
    Ok(ProviderDetail {
        id: provider.id.to_string(),
        fields: field_views(&provider.fields),
    })
}

pub fn close_provider_detail(state: &mut CoreState) {
    state.close_detail();
}

// ═══════════════════════════════════════════
// Add / edit form
// ═══════════════════════════════════════════

pub fn begin_add_provider(state: &mut CoreState) -> Result<FormView, CommandError> {
    state.begin_add()?;
    form_or_err(state)
}

pub fn begin_edit_provider(
    state: &mut CoreState,
    provider_id: &str,
) -> Result<FormView, CommandError> {
    let id = parse_id(provider_id)?;
    state.begin_edit(&id)?;
    form_or_err(state)
}

/// Updates one draft field by key (e.g. `"phone"`).
pub fn set_provider_field(
    state: &mut CoreState,
    field: &str,
    value: &str,
) -> Result<FormView, CommandError> {
    let field = ProviderField::from_key(field)
        .ok_or_else(|| CommandError::invalid(format!("Unknown field: {field}")))?;
    state.set_field(field, value)?;
    form_or_err(state)
}

pub fn get_provider_form(state: &CoreState) -> Option<FormView> {
    current_form(state)
}

/// Commits the open form. On a validation error the form stays open.
pub fn submit_provider_form(state: &mut CoreState) -> Result<ProviderCard, CommandError> {
    let provider = state.submit()?;
    Ok(ProviderCard::from(&provider))
}

pub fn cancel_provider_form(state: &mut CoreState) -> bool {
    state.cancel_compose()
}

// ═══════════════════════════════════════════
// Delete
// ═══════════════════════════════════════════

pub fn request_provider_delete(
    state: &mut CoreState,
    provider_id: &str,
) -> Result<DeletePrompt, CommandError> {
    let id = parse_id(provider_id)?;
    let confirmation = state.request_delete(&id)?;
    Ok(DeletePrompt {
        id: confirmation.id.to_string(),
        prompt: confirmation.prompt.clone(),
    })
}

pub fn confirm_provider_delete(state: &mut CoreState) -> Result<ProviderCard, CommandError> {
    let removed = state.confirm_delete()?;
    Ok(ProviderCard::from(&removed))
}

pub fn cancel_provider_delete(state: &mut CoreState) -> bool {
    state.cancel_delete()
}
