//! Provider directory: in-memory store of provider and facility records.
//!
//! The store is the only owner of the collection. Records keep insertion
//! order; edits replace fields in place, removals close the gap. Nothing is
//! persisted: the collection lives as long as the owning `CoreState`.

use crate::models::{Provider, ProviderField, ProviderFields, ProviderId};

// ═══════════════════════════════════════════════════════════
// Error types
// ═══════════════════════════════════════════════════════════

/// A draft that cannot be committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("{field} must be {max} characters or fewer")]
    TooLong { field: ProviderField, max: usize },
}

/// Errors from store mutations. Reads never fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Provider not found: {0}")]
    NotFound(ProviderId),
}

/// Check a draft before it enters the collection.
///
/// Name must contain something other than whitespace. Every field must fit
/// its length limit.
pub fn validate_fields(draft: &ProviderFields) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    for field in ProviderField::ALL {
        let max = field.max_len();
        if draft.get(field).chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
    }
    Ok(())
}

/// Case-insensitive substring match on name or specialty.
/// `needle` must already be lowercased.
fn matches_query(provider: &Provider, needle: &str) -> bool {
    provider.name().to_lowercase().contains(needle)
        || provider.specialty().to_lowercase().contains(needle)
}

// ═══════════════════════════════════════════════════════════
// ProviderStore
// ═══════════════════════════════════════════════════════════

/// Ordered in-memory collection of providers.
#[derive(Debug, Default)]
pub struct ProviderStore {
    providers: Vec<Provider>,
}

impl ProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in stored order.
    pub fn list(&self) -> &[Provider] {
        &self.providers
    }

    /// Records whose name or specialty contains `query`, ignoring case.
    /// An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<Provider> {
        if query.is_empty() {
            return self.providers.clone();
        }
        let needle = query.to_lowercase();
        let results: Vec<Provider> = self
            .providers
            .iter()
            .filter(|p| matches_query(p, &needle))
            .cloned()
            .collect();
        tracing::debug!(matches = results.len(), "Provider search");
        results
    }

    pub fn get(&self, id: &ProviderId) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == *id)
    }

    pub fn contains(&self, id: &ProviderId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Validate the draft, mint a fresh id and append the record.
    pub fn add(&mut self, draft: ProviderFields) -> Result<Provider, ProviderError> {
        if let Err(e) = validate_fields(&draft) {
            tracing::warn!(error = %e, "Provider add rejected");
            return Err(e.into());
        }

        let mut id = ProviderId::new_v4();
        while self.contains(&id) {
            id = ProviderId::new_v4();
        }

        let provider = Provider { id, fields: draft };
        self.providers.push(provider.clone());
        tracing::info!(provider_id = %id, count = self.providers.len(), "Provider added");
        Ok(provider)
    }

    /// Replace every field of an existing record. Id and position are kept.
    pub fn update(
        &mut self,
        id: &ProviderId,
        draft: ProviderFields,
    ) -> Result<Provider, ProviderError> {
        let index = self.position(id).ok_or_else(|| {
            tracing::warn!(provider_id = %id, "Provider update on missing id");
            ProviderError::NotFound(*id)
        })?;

        if let Err(e) = validate_fields(&draft) {
            tracing::warn!(provider_id = %id, error = %e, "Provider update rejected");
            return Err(e.into());
        }

        let slot = &mut self.providers[index];
        slot.fields = draft;
        tracing::info!(provider_id = %id, "Provider updated");
        Ok(slot.clone())
    }

    /// Remove a record permanently. Returns the removed record.
    pub fn remove(&mut self, id: &ProviderId) -> Result<Provider, ProviderError> {
        let index = self.position(id).ok_or_else(|| {
            tracing::warn!(provider_id = %id, "Provider remove on missing id");
            ProviderError::NotFound(*id)
        })?;

        let removed = self.providers.remove(index);
        tracing::info!(provider_id = %id, count = self.providers.len(), "Provider removed");
        Ok(removed)
    }

    fn position(&self, id: &ProviderId) -> Option<usize> {
        self.providers.iter().position(|p| p.id == *id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn fields(name: &str, specialty: &str) -> ProviderFields {
        ProviderFields {
            name: name.into(),
            specialty: specialty.into(),
            ..ProviderFields::default()
        }
    }

    fn names(providers: &[Provider]) -> Vec<&str> {
        providers.iter().map(|p| p.name()).collect()
    }

    // ───────────────────────────────────────
    // add
    // ───────────────────────────────────────

    #[test]
    fn add_appends_in_call_order_with_unique_ids() {
        let mut store = ProviderStore::new();
        let mut ids = HashSet::new();
        for name in ["Dr. A", "Clinic B", "Dr. C", "Lab D"] {
            let p = store.add(ProviderFields::named(name)).unwrap();
            assert!(ids.insert(p.id), "duplicate id minted");
        }
        assert_eq!(names(store.list()), vec!["Dr. A", "Clinic B", "Dr. C", "Lab D"]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn add_returns_stored_record() {
        let mut store = ProviderStore::new();
        let p = store.add(fields("Dr. A", "Cardiology")).unwrap();
        assert_eq!(store.get(&p.id), Some(&p));
        assert_eq!(p.specialty(), "Cardiology");
        assert_eq!(p.fields.phone, "");
    }

    #[test]
    fn add_empty_name_rejected() {
        let mut store = ProviderStore::new();
        let err = store.add(ProviderFields::named("")).unwrap_err();
        assert_eq!(err, ProviderError::Validation(ValidationError::NameRequired));
        assert!(store.is_empty());
    }

    #[test]
    fn add_whitespace_name_rejected() {
        let mut store = ProviderStore::new();
        let err = store.add(fields(" \t\n ", "Cardiology")).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(ValidationError::NameRequired)));
        assert!(store.list().is_empty());
    }

    #[test]
    fn add_stores_values_verbatim() {
        let mut store = ProviderStore::new();
        let p = store.add(ProviderFields::named("  Dr. A ")).unwrap();
        assert_eq!(p.name(), "  Dr. A ");
    }

    #[test]
    fn add_overlong_notes_rejected() {
        let mut store = ProviderStore::new();
        let mut draft = ProviderFields::named("Dr. A");
        draft.notes = "x".repeat(ProviderField::Notes.max_len() + 1);
        let err = store.add(draft).unwrap_err();
        assert_eq!(
            err,
            ProviderError::Validation(ValidationError::TooLong {
                field: ProviderField::Notes,
                max: ProviderField::Notes.max_len(),
            })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn length_limit_counts_characters() {
        let mut draft = ProviderFields::named("é".repeat(ProviderField::Name.max_len()));
        assert!(validate_fields(&draft).is_ok());
        draft.name.push('é');
        assert!(validate_fields(&draft).is_err());
    }

    #[test]
    fn validation_messages() {
        assert_eq!(ValidationError::NameRequired.to_string(), "Name is required");
        let err = ValidationError::TooLong { field: ProviderField::Phone, max: 200 };
        assert_eq!(err.to_string(), "Phone must be 200 characters or fewer");
    }

    // ───────────────────────────────────────
    // search
    // ───────────────────────────────────────

    #[test]
    fn search_empty_equals_list() {
        let mut store = ProviderStore::new();
        store.add(fields("Dr. A", "Cardiology")).unwrap();
        store.add(fields("Clinic B", "General")).unwrap();
        assert_eq!(store.search(""), store.list().to_vec());
    }

    #[test]
    fn search_is_case_insensitive_on_name_or_specialty() {
        let mut store = ProviderStore::new();
        store.add(fields("Dr. A", "Cardiology")).unwrap();
        store.add(fields("Clinic B", "General")).unwrap();
        store.add(fields("CARDIFF Surgery", "Orthopedics")).unwrap();

        assert_eq!(names(&store.search("card")), vec!["Dr. A", "CARDIFF Surgery"]);
        assert_eq!(names(&store.search("GENERAL")), vec!["Clinic B"]);
        assert_eq!(names(&store.search("clinic")), vec!["Clinic B"]);
    }

    #[test]
    fn search_folds_non_ascii_case() {
        let mut store = ProviderStore::new();
        store.add(fields("ÉCOLE de Santé", "Pédiatrie")).unwrap();
        store.add(fields("Clinic B", "General")).unwrap();

        assert_eq!(names(&store.search("école")), vec!["ÉCOLE de Santé"]);
        assert_eq!(names(&store.search("PÉDIATRIE")), vec!["ÉCOLE de Santé"]);
        assert!(store.search("ecole").is_empty());
    }

    #[test]
    fn search_ignores_other_fields() {
        let mut store = ProviderStore::new();
        let mut draft = fields("Dr. A", "Cardiology");
        draft.notes = "prefers email".into();
        draft.address = "12 Elm Street".into();
        store.add(draft).unwrap();
        assert!(store.search("email").is_empty());
        assert!(store.search("elm").is_empty());
    }

    #[test]
    fn search_on_empty_store_is_empty() {
        let store = ProviderStore::new();
        assert!(store.search("").is_empty());
        assert!(store.search("anything").is_empty());
    }

    // ───────────────────────────────────────
    // update
    // ───────────────────────────────────────

    #[test]
    fn update_keeps_id_and_position() {
        let mut store = ProviderStore::new();
        store.add(ProviderFields::named("First")).unwrap();
        let target = store.add(fields("Dr. A", "Cardiology")).unwrap();
        store.add(ProviderFields::named("Last")).unwrap();

        let draft = ProviderFields {
            name: "Dr. A Smith".into(),
            specialty: String::new(),
            address: "1 Main St".into(),
            phone: "555-0100".into(),
            email: "a@example.com".into(),
            fax: "555-0101".into(),
            notes: "Moved offices".into(),
        };
        let updated = store.update(&target.id, draft.clone()).unwrap();

        assert_eq!(updated.id, target.id);
        assert_eq!(updated.fields, draft);
        assert_eq!(store.list()[1], updated);
        assert_eq!(names(store.list()), vec!["First", "Dr. A Smith", "Last"]);
    }

    #[test]
    fn update_missing_id_not_found() {
        let mut store = ProviderStore::new();
        store.add(ProviderFields::named("Dr. A")).unwrap();
        let before = store.list().to_vec();
        let missing = ProviderId::new_v4();

        let err = store.update(&missing, ProviderFields::named("X")).unwrap_err();
        assert_eq!(err, ProviderError::NotFound(missing));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn update_checks_existence_before_validation() {
        let mut store = ProviderStore::new();
        let missing = ProviderId::new_v4();
        let err = store.update(&missing, ProviderFields::named("")).unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn update_blank_name_leaves_record_untouched() {
        let mut store = ProviderStore::new();
        let p = store.add(fields("Dr. A", "Cardiology")).unwrap();
        let err = store.update(&p.id, fields("   ", "Oncology")).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(ValidationError::NameRequired)));
        assert_eq!(store.get(&p.id), Some(&p));
    }

    // ───────────────────────────────────────
    // remove
    // ───────────────────────────────────────

    #[test]
    fn remove_drops_exactly_one() {
        let mut store = ProviderStore::new();
        let a = store.add(ProviderFields::named("Dr. A")).unwrap();
        store.add(ProviderFields::named("Clinic B")).unwrap();

        let removed = store.remove(&a.id).unwrap();
        assert_eq!(removed, a);
        assert_eq!(store.len(), 1);
        assert!(!store.contains(&a.id));
    }

    #[test]
    fn remove_missing_id_not_found() {
        let mut store = ProviderStore::new();
        store.add(ProviderFields::named("Dr. A")).unwrap();
        let missing = ProviderId::new_v4();
        assert_eq!(store.remove(&missing), Err(ProviderError::NotFound(missing)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_twice_reports_not_found() {
        let mut store = ProviderStore::new();
        let a = store.add(ProviderFields::named("Dr. A")).unwrap();
        store.remove(&a.id).unwrap();
        assert!(matches!(store.remove(&a.id), Err(ProviderError::NotFound(_))));
    }

    #[test]
    fn add_search_remove_scenario() {
        let mut store = ProviderStore::new();
        let a = store.add(fields("Dr. A", "Cardiology")).unwrap();
        store.add(fields("Clinic B", "General")).unwrap();

        assert_eq!(names(&store.search("card")), vec!["Dr. A"]);

        store.remove(&a.id).unwrap();
        assert_eq!(names(store.list()), vec!["Clinic B"]);
    }
}
