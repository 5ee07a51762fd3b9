use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{MAX_NOTES_LEN, MAX_SHORT_FIELD_LEN};

/// Opaque provider identifier. Minted once on add, never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(Uuid);

impl ProviderId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for ProviderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

// ═══════════════════════════════════════════
// Field descriptors
// ═══════════════════════════════════════════

/// Every editable provider field, in form display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderField {
    Name,
    Specialty,
    Address,
    Phone,
    Email,
    Fax,
    Notes,
}

impl ProviderField {
    pub const ALL: [ProviderField; 7] = [
        Self::Name,
        Self::Specialty,
        Self::Address,
        Self::Phone,
        Self::Email,
        Self::Fax,
        Self::Notes,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Specialty => "specialty",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Fax => "fax",
            Self::Notes => "notes",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Specialty => "Specialty",
            Self::Address => "Address",
            Self::Phone => "Phone",
            Self::Email => "Email",
            Self::Fax => "Fax",
            Self::Notes => "Notes",
        }
    }

    pub fn placeholder(&self) -> String {
        format!("📝 {}", self.key())
    }

    pub fn accessibility_label(&self) -> String {
        format!("Enter {}", self.key())
    }

    /// Only notes get a multi-line input.
    pub fn multiline(&self) -> bool {
        matches!(self, Self::Notes)
    }

    pub fn required(&self) -> bool {
        matches!(self, Self::Name)
    }

    /// Maximum length in characters.
    pub fn max_len(&self) -> usize {
        match self {
            Self::Notes => MAX_NOTES_LEN,
            _ => MAX_SHORT_FIELD_LEN,
        }
    }

    /// Parse a field key, ignoring case.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
    }
}

impl std::fmt::Display for ProviderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════
// Draft + record
// ═══════════════════════════════════════════

/// Editable provider values, not yet committed to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderFields {
    pub name: String,
    pub specialty: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub fax: String,
    pub notes: String,
}

impl ProviderFields {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: ProviderField) -> &str {
        match field {
            ProviderField::Name => &self.name,
            ProviderField::Specialty => &self.specialty,
            ProviderField::Address => &self.address,
            ProviderField::Phone => &self.phone,
            ProviderField::Email => &self.email,
            ProviderField::Fax => &self.fax,
            ProviderField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: ProviderField, value: impl Into<String>) {
        let slot = match field {
            ProviderField::Name => &mut self.name,
            ProviderField::Specialty => &mut self.specialty,
            ProviderField::Address => &mut self.address,
            ProviderField::Phone => &mut self.phone,
            ProviderField::Email => &mut self.email,
            ProviderField::Fax => &mut self.fax,
            ProviderField::Notes => &mut self.notes,
        };
        *slot = value.into();
    }
}

/// A healthcare provider or facility held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    #[serde(flatten)]
    pub fields: ProviderFields,
}

impl Provider {
    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn specialty(&self) -> &str {
        &self.fields.specialty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_in_form_order() {
        let keys: Vec<&str> = ProviderField::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            vec!["name", "specialty", "address", "phone", "email", "fax", "notes"]
        );
    }

    #[test]
    fn only_name_is_required() {
        let required: Vec<_> = ProviderField::ALL.into_iter().filter(|f| f.required()).collect();
        assert_eq!(required, vec![ProviderField::Name]);
    }

    #[test]
    fn only_notes_is_multiline() {
        assert!(ProviderField::Notes.multiline());
        assert!(!ProviderField::Address.multiline());
        assert_eq!(ProviderField::Notes.max_len(), MAX_NOTES_LEN);
        assert_eq!(ProviderField::Fax.max_len(), MAX_SHORT_FIELD_LEN);
    }

    #[test]
    fn from_key_is_case_insensitive() {
        assert_eq!(ProviderField::from_key("Specialty"), Some(ProviderField::Specialty));
        assert_eq!(ProviderField::from_key(" fax "), Some(ProviderField::Fax));
        assert_eq!(ProviderField::from_key("website"), None);
    }

    #[test]
    fn labels_and_prompts() {
        assert_eq!(ProviderField::Phone.label(), "Phone");
        assert_eq!(ProviderField::Phone.placeholder(), "📝 phone");
        assert_eq!(ProviderField::Phone.accessibility_label(), "Enter phone");
    }

    #[test]
    fn set_then_get_each_field() {
        let mut draft = ProviderFields::default();
        for field in ProviderField::ALL {
            draft.set(field, field.key().to_uppercase());
        }
        for field in ProviderField::ALL {
            assert_eq!(draft.get(field), field.key().to_uppercase());
        }
    }

    #[test]
    fn provider_serializes_flat() {
        let provider = Provider {
            id: ProviderId::new_v4(),
            fields: ProviderFields {
                specialty: "Cardiology".into(),
                ..ProviderFields::named("Dr. A")
            },
        };
        let json = serde_json::to_value(&provider).unwrap();
        assert_eq!(json["name"], "Dr. A");
        assert_eq!(json["specialty"], "Cardiology");
        assert_eq!(json["notes"], "");
        assert_eq!(json["id"], provider.id.to_string());
    }

    #[test]
    fn provider_id_parses_from_display() {
        let id = ProviderId::new_v4();
        let parsed: ProviderId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-an-id".parse::<ProviderId>().is_err());
    }
}
