use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store-assigned identifier. Serialized as a string when used as a map key.
pub type CharacterId = u64;

/// A role-playing character as it appears on the wire: six flat fields, no identifier.
///
/// Field values are kept exactly as the client sent them, so `"level": "10"`
/// is stored as a string and never equals the number 10. Deserializing still
/// rejects missing and unknown fields: a create request either carries every
/// attribute or fails as malformed input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Character {
    pub name: Value,
    pub level: Value,
    pub role: Value,
    pub charisma: Value,
    pub strength: Value,
    pub dexterity: Value,
}

impl Character {
    pub fn new(
        name: impl Into<Value>,
        level: impl Into<Value>,
        role: impl Into<Value>,
        charisma: impl Into<Value>,
        strength: impl Into<Value>,
        dexterity: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            level: level.into(),
            role: role.into(),
            charisma: charisma.into(),
            strength: strength.into(),
            dexterity: dexterity.into(),
        }
    }

    /// Overwrites the stats that are present; `name`, `level` and `role` are fixed after creation.
    pub fn apply(&mut self, update: &StatUpdate) {
        if let Some(charisma) = &update.charisma {
            self.charisma = charisma.clone();
        }
        if let Some(strength) = &update.strength {
            self.strength = strength.clone();
        }
        if let Some(dexterity) = &update.dexterity {
            self.dexterity = dexterity.clone();
        }
    }
}

/// Body of `PUT /characters/{id}`. Omitted (or `null`) stats keep their prior value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StatUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charisma: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dexterity: Option<Value>,
}

/// `{"message": ...}` body used for confirmations and failures alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
