//! In-memory character storage.
//!
//! The store owns every record and the identifier counter. Both live behind a
//! single async mutex so concurrent requests cannot interleave an id
//! allocation with an insert, or observe a half-applied update.

use std::collections::BTreeMap;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::character::{Character, CharacterId, StatUpdate};

/// Records keyed by identifier. Identifiers only grow, so key order is insertion order.
pub type CharacterMap = BTreeMap<CharacterId, Character>;

#[derive(Default)]
pub struct CharacterStore {
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    last_id: CharacterId,
    characters: CharacterMap,
}

impl CharacterStore {
    /// Creates an empty store whose first identifier will be 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next identifier and stores the character under it.
    ///
    /// Identifiers are never reused, even after the record they named is deleted.
    pub async fn create(&self, character: Character) -> (CharacterId, Character) {
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.characters.insert(id, character.clone());
        debug!(id, name = %character.name, "character created");
        (id, character)
    }

    /// Returns a snapshot of every stored character.
    pub async fn list(&self) -> CharacterMap {
        self.inner.lock().await.characters.clone()
    }

    /// Returns the characters whose role, level and charisma all equal the given values.
    ///
    /// Values compare as JSON: the string `"10"` never matches the number 10,
    /// and a `null` role matches only records stored with a `null` role.
    pub async fn find_by(&self, role: &Value, level: &Value, charisma: &Value) -> CharacterMap {
        let inner = self.inner.lock().await;
        inner
            .characters
            .iter()
            .filter(|(_, character)| {
                same_value(&character.role, role)
                    && same_value(&character.level, level)
                    && same_value(&character.charisma, charisma)
            })
            .map(|(id, character)| (*id, character.clone()))
            .collect()
    }

    /// Applies a partial stat update. Returns `None` without mutating anything
    /// when the identifier is unknown.
    pub async fn update(&self, id: CharacterId, update: &StatUpdate) -> Option<Character> {
        let mut inner = self.inner.lock().await;
        let Some(character) = inner.characters.get_mut(&id) else {
            debug!(id, "update for unknown character");
            return None;
        };
        character.apply(update);
        debug!(id, ?update, "character updated");
        Some(character.clone())
    }

    /// Removes a character, returning it if it existed.
    pub async fn delete(&self, id: CharacterId) -> Option<Character> {
        let removed = self.inner.lock().await.characters.remove(&id);
        match &removed {
            Some(_) => debug!(id, "character deleted"),
            None => debug!(id, "delete for unknown character"),
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.characters.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// JSON equality, except that an integer and a float holding the same number match.
fn same_value(stored: &Value, wanted: &Value) -> bool {
    match (stored.as_number(), wanted.as_number()) {
        (Some(a), Some(b)) if a.is_f64() || b.is_f64() => a.as_f64() == b.as_f64(),
        _ => stored == wanted,
    }
}
