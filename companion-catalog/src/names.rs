//! Identifier → display name resolution
//!
//! Lookups are keyed by lower-cased identifier, so `"EBO"` and `"ebo"`
//! resolve alike. An identifier missing from a lookup resolves to itself:
//! names are never dropped and never empty.

use std::collections::HashMap;

use companion_common::IdList;

use crate::records::{BlockRecord, FormationRecord, ProfessorRecord};

/// Case-insensitive identifier → display name map
#[derive(Debug, Clone, Default)]
pub struct NameLookup {
    names: HashMap<String, String>,
}

impl NameLookup {
    /// Build a lookup from `(identifier, display name)` pairs
    ///
    /// When two entries share an identifier (ignoring case) the later one wins.
    pub fn build<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let names = entries
            .into_iter()
            .map(|(id, name)| (id.as_ref().to_lowercase(), name.into()))
            .collect();
        Self { names }
    }

    /// Professors keyed by id, displayed as `"LAST First"`
    pub fn professors(records: &[ProfessorRecord]) -> Self {
        Self::build(
            records
                .iter()
                .map(|p| (p.professor_id.as_str(), p.display_name())),
        )
    }

    pub fn blocks(records: &[BlockRecord]) -> Self {
        Self::build(records.iter().map(|b| (b.bloc_id.as_str(), b.name.as_str())))
    }

    pub fn formations(records: &[FormationRecord]) -> Self {
        Self::build(
            records
                .iter()
                .map(|f| (f.formation_id.as_str(), f.name.as_str())),
        )
    }

    /// Display name for `id`, if known
    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(&id.to_lowercase()).map(String::as_str)
    }

    /// Display name for `id`, or `id` itself when unknown
    pub fn resolve(&self, id: &str) -> String {
        self.get(id).unwrap_or(id).to_string()
    }

    /// Resolve every identifier, keeping the list order
    pub fn resolve_all(&self, ids: &IdList) -> Vec<String> {
        ids.iter().map(|id| self.resolve(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
