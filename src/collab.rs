//! Boundaries to the collaborators that feed composition: candidate retrieval and per-user
//! settings. Both are plain synchronous calls; timeouts and retries belong to the caller.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::error::{SplicerError, SplicerResult},
    request::model::{CandidateItem, CandidatePool, LeadRef},
};

/// Lead-in/lead-out preferences stored for a user.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UserDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_in: Option<LeadRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_out: Option<LeadRef>,
}

/// Settings collaborator. `Ok(None)` means the user has no stored defaults.
pub trait SettingsLookup {
    fn user_defaults(&self, user_id: &str) -> anyhow::Result<Option<UserDefaults>>;
}

/// No settings at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSettings;

impl SettingsLookup for NoSettings {
    fn user_defaults(&self, _user_id: &str) -> anyhow::Result<Option<UserDefaults>> {
        Ok(None)
    }
}

/// In-memory settings keyed by user id, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StaticSettings {
    #[serde(default)]
    pub users: BTreeMap<String, UserDefaults>,
}

impl SettingsLookup for StaticSettings {
    fn user_defaults(&self, user_id: &str) -> anyhow::Result<Option<UserDefaults>> {
        Ok(self.users.get(user_id).cloned())
    }
}

/// Constraints passed along with a retrieval query.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RetrievalFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,
    #[serde(default)]
    pub exclude_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl RetrievalFilters {
    /// Return `true` when `item` passes every constraint except `limit`.
    pub fn accepts(&self, item: &CandidateItem) -> bool {
        if self.min_duration.is_some_and(|min| item.duration < min) {
            return false;
        }
        if self.max_duration.is_some_and(|max| item.duration > max) {
            return false;
        }
        !self.exclude_ids.iter().any(|id| *id == item.id)
    }
}

/// Candidate retrieval collaborator. May legitimately return nothing.
pub trait CandidateRetriever {
    fn retrieve(
        &self,
        query_terms: &[String],
        filters: &RetrievalFilters,
    ) -> anyhow::Result<Vec<CandidateItem>>;
}

/// In-memory catalog matching query terms against item tags (case-insensitive).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StaticCatalog {
    pub items: Vec<CandidateItem>,
}

impl CandidateRetriever for StaticCatalog {
    fn retrieve(
        &self,
        query_terms: &[String],
        filters: &RetrievalFilters,
    ) -> anyhow::Result<Vec<CandidateItem>> {
        let terms: Vec<String> = query_terms.iter().map(|t| t.to_lowercase()).collect();
        let hits = self
            .items
            .iter()
            .filter(|item| {
                item.tags
                    .iter()
                    .any(|tag| terms.contains(&tag.to_lowercase()))
            })
            .filter(|item| filters.accepts(item))
            .take(filters.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(hits)
    }
}

/// Run every query against `retriever` and build the request pool.
///
/// Results are merged in query order and deduplicated by id. Owned items are passed through.
/// An empty result is a terminal [`SplicerError::EmptyPool`].
pub fn collect_pool(
    retriever: &dyn CandidateRetriever,
    queries: &[Vec<String>],
    filters: &RetrievalFilters,
    owned: Vec<CandidateItem>,
) -> SplicerResult<CandidatePool> {
    let mut seen = BTreeSet::new();
    let mut library = Vec::new();
    for terms in queries {
        let items = retriever
            .retrieve(terms, filters)
            .map_err(|e| e.context(format!("candidate retrieval for {terms:?}")))?;
        for item in items {
            if seen.insert(item.id.clone()) {
                library.push(item);
            }
        }
    }

    let pool = CandidatePool { library, owned };
    if pool.is_empty() {
        return Err(SplicerError::EmptyPool);
    }
    Ok(pool)
}

#[cfg(test)]
#[path = "../tests/unit/collab/collab.rs"]
mod tests;
