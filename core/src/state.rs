// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Record of deployed object ids, persisted as `state.json` next to the
//! dashboards in the workspace.
//!
//! Keys follow the `{dashboard_ref}_{file}:{kind}` convention (dashboards
//! drop the file part), so the same state file can track every object of
//! every dashboard deployed from one source tree.

use std::collections::{BTreeMap, BTreeSet};

/// File name of the persisted state, relative to the workspace root folder.
pub const STATE_FILE: &str = "state.json";

/// Kind of object a state entry points at, encoded as the key suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    /// A SQL query.
    QueryId,
    /// A visualization attached to a query.
    VizId,
    /// A widget placed on a dashboard.
    WidgetId,
    /// A dashboard.
    DashboardId,
}

impl StateKind {
    /// Key suffix for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QueryId => "query_id",
            Self::VizId => "viz_id",
            Self::WidgetId => "widget_id",
            Self::DashboardId => "dashboard_id",
        }
    }

    /// Parses a key suffix back into a kind.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "query_id" => Some(Self::QueryId),
            "viz_id" => Some(Self::VizId),
            "widget_id" => Some(Self::WidgetId),
            "dashboard_id" => Some(Self::DashboardId),
            _ => None,
        }
    }

    /// Whether orphaned objects of this kind are deleted remotely.
    ///
    /// Dashboards are kept: dropping one from the source tree stops managing
    /// it but never destroys what users may still link to.
    #[must_use]
    pub const fn deletable(self) -> bool {
        !matches!(self, Self::DashboardId)
    }
}

/// State key of the dashboard belonging to `dashboard_ref`.
#[must_use]
pub fn dashboard_key(dashboard_ref: &str) -> String {
    format!("{dashboard_ref}:{}", StateKind::DashboardId.as_str())
}

/// Mapping from state keys to deployed object ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallState {
    entries: BTreeMap<String, String>,
}

impl InstallState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a state file.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a JSON object of strings.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_slice(bytes)?;
        Ok(Self { entries })
    }

    /// Serializes the state with the stable formatting the file is diffed in.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(&self.entries)
    }

    /// Looks up the object id recorded under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether an id is recorded under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Records an object id, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, id: impl Into<String>) {
        self.entries.insert(key.into(), id.into());
    }

    /// Drops the entry under `key`.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, id)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keeps only the `desired` keys and returns the orphaned objects whose
    /// kind allows remote deletion.
    ///
    /// Undesired entries of non-deletable kinds are dropped from the state
    /// without being returned. Entries whose key does not end in a known
    /// kind suffix are dropped with a warning.
    pub fn retain_desired(&mut self, desired: &BTreeSet<String>) -> Vec<(StateKind, String)> {
        let mut orphans = Vec::new();
        let mut kept = BTreeMap::new();

        for (key, id) in std::mem::take(&mut self.entries) {
            if desired.contains(&key) {
                kept.insert(key, id);
                continue;
            }

            match key.rsplit_once(':').and_then(|(_, kind)| StateKind::parse(kind)) {
                Some(kind) if kind.deletable() => orphans.push((kind, id)),
                Some(_) => {}
                None => tracing::warn!(%key, "dropping malformed state entry"),
            }
        }

        self.entries = kept;
        orphans
    }
}
