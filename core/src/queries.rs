// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Discovery and parsing of the dashboards-as-code source tree.
//!
//! A source tree is two levels of folders, `<step>/<dashboard>/`, each leaf
//! holding the `*.sql` files of one dashboard. The first line of a SQL file
//! that starts with a magic comment configures how the query is rendered:
//!
//! ```sql
//! -- viz type=table, name=Overview, columns=region,revenue
//! -- widget title=Revenue by region, col=0, row=4, size_x=6, size_y=8
//! SELECT region, revenue FROM sales
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::state::StateKind;

/// Magic comment marker configuring the visualization of a query.
pub const VIZ_MARKER: &str = "-- viz ";

/// Magic comment marker configuring the dashboard widget of a query.
pub const WIDGET_MARKER: &str = "-- widget ";

/// Rewrites query text before it is parsed and deployed, e.g. to substitute
/// catalog or schema placeholders.
pub type QueryTransform = dyn Fn(String) -> String + Send + Sync;

/// Errors that can occur while reading the source tree.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Filesystem error while walking the tree.
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A SQL file is missing one of the required magic comments.
    MissingMagicComment {
        /// File that was parsed.
        path: PathBuf,
        /// Marker that was not found.
        marker: &'static str,
    },

    /// A magic comment pair has no `=` separator.
    MalformedPair {
        /// File that was parsed.
        path: PathBuf,
        /// Offending pair text.
        pair: String,
    },

    /// A magic comment sets the same key twice.
    DuplicateKey {
        /// File that was parsed.
        path: PathBuf,
        /// Repeated key.
        key: String,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ScanError::MissingMagicComment { path, marker } => {
                write!(
                    f,
                    "cannot find \"{marker}\" magic comment in {}",
                    path.display()
                )
            }
            ScanError::MalformedPair { path, pair } => {
                write!(f, "malformed pair \"{pair}\" in {}", path.display())
            }
            ScanError::DuplicateKey { path, key } => {
                write!(f, "duplicate key \"{key}\" in {}", path.display())
            }
        }
    }
}

/// Key/value pairs parsed from one magic comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecMap {
    pairs: BTreeMap<String, String>,
}

impl SpecMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key, returning the previous value if the key was present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.pairs.insert(key.into(), value.into())
    }

    /// Looks up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A `<step>/<dashboard>` folder of the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardFolder {
    /// First-level folder name.
    pub step: String,
    /// Second-level folder name.
    pub name: String,
    /// Stable reference used in state keys, `{step}_{name}` lowercased.
    pub dashboard_ref: String,
    /// Absolute path of the folder.
    pub path: PathBuf,
}

impl DashboardFolder {
    /// Dashboard display name, e.g. `[PROD] Sales (Main)`.
    #[must_use]
    pub fn display_name(&self, prefix: &str) -> String {
        format!(
            "{prefix} {} ({})",
            title_case(&self.step),
            title_case(&self.name)
        )
    }
}

/// One parsed SQL file of a dashboard folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFile {
    /// Reference of the dashboard the query belongs to.
    pub dashboard_ref: String,
    /// File name, extension included.
    pub name: String,
    /// Query text, after any transform has been applied.
    pub text: String,
    /// Parsed `-- viz` pairs.
    pub viz: SpecMap,
    /// Parsed `-- widget` pairs.
    pub widget: SpecMap,
}

impl QueryFile {
    /// State key of the deployed query.
    #[must_use]
    pub fn query_key(&self) -> String {
        self.key(StateKind::QueryId)
    }

    /// State key of the deployed visualization.
    #[must_use]
    pub fn viz_key(&self) -> String {
        self.key(StateKind::VizId)
    }

    /// State key of the deployed widget.
    #[must_use]
    pub fn widget_key(&self) -> String {
        self.key(StateKind::WidgetId)
    }

    fn key(&self, kind: StateKind) -> String {
        format!("{}_{}:{}", self.dashboard_ref, self.name, kind.as_str())
    }
}

/// Lists the dashboard folders of a source tree, sorted by step then name.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub async fn scan(root: &Path) -> Result<Vec<DashboardFolder>, ScanError> {
    let mut folders = Vec::new();
    for (step, step_path) in sorted_dirs(root).await? {
        for (name, path) in sorted_dirs(&step_path).await? {
            let dashboard_ref = format!("{step}_{name}").to_lowercase();
            folders.push(DashboardFolder {
                step: step.clone(),
                name,
                dashboard_ref,
                path,
            });
        }
    }
    Ok(folders)
}

/// Lists the `*.sql` files of a dashboard folder, sorted by file name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub async fn sql_files(folder: &DashboardFolder) -> Result<Vec<PathBuf>, ScanError> {
    let io_err = |source| ScanError::Io {
        path: folder.path.clone(),
        source,
    };

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(&folder.path).await.map_err(io_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        let is_file = entry.file_type().await.map_err(io_err)?.is_file();
        if is_file && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads and parses one SQL file.
///
/// The transform runs before the magic comments are parsed, so substituted
/// values are visible to the visualization as well.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a magic comment is
/// missing or malformed.
pub async fn load_query(
    folder: &DashboardFolder,
    path: &Path,
    transform: Option<&QueryTransform>,
) -> Result<QueryFile, ScanError> {
    let mut text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ScanError::Io {
            path: path.to_owned(),
            source,
        })?;
    if let Some(transform) = transform {
        text = transform(text);
    }

    let viz = parse_magic_comment(path, VIZ_MARKER, &text)?;
    let widget = parse_magic_comment(path, WIDGET_MARKER, &text)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(QueryFile {
        dashboard_ref: folder.dashboard_ref.clone(),
        name,
        text,
        viz,
        widget,
    })
}

/// Reads and parses every SQL file of a dashboard folder.
///
/// # Errors
///
/// Returns the first error encountered while loading the files.
pub async fn load_queries(
    folder: &DashboardFolder,
    transform: Option<&QueryTransform>,
) -> Result<Vec<QueryFile>, ScanError> {
    let mut queries = Vec::new();
    for path in sql_files(folder).await? {
        queries.push(load_query(folder, &path, transform).await?);
    }
    Ok(queries)
}

/// Parses the first line starting with `marker` into key/value pairs.
fn parse_magic_comment(
    path: &Path,
    marker: &'static str,
    text: &str,
) -> Result<SpecMap, ScanError> {
    let rest = text
        .lines()
        .find_map(|line| line.strip_prefix(marker))
        .ok_or_else(|| ScanError::MissingMagicComment {
            path: path.to_owned(),
            marker,
        })?;

    let mut map = SpecMap::new();
    for pair in rest.split(", ") {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(ScanError::MalformedPair {
                path: path.to_owned(),
                pair: pair.to_string(),
            });
        };
        if map.insert(key, value).is_some() {
            return Err(ScanError::DuplicateKey {
                path: path.to_owned(),
                key: key.to_string(),
            });
        }
    }
    Ok(map)
}

/// Uppercases the first letter of every word, like folder names in titles.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

/// Lists the directories of `path` as `(name, path)`, sorted by name.
async fn sorted_dirs(path: &Path) -> Result<Vec<(String, PathBuf)>, ScanError> {
    let io_err = |source| ScanError::Io {
        path: path.to_owned(),
        source,
    };

    let mut dirs = Vec::new();
    let mut entries = tokio::fs::read_dir(path).await.map_err(io_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        if entry.file_type().await.map_err(io_err)?.is_dir() {
            let name = entry.file_name().to_string_lossy().into_owned();
            dirs.push((name, entry.path()));
        }
    }
    dirs.sort();
    Ok(dirs)
}
