// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Interpretation of magic comment pairs into visualization and widget
//! settings, including the option payloads the REST API expects.

use std::fmt;

use serde_json::json;
use sqldeck_dbsql::{WidgetOptions, WidgetPosition};

use crate::queries::SpecMap;

/// Errors that can occur while interpreting magic comment pairs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SpecError {
    /// A required key is not set.
    MissingKey {
        /// Key that is required.
        key: &'static str,
    },

    /// A key is not recognized for this visualization type.
    UnknownKey {
        /// Offending key.
        key: String,
    },

    /// The `type` key names an unsupported visualization.
    UnknownType {
        /// Offending type value.
        viz_type: String,
    },

    /// A value cannot be parsed for its key.
    InvalidValue {
        /// Key the value was set for.
        key: String,
        /// Offending value.
        value: String,
    },
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::MissingKey { key } => write!(f, "missing required key \"{key}\""),
            SpecError::UnknownKey { key } => write!(f, "unknown key \"{key}\""),
            SpecError::UnknownType { viz_type } => write!(f, "unknown viz type: {viz_type}"),
            SpecError::InvalidValue { key, value } => {
                write!(f, "invalid value \"{value}\" for key \"{key}\"")
            }
        }
    }
}

/// A table visualization rendering query rows as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableViz {
    /// Visualization name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Columns to show, in order.
    pub columns: Vec<String>,
    /// Page size.
    pub items_per_page: u32,
    /// Condensed row spacing.
    pub condensed: bool,
    /// Prepend a row number column.
    pub with_row_number: bool,
}

impl TableViz {
    /// Builds a table visualization from `-- viz` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing, an unknown key is set,
    /// or a value cannot be parsed.
    pub fn from_map(map: &SpecMap) -> Result<Self, SpecError> {
        let mut viz = Self {
            name: required(map, "name")?.to_string(),
            description: None,
            // Column names are split verbatim, spaces included
            columns: required(map, "columns")?.split(',').map(str::to_string).collect(),
            items_per_page: 25,
            condensed: true,
            with_row_number: false,
        };

        for (key, value) in map.iter() {
            match key {
                "type" | "name" | "columns" => {}
                "description" => viz.description = Some(value.to_string()),
                "items_per_page" => viz.items_per_page = parse_u32(key, value)?,
                "condensed" => viz.condensed = parse_bool(key, value)?,
                "with_row_number" => viz.with_row_number = parse_bool(key, value)?,
                _ => return Err(SpecError::UnknownKey { key: key.to_string() }),
            }
        }

        Ok(viz)
    }

    /// Option payload for the REST API.
    #[must_use]
    pub fn options(&self) -> serde_json::Value {
        let columns: Vec<_> = self.columns.iter().map(|name| column_options(name)).collect();
        json!({
            "itemsPerPage": self.items_per_page,
            "condensed": self.condensed,
            "withRowNumber": self.with_row_number,
            "version": 2,
            "columns": columns,
        })
    }
}

/// A counter visualization showing one value of the result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterViz {
    /// Visualization name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Label shown under the number.
    pub label: Option<String>,
    /// Column holding the value.
    pub value_column: String,
    /// Row holding the value, one-based.
    pub value_row_number: u32,
    /// Row holding the comparison target, one-based.
    pub target_row_number: u32,
    /// Decimal places shown.
    pub string_decimal: u32,
    /// Decimal separator.
    pub string_decimal_char: String,
    /// Thousands separator.
    pub string_thousand_separator: String,
    /// Number format of the hover tooltip.
    pub tooltip_format: String,
    /// Count result rows instead of reading a value.
    pub count_row: bool,
}

impl CounterViz {
    /// Builds a counter visualization from `-- viz` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing, an unknown key is set,
    /// or a value cannot be parsed.
    pub fn from_map(map: &SpecMap) -> Result<Self, SpecError> {
        let mut viz = Self {
            name: required(map, "name")?.to_string(),
            description: None,
            label: None,
            value_column: required(map, "value_column")?.to_string(),
            value_row_number: 1,
            target_row_number: 1,
            string_decimal: 0,
            string_decimal_char: ".".to_string(),
            string_thousand_separator: ",".to_string(),
            tooltip_format: "0,0.000".to_string(),
            count_row: false,
        };

        for (key, value) in map.iter() {
            match key {
                "type" | "name" | "value_column" => {}
                "description" => viz.description = Some(value.to_string()),
                "counter_label" => viz.label = Some(value.to_string()),
                "value_row_number" => viz.value_row_number = parse_u32(key, value)?,
                "target_row_number" => viz.target_row_number = parse_u32(key, value)?,
                "string_decimal" => viz.string_decimal = parse_u32(key, value)?,
                "string_decimal_char" => viz.string_decimal_char = value.to_string(),
                "string_thousand_separator" => {
                    viz.string_thousand_separator = value.to_string();
                }
                "tooltip_format" => viz.tooltip_format = value.to_string(),
                "count_row" => viz.count_row = parse_bool(key, value)?,
                _ => return Err(SpecError::UnknownKey { key: key.to_string() }),
            }
        }

        Ok(viz)
    }

    /// Option payload for the REST API.
    #[must_use]
    pub fn options(&self) -> serde_json::Value {
        json!({
            "counterLabel": self.label,
            "counterColName": self.value_column,
            "rowNumber": self.value_row_number,
            "targetRowNumber": self.target_row_number,
            "stringDecimal": self.string_decimal,
            "stringDecChar": self.string_decimal_char,
            "stringThouSep": self.string_thousand_separator,
            "tooltipFormat": self.tooltip_format,
            "countRow": self.count_row,
        })
    }
}

/// Parsed `-- viz` settings of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VizSpec {
    /// A table visualization.
    Table(TableViz),
    /// A counter visualization.
    Counter(CounterViz),
}

impl VizSpec {
    /// Builds a visualization from `-- viz` pairs, dispatching on `type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is missing or unknown, or if the
    /// type-specific keys do not parse.
    pub fn from_map(map: &SpecMap) -> Result<Self, SpecError> {
        match required(map, "type")? {
            "table" => Ok(Self::Table(TableViz::from_map(map)?)),
            "counter" => Ok(Self::Counter(CounterViz::from_map(map)?)),
            other => Err(SpecError::UnknownType {
                viz_type: other.to_string(),
            }),
        }
    }

    /// Type string the REST API expects.
    #[must_use]
    pub fn viz_type(&self) -> &'static str {
        match self {
            Self::Table(_) => "TABLE",
            Self::Counter(_) => "COUNTER",
        }
    }

    /// Visualization name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Table(t) => &t.name,
            Self::Counter(c) => &c.name,
        }
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Table(t) => t.description.as_deref(),
            Self::Counter(c) => c.description.as_deref(),
        }
    }

    /// Option payload for the REST API.
    #[must_use]
    pub fn options(&self) -> serde_json::Value {
        match self {
            Self::Table(t) => t.options(),
            Self::Counter(c) => c.options(),
        }
    }
}

/// Parsed `-- widget` settings of one query.
///
/// Unknown widget keys are ignored rather than rejected, so widget comments
/// can carry annotations for other tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSpec {
    /// Widget title, empty by default.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Grid column.
    pub col: u32,
    /// Grid row, auto-assigned when unset.
    pub row: Option<u32>,
    /// Width in grid cells.
    pub size_x: u32,
    /// Height in grid cells.
    pub size_y: u32,
}

impl Default for WidgetSpec {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            col: 0,
            row: None,
            size_x: 3,
            size_y: 3,
        }
    }
}

impl WidgetSpec {
    /// Builds widget settings from `-- widget` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric value cannot be parsed.
    pub fn from_map(map: &SpecMap) -> Result<Self, SpecError> {
        let mut spec = Self::default();
        for (key, value) in map.iter() {
            match key {
                "title" => spec.title = value.to_string(),
                "description" => spec.description = Some(value.to_string()),
                "col" => spec.col = parse_u32(key, value)?,
                "row" => spec.row = Some(parse_u32(key, value)?),
                "size_x" => spec.size_x = parse_u32(key, value)?,
                "size_y" => spec.size_y = parse_u32(key, value)?,
                _ => {}
            }
        }
        Ok(spec)
    }

    /// Widget options for the REST API.
    ///
    /// `next_row` advances for every widget, explicit row or not, so widgets
    /// without a row land in file order.
    pub fn options(&self, next_row: &mut u32) -> WidgetOptions {
        *next_row += 1;
        WidgetOptions {
            title: Some(self.title.clone()),
            description: self.description.clone(),
            position: Some(WidgetPosition {
                col: self.col,
                row: self.row.unwrap_or(*next_row),
                size_x: self.size_x,
                size_y: self.size_y,
                auto_height: None,
            }),
        }
    }
}

/// Per-column display options of a table visualization.
///
/// The UI persists every column setting, so creating a column with only a
/// name renders differently from one created interactively. These defaults
/// match what the editor writes for a plain string column.
fn column_options(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "title": name,
        "type": "string",
        "displayAs": "string",
        "visible": true,
        "order": 100_000,
        "allowSearch": false,
        "alignContent": "left",
        "allowHTML": false,
        "highlightLinks": false,
        "imageUrlTemplate": "{{ @ }}",
        "imageTitleTemplate": "{{ @ }}",
        "imageWidth": "",
        "imageHeight": "",
        "linkUrlTemplate": "{{ @ }}",
        "linkTextTemplate": "{{ @ }}",
        "linkTitleTemplate": "{{ @ }}",
        "linkOpenInNewTab": true,
    })
}

fn required<'a>(map: &'a SpecMap, key: &'static str) -> Result<&'a str, SpecError> {
    map.get(key).ok_or(SpecError::MissingKey { key })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, SpecError> {
    value.parse().map_err(|_| SpecError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SpecError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SpecError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
