// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use crate::table::{PaddingDirection, Table, TableColumn, TableStyleBasic, TableStyleJson};
use crate::util::ArgOutputFormat;

/// One row of `sqldeck list` output.
#[derive(Debug, Clone)]
pub struct DashboardRow {
    /// Stable reference of the dashboard folder, e.g. `030_sales`.
    pub dashboard_ref: String,
    /// Display name the dashboard is deployed under.
    pub title: String,
    /// Number of SQL files in the folder.
    pub queries: usize,
}

#[derive(Debug)]
pub struct DashboardFormatter {
    columns: Vec<DashboardColumn>,
    format: ArgOutputFormat,
}

impl DashboardFormatter {
    pub fn new() -> Self {
        Self {
            columns: vec![
                DashboardColumn::Ref(DashboardColumnRef),
                DashboardColumn::Title(DashboardColumnTitle),
                DashboardColumn::Queries(DashboardColumnQueries),
            ],
            format: ArgOutputFormat::Table,
        }
    }

    pub fn with_output_format(mut self, format: ArgOutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format<'a>(&'a self, rows: &'a [DashboardRow]) -> Display<'a> {
        Display {
            rows,
            formatter: self,
        }
    }
}

#[derive(Debug)]
pub struct Display<'a> {
    rows: &'a [DashboardRow],
    formatter: &'a DashboardFormatter,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.formatter.format {
            ArgOutputFormat::Json => write!(
                f,
                "{}",
                Table::new(TableStyleJson::new(), &self.formatter.columns, self.rows)
            ),
            ArgOutputFormat::Table => write!(
                f,
                "{}",
                Table::new(TableStyleBasic::new(), &self.formatter.columns, self.rows)
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DashboardColumn {
    Ref(DashboardColumnRef),
    Title(DashboardColumnTitle),
    Queries(DashboardColumnQueries),
}

impl TableColumn<DashboardRow> for DashboardColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            DashboardColumn::Ref(_) => "ref",
            DashboardColumn::Title(_) => "title",
            DashboardColumn::Queries(_) => "queries",
        }
        .into()
    }

    fn format<'a>(&self, data: &'a DashboardRow) -> Cow<'a, str> {
        match self {
            DashboardColumn::Ref(a) => a.format(data),
            DashboardColumn::Title(a) => a.format(data),
            DashboardColumn::Queries(a) => a.format(data),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            DashboardColumn::Queries(_) => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardColumnRef;

impl DashboardColumnRef {
    fn format<'a>(&self, row: &'a DashboardRow) -> Cow<'a, str> {
        row.dashboard_ref.as_str().into()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardColumnTitle;

impl DashboardColumnTitle {
    fn format<'a>(&self, row: &'a DashboardRow) -> Cow<'a, str> {
        row.title.as_str().into()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardColumnQueries;

impl DashboardColumnQueries {
    fn format<'a>(&self, row: &'a DashboardRow) -> Cow<'a, str> {
        row.queries.to_string().into()
    }
}
