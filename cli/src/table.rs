// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use unicode_width::UnicodeWidthStr;

/// A column of a [`Table`].
pub trait TableColumn<T> {
    /// Column name, used as the object key in JSON output.
    fn name(&self) -> Cow<'_, str>;

    /// Format the cell of the given row.
    fn format<'a>(&self, data: &'a T) -> Cow<'a, str>;

    /// Which side the cell is padded on.
    fn padding_direction(&self) -> PaddingDirection;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

/// Rows of data rendered through a style, via [`fmt::Display`].
#[derive(Debug)]
pub struct Table<'a, S, T, C: TableColumn<T>> {
    style: S,
    columns: &'a [C],
    data: &'a [T],
}

impl<'a, S, T, C: TableColumn<T>> Table<'a, S, T, C> {
    pub fn new(style: S, columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            style,
            columns,
            data,
        }
    }
}

/// Plain aligned columns, two spaces apart.
#[derive(Debug, Clone, Copy)]
pub struct TableStyleBasic {
    separator: &'static str,
}

impl TableStyleBasic {
    pub fn new() -> Self {
        Self { separator: "  " }
    }
}

impl<T, C: TableColumn<T>> fmt::Display for Table<'_, TableStyleBasic, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<Cow<'_, str>>> = self
            .data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect();

        let widths = column_widths(&cells);

        for (i, row) in cells.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(self.style.separator)?;
                }
                let pad = widths[j].saturating_sub(cell.width());
                match self.columns[j].padding_direction() {
                    // The last column does not need padding when left-aligned
                    PaddingDirection::Left if j == row.len() - 1 => f.write_str(cell)?,
                    PaddingDirection::Left => {
                        f.write_str(cell)?;
                        write!(f, "{:pad$}", "")?;
                    }
                    PaddingDirection::Right => {
                        write!(f, "{:pad$}", "")?;
                        f.write_str(cell)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// An array of one JSON object per row, keyed by column name.
#[derive(Debug, Clone, Copy)]
pub struct TableStyleJson;

impl TableStyleJson {
    pub fn new() -> Self {
        Self
    }
}

impl<T, C: TableColumn<T>> fmt::Display for Table<'_, TableStyleJson, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = self
            .data
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| {
                        let value = serde_json::Value::from(col.format(row).into_owned());
                        (col.name().into_owned(), value)
                    })
                    .collect()
            })
            .collect();

        let text = serde_json::to_string_pretty(&rows).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

fn column_widths(cells: &[Vec<Cow<'_, str>>]) -> Vec<usize> {
    let Some(first) = cells.first() else {
        return Vec::new();
    };
    let mut widths = vec![0; first.len()];
    for row in cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }
    widths
}
