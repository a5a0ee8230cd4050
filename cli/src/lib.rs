// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface for sqldeck.

mod cli;
mod cmd_deploy;
mod cmd_generate_completion;
mod cmd_link;
mod cmd_list;
mod cmd_validate;
mod config;
mod dashboard_formatter;
mod table;
mod util;

pub use crate::cli::{Cli, Commands, run};
