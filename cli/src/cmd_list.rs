// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::Colorize;
use sqldeck_core::{Config, scan, sql_files};

use crate::dashboard_formatter::{DashboardFormatter, DashboardRow};
use crate::util::ArgOutputFormat;

#[derive(Debug, Clone, Copy, Default)]
pub struct CmdList {
    pub output_format: ArgOutputFormat,
}

impl CmdList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List the dashboards of the source tree")
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub async fn run(self, config: Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing dashboards...");
        let folders = scan(&config.source_path).await?;
        if folders.is_empty() && self.output_format == ArgOutputFormat::Table {
            println!("{}", "No dashboards found".italic());
            return Ok(());
        }

        let mut rows = Vec::with_capacity(folders.len());
        for folder in &folders {
            let queries = sql_files(folder).await?;
            rows.push(DashboardRow {
                dashboard_ref: folder.dashboard_ref.clone(),
                title: folder.display_name(&config.name_prefix),
                queries: queries.len(),
            });
        }

        let formatter = DashboardFormatter::new().with_output_format(self.output_format);
        println!("{}", formatter.format(&rows));
        Ok(())
    }
}
