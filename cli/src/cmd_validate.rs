// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::Colorize;
use sqldeck_core::{Config, validate};

#[derive(Debug, Clone, Copy)]
pub struct CmdValidate;

impl CmdValidate {
    pub const NAME: &str = "validate";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Check every SQL file of the source tree for malformed viz and widget comments")
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub async fn run(self, config: Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "validating source tree...");
        let issues = validate(&config).await?;
        if issues.is_empty() {
            println!("{} source tree is valid", "OK".green());
            return Ok(());
        }

        for issue in &issues {
            println!("{}", issue.to_string().red());
        }
        Err(format!("{} validation issue(s) found", issues.len()).into())
    }
}
