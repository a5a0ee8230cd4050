// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use sqldeck_core::{Config, Deployer};
use sqldeck_dbsql::DbsqlClient;

#[derive(Debug, Clone)]
pub struct CmdLink {
    pub dashboard_ref: String,
}

impl CmdLink {
    pub const NAME: &str = "link";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print the URL of a deployed dashboard")
            .arg(arg!(dashboard_ref: <DASHBOARD> "Dashboard reference, e.g. \"030_sales\""))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        match matches.get_one::<String>("dashboard_ref") {
            Some(dashboard_ref) => Self {
                dashboard_ref: dashboard_ref.clone(),
            },
            _ => unreachable!(),
        }
    }

    pub async fn run(self, config: Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "resolving dashboard link...");
        let client = DbsqlClient::new(config.workspace.clone())?;
        let mut deployer = Deployer::new(client, config);
        deployer.fetch_state().await?;
        match deployer.dashboard_url(&self.dashboard_ref) {
            Some(url) => {
                println!("{url}");
                Ok(())
            }
            None => Err(format!("no deployed dashboard for {:?}", self.dashboard_ref).into()),
        }
    }
}
