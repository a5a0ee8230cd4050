// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgAction, ArgMatches, Command, arg};
use colored::Colorize;
use sqldeck_core::{Config, Deployer, QueryTransform};
use sqldeck_dbsql::DbsqlClient;

#[derive(Debug, Clone, Default)]
pub struct CmdDeploy {
    /// `$NAME` substitutions applied to every query before upload
    pub vars: Vec<(String, String)>,
}

impl CmdDeploy {
    pub const NAME: &str = "deploy";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Deploy the source tree as queries, visualizations and dashboards")
            .arg(
                arg!(--var <PAIR> "Substitute $NAME in every query, as NAME=VALUE")
                    .required(false)
                    .action(ArgAction::Append),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let mut vars = Vec::new();
        if let Some(pairs) = matches.get_many::<String>("var") {
            for pair in pairs {
                match pair.split_once('=') {
                    Some((name, value)) if !name.is_empty() => {
                        vars.push((name.to_string(), value.to_string()));
                    }
                    _ => return Err(format!("invalid --var {pair:?}, expected NAME=VALUE").into()),
                }
            }
        }
        Ok(Self { vars })
    }

    pub async fn run(self, config: Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "deploying dashboards...");
        let client = DbsqlClient::new(config.workspace.clone())?;
        let mut deployer = Deployer::new(client, config);
        if !self.vars.is_empty() {
            deployer = deployer.with_transform(transform(self.vars));
        }

        let report = deployer.deploy().await?;
        for dashboard_ref in report.dashboards.keys() {
            match deployer.dashboard_url(dashboard_ref) {
                Some(url) => println!("{}  {url}", dashboard_ref.bold()),
                None => println!("{}", dashboard_ref.bold()),
            }
        }
        Ok(())
    }
}

/// Build the `$NAME` substitution transform.
fn transform(mut vars: Vec<(String, String)>) -> Box<QueryTransform> {
    // Longest name first, so $data is never applied inside $data_source
    vars.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    Box::new(move |sql| {
        let mut text = sql;
        for (name, value) in &vars {
            text = text.replace(&format!("${name}"), value);
        }
        text
    })
}
