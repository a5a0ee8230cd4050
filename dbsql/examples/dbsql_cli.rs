// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Databricks client validation tool.
//!
//! This is a standalone CLI example for testing the client implementation
//! against a real Databricks workspace. It serves as both a validation tool
//! and example code for using the DbsqlClient API.

use std::error::Error;
use std::io::Write as _;

use clap::{Parser, Subcommand};
use colored::Colorize as _;
use sqldeck_dbsql::{AuthMethod, DbsqlClient, WorkspaceConfig};

/// Databricks client validation tool.
#[derive(Parser)]
#[command(name = "dbsql_cli")]
#[command(about = "Databricks SQL client validation tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Workspace URL
    #[arg(long)]
    host: Option<String>,
    /// Personal access token
    #[arg(long)]
    token: Option<String>,
    /// Username for basic auth
    #[arg(long)]
    username: Option<String>,
    /// Password for basic auth
    #[arg(long)]
    password: Option<String>,
    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List SQL warehouses
    Warehouses,
    /// List data sources
    DataSources,
    /// Get a SQL query by id
    GetQuery {
        /// Query id
        id: String,
    },
    /// Get a dashboard and its widgets by id
    GetDashboard {
        /// Dashboard id
        id: String,
    },
    /// Get workspace object metadata
    Status {
        /// Workspace path
        path: String,
    },
    /// Create a workspace directory
    Mkdirs {
        /// Workspace path
        path: String,
    },
    /// Download a workspace file and print it
    Export {
        /// Workspace path
        path: String,
    },
}

impl Cli {
    fn build_config(&self) -> Result<WorkspaceConfig, Box<dyn Error>> {
        // Read from environment variables first
        let host = self
            .host
            .clone()
            .or_else(|| std::env::var("DATABRICKS_HOST").ok())
            .ok_or_else(|| {
                "DATABRICKS_HOST must be provided via --host or DATABRICKS_HOST env var".to_string()
            })?;

        let token = self
            .token
            .clone()
            .or_else(|| std::env::var("DATABRICKS_TOKEN").ok());

        let username = self
            .username
            .clone()
            .or_else(|| std::env::var("DATABRICKS_USERNAME").ok());

        let password = self
            .password
            .clone()
            .or_else(|| std::env::var("DATABRICKS_PASSWORD").ok());

        let auth = if let Some(token) = token {
            AuthMethod::Bearer { token }
        } else if let (Some(username), Some(password)) = (username, password) {
            AuthMethod::Basic { username, password }
        } else {
            AuthMethod::None
        };

        Ok(WorkspaceConfig {
            host,
            auth,
            timeout_secs: self.timeout,
            user_agent: "sqldeck-dbsql-cli/0.1.0".to_string(),
        })
    }
}

async fn cmd_warehouses(client: &DbsqlClient) -> Result<(), Box<dyn Error>> {
    let warehouses = client.list_warehouses().await?;

    if warehouses.is_empty() {
        println!("No SQL warehouses found");
        return Ok(());
    }

    println!("{:-<70}", "");
    println!("{:<20} {:<35} {:<12}", "Id", "Name", "State");
    println!("{:-<70}", "");

    for wh in &warehouses {
        let name = wh.name.as_deref().unwrap_or("Unnamed");
        let state = wh.state.as_deref().unwrap_or("-");
        println!("{:<20} {:<35} {:<12}", wh.id, name, state);
    }

    Ok(())
}

async fn cmd_data_sources(client: &DbsqlClient) -> Result<(), Box<dyn Error>> {
    let data_sources = client.list_data_sources().await?;

    if data_sources.is_empty() {
        println!("No data sources found");
        return Ok(());
    }

    println!("{:-<70}", "");
    println!("{:<40} {:<25}", "Id", "Warehouse");
    println!("{:-<70}", "");

    for ds in &data_sources {
        let warehouse = ds.warehouse_id.as_deref().unwrap_or("-");
        println!("{:<40} {:<25}", ds.id, warehouse);
    }

    Ok(())
}

async fn cmd_get_query(client: &DbsqlClient, id: &str) -> Result<(), Box<dyn Error>> {
    let query = client.get_query(id).await?;

    println!("Id:          {}", query.id);
    println!("Name:        {}", query.name.as_deref().unwrap_or("-"));
    println!("Data source: {}", query.data_source_id.as_deref().unwrap_or("-"));
    if let Some(text) = &query.query {
        println!("\n{text}");
    }

    Ok(())
}

async fn cmd_get_dashboard(client: &DbsqlClient, id: &str) -> Result<(), Box<dyn Error>> {
    let dashboard = client.get_dashboard(id).await?;

    println!("Id:   {}", dashboard.id);
    println!("Name: {}", dashboard.name.as_deref().unwrap_or("-"));
    println!("Widgets:");

    for widget in &dashboard.widgets {
        let viz = widget
            .visualization
            .as_ref()
            .and_then(|v| v.name.as_deref())
            .unwrap_or("text");
        println!("  {} ({viz})", widget.id);
    }

    Ok(())
}

async fn cmd_status(client: &DbsqlClient, path: &str) -> Result<(), Box<dyn Error>> {
    let info = client.get_status(path).await?;

    println!("Object id: {}", info.object_id);
    println!("Type:      {}", info.object_type.as_deref().unwrap_or("-"));
    println!("Path:      {}", info.path.as_deref().unwrap_or(path));

    Ok(())
}

async fn cmd_mkdirs(client: &DbsqlClient, path: &str) -> Result<(), Box<dyn Error>> {
    client.mkdirs(path).await?;
    println!("{} {path}", "✓ created".green());
    Ok(())
}

async fn cmd_export(client: &DbsqlClient, path: &str) -> Result<(), Box<dyn Error>> {
    let content = client.export(path).await?;
    std::io::stdout().write_all(&content)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok(); // Load .env
    dotenvy::from_filename(".env.local").ok(); // Load .env.local (overrides .env)

    let cli = Cli::parse();
    let config = cli.build_config()?;
    let client = DbsqlClient::new(config)?;

    // Create a new runtime for the async operations
    let runtime = tokio::runtime::Runtime::new()?;

    let result = runtime.block_on(async {
        match cli.command {
            Commands::Warehouses => cmd_warehouses(&client).await,
            Commands::DataSources => cmd_data_sources(&client).await,
            Commands::GetQuery { id } => cmd_get_query(&client, &id).await,
            Commands::GetDashboard { id } => cmd_get_dashboard(&client, &id).await,
            Commands::Status { path } => cmd_status(&client, &path).await,
            Commands::Mkdirs { path } => cmd_mkdirs(&client, &path).await,
            Commands::Export { path } => cmd_export(&client, &path).await,
        }
    });

    if let Err(e) = result {
        // Flush stdout before printing error
        std::io::stdout().flush().ok();
        eprintln!("{} {e}", "Error:".red());
        std::process::exit(1);
    }

    Ok(())
}
