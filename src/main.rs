mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use gv_core::config::Config;

fn start_server(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    // CLI flags win over the config file.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting gradeview {}", env!("CARGO_PKG_VERSION"));

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(gv_server::start(config))?;
    Ok(())
}

fn migrate(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let db_path = &config.server.db_path;

    let pool = gv_db::pool::init_pool(db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    let conn = gv_db::pool::get_conn(&pool)?;
    let version = gv_db::migrations::current_version(&conn)?;

    println!("Database {} is at schema version {version}", db_path.display());
    Ok(())
}

fn validate_config(config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            println!("No config file given; checking defaults");
            Config::default()
        }
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Configuration is valid");
    } else {
        println!("Configuration has {} warning(s):", warnings.len());
        for w in &warnings {
            println!("  - {w}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise use defaults based on the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "gradeview=debug,gv_server=debug,gv_db=debug,gv_core=debug,tower_http=debug".to_string()
        } else {
            "gradeview=info,gv_server=info,gv_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt().with_env_filter(&env_filter).init();

    match cli.command {
        Commands::Start { host, port } => start_server(host, port, cli.config.as_deref()),
        Commands::Migrate => migrate(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("gradeview {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
