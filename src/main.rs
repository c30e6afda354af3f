mod cli;

use anyhow::{Context, Result};
use bw_core::config::Config;
use bw_server::context::AppContext;
use bw_server::Listen;
use clap::Parser;
use cli::Cli;

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(cli.config.as_deref());
    if cli.skip_demo {
        config.demo.enabled = false;
    }
    for warning in config.validate() {
        tracing::warn!("{warning}");
    }

    tracing::info!("Opening database at {}", config.server.db_path.display());
    let demo_enabled = config.demo.enabled;
    let server = config.server.clone();
    let ctx = AppContext::build(config).context("startup failed")?;

    if demo_enabled {
        bookwiki::demo::run(&ctx.db).context("startup demo failed")?;
    }

    let listen = if cli.addr {
        Listen::Ephemeral
    } else {
        Listen::Configured
    };
    let listener = bw_server::bind(&server, listen).await?;
    bw_server::serve(ctx, listener).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "bookwiki=trace,bw_server=trace,bw_db=debug,bw_core=debug,tower_http=debug".to_string()
        } else {
            "bookwiki=info,bw_server=debug,bw_db=info,bw_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt().with_env_filter(&env_filter).init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli))
}
