//! `serendigo` HTTP server binary.

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use serendigo_rs::config::{LayeredConfigOptions, SerendigoConfig};
use serendigo_rs::core::ServiceContext;
use std::path::PathBuf;

/// Command-line options for the server.
#[derive(Debug, Parser)]
#[command(name = "serendigo", version, about = "Detour suggestions and narrated guides")]
struct Cli {
    /// Extra serendigo.json5 files applied after the default layers (repeatable)
    #[arg(long = "config", value_name = "PATH")]
    configs: Vec<PathBuf>,
    /// Listen address, overriding config and SERENDIGO_BIND
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

fn load_config(cli: &Cli) -> anyhow::Result<SerendigoConfig> {
    let cwd = std::env::current_dir().context("cwd")?;
    info!("loading layered config from cwd: {}", cwd.display());
    let options = cli
        .configs
        .iter()
        .fold(LayeredConfigOptions::new(&cwd), |options, path| {
            options.with_runtime_path(path)
        });
    let layered = SerendigoConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());

    let mut config = layered.config;
    config.apply_env();
    if let Some(bind) = cli.bind.as_ref() {
        config.server.bind = bind.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    serendigo_rs::init_logging();

    let cli = Cli::parse();
    info!(
        "starting serendigo (runtime_configs={}, bind_override={})",
        cli.configs.len(),
        cli.bind.is_some()
    );
    let config = load_config(&cli)?;
    let context = ServiceContext::from_config(&config).context("failed to build services")?;
    serendigo_rs::server::serve(context, &config.server)
        .await
        .context("server failed")?;
    Ok(())
}
