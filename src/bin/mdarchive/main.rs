use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use spdlog::{info, warn};

use mdarchive::asset_source::AssetSource;
use mdarchive::config::Config;
use mdarchive::logger::configure_logger;
use mdarchive::navigation::Session;
use mdarchive::server::{build_shell, server_run};
use mdarchive::view::PageStatus;

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "mdarchive.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serves the archive over HTTP (default)
    Serve,
    /// Prints the page of a route, e.g. /a/my-post
    Render {
        route: String,
    },
    /// Loads the manifest and reports problems with it
    Check,
}

async fn render(config: &Config, route: &str) -> Result<()> {
    let shell = build_shell(config)?;
    let session = Session::new(&shell);
    let Some(page) = session.navigate(route).await else {
        bail!("Navigation to {} was superseded", route);
    };

    println!("{}", page.body);
    if page.status != PageStatus::Ok {
        bail!("{} rendered as {:?}", route, page.status);
    }
    Ok(())
}

async fn check(config: &Config) -> Result<()> {
    let shell = build_shell(config)?;
    let store = shell.store();
    let manifest = store.fetch().await?;

    let mut problems: Vec<String> = manifest.validate().iter().map(|issue| issue.to_string()).collect();
    for post in manifest.posts() {
        let path = format!("{}/{}", config.paths.posts_dir.trim_end_matches('/'), post.file);
        if let Err(e) = store.source().fetch_text(&path).await {
            problems.push(format!("post {}: {}", post.link, e));
        }
    }

    println!("{} posts in {}", manifest.len(), config.paths.manifest_file);
    for problem in problems.iter() {
        println!("  {}", problem);
    }
    if !problems.is_empty() {
        bail!("{} problems found", problems.len());
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Please run mdarchive --help");
            return Err(err);
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting mdarchive =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
            info!("Listening on {}:{}", config.server.address, config.server.port);
            server_run(config).await?;
        }
        Command::Render { route } => render(&config, &route).await?,
        Command::Check => check(&config).await?,
    }

    Ok(())
}

#[ntex::main]
async fn main() -> Result<()> {
    run(Args::parse()).await
}
