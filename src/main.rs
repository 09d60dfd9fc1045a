use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use creator_rank::config::AppConfig;
use creator_rank::server::{self, AppState};
use creator_rank::{format_float, format_number, RankService};

#[derive(Parser)]
#[command(name = "creator-rank", about = "Creator influence score and global rank")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Look up one handle and print its stats and rank.
    Rank(RankArgs),
    /// Write the default configuration file.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8000)]
    port: u16,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct RankArgs {
    handle: String,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(default_value = "config/creator_rank.toml")]
    path: PathBuf,
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Rank(args) => run_rank(args).await,
        Command::InitConfig(args) => run_init_config(args),
    }
}

async fn run_serve(args: ServeArgs) -> Result<(), String> {
    let (config, config_path) = AppConfig::load(args.config)?;
    if let Some(path) = config_path.as_ref().filter(|path| path.exists()) {
        tracing::info!(path = %path.display(), "loaded config");
    }
    let service = RankService::from_config(&config)?;
    server::serve(&args.host, args.port, AppState::new(Arc::new(service))).await
}

async fn run_rank(args: RankArgs) -> Result<(), String> {
    let (config, _) = AppConfig::load(args.config)?;
    let service = RankService::from_config(&config)?;
    let outcome = service
        .rank(&args.handle)
        .await
        .map_err(|err| err.to_string())?;

    println!("@{} ({} data)", outcome.handle, outcome.data_source.label());
    if let Some(source) = outcome.source.as_ref() {
        println!("Source: {}", source);
    }
    println!(
        "Followers: {} | Following: {} | Posts: {} | Est. impressions: {}",
        format_number(outcome.stats.followers),
        format_number(outcome.stats.following),
        format_number(outcome.stats.posts),
        format_number(outcome.stats.impressions)
    );
    println!("Score: {}", format_float(outcome.score, 2));
    println!(
        "Global rank: #{} of {}",
        format_number(outcome.global_rank),
        format_number(outcome.total_users)
    );

    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.path.exists() && !args.force {
        return Err(format!(
            "{} already exists (pass --force to overwrite)",
            args.path.display()
        ));
    }
    AppConfig::default().write(&args.path)?;
    println!("Wrote {}", args.path.display());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("creator_rank=info,tower_http=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
