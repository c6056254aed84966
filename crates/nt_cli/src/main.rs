use clap::{Args, Parser, Subcommand};
use nt_inference::{create_summarizer, Config};
use nt_ranking::{Enricher, RankingEngine, DEFAULT_LIMIT, DEFAULT_RADIUS_KM};
use nt_web::handlers::ArticlesResponse;
use nt_web::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

mod logging;

fn parse_limit(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(limit) => Ok(limit),
        Err(e) => Err(format!("invalid limit: {}", e)),
    }
}

fn parse_latitude(s: &str) -> Result<f64, String> {
    let lat: f64 = s.parse().map_err(|e| format!("invalid latitude: {}", e))?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude must be within [-90, 90], got {}", lat));
    }
    Ok(lat)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    let lon: f64 = s.parse().map_err(|e| format!("invalid longitude: {}", e))?;
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude must be within [-180, 180], got {}", lon));
    }
    Ok(lon)
}

fn parse_radius(s: &str) -> Result<f64, String> {
    let radius: f64 = s.parse().map_err(|e| format!("invalid radius: {}", e))?;
    if !radius.is_finite() || radius < 0.0 {
        return Err(format!("radius must be a non-negative number, got {}", radius));
    }
    Ok(radius)
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Rank, search and summarize a news article corpus", long_about = None)]
pub struct Cli {
    #[arg(long, default_value = "memory", help = "Article store. Available stores: memory (default), sqlite")]
    storage: String,
    #[arg(long, help = "Store location, e.g. the SQLite database path")]
    backend_url: Option<String>,
    #[arg(long, default_value = "openai", help = "Summarizer to use. Available summarizers: openai (default), dummy")]
    summarizer: String,
    #[arg(long, help = "Chat completions model name")]
    model: Option<String>,
    #[arg(long, help = "Chat completions endpoint URL")]
    model_url: Option<String>,
    #[arg(long, default_value_t = 1, help = "Maximum summarizer calls in flight per query")]
    enrich_concurrency: usize,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Directory of JSON article dumps
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Do not load the data directory before running
    #[arg(long)]
    skip_load: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Load JSON article dumps into the store
    Load {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Run a single query and print the results as JSON
    Query {
        #[command(flatten)]
        load: LoadArgs,
        #[command(subcommand)]
        query: QueryCommands,
    },
}

#[derive(Subcommand, Debug)]
enum QueryCommands {
    /// Articles in a category, newest first
    Category {
        category: String,
        #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = parse_limit)]
        limit: usize,
    },
    /// Articles from a source, newest first
    Source {
        source: String,
        #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = parse_limit)]
        limit: usize,
    },
    /// Articles with a relevance score of at least MIN_SCORE
    Score {
        #[arg(allow_negative_numbers = true)]
        min_score: f64,
        #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = parse_limit)]
        limit: usize,
    },
    /// Free-text search over titles and descriptions
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = parse_limit)]
        limit: usize,
    },
    /// Geo-tagged articles around a point, closest first
    Nearby {
        #[arg(allow_negative_numbers = true, value_parser = parse_latitude)]
        lat: f64,
        #[arg(allow_negative_numbers = true, value_parser = parse_longitude)]
        lon: f64,
        #[arg(long, default_value_t = DEFAULT_RADIUS_KM, value_parser = parse_radius)]
        radius_km: f64,
        #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = parse_limit)]
        limit: usize,
    },
}

async fn load_corpus(store: &dyn nt_core::ArticleStore, args: &LoadArgs) -> nt_core::Result<()> {
    if args.skip_load {
        info!("Skipping data loader");
        return Ok(());
    }
    nt_storage::load_directory(store, &args.data_dir).await?;
    Ok(())
}

async fn run_query(engine: &RankingEngine, query: QueryCommands) -> nt_core::Result<ArticlesResponse> {
    let articles = match query {
        QueryCommands::Category { category, limit } => engine.by_category(&category, limit).await?,
        QueryCommands::Source { source, limit } => engine.by_source(&source, limit).await?,
        QueryCommands::Score { min_score, limit } => engine.by_score(min_score, limit).await?,
        QueryCommands::Search { query, limit } => engine.search(&query, limit).await?,
        QueryCommands::Nearby { lat, lon, radius_km, limit } => {
            engine.nearby(lat, lon, radius_km, limit).await?
        }
    };
    Ok(articles.into())
}

fn summarizer_config(cli: &Cli) -> Config {
    let mut config = Config::from_env();
    if let Some(url) = &cli.model_url {
        config = config.with_api_url(url.clone());
    }
    if let Some(model) = &cli.model {
        config = config.with_model(model.clone());
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let storage = nt_storage::create_storage(cli.storage.as_str(), cli.backend_url.as_deref()).await?;
    info!("💾 Storage initialized successfully (using {})", cli.storage);

    let config = summarizer_config(&cli);
    if cli.summarizer == "openai" && config.api_key.is_none() {
        warn!("⚠️ {} is not set, summaries will be empty", nt_inference::API_KEY_ENV);
    }
    let summarizer = create_summarizer(&cli.summarizer, config)?;
    info!("🧠 Summarizer initialized successfully (using {})", summarizer.name());

    let enricher = Enricher::new(storage.clone(), summarizer).with_concurrency(cli.enrich_concurrency);
    let engine = RankingEngine::new(storage.clone(), enricher);

    match cli.command {
        Commands::Serve { addr, load } => {
            load_corpus(storage.as_ref(), &load).await?;
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            nt_web::serve(listener, AppState::new(Arc::new(engine))).await?;
        }
        Commands::Load { data_dir } => {
            let loaded = nt_storage::load_directory(storage.as_ref(), &data_dir).await?;
            println!("Loaded {} articles", loaded);
        }
        Commands::Query { load, query } => {
            load_corpus(storage.as_ref(), &load).await?;
            let response = run_query(&engine, query).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
