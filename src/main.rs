use clap::Parser;
use prodrec_api::{AppState, RestApi};
use prodrec_core::SimilarityMetric;
use prodrec_engine::{EngineConfig, Engines, HybridConfig, HybridWeights, ItemCfConfig, UserCfConfig};
use prodrec_storage::Dataset;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// An in-memory product recommendation engine
#[derive(Parser, Debug)]
#[command(name = "prodrec")]
#[command(about = "Product recommendations from user ratings", long_about = None)]
struct Args {
    /// Ratings CSV (user_id,product_id,rating)
    #[arg(long, default_value = "data/ratings.csv")]
    ratings: PathBuf,

    /// Products CSV (product_id,name,category,price)
    #[arg(long, default_value = "data/products.csv")]
    products: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Neighbors consulted by user-based CF
    #[arg(long, default_value_t = prodrec_engine::DEFAULT_NEIGHBOR_POOL)]
    neighbors: usize,

    /// Similar items consulted per rated item by item-based CF (default: all)
    #[arg(long)]
    item_neighbors: Option<usize>,

    /// Similarity metric for item-based CF
    #[arg(long, default_value = "cosine")]
    item_metric: SimilarityMetric,

    /// Hybrid weights as user_cf,item_cf,popularity
    #[arg(long, default_value = "0.50,0.35,0.15")]
    weights: HybridWeights,

    /// Candidates requested from each engine per hybrid result
    #[arg(long, default_value_t = prodrec_engine::DEFAULT_POOL_FACTOR)]
    pool_factor: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting prodrec v{}", env!("CARGO_PKG_VERSION"));
    info!("Ratings: {:?}", args.ratings);
    info!("Products: {:?}", args.products);
    info!("HTTP API port: {}", args.http_port);

    let dataset = Dataset::load(&args.ratings, &args.products)?;
    for (source, report) in [
        ("ratings", dataset.ratings_report),
        ("products", dataset.products_report),
    ] {
        if report.skipped > 0 {
            warn!("{}: {} rows skipped, {} loaded", source, report.skipped, report.loaded);
        }
    }

    let config = EngineConfig {
        user_cf: UserCfConfig {
            neighbor_pool: args.neighbors,
        },
        item_cf: ItemCfConfig {
            neighbor_pool: args.item_neighbors,
            metric: args.item_metric,
        },
        hybrid: HybridConfig {
            weights: args.weights,
            pool_factor: args.pool_factor,
        },
    };
    let engines = Engines::build(dataset.index, dataset.catalog, config)?;
    let state = Arc::new(AppState::new(engines));
    info!(
        "Dataset: {} users, {} products, {} ratings (sparsity {:.3})",
        state.stats.users, state.stats.products, state.stats.ratings, state.stats.sparsity
    );

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("prodrec started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
