use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use magentashift_api::analysis::LlmSkillExtractor;
use magentashift_api::auth::AuthKeys;
use magentashift_api::config::Config;
use magentashift_api::db::{create_pool, run_migrations};
use magentashift_api::llm_client::{self, LlmClient};
use magentashift_api::routes::build_router;
use magentashift_api::seed::seed_jobs;
use magentashift_api::state::AppState;
use magentashift_api::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("magentashift_api={},tower_http={}", config.rust_log, config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MagentaShift API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL when configured, otherwise a process-local store
    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            info!("Using PostgreSQL store");
            Arc::new(PgStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    seed_jobs(
        store.as_ref(),
        Path::new(&config.jobs_seed_path),
        config.seed_jobs_reset,
    )
    .await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), &config.openai_base_url)?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("OPENAI_API_KEY not set, CV analysis requests will fail");
    }

    let state = AppState {
        store,
        extractor: Arc::new(LlmSkillExtractor(llm)),
        auth: AuthKeys::new(&config.jwt_secret, config.jwt_ttl_days, config.bcrypt_cost),
    };

    let app = build_router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
