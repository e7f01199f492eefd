use config::{Environment, File};
use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{Layer, layer::SubscriberExt};

use crate::{
    db::{bill::BillStore, memory::InMemBillStore},
    web::session::{MemorySessionStore, SESSION_PURGE_PERIOD, spawn_session_purge},
};

mod db;
mod web;

/// Where bills are read from and written to
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    Postgres,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    pub address: std::net::SocketAddr,
    pub domain: String,
    pub cookie_secure: bool,
    pub log_level: String,
    pub store: StoreKind,
    pub seed_fixtures: bool,
    pub fetch_timeout_ms: u64,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_host: String,
}

impl Config {
    pub fn db_connection_string(&self) -> String {
        let db_name = if self.db_name.is_empty() {
            "".to_string()
        } else {
            format!("/{}", self.db_name)
        };
        format!(
            "postgres://{}:{}@{}?host={}",
            self.db_user, self.db_password, db_name, self.db_host
        )
    }

    /// How long a page waits for the bill store before rendering the loading state
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(File::with_name(&format!(
                "{}/config/config.toml",
                env!("CARGO_MANIFEST_DIR")
            )))
            .add_source(Environment::with_prefix("BILLED").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Clone)]
pub struct Ctx {
    pub bill_store: Arc<dyn BillStore>,
    pub config: Config,
    pub session_store: MemorySessionStore,
}

impl Ctx {
    pub async fn new(cfg: &Config) -> Result<Self, anyhow::Error> {
        let bill_store: Arc<dyn BillStore> = match cfg.store {
            StoreKind::Postgres => {
                let db = db::PostgresStore::new(&cfg.db_connection_string()).await?;
                db.init().await?;
                Arc::new(db)
            }
            StoreKind::Memory => {
                let seed = if cfg.seed_fixtures {
                    db::fixtures::bills()
                } else {
                    vec![]
                };
                Arc::new(InMemBillStore::with_bills(seed))
            }
        };

        let session_store = MemorySessionStore::default();

        // Delete expired sessions regularly
        spawn_session_purge(session_store.clone(), SESSION_PURGE_PERIOD);

        Ok(Self {
            bill_store,
            config: cfg.to_owned(),
            session_store,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cfg = Config::new()?;

    tracing_log::LogTracer::init().expect("LogTracer init");
    let level_filter = LevelFilter::from_str(&cfg.log_level).expect("log level");
    let stdout_log = tracing_subscriber::fmt::layer().with_filter(level_filter);
    let subscriber = tracing_subscriber::registry().with(stdout_log);
    tracing::subscriber::set_global_default(subscriber)
        .expect("tracing::subscriber::set_global_default");

    if let Ok(listener) = tokio::net::TcpListener::bind(&cfg.address).await {
        info!(
            "Server running at http://{} with store={:?} log-level={}",
            cfg.address, cfg.store, cfg.log_level
        );
        let ctx = Ctx::new(&cfg).await?;
        let router = web::router(ctx, &cfg);
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_handler())
        .await?;
    } else {
        error!("Failed to bind to listen address {}", &cfg.address);
    }

    Ok(())
}

async fn shutdown_handler() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("to install ctrl_c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
