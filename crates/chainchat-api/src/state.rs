//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the REST API
//! handlers. Services are generic over repository/remote traits, but AppState
//! pins them to the concrete infra implementations. The database pool is the
//! only shared mutable resource: created once here, cloned into every
//! repository -- no hidden global connection cache.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use chainchat_core::exchange::ExchangeService;
use chainchat_core::lifecycle::LifecycleService;
use chainchat_core::session::SessionService;
use chainchat_infra::config::{load_global_config, resolve_data_dir};
use chainchat_infra::remote::NebulaClient;
use chainchat_infra::sqlite::conversation::SqliteConversationRepository;
use chainchat_infra::sqlite::message::SqliteMessageRepository;
use chainchat_infra::sqlite::pool::DatabasePool;
use chainchat_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteSessionService = SessionService<SqliteConversationRepository, NebulaClient>;

pub type ConcreteExchangeService =
    ExchangeService<SqliteConversationRepository, SqliteMessageRepository, NebulaClient>;

pub type ConcreteLifecycleService =
    LifecycleService<SqliteConversationRepository, SqliteMessageRepository, NebulaClient>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<ConcreteSessionService>,
    pub exchange_service: Arc<ConcreteExchangeService>,
    pub lifecycle_service: Arc<ConcreteLifecycleService>,
    /// Direct remote handle for the stateless message endpoint.
    pub remote: Arc<NebulaClient>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to the DB,
    /// wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        let secret_key = std::env::var("NEBULA_SECRET_KEY")
            .context("NEBULA_SECRET_KEY is not set")?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("chainchat.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Each service gets its own repository and client instances; the
        // pool clones share connections, the clients share nothing but config.
        let make_remote = || NebulaClient::new(SecretString::from(secret_key.as_str()), &config.remote);

        let session_service = SessionService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            make_remote(),
        );

        let exchange_service = ExchangeService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            make_remote(),
        );

        let lifecycle_service = LifecycleService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            make_remote(),
        );

        let remote = Arc::new(make_remote());

        Ok(Self {
            session_service: Arc::new(session_service),
            exchange_service: Arc::new(exchange_service),
            lifecycle_service: Arc::new(lifecycle_service),
            remote,
            config,
            data_dir,
            db_pool,
        })
    }
}
