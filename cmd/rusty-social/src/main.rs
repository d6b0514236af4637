//! # rusty-social
//!
//! Entry point that assembles the service from the adapters selected by
//! compile-time features.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::AppState;
use auth_adapters::{Argon2PasswordHasher, GravatarResolver};
use configs::AppConfig;
use domains::{LikeRepository, PostRepository, UserRepository};
use secrecy::ExposeSecret;
use services::{LikeService, PostService, UserService};
use storage_adapters::InMemoryStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(feature = "auth-jwt")]
use auth_adapters::JwtAuthProvider;

#[cfg(feature = "db-postgres")]
use storage_adapters::PgStore;

#[cfg(not(feature = "auth-jwt"))]
compile_error!("an auth provider feature must be enabled (auth-jwt)");

#[cfg(not(feature = "web-axum"))]
compile_error!("the web-axum feature is required to build the server");

/// The three repository ports, all backed by the same store.
struct Repos {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl Repos {
    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + PostRepository + LikeRepository + 'static,
    {
        Self { users: store.clone(), posts: store.clone(), likes: store }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.logging.level)));
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_repos(config: &AppConfig) -> anyhow::Result<Repos> {
    match &config.database.url {
        #[cfg(feature = "db-postgres")]
        Some(url) => {
            let store = PgStore::connect(url.expose_secret(), config.database.max_connections).await?;
            store.migrate().await?;
            tracing::info!("using postgres store");
            Ok(Repos::from_store(Arc::new(store)))
        }
        #[cfg(not(feature = "db-postgres"))]
        Some(_) => anyhow::bail!("database.url is set but the db-postgres feature is disabled"),
        None => {
            tracing::warn!("database.url not set; using in-memory store, data will not persist");
            Ok(Repos::from_store(Arc::new(InMemoryStore::new())))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config);

    if config.uses_dev_secret() {
        tracing::warn!("auth.jwt_secret is the development default; set SOCIAL__AUTH__JWT_SECRET");
    }

    // 1. Storage
    let repos = build_repos(&config).await?;

    // 2. Credentials
    let hasher = Argon2PasswordHasher::with_params(
        config.auth.hash_memory_kib,
        config.auth.hash_iterations,
        config.auth.hash_parallelism,
    )?;
    let jwt = Arc::new(JwtAuthProvider::new(
        config.auth.jwt_secret.expose_secret().as_bytes(),
        config.auth.token_ttl_secs,
    ));

    // 3. Services behind the router state
    let state = AppState {
        users: Arc::new(UserService::new(
            repos.users.clone(),
            Arc::new(hasher),
            Arc::new(GravatarResolver::default()),
        )),
        posts: Arc::new(PostService::new(repos.posts, repos.users)),
        likes: Arc::new(LikeService::new(repos.likes)),
        auth: jwt.clone(),
        tokens: jwt,
    };

    let app = api_adapters::router(state);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "rusty-social listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
