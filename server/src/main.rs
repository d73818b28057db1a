//! User directory server: reads config from the environment, prepares the store,
//! seeds it, and serves the HTTP API.
//!
//! Run from repo root: `cargo run -p user-directory-server`

use std::sync::Arc;
use tokio::net::TcpListener;
use user_directory::store::{
    DepartmentRepository, MemoryDepartmentRepository, MemoryUserRepository,
    PgDepartmentRepository, PgUserRepository, UserRepository,
};
use user_directory::{
    app, apply_migrations, ensure_database_exists, seed_initial_data, AppState, ServerConfig,
    StoreKind, UserService,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("user_directory=info,tower_http=info")
            }),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let (users, departments): (Arc<dyn UserRepository>, Arc<dyn DepartmentRepository>) =
        match config.store {
            StoreKind::Postgres => {
                ensure_database_exists(&config.database_url).await?;
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&config.database_url)
                    .await?;
                apply_migrations(&pool).await?;
                (
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgDepartmentRepository::new(pool)),
                )
            }
            StoreKind::Memory => {
                tracing::warn!("using in-memory store; data is lost on exit");
                (
                    Arc::new(MemoryUserRepository::new()),
                    Arc::new(MemoryDepartmentRepository::new()),
                )
            }
        };

    if config.seed_on_startup {
        seed_initial_data(users.as_ref(), departments.as_ref()).await?;
    }

    let state = AppState::new(UserService::new(users, departments));
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
