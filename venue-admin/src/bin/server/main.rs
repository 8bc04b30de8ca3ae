use std::sync::Arc;

use auth::Authenticator;
use auth::Role;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use venue_admin::config::BootstrapAdminConfig;
use venue_admin::config::Config;
use venue_admin::domain::account::models::CreateAccountCommand;
use venue_admin::domain::account::models::DisplayName;
use venue_admin::domain::account::models::EmailAddress;
use venue_admin::domain::account::models::Password;
use venue_admin::domain::account::models::Username;
use venue_admin::domain::account::ports::AccountDirectoryPort;
use venue_admin::domain::account::service::AccountDirectory;
use venue_admin::inbound::http::router::create_router;
use venue_admin::outbound::database;
use venue_admin::outbound::repositories::account::PostgresAccountRepository;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "venue_admin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "venue-admin",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        allowed_origins = ?config.server.allowed_origins,
        jwt_expiration_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let pg_pool = database::connect(&config.database).await?;

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
    ));
    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool.clone()));
    let directory: Arc<dyn AccountDirectoryPort> = Arc::new(AccountDirectory::new(
        account_repository,
        Arc::clone(&authenticator),
    ));

    if let Some(admin) = &config.bootstrap_admin {
        let created = directory
            .ensure_bootstrap_admin(bootstrap_command(admin)?)
            .await?;
        tracing::info!(email = %admin.email, created, "Bootstrap admin checked");
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        directory,
        Arc::clone(&authenticator),
        &config.server.allowed_origins,
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pg_pool.close().await;
    tracing::info!("Server exited successfully");

    Ok(())
}

fn bootstrap_command(admin: &BootstrapAdminConfig) -> Result<CreateAccountCommand, anyhow::Error> {
    Ok(CreateAccountCommand {
        name: DisplayName::new(admin.name.clone())?,
        email: EmailAddress::new(admin.email.clone())?,
        username: Username::new(admin.username.clone())?,
        password: Password::new(admin.password.clone())?,
        role: Role::Admin,
        phone: None,
        department: None,
        bio: None,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
