use std::sync::Arc;
use backend::{
    build_rocket,
    config::Settings,
    ledger::VoteLedger,
    queries::PgLedger,
    routes::AppState,
    service::VoteService,
    Catalog,
};
use shuttle_runtime::CustomError;
use sqlx::PgPool;
use tracing::{info, warn};

#[shuttle_runtime::main]
async fn rocket(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secret_store: shuttle_runtime::SecretStore,
) -> shuttle_rocket::ShuttleRocket {
    info!("🚀 Starting Awards vote server");

    let settings = Settings::from_secrets(&secret_store);

    // No partial catalog is ever served.
    let catalog = Catalog::load(&settings.catalog_path).map_err(CustomError::new)?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(CustomError::new)?;

    info!("📋 Migrations complete");

    let ledger: Arc<dyn VoteLedger> = Arc::new(PgLedger::new(pool));
    let votes = VoteService::new(Arc::new(catalog), ledger);

    if settings.rebuild_tally {
        votes.rebuild_tally().await.map_err(CustomError::new)?;
    } else {
        warn!("REBUILD_TALLY disabled - results start from zero");
    }

    let app_state = match settings.telegram_bot_token {
        Some(token) => AppState::new_with_telegram(votes, token),
        None => AppState::new(votes),
    };

    Ok(build_rocket(app_state).into())
}
