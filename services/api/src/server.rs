use crate::cli::ServeArgs;
use crate::infra::{load_contest, AppState, InMemoryContestRepository};
use crate::routes::with_contest_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use prop_pool::config::AppConfig;
use prop_pool::contest::{ContestBundle, ContestService, ContestSettings};
use prop_pool::error::AppError;
use prop_pool::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryContestRepository::default());
    let contest_service = Arc::new(ContestService::new(repository, config.contest.scoring()));

    if let Some(dir) = &config.contest.contest_dir {
        let bundle = ContestBundle::from_dir(dir)?;
        let settings = ContestSettings {
            home_team: config.contest.home_team.clone(),
            away_team: config.contest.away_team.clone(),
            lock: None,
        };
        let contest_id = load_contest(&contest_service, bundle, settings, "file")?;
        info!(contest = %contest_id, dir = %dir.display(), "preloaded contest");
    }

    let app = with_contest_routes(contest_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "prop pool service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
