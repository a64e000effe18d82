use std::sync::{Arc, RwLock};
use std::time::Duration as StdDuration;

use axum::{routing::get, routing::post, routing::put, Router};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{Instant, MissedTickBehavior};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::render::SnapshotRenderer;
use crate::session::{Session, SessionEvent};

use super::api::clock as clock_handlers;
use super::api::frame as frame_handlers;
use super::api::selection as selection_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Scene
        .route("/api/satellites", get(frame_handlers::list_satellites))
        .route("/api/frame", get(frame_handlers::latest_frame))
        // Clock
        .route("/api/clock", get(clock_handlers::status))
        .route("/api/clock/rate", post(clock_handlers::set_rate))
        .route("/api/clock/scrub", post(clock_handlers::scrub))
        // Selection
        .route(
            "/api/selection",
            post(selection_handlers::select).delete(selection_handlers::deselect),
        )
        .route("/api/interest", put(selection_handlers::set_interest))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config, session: Session) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let (events, receiver) = mpsc::unbounded_channel();
    let frame = Arc::new(RwLock::new(None));

    let state = AppState {
        events,
        frame: frame.clone(),
        satellites: Arc::new(session.satellites().iter().map(|s| s.info()).collect()),
    };

    let renderer = SnapshotRenderer::new(frame);
    let ticker = tokio::spawn(drive_session(
        session,
        renderer,
        receiver,
        config.tick.interval,
    ));

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let served = axum::serve(listener, app).await;
    ticker.abort();
    served
}

async fn drive_session(
    mut session: Session,
    mut renderer: SnapshotRenderer,
    mut events: UnboundedReceiver<SessionEvent>,
    interval: StdDuration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    loop {
        ticker.tick().await;

        while let Ok(event) = events.try_recv() {
            session.queue(event);
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f64();
        last = now;

        let frame = session.tick(elapsed, &mut renderer);
        if frame.tick % 1200 == 0 {
            log::debug!(
                "Tick {} at {} ({} updated, {} failed)",
                frame.tick,
                frame.instant,
                frame.report.updated,
                frame.report.failed
            );
        }
    }
}
