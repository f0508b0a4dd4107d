use crate::gui_bridge::model::SkyChartModel;
use crate::workflow::runner::Runner;
use log::{error, info, warn};
use serde_json::json;
use sondecore::TelemetryRecord;
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

type SharedModel = Arc<RwLock<SkyChartModel>>;

pub fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Holds the latest sky chart and serves it over HTTP.
pub struct GuiBridge {
    state: SharedModel,
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SkyChartModel::default())),
            runner,
        }
    }

    /// Starts the HTTP endpoint on a background thread.
    pub fn serve(&self, address: SocketAddr) -> thread::JoinHandle<()> {
        let routes = routes(self.state.clone(), self.runner.clone());
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            info!("sky chart bridge listening on http://{}", address);
            runtime.block_on(warp::serve(routes).run(address));
        })
    }

    pub fn publish(&self, model: SkyChartModel) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = model;
        info!(
            "[GUI] sky points: {}, filtered: {}, rejected: {}",
            guard.points.len(),
            guard.filtered,
            guard.rejected
        );
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> SkyChartModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn routes(
    state: SharedModel,
    runner: Arc<Runner>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let runner_filter = warp::any().map(move || runner.clone());

    let get_route = warp::path("skychart")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedModel| {
            let guard = state.read().unwrap_or_else(PoisonError::into_inner);
            warp::reply::json(&*guard)
        });

    let post_route = warp::path("ingest")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter)
        .and(runner_filter)
        .and_then(
            |records: Vec<TelemetryRecord>, state: SharedModel, runner: Arc<Runner>| async move {
                // Derivation runs on rayon; keep it off the async workers.
                let reply = tokio::task::spawn_blocking(move || ingest(records, &state, &runner))
                    .await
                    .unwrap_or_else(|err| {
                        error!("ingest task failed: {}", err);
                        error_reply(
                            format!("ingest task failed: {}", err),
                            StatusCode::INTERNAL_SERVER_ERROR,
                        )
                    });
                Ok::<_, warp::Rejection>(reply)
            },
        );

    get_route.or(post_route)
}

fn ingest(
    records: Vec<TelemetryRecord>,
    state: &SharedModel,
    runner: &Runner,
) -> warp::reply::WithStatus<warp::reply::Json> {
    match runner.execute(records) {
        Ok(result) => {
            let model = SkyChartModel::from(&result);
            let count = model.points.len();
            *state.write().unwrap_or_else(PoisonError::into_inner) = model;
            warp::reply::with_status(
                warp::reply::json(&json!({"status": "ok", "observations": count})),
                StatusCode::OK,
            )
        }
        Err(err) => {
            warn!("ingest error: {:#}", err);
            error_reply(format!("{:#}", err), StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

fn error_reply(message: String, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({"status": "error", "message": message})),
        status,
    )
}
