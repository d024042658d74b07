use std::str::FromStr;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json,
    Router,
};
use catch_panic::CatchPanicLayer;
use derive_new::new;
use grid_pathviz::{NoopHost, Point, Scenario, SearchOutcome, StepBudget};
use log::{info, warn};
use serde::Serialize;
use tower_http::catch_panic;

#[derive(Clone, new)]
struct AppState {
    max_grid_size: i32,
    max_steps: usize,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {}={}", key, value);
            default
        }),
        Err(_) => default,
    }
}

#[tokio::main]
async fn main() {
    println!("================Starting server================");

    let port = std::env::var("PORT").unwrap_or("8080".to_string());

    tracing_subscriber::fmt::init();

    let app_state = AppState::new(env_or("MAX_GRID_SIZE", 200), env_or("MAX_STEPS", 100_000));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .unwrap();
    axum::serve(listener, router(app_state)).await.unwrap();
}

fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Hello, World!" }))
        .route("/find-path", post(find_path))
        .layer(CatchPanicLayer::new())
        .with_state(app_state)
}

#[derive(Serialize, new)]
struct FindPathRes {
    path: Vec<Point>,
    cost: i32,
    explored: Vec<Point>,
}

async fn find_path(state: State<AppState>, Json(scenario): Json<Scenario>) -> Response {
    if scenario.size > state.max_grid_size {
        let msg = format!(
            "Grid size {} exceeds limit {}",
            scenario.size, state.max_grid_size
        );
        return (StatusCode::BAD_REQUEST, msg).into_response();
    }

    let mut board = match scenario.to_board() {
        Ok(board) => board,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("{e}")).into_response(),
    };

    let max_steps = scenario
        .max_steps
        .map_or(state.max_steps, |steps| steps.min(state.max_steps));
    let mut budget = StepBudget::new(NoopHost, max_steps);

    match board.run(&mut budget) {
        Ok((search, SearchOutcome::Found(path))) => {
            info!(
                "path of cost {} from {} to {}",
                path.cost, scenario.start, scenario.end
            );
            let res = FindPathRes::new(path.cells, path.cost, search.explored().to_vec());
            (StatusCode::OK, Json(res)).into_response()
        }
        Ok((_, SearchOutcome::NoPathFound)) => {
            (StatusCode::BAD_REQUEST, "No path").into_response()
        }
        Ok((_, SearchOutcome::Aborted)) => (
            StatusCode::REQUEST_TIMEOUT,
            format!("Search aborted after {max_steps} steps"),
        )
            .into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, format!("{e}")).into_response(),
    }
}
