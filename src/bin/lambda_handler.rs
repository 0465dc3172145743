//! AWS Lambda handler for running the project finance model
//!
//! Accepts `POST /projects/{id}/finance/run` with the assumption-override
//! JSON body, resolves against the project's stored defaults, runs the
//! engine, persists the run, and returns the stored row.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use std::path::Path;
use std::sync::OnceLock;

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use log::warn;
use serde::Serialize;

use solar_finance::store::{MemoryRunStore, RunStore};
use solar_finance::{resolve, FinanceEngine, FinanceRequest, ProjectBook};

/// Environment variable overriding the seed data directory
const DATA_DIR_ENV: &str = "PROJECT_DATA_DIR";

static STORE: OnceLock<MemoryRunStore> = OnceLock::new();

fn store() -> &'static MemoryRunStore {
    STORE.get_or_init(MemoryRunStore::new)
}

fn error_response(status: u16, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(format!(r#"{{"error":"{}"}}"#, message)))
        .unwrap()
}

fn json_response<T: Serialize>(status: u16, body: &T) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Extract the project id from `/projects/{id}/finance/run`
fn parse_project_id(path: &str) -> Option<u32> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["projects", id, "finance", "run"] => id.parse().ok(),
        _ => None,
    }
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .unwrap());
    }

    let Some(project_id) = parse_project_id(event.uri().path()) else {
        return Ok(error_response(
            400,
            "expected POST /projects/{id}/finance/run",
        ));
    };

    // Parse request body
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: FinanceRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    // Look up the project's stored defaults
    let data_dir = std::env::var(DATA_DIR_ENV)
        .unwrap_or_else(|_| solar_finance::project::loader::DEFAULT_DATA_PATH.to_string());

    let book = match ProjectBook::load_from(Path::new(&data_dir)) {
        Ok(book) => book,
        Err(e) => {
            return Ok(error_response(500, &format!("Failed to load project data: {}", e)));
        }
    };

    let Some(defaults) = book.defaults_for(project_id) else {
        return Ok(error_response(404, "project not found"));
    };

    let run_by = event
        .query_string_parameters()
        .first("run_by")
        .unwrap_or("")
        .to_string();

    // Resolve, project, aggregate
    let assumptions = resolve(&request, Some(&defaults));
    let result = FinanceEngine::new(assumptions).run();

    let stored = match store().save(project_id, result, &run_by) {
        Ok(run) => run,
        Err(e) => {
            warn!("failed to persist finance run: {}", e);
            return Ok(error_response(500, &format!("Failed to store run: {}", e)));
        }
    };

    Ok(json_response(201, &stored))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
