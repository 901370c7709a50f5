use crate::config::Settings;
use crate::file_system::read_directory;
use crate::models::DirectoryQuery;
use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use log::{debug, info, warn};
use rust_embed::RustEmbed;
use serde_json::json;
use std::time::Instant;

#[derive(RustEmbed)]
#[folder = "public/"]
struct Asset;

/// Registers the API routes. Static assets are mounted separately as the
/// default service so tests can exercise the API alone.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .service(connect)
        .service(get_directory);
}

/// Malformed query strings get the same JSON error shape as failed listings.
fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    warn!("Rejected malformed query string: {}", err);
    let response =
        HttpResponse::BadRequest().json(json!({ "error": "Malformed directory request" }));
    InternalError::from_response(err, response).into()
}

#[get("/api/connect")]
pub async fn connect() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "message": "Connection successful" }))
}

#[get("/api/directory")]
pub async fn get_directory(
    settings: web::Data<Settings>,
    query: web::Query<DirectoryQuery>,
) -> HttpResponse {
    let requested = query.path.clone().unwrap_or_default();
    info!("Received request for directory contents: '{}'", requested);
    let start_time = Instant::now();

    match read_directory(&settings.base_dir, &requested).await {
        Ok(snapshot) => {
            info!(
                "Listed '{}' ({} entries) in {:.2?}.",
                snapshot.absolute_path,
                snapshot.entries.len(),
                start_time.elapsed()
            );
            HttpResponse::Ok().json(snapshot)
        }
        Err(e) => {
            warn!("Directory request for '{}' failed: {}", requested, e);
            HttpResponse::BadRequest().json(json!({ "error": e.public_message() }))
        }
    }
}

pub async fn static_handler(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };
    debug!("Serving static asset: {}", path);

    match Asset::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(content.data.into_owned())
        }
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}
