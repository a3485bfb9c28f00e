use actix_web::{
    http::header::{self, ContentDisposition, ContentType, DispositionParam, DispositionType},
    web, HttpRequest, HttpResponse, Responder,
};
use common::{store::RecordStore, utils::ApiResponse};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    admin::render_panel,
    auth::AdminGuard,
    error::ApiError,
    form::parse_submission,
    security::{client_ip, SubmissionLimiter},
};

const SUBMITTED_MESSAGE: &str = "Thank you! Your information has been submitted successfully.";

pub struct AppState {
    pub store: RecordStore,
    pub landing_page: String,
    pub export_file_name: String,
}

pub fn configure(cfg: &mut web::ServiceConfig, guard: AdminGuard, limiter: SubmissionLimiter) {
    cfg.service(index)
        .service(health_check)
        .service(
            web::resource("/submit-form")
                .wrap(limiter)
                .route(web::post().to(submit_form)),
        )
        .service(
            web::scope("/admin")
                .wrap(guard)
                .service(admin_panel)
                .service(export_data)
                .service(delete_customer_by_id)
                .service(delete_customer),
        );
}

#[actix_web::get("/")]
async fn index(app_state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Found()
        .insert_header((
            header::LOCATION,
            format!("/static/{}", app_state.landing_page),
        ))
        .finish()
}

#[actix_web::get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

async fn submit_form(
    req: HttpRequest,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let customer = parse_submission(&body);
    let ip_address = client_ip(req.peer_addr());

    let record = customer
        .into_record(ip_address)
        .inspect_err(|e| warn!(missing = ?e.missing, "Rejected form submission"))?;
    let record_id = record.id;

    let total = app_state
        .store
        .append(record)
        .await
        .inspect_err(|e| warn!(error = %e, "Failed to store form submission"))?;

    info!(record_id = %record_id, total, "Form submission stored");
    Ok(HttpResponse::Ok().json(ApiResponse::success(SUBMITTED_MESSAGE)))
}

#[actix_web::get("")]
async fn admin_panel(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let customers = app_state.store.load().await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_panel(&customers)))
}

#[actix_web::get("/export")]
async fn export_data(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let customers = app_state.store.load().await?;
    let body =
        serde_json::to_vec_pretty(&customers).map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(total = customers.len(), "Exporting customer records");
    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(
                app_state.export_file_name.clone(),
            )],
        })
        .body(body))
}

// Out-of-range indices are ignored; the caller is redirected either way.
#[actix_web::get("/delete/{index}")]
async fn delete_customer(
    path: web::Path<usize>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let idx = path.into_inner();
    if app_state.store.remove_at(idx).await?.is_none() {
        info!(index = idx, "Ignoring delete for out-of-range index");
    }

    Ok(redirect_to_panel())
}

#[actix_web::get("/delete/id/{id}")]
async fn delete_customer_by_id(
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if app_state.store.remove_by_id(id).await?.is_none() {
        info!(record_id = %id, "Ignoring delete for unknown record id");
    }

    Ok(redirect_to_panel())
}

fn redirect_to_panel() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/admin"))
        .finish()
}
