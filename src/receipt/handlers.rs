use actix_files::NamedFile;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::models::{ReceiptRequest, ReceiptResponse};
use super::service::ReceiptService;
use super::ReceiptError;
use crate::ErrorResponse;

/// Create a receipt from the submitted form fields
#[utoipa::path(
    post,
    path = "/api/receipts",
    tag = "Receipts",
    request_body = ReceiptRequest,
    responses(
        (status = 201, description = "Receipt generated", body = ReceiptResponse),
        (status = 400, description = "Invalid form data", body = ErrorResponse),
        (status = 500, description = "Receipt could not be rendered", body = ErrorResponse)
    )
)]
pub async fn create_receipt(
    service: web::Data<ReceiptService>,
    body: web::Json<ReceiptRequest>,
) -> impl Responder {
    let service = service.into_inner();
    let request = body.into_inner();

    match web::block(move || service.submit(request)).await {
        Ok(Ok(receipt)) => HttpResponse::Created().json(ReceiptResponse::from(receipt)),
        Ok(Err(ReceiptError::Validation(errors))) => HttpResponse::BadRequest()
            .json(ErrorResponse::new("ValidationError", &errors.to_message())),
        Ok(Err(ReceiptError::Render(e))) => HttpResponse::InternalServerError()
            .json(ErrorResponse::new("RenderError", &e.to_string())),
        Err(e) => {
            log::error!("Receipt worker failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Receipt worker failed"))
        }
    }
}

/// Download a generated receipt
#[utoipa::path(
    get,
    path = "/api/receipts/{file_name}",
    tag = "Receipts",
    params(
        ("file_name" = String, Path, description = "File name returned when the receipt was created")
    ),
    responses(
        (status = 200, description = "Receipt PDF"),
        (status = 400, description = "Not a plain file name", body = ErrorResponse),
        (status = 404, description = "Receipt not found", body = ErrorResponse)
    )
)]
pub async fn download_receipt(
    req: HttpRequest,
    service: web::Data<ReceiptService>,
    path: web::Path<String>,
) -> HttpResponse {
    let file_name = path.into_inner();
    if !is_plain_file_name(&file_name) {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::bad_request("Invalid receipt file name"));
    }

    let full_path = service.composer().receipts_dir().join(&file_name);
    match NamedFile::open_async(&full_path).await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            log::debug!("Receipt {} not served: {}", full_path.display(), e);
            HttpResponse::NotFound().json(ErrorResponse::not_found("Receipt not found"))
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && sanitize_filename::sanitize(name) == name
}

/// Configure receipt routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/receipts").route(web::post().to(create_receipt)))
        .service(web::resource("/receipts/{file_name}").route(web::get().to(download_receipt)));
}
