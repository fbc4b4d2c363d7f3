use std::convert::Infallible;
use std::io;

use bytes::Bytes;
use futures::TryStreamExt;
use log::{error, warn};
use serde_json::json;
use tokio_util::io::StreamReader;
use warp::http::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use warp::http::StatusCode;
use warp::multipart::FormData;
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::chunking::splitter::read_content;
use crate::error::{Error, Result};
use crate::services::FileService;
use crate::utils::file_id::is_valid_file_id;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

fn error_reply(status: StatusCode, message: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&json!({ "error": message })), status).into_response()
}

/// Reads the `file` part of the form.
///
/// A form that cannot be parsed up to the `file` part is a `Validation`
/// error; failing to read the part's own bytes is a `Split` error.
async fn read_file_field(form: FormData) -> Result<Bytes> {
    futures::pin_mut!(form);
    while let Some(part) = form
        .try_next()
        .await
        .map_err(|e| Error::Validation(format!("malformed multipart form: {}", e)))?
    {
        if part.name() != FILE_FIELD {
            continue;
        }
        let body = part
            .stream()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e));
        return read_content(StreamReader::new(Box::pin(body))).await;
    }
    Err(Error::Validation(format!("form has no `{}` field", FILE_FIELD)))
}

pub async fn upload_file(service: FileService, form: FormData) -> std::result::Result<Response, Infallible> {
    let content = match read_file_field(form).await {
        Ok(content) => content,
        Err(Error::Validation(reason)) => {
            warn!("Rejected upload: {}", reason);
            return Ok(error_reply(StatusCode::BAD_REQUEST, "No file is received"));
        }
        Err(e) => {
            error!("File splitting failed: {}", e);
            return Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "File splitting failed"));
        }
    };

    match service.upload(content).await {
        Ok(file_id) => Ok(warp::reply::json(&json!({ "file_id": file_id })).into_response()),
        Err(e) => {
            error!("Error uploading file: {}", e);
            Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Error uploading file"))
        }
    }
}

pub async fn list_files(service: FileService) -> std::result::Result<Response, Infallible> {
    match service.list_chunks().await {
        Ok(files) => Ok(warp::reply::json(&json!({ "files": files })).into_response()),
        Err(e) => {
            error!("Error retrieving files: {}", e);
            Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving files"))
        }
    }
}

pub async fn download_file(file_id: String, service: FileService) -> std::result::Result<Response, Infallible> {
    if !is_valid_file_id(&file_id) {
        return Ok(error_reply(StatusCode::BAD_REQUEST, "Invalid file id"));
    }

    let content = match service.download(&file_id).await {
        Ok(content) => content,
        Err(e @ Error::IncompleteFile { .. }) => {
            error!("Error merging chunks: {}", e);
            return Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Error merging chunks"));
        }
        Err(e) => {
            error!("Error retrieving file chunks: {}", e);
            return Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving file chunks"));
        }
    };

    let disposition = match HeaderValue::from_str(&format!("attachment; filename={}", file_id)) {
        Ok(value) => value,
        Err(_) => return Ok(error_reply(StatusCode::BAD_REQUEST, "Invalid file id")),
    };

    let mut resp = Response::new(content.into());
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
    resp.headers_mut().insert(CONTENT_DISPOSITION, disposition);
    Ok(resp)
}

/// Turns filter rejections into the same JSON error shape the handlers use.
pub async fn handle_rejection(err: Rejection) -> std::result::Result<Response, Infallible> {
    let reply = if err.is_not_found() {
        error_reply(StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        error_reply(StatusCode::PAYLOAD_TOO_LARGE, "File too large")
    } else if err.find::<warp::cors::CorsForbidden>().is_some() {
        error_reply(StatusCode::FORBIDDEN, "Origin not allowed")
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some()
        || err.find::<warp::reject::MissingHeader>().is_some()
        || err.find::<warp::reject::InvalidHeader>().is_some()
    {
        error_reply(StatusCode::BAD_REQUEST, "No file is received")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        error!("Unhandled rejection: {:?}", err);
        error_reply(StatusCode::BAD_REQUEST, "Bad request")
    };
    Ok(reply)
}
