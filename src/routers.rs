use std::convert::Infallible;
use std::time::Duration;

use warp::Filter;

use crate::handlers::{download_file, handle_rejection, list_files, upload_file};
use crate::services::FileService;
use crate::utils::config::Config;

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

pub fn make_routes(
    service: FileService,
    cfg: &Config,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let service_filter = warp::any().map(move || service.clone());

    let upload = warp::path("upload")
        .and(warp::path::end())
        .and(warp::post())
        .and(service_filter.clone())
        .and(warp::multipart::form().max_length(cfg.max_upload_bytes))
        .and_then(upload_file);

    let files = warp::path("files")
        .and(warp::path::end())
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(list_files);

    let download = warp::path("download")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(download_file);

    let cors = warp::cors()
        .allow_origin(cfg.cors_origin.as_str())
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_headers(vec!["Content-Type", "Authorization"])
        .expose_headers(vec!["Content-Length"])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE);

    upload
        .or(files)
        .or(download)
        .with(cors)
        .with(warp::log("chunked_file_storage::http"))
        .recover(handle_rejection)
}
