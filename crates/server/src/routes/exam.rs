//! Exam package endpoint.

use axum::{
    extract::rejection::JsonRejection,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use deck_exam::ExamPackage;

use crate::error::ApiResult;

/// Build the question and answer documents and return them zipped.
/// POST /exam_package/
pub async fn exam_package(
    payload: Result<Json<ExamPackage>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(package) = payload?;

    let zip_name = package.zip_file_name();
    let archive = tokio::task::spawn_blocking(move || package.to_zip()).await??;

    let disposition = format!("attachment; filename=\"{}\"", zip_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive,
    )
        .into_response())
}
