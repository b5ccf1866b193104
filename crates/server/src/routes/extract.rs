//! Slide and document text extraction endpoints.

use axum::{
    extract::{Multipart, State},
    Json,
};
use deck_core::{DocumentFormat, SlideRecord};
use deck_pptx::PptxParser;
use serde::Serialize;
use std::io::Cursor;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct SlidesResponse {
    pub filename: String,
    pub slides: Vec<SlideRecord>,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub filename: String,
    pub text: String,
}

/// An uploaded file.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Read the `file` field of a multipart body.
async fn read_upload(mut multipart: Multipart) -> ApiResult<Upload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(Upload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::bad_request(format!(
        "Missing multipart field '{}'",
        FILE_FIELD
    )))
}

/// Extract slide text from a presentation.
/// POST /extract_text/
pub async fn extract_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<SlidesResponse>> {
    let Upload { filename, bytes } = read_upload(multipart).await?;

    let slides = match DocumentFormat::from_filename(&filename) {
        Some(DocumentFormat::Pptx) => {
            tokio::task::spawn_blocking(move || PptxParser::new().extract(Cursor::new(bytes)))
                .await??
        }
        Some(DocumentFormat::Ppt) => {
            let legacy = state.legacy.clone();
            tokio::task::spawn_blocking(move || legacy.extract_bytes(&bytes)).await??
        }
        _ => return Err(ApiError::bad_request("File must be a .pptx or .ppt")),
    };

    log::debug!("Extracted {} slides from {}", slides.len(), filename);
    Ok(Json(SlidesResponse { filename, slides }))
}

/// Extract plain text from a PDF, image, Word or text document.
/// POST /extract_document/
pub async fn extract_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<DocumentResponse>> {
    let Upload { filename, bytes } = read_upload(multipart).await?;

    let documents = state.documents.clone();
    let name = filename.clone();
    let text = tokio::task::spawn_blocking(move || documents.extract(&bytes, &name)).await??;

    Ok(Json(DocumentResponse { filename, text }))
}

#[cfg(test)]
mod tests {
    use crate::create_server;
    use crate::test_support::{json_body, multipart_request, pptx_bytes, test_state};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_extract_pptx() {
        let app = create_server(test_state(Some(""), false));
        let pptx = pptx_bytes(&["Title", "Second slide"]);

        let response = app
            .oneshot(multipart_request("/extract_text/", "deck.pptx", &pptx))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["filename"], "deck.pptx");
        assert_eq!(json["slides"][0]["slide"], 1);
        assert_eq!(json["slides"][0]["text"], "Title");
        assert_eq!(json["slides"][1]["slide"], 2);
        assert_eq!(json["slides"][1]["text"], "Second slide");
    }

    #[tokio::test]
    async fn test_extract_ppt_through_converter() {
        let app = create_server(test_state(Some("--- Slide 1 ---\nOld deck\n"), false));

        let response = app
            .oneshot(multipart_request("/extract_text/", "old.PPT", b"ole bytes"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["filename"], "old.PPT");
        assert_eq!(json["slides"][0]["slide"], 1);
        assert_eq!(json["slides"][0]["text"], "Old deck");
    }

    #[tokio::test]
    async fn test_ppt_converter_failure_is_bad_gateway_when_strict() {
        let app = create_server(test_state(None, true));

        let response = app
            .oneshot(multipart_request("/extract_text/", "old.ppt", b"x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = json_body(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Legacy converter failed"));
    }

    #[tokio::test]
    async fn test_ppt_converter_failure_is_empty_when_lenient() {
        let app = create_server(test_state(None, false));

        let response = app
            .oneshot(multipart_request("/extract_text/", "old.ppt", b"x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["slides"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_rejects_other_extensions() {
        let app = create_server(test_state(Some(""), false));

        let response = app
            .oneshot(multipart_request("/extract_text/", "notes.txt", b"hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "File must be a .pptx or .ppt");
    }

    #[tokio::test]
    async fn test_corrupt_pptx_is_client_error() {
        let app = create_server(test_state(Some(""), false));

        let response = app
            .oneshot(multipart_request("/extract_text/", "deck.pptx", b"not a zip"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_extract_text_document() {
        let app = create_server(test_state(Some(""), false));

        let response = app
            .oneshot(multipart_request(
                "/extract_document/",
                "notes.txt",
                b"  first\n\n\n\nsecond\tline ",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["filename"], "notes.txt");
        assert_eq!(json["text"], "first\n\nsecond line");
    }

    #[tokio::test]
    async fn test_extract_document_unsupported() {
        let app = create_server(test_state(Some(""), false));

        let response = app
            .oneshot(multipart_request("/extract_document/", "data.csv", b"a,b"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .ends_with("Unsupported file type for extraction."));
    }
}
