//! deck-server - HTTP service for slide and document text extraction.
//!
//! # Example
//!
//! ```ignore
//! use deck_server::{create_server, AppState, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::from_env().unwrap();
//!     let app = create_server(AppState::from_config(&config));
//!
//!     let listener = tokio::net::TcpListener::bind(config.bind_address()).await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use deck_core::{Error, Result};
    use deck_docs::DocumentExtractor;
    use deck_ppt::{Converter, LegacyExtractor, LegacyPolicy};
    use std::io::{Cursor, Write};
    use std::path::Path;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const BOUNDARY: &str = "deck-test-boundary";

    /// Converter returning canned output; `None` fails like a crashed JVM.
    struct CannedConverter(Option<String>);

    impl Converter for CannedConverter {
        fn convert(&self, _path: &Path) -> Result<String> {
            self.0.clone().ok_or_else(|| Error::ConverterFailed {
                status: "exit status: 1".to_string(),
                stderr: "java.lang.OutOfMemoryError".to_string(),
            })
        }
    }

    pub fn test_state(converter_output: Option<&str>, strict: bool) -> AppState {
        let converter: Box<dyn Converter + Send + Sync> =
            Box::new(CannedConverter(converter_output.map(str::to_string)));
        let policy = if strict {
            LegacyPolicy::Strict
        } else {
            LegacyPolicy::Lenient
        };
        AppState::new(
            LegacyExtractor::new(converter).with_policy(policy),
            DocumentExtractor::new(),
            1024 * 1024,
        )
    }

    pub fn multipart_request(uri: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, filename
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    pub async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// A PPTX with one text box per slide, ordered by slide file number.
    pub fn pptx_bytes(slides: &[&str]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        let mut rels = String::from(r#"<Relationships xmlns="r">"#);
        for i in 1..=slides.len() {
            rels.push_str(&format!(
                r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{i}.xml"/>"#
            ));
        }
        rels.push_str("</Relationships>");
        writer.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
        writer.write_all(rels.as_bytes()).unwrap();

        for (i, text) in slides.iter().enumerate() {
            writer
                .start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
                .unwrap();
            let xml = format!(
                r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
                text
            );
            writer.write_all(xml.as_bytes()).unwrap();
        }

        writer.finish().unwrap().into_inner()
    }
}
