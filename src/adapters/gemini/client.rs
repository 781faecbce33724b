use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, warn};

use crate::adapters::gemini::prompt::build_request;
use crate::application::ports::ProductDetectionPort;
use crate::domain::{
    detection::DetectionResult,
    errors::{DomainError, DomainResult},
    frame::{CapturedFrame, JPEG_MIME},
};

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

/// Cliente de `generateContent`. No reintenta ni impone timeout: eso es cosa del llamador.
pub struct GeminiDetectionClient {
    client: reqwest::Client,
    settings: GeminiSettings,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Texto del primer candidato, concatenando sus partes de texto.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        Some(text)
    }
}

impl GeminiDetectionClient {
    pub fn new(settings: GeminiSettings) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, settings }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }
}

/// Convierte el texto del modelo en productos. Cualquier salida mal formada
/// equivale a "no se encontraron productos".
pub fn parse_detection_text(text: Option<&str>) -> DetectionResult {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        warn!("⚠️ Respuesta vacía del modelo de visión");
        return DetectionResult::empty();
    };

    match serde_json::from_str::<DetectionResult>(text) {
        Ok(mut result) => {
            for p in &mut result.products {
                if !p.bbox.is_well_formed() {
                    warn!("Caja fuera de rango para '{}': {:?}, se corrige", p.id, p.bbox);
                    p.bbox = p.bbox.sanitized();
                }
            }
            result
        }
        Err(e) => {
            warn!("⚠️ No se pudo interpretar la respuesta del modelo: {}", e);
            DetectionResult::empty()
        }
    }
}

#[async_trait]
impl ProductDetectionPort for GeminiDetectionClient {
    async fn detect(&self, frame: &CapturedFrame) -> DomainResult<DetectionResult> {
        let body = build_request(&frame.jpeg_base64, JPEG_MIME);
        info!("🔍 Detectando productos en frame {}x{} con {}", frame.width, frame.height, self.settings.model);

        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Upstream(e.to_string()))?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let detail = res.text().await.unwrap_or_default();
            return Err(DomainError::Unauthorized(format!("{status}: {detail}")));
        }
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(DomainError::Upstream(format!("{status}: {detail}")));
        }

        let envelope = res
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| DomainError::Upstream(format!("respuesta ilegible: {e}")))?;

        let result = parse_detection_text(envelope.text().as_deref());
        info!("🛍️ {} productos detectados", result.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::BoundingBox;
    use axum::{http::HeaderMap, response::IntoResponse, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn frame() -> CapturedFrame {
        CapturedFrame { jpeg_base64: "/9j/AAAA".into(), width: 1920, height: 1080 }
    }

    fn envelope(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    /// Levanta un servidor falso que responde siempre lo mismo y guarda la última petición.
    async fn fake_gemini(
        status: axum::http::StatusCode,
        reply: Value,
    ) -> (GeminiDetectionClient, Arc<Mutex<Option<(String, Value)>>>) {
        let seen = Arc::new(Mutex::new(None));
        let seen_in = seen.clone();
        let app = Router::new().fallback(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = seen_in.clone();
            let reply = reply.clone();
            async move {
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                *seen.lock().unwrap() = Some((key, body));
                (status, Json(reply)).into_response()
            }
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = GeminiDetectionClient::new(GeminiSettings {
            base_url: format!("http://{addr}/v1beta"),
            model: "gemini-test".into(),
            api_key: "secret".into(),
        });
        (client, seen)
    }

    #[test]
    fn parses_products_verbatim() {
        let text = r#"{"products":[
            {"id":"1","label":"Red sneakers","box":{"ymin":100,"xmin":200,"ymax":300,"xmax":400},"shoppingUrl":"https://www.amazon.com/s?k=red+sneakers","confidence":0.87},
            {"id":"2","label":"Leather bag","box":{"ymin":0,"xmin":0,"ymax":1000,"xmax":1000},"shoppingUrl":"https://www.myntra.com/bags"}
        ]}"#;
        let result = parse_detection_text(Some(text));

        assert_eq!(result.len(), 2);
        assert_eq!(result.products[0].label, "Red sneakers");
        assert_eq!(result.products[0].shopping_url, "https://www.amazon.com/s?k=red+sneakers");
        assert_eq!(result.products[0].confidence, Some(0.87));
        assert_eq!(result.products[0].bbox, BoundingBox::new(100.0, 200.0, 300.0, 400.0));
        assert_eq!(result.products[1].confidence, None);
    }

    #[test]
    fn malformed_or_empty_output_means_no_products() {
        assert!(parse_detection_text(Some("not json")).is_empty());
        assert!(parse_detection_text(Some("")).is_empty());
        assert!(parse_detection_text(Some("   ")).is_empty());
        assert!(parse_detection_text(None).is_empty());
        assert!(parse_detection_text(Some(r#"{"items":[]}"#)).is_empty());
        // Falta shoppingUrl
        let missing = r#"{"products":[{"id":"1","label":"x","box":{"ymin":1,"xmin":1,"ymax":2,"xmax":2}}]}"#;
        assert!(parse_detection_text(Some(missing)).is_empty());
    }

    #[test]
    fn degenerate_boxes_are_repaired() {
        let text = r#"{"products":[{"id":"1","label":"x","box":{"ymin":900,"xmin":-5,"ymax":100,"xmax":1500},"shoppingUrl":"u"}]}"#;
        let result = parse_detection_text(Some(text));
        assert_eq!(result.products[0].bbox, BoundingBox::new(100.0, 0.0, 900.0, 1000.0));
    }

    #[tokio::test]
    async fn detect_posts_frame_and_parses_reply() {
        let text = r#"{"products":[{"id":"a","label":"Watch","box":{"ymin":10,"xmin":20,"ymax":30,"xmax":40},"shoppingUrl":"https://example.com/watch","confidence":0.5}]}"#;
        let (client, seen) = fake_gemini(axum::http::StatusCode::OK, envelope(text)).await;

        let result = client.detect(&frame()).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.products[0].id, "a");

        let (key, body) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(key, "secret");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["data"], "/9j/AAAA");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/jpeg");
    }

    #[tokio::test]
    async fn non_json_text_is_swallowed() {
        let (client, _) = fake_gemini(axum::http::StatusCode::OK, envelope("not json")).await;
        assert!(client.detect(&frame()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_candidates_is_empty_result() {
        let (client, _) = fake_gemini(axum::http::StatusCode::OK, json!({})).await;
        assert!(client.detect(&frame()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn auth_failure_propagates() {
        let (client, _) =
            fake_gemini(axum::http::StatusCode::FORBIDDEN, json!({"error": "API key not valid"})).await;
        assert!(matches!(client.detect(&frame()).await, Err(DomainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn server_error_propagates() {
        let (client, _) = fake_gemini(axum::http::StatusCode::SERVICE_UNAVAILABLE, json!({})).await;
        assert!(matches!(client.detect(&frame()).await, Err(DomainError::Upstream(_))));
    }

    #[tokio::test]
    async fn unreachable_service_propagates() {
        let client = GeminiDetectionClient::new(GeminiSettings {
            base_url: "http://127.0.0.1:1".into(),
            model: "m".into(),
            api_key: String::new(),
        });
        assert!(matches!(client.detect(&frame()).await, Err(DomainError::Upstream(_))));
    }
}
