use serde_json::{json, Value};

pub const SYSTEM_INSTRUCTION: &str = "\
You are an expert shopping assistant and visual recognition AI.
Analyze the provided image frame from a video.
Identify all recognizable commercial products (clothing, bags, shoes, electronics, accessories, etc.).
For each product:
1. Provide a concise label.
2. Provide a bounding box in normalized coordinates [ymin, xmin, ymax, xmax] where each value is between 0 and 1000.
3. Generate a direct, relevant search or shopping link for that specific item on a major e-commerce platform like Amazon, Nike, Myntra, or similar.
4. Provide a confidence score between 0 and 1.

Return the result strictly as JSON.";

pub const USER_PROMPT: &str = "Detect products in this image and provide shopping links.";

/// Esquema estricto de salida: `confidence` se admite pero no es obligatorio.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "products": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "label": { "type": "STRING" },
                        "box": {
                            "type": "OBJECT",
                            "properties": {
                                "ymin": { "type": "NUMBER" },
                                "xmin": { "type": "NUMBER" },
                                "ymax": { "type": "NUMBER" },
                                "xmax": { "type": "NUMBER" }
                            },
                            "required": ["ymin", "xmin", "ymax", "xmax"]
                        },
                        "shoppingUrl": { "type": "STRING" },
                        "confidence": { "type": "NUMBER" }
                    },
                    "required": ["id", "label", "box", "shoppingUrl"]
                }
            }
        },
        "required": ["products"]
    })
}

/// Cuerpo completo de `generateContent` para un frame JPEG en base64.
pub fn build_request(jpeg_base64: &str, mime_type: &str) -> Value {
    json!({
        "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
        "contents": [{
            "role": "user",
            "parts": [
                { "text": USER_PROMPT },
                { "inlineData": { "mimeType": mime_type, "data": jpeg_base64 } }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}
