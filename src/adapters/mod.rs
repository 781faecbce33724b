pub mod frame;
pub mod gemini;
pub mod http;
