pub mod client;
pub mod prompt;
