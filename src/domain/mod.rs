pub mod detection;
pub mod errors;
pub mod frame;
pub mod overlay;
pub mod session;
