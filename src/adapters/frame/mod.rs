pub mod capture;
pub mod surface;
