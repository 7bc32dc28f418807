mod error;
mod service;
mod types;

pub use service::CoverageService;
pub use types::{CoverageMode, CoverageRequest};
