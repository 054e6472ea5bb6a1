pub mod config;
pub mod service;

pub use config::{Config, LogFormat};
pub use service::{AppState, CORRELATION_ID_HEADER, build_router, create_app};
