pub mod settings;

pub use settings::{AppConfig, CorsConfig, ServerConfig, UploadConfig};
