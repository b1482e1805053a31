use petlog_common::env_or;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        // Defaults match the vendor integration: all interfaces, port 8000.
        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 8000u16),
            max_body_bytes: env_or("MAX_BODY_BYTES", 64 * 1024usize),
        }
    }
}
