use std::path::PathBuf;

/// Server configuration
///
/// Every item can be overridden through environment variables:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/warung | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | LOG_LEVEL | info | Tracing level filter |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | CLAIM_WINDOW | 20 | Oldest-NEW window size for claiming |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Log level filter
    pub log_level: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// How many of the oldest NEW requests a claim considers
    pub claim_window: i64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/warung".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            claim_window: std::env::var("CLAIM_WINDOW")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|w| *w > 0)
                .unwrap_or(20),
        }
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_derive_from_work_dir() {
        let config = Config {
            work_dir: "/tmp/warung-test".into(),
            http_port: 3000,
            log_level: "info".into(),
            environment: "development".into(),
            claim_window: 20,
        };
        assert_eq!(
            config.database_dir(),
            PathBuf::from("/tmp/warung-test/database")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/warung-test/logs"));
        assert!(!config.is_production());
    }
}
