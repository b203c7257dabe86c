use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local use. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite://<home>/.tally/db`).
    pub database_url: String,
    /// Directory rendered invoices are written to
    /// (default: the user's Downloads directory).
    pub invoice_output_dir: PathBuf,
    /// Allowed CORS origins, parsed from comma-separated
    /// `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `DATABASE_URL`         | `sqlite://<home>/.tally/db`|
    /// | `INVOICE_OUTPUT_DIR`   | `<home>/Downloads`         |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url());

        let invoice_output_dir = std::env::var("INVOICE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_output_dir());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            database_url,
            invoice_output_dir,
            cors_origins,
            request_timeout_secs,
        }
    }
}

/// `sqlite://<home>/.tally/db`, creating the directory so SQLite can
/// create the file inside it.
fn default_database_url() -> String {
    let dir = dirs::home_dir()
        .expect("could not determine home directory; set DATABASE_URL")
        .join(".tally");
    std::fs::create_dir_all(&dir).expect("failed to create database directory");
    format!("sqlite://{}", dir.join("db").display())
}

fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .expect("could not determine home directory; set INVOICE_OUTPUT_DIR")
            .join("Downloads")
    })
}
