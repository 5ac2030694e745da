use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Storage roots for uploaded files.
///
/// Three conventions coexist on disk: the public root (served under
/// `public_url_prefix`), the private root (CVs and other gated documents),
/// and the legacy root from the pre-migration uploader (served under
/// `legacy_url_prefix`). Constructed once at startup and injected into the
/// path resolver and handlers; nothing else reads these from the environment.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base directory all relative roots are resolved against
    pub base_dir: PathBuf,
    /// Publicly served files, e.g. job images and company logos
    pub public_root: String,
    /// Access-gated files, e.g. CVs
    pub private_root: String,
    /// Files written by the legacy uploader
    pub legacy_root: String,
    /// URL prefix the public root is exposed under
    pub public_url_prefix: String,
    /// URL prefix the legacy root is exposed under
    pub legacy_url_prefix: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl StorageConfig {
    pub const DEFAULT_PUBLIC_ROOT: &'static str = "public/storage/uploads";
    pub const DEFAULT_PRIVATE_ROOT: &'static str = "storage/uploads";
    pub const DEFAULT_LEGACY_ROOT: &'static str = "public/uploads";
    pub const DEFAULT_PUBLIC_URL_PREFIX: &'static str = "/storage/uploads";
    pub const DEFAULT_LEGACY_URL_PREFIX: &'static str = "/uploads";

    pub fn from_env() -> Result<Self, String> {
        let base_dir = env::var("STORAGE_BASE_DIR")
            .map(PathBuf::from)
            .or_else(|_| env::current_dir())
            .map_err(|e| format!("Cannot determine storage base directory: {}", e))?;

        let public_root = env::var("STORAGE_PUBLIC_ROOT")
            .unwrap_or_else(|_| Self::DEFAULT_PUBLIC_ROOT.to_string());

        let private_root = env::var("STORAGE_PRIVATE_ROOT")
            .unwrap_or_else(|_| Self::DEFAULT_PRIVATE_ROOT.to_string());

        let legacy_root = env::var("STORAGE_LEGACY_ROOT")
            .unwrap_or_else(|_| Self::DEFAULT_LEGACY_ROOT.to_string());

        let public_url_prefix = env::var("STORAGE_PUBLIC_URL_PREFIX")
            .unwrap_or_else(|_| Self::DEFAULT_PUBLIC_URL_PREFIX.to_string());

        let legacy_url_prefix = env::var("STORAGE_LEGACY_URL_PREFIX")
            .unwrap_or_else(|_| Self::DEFAULT_LEGACY_URL_PREFIX.to_string());

        Ok(Self {
            base_dir,
            public_root,
            private_root,
            legacy_root,
            public_url_prefix,
            legacy_url_prefix,
        })
    }

    /// Fixed defaults rooted at `base_dir`, for tests and tooling
    #[allow(dead_code)]
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            public_root: Self::DEFAULT_PUBLIC_ROOT.to_string(),
            private_root: Self::DEFAULT_PRIVATE_ROOT.to_string(),
            legacy_root: Self::DEFAULT_LEGACY_ROOT.to_string(),
            public_url_prefix: Self::DEFAULT_PUBLIC_URL_PREFIX.to_string(),
            legacy_url_prefix: Self::DEFAULT_LEGACY_URL_PREFIX.to_string(),
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Karira Storage API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "File storage and retrieval API for the Karira job board".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
