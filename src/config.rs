use anyhow::{Context, Result, ensure};
use clap::Parser;
use std::{env, path::PathBuf, str::FromStr};

const DEFAULT_MAX_UPLOAD_SIZE: u64 = 524_288_000;
const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
}

/// Settings owned by the content store. Fixed at startup.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory every stored object lives under.
    pub root: PathBuf,
    /// Largest payload `store` accepts, in bytes.
    pub max_upload_size: u64,
    /// Largest interval a ranged response will carry, in bytes.
    pub chunk_size: u64,
    /// Size of the transfer buffer used while streaming.
    pub buffer_size: usize,
    /// Fixed base for public URLs; derived from the request when unset.
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            public_base_url: None,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.chunk_size > 0, "chunk size must be greater than zero");
        ensure!(self.buffer_size > 0, "buffer size must be greater than zero");
        ensure!(
            self.max_upload_size > 0,
            "max upload size must be greater than zero"
        );
        Ok(())
    }
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Video object store with HTTP range streaming")]
pub struct Args {
    /// Host to bind to (overrides VIDEO_STORE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides VIDEO_STORE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where videos are stored (overrides VIDEO_STORE_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,

    /// Maximum upload size in bytes (overrides VIDEO_STORE_MAX_UPLOAD_SIZE)
    #[arg(long)]
    pub max_upload_size: Option<u64>,

    /// Maximum bytes per ranged response (overrides VIDEO_STORE_CHUNK_SIZE)
    #[arg(long)]
    pub chunk_size: Option<u64>,

    /// Transfer buffer size in bytes (overrides VIDEO_STORE_BUFFER_SIZE)
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Base used for public URLs, e.g. https://cdn.example.com (overrides VIDEO_STORE_PUBLIC_URL)
    #[arg(long)]
    pub public_url: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::merge(Args::parse())
    }

    fn merge(args: Args) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env::var("VIDEO_STORE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = env_or("VIDEO_STORE_PORT", 8080)?;
        let env_storage =
            env::var("VIDEO_STORE_STORAGE_DIR").unwrap_or_else(|_| "./data/uploads".into());
        let env_max = env_or("VIDEO_STORE_MAX_UPLOAD_SIZE", DEFAULT_MAX_UPLOAD_SIZE)?;
        let env_chunk = env_or("VIDEO_STORE_CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
        let env_buffer = env_or("VIDEO_STORE_BUFFER_SIZE", DEFAULT_BUFFER_SIZE)?;
        let env_public = env::var("VIDEO_STORE_PUBLIC_URL").ok();

        // --- Merge ---
        let storage = StorageConfig {
            root: args.storage_dir.unwrap_or_else(|| env_storage.into()),
            max_upload_size: args.max_upload_size.unwrap_or(env_max),
            chunk_size: args.chunk_size.unwrap_or(env_chunk),
            buffer_size: args.buffer_size.unwrap_or(env_buffer),
            public_base_url: args.public_url.or(env_public).filter(|s| !s.is_empty()),
        };
        storage.validate()?;

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            storage,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read and parse an environment variable, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", key)),
    }
}
