use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_WORDS_PATH: &str = "words.txt";
pub const DEFAULT_PHRASES_PATH: &str = "wow.txt";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// Process configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Newline-delimited word list
    pub words_path: PathBuf,
    /// Optional newline-delimited celebration phrases
    pub phrases_path: PathBuf,
    /// Where the transport socket listens
    pub addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            words_path: PathBuf::from(DEFAULT_WORDS_PATH),
            phrases_path: PathBuf::from(DEFAULT_PHRASES_PATH),
            addr: default_addr(),
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Config {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let words_path = non_empty_var("CROCODILE_WORDS")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDS_PATH));

        let phrases_path = non_empty_var("CROCODILE_PHRASES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PHRASES_PATH));

        let addr = match non_empty_var("CROCODILE_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().unwrap_or_else(|e| {
                tracing::warn!(
                    "Invalid CROCODILE_ADDR '{}' ({}), using {}",
                    raw,
                    e,
                    DEFAULT_ADDR
                );
                default_addr()
            }),
            None => default_addr(),
        };

        tracing::info!(
            words = %words_path.display(),
            phrases = %phrases_path.display(),
            %addr,
            "Config loaded"
        );

        Self {
            words_path,
            phrases_path,
            addr,
        }
    }
}
