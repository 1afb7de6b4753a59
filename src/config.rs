//! Runtime settings for the command-line front end

use std::path::PathBuf;

/// Environment variable overriding the carrier store location
pub const STORE_ENV: &str = "PIXEL_STEGO_STORE";

/// Store location used when neither flag nor environment is set
pub const DEFAULT_STORE_PATH: &str = "data/carriers.json";

/// Default `EnvFilter` directive when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "pixel_stego=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
}

impl Config {
    /// Resolve settings: explicit flag, then environment, then default
    pub fn resolve(store_flag: Option<PathBuf>) -> Self {
        Self::resolve_with(store_flag, std::env::var_os(STORE_ENV).map(PathBuf::from))
    }

    fn resolve_with(store_flag: Option<PathBuf>, store_env: Option<PathBuf>) -> Self {
        let store_path = store_flag
            .or(store_env)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
        Self { store_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let cfg = Config::resolve_with(Some("a.json".into()), Some("b.json".into()));
        assert_eq!(cfg.store_path, PathBuf::from("a.json"));
    }

    #[test]
    fn test_env_fallback() {
        let cfg = Config::resolve_with(None, Some("b.json".into()));
        assert_eq!(cfg.store_path, PathBuf::from("b.json"));
    }

    #[test]
    fn test_default() {
        let cfg = Config::resolve_with(None, None);
        assert_eq!(cfg.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        let cfg = Config::resolve_with(None, Some(PathBuf::new()));
        assert_eq!(cfg.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    }
}
