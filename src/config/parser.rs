use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use gleaner::config::load_config;
///
/// let config = load_config(Path::new("gleaner.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Recorded alongside stored documents so a knowledge base can be traced
/// back to the settings that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PolitenessScope, SnapshotFormat};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
user-agent = "TestCrawler/2.0"
delay-seconds = 0.5
max-depth = 3
max-pages = 50
respect-robots-txt = false
timeout-seconds = 4.0
politeness-scope = "per-host"

[store]
path = "./kb.sqlite"
format = "sqlite"

[retrieval]
top-k = 5
min-content-length = 20

[filter]
allowed-domains = ["example.com", "*.docs.example.com"]
patterns = ["/blog/"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.user_agent, "TestCrawler/2.0");
        assert_eq!(config.crawler.delay_seconds, 0.5);
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_pages, 50);
        assert!(!config.crawler.respect_robots_txt);
        assert_eq!(config.crawler.politeness_scope, PolitenessScope::PerHost);
        assert_eq!(config.store.format, SnapshotFormat::Sqlite);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.min_content_length, 20);
        assert_eq!(config.filter.allowed_domains.len(), 2);
        assert_eq!(config.filter.patterns, vec!["/blog/".to_string()]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.crawler.user_agent, "GleanerBot/1.0");
        assert_eq!(config.crawler.delay_seconds, 1.0);
        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.max_pages, 100);
        assert!(config.crawler.respect_robots_txt);
        assert_eq!(config.crawler.timeout_seconds, 10.0);
        assert_eq!(config.crawler.politeness_scope, PolitenessScope::Global);
        assert_eq!(config.store.format, SnapshotFormat::Json);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.min_content_length, 100);
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let config = parse_config("[crawler]\nmax-pages = 7\n").unwrap();
        assert_eq!(config.crawler.max_pages, 7);
        assert_eq!(config.crawler.max_depth, 2);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/gleaner.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_scope_is_parse_error() {
        let result = parse_config("[crawler]\npoliteness-scope = \"sometimes\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-pages = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
