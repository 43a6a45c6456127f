//! Configuration management

use crate::block::HEADER_VERSION;
use crate::error::LedgerError;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "fadden.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub mempool: MempoolConfig,
    #[serde(default)]
    pub node: NodeConfig,
}

#[derive(Debug, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_header_version")]
    pub version: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct MempoolConfig {
    /// 0 means unbounded.
    #[serde(default)]
    pub max_transactions: usize,
}

#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_blocks")]
    pub blocks: u32,
    #[serde(default = "default_txs_per_block")]
    pub txs_per_block: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            version: default_header_version(),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            blocks: default_blocks(),
            txs_per_block: default_txs_per_block(),
            log_level: default_log_level(),
        }
    }
}

fn default_header_version() -> u32 {
    HEADER_VERSION
}

fn default_blocks() -> u32 {
    10
}

fn default_txs_per_block() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Loads `path`, falling back to defaults when the file is absent or empty.
/// Any other read failure is a `Config` error.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, LedgerError> {
    let path = path.as_ref();
    let config_str = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(LedgerError::Config(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )))
        }
    };
    let config: Config = if config_str.trim().is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str)
            .map_err(|e| LedgerError::Config(format!("{}: {}", path.display(), e)))?
    };

    // Validate critical values
    if config.chain.version == 0 {
        return Err(LedgerError::Config(
            "chain.version must be at least 1".to_string(),
        ));
    }

    if config.node.log_level.parse::<tracing::Level>().is_err() {
        return Err(LedgerError::Config(format!(
            "node.log_level '{}' is not a valid level",
            config.node.log_level
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config("/nonexistent/fadden.toml").unwrap();
        assert_eq!(config.chain.version, HEADER_VERSION);
        assert_eq!(config.mempool.max_transactions, 0);
        assert_eq!(config.node.blocks, 10);
        assert_eq!(config.node.log_level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[mempool]\nmax_transactions = 64\n\n[node]\nblocks = 3")?;

        let config = load_config(file.path())?;
        assert_eq!(config.mempool.max_transactions, 64);
        assert_eq!(config.node.blocks, 3);
        assert_eq!(config.node.txs_per_block, 4);
        assert_eq!(config.chain.version, HEADER_VERSION);
        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[chain]\nversion = 0")?;
        assert!(matches!(load_config(file.path()), Err(LedgerError::Config(_))));

        let mut file = NamedTempFile::new()?;
        writeln!(file, "[node]\nlog_level = \"loud\"")?;
        assert!(matches!(load_config(file.path()), Err(LedgerError::Config(_))));

        let mut file = NamedTempFile::new()?;
        writeln!(file, "not toml at all [")?;
        assert!(matches!(load_config(file.path()), Err(LedgerError::Config(_))));
        Ok(())
    }

    #[test]
    fn test_unreadable_path_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        assert!(matches!(
            load_config(dir.path()),
            Err(LedgerError::Config(_))
        ));

        let mut file = NamedTempFile::new()?;
        file.write_all(&[0xff, 0xfe, 0x00])?;
        assert!(matches!(
            load_config(file.path()),
            Err(LedgerError::Config(_))
        ));
        Ok(())
    }
}
