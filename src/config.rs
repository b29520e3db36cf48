use crate::error::Result;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "HTM_DASHBOARD_CONFIG";
pub const ADDR_ENV: &str = "HTM_DASHBOARD_ADDR";
pub const DATA_DIR_ENV: &str = "HTM_DASHBOARD_DATA_DIR";
pub const STATIC_DIR_ENV: &str = "HTM_DASHBOARD_STATIC_DIR";

/// Runtime configuration of the dashboard
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the web server listens on
    pub bind_addr: String,

    /// Directory holding `diffusivities.{json,csv}` and `solubilities.{json,csv}`;
    /// the bundled sample dataset is used when unset
    pub data_dir: Option<PathBuf>,

    /// Directory served under `/static`
    pub static_dir: PathBuf,

    /// Points sampled along each Arrhenius curve
    pub curve_samples: usize,

    /// Bin width of the entries-per-year histogram
    pub year_bin_width: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1:8050".to_string(),
            data_dir: None,
            static_dir: PathBuf::from("static"),
            curve_samples: 50,
            year_bin_width: 5,
        }
    }
}

impl Config {
    /// Parses a TOML document; missing keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Applies environment overrides read through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ADDR_ENV).filter(|v| !v.trim().is_empty()) {
            self.bind_addr = addr;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup(STATIC_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.static_dir = PathBuf::from(dir);
        }
        self.curve_samples = self.curve_samples.max(2);
        self.year_bin_width = self.year_bin_width.max(1);
        self
    }

    /// Loads the configuration used by the binaries
    ///
    /// # Arguments
    /// * `path` - Explicit config file (`--config`); falls back to `HTM_DASHBOARD_CONFIG`
    ///
    /// # Returns
    /// * Defaults, then the file if any, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let file = path.map(Path::to_path_buf).or(from_env);

        let config = match file {
            Some(file) => {
                debug!("Reading configuration from {}", file.display());
                Self::from_file(&file)?
            }
            None => Config::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml("bind_addr = \"0.0.0.0:9000\"\nyear_bin_width = 10\n").unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.year_bin_width, 10);
        assert_eq!(config.curve_samples, 50);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ADDR_ENV, "127.0.0.1:1"), (DATA_DIR_ENV, "/tmp/htm")]);
        let config = Config::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.bind_addr, "127.0.0.1:1");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/htm")));
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(Config::from_toml("curve_samples = \"many\"").is_err());
    }
}
