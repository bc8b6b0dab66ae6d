use std::path::PathBuf;
use std::{env, fs, io};

use anyhow::{bail, Context, Result};
use log::info;
use serde::de::DeserializeOwned;

use crate::dirs::ensure_dir_exists;

/// Directories the application reads its configuration from and keeps its
/// persistent state in.
pub struct PathSet {
    pub config_path: PathBuf,
    pub data_path: PathBuf,
}

impl PathSet {
    pub const CONFIG_ENV: &'static str = "SINGALONG_CONFIG";
    pub const DATA_ENV: &'static str = "SINGALONG_DATA";

    pub fn new(config_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(path) = config_path {
            path
        } else if let Ok(path) = env::var(Self::CONFIG_ENV) {
            PathBuf::from(path)
        } else {
            Self::home_dir()?.join(".config").join("singalong")
        };

        let data_path = if let Some(path) = data_path {
            path
        } else if let Ok(path) = env::var(Self::DATA_ENV) {
            PathBuf::from(path)
        } else {
            Self::home_dir()?
                .join(".local")
                .join("share")
                .join("singalong")
        };

        ensure_dir_exists(&config_path)
            .with_context(|| format!("ensure config directory: {}", config_path.display()))?;
        ensure_dir_exists(&data_path)
            .with_context(|| format!("ensure data directory: {}", data_path.display()))?;

        Ok(Self {
            config_path,
            data_path,
        })
    }

    /// Directory backing the persistent key-value storage.
    pub fn storage_path(&self) -> PathBuf {
        self.data_path.join("storage")
    }

    pub fn load_config<T, F>(&self, name: &str, default_func: F) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.config_path.join(format!("{name}.toml"));
        let mut cfg: T = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)
                .with_context(|| format!("parse config toml: {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("Config file for {name} not found, using defaults");
                default_func()
            }
            Err(err) => {
                return Err(err).context(format!("read config file: {}", path.display()));
            }
        };

        cfg.complete(self)
            .with_context(|| format!("validate {name} config"))?;
        Ok(cfg)
    }

    fn home_dir() -> Result<PathBuf> {
        let dir = env::var_os("HOME") // Unix/Linux/macOS
            .or_else(|| env::var_os("USERPROFILE")) // Windows
            .map(PathBuf::from);
        match dir {
            Some(dir) => Ok(dir),
            None => {
                bail!("could not determine home directory, please specify config path manually")
            }
        }
    }
}

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self, ps: &PathSet) -> Result<()>;
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct DemoConfig {
        #[serde(default)]
        name: String,
    }

    impl CommonConfig for DemoConfig {
        fn default() -> Self {
            Self {
                name: String::from("fallback"),
            }
        }

        fn complete(&mut self, _ps: &PathSet) -> Result<()> {
            if self.name.is_empty() {
                bail!("name cannot be empty");
            }
            Ok(())
        }
    }

    fn build_path_set(dir: &str) -> PathSet {
        let _ = fs::remove_dir_all(dir);
        let base = PathBuf::from(dir);
        PathSet::new(Some(base.join("config")), Some(base.join("data"))).unwrap()
    }

    #[test]
    fn test_load_missing_config_uses_default() {
        let dir = "_test_singalong_config_missing";
        let ps = build_path_set(dir);

        let cfg: DemoConfig = ps.load_config("demo", DemoConfig::default).unwrap();
        assert_eq!(cfg.name, "fallback");
        assert_eq!(ps.storage_path(), PathBuf::from(dir).join("data").join("storage"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_config_file() {
        let dir = "_test_singalong_config_file";
        let ps = build_path_set(dir);

        fs::write(ps.config_path.join("demo.toml"), "name = \"from-file\"\n").unwrap();
        let cfg: DemoConfig = ps.load_config("demo", DemoConfig::default).unwrap();
        assert_eq!(cfg.name, "from-file");

        fs::write(ps.config_path.join("demo.toml"), "name = \"\"\n").unwrap();
        let result: Result<DemoConfig> = ps.load_config("demo", DemoConfig::default);
        assert!(result.is_err());

        fs::remove_dir_all(dir).unwrap();
    }
}
