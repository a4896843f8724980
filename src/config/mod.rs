use crate::core::clock::SystemClock;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_photo_root")]
    pub photo_root: String,
    /// Site offset east of UTC, in minutes. Absent → host local offset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

fn default_photo_root() -> String {
    Config::config_dir()
        .join("photos")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            photo_root: default_photo_root(),
            utc_offset_minutes: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory (~/.siteclock)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".siteclock")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("siteclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("siteclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let mut cfg: Self = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))?;

        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        cfg.photo_root = expand_tilde(&cfg.photo_root).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Clock reading the site-local wall time.
    pub fn clock(&self) -> SystemClock {
        match self.utc_offset_minutes {
            Some(m) => SystemClock::with_offset_minutes(m),
            None => SystemClock::local(),
        }
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration file, database and photo directories.
    /// In test mode the config file is left alone.
    pub fn init_all(
        custom_db: Option<String>,
        custom_photos: Option<String>,
        is_test: bool,
    ) -> AppResult<Self> {
        let dir = Self::config_dir();

        let mut config = if is_test {
            Self::default()
        } else {
            fs::create_dir_all(&dir)?;
            Self::load()?
        };

        if let Some(name) = custom_db {
            let p = std::path::Path::new(&name);
            config.database = if p.is_absolute() || is_test {
                p.to_string_lossy().to_string()
            } else {
                dir.join(p).to_string_lossy().to_string()
            };
        }

        if let Some(root) = custom_photos {
            config.photo_root = expand_tilde(&root).to_string_lossy().to_string();
        }

        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        fs::create_dir_all(&config.photo_root)?;
        Ok(config)
    }
}
