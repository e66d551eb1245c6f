use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};
use strum::EnumString;

use crate::config::themes::ThemeRegistry;
use crate::query::{SortKey, View};

pub mod themes;

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "IdeasTui";
const APP_NAME: &str = "ideatui";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        self.paths.ensure_directories()?;
        if !self.paths.config_file.exists() {
            let default_cfg = AppConfig::default();
            self.write_default_config(&default_cfg)?;
            return Ok(default_cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        let override_config = env::var("IDEATUI_CONFIG").ok().map(PathBuf::from);

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;

        let config_dir = override_config
            .clone()
            .map(|p| {
                if p.is_dir() {
                    p
                } else {
                    p.parent().map(Path::to_path_buf).unwrap_or(p)
                }
            })
            .unwrap_or_else(|| project_dirs.config_dir().to_path_buf());

        let config_file = override_config
            .filter(|p| p.is_file() || p.extension().is_some())
            .unwrap_or_else(|| config_dir.join("config.toml"));

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir).with_context(|| {
            format!(
                "creating application directory {}",
                self.config_dir.display()
            )
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(deserialize_with = "lenient_theme")]
    pub theme: ThemeName,
    pub preview_lines: u16,
    #[serde(deserialize_with = "lenient_view")]
    pub default_view: View,
    #[serde(deserialize_with = "lenient_sort_key")]
    pub default_sort: SortKey,
    pub confirm_delete: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeName::Dark,
            preview_lines: 3,
            default_view: View::Active,
            default_sort: SortKey::Newest,
            confirm_delete: true,
        }
    }
}

// Config values typed as enums would make any typo abort startup with a
// toml parse error. These deserializers take the raw string, warn, and
// fall back to the default instead.
fn lenient_sort_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SortKey, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if raw.parse::<SortKey>().is_err() {
        tracing::warn!(sort = %raw, "unknown sort key in config, falling back to newest");
    }
    Ok(SortKey::parse_lenient(&raw))
}

fn lenient_view<'de, D: Deserializer<'de>>(deserializer: D) -> Result<View, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|_| {
        tracing::warn!(view = %raw, "unknown view in config, falling back to active");
        View::default()
    }))
}

fn lenient_theme<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ThemeName, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let registry = ThemeRegistry::default();
    match raw.parse::<ThemeName>().ok().filter(|t| registry.contains(t)) {
        Some(theme) => Ok(theme),
        None => {
            let known: Vec<_> = registry.all().collect();
            tracing::warn!(theme = %raw, ?known, "unknown theme in config, falling back to dark");
            Ok(ThemeName::Dark)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, EnumString, PartialEq, Eq, std::hash::Hash)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ThemeName {
    Dark,
    Light,
    HighContrast,
}

impl Default for ThemeName {
    fn default() -> Self {
        ThemeName::Dark
    }
}
