use crate::domain::{
    BackendConfig, RootConfig, merge_root_config, normalize_base_url, validate_backend_name,
};
use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const API_URL_ENV: &str = "KYC_DESK_API_URL";

const SETTINGS_FILE: &str = "config.toml";
const PROFILES_DIR: &str = "backends";

/// Which config root a file lives under. Local files take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Local,
    Global,
}

impl ConfigScope {
    pub fn from_global_flag(global: bool) -> Self {
        if global {
            ConfigScope::Global
        } else {
            ConfigScope::Local
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfigScope::Local => "local",
            ConfigScope::Global => "global",
        }
    }
}

/// A named backend profile and the scope it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub scope: ConfigScope,
    pub config: BackendConfig,
}

/// Backend connection settings after profile lookup and URL overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBackend {
    /// `None` when no profile is configured and built-in defaults are used.
    pub name: Option<String>,
    pub config: BackendConfig,
}

/// Settings and backend profiles under `.kyc-desk/` and `~/.config/kyc-desk/`.
///
/// Each root holds `config.toml` (active backend, `[workflow]` timing) and
/// `backends/<name>.toml`.
pub struct ConfigStore {
    local_root: PathBuf,
    global_root: Option<PathBuf>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        let global_root = std::env::var_os("HOME")
            .map(|home| Path::new(&home).join(".config").join("kyc-desk"));
        Self::with_roots(".kyc-desk", global_root)
    }

    pub fn with_roots(local_root: impl Into<PathBuf>, global_root: Option<PathBuf>) -> Self {
        Self {
            local_root: local_root.into(),
            global_root,
        }
    }

    /// Global settings with the local file layered on top.
    pub fn settings(&self) -> Result<RootConfig> {
        let global = match self.global_root {
            Some(_) => self.scope_settings(ConfigScope::Global)?,
            None => RootConfig::default(),
        };
        let local = self.scope_settings(ConfigScope::Local)?;
        Ok(merge_root_config(global, local))
    }

    pub fn scope_settings(&self, scope: ConfigScope) -> Result<RootConfig> {
        read_toml(&self.root(scope)?.join(SETTINGS_FILE))
    }

    pub fn save_settings(&self, scope: ConfigScope, settings: &RootConfig) -> Result<()> {
        write_toml(&self.root(scope)?.join(SETTINGS_FILE), settings)
    }

    /// Looks a profile up in `scope`, or local then global when no scope is given.
    pub fn profile(&self, name: &str, scope: Option<ConfigScope>) -> Result<Option<Profile>> {
        validate_backend_name(name)?;
        let scopes = match scope {
            Some(scope) => vec![scope],
            None => self.scopes(),
        };

        for scope in scopes {
            let path = self.profile_path(scope, name)?;
            if path.exists() {
                return Ok(Some(Profile {
                    name: name.to_string(),
                    scope,
                    config: read_toml(&path)?,
                }));
            }
        }
        Ok(None)
    }

    pub fn save_profile(
        &self,
        scope: ConfigScope,
        name: &str,
        config: &BackendConfig,
    ) -> Result<()> {
        validate_backend_name(name)?;
        let config = BackendConfig {
            url: normalize_base_url(&config.url),
            ..config.clone()
        };
        write_toml(&self.profile_path(scope, name)?, &config)
    }

    pub fn remove_profile(&self, scope: ConfigScope, name: &str) -> Result<()> {
        validate_backend_name(name)?;
        let path = self.profile_path(scope, name)?;
        if !path.exists() {
            bail!("backend '{}' does not exist in {} config", name, scope.label());
        }
        fs::remove_file(&path).with_context(|| format!("failed to remove {}", path.display()))
    }

    /// Every visible profile by name; a local profile hides a global one.
    pub fn profiles(&self) -> Result<Vec<Profile>> {
        let mut by_name = BTreeMap::new();

        for scope in self.scopes().into_iter().rev() {
            let dir = self.root(scope)?.join(PROFILES_DIR);
            if !dir.is_dir() {
                continue;
            }
            let entries =
                fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))?;
            for entry in entries {
                let path = entry?.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                    continue;
                }
                let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };
                if validate_backend_name(name).is_err() {
                    continue;
                }
                let profile = Profile {
                    name: name.to_string(),
                    scope,
                    config: read_toml(&path)?,
                };
                by_name.insert(profile.name.clone(), profile);
            }
        }

        Ok(by_name.into_values().collect())
    }

    /// Picks the backend profile to talk to, then applies URL overrides.
    ///
    /// Precedence for the URL: `url_override`, then `env_url`, then the profile,
    /// then the built-in default.
    pub fn resolve_backend(
        &self,
        requested: Option<String>,
        url_override: Option<String>,
        env_url: Option<String>,
    ) -> Result<ResolvedBackend> {
        let name = match requested {
            Some(name) => Some(name),
            None => self.settings()?.current_backend,
        };

        let mut resolved = match name {
            Some(name) => {
                let Some(profile) = self.profile(&name, None)? else {
                    bail!("backend '{}' does not exist", name);
                };
                ResolvedBackend {
                    name: Some(profile.name),
                    config: profile.config,
                }
            }
            None => ResolvedBackend {
                name: None,
                config: BackendConfig::default(),
            },
        };

        let url = [url_override, env_url]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty());
        if let Some(url) = url {
            resolved.config.url = normalize_base_url(&url);
        }

        Ok(resolved)
    }

    fn root(&self, scope: ConfigScope) -> Result<&Path> {
        match scope {
            ConfigScope::Local => Ok(&self.local_root),
            ConfigScope::Global => self
                .global_root
                .as_deref()
                .ok_or_else(|| anyhow!("HOME is not set; cannot use global config")),
        }
    }

    /// Scopes with a usable root, highest precedence first.
    fn scopes(&self) -> Vec<ConfigScope> {
        [ConfigScope::Local, ConfigScope::Global]
            .into_iter()
            .filter(|scope| self.root(*scope).is_ok())
            .collect()
    }

    fn profile_path(&self, scope: ConfigScope, name: &str) -> Result<PathBuf> {
        Ok(self
            .root(scope)?
            .join(PROFILES_DIR)
            .join(format!("{name}.toml")))
    }
}

/// Reads a TOML file, or the type's default when the file is missing.
fn read_toml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
