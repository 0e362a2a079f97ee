use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const APP_DIR: &str = "com.dermascan";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_SHARE_BASE_URL: &str = "https://dermascan.app/";

/// 5 MiB, the usual per-origin budget of browser local storage.
pub const DEFAULT_STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub region: String,
    pub credentials: CredentialSource,
    /// Default analysis model (inference profile ID).
    pub model_id: String,
    /// Where history, lesions and settings live. `None` uses the platform
    /// data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_quota")]
    pub storage_quota_bytes: Option<u64>,
    /// Base URL that share links are appended to. Added in v1.
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Inline {
        access_key_id: String,
        secret_access_key: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        session_token: Option<String>,
    },
    Profile {
        profile_name: String,
    },
    DefaultChain,
}

/// Redacted config, safe to log or display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub region: String,
    pub model_id: String,
    pub data_dir: Option<String>,
    pub share_base_url: String,
    pub created_at: String,
    pub credential_type: String,
    pub profile_name: Option<String>,
    pub access_key_hint: Option<String>,
}

fn default_quota() -> Option<u64> {
    Some(DEFAULT_STORAGE_QUOTA_BYTES)
}

fn default_share_base_url() -> String {
    DEFAULT_SHARE_BASE_URL.to_string()
}

impl ScreeningConfig {
    pub fn new(
        region: impl Into<String>,
        credentials: CredentialSource,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            region: region.into(),
            credentials,
            model_id: model_id.into(),
            data_dir: None,
            storage_quota_bytes: default_quota(),
            share_base_url: default_share_base_url(),
            created_at: jiff::Timestamp::now(),
        }
    }

    pub fn resolved_data_dir(&self) -> eyre::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
                Ok(base.join(APP_DIR))
            }
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join(APP_DIR))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

pub fn has_config() -> bool {
    config_path().map(|p| p.exists()).unwrap_or(false)
}

pub fn load_config() -> eyre::Result<ScreeningConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> eyre::Result<ScreeningConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so migrations run before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 → v1: add share_base_url
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("share_base_url")
            .or_insert(serde_json::Value::String(default_share_base_url()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added share_base_url)");
    }

    Ok(json)
}

pub fn save_config(config: &ScreeningConfig) -> eyre::Result<()> {
    save_config_to(&config_path()?, config)
}

/// Write atomically via a temp file; owner-only permissions on Unix.
pub fn save_config_to(path: &Path, config: &ScreeningConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn delete_config() -> eyre::Result<()> {
    let path = config_path()?;
    if path.exists() {
        std::fs::remove_file(&path)?;
        tracing::info!(path = %path.display(), "config deleted");
    }
    Ok(())
}

pub fn config_info(config: &ScreeningConfig) -> ConfigInfo {
    let (credential_type, profile_name, access_key_hint) = match &config.credentials {
        CredentialSource::Inline {
            access_key_id,
            session_token,
            ..
        } => {
            let kind = if session_token.is_some() { "temporary" } else { "inline" };
            (kind, None, Some(redact_access_key(access_key_id)))
        }
        CredentialSource::Profile { profile_name } => ("profile", Some(profile_name.clone()), None),
        CredentialSource::DefaultChain => ("default_chain", None, None),
    };

    ConfigInfo {
        region: config.region.clone(),
        model_id: config.model_id.clone(),
        data_dir: config.data_dir.as_ref().map(|d| d.display().to_string()),
        share_base_url: config.share_base_url.clone(),
        created_at: config.created_at.to_string(),
        credential_type: credential_type.to_string(),
        profile_name,
        access_key_hint,
    }
}

fn redact_access_key(key: &str) -> String {
    if key.len() <= 8 || !key.is_ascii() {
        return "****".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}
