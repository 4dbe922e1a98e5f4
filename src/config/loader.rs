//! Settings file loading

use super::settings::Settings;
use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "CONFCACHE_";

/// Load settings: defaults, then a settings file, then `CONFCACHE_*` variables.
///
/// An explicitly given settings file must exist and parse. An auto-discovered
/// one that fails to parse is reported and ignored.
pub fn load_settings(working_dir: &Path, settings_path: Option<&Path>) -> Result<Settings> {
    let settings_path_provided = settings_path.is_some();

    let discovered = match settings_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_settings(working_dir),
    };

    let defaults = Figment::from(Serialized::defaults(Settings::default()));

    let Some(settings_file) = discovered else {
        return extract(defaults);
    };

    if settings_path_provided && !settings_file.is_file() {
        anyhow::bail!("Settings file not found: {}", settings_file.display());
    }

    let ext =
        settings_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let with_file = match ext.as_str() {
        "toml" => defaults.clone().merge(Toml::file(&settings_file)),
        "yaml" | "yml" => defaults.clone().merge(Yaml::file(&settings_file)),
        other => {
            let err = anyhow::anyhow!(
                "Unsupported settings extension '.{}' for file {}",
                other,
                settings_file.display()
            );
            if settings_path_provided {
                return Err(err);
            }
            tracing::warn!("{}", err);
            return extract(defaults);
        }
    };

    match extract(with_file) {
        Ok(settings) => Ok(settings),
        Err(e) if settings_path_provided => {
            Err(e).with_context(|| format!("Invalid settings file: {}", settings_file.display()))
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse auto-discovered settings {}: {:#}",
                settings_file.display(),
                e
            );
            extract(defaults)
        }
    }
}

fn extract(figment: Figment) -> Result<Settings> {
    Ok(figment.merge(Env::prefixed(ENV_PREFIX)).extract::<Settings>()?)
}

fn discover_settings(working_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        "confcache.toml",
        ".confcache.toml",
        "confcache.yaml",
        ".confcache.yaml",
        "confcache.yml",
        ".confcache.yml",
    ];

    for candidate in candidates {
        let path = working_dir.join(candidate);
        if path.is_file() {
            return Some(path);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let settings = load_settings(tmp.path(), None).expect("settings");
        assert_eq!(settings.config_dir, PathBuf::from("config"));
        assert!(settings.files.is_none());
    }

    #[test]
    fn test_load_discovered_toml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("confcache.toml"),
            "config_dir = 'etc'\nttl_secs = 0\nexcluded_files = ['mail.ini']\n",
        )
        .expect("write");

        let settings = load_settings(tmp.path(), None).expect("settings");
        assert_eq!(settings.config_dir, PathBuf::from("etc"));
        assert_eq!(settings.ttl_secs, 0);
        assert_eq!(settings.excluded_files, vec!["mail.ini".to_string()]);
    }

    #[test]
    fn test_load_explicit_yaml() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("custom.yml");
        fs::write(&path, "cache_file: var/cache.json\nfiles:\n  - app.toml\n").expect("write");

        let settings = load_settings(tmp.path(), Some(&path)).expect("settings");
        assert_eq!(settings.cache_file, PathBuf::from("var/cache.json"));
        assert_eq!(settings.files, Some(vec![PathBuf::from("app.toml")]));
    }

    #[test]
    fn test_explicit_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "ttl_secs = 'soon'\n").expect("write");

        assert!(load_settings(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_missing_file_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("absent.toml");
        assert!(load_settings(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("settings.ini");
        fs::write(&path, "ttl_secs = 5\n").expect("write");
        assert!(load_settings(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("confcache.toml"), "ttl_secs = 'soon'\n").expect("write");

        let settings = load_settings(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(settings.ttl_secs, Settings::default().ttl_secs);
    }
}
