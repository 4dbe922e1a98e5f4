//! CLI flag overrides on top of loaded settings.

use super::settings::Settings;
use std::path::PathBuf;

/// Values given on the command line; `None` keeps the loaded setting.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_dir: Option<PathBuf>,
    pub cache_file: Option<PathBuf>,
    pub ttl_secs: Option<i64>,
    pub excluded_files: Option<Vec<String>>,
    pub files: Option<Vec<PathBuf>>,
}

pub fn merge_cli_with_settings(mut settings: Settings, cli: CliOverrides) -> Settings {
    if let Some(dir) = cli.config_dir {
        settings.config_dir = dir;
    }
    if let Some(cache_file) = cli.cache_file {
        settings.cache_file = cache_file;
    }
    if let Some(ttl) = cli.ttl_secs {
        settings.ttl_secs = ttl;
    }
    if let Some(excluded) = cli.excluded_files {
        settings.excluded_files = excluded;
    }
    if let Some(files) = cli.files {
        settings.files = Some(files);
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_values_win() {
        let merged = merge_cli_with_settings(
            Settings::default(),
            CliOverrides {
                ttl_secs: Some(0),
                excluded_files: Some(vec!["mail.ini".to_string()]),
                ..CliOverrides::default()
            },
        );
        assert_eq!(merged.ttl_secs, 0);
        assert_eq!(merged.excluded_files, vec!["mail.ini".to_string()]);
        assert_eq!(merged.config_dir, Settings::default().config_dir);
    }

    #[test]
    fn test_empty_overrides_keep_settings() {
        let settings = Settings { ttl_secs: 42, ..Settings::default() };
        assert_eq!(merge_cli_with_settings(settings.clone(), CliOverrides::default()), settings);
    }
}
