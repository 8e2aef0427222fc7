//! Configuration loading from files.
//!
//! The YAML file is layered under environment overrides, so any setting can
//! be adjusted for a single run without editing `folio.yaml`.

use std::path::{Path, PathBuf};

use ::config::{Environment, File, FileFormat};

use super::{Config, ConfigError, DEFAULT_CONFIG_FILE, ENV_PREFIX};

impl Config {
    /// Resolve the config file path from the command line argument, defaulting to `folio.yaml`.
    pub fn path_from_arg(config_file: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        if config_file.is_relative() {
            Ok(std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file))
        } else {
            Ok(config_file.to_path_buf())
        }
    }

    /// Load the config from a file path.
    ///
    /// A missing file is not an error: every setting has a default.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        let config: Config = ::config::Config::builder()
            .add_source(File::new(path_str, FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.reading_time.chars_per_minute == 0 {
            return Err(ConfigError::Validation(
                "invalid config: 'reading_time.chars_per_minute' must be greater than zero"
                    .to_string(),
            ));
        }
        if let Some(level) = self.markdown.anchor.levels.iter().find(|l| !(1..=6).contains(*l)) {
            return Err(ConfigError::Validation(format!(
                "invalid config: anchor level {level} is not a heading level (1-6)"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("folio.yaml")).unwrap();

        assert_eq!(config.site.input, PathBuf::from("src"));
        assert_eq!(config.site.output, PathBuf::from("_site"));
        assert_eq!(
            config.passthrough,
            vec![PathBuf::from("assets"), PathBuf::from("manifest.json")]
        );
        assert_eq!(config.reading_time.chars_per_minute, 450);
        assert_eq!(config.tags.reserved, vec!["posts", "all"]);
        assert_eq!(config.dev.not_found_page, PathBuf::from("404.html"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.yaml");
        std::fs::write(
            &path,
            "site:\n  name: Notes\n  output: public\nimages:\n  class: rounded\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.site.name, "Notes");
        assert_eq!(config.site.output, PathBuf::from("public"));
        assert_eq!(config.site.input, PathBuf::from("src"));
        assert_eq!(config.images.class, "rounded");
        assert_eq!(config.images.base_url, "/assets/img/posts/");
        assert_eq!(config.markdown.anchor.levels, vec![1, 2]);
    }

    #[test]
    fn test_zero_reading_speed_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.yaml");
        std::fs::write(&path, "reading_time:\n  chars_per_minute: 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("chars_per_minute"));
    }

    #[test]
    fn test_invalid_anchor_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.yaml");
        std::fs::write(&path, "markdown:\n  anchor:\n    levels: [1, 7]\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.yaml");
        std::fs::write(&path, "dev:\n  port: 9000\n").unwrap();

        // SAFETY: no other test reads or writes this variable
        unsafe { std::env::set_var("FOLIO_DEV__PORT", "8081") };
        let config = Config::load(&path);
        unsafe { std::env::remove_var("FOLIO_DEV__PORT") };

        assert_eq!(config.unwrap().dev.port, 8081);
    }

    #[test]
    fn test_path_from_arg_keeps_absolute_paths() {
        let path = Config::path_from_arg(Some(Path::new("/srv/blog/folio.yaml"))).unwrap();
        assert_eq!(path, PathBuf::from("/srv/blog/folio.yaml"));
    }
}
