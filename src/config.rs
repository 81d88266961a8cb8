use std::path::Path;

use crate::error::Error;

/// Project configuration loaded from `.apilink.toml`.
/// Include/exclude patterns are path prefixes applied to markdown page paths.
pub struct Config {
    api_dir: String,
    include: Vec<String>,
    exclude: Vec<String>,
    out_dir: String,
}

/// Raw TOML structure for `.apilink.toml`.
#[derive(serde::Deserialize)]
struct ApilinkTomlConfig {
    #[serde(default = "default_api_dir")]
    api_dir: String,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default = "default_out_dir")]
    out_dir: String,
}

/// Default directory holding generated reference pages.
fn default_api_dir() -> String {
    "api".to_string()
}

/// Default directory rendered pages are written to.
fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Directory (site-relative) holding generated reference pages.
    pub fn api_dir(&self) -> &str {
        &self.api_dir
    }

    /// Load config from `.apilink.toml` in the given root directory.
    /// Returns a default that renders everything if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; it never
    /// silently falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".apilink.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::render_everything_by_default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: ApilinkTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            api_dir: raw.api_dir,
            include: raw.include,
            exclude: raw.exclude,
            out_dir: raw.out_dir,
        })
    }

    /// Directory (site-relative) rendered pages are written to.
    pub fn out_dir(&self) -> &str {
        &self.out_dir
    }

    /// Default config that renders everything under the standard layout.
    fn render_everything_by_default() -> Self {
        Self {
            api_dir: default_api_dir(),
            include: Vec::new(),
            exclude: Vec::new(),
            out_dir: default_out_dir(),
        }
    }

    /// Check whether a markdown page path should be rendered.
    ///
    /// A path is included if no include patterns are set (render everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        !self.exclude.iter().any(|p| relative_path.starts_with(p.as_str()))
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.api_dir(), "api");
        assert_eq!(config.out_dir(), "dist");
        assert!(config.should_scan("guide/setup.md"));
    }

    #[test]
    fn malformed_config_is_an_error_not_a_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".apilink.toml"), "include = 5\n").unwrap();

        let result = Config::load(dir.path());

        assert!(matches!(result, Err(Error::TomlDe(_))));
    }
}
