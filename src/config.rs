//! Project configuration loaded from `.passage.toml`.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::canon::Canon;
use crate::error::Error;
use crate::types::Options;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE: &str = ".passage.toml";

/// Settings that change how citations are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Extra book spellings, alias to book key.
    aliases: BTreeMap<String, String>,
    /// Canon file replacing the bundled one, already joined onto the root.
    canon: Option<PathBuf>,
    /// Whether parsing stops with an error instead of recording it.
    raise_errors: bool,
}

/// Raw TOML structure for `.passage.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct PassageTomlConfig {
    /// Extra spellings per book key.
    #[serde(default)]
    aliases: BTreeMap<String, String>,
    /// Path to a canon TOML, relative to the config file.
    #[serde(default)]
    canon: Option<PathBuf>,
    /// Error policy, raising by default.
    #[serde(default = "raise_by_default")]
    raise_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            aliases: BTreeMap::new(),
            canon: None,
            raise_errors: true,
        };
    }
}

impl Config {
    /// Extra spellings, alias to book key.
    pub const fn aliases(&self) -> &BTreeMap<String, String> {
        return &self.aliases;
    }

    /// The canon these settings describe: the configured file or the
    /// bundled one, with the configured aliases added.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Canon::load`] for a configured canon file,
    /// and `Error::UnknownAliasTarget` for an alias naming no book.
    pub fn canon(&self) -> Result<Canon, Error> {
        let mut canon = match &self.canon {
            Some(path) => Canon::load(path)?,
            None => Canon::standard().clone(),
        };
        for (alias, key) in &self.aliases {
            canon.add_alias(alias, key)?;
        }
        return Ok(canon);
    }

    /// Load config from `.passage.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist. A file that exists
    /// but doesn't parse is an error, never a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        let raw: PassageTomlConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), aliases = raw.aliases.len(), "loaded config");
        return Ok(Self {
            aliases: raw.aliases,
            canon: raw.canon.map(|p| return root.join(p)),
            raise_errors: raw.raise_errors,
        });
    }

    /// Parser options these settings select.
    pub const fn options(&self) -> Options {
        return Options {
            raise_errors: self.raise_errors,
        };
    }

    /// Override the error policy, as the `--lenient` flag does.
    #[must_use]
    pub const fn with_raise_errors(mut self, raise_errors: bool) -> Self {
        self.raise_errors = raise_errors;
        return self;
    }
}

/// Serde default for `raise_errors`.
const fn raise_by_default() -> bool {
    return true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::BookData;
    use crate::resolver::BookNames;
    use crate::types::BookId;

    fn write_config(dir: &Path, content: &str) {
        std::fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.options().raise_errors);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "raise_errors = [");
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "raise_error = false\n");
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }

    #[test]
    fn reads_policy_and_aliases() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "raise_errors = false\n\n[aliases]\nApoc = \"revelation\"\n");
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.options().raise_errors);

        let canon = config.canon().unwrap();
        assert_eq!(canon.resolve("Apoc", true), Ok(Some(BookId::from("revelation"))));
    }

    #[test]
    fn alias_for_unknown_book_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[aliases]\nEnoch = \"enoch\"\n");
        let err = Config::load(dir.path()).unwrap().canon().unwrap_err();
        assert_eq!(err.to_string(), "alias `Enoch` points at unknown book `enoch`");
    }

    #[test]
    fn canon_path_is_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tiny.toml"),
            "[[book]]\nkey = \"tobit\"\nname = \"Tobit\"\nverses = [22, 14]\n",
        )
        .unwrap();
        write_config(dir.path(), "canon = \"tiny.toml\"\n");

        let canon = Config::load(dir.path()).unwrap().canon().unwrap();
        assert_eq!(canon.books().count(), 1);
        assert_eq!(canon.verse_count(&BookId::from("tobit"), 2), Some(14));
    }

    #[test]
    fn missing_canon_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "canon = \"nowhere.toml\"\n");
        let err = Config::load(dir.path()).unwrap().canon().unwrap_err();
        assert!(matches!(err, Error::CanonNotFound { .. }));
    }
}
