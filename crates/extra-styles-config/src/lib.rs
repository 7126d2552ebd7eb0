use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

mod provider;

pub use provider::SettingsProvider;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No style at index {index} (have {len})")]
    StyleIndexOutOfRange { index: usize, len: usize },
}

/// Tag used when a rule does not name one.
pub const DEFAULT_TAG: &str = "span";

/// One user-defined inline style.
///
/// `open` and `close` are literal delimiter strings, never patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleRule {
    pub name: String,
    pub open: String,
    pub close: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    pub css: String,
}

impl Default for StyleRule {
    fn default() -> Self {
        Self {
            name: "Unnamed Style".to_string(),
            open: "<".to_string(),
            close: ">".to_string(),
            tag_name: None,
            css: String::new(),
        }
    }
}

impl StyleRule {
    pub fn new(name: impl Into<String>, open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: open.into(),
            close: close.into(),
            tag_name: None,
            css: String::new(),
        }
    }

    pub fn with_tag(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = Some(tag_name.into());
        self
    }

    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    /// The element tag to render with, `span` when unset or blank.
    pub fn tag(&self) -> &str {
        match self.tag_name.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => tag,
            _ => DEFAULT_TAG,
        }
    }
}

/// Content hash of a full configuration.
///
/// Used to detect settings changes between render passes and as part of
/// widget identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The ordered list of style rules. Order is precedence: earlier rules win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub style_list: Vec<StyleRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            style_list: vec![
                StyleRule::new("Underline", "_", "_").with_css("text-decoration: underline"),
                StyleRule::new("Superscript", "^", "^").with_tag("sup"),
                StyleRule::new("Subscript", "\\", "/").with_tag("sub"),
                StyleRule::new("Hidden", "!", "!").with_css(
                    "background-color: var(--text-normal); color: var(--text-normal);",
                ),
            ],
        }
    }
}

impl Settings {
    pub fn new(style_list: Vec<StyleRule>) -> Self {
        Self { style_list }
    }

    /// Look up a rule by name. The first rule wins if names repeat.
    pub fn get_style(&self, name: &str) -> Option<&StyleRule> {
        self.style_list.iter().find(|style| style.name == name)
    }

    /// Names that appear more than once, in first-seen order.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for style in &self.style_list {
            let name = style.name.as_str();
            if seen.contains(&name) {
                if !duplicates.contains(&name) {
                    duplicates.push(name);
                }
            } else {
                seen.push(name);
            }
        }
        duplicates
    }

    /// SHA-256 of the serialized configuration, as lowercase hex.
    pub fn fingerprint(&self) -> Fingerprint {
        let serialized = toml::to_string(self).unwrap_or_else(|_| format!("{self:?}"));
        let digest = Sha256::digest(serialized.as_bytes());
        Fingerprint(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Append a placeholder style and return its index.
    pub fn add_style(&mut self) -> usize {
        let mut rule = StyleRule::default();
        rule.name = self.unique_name(&rule.name);
        self.style_list.push(rule);
        self.style_list.len() - 1
    }

    /// Insert a copy of the style at `index` right after it.
    ///
    /// The copy gets a fresh name so lookups by name stay unambiguous.
    pub fn duplicate_style(&mut self, index: usize) -> Result<usize, ConfigError> {
        let mut copy = self.style(index)?.clone();
        copy.name = self.unique_name(&format!("{} (copy)", copy.name));
        self.style_list.insert(index + 1, copy);
        Ok(index + 1)
    }

    pub fn remove_style(&mut self, index: usize) -> Result<StyleRule, ConfigError> {
        self.style(index)?;
        Ok(self.style_list.remove(index))
    }

    /// Replace the CSS of a style, normalizing declarations first.
    pub fn set_css(&mut self, index: usize, css: &str) -> Result<(), ConfigError> {
        self.style_mut(index)?.css = normalize_css(css);
        Ok(())
    }

    pub fn style(&self, index: usize) -> Result<&StyleRule, ConfigError> {
        let len = self.style_list.len();
        self.style_list
            .get(index)
            .ok_or(ConfigError::StyleIndexOutOfRange { index, len })
    }

    pub fn style_mut(&mut self, index: usize) -> Result<&mut StyleRule, ConfigError> {
        let len = self.style_list.len();
        self.style_list
            .get_mut(index)
            .ok_or(ConfigError::StyleIndexOutOfRange { index, len })
    }

    fn unique_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut n = 2;
        while self.get_style(&name).is_some() {
            name = format!("{base} {n}");
            n += 1;
        }
        name
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let settings: Settings =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        for name in settings.duplicate_names() {
            log::warn!(
                "Style name {name:?} is defined more than once in {}; the first definition wins",
                config_path.display()
            );
        }

        Ok(Some(settings))
    }

    /// Load from `config_path`, falling back to the built-in styles when the
    /// file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path(config_path)?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/extra-styles");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expand `~` and environment variables in a user-supplied path.
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

static CSS_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<prop>[\w-]+)\s*:\s*(?P<value>[^;\n]*)[;\n]*").expect("Invalid CSS declaration regex")
});

/// Rewrite free-form CSS into one `prop: value;` declaration per line.
pub fn normalize_css(css: &str) -> String {
    CSS_DECLARATION
        .replace_all(css, "${prop}: ${value};\n")
        .into_owned()
}
