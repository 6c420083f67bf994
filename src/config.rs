//! Matching configuration: the category table, variant rules, fallback
//! substitutions, and resource-pool exclusion rules.
//!
//! Configuration is stored in TOML format. Every section is optional and
//! falls back to the built-in table that matches the curated catalog this
//! tool was written for:
//!
//! ```toml
//! [categories]
//! "Board Books" = ["Board Book"]
//! "SH Videos" = ["SH.ANIM", "SH.LIVE"]
//!
//! [variants]
//! two_d_token = "MGCB.2D.ANIM"
//! three_d_token = "MGCB.3D.ANIM"
//!
//! [matching]
//! substitutions = [[",", ""], [" Group", ".Group"]]
//! ignored_extensions = ["mov"]
//!
//! [pool]
//! include_hidden_files = false
//! exclude_patterns = ["*.part"]
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading, validation, and lookup.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern in the pool exclusion rules.
    InvalidGlobPattern(String),
    /// Invalid regex pattern in the pool exclusion rules.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// A category appears in the catalog header but has no prefix tokens
    /// configured. This is a hard configuration error, not a per-row failure.
    UnknownCategory(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::UnknownCategory(category) => {
                write!(f, "No prefix tokens configured for category '{}'", category)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level matching configuration, deserialized from TOML.
///
/// The default value embeds the hand-maintained category table and fix-up
/// rules for the production catalog, so the tool runs without any
/// configuration file present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Category name -> ordered list of filename-prefix tokens.
    #[serde(default = "default_categories")]
    pub categories: HashMap<String, Vec<String>>,

    /// Variant-marker rules (animated/live and 2D/3D overrides).
    #[serde(default)]
    pub variants: VariantRules,

    /// Fallback substitutions and ignored extensions used during resolution.
    #[serde(default)]
    pub matching: MatchingRules,

    /// Exclusion rules applied when snapshotting the resource directory.
    #[serde(default)]
    pub pool: PoolRules,
}

/// Variant markers a curator may append to a title, and the prefix tokens
/// the dimensional markers map to.
///
/// The `animated_tag`/`live_tag` substrings identify which production line a
/// prefix token belongs to, so that a title marked animated is never tested
/// against a live-variant token and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRules {
    #[serde(default = "default_animated_marker")]
    pub animated_marker: String,
    #[serde(default = "default_live_marker")]
    pub live_marker: String,
    #[serde(default = "default_two_d_marker")]
    pub two_d_marker: String,
    #[serde(default = "default_three_d_marker")]
    pub three_d_marker: String,
    /// Token substring identifying an animated-line prefix token.
    #[serde(default = "default_animated_tag")]
    pub animated_tag: String,
    /// Token substring identifying a live-line prefix token.
    #[serde(default = "default_live_tag")]
    pub live_tag: String,
    /// The single token used when a title carries the 2D marker.
    #[serde(default = "default_two_d_token")]
    pub two_d_token: String,
    /// The single token used when a title carries the 3D marker.
    #[serde(default = "default_three_d_token")]
    pub three_d_token: String,
}

impl VariantRules {
    /// All markers that are stripped from a title during normalization.
    pub fn markers(&self) -> [&str; 4] {
        [
            &self.animated_marker,
            &self.live_marker,
            &self.two_d_marker,
            &self.three_d_marker,
        ]
    }
}

impl Default for VariantRules {
    fn default() -> Self {
        Self {
            animated_marker: default_animated_marker(),
            live_marker: default_live_marker(),
            two_d_marker: default_two_d_marker(),
            three_d_marker: default_three_d_marker(),
            animated_tag: default_animated_tag(),
            live_tag: default_live_tag(),
            two_d_token: default_two_d_token(),
            three_d_token: default_three_d_token(),
        }
    }
}

/// Rules bridging punctuation differences between catalog titles and
/// on-disk filenames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingRules {
    /// Ordered (pattern, replacement) pairs. Each pair is applied to a
    /// candidate prefix independently, never cumulatively.
    #[serde(default = "default_substitutions")]
    pub substitutions: Vec<(String, String)>,

    /// Extensions treated as noise during disambiguation. A file with one of
    /// these extensions never wins a match; an authoritative sibling in
    /// another container format is assumed to exist.
    #[serde(default = "default_ignored_extensions")]
    pub ignored_extensions: Vec<String>,
}

impl Default for MatchingRules {
    fn default() -> Self {
        Self {
            substitutions: default_substitutions(),
            ignored_extensions: default_ignored_extensions(),
        }
    }
}

/// Exclusion rules for the resource-directory snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolRules {
    /// Whether filenames starting with "." enter the pool. Defaults to false.
    #[serde(default)]
    pub include_hidden_files: bool,

    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub exclude_filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.part").
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Regex patterns to exclude (for advanced users).
    #[serde(default)]
    pub exclude_regex: Vec<String>,
}

fn default_categories() -> HashMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 7] = [
        ("SH Videos", &["SH.ANIM", "SH.LIVE"]),
        ("Mini Books", &["Mini Book"]),
        ("Activity Books", &["Website.Activity Book"]),
        ("Board Books", &["Board Book"]),
        ("MGCL/MGC Anim Videos", &["MGC.ANIM", "MGC.LIVE", "MGC.LIVE.EPISODE"]),
        ("PHL Videos", &["PH.ANIM", "PH.LIVE"]),
        (
            "MGC ABC/Counting Videos",
            &["MGC.ANIM", "MGCB.2D.ANIM", "MGCB.3D.ANIM", "MGC.LIVE"],
        ),
    ];

    table
        .iter()
        .map(|(name, tokens)| {
            (
                name.to_string(),
                tokens.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

fn default_animated_marker() -> String {
    "(Anim)".to_string()
}

fn default_live_marker() -> String {
    "(Live)".to_string()
}

fn default_two_d_marker() -> String {
    "(2D Anim)".to_string()
}

fn default_three_d_marker() -> String {
    "(3D Anim)".to_string()
}

fn default_animated_tag() -> String {
    "ANIM".to_string()
}

fn default_live_tag() -> String {
    "LIVE".to_string()
}

fn default_two_d_token() -> String {
    "MGCB.2D.ANIM".to_string()
}

fn default_three_d_token() -> String {
    "MGCB.3D.ANIM".to_string()
}

fn default_substitutions() -> Vec<(String, String)> {
    [
        (",", ""),
        (" Group", ".Group"),
        (" Noa", ".Noa"),
        (" Robert", ".Robert"),
        (" Caralyn", ".Caralyn"),
    ]
    .iter()
    .map(|(pattern, replacement)| (pattern.to_string(), replacement.to_string()))
    .collect()
}

fn default_ignored_extensions() -> Vec<String> {
    vec!["mov".to_string()]
}

impl MatchConfig {
    /// Load configuration from a file, with fallback to the built-in table.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.shelfmatchrc.toml` in the current directory
    /// 3. Look for `~/.config/shelfmatch/config.toml` in home directory
    /// 4. Fall back to the built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".shelfmatchrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("shelfmatch")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the configuration into the immutable form consumed by the
    /// classifier and resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile(self) -> Result<CompiledConfig, ConfigError> {
        CompiledConfig::new(self)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            variants: VariantRules::default(),
            matching: MatchingRules::default(),
            pool: PoolRules::default(),
        }
    }
}

/// Compiled, validated configuration.
///
/// Glob and regex patterns are compiled once here so that pool filtering is
/// a plain membership test per filename. Immutable for the life of a
/// reconciliation pass.
pub struct CompiledConfig {
    categories: HashMap<String, Vec<String>>,
    variants: VariantRules,
    substitutions: Vec<(String, String)>,
    ignored_extensions: HashSet<String>,
    include_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledConfig {
    fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        let exclude_patterns = config
            .pool
            .exclude_patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = config
            .pool
            .exclude_regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            categories: config.categories,
            variants: config.variants,
            substitutions: config.matching.substitutions,
            ignored_extensions: config
                .matching
                .ignored_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            include_hidden_files: config.pool.include_hidden_files,
            exclude_filenames: config.pool.exclude_filenames.into_iter().collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// The ordered prefix-token list for a category.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCategory` if the category has no
    /// configured tokens.
    pub fn prefix_tokens(&self, category: &str) -> Result<&[String], ConfigError> {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::UnknownCategory(category.to_string()))
    }

    /// Whether the category has configured prefix tokens.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn variants(&self) -> &VariantRules {
        &self.variants
    }

    pub fn substitutions(&self) -> &[(String, String)] {
        &self.substitutions
    }

    /// Whether the filename carries an extension treated as noise during
    /// disambiguation (case-insensitive).
    pub fn is_ignored_extension(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.ignored_extensions.contains(&ext.to_lowercase()))
    }

    /// Whether a filename is admitted into the resource pool.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Hidden-file filter
    /// 2. Exact filename match
    /// 3. Glob pattern match
    /// 4. Regex pattern match
    /// 5. Default: admit
    pub fn admits_pool_file(&self, filename: &str) -> bool {
        if !self.include_hidden_files && filename.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(filename) {
            return false;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(filename))
        {
            return false;
        }

        if self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(filename))
        {
            return false;
        }

        true
    }
}
