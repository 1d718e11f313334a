//! Reference datasets: creature types, keyword abilities and theme patterns.
//!
//! Each dataset is loaded at most once per [`ReferenceCache`] and read-only
//! afterwards. Loading is race-free: every dataset sits behind a
//! [`OnceLock`], so concurrent first access initializes it exactly once.
//! A dataset that cannot be read or parsed is replaced by a small built-in
//! default; the failure is logged and never reaches callers.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, info, warn};

use super::error::ReferenceError;
use super::themes::{ThemePattern, ThemePatterns};

pub const CREATURE_TYPES_FILE: &str = "creature-types.txt";
pub const KEYWORD_ABILITIES_FILE: &str = "keyword-abilities.txt";
pub const THEME_PATTERNS_FILE: &str = "themepatterns.json";

const EMBEDDED_CREATURE_TYPES: &str = include_str!("../../../res/creature-types.txt");
const EMBEDDED_KEYWORD_ABILITIES: &str = include_str!("../../../res/keyword-abilities.txt");
const EMBEDDED_THEME_PATTERNS: &str = include_str!("../../../res/themepatterns.json");

const DEFAULT_CREATURE_TYPES: &[&str] = &[
    "Human", "Elf", "Goblin", "Zombie", "Vampire", "Soldier", "Wizard", "Knight", "Dragon",
    "Angel", "Demon", "Spirit", "Merfolk", "Beast",
];

const DEFAULT_KEYWORD_ABILITIES: &[&str] = &[
    "deathtouch", "defender", "double strike", "enchant", "equip", "first strike", "flash",
    "flying", "haste", "hexproof", "indestructible", "intimidate", "lifelink", "menace",
    "protection", "reach", "trample", "vigilance", "ward", "cycling", "flashback", "kicker",
    "madness", "morph", "storm", "convoke", "delve", "suspend", "cascade", "miracle", "overload",
    "prowess",
];

static GLOBAL: OnceLock<ReferenceCache> = OnceLock::new();

/// Where the reference files are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReferenceSource {
    /// The copies compiled into the binary.
    #[default]
    Embedded,
    /// A directory holding the three files.
    Directory(PathBuf),
}

impl ReferenceSource {
    /// Source for an optional configured directory.
    pub fn from_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::Directory(dir.to_path_buf()),
            None => Self::Embedded,
        }
    }

    /// Raw content of `file`.
    fn read(&self, file: &str) -> Result<String, ReferenceError> {
        match self {
            Self::Embedded => match file {
                CREATURE_TYPES_FILE => Ok(EMBEDDED_CREATURE_TYPES.to_string()),
                KEYWORD_ABILITIES_FILE => Ok(EMBEDDED_KEYWORD_ABILITIES.to_string()),
                THEME_PATTERNS_FILE => Ok(EMBEDDED_THEME_PATTERNS.to_string()),
                _ => Err(ReferenceError::Io {
                    file: file.to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "not a bundled resource",
                    ),
                }),
            },
            Self::Directory(dir) => {
                std::fs::read_to_string(dir.join(file)).map_err(|source| ReferenceError::Io {
                    file: file.to_string(),
                    source,
                })
            }
        }
    }
}

/// Parse a newline-separated name list, ignoring blank lines.
pub fn parse_name_list(file: &str, content: &str) -> Result<Vec<String>, ReferenceError> {
    let names: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(ReferenceError::Empty(file.to_string()));
    }
    Ok(names)
}

/// Parse the theme-pattern mapping, keeping the order of the file.
pub fn parse_theme_patterns(file: &str, content: &str) -> Result<ThemePatterns, ReferenceError> {
    let parse_error = |message: String| ReferenceError::Parse {
        file: file.to_string(),
        message,
    };

    let raw: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;

    let mut definitions = Vec::with_capacity(raw.len());
    for (name, value) in raw {
        let pattern: ThemePattern = serde_json::from_value(value)
            .map_err(|e| parse_error(format!("theme '{}': {}", name, e)))?;
        definitions.push((name, pattern));
    }

    if definitions.is_empty() {
        return Err(ReferenceError::Empty(file.to_string()));
    }
    Ok(ThemePatterns::from_definitions(definitions))
}

/// Built-in theme patterns used when the resource is unusable.
pub fn default_theme_patterns() -> ThemePatterns {
    ThemePatterns::from_definitions([
        (
            "sacrifice",
            ThemePattern {
                patterns: vec!["sacrifice".to_string(), "dies".to_string()],
                synergy_query:
                    "(oracle:\"when a creature dies\" OR oracle:\"whenever you sacrifice\")"
                        .to_string(),
                synergy_description: "Cards that benefit from creature sacrifice".to_string(),
                synergy_type: "Sacrifice Synergy".to_string(),
            },
        ),
        (
            "tokens",
            ThemePattern {
                patterns: vec!["create.*token".to_string(), "token".to_string()],
                synergy_query: "(oracle:\"create.*token\")".to_string(),
                synergy_description: "Cards that create or benefit from tokens".to_string(),
                synergy_type: "Token Synergy".to_string(),
            },
        ),
    ])
}

fn to_owned_list(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Load-once cache of the three reference datasets.
#[derive(Debug)]
pub struct ReferenceCache {
    source: ReferenceSource,
    creature_types: OnceLock<Vec<String>>,
    keyword_abilities: OnceLock<Vec<String>>,
    theme_patterns: OnceLock<ThemePatterns>,
}

impl ReferenceCache {
    /// A cache that loads lazily from `source`.
    pub fn new(source: ReferenceSource) -> Self {
        Self {
            source,
            creature_types: OnceLock::new(),
            keyword_abilities: OnceLock::new(),
            theme_patterns: OnceLock::new(),
        }
    }

    /// A cache populated with the given datasets.
    pub fn with_data(
        creature_types: Vec<String>,
        keyword_abilities: Vec<String>,
        theme_patterns: ThemePatterns,
    ) -> Self {
        Self {
            source: ReferenceSource::Embedded,
            creature_types: OnceLock::from(creature_types),
            keyword_abilities: OnceLock::from(keyword_abilities),
            theme_patterns: OnceLock::from(theme_patterns),
        }
    }

    /// Set the source of the process-wide cache. Call once at startup;
    /// later calls keep the first source.
    pub fn install(source: ReferenceSource) -> &'static Self {
        let cache = GLOBAL.get_or_init(|| Self::new(source.clone()));
        if cache.source != source {
            warn!(
                "Reference cache already initialized from {:?}, ignoring {:?}",
                cache.source, source
            );
        }
        cache
    }

    /// The process-wide cache, reading bundled resources unless
    /// [`ReferenceCache::install`] chose another source first.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| Self::new(ReferenceSource::Embedded))
    }

    pub fn source(&self) -> &ReferenceSource {
        &self.source
    }

    /// Load every dataset now instead of on first use.
    pub fn warm(&self) {
        info!(
            "Reference data ready: {} creature types, {} keyword abilities, {} themes",
            self.creature_types().len(),
            self.keyword_abilities().len(),
            self.theme_patterns().len()
        );
    }

    /// Known creature types.
    pub fn creature_types(&self) -> &[String] {
        self.creature_types.get_or_init(|| {
            self.source
                .read(CREATURE_TYPES_FILE)
                .and_then(|content| parse_name_list(CREATURE_TYPES_FILE, &content))
                .inspect(|types| debug!("Loaded {} creature types", types.len()))
                .unwrap_or_else(|e| {
                    warn!("Error loading creature types: {}, using defaults", e);
                    to_owned_list(DEFAULT_CREATURE_TYPES)
                })
        })
    }

    /// Known keyword abilities.
    pub fn keyword_abilities(&self) -> &[String] {
        self.keyword_abilities.get_or_init(|| {
            self.source
                .read(KEYWORD_ABILITIES_FILE)
                .and_then(|content| parse_name_list(KEYWORD_ABILITIES_FILE, &content))
                .inspect(|abilities| debug!("Loaded {} keyword abilities", abilities.len()))
                .unwrap_or_else(|e| {
                    warn!("Error loading keyword abilities: {}, using defaults", e);
                    to_owned_list(DEFAULT_KEYWORD_ABILITIES)
                })
        })
    }

    /// Theme definitions in file order.
    pub fn theme_patterns(&self) -> &ThemePatterns {
        self.theme_patterns.get_or_init(|| {
            self.source
                .read(THEME_PATTERNS_FILE)
                .and_then(|content| parse_theme_patterns(THEME_PATTERNS_FILE, &content))
                .inspect(|themes| debug!("Loaded {} theme patterns", themes.len()))
                .unwrap_or_else(|e| {
                    warn!("Error loading theme patterns: {}, using defaults", e);
                    default_theme_patterns()
                })
        })
    }
}
