//! Page definitions and the page registry.
//!
//! Pages are host-supplied data: the viewer core reads them, never writes
//! them. A page is a title, content, and optional style overrides. Content is
//! either one string or a list of subpages, and each subpage is either a bare
//! string or a `{ text, ...overrides }` table:
//!
//! ```toml
//! [pages.100]
//! title = "Home"
//! content = "Use [yellow]keys[/yellow] to navigate. Weather: [link]200[/link]"
//!
//! [pages.200]
//! title = "Weather"
//! header_background = "red"
//! content = [
//!     "Monday: sunny",
//!     { text = "Tuesday: rain", title_color = "cyan", show_clock = false },
//! ]
//! ```
//!
//! The same shape loads from JSON (`{"pages": {"200": {...}}}`).
//!
//! ## Override fields
//!
//! The override fields a page accepts are the same set a subpage entry
//! accepts; a subpage value beats the page value, which beats the global
//! config. Bare datetime keys (`show_clock`, `position`, `color`, ...) scope
//! to the header clock/date display and may also be grouped under a nested
//! `datetime` table, which beats its bare siblings. Unknown keys are ignored
//! rather than rejected, so page data written for a newer viewer still loads.
//!
//! ## Page numbers
//!
//! Registry keys are strict: every key must parse as an integer in
//! [100, 999]. Out-of-range *lookups* wrap (see `nav`); out-of-range
//! *definitions* are authoring errors and refuse to load.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Lowest addressable page number.
pub const PAGE_MIN: u16 = 100;
/// Highest addressable page number.
pub const PAGE_MAX: u16 = 999;

#[derive(Debug, Error)]
pub enum PagesError {
    #[error("failed to read pages file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pages TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pages JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid page number {key:?}: {reason}")]
    InvalidNumber { key: String, reason: String },

    #[error("unsupported pages format {extension:?} (expected .toml or .json)")]
    UnknownFormat { extension: String },
}

// ============================================================================
// Page data
// ============================================================================

/// One page definition as authored by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    /// Header title. Empty string when the page has none.
    #[serde(default)]
    pub title: String,
    /// One string, or a list of subpages.
    #[serde(default)]
    pub content: PageContent,
    /// Page-level style overrides (any bare key next to `title`/`content`).
    #[serde(flatten)]
    pub overrides: StyleOverrides,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PageContent {
    Single(String),
    Subpages(Vec<SubpageEntry>),
}

impl Default for PageContent {
    fn default() -> Self {
        PageContent::Single(String::new())
    }
}

/// One entry of a `content` list, as authored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SubpageEntry {
    /// Bare string: text only, no per-subpage overrides.
    Text(String),
    /// `{ text = "...", ...overrides }` table.
    Styled(StyledSubpage),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StyledSubpage {
    /// Missing `text` is tolerated and renders as an empty subpage.
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub overrides: StyleOverrides,
}

/// A normalized subpage: raw markup text plus the entry's own overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subpage {
    pub text: String,
    pub overrides: StyleOverrides,
}

impl Page {
    /// Normalize `content` into a subpage list.
    ///
    /// Every page yields at least one subpage: a single string becomes a
    /// one-element list, and an empty list becomes one empty subpage, so
    /// navigation never sees a page with nothing to show.
    pub fn subpages(&self) -> Vec<Subpage> {
        match &self.content {
            PageContent::Single(text) => vec![Subpage {
                text: text.clone(),
                overrides: StyleOverrides::default(),
            }],
            PageContent::Subpages(entries) => {
                if entries.is_empty() {
                    return vec![Subpage::default()];
                }
                entries
                    .iter()
                    .map(|entry| match entry {
                        SubpageEntry::Text(text) => Subpage {
                            text: text.clone(),
                            overrides: StyleOverrides::default(),
                        },
                        SubpageEntry::Styled(styled) => Subpage {
                            text: styled.text.clone(),
                            overrides: styled.overrides.clone(),
                        },
                    })
                    .collect()
            }
        }
    }
}

// ============================================================================
// Style overrides
// ============================================================================

/// The override fields a page or subpage entry may carry.
///
/// Every field is optional; `None` means "inherit from the next layer down".
/// The bare datetime keys (`enabled` through `margin_right`) mirror the
/// nested [`DatetimeOverrides`] table minus `locale`, which is only settable
/// nested.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    pub header_background: Option<String>,
    pub page_number_color: Option<String>,
    pub page_number_size: Option<String>,
    pub subpage_number_color: Option<String>,
    pub subpage_number_size: Option<String>,
    pub show_title: Option<bool>,
    pub title_color: Option<String>,
    pub title_size: Option<String>,
    pub title_align: Option<String>,
    pub title_margin_left: Option<String>,
    pub title_margin_right: Option<String>,

    // Bare datetime keys.
    pub enabled: Option<bool>,
    pub position: Option<String>,
    pub show_clock: Option<bool>,
    pub show_date: Option<bool>,
    pub show_weekday: Option<bool>,
    pub time_format: Option<String>,
    pub date_format: Option<String>,
    pub weekday_format: Option<String>,
    pub color: Option<String>,
    pub font_weight: Option<String>,
    pub size: Option<String>,
    pub margin_left: Option<String>,
    pub margin_right: Option<String>,

    /// Nested datetime table; beats the bare keys above.
    pub datetime: Option<DatetimeOverrides>,
    /// Overrides for the `[line]` markup rule.
    pub line: Option<LineOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatetimeOverrides {
    pub enabled: Option<bool>,
    pub position: Option<String>,
    pub locale: Option<String>,
    pub show_clock: Option<bool>,
    pub show_date: Option<bool>,
    pub show_weekday: Option<bool>,
    pub time_format: Option<String>,
    pub date_format: Option<String>,
    pub weekday_format: Option<String>,
    pub color: Option<String>,
    pub font_weight: Option<String>,
    pub size: Option<String>,
    pub margin_left: Option<String>,
    pub margin_right: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LineOverrides {
    pub thickness: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub margin_top: Option<String>,
    pub margin_bottom: Option<String>,
}

// ============================================================================
// Registry
// ============================================================================

/// The page registry: number → definition, consumed read-only by navigation.
#[derive(Debug, Clone, Default)]
pub struct PageMap {
    pages: BTreeMap<u16, Page>,
}

impl PageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page under a strict [100, 999] number.
    pub fn insert(&mut self, number: u16, page: Page) -> Result<(), PagesError> {
        if !(PAGE_MIN..=PAGE_MAX).contains(&number) {
            return Err(PagesError::InvalidNumber {
                key: number.to_string(),
                reason: format!("outside {PAGE_MIN}-{PAGE_MAX}"),
            });
        }
        self.pages.insert(number, page);
        Ok(())
    }

    pub fn get(&self, number: u16) -> Option<&Page> {
        self.pages.get(&number)
    }

    pub fn contains(&self, number: u16) -> bool {
        self.pages.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Registered page numbers in ascending order.
    pub fn numbers(&self) -> impl Iterator<Item = u16> + '_ {
        self.pages.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &Page)> + '_ {
        self.pages.iter().map(|(number, page)| (*number, page))
    }

    /// Load a registry from a file, dispatching on extension.
    pub fn load(path: &Path) -> Result<Self, PagesError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&std::fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?),
            other => Err(PagesError::UnknownFormat {
                extension: other.unwrap_or("").to_string(),
            }),
        }
    }

    /// Parse a `[pages.NNN]` TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self, PagesError> {
        let file: PagesFile = toml::from_str(src)?;
        Self::from_raw(file.pages)
    }

    /// Parse a `{"pages": {"NNN": {...}}}` JSON document.
    pub fn from_json_str(src: &str) -> Result<Self, PagesError> {
        let file: PagesFile = serde_json::from_str(src)?;
        Self::from_raw(file.pages)
    }

    fn from_raw(raw: BTreeMap<String, Page>) -> Result<Self, PagesError> {
        let mut map = Self::new();
        for (key, page) in raw {
            let number: u16 = key.parse().map_err(|_| PagesError::InvalidNumber {
                key: key.clone(),
                reason: "not a 3-digit page number".into(),
            })?;
            map.insert(number, page).map_err(|_| PagesError::InvalidNumber {
                key,
                reason: format!("outside {PAGE_MIN}-{PAGE_MAX}"),
            })?;
        }
        Ok(map)
    }
}

#[derive(Debug, Deserialize)]
struct PagesFile {
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

// ============================================================================
// Tests
// ============================================================================
