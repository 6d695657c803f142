//! Layered viewer configuration.
//!
//! Configuration resolves through three layers, later layers winning:
//!
//! ```text
//! stock defaults  ←  global overrides (config.toml)  ←  init options
//! ```
//!
//! Layering happens at the `toml::Value` level with [`merge_values`]: tables
//! merge key-by-key recursively, every other value type (arrays included)
//! overwrites wholesale. The merged tree then deserializes into the typed
//! [`ViewerConfig`], so unknown keys and type mismatches in any layer fail
//! initialization up front instead of surfacing mid-session.
//!
//! Per-page and per-subpage overrides are *not* part of these layers — they
//! ride on the page data (`page::StyleOverrides`) and are resolved
//! field-by-field at projection time with [`resolve_field`] and
//! [`resolve_datetime`], precedence subpage → page → merged global config.
//!
//! [`generate_theme_css`] emits the merged config as `--ttx-*` custom
//! properties for HTML hosts; non-HTML hosts read resolved values straight
//! off the `Screen`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::page::{DatetimeOverrides, StyleOverrides};

/// Errors surfaced while loading or resolving configuration.
///
/// Any of these aborts viewer initialization; there is no partially
/// configured state.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to encode stock defaults: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

// ============================================================================
// Config tree
// ============================================================================

/// Fully resolved viewer configuration. Every field has a stock default, so
/// a resolved config never has holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// First page loaded when a viewer starts.
    pub default_page: u16,
    /// Default text color for content.
    pub base_text_color: String,
    pub header: HeaderConfig,
    pub datetime: DatetimeConfig,
    pub footer: FooterConfig,
    pub line: LineConfig,
    pub headings: HeadingsConfig,
    pub block: BlockConfig,
    pub blink: BlinkConfig,
}

/// Header bar: background plus the three text slots (page number, title,
/// subpage counter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    /// Background theme for the header bar.
    pub background: String,
    pub page_number: TextStyleConfig,
    pub title: TitleConfig,
    pub subpage_number: TextStyleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyleConfig {
    pub size: String,
    pub weight: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TitleConfig {
    /// Whether the header title is visible.
    pub show: bool,
    pub color: String,
    pub weight: String,
    pub size: String,
    /// Horizontal alignment: "left", "center" or "right".
    pub align: String,
    pub margin_left: String,
    pub margin_right: String,
}

/// Header clock/date display. `position` is "left" or "right";
/// `weekday_format` is "short" or "long".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatetimeConfig {
    pub enabled: bool,
    pub position: String,
    pub locale: String,
    pub show_clock: bool,
    pub show_date: bool,
    pub show_weekday: bool,
    pub time_format: String,
    pub date_format: String,
    pub weekday_format: String,
    pub color: String,
    pub font_weight: String,
    pub size: String,
    pub margin_left: String,
    pub margin_right: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    /// Whether the footer hint text is displayed.
    pub show: bool,
    pub text: String,
    pub color: String,
}

/// Styling for the `[line]` horizontal rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineConfig {
    pub thickness: String,
    pub color: String,
    /// solid | dashed | dotted | double
    pub style: String,
    pub margin_top: String,
    pub margin_bottom: String,
}

/// Per-level sizing and color for `[h1]`–`[h6]` content headings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadingsConfig {
    pub h1: HeadingStyle,
    pub h2: HeadingStyle,
    pub h3: HeadingStyle,
    pub h4: HeadingStyle,
    pub h5: HeadingStyle,
    pub h6: HeadingStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadingStyle {
    pub size: String,
    pub color: String,
}

/// Defaults for `[block]` containers — the fallback the colored-block inline
/// style resolves to for unknown color tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockConfig {
    pub background: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlinkConfig {
    /// Blink animation duration, e.g. "1s" or "750ms".
    pub speed: String,
    pub color: String,
}

// ============================================================================
// Stock defaults
// ============================================================================

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_page: 100,
            base_text_color: "#ffffff".into(),
            header: HeaderConfig::default(),
            datetime: DatetimeConfig::default(),
            footer: FooterConfig::default(),
            line: LineConfig::default(),
            headings: HeadingsConfig::default(),
            block: BlockConfig::default(),
            blink: BlinkConfig::default(),
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            background: "blue".into(),
            page_number: TextStyleConfig::default(),
            title: TitleConfig::default(),
            subpage_number: TextStyleConfig::default(),
        }
    }
}

impl Default for TextStyleConfig {
    fn default() -> Self {
        Self {
            size: "1em".into(),
            weight: "normal".into(),
            color: "#fff".into(),
        }
    }
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            show: true,
            color: "#fff".into(),
            weight: "normal".into(),
            size: "1em".into(),
            align: "left".into(),
            margin_left: "1em".into(),
            margin_right: "1em".into(),
        }
    }
}

impl Default for DatetimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            position: "right".into(),
            locale: "en-US".into(),
            show_clock: true,
            show_date: false,
            show_weekday: true,
            time_format: "HH:MM:SS".into(),
            date_format: "DD.MM.YYYY".into(),
            weekday_format: "short".into(),
            color: "#ffffff".into(),
            font_weight: "normal".into(),
            size: "1em".into(),
            margin_left: "0.5em".into(),
            margin_right: "0.5em".into(),
        }
    }
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            show: true,
            text: "Use Arrow keys or numbers (100\u{2013}999). [\u{2191}/\u{2193}] changes subpages."
                .into(),
            color: "#ffffff".into(),
        }
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            thickness: "0.3em".into(),
            color: "#fff".into(),
            style: "solid".into(),
            margin_top: "0.5em".into(),
            margin_bottom: "0.5em".into(),
        }
    }
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            h1: HeadingStyle { size: "1.9em".into(), color: "yellow".into() },
            h2: HeadingStyle { size: "1.7em".into(), color: "yellow".into() },
            h3: HeadingStyle { size: "1.6em".into(), color: "yellow".into() },
            h4: HeadingStyle { size: "1.5em".into(), color: "yellow".into() },
            h5: HeadingStyle { size: "1.4em".into(), color: "yellow".into() },
            h6: HeadingStyle { size: "1.3em".into(), color: "yellow".into() },
        }
    }
}

impl Default for HeadingStyle {
    fn default() -> Self {
        Self {
            size: "1em".into(),
            color: "yellow".into(),
        }
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            background: "blue".into(),
            color: "#fff".into(),
        }
    }
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            speed: "1s".into(),
            color: "inherit".into(),
        }
    }
}

/// A documented stock config, suitable for `txtv gen-config > config.toml`.
///
/// Kept in sync with the `Default` impls by test.
pub fn stock_config_toml() -> String {
    r##"# txtv viewer configuration.
# Every key is optional; omitted keys keep their stock value shown here.

# First page loaded when the viewer starts (100-999).
default_page = 100
# Default text color for page content.
base_text_color = "#ffffff"

[header]
# Background theme for the header bar (CSS color or theme token).
background = "blue"

[header.page_number]
size = "1em"
weight = "normal"
color = "#fff"

[header.title]
# Whether the header title is visible (pages and subpages may override).
show = true
color = "#fff"
weight = "normal"
size = "1em"
# left | center | right
align = "left"
margin_left = "1em"
margin_right = "1em"

[header.subpage_number]
size = "1em"
weight = "normal"
color = "#fff"

[datetime]
# Master toggle for the header clock/date display.
enabled = true
# left | right
position = "right"
locale = "en-US"
show_clock = true
show_date = false
show_weekday = true
# HH:MM:SS | HH:MM
time_format = "HH:MM:SS"
# DD.MM.YYYY | MM.DD.YYYY | DD.MM | MM.DD
date_format = "DD.MM.YYYY"
# short | long
weekday_format = "short"
color = "#ffffff"
font_weight = "normal"
size = "1em"
margin_left = "0.5em"
margin_right = "0.5em"

[footer]
# Whether the footer hint text is displayed.
show = true
text = "Use Arrow keys or numbers (100–999). [↑/↓] changes subpages."
color = "#ffffff"

# Appearance of the [line] markup tag.
[line]
thickness = "0.3em"
color = "#fff"
# solid | dashed | dotted | double
style = "solid"
margin_top = "0.5em"
margin_bottom = "0.5em"

# Sizing and color of [h1]-[h6] content headings.
[headings.h1]
size = "1.9em"
color = "yellow"
[headings.h2]
size = "1.7em"
color = "yellow"
[headings.h3]
size = "1.6em"
color = "yellow"
[headings.h4]
size = "1.5em"
color = "yellow"
[headings.h5]
size = "1.4em"
color = "yellow"
[headings.h6]
size = "1.3em"
color = "yellow"

# Defaults for [block] containers; colored blocks fall back to this
# background when their color token is not a theme color.
[block]
background = "blue"
color = "#fff"

[blink]
# Blink animation duration, e.g. "1s" or "750ms".
speed = "1s"
color = "inherit"
"##
    .to_string()
}

// ============================================================================
// Merging and resolution
// ============================================================================

/// Recursively merge `overlay` into `base`.
///
/// Tables merge key-by-key; any other overlay value (strings, numbers,
/// booleans, *arrays*) replaces the base value wholesale. Consumes both
/// inputs, so callers keep their own copies intact by cloning.
pub fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_value) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => overlay_value,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Resolve the three config layers into a validated [`ViewerConfig`].
///
/// `global` is the host's config file (if any), `options` the per-init
/// overrides. Either may be `None`; both may be partial.
pub fn resolve_config(
    global: Option<&toml::Value>,
    options: Option<&toml::Value>,
) -> Result<ViewerConfig, ConfigError> {
    let mut merged = toml::Value::try_from(ViewerConfig::default())?;
    if let Some(overlay) = global {
        merged = merge_values(merged, overlay.clone());
    }
    if let Some(overlay) = options {
        merged = merge_values(merged, overlay.clone());
    }
    let config: ViewerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Read a config overlay file. The result is a raw layer for
/// [`resolve_config`], not a resolved config.
pub fn load_overrides(path: &Path) -> Result<toml::Value, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

impl ViewerConfig {
    /// Reject values that would put the viewer into a nonsensical state.
    /// Stylistic values (colors, sizes) deliberately pass through unchecked —
    /// hosts tolerate or coerce those downstream.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(100..=999).contains(&self.default_page) {
            return Err(ConfigError::Validation(format!(
                "default_page must be in 100-999, got {}",
                self.default_page
            )));
        }
        if !matches!(self.datetime.position.as_str(), "left" | "right") {
            return Err(ConfigError::Validation(format!(
                "datetime.position must be \"left\" or \"right\", got {:?}",
                self.datetime.position
            )));
        }
        if !matches!(self.datetime.weekday_format.as_str(), "short" | "long") {
            return Err(ConfigError::Validation(format!(
                "datetime.weekday_format must be \"short\" or \"long\", got {:?}",
                self.datetime.weekday_format
            )));
        }
        if !matches!(self.header.title.align.as_str(), "left" | "center" | "right") {
            return Err(ConfigError::Validation(format!(
                "header.title.align must be \"left\", \"center\" or \"right\", got {:?}",
                self.header.title.align
            )));
        }
        Ok(())
    }
}

/// First-defined-wins field resolution: subpage setting → page setting →
/// merged global value.
///
/// Built-in defaults are already folded into the global layer by
/// [`resolve_config`], so the chain is total — it always yields a value.
pub fn resolve_field<T: Clone>(subpage: Option<&T>, page: Option<&T>, global: &T) -> T {
    subpage.or(page).unwrap_or(global).clone()
}

/// Resolve the effective datetime settings for a page/subpage.
///
/// Merge order (later wins): global `[datetime]` ← page flat fields ← page
/// `[datetime]` table ← subpage flat fields ← subpage `[datetime]` table.
/// Flat fields are the allow-listed datetime keys that may sit directly on a
/// page or subpage entry (`show_clock = false` next to `title`); the nested
/// table always beats its flat siblings.
pub fn resolve_datetime(
    global: &DatetimeConfig,
    page: Option<&StyleOverrides>,
    subpage: Option<&StyleOverrides>,
) -> DatetimeConfig {
    let mut dt = global.clone();
    for layer in [page, subpage].into_iter().flatten() {
        apply_flat_datetime(&mut dt, layer);
        if let Some(nested) = &layer.datetime {
            apply_nested_datetime(&mut dt, nested);
        }
    }
    dt
}

fn apply_flat_datetime(dt: &mut DatetimeConfig, overrides: &StyleOverrides) {
    if let Some(v) = overrides.enabled {
        dt.enabled = v;
    }
    if let Some(v) = &overrides.position {
        dt.position = v.clone();
    }
    if let Some(v) = overrides.show_clock {
        dt.show_clock = v;
    }
    if let Some(v) = overrides.show_date {
        dt.show_date = v;
    }
    if let Some(v) = overrides.show_weekday {
        dt.show_weekday = v;
    }
    if let Some(v) = &overrides.time_format {
        dt.time_format = v.clone();
    }
    if let Some(v) = &overrides.date_format {
        dt.date_format = v.clone();
    }
    if let Some(v) = &overrides.weekday_format {
        dt.weekday_format = v.clone();
    }
    if let Some(v) = &overrides.color {
        dt.color = v.clone();
    }
    if let Some(v) = &overrides.font_weight {
        dt.font_weight = v.clone();
    }
    if let Some(v) = &overrides.size {
        dt.size = v.clone();
    }
    if let Some(v) = &overrides.margin_left {
        dt.margin_left = v.clone();
    }
    if let Some(v) = &overrides.margin_right {
        dt.margin_right = v.clone();
    }
}

fn apply_nested_datetime(dt: &mut DatetimeConfig, nested: &DatetimeOverrides) {
    if let Some(v) = nested.enabled {
        dt.enabled = v;
    }
    if let Some(v) = &nested.position {
        dt.position = v.clone();
    }
    if let Some(v) = &nested.locale {
        dt.locale = v.clone();
    }
    if let Some(v) = nested.show_clock {
        dt.show_clock = v;
    }
    if let Some(v) = nested.show_date {
        dt.show_date = v;
    }
    if let Some(v) = nested.show_weekday {
        dt.show_weekday = v;
    }
    if let Some(v) = &nested.time_format {
        dt.time_format = v.clone();
    }
    if let Some(v) = &nested.date_format {
        dt.date_format = v.clone();
    }
    if let Some(v) = &nested.weekday_format {
        dt.weekday_format = v.clone();
    }
    if let Some(v) = &nested.color {
        dt.color = v.clone();
    }
    if let Some(v) = &nested.font_weight {
        dt.font_weight = v.clone();
    }
    if let Some(v) = &nested.size {
        dt.size = v.clone();
    }
    if let Some(v) = &nested.margin_left {
        dt.margin_left = v.clone();
    }
    if let Some(v) = &nested.margin_right {
        dt.margin_right = v.clone();
    }
}

/// Resolve the effective `[line]` rule styling for a page/subpage.
///
/// Same layering as [`resolve_datetime`], but lines have no bare keys —
/// only the nested `line` table participates.
pub fn resolve_line(
    global: &LineConfig,
    page: Option<&StyleOverrides>,
    subpage: Option<&StyleOverrides>,
) -> LineConfig {
    let mut line = global.clone();
    for layer in [page, subpage].into_iter().flatten() {
        let Some(overrides) = &layer.line else {
            continue;
        };
        if let Some(v) = &overrides.thickness {
            line.thickness = v.clone();
        }
        if let Some(v) = &overrides.color {
            line.color = v.clone();
        }
        if let Some(v) = &overrides.style {
            line.style = v.clone();
        }
        if let Some(v) = &overrides.margin_top {
            line.margin_top = v.clone();
        }
        if let Some(v) = &overrides.margin_bottom {
            line.margin_bottom = v.clone();
        }
    }
    line
}

// ============================================================================
// Theme CSS generation
// ============================================================================

/// Emit the merged config as `--ttx-*` custom properties.
///
/// HTML hosts drop this into a `<style>` element; the static stylesheet and
/// the markup parser's inline fallbacks reference these variables.
pub fn generate_theme_css(config: &ViewerConfig) -> String {
    let mut css = String::from(":root {\n");

    css.push_str(&format!(
        "  --ttx-base-text-color: {};\n",
        config.base_text_color
    ));
    css.push_str(&format!(
        "  --ttx-header-background: {};\n",
        config.header.background
    ));

    let pn = &config.header.page_number;
    css.push_str(&format!("  --ttx-page-number-size: {};\n", pn.size));
    css.push_str(&format!("  --ttx-page-number-weight: {};\n", pn.weight));
    css.push_str(&format!("  --ttx-page-number-color: {};\n", pn.color));

    let title = &config.header.title;
    css.push_str(&format!("  --ttx-title-color: {};\n", title.color));
    css.push_str(&format!("  --ttx-title-weight: {};\n", title.weight));
    css.push_str(&format!("  --ttx-title-size: {};\n", title.size));
    css.push_str(&format!("  --ttx-title-align: {};\n", title.align));
    css.push_str(&format!("  --ttx-title-margin-left: {};\n", title.margin_left));
    css.push_str(&format!(
        "  --ttx-title-margin-right: {};\n",
        title.margin_right
    ));

    let sn = &config.header.subpage_number;
    css.push_str(&format!("  --ttx-subpage-number-size: {};\n", sn.size));
    css.push_str(&format!("  --ttx-subpage-number-weight: {};\n", sn.weight));
    css.push_str(&format!("  --ttx-subpage-number-color: {};\n", sn.color));

    let dt = &config.datetime;
    css.push_str(&format!("  --ttx-datetime-color: {};\n", dt.color));
    css.push_str(&format!("  --ttx-datetime-weight: {};\n", dt.font_weight));
    css.push_str(&format!("  --ttx-datetime-size: {};\n", dt.size));
    css.push_str(&format!("  --ttx-datetime-margin-left: {};\n", dt.margin_left));
    css.push_str(&format!(
        "  --ttx-datetime-margin-right: {};\n",
        dt.margin_right
    ));

    css.push_str(&format!("  --ttx-footer-color: {};\n", config.footer.color));

    let line = &config.line;
    css.push_str(&format!("  --ttx-line-thickness: {};\n", line.thickness));
    css.push_str(&format!("  --ttx-line-color: {};\n", line.color));
    css.push_str(&format!("  --ttx-line-style: {};\n", line.style));
    css.push_str(&format!("  --ttx-line-margin-top: {};\n", line.margin_top));
    css.push_str(&format!(
        "  --ttx-line-margin-bottom: {};\n",
        line.margin_bottom
    ));

    let levels = [
        ("h1", &config.headings.h1),
        ("h2", &config.headings.h2),
        ("h3", &config.headings.h3),
        ("h4", &config.headings.h4),
        ("h5", &config.headings.h5),
        ("h6", &config.headings.h6),
    ];
    for (name, style) in levels {
        css.push_str(&format!("  --ttx-{name}-size: {};\n", style.size));
        css.push_str(&format!("  --ttx-{name}-color: {};\n", style.color));
    }

    css.push_str(&format!(
        "  --ttx-block-background: {};\n",
        config.block.background
    ));
    css.push_str(&format!("  --ttx-block-color: {};\n", config.block.color));
    css.push_str(&format!("  --ttx-blink-speed: {};\n", config.blink.speed));
    css.push_str(&format!("  --ttx-blink-color: {};\n", config.blink.color));

    css.push_str("}\n");
    css
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn value(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    // ===== merge_values =====

    #[test]
    fn merge_nested_tables_key_by_key() {
        let base = value("[a]\nx = 1\ny = 2");
        let overlay = value("[a]\ny = 3");
        let merged = merge_values(base, overlay);
        assert_eq!(merged, value("[a]\nx = 1\ny = 3"));
    }

    #[test]
    fn merge_adds_new_keys() {
        let base = value("x = 1");
        let overlay = value("y = 2");
        assert_eq!(merge_values(base, overlay), value("x = 1\ny = 2"));
    }

    #[test]
    fn merge_overwrites_primitives_wholesale() {
        let base = value("x = 1");
        let overlay = value("x = \"str\"");
        assert_eq!(merge_values(base, overlay), value("x = \"str\""));
    }

    #[test]
    fn merge_overwrites_arrays_wholesale() {
        let base = value("x = [1, 2, 3]");
        let overlay = value("x = [9]");
        assert_eq!(merge_values(base, overlay), value("x = [9]"));
    }

    #[test]
    fn merge_recurses_multiple_levels() {
        let base = value("[a.b]\nc = 1\nd = 2");
        let overlay = value("[a.b]\nd = 5");
        let merged = merge_values(base, overlay);
        assert_eq!(merged, value("[a.b]\nc = 1\nd = 5"));
    }

    #[test]
    fn merge_table_replaces_scalar() {
        let base = value("a = 1");
        let overlay = value("[a]\nb = 2");
        assert_eq!(merge_values(base, overlay), value("[a]\nb = 2"));
    }

    // ===== resolve_config =====

    #[test]
    fn no_layers_yields_stock_defaults() {
        let config = resolve_config(None, None).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn global_layer_overrides_a_field() {
        let global = value("[header]\nbackground = \"red\"");
        let config = resolve_config(Some(&global), None).unwrap();
        assert_eq!(config.header.background, "red");
        // Sibling fields keep their defaults.
        assert_eq!(config.header.title.align, "left");
    }

    #[test]
    fn init_options_beat_global_layer() {
        let global = value("default_page = 200");
        let options = value("default_page = 300");
        let config = resolve_config(Some(&global), Some(&options)).unwrap();
        assert_eq!(config.default_page, 300);
    }

    #[test]
    fn partial_nested_override_keeps_siblings() {
        let global = value("[datetime]\nshow_date = true");
        let config = resolve_config(Some(&global), None).unwrap();
        assert!(config.datetime.show_date);
        assert!(config.datetime.show_clock);
        assert_eq!(config.datetime.time_format, "HH:MM:SS");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let global = value("no_such_key = true");
        assert!(matches!(
            resolve_config(Some(&global), None),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let global = value("default_page = \"onehundred\"");
        assert!(matches!(
            resolve_config(Some(&global), None),
            Err(ConfigError::Toml(_))
        ));
    }

    // ===== validation =====

    #[test]
    fn default_page_out_of_range_fails_validation() {
        let global = value("default_page = 99");
        assert!(matches!(
            resolve_config(Some(&global), None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn bad_datetime_position_fails_validation() {
        let global = value("[datetime]\nposition = \"top\"");
        assert!(matches!(
            resolve_config(Some(&global), None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn bad_weekday_format_fails_validation() {
        let global = value("[datetime]\nweekday_format = \"medium\"");
        assert!(resolve_config(Some(&global), None).is_err());
    }

    #[test]
    fn bad_title_align_fails_validation() {
        let global = value("[header.title]\nalign = \"justify\"");
        assert!(resolve_config(Some(&global), None).is_err());
    }

    // ===== stock config =====

    #[test]
    fn stock_config_parses_and_matches_defaults() {
        let parsed: ViewerConfig = toml::from_str(&stock_config_toml()).unwrap();
        assert_eq!(parsed, ViewerConfig::default());
    }

    // ===== resolve_field =====

    #[test]
    fn resolve_field_prefers_subpage_then_page_then_global() {
        let global = "g".to_string();
        let page = Some("p".to_string());
        let sub = Some("s".to_string());
        assert_eq!(resolve_field(sub.as_ref(), page.as_ref(), &global), "s");
        assert_eq!(resolve_field(None, page.as_ref(), &global), "p");
        assert_eq!(resolve_field::<String>(None, None, &global), "g");
    }

    // ===== resolve_datetime =====

    fn overrides(toml_src: &str) -> StyleOverrides {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn datetime_defaults_flow_through() {
        let dt = resolve_datetime(&DatetimeConfig::default(), None, None);
        assert!(dt.enabled);
        assert!(dt.show_clock);
        assert_eq!(dt.position, "right");
    }

    #[test]
    fn flat_page_fields_override_global() {
        let page = overrides("show_clock = false\ncolor = \"#0f0\"");
        let dt = resolve_datetime(&DatetimeConfig::default(), Some(&page), None);
        assert!(!dt.show_clock);
        assert_eq!(dt.color, "#0f0");
        assert!(dt.enabled);
    }

    #[test]
    fn nested_table_beats_flat_fields() {
        let page = overrides("show_clock = false\n[datetime]\nshow_clock = true");
        let dt = resolve_datetime(&DatetimeConfig::default(), Some(&page), None);
        assert!(dt.show_clock);
    }

    #[test]
    fn subpage_layer_beats_page_layer() {
        let page = overrides("position = \"left\"");
        let sub = overrides("position = \"right\"");
        let dt = resolve_datetime(&DatetimeConfig::default(), Some(&page), Some(&sub));
        assert_eq!(dt.position, "right");
    }

    #[test]
    fn page_disable_hides_datetime() {
        let page = overrides("enabled = false");
        let dt = resolve_datetime(&DatetimeConfig::default(), Some(&page), None);
        assert!(!dt.enabled);
    }

    #[test]
    fn locale_is_only_settable_nested() {
        let page = overrides("[datetime]\nlocale = \"fi-FI\"");
        let dt = resolve_datetime(&DatetimeConfig::default(), Some(&page), None);
        assert_eq!(dt.locale, "fi-FI");
    }

    // ===== resolve_line =====

    #[test]
    fn line_overrides_layer_like_datetime() {
        let page = overrides("[line]\ncolor = \"cyan\"");
        let sub = overrides("[line]\nthickness = \"2px\"");
        let line = resolve_line(&LineConfig::default(), Some(&page), Some(&sub));
        assert_eq!(line.color, "cyan");
        assert_eq!(line.thickness, "2px");
        assert_eq!(line.style, "solid");
    }

    #[test]
    fn subpage_line_beats_page_line() {
        let page = overrides("[line]\ncolor = \"cyan\"");
        let sub = overrides("[line]\ncolor = \"magenta\"");
        let line = resolve_line(&LineConfig::default(), Some(&page), Some(&sub));
        assert_eq!(line.color, "magenta");
    }

    // ===== theme css =====

    #[test]
    fn theme_css_contains_resolved_variables() {
        let global = value("[block]\nbackground = \"black\"");
        let config = resolve_config(Some(&global), None).unwrap();
        let css = generate_theme_css(&config);
        assert!(css.starts_with(":root {"));
        assert!(css.contains("--ttx-block-background: black;"));
        assert!(css.contains("--ttx-header-background: blue;"));
        assert!(css.contains("--ttx-h1-size: 1.9em;"));
        assert!(css.contains("--ttx-blink-speed: 1s;"));
        assert!(css.ends_with("}\n"));
    }
}
