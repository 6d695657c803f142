//! Display projection: navigation state → render instructions.
//!
//! [`project`] is the seam between the viewer core and whatever actually
//! draws: it folds the current navigation state, the matched page definition,
//! and the resolved config into one [`Screen`] of final presentation values.
//! The function is pure — hosts apply a `Screen` to a DOM, a terminal, or a
//! static HTML file, and applying the same `Screen` twice is harmless.
//!
//! Chrome fields (header background, per-slot colors and sizes, title
//! visibility) resolve subpage → page → global config. Content is the active
//! subpage's markup, already parsed to safe HTML. `datetime: None` means the
//! clock/date display is hidden outright; `Some` carries the fully resolved
//! settings for the host's ticker, which must be restarted on every applied
//! screen so at most one ticker runs.

use crate::config::{
    DatetimeConfig, LineConfig, ViewerConfig, resolve_datetime, resolve_field, resolve_line,
};
use crate::markup;
use crate::nav::NavState;
use crate::page::{Page, Subpage};

/// Everything the rendering layer needs to draw one screen.
///
/// String fields hold final values, not references into config — a `Screen`
/// stays valid after the viewer moves on.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    /// Zero-padded current page number, e.g. `"104"`.
    pub page_number: String,
    /// Whether the page exists in the registry. `false` is the not-found
    /// state: everything below except the chrome styling is cleared.
    pub found: bool,
    pub title: String,
    pub show_title: bool,
    /// `"2/4"` counter text; `None` hides the counter (not-found).
    pub subpage_counter: Option<String>,

    pub header_background: String,
    pub page_number_color: String,
    pub page_number_size: String,
    pub title_color: String,
    pub title_size: String,
    pub title_align: String,
    pub title_margin_left: String,
    pub title_margin_right: String,
    pub subpage_number_color: String,
    pub subpage_number_size: String,

    /// Parsed HTML for the active subpage. Safe to insert as-is.
    pub content: String,
    /// Footer hint text; `None` hides the footer.
    pub footer: Option<String>,
    /// Resolved clock/date settings; `None` hides the display.
    pub datetime: Option<DatetimeConfig>,
    /// Resolved `[line]` rule styling for this page/subpage.
    pub line: LineConfig,
}

/// Compute the screen for the current state.
///
/// `page` is the registry entry for `state.current`, or `None` for the
/// not-found state.
pub fn project(state: &NavState, page: Option<&Page>, config: &ViewerConfig) -> Screen {
    let page_number = format!("{:03}", state.current);
    let Some(page) = page else {
        return not_found(page_number, config);
    };

    let fallback = Subpage::default();
    let sub = state.subpages.get(state.sub_index).unwrap_or(&fallback);
    let so = &sub.overrides;
    let po = &page.overrides;

    let datetime = resolve_datetime(&config.datetime, Some(po), Some(so));
    let visible = datetime.enabled
        && (datetime.show_clock || datetime.show_date || datetime.show_weekday);

    Screen {
        page_number,
        found: true,
        title: page.title.clone(),
        show_title: resolve_field(
            so.show_title.as_ref(),
            po.show_title.as_ref(),
            &config.header.title.show,
        ),
        subpage_counter: Some(format!("{}/{}", state.sub_index + 1, state.subpages.len())),

        header_background: resolve_field(
            so.header_background.as_ref(),
            po.header_background.as_ref(),
            &config.header.background,
        ),
        page_number_color: resolve_field(
            so.page_number_color.as_ref(),
            po.page_number_color.as_ref(),
            &config.header.page_number.color,
        ),
        page_number_size: resolve_field(
            so.page_number_size.as_ref(),
            po.page_number_size.as_ref(),
            &config.header.page_number.size,
        ),
        title_color: resolve_field(
            so.title_color.as_ref(),
            po.title_color.as_ref(),
            &config.header.title.color,
        ),
        title_size: resolve_field(
            so.title_size.as_ref(),
            po.title_size.as_ref(),
            &config.header.title.size,
        ),
        title_align: resolve_field(
            so.title_align.as_ref(),
            po.title_align.as_ref(),
            &config.header.title.align,
        ),
        title_margin_left: resolve_field(
            so.title_margin_left.as_ref(),
            po.title_margin_left.as_ref(),
            &config.header.title.margin_left,
        ),
        title_margin_right: resolve_field(
            so.title_margin_right.as_ref(),
            po.title_margin_right.as_ref(),
            &config.header.title.margin_right,
        ),
        subpage_number_color: resolve_field(
            so.subpage_number_color.as_ref(),
            po.subpage_number_color.as_ref(),
            &config.header.subpage_number.color,
        ),
        subpage_number_size: resolve_field(
            so.subpage_number_size.as_ref(),
            po.subpage_number_size.as_ref(),
            &config.header.subpage_number.size,
        ),

        content: markup::parse(&sub.text),
        footer: config.footer.show.then(|| config.footer.text.clone()),
        datetime: if visible { Some(datetime) } else { None },
        line: resolve_line(&config.line, Some(po), Some(so)),
    }
}

/// The not-found screen: page number and global chrome only, everything
/// page-derived cleared, clock hidden.
fn not_found(page_number: String, config: &ViewerConfig) -> Screen {
    Screen {
        page_number,
        found: false,
        title: String::new(),
        show_title: config.header.title.show,
        subpage_counter: None,

        header_background: config.header.background.clone(),
        page_number_color: config.header.page_number.color.clone(),
        page_number_size: config.header.page_number.size.clone(),
        title_color: config.header.title.color.clone(),
        title_size: config.header.title.size.clone(),
        title_align: config.header.title.align.clone(),
        title_margin_left: config.header.title.margin_left.clone(),
        title_margin_right: config.header.title.margin_right.clone(),
        subpage_number_color: config.header.subpage_number.color.clone(),
        subpage_number_size: config.header.subpage_number.size.clone(),

        content: String::new(),
        footer: None,
        datetime: None,
        line: config.line.clone(),
    }
}

// ============================================================================
// Tests
// ============================================================================
