//! Static HTML export.
//!
//! Bakes a page registry into a browsable set of standalone HTML files, one
//! per subpage, plus an `index.html` mirroring the default page:
//!
//! ```text
//! dist/
//! ├── index.html        # copy of the default page
//! ├── 100.html
//! ├── 200.html          # first subpage of 200
//! ├── 200-2.html        # second subpage of 200
//! └── 300.html
//! ```
//!
//! Every file embeds the full stylesheet (theme variables from the resolved
//! config followed by the static base styles), so a single file survives
//! being mailed around on its own. Screen-resolved values land as CSS custom
//! properties on the wrapper element; the stylesheet reads them with
//! `var(--ttx-header-bg, var(--ttx-header-background))`-style fallbacks so a
//! page without overrides inherits the theme.
//!
//! `[link]` anchors come out of the parser pointing at `data-page`; the
//! exporter rewrites them to `NNN.html` when the target page exists and
//! leaves them inert when it does not. A navigation bar under the screen
//! links the neighboring registered pages (wrapping) and the adjacent
//! subpages. The header clock is a snapshot of the export time — live
//! ticking needs a dynamic host.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.

use std::fs;
use std::path::Path;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use thiserror::Error;

use crate::config::{DatetimeConfig, ViewerConfig, generate_theme_css};
use crate::datetime::{self, Timestamp};
use crate::nav::NavState;
use crate::page::PageMap;
use crate::screen::{self, Screen};

const CSS_STATIC: &str = include_str!("../static/style.css");

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What an export produced, for CLI reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub files: usize,
}

/// Export every registered page to `output_dir`.
pub fn export(
    pages: &PageMap,
    config: &ViewerConfig,
    output_dir: &Path,
) -> Result<ExportSummary, ExportError> {
    let css = format!("{}\n{}", generate_theme_css(config), CSS_STATIC);
    let now = Timestamp::now();
    fs::create_dir_all(output_dir)?;

    let mut files = 0;
    for (number, page) in pages.iter() {
        let subpages = page.subpages();
        for sub_index in 0..subpages.len() {
            let state = NavState {
                current: number,
                subpages: subpages.clone(),
                sub_index,
                num_input: String::new(),
            };
            let screen = screen::project(&state, Some(page), config);
            let doc =
                render_page_document(&screen, number, sub_index, subpages.len(), pages, &css, &now);
            let filename = page_filename(number, sub_index);
            fs::write(output_dir.join(&filename), doc.into_string())?;
            log::debug!("exported {filename}");
            files += 1;
        }
    }

    // index.html mirrors the default page so the export has an entry point.
    if let Some(page) = pages.get(config.default_page) {
        let subpages = page.subpages();
        let state = NavState {
            current: config.default_page,
            subpages: subpages.clone(),
            sub_index: 0,
            num_input: String::new(),
        };
        let screen = screen::project(&state, Some(page), config);
        let doc = render_page_document(
            &screen,
            config.default_page,
            0,
            subpages.len(),
            pages,
            &css,
            &now,
        );
        fs::write(output_dir.join("index.html"), doc.into_string())?;
        files += 1;
    }

    Ok(ExportSummary {
        pages: pages.len(),
        files,
    })
}

/// Output filename for one subpage: `104.html`, `104-2.html`, ...
pub fn page_filename(number: u16, sub_index: usize) -> String {
    if sub_index == 0 {
        format!("{number}.html")
    } else {
        format!("{number}-{}.html", sub_index + 1)
    }
}

/// Neighboring registered pages of `current`, wrapping at the registry ends.
/// A single-page registry points back at itself.
fn nav_neighbors(pages: &PageMap, current: u16) -> (u16, u16) {
    let prev = pages
        .numbers()
        .filter(|&n| n < current)
        .last()
        .or_else(|| pages.numbers().last())
        .unwrap_or(current);
    let next = pages
        .numbers()
        .find(|&n| n > current)
        .or_else(|| pages.numbers().next())
        .unwrap_or(current);
    (prev, next)
}

const LINK_PREFIX: &str = "<a href=\"#\" class=\"ttx-link\" data-page=\"";

/// Point parsed `[link]` anchors at their exported files.
///
/// The parser emits a fixed anchor shape, so this is a literal scan, not an
/// HTML parse. Links to unregistered pages keep their inert `href="#"`.
pub fn rewrite_links(content: &str, pages: &PageMap) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(pos) = rest.find(LINK_PREFIX) {
        let after = &rest[pos + LINK_PREFIX.len()..];
        if let Some(digits) = after.get(..3)
            && digits.bytes().all(|b| b.is_ascii_digit())
            && digits.parse::<u16>().is_ok_and(|n| pages.contains(n))
        {
            out.push_str(&rest[..pos]);
            out.push_str("<a href=\"");
            out.push_str(digits);
            out.push_str(".html\" class=\"ttx-link\" data-page=\"");
            out.push_str(digits);
            rest = &after[3..];
        } else {
            out.push_str(&rest[..pos + LINK_PREFIX.len()]);
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// HTML components
// ============================================================================

fn render_page_document(
    screen: &Screen,
    number: u16,
    sub_index: usize,
    total: usize,
    pages: &PageMap,
    css: &str,
    now: &Timestamp,
) -> Markup {
    let doc_title = if screen.title.is_empty() {
        format!("Page {number}")
    } else {
        format!("{number} {}", screen.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (doc_title) }
                style { (PreEscaped(css)) }
            }
            body {
                div.ttx-wrapper style=(screen_style(screen)) {
                    div.ttx-screen {
                        (render_header(screen, now))
                        div.ttx-content {
                            (PreEscaped(rewrite_links(&screen.content, pages)))
                        }
                        @if let Some(footer) = &screen.footer {
                            div.ttx-footer { (footer) }
                        }
                    }
                    (render_nav_bar(number, sub_index, total, pages))
                }
            }
        }
    }
}

fn render_header(screen: &Screen, now: &Timestamp) -> Markup {
    let datetime_text = screen.datetime.as_ref().map(|dt| datetime::format_line(dt, now));
    let datetime_style = screen.datetime.as_ref().map(datetime_inline_style);
    let on_left = screen
        .datetime
        .as_ref()
        .is_some_and(|dt| dt.position == "left");
    html! {
        header.ttx-header {
            span.ttx-page-number { (screen.page_number) }
            @if on_left {
                @if let Some(text) = &datetime_text {
                    span.ttx-datetime style=[datetime_style.as_deref()] { (text) }
                }
            }
            span.ttx-title.ttx-title-hidden[!screen.show_title] { (screen.title) }
            @if !on_left {
                @if let Some(text) = &datetime_text {
                    span.ttx-datetime style=[datetime_style.as_deref()] { (text) }
                }
            }
            @if let Some(counter) = &screen.subpage_counter {
                span.ttx-subpage-number { (counter) }
            }
        }
    }
}

/// Static page/subpage navigation replacing the live key bindings.
fn render_nav_bar(number: u16, sub_index: usize, total: usize, pages: &PageMap) -> Markup {
    let (prev, next) = nav_neighbors(pages, number);
    html! {
        nav.ttx-nav {
            a.ttx-nav-link href=(format!("{prev}.html")) { "\u{25c0} " (format!("{prev:03}")) }
            @if sub_index > 0 {
                a.ttx-nav-link href=(page_filename(number, sub_index - 1)) { "\u{25b2}" }
            }
            @if sub_index + 1 < total {
                a.ttx-nav-link href=(page_filename(number, sub_index + 1)) { "\u{25bc}" }
            }
            a.ttx-nav-link href=(format!("{next}.html")) { (format!("{next:03}")) " \u{25b6}" }
        }
    }
}

/// Screen-resolved values as CSS custom properties for the wrapper element.
/// The stylesheet reads each with a fallback to its theme-level variable.
fn screen_style(screen: &Screen) -> String {
    let mut style = String::new();
    style.push_str(&format!("--ttx-header-bg: {}; ", screen.header_background));
    style.push_str(&format!("--ttx-page-number-color: {}; ", screen.page_number_color));
    style.push_str(&format!("--ttx-page-number-size: {}; ", screen.page_number_size));
    style.push_str(&format!("--ttx-title-color: {}; ", screen.title_color));
    style.push_str(&format!("--ttx-title-size: {}; ", screen.title_size));
    style.push_str(&format!("--ttx-title-align: {}; ", screen.title_align));
    style.push_str(&format!("--ttx-title-ml: {}; ", screen.title_margin_left));
    style.push_str(&format!("--ttx-title-mr: {}; ", screen.title_margin_right));
    style.push_str(&format!(
        "--ttx-subpage-number-color: {}; ",
        screen.subpage_number_color
    ));
    style.push_str(&format!(
        "--ttx-subpage-number-size: {}; ",
        screen.subpage_number_size
    ));
    style.push_str(&format!("--ttx-line-thickness: {}; ", screen.line.thickness));
    style.push_str(&format!("--ttx-line-color: {}; ", screen.line.color));
    style.push_str(&format!("--ttx-line-style: {}; ", screen.line.style));
    style.push_str(&format!("--ttx-line-margin-top: {}; ", screen.line.margin_top));
    style.push_str(&format!("--ttx-line-margin-bottom: {};", screen.line.margin_bottom));
    style
}

fn datetime_inline_style(dt: &DatetimeConfig) -> String {
    format!(
        "color: {}; font-size: {}; font-weight: {}; margin-left: {}; margin-right: {}",
        dt.color, dt.size, dt.font_weight, dt.margin_left, dt.margin_right
    )
}

// ============================================================================
// Tests
// ============================================================================
