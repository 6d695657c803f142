//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every page is its semantic identity — three-digit number and title —
//! with filenames and link targets shown as secondary context on indented
//! lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages
//! 100 Front Page (2 subpages)
//!     Links: 104, 200
//! 104 News
//!     Links: 100, 350 (missing)
//! 200 Weather
//!
//! 3 pages, 4 subpages
//! 1 broken links
//! ```
//!
//! ## Export
//!
//! ```text
//! 100 Front Page → 100.html
//!     → 100-2.html
//! 104 News → 104.html
//!
//! Exported 2 pages (3 files)
//! ```
//!
//! ## Render
//!
//! A plain-text preview of one projected screen: header line, content with
//! tags stripped and `<br>` turned back into newlines, footer.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::export::{self, ExportSummary};
use crate::markup;
use crate::page::PageMap;
use crate::screen::Screen;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Page header: number + title, title omitted when empty.
///
/// ```text
/// 100 Front Page
/// 104
/// ```
fn page_header(number: u16, title: &str) -> String {
    if title.is_empty() {
        format!("{number:03}")
    } else {
        format!("{number:03} {title}")
    }
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Rendered content back to terminal text: `<br>` to newlines, tags
/// stripped, the escape pass undone.
fn content_text(html: &str) -> String {
    strip_html_tags(&html.replace("<br>", "\n"))
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

// ============================================================================
// Check output
// ============================================================================

/// Count link targets that point at unregistered pages.
pub fn broken_link_count(pages: &PageMap) -> usize {
    pages
        .iter()
        .flat_map(|(_, page)| page.subpages())
        .flat_map(|sub| markup::link_targets(&sub.text))
        .filter(|&target| !pages.contains(target))
        .count()
}

/// Format the registry inventory: every page with its subpage count and the
/// link targets it references, missing targets marked.
pub fn format_check_output(pages: &PageMap) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    let mut subpage_total = 0;

    for (number, page) in pages.iter() {
        let subpages = page.subpages();
        subpage_total += subpages.len();

        let mut header = page_header(number, &page.title);
        if subpages.len() > 1 {
            header.push_str(&format!(" ({} subpages)", subpages.len()));
        }
        lines.push(header);

        let mut targets: Vec<u16> = subpages
            .iter()
            .flat_map(|sub| markup::link_targets(&sub.text))
            .collect();
        targets.sort_unstable();
        targets.dedup();
        if !targets.is_empty() {
            let rendered: Vec<String> = targets
                .iter()
                .map(|&target| {
                    if pages.contains(target) {
                        format!("{target:03}")
                    } else {
                        format!("{target:03} (missing)")
                    }
                })
                .collect();
            lines.push(format!("    Links: {}", rendered.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push(format!("{} pages, {} subpages", pages.len(), subpage_total));
    let broken = broken_link_count(pages);
    if broken > 0 {
        lines.push(format!("{broken} broken links"));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(pages: &PageMap) {
    for line in format_check_output(pages) {
        println!("{}", line);
    }
}

// ============================================================================
// Export output
// ============================================================================

/// Format export output: each page with the files it produced.
pub fn format_export_output(pages: &PageMap, summary: &ExportSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for (number, page) in pages.iter() {
        lines.push(format!(
            "{} \u{2192} {}",
            page_header(number, &page.title),
            export::page_filename(number, 0)
        ));
        for sub_index in 1..page.subpages().len() {
            lines.push(format!("    \u{2192} {}", export::page_filename(number, sub_index)));
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "Exported {} pages ({} files)",
        summary.pages, summary.files
    ));
    lines
}

/// Print export output to stdout.
pub fn print_export_output(pages: &PageMap, summary: &ExportSummary) {
    for line in format_export_output(pages, summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Render output
// ============================================================================

/// Format one projected screen as a terminal preview.
pub fn format_screen(screen: &Screen) -> Vec<String> {
    if !screen.found {
        return vec![format!("{} (not found)", screen.page_number)];
    }

    let mut header = screen.page_number.clone();
    if screen.show_title && !screen.title.is_empty() {
        header.push(' ');
        header.push_str(&screen.title);
    }
    if let Some(counter) = &screen.subpage_counter {
        header.push_str(&format!(" [{counter}]"));
    }

    let mut lines = vec![header, "-".repeat(40)];
    for line in content_text(&screen.content).lines() {
        lines.push(line.to_string());
    }
    lines.push("-".repeat(40));
    if let Some(footer) = &screen.footer {
        lines.push(footer.clone());
    }
    lines
}

/// Print a screen preview to stdout.
pub fn print_screen(screen: &Screen) {
    for line in format_screen(screen) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
