//! # txtv
//!
//! A teletext-style page viewer engine. Pages are numbered 100-999, carry
//! square-bracket markup split into subpages, and render through a layered
//! theme configuration. The library turns all of it into plain data
//! "screens" a host can display; the bundled static HTML exporter is one
//! such host.
//!
//! # Architecture: State In, Screen Out
//!
//! ```text
//! pages.toml   →  PageMap       ┐
//! config.toml  →  ViewerConfig  ├→  Viewer  →  Screen  →  host
//! key presses  →  NavState      ┘                         (HTML export,
//!                                                          terminal, ...)
//! ```
//!
//! The core is deliberately host-agnostic. Navigation mutates a small
//! [`nav::NavState`], and every mutation ends in [`screen::project`] — a
//! pure function from state + page + config to a [`screen::Screen`] of
//! fully resolved strings. Hosts never reach into config layering or markup
//! parsing; they render screens.
//!
//! This separation exists for three reasons:
//!
//! - **Testability**: projection is a pure function, so the whole display
//!   contract is unit-testable without a DOM, a terminal, or the clock.
//! - **Multiple hosts**: the exporter, the terminal preview, and any future
//!   embedding consume the same `Screen` struct and cannot drift apart.
//! - **Debuggability**: a screen is printable data — when a page looks
//!   wrong, you inspect the projected values instead of rendered output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | Page registry — numbered pages, subpage normalization, TOML/JSON loading |
//! | [`markup`] | Square-bracket markup to HTML via an ordered rewrite pipeline |
//! | [`config`] | Layered viewer config, per-page style resolution, theme CSS emission |
//! | [`nav`] | Navigation state machine — page wrap, subpage stepping, digit buffer |
//! | [`screen`] | Projection of state + page + config into resolved display data |
//! | [`datetime`] | Header clock — UTC timestamps and their configured formatting |
//! | [`export`] | Static HTML export of the whole registry using Maud |
//! | [`output`] | CLI output formatting — information-first page inventories |
//!
//! # Design Decisions
//!
//! ## Three-Digit Universe
//!
//! Every page number is 100-999, like the broadcast teletext services this
//! imitates. Navigation wraps at the edges (page up from 999 lands on 100),
//! typed digits buffer until exactly three are entered, and numbers outside
//! the band are normalized on entry. Keeping the band closed means "current
//! page" is always displayable as three digits with no empty states.
//!
//! ## Screens Are Data
//!
//! Style layering (global config, page overrides, subpage overrides) is
//! resolved at projection time into flat strings. A `Screen` has no
//! `Option<Option<..>>` chains and no back-references to config — hosts get
//! the final word on every value and stay trivially simple.
//!
//! ## Markup Is a Pipeline of String Rewrites
//!
//! The [`markup`] parser is an ordered table of passes, each a total
//! function from string to string. Escaping runs first, so author input can
//! never smuggle live HTML; the color catch-all runs after every named tag;
//! malformed tags simply stay as visible text. No AST, no error states —
//! every input renders to something.
//!
//! ## Maud Over Template Engines
//!
//! Exported HTML is generated with [Maud](https://maud.lambda.xyz/), a
//! compile-time HTML macro system, rather than Handlebars or Tera:
//!
//! - **Compile-time checking**: malformed HTML is a build error, not a runtime surprise.
//! - **Type-safe**: template variables are Rust expressions — no stringly-typed lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//! - **Zero runtime files**: no template directory to ship or get out of sync.
//!
//! ## Self-Contained Export
//!
//! Every exported page embeds the full stylesheet and needs no JavaScript,
//! no webfonts, and no sibling asset directory. A single `NNN.html` file
//! can be mailed around and still look right; a directory of them is a
//! browsable site on any static file server, indefinitely.

pub mod config;
pub mod datetime;
pub mod export;
pub mod markup;
pub mod nav;
pub mod output;
pub mod page;
pub mod screen;
