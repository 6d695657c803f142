//! Page navigation: the viewer state machine.
//!
//! A [`Viewer`] owns the navigation state for one viewer instance — there are
//! no globals, so tests and embedding hosts can run as many independent
//! viewers as they like. All operations are synchronous and return either a
//! fresh [`Screen`] to apply or a value describing why nothing changed; the
//! core never touches a display itself.
//!
//! ## Page number wrapping
//!
//! Page numbers live in [100, 999]. Out-of-range requests wrap in a single
//! step, not modularly: anything below 100 lands on 999 and anything above
//! 999 lands on 100. Jumping to 50 therefore goes to 999, not 950. This is
//! the behavior remote-control teletext users expect from the wrap buttons.
//!
//! ## Numeric entry
//!
//! Direct page entry buffers up to three digits. While the buffer is short,
//! [`Viewer::input_digit`] returns the padded progress string (`"2--"`,
//! `"20-"`) for the page-number indicator; the third digit commits the jump,
//! clears the buffer, and returns the loaded screen. The buffer is cleared
//! only by a commit or by [`Viewer::clear_input`] — plain page navigation
//! leaves a half-typed buffer in place.

use crate::config::{ConfigError, ViewerConfig, resolve_config};
use crate::page::{PAGE_MAX, PAGE_MIN, PageMap, Subpage};
use crate::screen::{self, Screen};

/// Mutable navigation state, owned by a [`Viewer`].
///
/// Invariants: `current` is always within [100, 999]; `sub_index` is always
/// within bounds of `subpages`; `num_input` holds 0-3 ASCII digits.
#[derive(Debug, Clone)]
pub struct NavState {
    /// Active page number.
    pub current: u16,
    /// Normalized subpages of the active page; empty only in not-found.
    pub subpages: Vec<Subpage>,
    /// Active subpage index.
    pub sub_index: usize,
    /// Pending numeric entry buffer.
    pub num_input: String,
}

/// Outcome of feeding one digit to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputResult {
    /// Not a digit; state unchanged.
    Ignored,
    /// Buffer still filling; the string is the padded indicator text.
    Pending(String),
    /// Third digit committed a page load. `page` is the post-wrap page the
    /// viewer actually landed on.
    Loaded { page: u16, screen: Screen },
}

/// Snapshot of where the viewer is, for host chrome and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub page: u16,
    /// 1-based, as displayed in the `1/4` counter.
    pub subpage: usize,
    /// 0 when the current page is not in the registry.
    pub total_subpages: usize,
}

/// One independent viewer instance: page registry, resolved config, and
/// navigation state.
#[derive(Debug, Clone)]
pub struct Viewer {
    pages: PageMap,
    config: ViewerConfig,
    state: NavState,
}

impl Viewer {
    /// Start a viewer on the configured default page.
    pub fn new(pages: PageMap, config: ViewerConfig) -> Self {
        let start = config.default_page;
        let mut viewer = Self {
            pages,
            config,
            state: NavState {
                current: start,
                subpages: Vec::new(),
                sub_index: 0,
                num_input: String::new(),
            },
        };
        viewer.load_page(start);
        viewer
    }

    /// Resolve config layers and start a viewer in one call.
    pub fn init(
        pages: PageMap,
        global: Option<&toml::Value>,
        options: Option<&toml::Value>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(pages, resolve_config(global, options)?))
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn pages(&self) -> &PageMap {
        &self.pages
    }

    /// Jump to a page, wrapping out-of-range numbers first.
    ///
    /// A number missing from the registry is not an error: the viewer enters
    /// the not-found state (header number shown, everything else cleared) and
    /// recovers on the next successful load.
    pub fn load_page(&mut self, number: u16) -> Screen {
        let number = wrap(number);
        self.state.current = number;
        self.state.sub_index = 0;
        match self.pages.get(number) {
            Some(page) => {
                self.state.subpages = page.subpages();
                log::debug!(
                    "page {number} loaded ({} subpage{})",
                    self.state.subpages.len(),
                    if self.state.subpages.len() == 1 { "" } else { "s" },
                );
            }
            None => {
                self.state.subpages = Vec::new();
                log::debug!("page {number} not in registry, showing not-found");
            }
        }
        self.screen()
    }

    /// Step relative to the current page (`±1`, `±10`, `±100`), wrapping.
    pub fn step_page(&mut self, delta: i32) -> Screen {
        let target = i32::from(self.state.current) + delta;
        let wrapped = if target < i32::from(PAGE_MIN) {
            PAGE_MAX
        } else if target > i32::from(PAGE_MAX) {
            PAGE_MIN
        } else {
            target as u16
        };
        self.load_page(wrapped)
    }

    pub fn next_page(&mut self) -> Screen {
        self.step_page(1)
    }

    pub fn prev_page(&mut self) -> Screen {
        self.step_page(-1)
    }

    /// Advance to the next subpage. `None` at the last subpage: state is
    /// unchanged and there is nothing to re-render.
    pub fn next_subpage(&mut self) -> Option<Screen> {
        if self.state.sub_index + 1 < self.state.subpages.len() {
            self.state.sub_index += 1;
            Some(self.screen())
        } else {
            None
        }
    }

    /// Step back one subpage. `None` at the first subpage.
    pub fn prev_subpage(&mut self) -> Option<Screen> {
        if self.state.sub_index > 0 {
            self.state.sub_index -= 1;
            Some(self.screen())
        } else {
            None
        }
    }

    /// Feed one digit of direct page entry. Values above 9 are ignored.
    pub fn input_digit(&mut self, digit: u8) -> InputResult {
        if digit > 9 {
            return InputResult::Ignored;
        }
        self.state.num_input.push(char::from(b'0' + digit));
        if self.state.num_input.len() < 3 {
            return InputResult::Pending(format!("{:-<3}", self.state.num_input));
        }

        let target = self.state.num_input.parse::<u16>().ok();
        self.state.num_input.clear();
        match target {
            Some(number) => {
                log::debug!("numeric entry committed: {number:03}");
                let screen = self.load_page(number);
                InputResult::Loaded {
                    page: self.state.current,
                    screen,
                }
            }
            None => InputResult::Ignored,
        }
    }

    /// Cancel pending numeric entry. Returns the zero-padded current page
    /// number so the host can restore the indicator.
    pub fn clear_input(&mut self) -> String {
        self.state.num_input.clear();
        format!("{:03}", self.state.current)
    }

    pub fn status(&self) -> Status {
        Status {
            page: self.state.current,
            subpage: self.state.sub_index + 1,
            total_subpages: self.state.subpages.len(),
        }
    }

    /// Project the current state into render instructions.
    pub fn screen(&self) -> Screen {
        screen::project(&self.state, self.pages.get(self.state.current), &self.config)
    }
}

/// Single-step wrap into [100, 999].
fn wrap(number: u16) -> u16 {
    if number < PAGE_MIN {
        PAGE_MAX
    } else if number > PAGE_MAX {
        PAGE_MIN
    } else {
        number
    }
}

// ============================================================================
// Tests
// ============================================================================
