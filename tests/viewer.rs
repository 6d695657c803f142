//! End-to-end viewer tests: pages file in, projected screens out.
//!
//! Everything goes through the public API the way a host embedding the
//! viewer would: load a registry from disk, resolve config layers, drive
//! navigation, and assert on projected screens.

use txtv::config::{ViewerConfig, load_overrides};
use txtv::nav::{InputResult, Viewer};
use txtv::page::{PageMap, PagesError};

const PAGES_TOML: &str = r##"
[pages.100]
title = "Front Page"
content = """
[h1]Welcome[/h1]
News on [link]104[/link], weather on [link]200[/link]
"""

[pages.104]
title = "News"
content = ["First story", "Second story", "Third story"]

[pages.104.line]
color = "red"

[pages.200]
title = "Weather"
content = "Sun all week"
header_background = "#003"
show_title = false
"##;

fn registry() -> PageMap {
    PageMap::from_toml_str(PAGES_TOML).unwrap()
}

fn viewer() -> Viewer {
    Viewer::new(registry(), ViewerConfig::default())
}

#[test]
fn registry_loads_from_disk_and_viewer_starts_on_default_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pages.toml");
    std::fs::write(&path, PAGES_TOML).unwrap();

    let pages = PageMap::load(&path).unwrap();
    let viewer = Viewer::new(pages, ViewerConfig::default());
    assert_eq!(viewer.status().page, 100);

    let screen = viewer.screen();
    assert!(screen.found);
    assert_eq!(screen.title, "Front Page");
    assert!(screen.content.contains("<h1>Welcome</h1>"));
}

#[test]
fn json_registry_loads_the_same() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pages.json");
    std::fs::write(
        &path,
        r#"{"pages": {"104": {"title": "News", "content": ["a", "b"]}}}"#,
    )
    .unwrap();

    let pages = PageMap::load(&path).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages.get(104).unwrap().title, "News");
    assert_eq!(pages.get(104).unwrap().subpages().len(), 2);
}

#[test]
fn malformed_page_keys_are_rejected_on_load() {
    let err = PageMap::from_toml_str("[pages.home]\ncontent = \"x\"").unwrap_err();
    assert!(matches!(err, PagesError::InvalidNumber { .. }));

    let err = PageMap::from_toml_str("[pages.99]\ncontent = \"x\"").unwrap_err();
    assert!(matches!(err, PagesError::InvalidNumber { .. }));
}

#[test]
fn followed_links_land_where_they_point() {
    let mut viewer = viewer();
    let content = viewer.screen().content;

    // A host activates a link by reading its data-page attribute.
    let marker = "data-page=\"";
    let at = content.find(marker).unwrap() + marker.len();
    let target: u16 = content[at..at + 3].parse().unwrap();

    viewer.load_page(target);
    assert_eq!(viewer.status().page, 104);
    assert_eq!(viewer.screen().title, "News");
}

#[test]
fn digit_entry_commits_on_the_third_digit() {
    let mut viewer = viewer();
    assert_eq!(viewer.input_digit(1), InputResult::Pending("1--".to_string()));
    assert_eq!(viewer.input_digit(0), InputResult::Pending("10-".to_string()));
    match viewer.input_digit(4) {
        InputResult::Loaded { page, screen } => {
            assert_eq!(page, 104);
            assert_eq!(screen.title, "News");
        }
        other => panic!("expected Loaded, got {other:?}"),
    }
    assert_eq!(viewer.status().page, 104);
}

#[test]
fn arrow_navigation_wraps_and_walks_unregistered_numbers() {
    let mut viewer = viewer();
    let screen = viewer.load_page(999);
    assert!(!screen.found);
    assert_eq!(viewer.status().page, 999);

    let screen = viewer.next_page();
    assert_eq!(viewer.status().page, 100);
    assert!(screen.found);

    let screen = viewer.prev_page();
    assert_eq!(viewer.status().page, 999);
    assert!(!screen.found);
}

#[test]
fn subpage_stepping_clamps_and_page_loads_reset_it() {
    let mut viewer = viewer();
    viewer.load_page(104);
    assert_eq!(viewer.status().total_subpages, 3);

    assert!(viewer.next_subpage().is_some());
    assert!(viewer.next_subpage().is_some());
    assert!(viewer.next_subpage().is_none());
    assert_eq!(viewer.status().subpage, 3);
    assert!(viewer.screen().content.contains("Third story"));

    viewer.load_page(104);
    assert_eq!(viewer.status().subpage, 1);
}

#[test]
fn per_page_overrides_reach_the_screen() {
    let mut viewer = viewer();

    let weather = viewer.load_page(200);
    assert_eq!(weather.header_background, "#003");
    assert!(!weather.show_title);

    let news = viewer.load_page(104);
    assert_eq!(news.line.color, "red");
    assert_eq!(news.header_background, "blue");
}

#[test]
fn config_layers_cascade_latest_wins() {
    let dir = tempfile::tempdir().unwrap();
    let global_path = dir.path().join("config.toml");
    std::fs::write(
        &global_path,
        "default_page = 104\n\n[footer]\ntext = \"Global footer\"\ncolor = \"#0f0\"\n",
    )
    .unwrap();
    let options_path = dir.path().join("options.toml");
    std::fs::write(&options_path, "[footer]\ntext = \"Options footer\"\n").unwrap();

    let global = load_overrides(&global_path).unwrap();
    let options = load_overrides(&options_path).unwrap();
    let viewer = Viewer::init(registry(), Some(&global), Some(&options)).unwrap();

    assert_eq!(viewer.status().page, 104);
    assert_eq!(viewer.config().footer.text, "Options footer");
    assert_eq!(viewer.config().footer.color, "#0f0");
    assert_eq!(viewer.screen().footer.as_deref(), Some("Options footer"));
}

#[test]
fn unknown_config_keys_are_rejected() {
    let overlay: toml::Value = toml::from_str("default_pge = 104").unwrap();
    assert!(Viewer::init(registry(), Some(&overlay), None).is_err());
}

#[test]
fn out_of_band_default_page_is_rejected() {
    let overlay: toml::Value = toml::from_str("default_page = 42").unwrap();
    assert!(Viewer::init(registry(), Some(&overlay), None).is_err());
}
