use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use txtv::{config, export, nav, output, page};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "txtv")]
#[command(about = "Teletext-style page viewer and static site exporter")]
#[command(long_about = "\
Teletext-style page viewer and static site exporter

Pages are numbered 100-999 and live in one TOML or JSON file. Content uses
square-bracket markup that renders to HTML; a layered config themes the
screen chrome around it.

Pages file:

  [pages.100]
  title = \"Front Page\"
  content = \"\"\"
  [h1]Welcome[/h1]
  News on [link]104[/link], weather on [link]200[/link]
  \"\"\"

  [pages.200]
  title = \"Weather\"
  content = [\"Monday: sun\", \"Tuesday: rain\"]    # list = subpages

  [pages.200.datetime]
  color = \"#ff0\"                                  # per-page overrides

Config resolution (later layers win):
  stock defaults → --config file → --options file

Run 'txtv gen-config' for a documented config.toml with every option.")]
#[command(version = version_string())]
struct Cli {
    /// Pages file (TOML or JSON)
    #[arg(long, default_value = "pages.toml", global = true)]
    pages: PathBuf,

    /// Config overrides file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Second override layer, applied on top of --config
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export every page to a static HTML site
    Export {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print one page as terminal text
    Render {
        /// Page number (wrapped into 100-999)
        number: u16,
        /// Subpage to show, 1-based
        #[arg(long, default_value_t = 1)]
        subpage: usize,
    },
    /// Validate the pages file and report broken links
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Export { output } => {
            let pages = page::PageMap::load(&cli.pages)?;
            let config = load_config(cli.config.as_deref(), cli.options.as_deref())?;
            let summary = export::export(&pages, &config, &output)?;
            output::print_export_output(&pages, &summary);
        }
        Command::Render { number, subpage } => {
            let pages = page::PageMap::load(&cli.pages)?;
            let config = load_config(cli.config.as_deref(), cli.options.as_deref())?;
            let mut viewer = nav::Viewer::new(pages, config);
            viewer.load_page(number);
            for _ in 1..subpage {
                if viewer.next_subpage().is_none() {
                    break;
                }
            }
            output::print_screen(&viewer.screen());
        }
        Command::Check => {
            let pages = page::PageMap::load(&cli.pages)?;
            load_config(cli.config.as_deref(), cli.options.as_deref())?;
            output::print_check_output(&pages);
            let broken = output::broken_link_count(&pages);
            if broken > 0 {
                return Err(format!("{broken} broken links").into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve the effective config from the optional override layers.
fn load_config(
    global_path: Option<&Path>,
    options_path: Option<&Path>,
) -> Result<config::ViewerConfig, config::ConfigError> {
    let global = global_path.map(config::load_overrides).transpose()?;
    let options = options_path.map(config::load_overrides).transpose()?;
    config::resolve_config(global.as_ref(), options.as_ref())
}
