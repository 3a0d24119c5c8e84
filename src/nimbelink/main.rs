use clap::Parser;
use colored::*;
use unicode_width::UnicodeWidthStr;

use nimbelink::builtins;
use nimbelink::config::{self, NimbelinkConfig};
use nimbelink::dispatch::{self, Notice, NoticeLevel};
use nimbelink::registry::{self, ChildInfo};

/// Returns the version string, including git hash and commit date for dev builds.
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "nimbelink", version = version())]
#[command(about = "Unified entry point for NimbeLink tooling", long_about = None)]
struct Cli {
    /// Verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Command path followed by the command's own arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = builtins::install() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = dispatch::run(registry::global(), &cli.tokens);

    if cli.verbose > 0 && !result.matched.is_empty() {
        eprintln!("{}", format!("matched '{}'", result.matched.join(" ")).dimmed());
    }

    print_notices(&result.notices);
    print_listing(&result.listing);

    std::process::exit(result.status);
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.content),
            NoticeLevel::Warning => println!("{}", notice.content.yellow()),
            NoticeLevel::Error => eprintln!("{}", notice.content.red()),
        }
    }
}

fn print_listing(rows: &[ChildInfo]) {
    if rows.is_empty() {
        return;
    }

    let show_origins = config::config_dir()
        .and_then(NimbelinkConfig::load)
        .map(|c| c.show_origins)
        .unwrap_or(false);

    let name_width = rows.iter().map(|row| row.name.width()).max().unwrap_or(0);

    for row in rows {
        let padding = " ".repeat(name_width - row.name.width() + 2);

        let help = match &row.help {
            Some(help) => help.clone(),
            // A bare group only forwards to its children
            None if row.has_children => "provides sub-commands".to_string(),
            None => String::new(),
        };

        let mut line = format!("  {}{}{}", row.name.bold(), padding, help);
        if show_origins {
            if let Some(origin) = &row.origin {
                line.push_str(&format!(" {}", format!("[{}]", origin).dimmed()));
            }
        }
        println!("{}", line.trim_end());
    }
}
