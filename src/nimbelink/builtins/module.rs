use clap::Parser;
use unicode_width::UnicodeWidthStr;

use super::ORIGIN;
use crate::command::Command;
use crate::registry::{self, Registration};

#[derive(Parser, Debug)]
#[command(
    name = "module list",
    no_binary_name = true,
    about = "List the commands registered by each contributing package"
)]
struct ListArgs {
    /// Only show commands registered by this package
    #[arg(short, long)]
    origin: Option<String>,
}

/// `nimbelink module list`: every registered command with the package it
/// came from. Listing never resolves an implementation, so broken
/// contributors still show up here.
struct ListCommand;

impl Command for ListCommand {
    fn run(&self, args: &[String]) -> i32 {
        let parsed = match ListArgs::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(err) => {
                let _ = err.print();
                return err.exit_code();
            }
        };

        let commands: Vec<_> = registry::global()
            .commands()
            .into_iter()
            .filter(|c| match &parsed.origin {
                Some(origin) => c.origin.name() == origin,
                None => true,
            })
            .collect();

        if commands.is_empty() {
            println!("No commands registered.");
            return 0;
        }

        let rows: Vec<(String, String, String)> = commands
            .into_iter()
            .map(|c| {
                (
                    c.path.join(" "),
                    c.origin.name().to_string(),
                    c.help.unwrap_or_default(),
                )
            })
            .collect();

        let path_width = rows.iter().map(|(path, _, _)| path.width()).max().unwrap_or(0);
        let origin_width = rows
            .iter()
            .map(|(_, origin, _)| origin.width())
            .max()
            .unwrap_or(0);

        for (path, origin, help) in rows {
            println!(
                "{}{}  {}{}  {}",
                path,
                " ".repeat(path_width - path.width()),
                origin,
                " ".repeat(origin_width - origin.width()),
                help
            );
        }
        0
    }
}

pub fn registration() -> Registration {
    Registration::new(
        ["module", "list"],
        ORIGIN,
        || Ok(Box::new(ListCommand) as Box<dyn Command>),
    )
    .help("list registered commands and the packages providing them")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_args_accept_an_origin_filter() {
        let parsed =
            ListArgs::try_parse_from(["--origin".to_string(), "pynl-device".to_string()]).unwrap();
        assert_eq!(parsed.origin.as_deref(), Some("pynl-device"));
    }

    #[test]
    fn unknown_flags_are_a_usage_error() {
        assert!(ListArgs::try_parse_from(["--bogus".to_string()]).is_err());
    }
}
