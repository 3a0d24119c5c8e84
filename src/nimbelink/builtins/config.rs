use clap::Parser;

use super::ORIGIN;
use crate::command::Command;
use crate::config::{self, NimbelinkConfig};
use crate::error::Result;
use crate::registry::Registration;

#[derive(Parser, Debug)]
#[command(
    name = "config",
    no_binary_name = true,
    about = "Show or change nimbelink options"
)]
struct ConfigArgs {
    /// Configuration key (e.g. show-origins)
    key: Option<String>,

    /// Value to set (if omitted, prints the current value)
    value: Option<String>,
}

struct ConfigCommand;

impl ConfigCommand {
    fn execute(&self, parsed: ConfigArgs) -> Result<i32> {
        let dir = config::config_dir()?;
        let mut config = NimbelinkConfig::load(&dir)?;

        match (parsed.key.as_deref(), parsed.value) {
            (None, _) => {
                println!("show-origins = {}", config.show_origins);
            }
            (Some("show-origins"), None) => {
                println!("{}", config.show_origins);
            }
            (Some("show-origins"), Some(value)) => {
                match value.parse::<bool>() {
                    Ok(flag) => config.show_origins = flag,
                    Err(_) => {
                        eprintln!("Expected 'true' or 'false', got '{}'", value);
                        return Ok(1);
                    }
                }
                config.save(&dir)?;
                println!("show-origins = {}", config.show_origins);
            }
            (Some(other), _) => {
                eprintln!("Unknown config key: {}", other);
                return Ok(1);
            }
        }
        Ok(0)
    }
}

impl Command for ConfigCommand {
    fn run(&self, args: &[String]) -> i32 {
        let parsed = match ConfigArgs::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(err) => {
                let _ = err.print();
                return err.exit_code();
            }
        };

        match self.execute(parsed) {
            Ok(status) => status,
            Err(err) => {
                eprintln!("Error: {}", err);
                1
            }
        }
    }
}

pub fn registration() -> Registration {
    Registration::new(
        ["config"],
        ORIGIN,
        || Ok(Box::new(ConfigCommand) as Box<dyn Command>),
    )
    .help("show or change nimbelink options")
}
