use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, success, warning};

/// Handle the `config` subcommand
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Some(Commands::Config {
        print_config,
        check,
    }) = &cli.command
    {
        let path = cli.config.clone().unwrap_or_else(Config::config_file);

        if *print_config {
            println!("📄 Current configuration ({}):\n", path.display());
            println!("{}", cfg.to_yaml()?);
        }

        if *check {
            if !path.exists() {
                warning(format!(
                    "{} does not exist, defaults are in use (run `asmanager init`)",
                    path.display()
                ));
            } else {
                match Config::load_from(&path) {
                    Ok(_) => success(format!("{} is valid", path.display())),
                    Err(e) => error(e),
                }
            }
        }
    }

    Ok(())
}
