use super::target::TargetCommand;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct HammerArgs {
    /// Settings file (.toml or .json), values can be overridden with HAMMER_* environment variables
    #[arg(
        value_parser = validate_settings_path,
        required_unless_present = "print_settings_template"
    )]
    pub settings: Option<PathBuf>,

    /// Log file path, overrides `output_path` from the settings
    #[arg(long, short = 'o')]
    pub output_path: Option<PathBuf>,

    /// Also write the final report as JSON to this path
    #[arg(long)]
    pub json_report: Option<PathBuf>,

    /// Print the default settings as TOML and exit
    #[arg(long, default_value_t = false)]
    pub print_settings_template: bool,

    /// Store to run against, the simulated store when omitted
    #[command(subcommand)]
    pub target: Option<TargetCommand>,
}

fn validate_settings_path(v: &str) -> Result<PathBuf, String> {
    if Path::new(v).is_file() {
        Ok(PathBuf::from(v))
    } else {
        Err(format!("Provided settings file '{v}' does not exist."))
    }
}

impl HammerArgs {
    pub fn target(&self) -> TargetCommand {
        self.target.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_should_be_consistent() {
        HammerArgs::command().debug_assert();
    }

    #[test]
    fn settings_should_not_be_required_for_template() {
        let args = HammerArgs::try_parse_from(["hammer", "--print-settings-template"]).unwrap();

        assert!(args.print_settings_template);
        assert!(args.settings.is_none());
        assert_eq!(args.target(), TargetCommand::default());
    }

    #[test]
    fn missing_settings_file_should_be_rejected() {
        let result = HammerArgs::try_parse_from(["hammer", "/no/such/settings.toml"]);

        assert!(result.is_err());
    }

    #[test]
    fn http_target_should_be_parsed_after_settings() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let path = file.path().to_str().unwrap();

        let args = HammerArgs::try_parse_from([
            "hammer",
            path,
            "http",
            "--server-url",
            "http://db-proxy:9000",
        ])
        .unwrap();

        assert_eq!(args.settings.as_deref(), Some(file.path()));
        assert!(matches!(
            args.target(),
            TargetCommand::Http(ref http) if http.server_url == "http://db-proxy:9000"
        ));
    }
}
