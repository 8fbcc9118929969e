//! Command-line interface definitions for the `urlconf` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};



/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "urlconf",
    author,
    about = "Inspect, normalize and document notification service URLs.",
    version
)]
pub struct CLIArgs {
    /// This is the path to the configuration file to use.
    /// If unspecified, this defaults to `./data/configuration.toml`.
    #[arg(
        short = 'c',
        long = "configuration-file-path",
        global = true,
        help = "Path to the configuration file to use. Defaults to ./data/configuration.toml"
    )]
    pub configuration_file_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CLICommand,
}


#[derive(Subcommand)]
pub enum CLICommand {
    /// Decode and validate a service URL, then print its fields.
    Verify {
        #[arg(help = "Service URL, e.g. gotify://push.example/Aaa.bbb")]
        url: String,
    },

    /// Decode a service URL, apply params and print the canonical URL.
    Normalize {
        #[arg(help = "Service URL to normalize.")]
        url: String,

        #[arg(
            short = 'p',
            long = "param",
            value_parser = parse_key_value_param,
            help = "Send-time param in the form key=value. May be repeated."
        )]
        params: Vec<(String, String)>,
    },

    /// Render the configuration schema of a service.
    Docs {
        #[arg(help = "Service scheme, e.g. mqtt")]
        scheme: String,

        #[arg(
            short = 'f',
            long = "format",
            value_enum,
            default_value_t = DocsFormat::Markdown,
            help = "Output format."
        )]
        format: DocsFormat,
    },

    /// List the supported service schemes.
    Services,
}


#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum DocsFormat {
    Markdown,
    Console,
}


/// Parse a string of the format `key=value` into its key and value.
/// The value may itself contain `=`.
pub fn parse_key_value_param(value: &str) -> Result<(String, String), String> {
    let (key, value) = value
        .split_once('=')
        .ok_or_else(|| format!("expected a param in the form key=value, got `{}`", value))?;

    if key.is_empty() {
        return Err("param key must not be empty".to_string());
    }

    Ok((key.to_string(), value.to_string()))
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_params() {
        assert_eq!(
            parse_key_value_param("title=a=b").unwrap(),
            ("title".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_value_param("title=").unwrap(),
            ("title".to_string(), String::new())
        );
        assert!(parse_key_value_param("title").is_err());
        assert!(parse_key_value_param("=x").is_err());
    }

    #[test]
    fn parses_subcommands() {
        let args = CLIArgs::parse_from([
            "urlconf",
            "normalize",
            "gotify://push.example/Aaa.bbb",
            "-p",
            "priority=5",
        ]);

        match args.command {
            CLICommand::Normalize { url, params } => {
                assert_eq!(url, "gotify://push.example/Aaa.bbb");
                assert_eq!(params, vec![("priority".to_string(), "5".to_string())]);
            }
            _ => panic!("expected the normalize subcommand"),
        }
    }
}
