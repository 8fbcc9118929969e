use clap::Parser;
use miette::{Context, Result};
use tracing::{debug, info};
use urlconf::{ConsoleRenderer, Params, SchemaRenderer, ServiceRouter};

use crate::{
    cli::{CLIArgs, CLICommand, DocsFormat},
    configuration::Configuration,
    logging::initialize_tracing,
};

mod cli;
mod configuration;
mod logging;


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    // Load configuration.
    let configuration = match cli_args.configuration_file_path.as_ref() {
        Some(path) => Configuration::load_from_path(path),
        None => Configuration::load_from_default_path(),
    }
    .wrap_err("Failed to load configuration file.")?;


    let logging_raii_guard = initialize_tracing(
        configuration.logging.console_output_level_filter(),
        configuration.logging.log_file_output_level_filter(),
        configuration.logging.log_file_output_directory.as_deref(),
        "urlconf.log",
    )
    .wrap_err("Failed to initialize tracing.")?;

    match configuration.file_path.as_ref() {
        Some(path) => info!(path = %path.display(), "Configuration loaded."),
        None => info!("No configuration file found, using built-in defaults."),
    }


    let router = ServiceRouter::default();

    match cli_args.command {
        CLICommand::Verify { url } => {
            let fields = router
                .verify(&url)
                .wrap_err("Service URL is not valid.")?;

            let name_width = fields
                .iter()
                .map(|(name, _)| name.len())
                .max()
                .unwrap_or_default();

            for (name, value) in fields {
                println!("{:<width$}  {}", name, value, width = name_width);
            }
        }
        CLICommand::Normalize { url, params } => {
            let params = params.into_iter().collect::<Params>();
            debug!(count = params.len(), "Applying params before normalizing.");

            let normalized = router
                .normalize(&url, &params)
                .wrap_err("Failed to normalize service URL.")?;

            println!("{}", normalized);
        }
        CLICommand::Docs { scheme, format } => {
            let markdown_renderer = configuration.documentation.markdown_renderer();
            let renderer: &dyn SchemaRenderer = match format {
                DocsFormat::Markdown => &markdown_renderer,
                DocsFormat::Console => &ConsoleRenderer,
            };

            let documentation = router
                .describe(&scheme, renderer)
                .wrap_err("Failed to render service documentation.")?;

            print!("{}", documentation);
        }
        CLICommand::Services => {
            for scheme in router.schemes() {
                println!("{}", scheme);
            }
        }
    }


    drop(logging_raii_guard);
    Ok(())
}
