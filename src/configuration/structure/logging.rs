use std::path::PathBuf;

use miette::{miette, Context, IntoDiagnostic, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::configuration::{
    traits::ResolvableConfigurationWithContext,
    utilities::resolve_relative_to,
};


#[derive(Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub(super) struct UnresolvedLoggingConfiguration {
    console_output_level_filter: String,

    log_file_output_level_filter: String,

    /// Directory for log files. File logging is disabled when unset.
    log_file_output_directory: Option<String>,
}

impl Default for UnresolvedLoggingConfiguration {
    fn default() -> Self {
        Self {
            console_output_level_filter: "info".to_string(),
            log_file_output_level_filter: "debug".to_string(),
            log_file_output_directory: None,
        }
    }
}


#[derive(Clone, Debug)]
pub struct LoggingConfiguration {
    pub console_output_level_filter: String,

    pub log_file_output_level_filter: String,

    pub log_file_output_directory: Option<PathBuf>,
}

impl ResolvableConfigurationWithContext for UnresolvedLoggingConfiguration {
    type Resolved = LoggingConfiguration;
    /// Directory that relative paths are anchored to.
    type Context = PathBuf;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        // Validate the file and console level filters.
        EnvFilter::try_new(&self.console_output_level_filter)
            .into_diagnostic()
            .wrap_err_with(|| miette!("Failed to parse field console_output_level_filter"))?;

        EnvFilter::try_new(&self.log_file_output_level_filter)
            .into_diagnostic()
            .wrap_err_with(|| miette!("Failed to parse field log_file_output_level_filter"))?;


        let log_file_output_directory = self
            .log_file_output_directory
            .map(|directory| resolve_relative_to(&context, directory));


        Ok(Self::Resolved {
            console_output_level_filter: self.console_output_level_filter,
            log_file_output_level_filter: self.log_file_output_level_filter,
            log_file_output_directory,
        })
    }
}

impl LoggingConfiguration {
    pub fn console_output_level_filter(&self) -> EnvFilter {
        // PANIC SAFETY: This is safe because we checked that the input is valid in `resolve`.
        EnvFilter::try_new(&self.console_output_level_filter).unwrap()
    }

    pub fn log_file_output_level_filter(&self) -> EnvFilter {
        // PANIC SAFETY: This is safe because we checked that the input is valid in `resolve`.
        EnvFilter::try_new(&self.log_file_output_level_filter).unwrap()
    }
}
