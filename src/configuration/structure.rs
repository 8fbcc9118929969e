use std::fs;
use std::path::{Path, PathBuf};

use miette::{miette, Context, IntoDiagnostic, Result};
use serde::Deserialize;

pub use self::documentation::DocumentationConfiguration;
use self::documentation::UnresolvedDocumentationConfiguration;
pub use self::logging::LoggingConfiguration;
use self::logging::UnresolvedLoggingConfiguration;
use super::traits::{ResolvableConfiguration, ResolvableConfigurationWithContext};
use super::utilities::get_default_configuration_file_path;

mod documentation;
mod logging;



#[derive(Deserialize, Default, Debug)]
pub(crate) struct UnresolvedConfiguration {
    /// Logging-related configuration.
    #[serde(default)]
    logging: UnresolvedLoggingConfiguration,

    /// Schema documentation rendering.
    #[serde(default)]
    documentation: UnresolvedDocumentationConfiguration,
}


/// The entire configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// This is the file path this `Configuration` instance was loaded from,
    /// or `None` if the built-in defaults are in use.
    pub file_path: Option<PathBuf>,

    /// Logging-related configuration.
    pub logging: LoggingConfiguration,

    /// Schema documentation rendering.
    pub documentation: DocumentationConfiguration,
}


/// Context for resolving the configuration: where it was loaded from
/// and which directory relative paths are anchored to.
pub(crate) struct ConfigurationSource {
    file_path: Option<PathBuf>,

    base_directory: PathBuf,
}

impl ResolvableConfigurationWithContext for UnresolvedConfiguration {
    type Resolved = Configuration;
    type Context = ConfigurationSource;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        let logging = self
            .logging
            .resolve(context.base_directory)
            .wrap_err("Failed to resolve logging table.")?;

        let documentation = self
            .documentation
            .resolve()
            .wrap_err("Failed to resolve documentation table.")?;


        Ok(Configuration {
            file_path: context.file_path,
            logging,
            documentation,
        })
    }
}


impl Configuration {
    /// Load the configuration from a specific file path.
    pub fn load_from_path<S: AsRef<Path>>(configuration_file_path: S) -> Result<Self> {
        // Read the configuration file into memory.
        let configuration_string = fs::read_to_string(configuration_file_path.as_ref())
            .into_diagnostic()
            .wrap_err_with(|| {
                miette!(
                    "Could not read configuration file at {}.",
                    configuration_file_path.as_ref().display()
                )
            })?;

        let configuration_file_path = dunce::canonicalize(configuration_file_path)
            .into_diagnostic()
            .wrap_err("Could not canonicalize configuration file path!")?;

        Self::load_from_str(&configuration_string, configuration_file_path)
    }

    /// Parse the configuration from TOML text, as if it had been read from
    /// `configuration_file_path`.
    pub fn load_from_str<P: Into<PathBuf>>(
        configuration_string: &str,
        configuration_file_path: P,
    ) -> Result<Self> {
        let configuration_file_path = configuration_file_path.into();

        // Parse the string into the `UnresolvedConfiguration` structure and then resolve it.
        let unresolved_configuration =
            toml::from_str::<UnresolvedConfiguration>(configuration_string)
                .into_diagnostic()
                .wrap_err("Could not parse configuration file!")?;

        let base_directory = configuration_file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        unresolved_configuration
            .resolve(ConfigurationSource {
                file_path: Some(configuration_file_path),
                base_directory,
            })
            .wrap_err("Failed to resolve configuration.")
    }

    /// Load the configuration from the default path (`./data/configuration.toml`),
    /// falling back to the built-in defaults if there is no file there.
    pub fn load_from_default_path() -> Result<Configuration> {
        let default_path = get_default_configuration_file_path()
            .wrap_err("Could not determine the default configuration file path.")?;

        if default_path.is_file() {
            Configuration::load_from_path(default_path)
        } else {
            Configuration::built_in()
        }
    }

    /// The configuration used when no configuration file is present.
    pub fn built_in() -> Result<Configuration> {
        let base_directory = std::env::current_dir()
            .into_diagnostic()
            .wrap_err("Could not get the current directory.")?;

        UnresolvedConfiguration::default().resolve(ConfigurationSource {
            file_path: None,
            base_directory,
        })
    }
}
