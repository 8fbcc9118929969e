//! Built-in service configurations and the router that picks one by URL scheme.

use tracing::debug;
use url::Url;

pub use self::generic::GenericConfig;
pub use self::gotify::GotifyConfig;
pub use self::logger::LoggerConfig;
pub use self::mqtt::{MqttConfig, QoS};
pub use self::twilio::TwilioConfig;
use crate::{
    docs::SchemaRenderer,
    error::{ConfigError, SchemaError},
    placement::UrlPlacement,
    resolver::{Params, Resolver},
    schema::{ConfigSchema, FieldInfo},
};

mod generic;
mod gotify;
mod logger;
mod mqtt;
mod twilio;


/// Field names with their rendered values, in declaration order.
pub type FieldListing = Vec<(&'static str, String)>;

/// Type-erased operations of one service configuration.
#[derive(Clone, Copy)]
pub struct ServiceEntry {
    pub scheme: &'static str,

    verify: fn(&Url) -> Result<FieldListing, ConfigError>,

    normalize: fn(&Url, &Params) -> Result<Url, ConfigError>,

    describe: fn(&dyn SchemaRenderer) -> Result<String, SchemaError>,
}

impl ServiceEntry {
    pub fn of<C: UrlPlacement>() -> Self {
        Self {
            scheme: C::SCHEME,
            verify: verify_url::<C>,
            normalize: normalize_url::<C>,
            describe: describe_schema::<C>,
        }
    }

    /// Decodes `url`, checks that it forms a valid configuration and lists
    /// the resulting field values.
    pub fn verify(&self, url: &Url) -> Result<FieldListing, ConfigError> {
        (self.verify)(url)
    }

    /// Decodes `url`, applies `params` and re-encodes the result.
    pub fn normalize(&self, url: &Url, params: &Params) -> Result<Url, ConfigError> {
        (self.normalize)(url, params)
    }

    pub fn describe(&self, renderer: &dyn SchemaRenderer) -> Result<String, SchemaError> {
        (self.describe)(renderer)
    }
}

impl std::fmt::Debug for ServiceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}


fn verify_url<C: UrlPlacement>(url: &Url) -> Result<FieldListing, ConfigError> {
    let config = C::from_url(url)?;
    let resolver = Resolver::new(&config)?;

    Ok(resolver
        .field_values()
        .into_iter()
        .map(|(info, value)| (info.name, value))
        .collect())
}

fn normalize_url<C: UrlPlacement>(url: &Url, params: &Params) -> Result<Url, ConfigError> {
    C::from_url(url)?.with_params(params)?.to_url()
}

fn describe_schema<C: UrlPlacement>(renderer: &dyn SchemaRenderer) -> Result<String, SchemaError> {
    let schema = ConfigSchema::<C>::of()?;
    let fields = schema.fields().collect::<Vec<&FieldInfo>>();

    Ok(renderer.render(C::SCHEME, &fields))
}


/// Maps URL schemes to service configurations.
#[derive(Clone, Debug)]
pub struct ServiceRouter {
    entries: Vec<ServiceEntry>,
}

impl Default for ServiceRouter {
    fn default() -> Self {
        Self::empty()
            .with_service::<GenericConfig>()
            .with_service::<GotifyConfig>()
            .with_service::<LoggerConfig>()
            .with_service::<MqttConfig>()
            .with_service::<TwilioConfig>()
    }
}

impl ServiceRouter {
    /// A router without any services.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers `C`, replacing any service previously registered under the same scheme.
    pub fn with_service<C: UrlPlacement>(mut self) -> Self {
        self.entries.retain(|entry| entry.scheme != C::SCHEME);
        self.entries.push(ServiceEntry::of::<C>());
        self
    }

    pub fn schemes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.scheme)
    }

    pub fn entry(&self, scheme: &str) -> Result<&ServiceEntry, ConfigError> {
        self.entries
            .iter()
            .find(|entry| entry.scheme.eq_ignore_ascii_case(scheme))
            .ok_or_else(|| ConfigError::UnsupportedScheme {
                scheme: scheme.to_string(),
            })
    }

    /// Parses `raw_url` and finds the service registered for its scheme.
    pub fn locate(&self, raw_url: &str) -> Result<(&ServiceEntry, Url), ConfigError> {
        let url = Url::parse(raw_url).map_err(|error| ConfigError::invalid_url(raw_url, error))?;
        let entry = self.entry(url.scheme())?;

        debug!(scheme = entry.scheme, "Located service for URL.");

        Ok((entry, url))
    }

    pub fn verify(&self, raw_url: &str) -> Result<FieldListing, ConfigError> {
        let (entry, url) = self.locate(raw_url)?;
        entry.verify(&url)
    }

    pub fn normalize(&self, raw_url: &str, params: &Params) -> Result<Url, ConfigError> {
        let (entry, url) = self.locate(raw_url)?;
        entry.normalize(&url, params)
    }

    pub fn describe(
        &self,
        scheme: &str,
        renderer: &dyn SchemaRenderer,
    ) -> Result<String, ConfigError> {
        Ok(self.entry(scheme)?.describe(renderer)?)
    }
}
