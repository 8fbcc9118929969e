//! Logger: `logger://`, which carries no configuration at all.

use url::Url;

use crate::{
    error::ConfigError,
    placement::{UrlBuilder, UrlPlacement},
    query::set_config_props_from_query,
    resolver::Resolver,
    schema::{FieldDeclarations, ServiceConfig},
};


#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct LoggerConfig;

impl ServiceConfig for LoggerConfig {
    fn declare_fields(_fields: &mut FieldDeclarations<Self>) {}
}

impl UrlPlacement for LoggerConfig {
    const SCHEME: &'static str = "logger";

    fn decode_url(resolver: &mut Resolver<&mut Self>, url: &Url) -> Result<(), ConfigError> {
        let leftovers = set_config_props_from_query(resolver, url.query_pairs())?;
        if let Some((key, _)) = leftovers.into_iter().next() {
            return Err(ConfigError::UnknownKey { key });
        }

        Ok(())
    }

    fn encode_url(_resolver: &Resolver<&Self>) -> Result<Url, ConfigError> {
        UrlBuilder::new(Self::SCHEME).build()
    }
}
