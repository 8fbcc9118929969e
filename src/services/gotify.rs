//! Gotify: `gotify://host[:port][/subpath]/token?priority=...`

use url::Url;

use crate::{
    error::ConfigError,
    placement::{url_host_and_port, url_path_segments, UrlBuilder, UrlPlacement},
    query::{build_query, set_config_props_from_query},
    resolver::Resolver,
    schema::{FieldDeclarations, ServiceConfig, UrlPart},
};


#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct GotifyConfig {
    /// Application token, always the last path segment.
    pub token: String,

    /// Server host, optionally with `:port`.
    pub host: String,

    /// Subpath of the Gotify installation, without leading or trailing slashes.
    pub path: String,

    pub priority: i64,

    pub title: String,

    pub disable_tls: bool,

    /// Send the token in a header instead of the request URL.
    pub use_header: bool,
}

impl ServiceConfig for GotifyConfig {
    fn declare_fields(fields: &mut FieldDeclarations<Self>) {
        fields
            .text("Token", |c| &c.token, |c, v| c.token = v)
            .url(UrlPart::Path(2))
            .required()
            .description("Application token");

        fields
            .text("Host", |c| &c.host, |c, v| c.host = v)
            .url(UrlPart::Host)
            .url(UrlPart::Port)
            .required()
            .description("Server hostname (and optionally port)");

        fields
            .text("Path", |c| &c.path, |c, v| c.path = v)
            .url(UrlPart::Path(1))
            .description("Server subpath");

        fields
            .integer("Priority", |c| c.priority, |c, v| c.priority = v)
            .key("priority")
            .default("0")
            .range(-2..=10);

        fields
            .text("Title", |c| &c.title, |c, v| c.title = v)
            .key("title")
            .default("Notification");

        fields
            .boolean("DisableTLS", |c| c.disable_tls, |c, v| c.disable_tls = v)
            .key("disabletls")
            .default("No");

        fields
            .boolean("UseHeader", |c| c.use_header, |c, v| c.use_header = v)
            .key("useheader")
            .default("No")
            .description("Enable header-based authentication");
    }
}

impl UrlPlacement for GotifyConfig {
    const SCHEME: &'static str = "gotify";

    fn decode_url(resolver: &mut Resolver<&mut Self>, url: &Url) -> Result<(), ConfigError> {
        let mut segments = url_path_segments(url)?;

        let config = resolver.config_mut();
        config.host = url_host_and_port(url);
        config.token = segments.pop().unwrap_or_default();
        config.path = segments.join("/");

        let leftovers = set_config_props_from_query(resolver, url.query_pairs())?;
        if let Some((key, _)) = leftovers.into_iter().next() {
            return Err(ConfigError::UnknownKey { key });
        }

        Ok(())
    }

    fn encode_url(resolver: &Resolver<&Self>) -> Result<Url, ConfigError> {
        let config = resolver.config();

        UrlBuilder::new(Self::SCHEME)
            .host(config.host.as_str())
            .segments(config.path.split('/'))
            .segment(config.token.as_str())
            .query(build_query(resolver))
            .build()
    }
}

impl GotifyConfig {
    /// The message endpoint of the Gotify server.
    pub fn message_endpoint(&self) -> Result<Url, ConfigError> {
        let scheme = if self.disable_tls { "http" } else { "https" };

        let mut builder = UrlBuilder::new(scheme)
            .host(self.host.as_str())
            .segments(self.path.split('/'))
            .segment("message");

        if !self.use_header {
            builder = builder.query(vec![("token".to_string(), self.token.clone())]);
        }

        builder.build()
    }
}
