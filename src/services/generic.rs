//! Generic webhook: `generic://host[:port]/path?custom=query&@Header=value&$extra=data`
//!
//! Query pairs that address no schema field are kept as the webhook's own
//! query. Keys prefixed with `@` become request headers, keys prefixed with
//! `$` become extra payload data.

use std::collections::BTreeMap;

use url::Url;

use crate::{
    error::ConfigError,
    placement::{url_host_and_port, url_path_segments, UrlBuilder, UrlPlacement},
    query::{build_query_with_custom_fields, escape_key, set_config_props_from_query, QueryPairs},
    resolver::Resolver,
    schema::{FieldDeclarations, ServiceConfig, UrlPart},
};


const HEADER_PREFIX: char = '@';
const EXTRA_PREFIX: char = '$';


#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct GenericConfig {
    /// Webhook host, optionally with `:port`.
    pub host: String,

    pub path: String,

    /// Webhook query pairs that are not part of the schema.
    pub custom_query: QueryPairs,

    /// Request headers, keyed by their normalized name (e.g. `Content-Type`).
    pub headers: BTreeMap<String, String>,

    /// Additional payload fields.
    pub extra_data: BTreeMap<String, String>,

    pub content_type: String,

    pub disable_tls: bool,

    pub template: String,

    pub title: String,

    pub title_key: String,

    pub message_key: String,

    pub request_method: String,
}

impl ServiceConfig for GenericConfig {
    fn declare_fields(fields: &mut FieldDeclarations<Self>) {
        fields
            .text("Host", |c| &c.host, |c, v| c.host = v)
            .url(UrlPart::Host)
            .url(UrlPart::Port)
            .required()
            .description("Webhook host (and optionally port)");

        fields
            .text("Path", |c| &c.path, |c, v| c.path = v)
            .url(UrlPart::PATH)
            .description("Webhook path");

        fields
            .text("ContentType", |c| &c.content_type, |c, v| c.content_type = v)
            .key("contenttype")
            .default("application/json")
            .description("The value of the Content-Type header");

        fields
            .boolean("DisableTLS", |c| c.disable_tls, |c, v| c.disable_tls = v)
            .key("disabletls")
            .default("No");

        fields
            .text("Template", |c| &c.template, |c, v| c.template = v)
            .key("template")
            .description("The template used for creating the request payload");

        fields
            .text("Title", |c| &c.title, |c, v| c.title = v)
            .key("title")
            .default("");

        fields
            .text("TitleKey", |c| &c.title_key, |c, v| c.title_key = v)
            .key("titlekey")
            .default("title")
            .description("The key that will be used for the title value");

        fields
            .text("MessageKey", |c| &c.message_key, |c, v| c.message_key = v)
            .key("messagekey")
            .default("message")
            .description("The key that will be used for the message value");

        fields
            .text("RequestMethod", |c| &c.request_method, |c, v| c.request_method = v)
            .key("method")
            .default("POST");
    }
}

impl UrlPlacement for GenericConfig {
    const SCHEME: &'static str = "generic";

    fn decode_url(resolver: &mut Resolver<&mut Self>, url: &Url) -> Result<(), ConfigError> {
        let path = url_path_segments(url)?.join("/");

        let mut headers = BTreeMap::new();
        let mut extra_data = BTreeMap::new();
        let mut query = Vec::new();

        for (key, value) in url.query_pairs().into_owned() {
            let header = key.strip_prefix(HEADER_PREFIX).filter(|name| !name.is_empty());
            let extra = key.strip_prefix(EXTRA_PREFIX).filter(|name| !name.is_empty());

            if let Some(name) = header {
                headers.entry(normalized_header_key(name)).or_insert(value);
            } else if let Some(name) = extra {
                extra_data.entry(name.to_string()).or_insert(value);
            } else {
                query.push((key, value));
            }
        }

        let custom_query = set_config_props_from_query(resolver, query)?;

        let config = resolver.config_mut();
        config.host = url_host_and_port(url);
        config.path = path;
        config.custom_query = custom_query;
        config.headers = headers;
        config.extra_data = extra_data;

        Ok(())
    }

    fn encode_url(resolver: &Resolver<&Self>) -> Result<Url, ConfigError> {
        let config = resolver.config();
        let schema = resolver.schema();

        // Custom keys that a schema field would claim on the way back in get escaped.
        let passthrough = config.custom_query.iter().map(|(key, value)| {
            let key = if schema.field_for_query_key(key).is_some() {
                escape_key(key)
            } else {
                key.clone()
            };

            (key, value.clone())
        });

        let mut query = build_query_with_custom_fields(resolver, passthrough);
        query.extend(
            config
                .headers
                .iter()
                .map(|(key, value)| (format!("{}{}", HEADER_PREFIX, key), value.clone())),
        );
        query.extend(
            config
                .extra_data
                .iter()
                .map(|(key, value)| (format!("{}{}", EXTRA_PREFIX, key), value.clone())),
        );

        UrlBuilder::new(Self::SCHEME)
            .host(config.host.as_str())
            .segments(config.path.split('/'))
            .query(query)
            .build()
    }
}

impl GenericConfig {
    /// The URL notifications are sent to: the configured host and path with
    /// the custom query, over https unless TLS is disabled.
    pub fn webhook_url(&self) -> Result<Url, ConfigError> {
        let scheme = if self.disable_tls { "http" } else { "https" };

        UrlBuilder::new(scheme)
            .host(self.host.as_str())
            .segments(self.path.split('/'))
            .query(self.custom_query.clone())
            .build()
    }
}


/// Converts a header key to its canonical form, e.g. `contentType` to `Content-Type`.
fn normalized_header_key(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len() * 2);
    let mut previous: Option<char> = None;

    for character in key.chars() {
        let starts_word = matches!(previous, None | Some('-'));

        if character.is_ascii_uppercase() {
            if !starts_word {
                normalized.push('-');
            }
            normalized.push(character);
        } else if starts_word {
            normalized.push(character.to_ascii_uppercase());
        } else {
            normalized.push(character);
        }

        previous = Some(character);
    }

    normalized
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_schema_props_from_custom_query() {
        let config = GenericConfig::from_url_str(
            "generic://hooks.example:8443/api/notify?token=abc&title=Hey&method=PUT",
        )
        .unwrap();

        assert_eq!(config.host, "hooks.example:8443");
        assert_eq!(config.path, "api/notify");
        assert_eq!(config.title, "Hey");
        assert_eq!(config.request_method, "PUT");
        assert_eq!(
            config.custom_query,
            vec![("token".to_string(), "abc".to_string())]
        );
        assert_eq!(config.content_type, "application/json");
    }

    #[test]
    fn headers_and_extra_data_are_extracted() {
        let config = GenericConfig::from_url_str(
            "generic://hooks.example/?@authorization=Bearer%20x&@contentType=text&$source=ci",
        )
        .unwrap();

        assert_eq!(
            config.headers,
            BTreeMap::from([
                ("Authorization".to_string(), "Bearer x".to_string()),
                ("Content-Type".to_string(), "text".to_string()),
            ])
        );
        assert_eq!(
            config.extra_data,
            BTreeMap::from([("source".to_string(), "ci".to_string())])
        );
        assert!(config.custom_query.is_empty());
    }

    #[test]
    fn colliding_custom_keys_are_escaped_and_survive_a_round_trip() {
        let config =
            GenericConfig::from_url_str("generic://hooks.example/hook?__title=custom&title=Real")
                .unwrap();

        assert_eq!(config.title, "Real");
        assert_eq!(
            config.custom_query,
            vec![("title".to_string(), "custom".to_string())]
        );

        let url = config.to_url().unwrap();
        assert_eq!(
            url.as_str(),
            "generic://hooks.example/hook?title=Real&__title=custom"
        );
        assert_eq!(GenericConfig::from_url(&url).unwrap(), config);

        assert_eq!(
            config.webhook_url().unwrap().as_str(),
            "https://hooks.example/hook?title=custom"
        );
    }

    #[test]
    fn webhook_params_named_like_url_fields_are_kept() {
        let config =
            GenericConfig::from_url_str("generic://hooks.example/api?path=reports&host=x").unwrap();

        assert_eq!(config.host, "hooks.example");
        assert_eq!(config.path, "api");
        assert_eq!(
            config.custom_query,
            vec![
                ("path".to_string(), "reports".to_string()),
                ("host".to_string(), "x".to_string()),
            ]
        );

        assert_eq!(
            config.webhook_url().unwrap().as_str(),
            "https://hooks.example/api?path=reports&host=x"
        );
        assert_eq!(
            config.to_url().unwrap().as_str(),
            "generic://hooks.example/api?path=reports&host=x"
        );
    }

    #[test]
    fn webhook_url_honours_disable_tls() {
        let config = GenericConfig::from_url_str("generic://hooks.example/hook?disabletls=yes&id=7")
            .unwrap();

        assert_eq!(
            config.webhook_url().unwrap().as_str(),
            "http://hooks.example/hook?id=7"
        );
    }

    #[test]
    fn round_trips_headers_and_extra_data() {
        let config = GenericConfig::from_url_str(
            "generic://hooks.example/hook?@X-Trace=1&$env=prod&template=json",
        )
        .unwrap();

        let decoded = GenericConfig::from_url(&config.to_url().unwrap()).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn header_keys_are_normalized() {
        assert_eq!(normalized_header_key("contentType"), "Content-Type");
        assert_eq!(normalized_header_key("x-api-key"), "X-Api-Key");
        assert_eq!(normalized_header_key("X-Trace"), "X-Trace");
    }
}
