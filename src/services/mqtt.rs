//! MQTT: `mqtt://[user[:password]@]host[:port]/topic?qos=...`

use url::Url;

use crate::{
    enums::{EnumRegistry, NamedEnum},
    error::ConfigError,
    placement::{url_password, url_path_segments, url_user, UrlBuilder, UrlPlacement},
    query::{build_query, set_config_props_from_query},
    resolver::Resolver,
    schema::{FieldDeclarations, ServiceConfig, UrlPart},
};


/// MQTT delivery guarantee.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum QoS {
    #[default]
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

impl QoS {
    pub fn formatter() -> NamedEnum {
        NamedEnum::new(["AtMostOnce", "AtLeastOnce", "ExactlyOnce"])
            .with_alias("0", 0)
            .with_alias("1", 1)
            .with_alias("2", 2)
            .with_alias("at_most_once", 0)
            .with_alias("at_least_once", 1)
            .with_alias("exactly_once", 2)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        match ordinal {
            1 => QoS::AtLeastOnce,
            2 => QoS::ExactlyOnce,
            _ => QoS::AtMostOnce,
        }
    }
}


#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct MqttConfig {
    pub host: String,

    pub port: u16,

    /// Topic to publish to; may itself contain `/`.
    pub topic: String,

    pub username: String,

    pub password: String,

    pub client_id: String,

    pub qos: QoS,

    /// Ask the broker to keep the last message on the topic.
    pub retained: bool,

    pub clean_session: bool,

    pub disable_tls: bool,

    pub disable_tls_verification: bool,
}

impl ServiceConfig for MqttConfig {
    fn declare_fields(fields: &mut FieldDeclarations<Self>) {
        fields
            .text("Host", |c| &c.host, |c, v| c.host = v)
            .url(UrlPart::Host)
            .default("localhost")
            .description("MQTT broker hostname");

        fields
            .integer("Port", |c| i64::from(c.port), |c, v| c.port = v as u16)
            .url(UrlPart::Port)
            .default("1883")
            .range(1..=i64::from(u16::MAX))
            .description("MQTT broker port");

        fields
            .text("Topic", |c| &c.topic, |c, v| c.topic = v)
            .url(UrlPart::PATH)
            .required()
            .description("Target topic name");

        fields
            .text("Username", |c| &c.username, |c, v| c.username = v)
            .url(UrlPart::User)
            .description("Auth username");

        fields
            .text("Password", |c| &c.password, |c, v| c.password = v)
            .url(UrlPart::Password)
            .description("Auth password");

        fields
            .text("ClientID", |c| &c.client_id, |c, v| c.client_id = v)
            .key("clientid")
            .default("urlconf")
            .description("MQTT client identifier");

        fields
            .enumeration("QoS", |c| c.qos as i64, |c, v| c.qos = QoS::from_ordinal(v))
            .key("qos")
            .default("0")
            .description("Quality of Service level");

        fields
            .boolean("Retained", |c| c.retained, |c, v| c.retained = v)
            .key("retained")
            .default("no")
            .description("Retain message on broker");

        fields
            .boolean("CleanSession", |c| c.clean_session, |c, v| c.clean_session = v)
            .key("cleansession")
            .default("yes")
            .description("Start with a clean session");

        fields
            .boolean("DisableTLS", |c| c.disable_tls, |c, v| c.disable_tls = v)
            .key("disabletls")
            .default("no")
            .description("Disable TLS encryption");

        fields
            .boolean(
                "DisableTLSVerification",
                |c| c.disable_tls_verification,
                |c, v| c.disable_tls_verification = v,
            )
            .key("disabletlsverification")
            .default("no")
            .description("Disable TLS certificate verification");
    }

    fn enums() -> EnumRegistry {
        EnumRegistry::new().register("QoS", QoS::formatter())
    }
}

impl UrlPlacement for MqttConfig {
    const SCHEME: &'static str = "mqtt";

    fn decode_url(resolver: &mut Resolver<&mut Self>, url: &Url) -> Result<(), ConfigError> {
        let username = url_user(url)?;
        let password = url_password(url)?;
        let topic = url_path_segments(url)?.join("/");

        let config = resolver.config_mut();
        config.username = username;
        config.password = password;
        config.topic = topic;

        if let Some(host) = url.host_str().filter(|host| !host.is_empty()) {
            config.host = host.to_string();
        }
        if let Some(port) = url.port() {
            // Goes through the resolver so that the port range applies.
            resolver.set("Port", &port.to_string())?;
        }

        let leftovers = set_config_props_from_query(resolver, url.query_pairs())?;
        if let Some((key, _)) = leftovers.into_iter().next() {
            return Err(ConfigError::UnknownKey { key });
        }

        Ok(())
    }

    fn encode_url(resolver: &Resolver<&Self>) -> Result<Url, ConfigError> {
        let config = resolver.config();

        UrlBuilder::new(Self::SCHEME)
            .user(config.username.as_str())
            .password(config.password.as_str())
            .host(config.host.as_str())
            .port(Some(config.port))
            .segments(config.topic.split('/'))
            .query(build_query(resolver))
            .build()
    }
}
