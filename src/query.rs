//! Encodes a resolver's query fields into ordered key/value pairs and decodes
//! query pairs back through a resolver.

use std::{
    collections::HashSet,
    ops::{Deref, DerefMut},
};

use tracing::debug;
use url::form_urlencoded;

use crate::{error::ConfigError, resolver::Resolver, schema::ServiceConfig};


/// Ordered query key/value pairs.
pub type QueryPairs = Vec<(String, String)>;

/// Prefix marking a custom query key that would otherwise collide with a schema key.
pub const ESCAPE_PREFIX: &str = "__";


/// Emits every query field whose current value differs from its default,
/// in declaration order.
pub fn build_query<B>(resolver: &Resolver<B>) -> QueryPairs
where
    B: Deref,
    B::Target: ServiceConfig,
{
    let schema = resolver.schema();

    schema
        .entries()
        .filter(|field| !resolver.holds_default(field))
        .filter_map(|field| {
            let key = field.info.key?;
            Some((
                key.to_string(),
                schema.render(field, &resolver.value_of(field)),
            ))
        })
        .collect()
}

/// [`build_query`] followed by `passthrough`. A passthrough pair whose key
/// matches an emitted pair (ignoring ASCII case) replaces that pair's value.
pub fn build_query_with_custom_fields<B, I, K, V>(
    resolver: &Resolver<B>,
    passthrough: I,
) -> QueryPairs
where
    B: Deref,
    B::Target: ServiceConfig,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut pairs = build_query(resolver);

    for (key, value) in passthrough {
        let (key, value) = (key.into(), value.into());

        match pairs
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => pairs.push((key, value)),
        }
    }

    pairs
}

/// Assigns every query pair through [`Resolver::set_query_prop`].
///
/// Only the first occurrence of a key is used. Pairs whose key matches no
/// field are not an error here: they are returned, unescaped, as leftovers
/// for the caller to treat as custom data. Coercion failures abort.
pub fn set_config_props_from_query<B, I, K, V>(
    resolver: &mut Resolver<B>,
    query: I,
) -> Result<QueryPairs, ConfigError>
where
    B: DerefMut,
    B::Target: ServiceConfig,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut seen_keys = HashSet::new();
    let mut leftovers = QueryPairs::new();

    for (key, value) in query {
        let (key, value) = (key.as_ref(), value.as_ref());

        if !seen_keys.insert(key.to_ascii_lowercase()) {
            continue;
        }

        match resolver.set_query_prop(key, value) {
            Ok(()) => {}
            Err(ConfigError::UnknownKey { .. }) => {
                leftovers.push((unescape_key(key).to_string(), value.to_string()));
            }
            Err(error) => return Err(error),
        }
    }

    if !leftovers.is_empty() {
        debug!(
            config = resolver.schema().config_name(),
            count = leftovers.len(),
            "Query contained keys that are not part of the schema."
        );
    }

    Ok(leftovers)
}


/// Escapes a custom key so it can not be mistaken for a schema key.
pub fn escape_key(key: &str) -> String {
    format!("{}{}", ESCAPE_PREFIX, key)
}

/// Strips a single escape prefix, if present.
pub fn unescape_key(key: &str) -> &str {
    key.strip_prefix(ESCAPE_PREFIX).unwrap_or(key)
}


/// Serializes pairs as `application/x-www-form-urlencoded` text, keeping their order.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Parses `application/x-www-form-urlencoded` text into ordered pairs.
pub fn parse_query(raw: &str) -> QueryPairs {
    form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDeclarations, UrlPart};

    #[derive(Clone, PartialEq, Default, Debug)]
    struct Hook {
        host: String,
        title: String,
        retries: i64,
        tags: Vec<String>,
        verbose: bool,
    }

    impl ServiceConfig for Hook {
        fn declare_fields(fields: &mut FieldDeclarations<Self>) {
            fields
                .text("Host", |c| &c.host, |c, v| c.host = v)
                .url(UrlPart::Host);

            fields
                .text("Title", |c| &c.title, |c, v| c.title = v)
                .key("title")
                .default("");

            fields
                .integer("Retries", |c| c.retries, |c, v| c.retries = v)
                .key("retries")
                .default("3");

            fields
                .list("Tags", |c| &c.tags, |c, v| c.tags = v)
                .key("tags");

            fields
                .boolean("Verbose", |c| c.verbose, |c, v| c.verbose = v)
                .key("verbose")
                .default("no");
        }
    }

    fn pairs(raw: &[(&str, &str)]) -> QueryPairs {
        raw.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn defaulted() -> Hook {
        let mut hook = Hook::default();
        Resolver::new(&mut hook).unwrap().set_default_props();
        hook
    }

    #[test]
    fn defaults_are_not_emitted() {
        let hook = defaulted();

        assert!(build_query(&Resolver::new(&hook).unwrap()).is_empty());
    }

    #[test]
    fn non_default_values_are_emitted_in_declaration_order() {
        let mut hook = defaulted();
        hook.verbose = true;
        hook.title = "Hello".to_string();
        hook.tags = vec!["a".to_string(), "b".to_string()];
        hook.host = "ignored.example".to_string();

        assert_eq!(
            build_query(&Resolver::new(&hook).unwrap()),
            pairs(&[("title", "Hello"), ("tags", "a,b"), ("verbose", "yes")])
        );
    }

    #[test]
    fn a_field_set_to_zero_differs_from_a_non_zero_default() {
        let mut hook = defaulted();
        hook.retries = 0;

        assert_eq!(
            build_query(&Resolver::new(&hook).unwrap()),
            pairs(&[("retries", "0")])
        );
    }

    #[test]
    fn passthrough_pairs_are_appended_and_win_collisions() {
        let mut hook = defaulted();
        hook.title = "From config".to_string();

        let query = build_query_with_custom_fields(
            &Resolver::new(&hook).unwrap(),
            [("Title", "From passthrough"), ("channel", "ops")],
        );

        assert_eq!(
            query,
            pairs(&[("title", "From passthrough"), ("channel", "ops")])
        );
    }

    #[test]
    fn unknown_keys_become_leftovers() {
        let mut hook = defaulted();

        let leftovers = set_config_props_from_query(
            &mut Resolver::new(&mut hook).unwrap(),
            pairs(&[("title", "Hi"), ("channel", "ops"), ("__verbose", "x")]),
        )
        .unwrap();

        assert_eq!(hook.title, "Hi");
        assert_eq!(leftovers, pairs(&[("channel", "ops"), ("verbose", "x")]));
    }

    #[test]
    fn placement_field_names_are_leftovers_in_a_query() {
        let mut hook = defaulted();
        hook.host = "hooks.example".to_string();

        let leftovers = set_config_props_from_query(
            &mut Resolver::new(&mut hook).unwrap(),
            pairs(&[("host", "elsewhere.example"), ("HOST", "again")]),
        )
        .unwrap();

        assert_eq!(hook.host, "hooks.example");
        assert_eq!(leftovers, pairs(&[("host", "elsewhere.example")]));

        // Direct assignment still reaches the field by name.
        Resolver::new(&mut hook).unwrap().set("host", "direct.example").unwrap();
        assert_eq!(hook.host, "direct.example");
    }

    #[test]
    fn unknown_keys_are_fatal_through_set() {
        let mut hook = defaulted();

        assert!(matches!(
            Resolver::new(&mut hook).unwrap().set("channel", "ops"),
            Err(ConfigError::UnknownKey { .. })
        ));
    }

    #[test]
    fn only_the_first_value_of_a_key_is_used() {
        let mut hook = defaulted();

        set_config_props_from_query(
            &mut Resolver::new(&mut hook).unwrap(),
            pairs(&[("title", "first"), ("TITLE", "second"), ("title", "third")]),
        )
        .unwrap();

        assert_eq!(hook.title, "first");
    }

    #[test]
    fn coercion_failures_abort_decoding() {
        let mut hook = defaulted();

        let result = set_config_props_from_query(
            &mut Resolver::new(&mut hook).unwrap(),
            pairs(&[("retries", "many")]),
        );

        assert!(matches!(
            result,
            Err(ConfigError::Validation { field: "Retries", .. })
        ));
    }

    #[test]
    fn decoding_what_was_encoded_restores_the_config() {
        let mut original = defaulted();
        original.title = "Hello world & more".to_string();
        original.retries = -1;
        original.tags = vec!["x".to_string(), "y z".to_string()];

        let encoded = encode_query(&build_query(&Resolver::new(&original).unwrap()));

        let mut decoded = defaulted();
        let leftovers = set_config_props_from_query(
            &mut Resolver::new(&mut decoded).unwrap(),
            parse_query(&encoded),
        )
        .unwrap();

        assert!(leftovers.is_empty());
        assert_eq!(decoded, original);
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_key("title"), "__title");
        assert_eq!(unescape_key("__title"), "title");
        assert_eq!(unescape_key("____title"), "__title");
        assert_eq!(unescape_key("title"), "title");
    }

    #[test]
    fn query_text() {
        let query = pairs(&[("title", "a b"), ("tags", "x,y")]);

        assert_eq!(encode_query(&query), "title=a+b&tags=x%2Cy");
        assert_eq!(parse_query("title=a+b&tags=x%2Cy"), query);
        assert!(parse_query("").is_empty());
    }
}
