//! Error types shared by the schema, resolver, query codec and URL placement layers.

use miette::Diagnostic;
use thiserror::Error;

use crate::schema::UrlPart;


/// An authoring defect in a configuration type's field declarations.
///
/// These surface the first time a schema is extracted for a type and
/// are never recoverable: the same declarations fail identically every time.
#[derive(Error, Diagnostic, Clone, PartialEq, Eq, Debug)]
pub enum SchemaError {
    #[error("{config}: a field was declared with an empty name")]
    #[diagnostic(code(urlconf::schema::empty_field_name))]
    EmptyFieldName { config: &'static str },

    #[error("{config}: field name `{field}` is declared more than once")]
    #[diagnostic(code(urlconf::schema::duplicate_field_name))]
    DuplicateFieldName {
        config: &'static str,
        field: &'static str,
    },

    #[error("{config}: query key `{key}` is claimed by both `{first}` and `{second}`")]
    #[diagnostic(code(urlconf::schema::duplicate_query_key))]
    DuplicateQueryKey {
        config: &'static str,
        key: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("{config}: URL part `{part}` is claimed by both `{first}` and `{second}`")]
    #[diagnostic(code(urlconf::schema::duplicate_url_part))]
    DuplicateUrlPart {
        config: &'static str,
        part: UrlPart,
        first: &'static str,
        second: &'static str,
    },

    #[error("{config}: enum field `{field}` has no registered formatter")]
    #[diagnostic(
        code(urlconf::schema::missing_enum_formatter),
        help("register a formatter for the field name in `ServiceConfig::enums`")
    )]
    MissingEnumFormatter {
        config: &'static str,
        field: &'static str,
    },

    #[error("{config}: default `{default}` of field `{field}` is invalid: {reason}")]
    #[diagnostic(code(urlconf::schema::invalid_default))]
    InvalidDefault {
        config: &'static str,
        field: &'static str,
        default: &'static str,
        reason: String,
    },
}


/// Errors raised while reading, writing, decoding or validating a configuration.
#[derive(Error, Diagnostic, Clone, PartialEq, Eq, Debug)]
pub enum ConfigError {
    #[error("`{key}` is not a valid config key")]
    #[diagnostic(code(urlconf::unknown_key))]
    UnknownKey { key: String },

    #[error("invalid value `{value}` for field `{field}`: {reason}")]
    #[diagnostic(code(urlconf::validation))]
    Validation {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("required field `{field}` is missing")]
    #[diagnostic(code(urlconf::required_field))]
    RequiredField { field: &'static str },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    #[error("invalid service URL `{url}`: {reason}")]
    #[diagnostic(code(urlconf::invalid_url))]
    InvalidUrl { url: String, reason: String },

    #[error("expected a `{expected}://` URL, got `{found}://`")]
    #[diagnostic(code(urlconf::scheme_mismatch))]
    SchemeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("no service is registered for the `{scheme}` scheme")]
    #[diagnostic(
        code(urlconf::unsupported_scheme),
        help("run `urlconf services` to list the supported schemes")
    )]
    UnsupportedScheme { scheme: String },
}

impl ConfigError {
    pub(crate) fn invalid_url<U, R>(url: U, reason: R) -> Self
    where
        U: Into<String>,
        R: ToString,
    {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
