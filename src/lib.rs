//! Declarative configuration for URL-addressed notification services.
//!
//! A service describes its configuration record once, as a [`ServiceConfig`]
//! schema: every field with its kind, query key, default and URL placement.
//! From that schema the crate derives everything else: decoding a service URL
//! into a typed record, re-encoding it canonically, applying send-time params
//! and rendering human-readable documentation.
//!
//! The main entry points are [`UrlPlacement::from_url`] and
//! [`UrlPlacement::to_url`] for a single service, and [`ServiceRouter`] for
//! dispatching on the URL scheme.

pub mod docs;
pub mod enums;
pub mod error;
pub mod placement;
pub mod query;
pub mod resolver;
pub mod schema;
pub mod services;

pub use docs::{ConsoleRenderer, MarkdownRenderer, SchemaRenderer};
pub use enums::{EnumFormatter, EnumRegistry, NamedEnum};
pub use error::{ConfigError, SchemaError};
pub use placement::{UrlBuilder, UrlPlacement};
pub use query::{
    build_query,
    build_query_with_custom_fields,
    escape_key,
    set_config_props_from_query,
    unescape_key,
    QueryPairs,
};
pub use resolver::{Params, Resolver};
pub use schema::{
    ConfigSchema,
    FieldDeclaration,
    FieldDeclarations,
    FieldInfo,
    FieldKind,
    FieldValue,
    ServiceConfig,
    UrlPart,
};
pub use services::{FieldListing, ServiceEntry, ServiceRouter};
