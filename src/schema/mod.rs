//! Schema extraction: turns a configuration type's declared fields into an
//! ordered, validated [`ConfigSchema`].
//!
//! # Declaring a schema
//! A configuration type implements [`ServiceConfig`] and lists its fields in
//! [`ServiceConfig::declare_fields`]. Every field gets a pair of typed
//! accessors, written as non-capturing closures, and a chain of metadata:
//!
//! ```
//! use urlconf::{FieldDeclarations, ServiceConfig, UrlPart};
//!
//! #[derive(Default)]
//! struct Example {
//!     host: String,
//!     verbose: bool,
//! }
//!
//! impl ServiceConfig for Example {
//!     fn declare_fields(fields: &mut FieldDeclarations<Self>) {
//!         fields
//!             .text("Host", |c| &c.host, |c, v| c.host = v)
//!             .url(UrlPart::Host)
//!             .required();
//!
//!         fields
//!             .boolean("Verbose", |c| c.verbose, |c, v| c.verbose = v)
//!             .key("verbose")
//!             .default("no");
//!     }
//! }
//! ```
//!
//! Declaration order is significant: it is the order in which query pairs are
//! emitted, params are applied and required fields are checked.
//!
//! # Caching
//! [`ConfigSchema::of`] memoizes extracted schemas per type for the lifetime of the
//! process. Extraction is a pure function of the type, so two threads racing on
//! the first extraction simply produce the same schema twice.

use std::{
    any::{type_name, Any, TypeId},
    collections::BTreeMap,
    fmt,
    sync::Arc,
};

use parking_lot::RwLock;
use tracing::{debug, trace};

pub use self::field::{FieldDeclaration, FieldInfo, FieldKind, FieldValue, UrlPart};
pub(crate) use self::field::{Accessor, FieldSchema};
use crate::{
    enums::{EnumFormatter, EnumRegistry},
    error::{ConfigError, SchemaError},
};

pub mod coercion;
mod field;


/// A configuration record whose fields can be bound to a URL.
pub trait ServiceConfig: Sized + 'static {
    /// Declares every field of the record, in order.
    fn declare_fields(fields: &mut FieldDeclarations<Self>);

    /// Formatters for the record's enum fields, keyed by field name.
    fn enums() -> EnumRegistry {
        EnumRegistry::default()
    }
}


/// Collects field declarations for a configuration type `C`.
pub struct FieldDeclarations<C> {
    fields: Vec<(FieldInfo, Accessor<C>)>,
}

impl<C> FieldDeclarations<C> {
    fn new() -> Self {
        Self { fields: Vec::new() }
    }

    fn push(&mut self, info: FieldInfo, accessor: Accessor<C>) -> FieldDeclaration<'_> {
        self.fields.push((info, accessor));

        // PANIC SAFETY: we just pushed an element.
        let (info, _) = self.fields.last_mut().unwrap();
        FieldDeclaration::new(info)
    }

    pub fn text(
        &mut self,
        name: &'static str,
        get: fn(&C) -> &str,
        set: fn(&mut C, String),
    ) -> FieldDeclaration<'_> {
        self.push(
            FieldInfo::new(name, FieldKind::Text),
            Accessor::Text(get, set),
        )
    }

    pub fn boolean(
        &mut self,
        name: &'static str,
        get: fn(&C) -> bool,
        set: fn(&mut C, bool),
    ) -> FieldDeclaration<'_> {
        self.push(
            FieldInfo::new(name, FieldKind::Bool),
            Accessor::Bool(get, set),
        )
    }

    pub fn integer(
        &mut self,
        name: &'static str,
        get: fn(&C) -> i64,
        set: fn(&mut C, i64),
    ) -> FieldDeclaration<'_> {
        self.push(
            FieldInfo::new(name, FieldKind::Int),
            Accessor::Int(get, set),
        )
    }

    pub fn list(
        &mut self,
        name: &'static str,
        get: fn(&C) -> &[String],
        set: fn(&mut C, Vec<String>),
    ) -> FieldDeclaration<'_> {
        self.push(
            FieldInfo::new(name, FieldKind::List),
            Accessor::List(get, set),
        )
    }

    /// Declares an enum field. The accessors work on ordinals; `set` is only
    /// ever handed ordinals produced by the field's registered formatter.
    pub fn enumeration(
        &mut self,
        name: &'static str,
        get: fn(&C) -> i64,
        set: fn(&mut C, i64),
    ) -> FieldDeclaration<'_> {
        self.push(
            FieldInfo::new(name, FieldKind::Enum),
            Accessor::Enum(get, set),
        )
    }
}


/// The ordered, validated field table of a configuration type.
pub struct ConfigSchema<C> {
    config_name: &'static str,

    fields: Vec<FieldSchema<C>>,

    enums: EnumRegistry,
}

type SchemaCache = BTreeMap<TypeId, Arc<dyn Any + Send + Sync>>;

static SCHEMA_CACHE: RwLock<SchemaCache> = parking_lot::const_rwlock(BTreeMap::new());


impl<C: ServiceConfig> ConfigSchema<C> {
    /// Returns the schema of `C`, extracting and caching it on first use.
    pub fn of() -> Result<Arc<Self>, SchemaError> {
        let type_id = TypeId::of::<C>();

        let cached = SCHEMA_CACHE.read().get(&type_id).cloned();
        if let Some(schema) = cached.and_then(|cached| cached.downcast::<Self>().ok()) {
            trace!(config = type_name::<C>(), "Schema cache hit.");
            return Ok(schema);
        }

        let schema = Arc::new(Self::extract()?);

        let erased: Arc<dyn Any + Send + Sync> = schema.clone();
        SCHEMA_CACHE.write().entry(type_id).or_insert(erased);

        Ok(schema)
    }

    /// Extracts the schema of `C` without consulting the cache.
    pub fn extract() -> Result<Self, SchemaError> {
        let config_name = short_type_name::<C>();

        let mut declarations = FieldDeclarations::new();
        C::declare_fields(&mut declarations);

        let enums = C::enums();

        let mut fields: Vec<FieldSchema<C>> = Vec::with_capacity(declarations.fields.len());
        for (mut info, accessor) in declarations.fields {
            check_field_against_previous(config_name, &info, &fields)?;

            let formatter = enums.get(info.name);
            if info.kind == FieldKind::Enum {
                let formatter = formatter.ok_or(SchemaError::MissingEnumFormatter {
                    config: config_name,
                    field: info.name,
                })?;

                info.enum_names = formatter.names().to_vec();
            }

            let default_value = match info.default {
                Some(default) => coercion::parse_value(&info, default, formatter).map_err(
                    |reason| SchemaError::InvalidDefault {
                        config: config_name,
                        field: info.name,
                        default,
                        reason,
                    },
                )?,
                None => info.kind.zero_value(),
            };

            fields.push(FieldSchema {
                info,
                accessor,
                default_value,
            });
        }

        debug!(
            config = config_name,
            fields = fields.len(),
            "Extracted configuration schema."
        );

        Ok(Self {
            config_name,
            fields,
            enums,
        })
    }
}

impl<C> ConfigSchema<C> {
    /// Short name of the configuration type, used in diagnostics.
    pub fn config_name(&self) -> &'static str {
        self.config_name
    }

    /// All fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldInfo> + '_ {
        self.fields.iter().map(|field| &field.info)
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields().find(|info| info.name == name)
    }

    /// Fields that carry a query key, in declaration order.
    pub fn query_fields(&self) -> impl Iterator<Item = &FieldInfo> + '_ {
        self.fields().filter(|info| info.is_query_field())
    }

    pub fn query_keys(&self) -> Vec<&'static str> {
        self.query_fields().filter_map(|info| info.key).collect()
    }

    /// The field that [`Resolver::set`][crate::Resolver::set] would assign for `key`.
    pub fn field_for_key(&self, key: &str) -> Option<&FieldInfo> {
        self.lookup(key).map(|field| &field.info)
    }

    /// The field whose query key is `key`, ignoring ASCII case.
    /// Unlike [`field_for_key`][Self::field_for_key], field names are not considered.
    pub fn field_for_query_key(&self, key: &str) -> Option<&FieldInfo> {
        self.lookup_query_key(key).map(|field| &field.info)
    }

    /// The field placed into `part` of the URL, if any.
    pub fn field_for_part(&self, part: UrlPart) -> Option<&FieldInfo> {
        self.fields().find(|info| info.is_url_part(part))
    }

    pub fn enums(&self) -> &EnumRegistry {
        &self.enums
    }

    /// Resolves a query key, or a field name for fields without one.
    /// Query keys take precedence over names.
    pub(crate) fn lookup(&self, key: &str) -> Option<&FieldSchema<C>> {
        self.fields
            .iter()
            .find(|field| field.info.key.is_some() && field.info.answers_to(key))
            .or_else(|| self.fields.iter().find(|field| field.info.answers_to(key)))
    }

    /// Resolves a query key only. Placement-only fields never match.
    pub(crate) fn lookup_query_key(&self, key: &str) -> Option<&FieldSchema<C>> {
        self.fields
            .iter()
            .find(|field| field.info.key.is_some() && field.info.answers_to(key))
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &FieldSchema<C>> + '_ {
        self.fields.iter()
    }

    pub(crate) fn formatter(&self, field: &FieldSchema<C>) -> Option<&dyn EnumFormatter> {
        self.enums.get(field.info.name)
    }

    /// Coerces `raw` for `field`, reporting failures as [`ConfigError::Validation`].
    pub(crate) fn coerce(
        &self,
        field: &FieldSchema<C>,
        raw: &str,
    ) -> Result<FieldValue, ConfigError> {
        coercion::parse_value(&field.info, raw, self.formatter(field)).map_err(|reason| {
            ConfigError::Validation {
                field: field.info.name,
                value: raw.to_string(),
                reason,
            }
        })
    }

    pub(crate) fn render(&self, field: &FieldSchema<C>, value: &FieldValue) -> String {
        coercion::format_value(value, self.formatter(field))
    }
}

impl<C> fmt::Debug for ConfigSchema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSchema")
            .field("config_name", &self.config_name)
            .field("fields", &self.fields().collect::<Vec<_>>())
            .field("enums", &self.enums)
            .finish()
    }
}


fn check_field_against_previous<C>(
    config_name: &'static str,
    info: &FieldInfo,
    previous: &[FieldSchema<C>],
) -> Result<(), SchemaError> {
    if info.name.is_empty() {
        return Err(SchemaError::EmptyFieldName {
            config: config_name,
        });
    }

    for other in previous.iter().map(|field| &field.info) {
        if other.name == info.name {
            return Err(SchemaError::DuplicateFieldName {
                config: config_name,
                field: info.name,
            });
        }

        if let (Some(key), Some(other_key)) = (info.key, other.key) {
            if key.eq_ignore_ascii_case(other_key) {
                return Err(SchemaError::DuplicateQueryKey {
                    config: config_name,
                    key,
                    first: other.name,
                    second: info.name,
                });
            }
        }

        if let Some(part) = info.url_parts.iter().find(|part| other.is_url_part(**part)) {
            return Err(SchemaError::DuplicateUrlPart {
                config: config_name,
                part: *part,
                first: other.name,
                second: info.name,
            });
        }
    }

    // A field claiming the same part twice is as ambiguous as two fields claiming it.
    for (index, part) in info.url_parts.iter().enumerate() {
        if info.url_parts[..index].contains(part) {
            return Err(SchemaError::DuplicateUrlPart {
                config: config_name,
                part: *part,
                first: info.name,
                second: info.name,
            });
        }
    }

    Ok(())
}

fn short_type_name<C>() -> &'static str {
    let full_name = type_name::<C>();
    full_name.rsplit("::").next().unwrap_or(full_name)
}
