use std::{fmt, ops::RangeInclusive};


/// The value kinds a configuration field can hold.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FieldKind {
    Text,
    Bool,
    Int,
    List,
    Enum,
}

impl FieldKind {
    /// The value a field of this kind holds before anything assigned it.
    pub fn zero_value(self) -> FieldValue {
        match self {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Bool => FieldValue::Bool(false),
            FieldKind::Int => FieldValue::Int(0),
            FieldKind::List => FieldValue::List(Vec::new()),
            FieldKind::Enum => FieldValue::Enum(0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::List => "list",
            FieldKind::Enum => "enum",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


/// A typed snapshot of a single field's value.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
    /// Ordinal of an enumerated value.
    Enum(i64),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::List(_) => FieldKind::List,
            FieldValue::Enum(_) => FieldKind::Enum,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == self.kind().zero_value()
    }
}


/// A structural component of a service URL that a field can be placed into.
///
/// `Path(0)` is the plain `path` target, `Path(n)` is `path{n}`.
/// The derived ordering follows the URL layout from left to right.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum UrlPart {
    User,
    Password,
    Host,
    Port,
    Path(u8),
}

impl UrlPart {
    pub const PATH: UrlPart = UrlPart::Path(0);
}

impl fmt::Display for UrlPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlPart::User => f.write_str("user"),
            UrlPart::Password => f.write_str("password"),
            UrlPart::Host => f.write_str("host"),
            UrlPart::Port => f.write_str("port"),
            UrlPart::Path(0) => f.write_str("path"),
            UrlPart::Path(ordinal) => write!(f, "path{}", ordinal),
        }
    }
}


/// Declarative metadata of a single configuration field.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FieldInfo {
    pub name: &'static str,

    pub kind: FieldKind,

    /// Name of the field when encoded as a URL query parameter.
    pub key: Option<&'static str>,

    /// Literal default, parsed with the same rules as runtime values.
    pub default: Option<&'static str>,

    pub required: bool,

    pub url_parts: Vec<UrlPart>,

    /// Documentation only.
    pub description: &'static str,

    /// Accepted values for integer fields.
    pub range: RangeInclusive<i64>,

    /// Canonical names of an enum field, indexed by ordinal.
    /// Filled in from the enum registry when the schema is extracted.
    pub enum_names: Vec<&'static str>,
}

impl FieldInfo {
    pub(crate) fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            key: None,
            default: None,
            required: false,
            url_parts: Vec::new(),
            description: "",
            range: i64::MIN..=i64::MAX,
            enum_names: Vec::new(),
        }
    }

    #[inline]
    pub fn is_query_field(&self) -> bool {
        self.key.is_some()
    }

    #[inline]
    pub fn is_url_part(&self, part: UrlPart) -> bool {
        self.url_parts.contains(&part)
    }

    /// Whether `key` addresses this field: its query key, or its name when
    /// the field has no query key. Matching ignores ASCII case.
    pub fn answers_to(&self, key: &str) -> bool {
        match self.key {
            Some(query_key) => query_key.eq_ignore_ascii_case(key),
            None => self.name.eq_ignore_ascii_case(key),
        }
    }
}


/// Builder handle returned by the `FieldDeclarations` methods.
pub struct FieldDeclaration<'a> {
    info: &'a mut FieldInfo,
}

impl<'a> FieldDeclaration<'a> {
    pub(crate) fn new(info: &'a mut FieldInfo) -> Self {
        Self { info }
    }

    pub fn key(self, key: &'static str) -> Self {
        self.info.key = Some(key);
        self
    }

    pub fn default(self, default: &'static str) -> Self {
        self.info.default = Some(default);
        self
    }

    pub fn required(self) -> Self {
        self.info.required = true;
        self
    }

    pub fn url(self, part: UrlPart) -> Self {
        self.info.url_parts.push(part);
        self
    }

    pub fn description(self, description: &'static str) -> Self {
        self.info.description = description;
        self
    }

    pub fn range(self, range: RangeInclusive<i64>) -> Self {
        self.info.range = range;
        self
    }
}


/// Typed accessors for one field of `C`.
///
/// Non-capturing closures coerce into these function pointers, which keeps
/// the per-type dispatch table `Send + Sync` regardless of `C`.
pub(crate) enum Accessor<C> {
    Text(fn(&C) -> &str, fn(&mut C, String)),
    Bool(fn(&C) -> bool, fn(&mut C, bool)),
    Int(fn(&C) -> i64, fn(&mut C, i64)),
    List(fn(&C) -> &[String], fn(&mut C, Vec<String>)),
    Enum(fn(&C) -> i64, fn(&mut C, i64)),
}

impl<C> Accessor<C> {
    pub(crate) fn kind(&self) -> FieldKind {
        match self {
            Accessor::Text(..) => FieldKind::Text,
            Accessor::Bool(..) => FieldKind::Bool,
            Accessor::Int(..) => FieldKind::Int,
            Accessor::List(..) => FieldKind::List,
            Accessor::Enum(..) => FieldKind::Enum,
        }
    }

    pub(crate) fn read(&self, config: &C) -> FieldValue {
        match self {
            Accessor::Text(get, _) => FieldValue::Text(get(config).to_string()),
            Accessor::Bool(get, _) => FieldValue::Bool(get(config)),
            Accessor::Int(get, _) => FieldValue::Int(get(config)),
            Accessor::List(get, _) => FieldValue::List(get(config).to_vec()),
            Accessor::Enum(get, _) => FieldValue::Enum(get(config)),
        }
    }

    pub(crate) fn write(&self, config: &mut C, value: FieldValue) {
        match (self, value) {
            (Accessor::Text(_, set), FieldValue::Text(value)) => set(config, value),
            (Accessor::Bool(_, set), FieldValue::Bool(value)) => set(config, value),
            (Accessor::Int(_, set), FieldValue::Int(value)) => set(config, value),
            (Accessor::List(_, set), FieldValue::List(value)) => set(config, value),
            (Accessor::Enum(_, set), FieldValue::Enum(value)) => set(config, value),
            // PANIC SAFETY: values are only ever produced by coercing against `self.kind()`.
            (accessor, value) => unreachable!(
                "{} accessor was handed a {} value",
                accessor.kind(),
                value.kind()
            ),
        }
    }
}


/// A field's metadata together with its accessors and its parsed default.
pub(crate) struct FieldSchema<C> {
    pub(crate) info: FieldInfo,

    pub(crate) accessor: Accessor<C>,

    /// The parsed `info.default`, or the kind's zero value when there is none.
    pub(crate) default_value: FieldValue,
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_parts_order_left_to_right() {
        let mut parts = vec![
            UrlPart::Path(2),
            UrlPart::Port,
            UrlPart::PATH,
            UrlPart::User,
            UrlPart::Host,
            UrlPart::Password,
            UrlPart::Path(1),
        ];
        parts.sort();

        assert_eq!(
            parts,
            vec![
                UrlPart::User,
                UrlPart::Password,
                UrlPart::Host,
                UrlPart::Port,
                UrlPart::Path(0),
                UrlPart::Path(1),
                UrlPart::Path(2),
            ]
        );
    }

    #[test]
    fn url_part_names() {
        assert_eq!(UrlPart::PATH.to_string(), "path");
        assert_eq!(UrlPart::Path(2).to_string(), "path2");
        assert_eq!(UrlPart::Password.to_string(), "password");
    }

    #[test]
    fn zero_values() {
        assert!(FieldValue::Text(String::new()).is_zero());
        assert!(FieldValue::Enum(0).is_zero());
        assert!(!FieldValue::Bool(true).is_zero());
        assert!(!FieldValue::List(vec![String::new()]).is_zero());
    }

    #[test]
    fn fields_answer_to_key_or_name() {
        let mut keyed = FieldInfo::new("Title", FieldKind::Text);
        keyed.key = Some("title");
        assert!(keyed.answers_to("TITLE"));

        let mut placed = FieldInfo::new("Host", FieldKind::Text);
        placed.url_parts.push(UrlPart::Host);
        assert!(placed.answers_to("host"));
        assert!(!placed.answers_to("hostname"));
    }
}
