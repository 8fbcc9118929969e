//! Parse/format capabilities for enumerated field values, and the per-config
//! registry mapping field names to them.

use std::{collections::BTreeMap, fmt, sync::Arc};


/// Converts between an enumerated value's ordinal and its text representation.
pub trait EnumFormatter: fmt::Debug + Send + Sync {
    /// Canonical names, indexed by ordinal.
    fn names(&self) -> &[&'static str];

    /// Parses `text` into an ordinal, or `None` if it is not recognized.
    fn parse(&self, text: &str) -> Option<i64>;

    /// Renders `ordinal` as its canonical name.
    fn format(&self, ordinal: i64) -> String;
}


/// An [`EnumFormatter`] backed by a list of canonical names plus optional aliases.
///
/// Names and aliases are matched ignoring ASCII case. Ordinals without a
/// canonical name are rendered as plain decimals.
#[derive(Clone, Debug)]
pub struct NamedEnum {
    names: Vec<&'static str>,

    aliases: Vec<(&'static str, i64)>,
}

impl NamedEnum {
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self {
            names: names.into_iter().collect(),
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: &'static str, ordinal: i64) -> Self {
        self.aliases.push((alias, ordinal));
        self
    }
}

impl EnumFormatter for NamedEnum {
    fn names(&self) -> &[&'static str] {
        &self.names
    }

    fn parse(&self, text: &str) -> Option<i64> {
        if let Some(position) = self
            .names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(text))
        {
            return i64::try_from(position).ok();
        }

        self.aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(text))
            .map(|(_, ordinal)| *ordinal)
    }

    fn format(&self, ordinal: i64) -> String {
        usize::try_from(ordinal)
            .ok()
            .and_then(|index| self.names.get(index))
            .map(|name| name.to_string())
            .unwrap_or_else(|| ordinal.to_string())
    }
}


/// Maps field names to the formatter used for their values.
#[derive(Clone, Default, Debug)]
pub struct EnumRegistry {
    formatters: BTreeMap<&'static str, Arc<dyn EnumFormatter>>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, field_name: &'static str, formatter: F) -> Self
    where
        F: EnumFormatter + 'static,
    {
        self.formatters.insert(field_name, Arc::new(formatter));
        self
    }

    pub fn get(&self, field_name: &str) -> Option<&dyn EnumFormatter> {
        self.formatters.get(field_name).map(|formatter| formatter.as_ref())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formatters.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}
