//! Binds a [`ConfigSchema`] to one configuration instance and exposes key-based
//! access, default application, send-time params and required-field validation.

use std::{
    collections::BTreeMap,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use tracing::trace;

use crate::{
    error::{ConfigError, SchemaError},
    schema::{ConfigSchema, FieldInfo, FieldSchema, FieldValue, ServiceConfig},
};


/// Send-time parameters, keyed by query key.
pub type Params = BTreeMap<String, String>;


/// A schema bound to a configuration instance.
///
/// `B` is the binding: `&C` gives a read-only resolver, `&mut C` (or any other
/// `DerefMut` owner) additionally allows mutation. The resolver never outlives
/// the borrow it was created from.
pub struct Resolver<B>
where
    B: Deref,
    B::Target: ServiceConfig,
{
    schema: Arc<ConfigSchema<B::Target>>,

    config: B,
}

impl<B> Resolver<B>
where
    B: Deref,
    B::Target: ServiceConfig,
{
    /// Binds `config` to the (cached) schema of its type.
    pub fn new(config: B) -> Result<Self, SchemaError> {
        Ok(Self::with_schema(ConfigSchema::of()?, config))
    }

    pub fn with_schema(schema: Arc<ConfigSchema<B::Target>>, config: B) -> Self {
        Self { schema, config }
    }

    pub fn schema(&self) -> &ConfigSchema<B::Target> {
        &self.schema
    }

    pub fn config(&self) -> &B::Target {
        &self.config
    }

    pub fn into_inner(self) -> B {
        self.config
    }

    /// Renders the current value addressed by `key`.
    ///
    /// Integers render as decimals, booleans as `yes`/`no`, lists comma-joined
    /// and enums through their registered formatter.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let field = self.schema.lookup(key).ok_or_else(|| ConfigError::UnknownKey {
            key: key.to_string(),
        })?;

        Ok(self.schema.render(field, &self.value_of(field)))
    }

    /// Query keys of the bound schema, in declaration order.
    pub fn query_fields(&self) -> Vec<&'static str> {
        self.schema.query_keys()
    }

    /// Every field with its rendered current value, in declaration order.
    pub fn field_values(&self) -> Vec<(&FieldInfo, String)> {
        self.schema
            .entries()
            .map(|field| (&field.info, self.schema.render(field, &self.value_of(field))))
            .collect()
    }

    /// Checks required fields in declaration order, failing on the first one
    /// that still holds its kind's zero value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self
            .schema
            .entries()
            .find(|field| field.info.required && self.value_of(field).is_zero())
        {
            Some(missing) => Err(ConfigError::RequiredField {
                field: missing.info.name,
            }),
            None => Ok(()),
        }
    }

    #[inline]
    pub(crate) fn value_of(&self, field: &FieldSchema<B::Target>) -> FieldValue {
        field.accessor.read(&self.config)
    }

    #[inline]
    pub(crate) fn holds_default(&self, field: &FieldSchema<B::Target>) -> bool {
        self.value_of(field) == field.default_value
    }
}

impl<B> Resolver<B>
where
    B: DerefMut,
    B::Target: ServiceConfig,
{
    pub fn config_mut(&mut self) -> &mut B::Target {
        &mut self.config
    }

    /// Assigns declared defaults to every field that still holds its zero value.
    ///
    /// Fields that already hold anything else are left alone, so repeated
    /// calls are no-ops.
    pub fn set_default_props(&mut self) {
        for field in self.schema.entries() {
            if field.info.default.is_none() {
                continue;
            }

            if field.accessor.read(&self.config).is_zero() {
                field
                    .accessor
                    .write(&mut self.config, field.default_value.clone());
            }
        }
    }

    /// Coerces `raw` and assigns it to the field addressed by `key`.
    ///
    /// `key` is matched against query keys, or against field names for fields
    /// without a query key, ignoring ASCII case.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let field = self.schema.lookup(key).ok_or_else(|| ConfigError::UnknownKey {
            key: key.to_string(),
        })?;

        let value = self.schema.coerce(field, raw)?;
        field.accessor.write(&mut self.config, value);

        Ok(())
    }

    /// Like [`set`][Self::set], but `key` is matched against query keys only,
    /// so placement-only fields can not be reached through a URL query.
    pub fn set_query_prop(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let field = self
            .schema
            .lookup_query_key(key)
            .ok_or_else(|| ConfigError::UnknownKey {
                key: key.to_string(),
            })?;

        let value = self.schema.coerce(field, raw)?;
        field.accessor.write(&mut self.config, value);

        Ok(())
    }

    /// Applies every entry of `params` that addresses a query field, in
    /// declaration order. Entries that match no query field are ignored.
    ///
    /// Fails on the first value that does not coerce. Fields applied before
    /// the failing one stay applied; use
    /// [`try_update_config_from_params`][Self::try_update_config_from_params]
    /// to get all-or-nothing behaviour instead.
    pub fn update_config_from_params(&mut self, params: &Params) -> Result<(), ConfigError> {
        for field in self.schema.entries() {
            let Some(key) = field.info.key else {
                continue;
            };

            let Some(raw) = params
                .iter()
                .find(|(param_key, _)| param_key.eq_ignore_ascii_case(key))
                .map(|(_, value)| value)
            else {
                continue;
            };

            trace!(key, value = raw.as_str(), "Applying send-time param.");

            let value = self.schema.coerce(field, raw)?;
            field.accessor.write(&mut self.config, value);
        }

        Ok(())
    }
}

impl<B> Resolver<B>
where
    B: DerefMut,
    B::Target: ServiceConfig + Clone,
{
    /// Like [`update_config_from_params`][Self::update_config_from_params], but
    /// leaves the bound configuration untouched unless every param applies.
    pub fn try_update_config_from_params(&mut self, params: &Params) -> Result<(), ConfigError> {
        let mut staged: B::Target = (*self.config).clone();

        Resolver::with_schema(self.schema.clone(), &mut staged)
            .update_config_from_params(params)?;

        *self.config = staged;
        Ok(())
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        enums::{EnumRegistry, NamedEnum},
        schema::{FieldDeclarations, UrlPart},
    };

    #[derive(Clone, PartialEq, Default, Debug)]
    struct Pager {
        account: String,
        recipients: Vec<String>,
        title: String,
        priority: i64,
        urgency: i64,
        silent: bool,
        sound: bool,
    }

    impl ServiceConfig for Pager {
        fn declare_fields(fields: &mut FieldDeclarations<Self>) {
            fields
                .text("Account", |c| &c.account, |c, v| c.account = v)
                .url(UrlPart::User)
                .required();

            fields
                .list("Recipients", |c| &c.recipients, |c, v| c.recipients = v)
                .url(UrlPart::PATH)
                .required();

            fields
                .text("Title", |c| &c.title, |c, v| c.title = v)
                .key("title")
                .default("Alert");

            fields
                .integer("Priority", |c| c.priority, |c, v| c.priority = v)
                .key("priority")
                .default("5")
                .range(-10..=10);

            fields
                .enumeration("Urgency", |c| c.urgency, |c, v| c.urgency = v)
                .key("urgency")
                .default("normal");

            fields
                .boolean("Silent", |c| c.silent, |c, v| c.silent = v)
                .key("silent")
                .default("no");

            fields
                .boolean("Sound", |c| c.sound, |c, v| c.sound = v)
                .key("sound")
                .default("yes");
        }

        fn enums() -> EnumRegistry {
            EnumRegistry::new().register(
                "Urgency",
                NamedEnum::new(["Low", "Normal", "High"]).with_alias("urgent", 2),
            )
        }
    }

    fn defaulted() -> Pager {
        let mut pager = Pager::default();
        Resolver::new(&mut pager).unwrap().set_default_props();
        pager
    }

    #[test]
    fn defaults_fill_zero_values() {
        let pager = defaulted();

        assert_eq!(pager.title, "Alert");
        assert_eq!(pager.priority, 5);
        assert_eq!(pager.urgency, 1);
        assert!(!pager.silent);
        assert!(pager.sound);
    }

    #[test]
    fn defaults_leave_assigned_values_alone() {
        let mut pager = Pager {
            title: "Custom".to_string(),
            priority: -3,
            ..Pager::default()
        };
        Resolver::new(&mut pager).unwrap().set_default_props();

        assert_eq!(pager.title, "Custom");
        assert_eq!(pager.priority, -3);
    }

    #[test]
    fn applying_defaults_twice_is_a_no_op() {
        let once = defaulted();

        let mut twice = once.clone();
        Resolver::new(&mut twice).unwrap().set_default_props();

        assert_eq!(once, twice);
    }

    #[test]
    fn set_coerces_per_kind() {
        let mut pager = defaulted();
        let mut resolver = Resolver::new(&mut pager).unwrap();

        resolver.set("TITLE", "Disk full").unwrap();
        resolver.set("priority", "-2").unwrap();
        resolver.set("urgency", "URGENT").unwrap();
        resolver.set("silent", "Yes").unwrap();
        resolver.set("recipients", "a,b").unwrap();

        assert_eq!(pager.title, "Disk full");
        assert_eq!(pager.priority, -2);
        assert_eq!(pager.urgency, 2);
        assert!(pager.silent);
        assert_eq!(pager.recipients, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn set_rejects_unknown_keys() {
        let mut pager = defaulted();

        assert_eq!(
            Resolver::new(&mut pager).unwrap().set("volume", "11"),
            Err(ConfigError::UnknownKey {
                key: "volume".to_string()
            })
        );
    }

    #[test]
    fn set_reports_the_field_and_offending_text() {
        let mut pager = defaulted();
        let mut resolver = Resolver::new(&mut pager).unwrap();

        assert!(matches!(
            resolver.set("silent", "maybe"),
            Err(ConfigError::Validation { field: "Silent", ref value, .. }) if value == "maybe"
        ));
        assert!(matches!(
            resolver.set("priority", "11"),
            Err(ConfigError::Validation { field: "Priority", .. })
        ));
        assert!(matches!(
            resolver.set("urgency", "whenever"),
            Err(ConfigError::Validation { field: "Urgency", .. })
        ));

        // Failed assignments leave the field untouched.
        assert!(!pager.silent);
        assert_eq!(pager.priority, 5);
    }

    #[test]
    fn get_renders_canonical_text() {
        let mut pager = defaulted();
        pager.recipients = vec!["a".to_string(), "b".to_string()];
        pager.urgency = 2;

        let resolver = Resolver::new(&pager).unwrap();

        assert_eq!(resolver.get("title").unwrap(), "Alert");
        assert_eq!(resolver.get("priority").unwrap(), "5");
        assert_eq!(resolver.get("urgency").unwrap(), "High");
        assert_eq!(resolver.get("silent").unwrap(), "no");
        assert_eq!(resolver.get("sound").unwrap(), "yes");
        assert_eq!(resolver.get("Recipients").unwrap(), "a,b");
        assert!(matches!(
            resolver.get("nope"),
            Err(ConfigError::UnknownKey { .. })
        ));
    }

    #[test]
    fn query_fields_follow_declaration_order() {
        let pager = Pager::default();

        assert_eq!(
            Resolver::new(&pager).unwrap().query_fields(),
            vec!["title", "priority", "urgency", "silent", "sound"]
        );
    }

    #[test]
    fn params_apply_matching_query_fields_only() {
        let mut pager = defaulted();

        let params = Params::from([
            ("Title".to_string(), "From params".to_string()),
            ("sound".to_string(), "no".to_string()),
            ("message".to_string(), "ignored".to_string()),
            ("Account".to_string(), "not a query field".to_string()),
        ]);

        Resolver::new(&mut pager)
            .unwrap()
            .update_config_from_params(&params)
            .unwrap();

        assert_eq!(pager.title, "From params");
        assert!(!pager.sound);
        assert_eq!(pager.account, "");
    }

    #[test]
    fn params_apply_partially_up_to_the_failing_field() {
        let mut pager = defaulted();

        let params = Params::from([
            ("title".to_string(), "Applied".to_string()),
            ("priority".to_string(), "7".to_string()),
            ("urgency".to_string(), "bogus".to_string()),
            ("silent".to_string(), "yes".to_string()),
        ]);

        let result = Resolver::new(&mut pager)
            .unwrap()
            .update_config_from_params(&params);

        assert!(matches!(
            result,
            Err(ConfigError::Validation { field: "Urgency", .. })
        ));
        // Declared before the failing field, so applied.
        assert_eq!(pager.title, "Applied");
        assert_eq!(pager.priority, 7);
        // Declared after it, so never reached.
        assert!(!pager.silent);
    }

    #[test]
    fn try_params_roll_back_on_failure() {
        let mut pager = defaulted();

        let params = Params::from([
            ("title".to_string(), "Discarded".to_string()),
            ("urgency".to_string(), "bogus".to_string()),
        ]);

        let result = Resolver::new(&mut pager)
            .unwrap()
            .try_update_config_from_params(&params);

        assert!(result.is_err());
        assert_eq!(pager, defaulted());
    }

    #[test]
    fn try_params_commit_on_success() {
        let mut pager = defaulted();

        let params = Params::from([
            ("title".to_string(), "Committed".to_string()),
            ("urgency".to_string(), "low".to_string()),
        ]);

        Resolver::new(&mut pager)
            .unwrap()
            .try_update_config_from_params(&params)
            .unwrap();

        assert_eq!(pager.title, "Committed");
        assert_eq!(pager.urgency, 0);
    }

    #[test]
    fn validation_reports_the_first_missing_field() {
        let mut pager = defaulted();
        assert_eq!(
            Resolver::new(&pager).unwrap().validate(),
            Err(ConfigError::RequiredField { field: "Account" })
        );

        pager.account = "acc".to_string();
        assert_eq!(
            Resolver::new(&pager).unwrap().validate(),
            Err(ConfigError::RequiredField {
                field: "Recipients"
            })
        );

        pager.recipients = vec!["x".to_string()];
        assert_eq!(Resolver::new(&pager).unwrap().validate(), Ok(()));
    }

    #[test]
    fn field_values_list_everything_in_order() {
        let pager = defaulted();
        let resolver = Resolver::new(&pager).unwrap();

        let rendered = resolver
            .field_values()
            .into_iter()
            .map(|(info, value)| (info.name, value))
            .collect::<Vec<_>>();

        assert_eq!(rendered[0], ("Account", String::new()));
        assert_eq!(rendered[4], ("Urgency", "Normal".to_string()));
        assert_eq!(rendered.len(), 7);
    }
}
