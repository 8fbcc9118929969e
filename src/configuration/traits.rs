use miette::Result;

/// An unvalidated configuration table that can be turned into its validated form.
pub trait ResolvableConfiguration {
    type Resolved;

    /// Validates the table and converts it into its `Resolved` type.
    /// Returning `Err` marks the configuration as invalid.
    fn resolve(self) -> Result<Self::Resolved>;
}


/// Like [`ResolvableConfiguration`], for tables whose validation needs
/// something from outside the table, e.g. the configuration file's directory.
pub trait ResolvableConfigurationWithContext {
    type Context;
    type Resolved;

    /// Validates the table and converts it into its `Resolved` type.
    /// Returning `Err` marks the configuration as invalid.
    fn resolve(self, context: Self::Context) -> Result<Self::Resolved>;
}
