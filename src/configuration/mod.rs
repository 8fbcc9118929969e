//! Configuration of the `urlconf` binary, including the full configuration
//! structure as well as methods needed to load and validate it.
//!
//! Your starting point should probably be [`Configuration::load_from_default_path`].
//!
//! # Internals
//! The configuration file is first deserialized into the unvalidated
//! ("unresolved") [`UnresolvedConfiguration`] structure. Its `resolve`
//! method then recursively turns it (and its tables) into the validated
//! ("resolved") [`Configuration`]. Validation that needs more than serde can
//! offer, such as checking level filters or anchoring relative paths to the
//! configuration file's directory, happens in
//! [`resolve`][traits::ResolvableConfigurationWithContext::resolve].
//!
//! Every table and every field is optional: a missing file or an empty one
//! resolves to the built-in defaults.

#![allow(rustdoc::private_intra_doc_links)]

mod structure;
mod traits;
mod utilities;

pub use structure::*;
