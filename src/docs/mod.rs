//! Human-readable documentation of a configuration schema.

pub use self::console::ConsoleRenderer;
pub use self::markdown::MarkdownRenderer;
use crate::schema::FieldInfo;

mod console;
mod markdown;


/// Renders the fields of a service's schema as text.
pub trait SchemaRenderer {
    fn render(&self, scheme: &str, fields: &[&FieldInfo]) -> String;
}
