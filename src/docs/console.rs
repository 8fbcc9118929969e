use super::SchemaRenderer;
use crate::schema::FieldInfo;


/// Renders a schema as a compact tree for terminals.
#[derive(Clone, Copy, Default, Debug)]
pub struct ConsoleRenderer;

impl SchemaRenderer for ConsoleRenderer {
    fn render(&self, scheme: &str, fields: &[&FieldInfo]) -> String {
        let mut output = format!("{}://\n", scheme);

        let name_width = fields
            .iter()
            .map(|field| field.name.len())
            .max()
            .unwrap_or_default();

        for (index, field) in fields.iter().enumerate() {
            let branch = if index + 1 == fields.len() {
                "└─"
            } else {
                "├─"
            };

            output.push_str(&format!(
                "{} {:<width$}  {:<4}",
                branch,
                field.name,
                field.kind.name(),
                width = name_width
            ));

            for part in &field.url_parts {
                output.push_str(&format!("  [{}]", part));
            }

            if let Some(key) = field.key {
                output.push_str("  ?");
                output.push_str(key);
            }

            if field.required {
                output.push_str("  required");
            } else if let Some(default) = field.default {
                output.push_str(&format!("  default={:?}", default));
            }

            if !field.enum_names.is_empty() {
                output.push_str(&format!("  ({})", field.enum_names.join("|")));
            }

            if !field.description.is_empty() {
                output.push_str("  - ");
                output.push_str(field.description);
            }

            output.push('\n');
        }

        output
    }
}
