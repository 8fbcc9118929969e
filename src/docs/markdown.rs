use super::SchemaRenderer;
use crate::schema::{coercion::parse_bool, FieldInfo, FieldKind, UrlPart};


/// Renders a schema as markdown, split into a URL section and a query section.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MarkdownRenderer {
    /// Prefix of section headers, e.g. `"### "`.
    pub header_prefix: String,

    /// Text shown before the query/param props list.
    pub props_description: String,

    /// Text shown instead of the list when there are no query/param props.
    pub props_empty_message: String,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            header_prefix: "### ".to_string(),
            props_description: "Props can be supplied through the URL as \
                                `?key=value&key=value`, or as params when sending."
                .to_string(),
            props_empty_message: "*This service does not support any query/param props.*"
                .to_string(),
        }
    }
}

impl SchemaRenderer for MarkdownRenderer {
    fn render(&self, scheme: &str, fields: &[&FieldInfo]) -> String {
        let mut url_fields = fields
            .iter()
            .copied()
            .filter(|field| !field.url_parts.is_empty())
            .collect::<Vec<_>>();
        url_fields.sort_by_key(|field| field.url_parts.iter().min().copied());

        let mut query_fields = fields
            .iter()
            .copied()
            .filter(|field| field.is_query_field() || field.url_parts.is_empty())
            .collect::<Vec<_>>();
        query_fields.sort_by_key(|field| !field.required);


        let mut output = String::new();

        if !url_fields.is_empty() {
            self.write_header(&mut output, "URL Fields");

            for field in &url_fields {
                write_field_primary(&mut output, field, field.name);
                output.push_str("  URL part: ");
                output.push_str(&url_example(scheme, &url_fields, field));
                output.push('\n');
            }

            output.push('\n');
        }


        self.write_header(&mut output, "Query/Param Props");

        if query_fields.is_empty() {
            output.push_str(&self.props_empty_message);
            output.push('\n');
            return output;
        }

        if !self.props_description.is_empty() {
            output.push_str(&self.props_description);
            output.push_str(if self.props_description.ends_with('\n') {
                "\n"
            } else {
                "\n\n"
            });
        }

        for (index, field) in query_fields.iter().enumerate() {
            if index > 0 {
                output.push('\n');
            }

            write_field_primary(&mut output, field, field.key.unwrap_or(field.name));
            write_field_extras(&mut output, field);
        }

        output
    }
}

impl MarkdownRenderer {
    fn write_header(&self, output: &mut String, text: &str) {
        output.push_str(&self.header_prefix);
        output.push_str(text);
        output.push_str("\n\n");
    }
}


/// Name, description, and either the required marker or the default.
fn write_field_primary(output: &mut String, field: &FieldInfo, label: &str) {
    output.push_str(&format!("* __{}__", label));

    if !field.description.is_empty() {
        output.push_str(" - ");
        output.push_str(field.description);
    }

    if field.required {
        output.push_str(" (__Required__)\n");
        return;
    }

    output.push_str("\n  Default: ");
    match field.default {
        None | Some("") => output.push_str("*empty*"),
        Some(default) => {
            if field.kind == FieldKind::Bool {
                let enabled = parse_bool(default).unwrap_or(false);
                output.push_str(if enabled { "✔ " } else { "❌ " });
            }

            output.push_str(&format!("`{}`", default));
        }
    }
    output.push('\n');
}

/// Possible enum values and integer bounds.
fn write_field_extras(output: &mut String, field: &FieldInfo) {
    if !field.enum_names.is_empty() {
        output.push_str(&format!(
            "  Possible values: `{}`\n",
            field.enum_names.join("`, `")
        ));
    }

    if field.kind == FieldKind::Int && field.range != (i64::MIN..=i64::MAX) {
        output.push_str(&format!(
            "  Range: `{}` to `{}`\n",
            field.range.start(),
            field.range.end()
        ));
    }
}

/// An example service URL in which `highlighted`'s placements are emphasized.
fn url_example(scheme: &str, url_fields: &[&FieldInfo], highlighted: &FieldInfo) -> String {
    let label = |part: UrlPart| -> Option<String> {
        let field = url_fields.iter().find(|field| field.is_url_part(part))?;

        let slug = if part == UrlPart::Port && field.is_url_part(UrlPart::Host) {
            "port".to_string()
        } else {
            field.name.to_ascii_lowercase()
        };

        if field.name == highlighted.name {
            Some(format!("<strong>{}</strong>", slug))
        } else {
            Some(slug)
        }
    };

    let mut example = format!("<code class=\"service-url\">{}://", scheme);

    let user = label(UrlPart::User);
    let password = label(UrlPart::Password);
    if user.is_some() || password.is_some() {
        example.push_str(&user.unwrap_or_default());
        if let Some(password) = password {
            example.push(':');
            example.push_str(&password);
        }
        example.push('@');
    }

    if let Some(host) = label(UrlPart::Host) {
        example.push_str(&host);
    }
    if let Some(port) = label(UrlPart::Port) {
        example.push(':');
        example.push_str(&port);
    }

    let mut path_parts = url_fields
        .iter()
        .flat_map(|field| field.url_parts.iter().copied())
        .filter(|part| matches!(part, UrlPart::Path(_)))
        .collect::<Vec<_>>();
    path_parts.sort();
    path_parts.dedup();

    if path_parts.is_empty() {
        example.push('/');
    }
    for part in path_parts {
        example.push('/');
        example.push_str(&label(part).unwrap_or_default());
    }

    example.push_str("</code>");
    example
}
