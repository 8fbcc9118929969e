use miette::{miette, Result};
use serde::Deserialize;
use urlconf::MarkdownRenderer;

use crate::configuration::traits::ResolvableConfiguration;


#[derive(Deserialize, Debug)]
#[serde(default, deny_unknown_fields)]
pub(super) struct UnresolvedDocumentationConfiguration {
    header_prefix: String,

    props_description: String,

    props_empty_message: String,
}

impl Default for UnresolvedDocumentationConfiguration {
    fn default() -> Self {
        let defaults = MarkdownRenderer::default();

        Self {
            header_prefix: defaults.header_prefix,
            props_description: defaults.props_description,
            props_empty_message: defaults.props_empty_message,
        }
    }
}


/// Settings for rendering service schemas as markdown.
#[derive(Debug, Clone)]
pub struct DocumentationConfiguration {
    pub header_prefix: String,

    pub props_description: String,

    pub props_empty_message: String,
}

impl ResolvableConfiguration for UnresolvedDocumentationConfiguration {
    type Resolved = DocumentationConfiguration;

    fn resolve(self) -> Result<Self::Resolved> {
        if self.header_prefix.contains('\n') {
            return Err(miette!(
                "Field header_prefix must fit on a single line."
            ));
        }

        Ok(DocumentationConfiguration {
            header_prefix: self.header_prefix,
            props_description: self.props_description,
            props_empty_message: self.props_empty_message,
        })
    }
}


impl DocumentationConfiguration {
    pub fn markdown_renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer {
            header_prefix: self.header_prefix.clone(),
            props_description: self.props_description.clone(),
            props_empty_message: self.props_empty_message.clone(),
        }
    }
}
