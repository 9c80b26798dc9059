use serde::{Deserialize, Serialize};

use crate::components::Component;
use crate::error::{RenderError, RenderResult};

/// Root value produced by design analysis or image generation.
///
/// `page` and `components` are optional at the serde level on purpose: the
/// backend occasionally emits partial documents and the renderer is the
/// place where their absence is rejected, as a whole-template failure.
/// A `Template` is immutable input to the renderer and is never mutated
/// by rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Template {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
}

impl Template {
    /// Parse a template from its backend JSON representation.
    pub fn parse(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the two presence invariants and borrow the validated parts.
    ///
    /// Fails fast with [`RenderError::MissingPage`] or
    /// [`RenderError::MissingComponents`]; an empty component list is valid.
    pub fn validate(&self) -> RenderResult<(&Page, &[Component])> {
        let page = self.page.as_ref().ok_or(RenderError::MissingPage)?;
        let components = self
            .components
            .as_deref()
            .ok_or(RenderError::MissingComponents)?;
        Ok((page, components))
    }
}

/// Page geometry and background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    /// URL or data URI, rendered as a full-bleed `cover` background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            width: 750,
            height: 1334,
            background_color: "#FFFFFF".to_string(),
            background_image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_minimal_template() {
        let t = Template::parse(
            r##"{"page":{"width":750,"height":1334,"backgroundColor":"#fff"},"components":[]}"##,
        )
        .unwrap();
        let (page, components) = t.validate().unwrap();
        assert_eq!(page.width, 750);
        assert_eq!(page.background_color, "#fff");
        assert!(components.is_empty());
    }

    #[test]
    fn page_defaults_fill_missing_fields() {
        let t = Template::parse(r#"{"page":{},"components":[]}"#).unwrap();
        let (page, _) = t.validate().unwrap();
        assert_eq!(page.width, 750);
        assert_eq!(page.height, 1334);
        assert_eq!(page.background_color, "#FFFFFF");
        assert_eq!(page.background_image, None);
    }

    #[test]
    fn empty_object_is_missing_page() {
        let t = Template::parse("{}").unwrap();
        assert_eq!(t.validate().unwrap_err(), RenderError::MissingPage);
    }

    #[test]
    fn page_without_components_is_rejected() {
        let t = Template::parse(r#"{"page":{"width":100,"height":100}}"#).unwrap();
        assert_eq!(t.validate().unwrap_err(), RenderError::MissingComponents);
    }

    #[test]
    fn garbage_json_is_a_parse_error() {
        assert!(matches!(
            Template::parse("not json"),
            Err(RenderError::Json(_))
        ));
    }
}
