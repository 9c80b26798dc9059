use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::style::Style;

/// One positioned visual element within a template.
///
/// Discriminated by the JSON `type` field. Anything that is not a known
/// kind lands in the [`Unknown`](Component::Unknown) arm and renders as an
/// empty generic container — unrecognized future component kinds degrade
/// gracefully instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    Text(TextComponent),
    Button(ButtonComponent),
    Image(ImageComponent),
    #[serde(untagged)]
    Unknown(UnknownComponent),
}

/// Top-left offset in pixels, relative to the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Element extent in pixels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Text block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextComponent {
    pub id: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub layer: Option<i64>,
    pub confidence: Option<f64>,
    pub html_tag: Option<String>,
    pub css_styles: Option<BTreeMap<String, String>>,
    pub style: Option<Style>,
    pub content: Option<String>,
}

/// Clickable button. Label comes from `text`, falling back to `content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonComponent {
    pub id: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub layer: Option<i64>,
    pub confidence: Option<f64>,
    pub html_tag: Option<String>,
    pub css_styles: Option<BTreeMap<String, String>>,
    pub style: Option<Style>,
    pub text: Option<String>,
    pub content: Option<String>,
    /// Button fill image (URL or data URI); wins over the background color.
    pub background_image: Option<String>,
}

/// Image region. Carries either a structured `placeholder` sub-object or
/// the flat `placeholderUrl` / `placeholderAlt` / `dominantColor` fields,
/// depending on which backend path produced the template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageComponent {
    pub id: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub layer: Option<i64>,
    pub confidence: Option<f64>,
    pub html_tag: Option<String>,
    pub css_styles: Option<BTreeMap<String, String>>,
    pub style: Option<Style>,
    pub placeholder: Option<Placeholder>,
    pub placeholder_url: Option<String>,
    pub placeholder_alt: Option<String>,
    pub dominant_color: Option<String>,
    /// `"decoration"` or `"content"` marks a real image asset; anything
    /// else (or absence) means a plain colored block. Kept as a string
    /// because the backend has grown values here before.
    pub image_type: Option<String>,
}

/// Structured image fallback description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placeholder {
    pub url: Option<String>,
    pub alt: Option<String>,
    pub dominant_color: Option<String>,
}

/// Forward-compatibility arm: a component of an unrecognized kind.
/// Keeps the common geometry/style fields so it still occupies its box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnknownComponent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub layer: Option<i64>,
    pub html_tag: Option<String>,
    pub css_styles: Option<BTreeMap<String, String>>,
    pub style: Option<Style>,
}

impl ImageComponent {
    /// Resolved asset URL: structured placeholder wins over the flat field.
    /// Empty strings count as absent.
    pub fn asset_url(&self) -> Option<&str> {
        self.placeholder
            .as_ref()
            .and_then(|p| p.url.as_deref())
            .or(self.placeholder_url.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Resolved alt text, without the default applied.
    pub fn asset_alt(&self) -> Option<&str> {
        self.placeholder
            .as_ref()
            .and_then(|p| p.alt.as_deref())
            .or(self.placeholder_alt.as_deref())
            .filter(|a| !a.is_empty())
    }

    /// Resolved dominant color for the no-asset fallback block.
    pub fn asset_dominant_color(&self) -> Option<&str> {
        self.placeholder
            .as_ref()
            .and_then(|p| p.dominant_color.as_deref())
            .or(self.dominant_color.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// True when `imageType` marks this as a real image asset.
    pub fn is_real_asset(&self) -> bool {
        matches!(self.image_type.as_deref(), Some("decoration") | Some("content"))
    }
}

impl Component {
    /// Stacking order; low renders first. Default 1.
    pub fn layer(&self) -> i64 {
        match self {
            Component::Text(c) => c.layer,
            Component::Button(c) => c.layer,
            Component::Image(c) => c.layer,
            Component::Unknown(c) => c.layer,
        }
        .unwrap_or(1)
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            Component::Text(c) => c.position.as_ref(),
            Component::Button(c) => c.position.as_ref(),
            Component::Image(c) => c.position.as_ref(),
            Component::Unknown(c) => c.position.as_ref(),
        }
    }

    pub fn size(&self) -> Option<&Size> {
        match self {
            Component::Text(c) => c.size.as_ref(),
            Component::Button(c) => c.size.as_ref(),
            Component::Image(c) => c.size.as_ref(),
            Component::Unknown(c) => c.size.as_ref(),
        }
    }

    /// Explicit output-tag override, if any.
    pub fn html_tag(&self) -> Option<&str> {
        match self {
            Component::Text(c) => c.html_tag.as_deref(),
            Component::Button(c) => c.html_tag.as_deref(),
            Component::Image(c) => c.html_tag.as_deref(),
            Component::Unknown(c) => c.html_tag.as_deref(),
        }
    }

    /// Flat camelCase CSS map, if this call site supplied one.
    pub fn css_styles(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Component::Text(c) => c.css_styles.as_ref(),
            Component::Button(c) => c.css_styles.as_ref(),
            Component::Image(c) => c.css_styles.as_ref(),
            Component::Unknown(c) => c.css_styles.as_ref(),
        }
    }

    /// Structured style sub-object, if this call site supplied one.
    pub fn style(&self) -> Option<&Style> {
        match self {
            Component::Text(c) => c.style.as_ref(),
            Component::Button(c) => c.style.as_ref(),
            Component::Image(c) => c.style.as_ref(),
            Component::Unknown(c) => c.style.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_deserialize_into_their_variants() {
        let c: Component =
            serde_json::from_str(r#"{"type":"text","content":"Hi"}"#).unwrap();
        assert!(matches!(c, Component::Text(_)));

        let c: Component = serde_json::from_str(r#"{"type":"button","text":"Go"}"#).unwrap();
        assert!(matches!(c, Component::Button(_)));

        let c: Component =
            serde_json::from_str(r#"{"type":"image","placeholderUrl":"a.png"}"#).unwrap();
        assert!(matches!(c, Component::Image(_)));
    }

    #[test]
    fn unrecognized_kind_falls_into_unknown() {
        let c: Component =
            serde_json::from_str(r#"{"type":"video","layer":3,"position":{"x":1,"y":2}}"#)
                .unwrap();
        match c {
            Component::Unknown(u) => {
                assert_eq!(u.kind.as_deref(), Some("video"));
                assert_eq!(u.layer, Some(3));
            }
            other => panic!("expected Unknown, got {:?}", other),
        }
    }

    #[test]
    fn layer_defaults_to_one() {
        let c: Component = serde_json::from_str(r#"{"type":"text"}"#).unwrap();
        assert_eq!(c.layer(), 1);
    }

    #[test]
    fn image_asset_resolution_prefers_structured_placeholder() {
        let img: ImageComponent = serde_json::from_str(
            r#"{"placeholder":{"url":"a.png","alt":"A"},"placeholderUrl":"b.png","placeholderAlt":"B"}"#,
        )
        .unwrap();
        assert_eq!(img.asset_url(), Some("a.png"));
        assert_eq!(img.asset_alt(), Some("A"));
    }

    #[test]
    fn empty_placeholder_url_counts_as_absent() {
        let img: ImageComponent =
            serde_json::from_str(r#"{"placeholderUrl":""}"#).unwrap();
        assert_eq!(img.asset_url(), None);
    }

    #[test]
    fn only_decoration_and_content_mark_real_assets() {
        for (kind, expected) in [
            ("decoration", true),
            ("content", true),
            ("background", false),
        ] {
            let img = ImageComponent {
                image_type: Some(kind.to_string()),
                ..ImageComponent::default()
            };
            assert_eq!(img.is_real_asset(), expected, "imageType {}", kind);
        }
        assert!(!ImageComponent::default().is_real_asset());
    }
}
