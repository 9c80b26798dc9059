use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured style sub-object, one of the two style representations a
/// component may carry (the other is the flat camelCase CSS map).
///
/// Fields are translated into CSS through an explicit per-field table in
/// [`StyleMap::apply_structured`], never generically — the flat map is the
/// representation that gets the generic camelCase conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub font_family: Option<String>,
    pub color: Option<String>,
    /// Button-flavored alias for `color`; `color` wins when both are set.
    pub text_color: Option<String>,
    pub text_align: Option<String>,
    pub line_height: Option<f64>,
    pub text_shadow: Option<String>,
    pub background_color: Option<String>,
    pub border_radius: Option<f64>,
    pub border: Option<String>,
    pub box_shadow: Option<String>,
    pub filter: Option<String>,
    pub object_fit: Option<ObjectFit>,
}

/// Font weight as a number (400) or a CSS keyword ("bold").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Number(f64),
    Keyword(String),
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontWeight::Number(n) => write!(f, "{}", n),
            FontWeight::Keyword(k) => f.write_str(k),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectFit {
    Cover,
    Contain,
    Fill,
    None,
    ScaleDown,
}

impl ObjectFit {
    pub fn as_css(&self) -> &'static str {
        match self {
            ObjectFit::Cover => "cover",
            ObjectFit::Contain => "contain",
            ObjectFit::Fill => "fill",
            ObjectFit::None => "none",
            ObjectFit::ScaleDown => "scale-down",
        }
    }
}

/// Ordered, first-write-wins CSS declaration list.
///
/// This is the single canonical form both style representations are
/// normalized into before position/size gap-fill and per-type defaults.
/// Insertion order is fully determined by the input, which is what makes
/// rendering byte-deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    decls: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration unless the property is already present.
    /// Later writers never override earlier ones.
    pub fn set_if_absent(&mut self, property: &str, value: impl Into<String>) {
        if !self.contains(property) {
            self.decls.push((property.to_string(), value.into()));
        }
    }

    pub fn contains(&self, property: &str) -> bool {
        self.decls.iter().any(|(p, _)| p == property)
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Serialize into an inline style declaration string.
    pub fn to_css(&self) -> String {
        self.decls
            .iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Fold in a flat camelCase CSS map, keys sorted (BTreeMap order),
    /// each converted to its hyphenated form.
    pub fn apply_flat(&mut self, styles: &BTreeMap<String, String>) {
        for (key, value) in styles {
            self.set_if_absent(&camel_to_kebab(key), value.clone());
        }
    }

    /// Fold in the structured style sub-object via the explicit field table.
    pub fn apply_structured(&mut self, style: &Style) {
        if let Some(v) = style.font_size {
            self.set_if_absent("font-size", px(v));
        }
        if let Some(v) = &style.font_weight {
            self.set_if_absent("font-weight", v.to_string());
        }
        if let Some(v) = &style.font_family {
            self.set_if_absent("font-family", v.clone());
        }
        if let Some(v) = &style.color {
            self.set_if_absent("color", v.clone());
        }
        if let Some(v) = &style.text_color {
            self.set_if_absent("color", v.clone());
        }
        if let Some(v) = &style.text_align {
            self.set_if_absent("text-align", v.clone());
        }
        if let Some(v) = style.line_height {
            self.set_if_absent("line-height", v.to_string());
        }
        if let Some(v) = &style.text_shadow {
            self.set_if_absent("text-shadow", v.clone());
        }
        if let Some(v) = &style.background_color {
            self.set_if_absent("background-color", v.clone());
        }
        if let Some(v) = style.border_radius {
            self.set_if_absent("border-radius", px(v));
        }
        if let Some(v) = &style.border {
            self.set_if_absent("border", v.clone());
        }
        if let Some(v) = &style.box_shadow {
            self.set_if_absent("box-shadow", v.clone());
        }
        if let Some(v) = &style.filter {
            self.set_if_absent("filter", v.clone());
        }
        if let Some(v) = &style.object_fit {
            self.set_if_absent("object-fit", v.as_css());
        }
    }
}

/// Pixel value formatting; whole numbers print without a fraction.
pub(crate) fn px(value: f64) -> String {
    format!("{}px", value)
}

/// Convert a camelCase property name to its hyphenated CSS form
/// (`fontSize` → `font-size`). Already-hyphenated keys pass through.
pub(crate) fn camel_to_kebab(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn camel_case_converts_to_kebab() {
        assert_eq!(camel_to_kebab("fontSize"), "font-size");
        assert_eq!(camel_to_kebab("backgroundColor"), "background-color");
        assert_eq!(camel_to_kebab("left"), "left");
        assert_eq!(camel_to_kebab("border-radius"), "border-radius");
    }

    #[test]
    fn first_write_wins() {
        let mut map = StyleMap::new();
        map.set_if_absent("left", "10px");
        map.set_if_absent("left", "50px");
        assert_eq!(map.to_css(), "left: 10px");
    }

    #[test]
    fn flat_map_is_applied_in_sorted_key_order() {
        let mut flat = BTreeMap::new();
        flat.insert("fontSize".to_string(), "20px".to_string());
        flat.insert("color".to_string(), "#333".to_string());
        let mut map = StyleMap::new();
        map.apply_flat(&flat);
        assert_eq!(map.to_css(), "color: #333; font-size: 20px");
    }

    #[test]
    fn structured_table_translates_per_field() {
        let style: Style = serde_json::from_str(
            r##"{"fontSize":16,"fontWeight":600,"textColor":"#FFF","borderRadius":8,"objectFit":"scale-down"}"##,
        )
        .unwrap();
        let mut map = StyleMap::new();
        map.apply_structured(&style);
        assert_eq!(
            map.to_css(),
            "font-size: 16px; font-weight: 600; color: #FFF; border-radius: 8px; object-fit: scale-down"
        );
    }

    #[test]
    fn color_wins_over_text_color_alias() {
        let style = Style {
            color: Some("#111".to_string()),
            text_color: Some("#222".to_string()),
            ..Style::default()
        };
        let mut map = StyleMap::new();
        map.apply_structured(&style);
        assert_eq!(map.to_css(), "color: #111");
    }

    #[test]
    fn keyword_font_weight_round_trips() {
        let style: Style = serde_json::from_str(r#"{"fontWeight":"bold"}"#).unwrap();
        let mut map = StyleMap::new();
        map.apply_structured(&style);
        assert_eq!(map.to_css(), "font-weight: bold");
    }

    #[test]
    fn whole_pixel_values_have_no_fraction() {
        assert_eq!(px(50.0), "50px");
        assert_eq!(px(0.0), "0px");
        assert_eq!(px(12.5), "12.5px");
    }
}
