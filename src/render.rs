//! Template → HTML document rendering.
//!
//! Pure transformation: no shared state, no I/O. Preview and export share
//! the same component-serialization algorithm and differ only in the
//! wrapping document shell, so the two outputs can never diverge.

use std::fmt::Write;

use crate::components::{ButtonComponent, Component, ImageComponent};
use crate::error::RenderResult;
use crate::style::{px, StyleMap};
use crate::template::{Page, Template};

/// Which document shell wraps the component markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Centered card with an info strip; meant for iframe or inline display.
    Preview,
    /// Minimal standalone document sized exactly to the page; meant for
    /// file download.
    Export,
}

/// Rendering parameters beyond the template itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub mode: RenderMode,
    /// Original source image (URL or data URI), drawn as a full-bleed
    /// `cover` background behind the components. Wins over the page's own
    /// `backgroundImage` when both are present.
    pub source_image: Option<String>,
}

impl RenderOptions {
    pub fn preview() -> Self {
        RenderOptions {
            mode: RenderMode::Preview,
            source_image: None,
        }
    }

    pub fn export() -> Self {
        RenderOptions {
            mode: RenderMode::Export,
            source_image: None,
        }
    }

    pub fn with_source_image(mut self, url: impl Into<String>) -> Self {
        self.source_image = Some(url.into());
        self
    }
}

/// Render a template into a complete, self-contained HTML document.
///
/// Fails only when `page` or `components` is absent; every other missing
/// field falls back to its documented default. For a fixed template and
/// options the output is byte-identical across calls.
pub fn render(template: &Template, options: &RenderOptions) -> RenderResult<String> {
    let (page, components) = template.validate()?;

    // Sole z-ordering mechanism: ascending layer, ties keep the original
    // sequence order (sort_by_key is stable).
    let mut ordered: Vec<&Component> = components.iter().collect();
    ordered.sort_by_key(|c| c.layer());

    let mut body = String::new();
    for component in &ordered {
        component_html(component, &mut body)?;
    }

    log::debug!(
        "rendered {} components for a {}x{} page",
        ordered.len(),
        page.width,
        page.height
    );

    match options.mode {
        RenderMode::Preview => preview_shell(page, components.len(), &body, options),
        RenderMode::Export => export_shell(page, &body, options),
    }
}

/// Render with the preview (card) shell.
pub fn render_preview(template: &Template) -> RenderResult<String> {
    render(template, &RenderOptions::preview())
}

/// Render with the minimal export shell.
pub fn render_export(template: &Template) -> RenderResult<String> {
    render(template, &RenderOptions::export())
}

/// Uniform scale factor for embedding the fixed-size preview into a
/// viewport: `min(cw/pw, ch/ph, 1)`. Never upscales.
pub fn fit_scale(
    container_width: f64,
    container_height: f64,
    page_width: f64,
    page_height: f64,
) -> f64 {
    if page_width <= 0.0 || page_height <= 0.0 {
        return 1.0;
    }
    (container_width / page_width)
        .min(container_height / page_height)
        .min(1.0)
}

// ─── Component serialization ─────────────────────────────────────────────────

fn component_html(component: &Component, out: &mut String) -> RenderResult<()> {
    match component {
        Component::Text(text) => {
            let tag = resolve_tag(text.html_tag.as_deref(), "p");
            let style = merged_common_style(component);
            let style = with_text_defaults(style);
            let content = text.content.as_deref().unwrap_or("");
            writeln!(
                out,
                "      <{tag} class=\"component\" style=\"{}\">{}</{tag}>",
                escape_html(&style.to_css()),
                escape_html(content),
            )?;
        }
        Component::Button(button) => {
            let tag = resolve_tag(button.html_tag.as_deref(), "button");
            let style = merged_common_style(component);
            let style = with_button_defaults(style, button);
            let label = button
                .text
                .as_deref()
                .or(button.content.as_deref())
                .unwrap_or("Button");
            writeln!(
                out,
                "      <{tag} class=\"component\" style=\"{}\">{}</{tag}>",
                escape_html(&style.to_css()),
                escape_html(label),
            )?;
        }
        Component::Image(image) => image_html(component, image, out)?,
        Component::Unknown(unknown) => {
            let tag = resolve_tag(unknown.html_tag.as_deref(), "div");
            let style = merged_common_style(component);
            writeln!(
                out,
                "      <{tag} class=\"component\" style=\"{}\"></{tag}>",
                escape_html(&style.to_css()),
            )?;
        }
    }
    Ok(())
}

fn image_html(
    component: &Component,
    image: &ImageComponent,
    out: &mut String,
) -> RenderResult<()> {
    let tag = resolve_tag(image.html_tag.as_deref(), "img");
    let url = image.asset_url();
    let mut style = merged_common_style(component);
    style.set_if_absent("overflow", "hidden");

    match url {
        Some(src) if image.is_real_asset() && tag == "img" => {
            style.set_if_absent("object-fit", "cover");
            let alt = image.asset_alt().unwrap_or("Image");
            writeln!(
                out,
                "      <img class=\"component\" style=\"{}\" src=\"{}\" alt=\"{}\" />",
                escape_html(&style.to_css()),
                escape_html(src),
                escape_html(alt),
            )?;
        }
        Some(src) if image.is_real_asset() => {
            // Tag is not image-capable: paint the asset as a background.
            style.set_if_absent("background-image", css_url(src));
            style.set_if_absent("background-size", "cover");
            style.set_if_absent("background-position", "center");
            writeln!(
                out,
                "      <div class=\"component\" style=\"{}\"></div>",
                escape_html(&style.to_css()),
            )?;
        }
        _ => {
            // No real asset: a plain colored block.
            let color = image.asset_dominant_color().unwrap_or("#E5E7EB");
            style.set_if_absent("background-color", color);
            writeln!(
                out,
                "      <div class=\"component\" style=\"{}\"></div>",
                escape_html(&style.to_css()),
            )?;
        }
    }
    Ok(())
}

/// Normalize both style representations and gap-fill geometry, in the
/// deterministic first-write-wins order: flat map (sorted keys) first,
/// then the structured sub-object, then position/size.
fn merged_common_style(component: &Component) -> StyleMap {
    let mut map = StyleMap::new();
    if let Some(flat) = component.css_styles() {
        map.apply_flat(flat);
    }
    if let Some(style) = component.style() {
        map.apply_structured(style);
    }
    map.set_if_absent("position", "absolute");
    if let Some(position) = component.position() {
        if let Some(x) = position.x {
            map.set_if_absent("left", px(x));
        }
        if let Some(y) = position.y {
            map.set_if_absent("top", px(y));
        }
    }
    if let Some(size) = component.size() {
        if let Some(w) = size.width {
            map.set_if_absent("width", px(w));
        }
        if let Some(h) = size.height {
            map.set_if_absent("height", px(h));
        }
    }
    map
}

fn with_text_defaults(mut map: StyleMap) -> StyleMap {
    map.set_if_absent("font-size", "16px");
    map.set_if_absent("font-weight", "400");
    map.set_if_absent("color", "#000000");
    map.set_if_absent("text-align", "left");
    map.set_if_absent("line-height", "1.5");
    map.set_if_absent("font-family", "PingFang SC, -apple-system, sans-serif");
    map.set_if_absent("display", "flex");
    map.set_if_absent("align-items", "center");
    map.set_if_absent("word-wrap", "break-word");
    map
}

fn with_button_defaults(mut map: StyleMap, button: &ButtonComponent) -> StyleMap {
    if let Some(image) = button.background_image.as_deref().filter(|u| !u.is_empty()) {
        map.set_if_absent("background-image", css_url(image));
        map.set_if_absent("background-size", "cover");
        map.set_if_absent("background-position", "center");
    }
    map.set_if_absent("color", "#FFFFFF");
    map.set_if_absent("font-size", "16px");
    map.set_if_absent("font-weight", "600");
    map.set_if_absent("border-radius", "8px");
    map.set_if_absent("border", "none");
    map.set_if_absent("box-shadow", "0 2px 4px rgba(0,0,0,0.1)");
    map.set_if_absent("cursor", "pointer");
    map.set_if_absent("display", "flex");
    map.set_if_absent("align-items", "center");
    map.set_if_absent("justify-content", "center");
    // Fill color only when no fill image claimed the background.
    if !map.contains("background-image") {
        map.set_if_absent("background-color", "#3B82F6");
    }
    map
}

/// Explicit tag override wins when it is a plain ASCII-alphanumeric name;
/// anything else falls back to the per-type default.
fn resolve_tag<'a>(explicit: Option<&'a str>, default_tag: &'a str) -> &'a str {
    match explicit {
        Some(tag) if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric()) => tag,
        _ => default_tag,
    }
}

// ─── Document shells ─────────────────────────────────────────────────────────

fn page_container_css(page: &Page, options: &RenderOptions) -> String {
    let mut css = format!(
        "position: relative; width: {}px; height: {}px; background-color: {};",
        page.width, page.height, page.background_color
    );
    let background = options
        .source_image
        .as_deref()
        .or(page.background_image.as_deref())
        .filter(|u| !u.is_empty());
    if let Some(url) = background {
        css.push_str(&format!(
            " background-image: {}; background-size: cover; background-position: center; background-repeat: no-repeat;",
            css_url(url)
        ));
    }
    css.push_str(" overflow: hidden;");
    css
}

fn preview_shell(
    page: &Page,
    component_count: usize,
    body: &str,
    options: &RenderOptions,
) -> RenderResult<String> {
    let mut html = String::new();
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Design Preview</title>
<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'PingFang SC', 'Hiragino Sans GB', sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; display: flex; align-items: center; justify-content: center; padding: 20px; }}
.card {{ background: white; border-radius: 12px; box-shadow: 0 20px 60px rgba(0, 0, 0, 0.3); overflow: auto; max-height: 95vh; }}
.info {{ background: #f8f9fa; padding: 12px 20px; border-bottom: 1px solid #e9ecef; text-align: center; font-size: 14px; color: #6c757d; }}
.page-container {{ {page_css} margin: 0 auto; }}
.component {{ position: absolute; box-sizing: border-box; }}
</style>
</head>
<body>
  <div class="card">
    <div class="info">{width} × {height}px · {count} components</div>
    <div class="page-container">
{body}    </div>
  </div>
</body>
</html>
"#,
        page_css = page_container_css(page, options),
        width = page.width,
        height = page.height,
        count = component_count,
        body = body,
    )?;
    Ok(html)
}

fn export_shell(page: &Page, body: &str, options: &RenderOptions) -> RenderResult<String> {
    let mut html = String::new();
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Design Export</title>
<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
.page-container {{ {page_css} }}
.component {{ position: absolute; box-sizing: border-box; }}
</style>
</head>
<body>
  <div class="page-container">
{body}  </div>
</body>
</html>
"#,
        page_css = page_container_css(page, options),
        body = body,
    )?;
    Ok(html)
}

// ─── Escaping ────────────────────────────────────────────────────────────────

/// Escape text for element content and attribute values. User-supplied
/// strings must never be interpreted as markup.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap a URL in a CSS `url('…')`, dropping the characters that could
/// terminate the string or the surrounding style/attribute context.
fn css_url(url: &str) -> String {
    let cleaned: String = url
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '<' | '>' | '\\'))
        .collect();
    format!("url('{}')", cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escape_covers_the_five_significant_characters() {
        assert_eq!(
            escape_html(r#"<a href="x" title='y'> & more"#),
            "&lt;a href=&quot;x&quot; title=&#39;y&#39;&gt; &amp; more"
        );
    }

    #[test]
    fn css_url_strips_breakout_characters() {
        assert_eq!(
            css_url("https://cdn/x.png?a='1'\"<b>"),
            "url('https://cdn/x.png?a=1b')"
        );
    }

    #[test]
    fn invalid_explicit_tags_fall_back() {
        assert_eq!(resolve_tag(Some("a"), "button"), "a");
        assert_eq!(resolve_tag(Some("h1"), "p"), "h1");
        assert_eq!(resolve_tag(Some("scr ipt"), "div"), "div");
        assert_eq!(resolve_tag(Some(""), "div"), "div");
        assert_eq!(resolve_tag(None, "img"), "img");
    }

    #[test]
    fn fit_scale_never_upscales_and_guards_zero_pages() {
        assert_eq!(fit_scale(375.0, 667.0, 750.0, 1334.0), 0.5);
        assert_eq!(fit_scale(2000.0, 2000.0, 750.0, 1334.0), 1.0);
        assert_eq!(fit_scale(100.0, 100.0, 0.0, 100.0), 1.0);
    }

    #[test]
    fn fit_scale_is_limited_by_the_tighter_axis() {
        let scale = fit_scale(750.0, 667.0, 750.0, 1334.0);
        assert_eq!(scale, 0.5);
    }
}
