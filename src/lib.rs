//! designtml — render design-analysis templates into HTML documents and
//! talk to the analysis/generation backend.
//!
//! A template is the JSON document produced by the backend: a `page`
//! describing the canvas plus a list of positioned `components` (text,
//! buttons, image regions). This crate parses that document
//! ([`Template`]), renders it deterministically into a self-contained
//! HTML page ([`render`], [`render_preview`], [`render_export`]), writes
//! it to disk atomically ([`export_to_file`]), and exposes a typed client
//! for the backend endpoints ([`ApiClient`]).
//!
//! ```no_run
//! use designtml::{render_preview, Template};
//!
//! let template = Template::parse(r#"{"page":{},"components":[]}"#)?;
//! let html = render_preview(&template)?;
//! # Ok::<(), designtml::RenderError>(())
//! ```

pub mod api;
pub mod components;
pub mod error;
pub mod export;
pub mod render;
pub mod style;
pub mod template;

pub use api::{
    AnalyzeConfig, AnalyzeData, ApiClient, ApiEnvelope, GenerateImageData, GenerateImageRequest,
    HistoryPage, HistoryQuery,
};
pub use components::{
    ButtonComponent, Component, ImageComponent, Placeholder, Position, Size, TextComponent,
    UnknownComponent,
};
pub use error::{ApiError, ExportError, RenderError, RenderResult};
pub use export::{export_filename, export_to_file};
pub use render::{fit_scale, render, render_export, render_preview, RenderMode, RenderOptions};
pub use style::{FontWeight, ObjectFit, Style, StyleMap};
pub use template::{Page, Template};

/// Parse a template from JSON. Shorthand for [`Template::parse`].
pub fn parse_template(json: &str) -> RenderResult<Template> {
    Template::parse(json)
}
