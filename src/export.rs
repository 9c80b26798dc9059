//! Downloadable-file sink for rendered documents.
//!
//! The write goes through a named temp file in the destination directory
//! that is persisted into place only on success; on every error path the
//! handle is dropped and the temp file removed, so repeated exports never
//! accumulate stray files.

use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::render::{render, RenderOptions};
use crate::template::Template;

/// Render `template` and write the document to `path` atomically.
pub fn export_to_file(
    template: &Template,
    options: &RenderOptions,
    path: &Path,
) -> Result<(), ExportError> {
    let html = render(template, options)?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(html.as_bytes())?;
    tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;

    log::debug!("exported {} bytes to {}", html.len(), path.display());
    Ok(())
}

/// Download file name used by the original tool: `design-restore-{ts}.html`.
pub fn export_filename(timestamp_ms: u64) -> String {
    format!("design-restore-{}.html", timestamp_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Page;
    use pretty_assertions::assert_eq;

    fn minimal_template() -> Template {
        Template {
            version: None,
            page: Some(Page::default()),
            components: Some(Vec::new()),
        }
    }

    #[test]
    fn export_writes_the_rendered_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let template = minimal_template();

        export_to_file(&template, &RenderOptions::export(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let rendered = render(&template, &RenderOptions::export()).unwrap();
        assert_eq!(written, rendered);
    }

    #[test]
    fn invalid_template_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");

        let err = export_to_file(&Template::default(), &RenderOptions::export(), &path);
        assert!(matches!(err, Err(ExportError::Render(_))));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn filename_matches_the_original_pattern() {
        assert_eq!(export_filename(1700000000000), "design-restore-1700000000000.html");
    }
}
