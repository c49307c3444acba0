//! Rendering of the Tizen `config.xml` and `.project` templates.
//!
//! Templates ship in the platform repository as `<name>.tmpl` files and are
//! copied into the build tree before rendering. Rendering happens in place:
//! the rendered text goes to `<name>.tmpl.tmp`, is renamed onto the final
//! name, and the template itself is removed.

use crate::metadata::ApplicationMetadata;
use crate::tizen::error::{Context, ErrorExt, Result};
use handlebars::Handlebars;
use std::path::{Path, PathBuf};
use tokio::fs;

const TEMPLATE_SUFFIX: &str = ".tmpl";

/// A template shipped by the platform repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSpec {
    /// File name of the template inside the build tree
    pub file_name: &'static str,
    /// Whether the rendered file is a dotfile
    pub hidden: bool,
}

/// Widget manifest, rendered to `config.xml`.
pub const MANIFEST_TEMPLATE: TemplateSpec = TemplateSpec {
    file_name: "config.xml.tmpl",
    hidden: false,
};

/// Tizen Studio project descriptor, rendered to `.project`.
pub const PROJECT_TEMPLATE: TemplateSpec = TemplateSpec {
    file_name: "project.tmpl",
    hidden: true,
};

/// Templates rendered by every build, in order.
pub const TIZEN_TEMPLATES: [TemplateSpec; 2] = [MANIFEST_TEMPLATE, PROJECT_TEMPLATE];

impl TemplateSpec {
    /// Name of the rendered file: suffix stripped, `.` prepended for hidden outputs.
    pub fn output_name(&self) -> String {
        let base = self
            .file_name
            .strip_suffix(TEMPLATE_SUFFIX)
            .unwrap_or(self.file_name);
        if self.hidden {
            format!(".{}", base)
        } else {
            base.to_string()
        }
    }
}

/// Result of installing one template.
#[derive(Debug)]
pub struct InstalledTemplate {
    /// Path of the rendered file
    pub output: PathBuf,
    /// Set when the consumed template could not be removed
    pub warning: Option<String>,
}

/// Render `source` with the four metadata placeholders.
///
/// Values are HTML-escaped, which keeps the XML outputs well-formed.
pub fn render(source: &str, metadata: &ApplicationMetadata) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_template_string("tizen", source)?;
    let data = metadata.template_data();
    Ok(handlebars.render("tizen", &data)?)
}

/// Render the template described by `spec` inside `dir` and replace it with its output.
pub async fn install_template(
    dir: &Path,
    spec: &TemplateSpec,
    metadata: &ApplicationMetadata,
) -> Result<InstalledTemplate> {
    let template_path = dir.join(spec.file_name);
    let staging_path = dir.join(format!("{}.tmp", spec.file_name));
    let output = dir.join(spec.output_name());

    let source = fs::read_to_string(&template_path)
        .await
        .fs_context("reading template", &template_path)?;
    let rendered = render(&source, metadata)
        .with_context(|| format!("rendering {}", spec.file_name))?;

    fs::write(&staging_path, rendered)
        .await
        .fs_context("writing rendered template", &staging_path)?;
    fs::rename(&staging_path, &output)
        .await
        .fs_context("installing rendered template", &output)?;

    let warning = match fs::remove_file(&template_path).await {
        Ok(()) => None,
        Err(e) => {
            let message = format!("Could not remove {}: {}", template_path.display(), e);
            log::warn!("{}", message);
            Some(message)
        }
    };

    log::debug!("Rendered {} -> {}", spec.file_name, output.display());
    Ok(InstalledTemplate { output, warning })
}
