//! The `build` pipeline: metadata resolution followed by build execution.

use super::template::{TIZEN_TEMPLATES, install_template};
use super::utils::fs;
use super::{BuildInputs, BuildReport, MetadataSource, TizenPackager};
use crate::error::{CopyFailure, CopyStep, PackagerError, Result};
use crate::metadata::{
    ApplicationMetadata, HostDefaults, generate_tizen_id, validate_tizen_id,
};
use crate::prompt::{Prompter, Question};
use crate::state::{CachedMetadata, UserConf};
use crate::version::{bump_revision, normalize_version, validate_version_input};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const REUSE: &str = "cache";
const REVISION: &str = "revision";

impl<P: Prompter> TizenPackager<P> {
    /// Build the unpacked Tizen tree described by `inputs`.
    ///
    /// Steps run in order and stop at the first failing step. Files already
    /// written by earlier steps are left in place.
    pub async fn build(&mut self, inputs: &BuildInputs) -> Result<BuildReport> {
        self.output.section("Start building Samsung Tizen Platform");

        let inputs = inputs.resolve()?;
        let mut conf = self.store.load().await?;
        let (metadata, source) = self.resolve_metadata(&conf)?;
        log::info!(
            "Building {} ({}) version {}",
            metadata.name,
            metadata.id,
            metadata.version
        );

        self.copy_sources(&inputs).await?;

        let mut warnings = Vec::new();
        let rendered = render_templates(&inputs.dest, &metadata, &mut warnings).await?;

        self.store.save(&mut conf, &metadata).await?;

        for warning in &warnings {
            self.output.warn(warning);
        }
        self.output
            .success(&format!("Built at {}", inputs.dest.display()));

        Ok(BuildReport {
            dest: inputs.dest,
            metadata,
            source,
            rendered,
            warnings,
        })
    }

    fn resolve_metadata(&mut self, conf: &UserConf) -> Result<(ApplicationMetadata, MetadataSource)> {
        let file = self.userconf_name();
        match conf.cached_metadata() {
            CachedMetadata::Missing => {}
            CachedMetadata::NoTizenEntry => {
                self.output.warn(&format!(
                    "'{}' is empty. Please fill out the information again.",
                    file
                ));
            }
            CachedMetadata::Corrupt(reason) | CachedMetadata::Invalid(reason) => {
                log::warn!("Ignoring {}: {}", self.store.path().display(), reason);
                self.output.warn(&format!(
                    "'{}' has invalid data. Please fill out the information again.",
                    file
                ));
            }
            CachedMetadata::Valid(cached) => {
                if let Some(metadata) = self.reuse_cached(&cached)? {
                    return Ok((metadata, MetadataSource::Cached));
                }
            }
        }

        let metadata = self.prompt_new_metadata()?;
        Ok((metadata, MetadataSource::Prompted))
    }

    /// Show the cached entry and offer it with a bumped version.
    fn reuse_cached(&mut self, cached: &ApplicationMetadata) -> Result<Option<ApplicationMetadata>> {
        // Shown through the prompter so it stays visible in quiet mode
        self.prompter.inform(&current_information(cached))?;

        let questions = cache_reuse_questions(cached, &self.userconf_name());
        let answers = self.prompter.prompt(&questions)?;
        if !answers.confirmed(REUSE) {
            return Ok(None);
        }

        let version = answers.require_text(REVISION)?;
        Ok(Some(ApplicationMetadata {
            version,
            ..cached.clone()
        }))
    }

    fn prompt_new_metadata(&mut self) -> Result<ApplicationMetadata> {
        let answers = self.prompter.prompt(&new_metadata_questions(&self.host))?;
        Ok(ApplicationMetadata {
            name: answers.require_text("name")?,
            id: answers.require_text("id")?,
            version: answers.require_text("version")?,
            description: answers.require_text("description")?,
        })
    }

    async fn copy_sources(&self, inputs: &BuildInputs) -> Result<()> {
        fs::ensure_dir_chain(&inputs.dest)
            .await
            .map_err(|error| PackagerError::CopyFailed {
                step: CopyStep::Destination,
                failures: vec![CopyFailure {
                    path: inputs.dest.clone(),
                    error,
                }],
            })?;

        let mut failures = Vec::new();
        for (target, source) in &inputs.scripts {
            let to = inputs.dest.join(target);
            match fs::copy_file(source, &to).await {
                Ok(()) => log::debug!("Copied script {} -> {}", source.display(), to.display()),
                Err(error) => failures.push(CopyFailure {
                    path: source.clone(),
                    error,
                }),
            }
        }
        check_step(CopyStep::Scripts, failures)?;

        let protected: HashSet<PathBuf> = inputs.scripts.keys().cloned().collect();

        let outcome = fs::copy_dir_contents(&inputs.www_src, &inputs.dest, &protected).await;
        log::info!(
            "Copied {} entries from {} ({} kept from scripts)",
            outcome.copied,
            inputs.www_src.display(),
            outcome.skipped
        );
        check_step(CopyStep::WebSources, outcome.failures)?;

        let platform_www = inputs.platform_repos.join("www");
        let outcome = fs::copy_dir_contents(&platform_www, &inputs.dest, &protected).await;
        log::info!(
            "Copied {} entries from {} ({} kept from scripts)",
            outcome.copied,
            platform_www.display(),
            outcome.skipped
        );
        check_step(CopyStep::PlatformAdditions, outcome.failures)
    }

    fn userconf_name(&self) -> String {
        self.store
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.store.path().display().to_string())
    }
}

fn check_step(step: CopyStep, failures: Vec<CopyFailure>) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    for failure in &failures {
        log::error!("{} failed for {}", step, failure);
    }
    Err(PackagerError::CopyFailed { step, failures })
}

async fn render_templates(
    dest: &Path,
    metadata: &ApplicationMetadata,
    warnings: &mut Vec<String>,
) -> Result<Vec<PathBuf>> {
    let mut rendered = Vec::with_capacity(TIZEN_TEMPLATES.len());
    for spec in &TIZEN_TEMPLATES {
        let installed = install_template(dest, spec, metadata)
            .await
            .map_err(|source| PackagerError::TemplateRenderFailed {
                template: dest.join(spec.file_name),
                source,
            })?;
        warnings.extend(installed.warning);
        rendered.push(installed.output);
    }
    Ok(rendered)
}

fn current_information(cached: &ApplicationMetadata) -> String {
    [
        String::new(),
        "> [ Current Information ]".to_string(),
        format!("> name        : {}", cached.name),
        format!("> id          : {}", cached.id),
        format!("> version     : {}", cached.version),
        format!("> description : {}", cached.description),
    ]
    .join("\n")
}

fn new_metadata_questions(host: &HostDefaults) -> Vec<Question> {
    let version = normalize_version(&host.version).unwrap_or_else(|| {
        log::warn!(
            "Host version '{}' is not major.minor[.revision], offering the built-in default",
            host.version
        );
        HostDefaults::default().version
    });
    vec![
        Question::input("name", "What's the application's name?").with_default(host.name.clone()),
        Question::input("id", "Application Id (Valid RegExp: [0-9a-zA-Z]{10})")
            .with_default(generate_tizen_id())
            .with_validator(validate_tizen_id),
        Question::input(
            "version",
            "Application Version (Valid RegExp: [0-9]+.[0-9]+.[0-9]+)",
        )
        .with_default(version)
        .with_validator(validate_version_input),
        Question::input("description", "Application Description")
            .with_default(host.description.clone()),
    ]
}

fn cache_reuse_questions(cached: &ApplicationMetadata, file: &str) -> Vec<Question> {
    let next_version = bump_revision(&cached.version).unwrap_or_else(|| cached.version.clone());
    vec![
        Question::confirm(
            REUSE,
            format!("Already have '{}', Do you want to use this data?", file),
            true,
        ),
        Question::input(
            REVISION,
            format!("(current version is {}), Application version", cached.version),
        )
        .with_default(next_version)
        .with_validator(validate_version_input)
        .when(|answers| answers.confirmed(REUSE)),
    ]
}
