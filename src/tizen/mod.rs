//! Samsung Tizen TV build and packaging.
//!
//! [`TizenPackager::build`] turns a web application tree into an unpacked
//! Tizen tree:
//!
//! 1. resolve paths,
//! 2. reuse cached metadata from `userconf.json` or prompt for it,
//! 3. copy scripts, web sources and `platform_repos/www` into the destination,
//! 4. render `config.xml.tmpl` and `project.tmpl`,
//! 5. persist the metadata.
//!
//! [`package`] zips a built tree into `package.wgt`.
//!
//! ```no_run
//! use sectv_tizen_packager::cli::OutputManager;
//! use sectv_tizen_packager::metadata::HostDefaults;
//! use sectv_tizen_packager::prompt::LinePrompter;
//! use sectv_tizen_packager::state::UserConfStore;
//! use sectv_tizen_packager::tizen::{BuildInputs, TizenPackager, package};
//!
//! # async fn example() -> sectv_tizen_packager::Result<()> {
//! let mut packager = TizenPackager::new(
//!     UserConfStore::default(),
//!     HostDefaults::default(),
//!     LinePrompter::stdio(),
//!     OutputManager::default(),
//! );
//! let inputs = BuildInputs::new("www", "build/tizen", "platforms/tizen")
//!     .with_script("cordova.js", "platforms/tizen/cordova.js");
//! let report = packager.build(&inputs).await?;
//! package(&report.dest, "out".as_ref(), &OutputManager::default()).await?;
//! # Ok(())
//! # }
//! ```

mod build;
mod error;
mod package;
mod template;
pub(crate) mod utils;

pub use error::{Context, Error, ErrorExt, Result};
pub use package::{PACKAGE_FILE_NAME, PackagedArtifact, archive_dir, package};
pub use template::{
    InstalledTemplate, MANIFEST_TEMPLATE, PROJECT_TEMPLATE, TIZEN_TEMPLATES, TemplateSpec,
    install_template, render,
};

use crate::cli::OutputManager;
use crate::error::CliError;
use crate::metadata::{ApplicationMetadata, HostDefaults};
use crate::prompt::Prompter;
use crate::state::UserConfStore;
use path_absolutize::Absolutize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Paths consumed by [`TizenPackager::build`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInputs {
    /// Web application sources
    pub www_src: PathBuf,
    /// Output build directory
    pub dest: PathBuf,
    /// Tizen platform repository; its `www` directory is overlaid on the sources
    pub platform_repos: PathBuf,
    /// Extra files: destination path relative to `dest` -> source file
    pub scripts: BTreeMap<PathBuf, PathBuf>,
}

impl BuildInputs {
    /// Inputs without extra scripts
    pub fn new(
        www_src: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
        platform_repos: impl Into<PathBuf>,
    ) -> Self {
        Self {
            www_src: www_src.into(),
            dest: dest.into(),
            platform_repos: platform_repos.into(),
            scripts: BTreeMap::new(),
        }
    }

    /// Add a script copied verbatim to `dest/<target>`
    pub fn with_script(mut self, target: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        self.scripts.insert(target.into(), source.into());
        self
    }

    /// Absolute paths, with script targets checked and normalised.
    pub fn resolve(&self) -> crate::Result<Self> {
        let mut scripts = BTreeMap::new();
        for (target, source) in &self.scripts {
            scripts.insert(normalize_script_target(target)?, absolute(source)?);
        }

        Ok(Self {
            www_src: absolute(&self.www_src)?,
            dest: absolute(&self.dest)?,
            platform_repos: absolute(&self.platform_repos)?,
            scripts,
        })
    }
}

/// Absolute form of `path` relative to the working directory. Symlinks are not resolved.
pub(crate) fn absolute(path: &Path) -> crate::Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}

fn normalize_script_target(target: &Path) -> crate::Result<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in target.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            _ => {
                return Err(CliError::InvalidArguments {
                    reason: format!(
                        "script destination '{}' must be a relative path inside the build directory",
                        target.display()
                    ),
                }
                .into());
            }
        }
    }
    if normalized.as_os_str().is_empty() {
        return Err(CliError::InvalidArguments {
            reason: "script destination cannot be empty".to_string(),
        }
        .into());
    }
    Ok(normalized)
}

/// Where the metadata of a build came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSource {
    /// Entered through the full prompt
    Prompted,
    /// Reused from `userconf.json` with a new version
    Cached,
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Absolute build directory
    pub dest: PathBuf,
    /// Metadata the templates were rendered with
    pub metadata: ApplicationMetadata,
    /// Where the metadata came from
    pub source: MetadataSource,
    /// Rendered files
    pub rendered: Vec<PathBuf>,
    /// Problems that did not stop the build
    pub warnings: Vec<String>,
}

/// Build context: persisted state, prompt defaults, prompter and output.
#[derive(Debug)]
pub struct TizenPackager<P> {
    store: UserConfStore,
    host: HostDefaults,
    prompter: P,
    output: OutputManager,
}

impl<P: Prompter> TizenPackager<P> {
    /// Create a packager
    pub fn new(store: UserConfStore, host: HostDefaults, prompter: P, output: OutputManager) -> Self {
        Self {
            store,
            host,
            prompter,
            output,
        }
    }

    /// Userconf store used by builds
    pub fn store(&self) -> &UserConfStore {
        &self.store
    }

    /// Give back the prompter
    pub fn into_prompter(self) -> P {
        self.prompter
    }
}
