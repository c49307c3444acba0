//! # sectv_tizen
//!
//! Build and package web applications for Samsung Tizen TV.
//!
//! The crate turns a Cordova-style web application tree into an unpacked
//! Tizen application and zips that tree into a `.wgt` package.
//!
//! ## Features
//!
//! - **Metadata cache**: Application name, id, version and description persist
//!   in `userconf.json`; later builds reuse them and only bump the version
//! - **Overlay copy**: Web sources, platform assets and explicit scripts are
//!   merged into one build directory
//! - **Templates**: `config.xml` and `.project` are rendered from the
//!   platform repository's templates
//! - **Packaging**: The build tree is archived into `package.wgt` with its
//!   SHA-256 checksum reported
//!
//! ## Usage
//!
//! ```bash
//! sectv_tizen build --www www --dest build/tizen --platform-repos platforms/tizen
//! sectv_tizen package --build build/tizen --dest out
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod error;
pub mod metadata;
pub mod prompt;
pub mod state;
pub mod tizen;
pub mod version;

pub use cli::Args;
pub use error::{CliError, PackagerError, Result};
pub use metadata::{ApplicationMetadata, HostDefaults};
pub use prompt::{LinePrompter, Prompter, Question};
pub use state::{UserConf, UserConfStore};
pub use tizen::{BuildInputs, BuildReport, PackagedArtifact, TizenPackager, package};
