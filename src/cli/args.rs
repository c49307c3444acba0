//! Command line argument parsing and validation.

use clap::{Parser, Subcommand};
use std::path::{Component, PathBuf};
use std::str::FromStr;

/// Samsung Tizen TV build and packaging tool
#[derive(Parser, Debug)]
#[command(
    name = "sectv_tizen",
    version,
    about = "Build and package web applications for Samsung Tizen TV",
    long_about = "Build a Tizen application tree from web sources and package it as a .wgt archive.

Usage:
  sectv_tizen build --www www --dest build/tizen --platform-repos platforms/tizen
  sectv_tizen build --www www --dest build/tizen --platform-repos platforms/tizen \\
      --script cordova.js=platforms/tizen/cordova.js
  sectv_tizen package --build build/tizen --dest out"
)]
pub struct Args {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an unpacked Tizen application tree
    Build {
        /// Web application sources
        #[arg(long, value_name = "DIR")]
        www: PathBuf,

        /// Output build directory
        #[arg(long, value_name = "DIR")]
        dest: PathBuf,

        /// Tizen platform repository (its www directory is merged into the build)
        #[arg(long, value_name = "DIR")]
        platform_repos: PathBuf,

        /// Extra file copied into the build, as DEST=SRC (repeatable)
        #[arg(long = "script", value_name = "DEST=SRC")]
        scripts: Vec<ScriptMapping>,

        /// Persisted application metadata
        #[arg(long, value_name = "FILE", default_value = crate::state::DEFAULT_USERCONF_PATH)]
        userconf: PathBuf,

        /// Cordova config.xml supplying prompt defaults
        #[arg(long, value_name = "FILE", default_value = "config.xml")]
        host_config: PathBuf,
    },

    /// Zip a built tree into package.wgt
    Package {
        /// Built tree to archive
        #[arg(long, value_name = "DIR")]
        build: PathBuf,

        /// Directory receiving package.wgt
        #[arg(long, value_name = "DIR")]
        dest: PathBuf,
    },
}

impl Command {
    /// Command name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Build { .. } => "build",
            Command::Package { .. } => "package",
        }
    }
}

/// `DEST=SRC` pair given to `--script`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptMapping {
    /// Destination relative to the build directory
    pub target: PathBuf,
    /// Source file
    pub source: PathBuf,
}

impl FromStr for ScriptMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, source) = s
            .split_once('=')
            .ok_or_else(|| format!("expected DEST=SRC, got '{}'", s))?;
        if target.is_empty() || source.is_empty() {
            return Err(format!("expected DEST=SRC, got '{}'", s));
        }
        Ok(Self {
            target: PathBuf::from(target),
            source: PathBuf::from(source),
        })
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Build {
                www,
                dest,
                platform_repos,
                scripts,
                userconf,
                host_config,
            } => {
                for (flag, path) in [
                    ("--www", www),
                    ("--dest", dest),
                    ("--platform-repos", platform_repos),
                    ("--userconf", userconf),
                    ("--host-config", host_config),
                ] {
                    if path.as_os_str().is_empty() {
                        return Err(format!("{} cannot be empty", flag));
                    }
                }
                for script in scripts {
                    let escapes = script
                        .target
                        .components()
                        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
                    if escapes {
                        return Err(format!(
                            "script destination '{}' must stay inside the build directory",
                            script.target.display()
                        ));
                    }
                }
            }
            Command::Package { build, dest } => {
                if build.as_os_str().is_empty() {
                    return Err("--build cannot be empty".to_string());
                }
                if dest.as_os_str().is_empty() {
                    return Err("--dest cannot be empty".to_string());
                }
            }
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(quiet),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        self.output.println(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        self.output.indent(message);
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new(false)
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.quiet)
    }
}
