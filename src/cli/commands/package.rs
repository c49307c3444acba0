//! `package` subcommand.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{CliError, Result};
use crate::tizen::package;

pub(super) async fn execute_package(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let Command::Package { build, dest } = &args.command else {
        return Err(CliError::ExecutionFailed {
            command: args.command.name().to_string(),
            reason: "not a package command".to_string(),
        }
        .into());
    };

    let artifact = package(build, dest, config.output()).await?;

    config.indent(&format!("path:    {}", artifact.path.display()));
    config.indent(&format!("size:    {} bytes", artifact.size));
    config.indent(&format!("entries: {}", artifact.entries));
    config.indent(&format!("sha256:  {}", artifact.checksum));

    Ok(())
}
