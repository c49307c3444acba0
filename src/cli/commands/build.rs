//! `build` subcommand.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{CliError, Result};
use crate::metadata::read_cordova_config;
use crate::prompt::LinePrompter;
use crate::state::UserConfStore;
use crate::tizen::{BuildInputs, MetadataSource, TizenPackager};

pub(super) async fn execute_build(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let Command::Build {
        www,
        dest,
        platform_repos,
        scripts,
        userconf,
        host_config,
    } = &args.command
    else {
        return Err(CliError::ExecutionFailed {
            command: args.command.name().to_string(),
            reason: "not a build command".to_string(),
        }
        .into());
    };

    let host = read_cordova_config(host_config)?;
    log::debug!("Host defaults: {:?}", host);

    let inputs = scripts.iter().fold(
        BuildInputs::new(www, dest, platform_repos),
        |inputs, script| inputs.with_script(&script.target, &script.source),
    );

    let mut packager = TizenPackager::new(
        UserConfStore::new(userconf),
        host,
        LinePrompter::stdio(),
        config.output().clone(),
    );
    let report = packager.build(&inputs).await?;

    let source = match report.source {
        MetadataSource::Prompted => "entered",
        MetadataSource::Cached => "reused",
    };
    config.indent(&format!(
        "{} {} ({}) metadata {}",
        report.metadata.name, report.metadata.version, report.metadata.id, source
    ));
    for rendered in &report.rendered {
        config.indent(&format!("rendered {}", rendered.display()));
    }

    Ok(())
}
