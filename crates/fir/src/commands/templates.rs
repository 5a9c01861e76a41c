//! `fir templates` command implementation.

use clap::Args;

use super::LibraryArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the templates command.
#[derive(Args)]
pub(crate) struct TemplatesArgs {
    #[command(flatten)]
    library: LibraryArgs,
}

impl TemplatesArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, renderer) = self.library.load()?;

        output.highlight(&format!(
            "Templates in {}",
            config.templates_resolved.source.display()
        ));
        let templates = renderer.templates();
        if templates.is_empty() {
            output.warning(&format!(
                "No element with class \"{}\" and an id",
                config.templates_resolved.class
            ));
            return Ok(());
        }
        for id in templates.ids() {
            output.info(&format!("  {id}"));
        }
        output.success(&format!("{} template(s)", templates.len()));
        Ok(())
    }
}
