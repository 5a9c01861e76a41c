//! `fir render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use fir_dom::serialize;
use fir_template::{TemplateError, Value};
use fir_view::render_view;

use super::LibraryArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Id of the template to render.
    id: String,

    /// JSON file holding the record to render against.
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Template to render instead when rendering fails.
    #[arg(long)]
    fallback: Option<String>,

    #[command(flatten)]
    library: LibraryArgs,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (_, renderer) = self.library.load()?;
        let data = self.data.as_deref().map(read_record).transpose()?;

        let el = if let Some(fallback) = &self.fallback {
            render_view(&renderer, &self.id, data.as_ref(), fallback)
        } else {
            match renderer.render_template(&self.id, data.as_ref()) {
                Ok(el) => el,
                Err(TemplateError::Render { id, failures }) => {
                    for failure in &failures {
                        output.warning(&failure.to_string());
                    }
                    return Err(CliError::Template(TemplateError::Render { id, failures }));
                }
                Err(e) => return Err(e.into()),
            }
        };

        output.markup(&serialize(&el))?;
        Ok(())
    }
}

/// Read a JSON record.
fn read_record(path: &Path) -> Result<Value, CliError> {
    let content = std::fs::read_to_string(path)?;
    let json: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        })?;
    if !json.is_object() {
        return Err(CliError::Validation(format!(
            "{}: expected a JSON object",
            path.display()
        )));
    }
    Ok(Value::from(json))
}
