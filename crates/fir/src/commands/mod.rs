//! CLI command implementations.

pub(crate) mod list;
pub(crate) mod render;
pub(crate) mod restaurant;
pub(crate) mod templates;

use std::path::PathBuf;

use clap::Args;
use fir_config::{CliSettings, Config, RenderConfig};
use fir_template::{ErrorPolicy, RenderOptions, Renderer, Templates};

use crate::error::CliError;

pub(crate) use list::ListArgs;
pub(crate) use render::RenderArgs;
pub(crate) use restaurant::RestaurantArgs;
pub(crate) use templates::TemplatesArgs;

/// Template library and render settings shared by all commands.
#[derive(Args)]
pub(crate) struct LibraryArgs {
    /// HTML file holding the template library (overrides config).
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Stop a render pass at the first directive failure.
    #[arg(long)]
    fail_fast: bool,

    /// Skip directives inside elements hidden earlier in the pass.
    #[arg(long)]
    skip_hidden: bool,

    /// Path to configuration file (default: auto-discover fir.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl LibraryArgs {
    /// Load the configuration and the template library it points to.
    pub(crate) fn load(&self) -> Result<(Config, Renderer), CliError> {
        let cli_settings = CliSettings {
            template_source: self.templates.clone(),
            error_policy: self.fail_fast.then_some(fir_config::ErrorPolicy::FailFast),
            skip_hidden: self.skip_hidden.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let library = &config.templates_resolved;
        let templates = Templates::load(&library.source, &library.class)?;
        tracing::info!(
            source = %library.source.display(),
            count = templates.len(),
            "Template library loaded"
        );

        let renderer = renderer_for(&config.render, templates);
        Ok((config, renderer))
    }
}

/// Build a renderer over `templates` with the configured settings.
pub(crate) fn renderer_for(render: &RenderConfig, templates: Templates) -> Renderer {
    let error_policy = match render.error_policy {
        fir_config::ErrorPolicy::Collect => ErrorPolicy::Collect,
        fir_config::ErrorPolicy::FailFast => ErrorPolicy::FailFast,
    };
    Renderer::new(templates)
        .with_options(
            RenderOptions::default()
                .with_error_policy(error_policy)
                .with_skip_hidden(render.skip_hidden),
        )
        .with_id_prefix(render.id_prefix.as_str())
        .with_identity_field(render.identity_field.as_str())
}
