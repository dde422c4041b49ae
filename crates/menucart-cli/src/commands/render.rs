use super::context::SiteContext;
use crate::common::read_input;
use crate::detection::PluginStatus;
use crate::errors::MenuCartError;
use crate::logger;
use crate::GlobalOpts;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct RenderCommand {
    /// Menu markup to render. If not provided, reads from stdin
    pub file: Option<PathBuf>,
}

/// Run the menu's items filter over the given markup and print the result.
pub fn handle_render(cmd: RenderCommand, opts: &GlobalOpts) -> Result<(), MenuCartError> {
    let ctx = SiteContext::load(opts)?;
    let filter = ctx.menu_filter()?;
    let markup = read_input(cmd.file.as_deref())?;

    match &ctx.report.status {
        PluginStatus::Ready if ctx.report.shops.is_empty() => {
            logger::warn("No shop plugin active, menu rendered without the cart item");
        }
        PluginStatus::Ready => {}
        PluginStatus::MissingShop => {
            logger::warn("No supported shop plugin is active, cart item disabled");
        }
        PluginStatus::LegacyVersionActive { plugins } => {
            logger::warn(&format!(
                "Legacy menu cart plugin active ({}), cart item disabled",
                plugins.join(", ")
            ));
        }
    }

    logger::step(&format!("Applying {}", filter));
    let rendered: String = ctx.hooks.apply(&filter, markup, &[]);
    println!("{}", rendered.trim_end());
    Ok(())
}
