use super::context::SiteContext;
use crate::detection::PluginStatus;
use crate::errors::MenuCartError;
use crate::plugin::ADMIN_NOTICES;
use crate::GlobalOpts;
use clap::Parser;
use colored::Colorize;
use serde::Serialize;

#[derive(Parser, Debug)]
pub struct StatusCommand {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    #[serde(flatten)]
    report: &'a crate::detection::StatusReport,
    menu_slug: Option<&'a str>,
    notice: String,
}

pub fn handle_status(cmd: StatusCommand, opts: &GlobalOpts) -> Result<(), MenuCartError> {
    let ctx = SiteContext::load(opts)?;
    let notice = ctx.hooks.do_action(ADMIN_NOTICES, &[]);

    if cmd.json {
        let output = StatusOutput {
            report: &ctx.report,
            menu_slug: ctx.plugin.settings().menu_slug.as_deref(),
            notice,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let status = match &ctx.report.status {
        PluginStatus::Ready => "ready".green(),
        PluginStatus::MissingShop => "missing shop".red(),
        PluginStatus::LegacyVersionActive { .. } => "legacy version active".red(),
    };
    println!("{} {}", "Status:".bold().green(), status);

    let shops: Vec<&str> = ctx.report.shops.iter().map(|shop| shop.name).collect();
    println!(
        "  {}: {}",
        "shops".cyan(),
        if shops.is_empty() {
            "(none)".to_string()
        } else {
            shops.join(", ")
        }
    );
    if !ctx.report.legacy_plugins.is_empty() {
        println!(
            "  {}: {}",
            "legacy".cyan(),
            ctx.report.legacy_plugins.join(", ")
        );
    }
    println!(
        "  {}: {}",
        "menu".cyan(),
        ctx.plugin.settings().menu_slug.as_deref().unwrap_or("(none)")
    );
    if ctx.report.shop_notice_hidden {
        println!("  {}: {}", "shop notice".cyan(), "hidden".yellow());
    }
    if !notice.is_empty() {
        println!("{}", notice);
    }
    Ok(())
}
