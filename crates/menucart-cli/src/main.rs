use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wp_menu_cart::{
    commands::{
        classes::{self, ClassesCommand},
        config::{self, ConfigAction},
        fragments,
        hide_notice::{self, HideNoticeCommand},
        render::{self, RenderCommand},
        status::{self, StatusCommand},
    },
    errors::MenuCartError,
    logger, GlobalOpts,
};

#[derive(Parser)]
#[command(name = "wp-menu-cart")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Shopping cart item for site navigation menus",
    long_about = "wp-menu-cart adds a cart link to a site's navigation menu, styled with the classes the other menu items share."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render menu markup with the cart item added
    Render(RenderCommand),
    /// Print the classes shared by all top-level menu items
    Classes(ClassesCommand),
    /// Print the AJAX cart fragments as JSON
    Fragments,
    /// Show whether the cart item is enabled and why
    Status(StatusCommand),
    /// Dismiss the missing-shop notice
    HideNotice(HideNoticeCommand),
    /// Inspect or edit the configuration
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_init = match cli.global.config_path().parent() {
        Some(dir) if cli.global.config.is_some() && !dir.as_os_str().is_empty() => {
            logger::init_in(dir, cli.global.verbosity_level(), false)
        }
        _ => logger::init_with_verbosity(cli.global.verbosity_level(), false),
    };
    if let Err(e) = log_init {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing();

    let result: Result<(), MenuCartError> = match cli.command {
        Commands::Render(cmd) => render::handle_render(cmd, &cli.global),
        Commands::Classes(cmd) => classes::handle_classes(cmd),
        Commands::Fragments => fragments::handle_fragments(&cli.global),
        Commands::Status(cmd) => status::handle_status(cmd, &cli.global),
        Commands::HideNotice(cmd) => hide_notice::handle_hide_notice(cmd, &cli.global),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&e.to_string());
        if cli.global.verbosity_level() > 0 {
            logger::show_log_path();
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logger::verbosity_to_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
