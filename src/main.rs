use clap::Parser;
use cmpmenu::{
    app::App,
    cli::Cli,
    error,
    layout::{display, LayoutScaler},
    logging, Result,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("fatal: {}", e);
        eprintln!("{}", error::user_friendly_message(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;

    let log_dir = cli.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    if let Err(e) = logging::init(&config.log_level, &log_dir) {
        eprintln!("Logging disabled: {}", e);
    }
    match cli.config_source()? {
        Some(path) => tracing::info!("using configuration from {}", path.display()),
        None => tracing::info!("no configuration file found, using defaults"),
    }

    let query = display::from_config(&config.display);
    let scaler = LayoutScaler::global(query.as_ref());
    tracing::info!(factor = scaler.factor().value(), "layout scale factor");

    let mut app = App::new(&config, *scaler)?;
    app.init()?;

    let outcome = app.run().await;
    app.restore()?;
    outcome
}
