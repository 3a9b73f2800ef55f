use clap::Parser;
use schulessen::report::week_block;
use schulessen::{Config, OrderRun, Params, RunReport, Session};
use std::path::PathBuf;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "schulessen")]
#[command(about = "Place all open school-lunch orders, week by week")]
#[command(version)]
struct Cli {
    /// Config file to run
    #[arg(default_value = "schulessen.yaml")]
    config: PathBuf,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Show the browser window (overrides config)
    #[arg(long, conflicts_with = "headless")]
    show: bool,

    /// Set a parameter (can be used multiple times)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Portal login name, used for the `username` parameter
    #[arg(long, env = "SCHULESSEN_USERNAME")]
    username: Option<String>,

    /// Portal password, used for the `password` parameter
    #[arg(long, env = "SCHULESSEN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Stop after this many weeks (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_weeks: Option<u32>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    // Logs go to stderr so stdout only carries the order summaries.
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> schulessen::Result<()> {
    let mut params = Params::from_args(&cli.params)?;
    if let Some(username) = cli.username {
        params = params.set_default("username", username);
    }
    if let Some(password) = cli.password {
        params = params.set_default("password", password);
    }

    let mut config = Config::load_with_params(&cli.config, &params)?;

    if cli.check {
        print_check(&config);
        return Ok(());
    }

    if cli.headless {
        config.browser.headless = true;
    }
    if cli.show {
        config.browser.headless = false;
    }
    if let Some(weeks) = cli.max_weeks {
        config.timing.max_weeks = Some(weeks);
    }

    let session = Session::launch(&config.browser).await?;
    let outcome = order(&session, &config, cli.json).await;
    if outcome.is_err() {
        session.save_failure_screenshot(&config).await;
    }
    let closed = session.close().await;

    let report = outcome?;
    closed?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if report.period_end {
            println!("No more 'next week' button found, end of order period reached.");
        }
        println!("{}", report.totals());
    }
    Ok(())
}

async fn order(session: &Session, config: &Config, json: bool) -> schulessen::Result<RunReport> {
    session.login(config).await?;
    session.open_menu(config).await?;

    let run = OrderRun::new(session.accessor(), config);
    let mut index = 0;
    run.run_with(|week| {
        let block = week_block(index, week);
        if !json && !block.is_empty() {
            println!("{}", block);
        }
        index += 1;
    })
    .await
}

fn print_check(config: &Config) {
    println!("Config valid: {}", config.name);
    println!("  Portal: {}", config.portal.url);
    println!("  Headless: {}", config.browser.headless);
    println!("  Menu link: {}", config.menu.link_text);
    println!("  Order buttons: {}", config.menu.placeable);
    println!("  Ordered buttons: {}", config.menu.existing);
    println!("  Next week: {}", config.menu.next_week);
    println!("  Date attribute: {}", config.menu.date_attribute);
    println!("  Settle delay: {}ms", config.timing.settle_ms);
    if let Some(weeks) = config.timing.max_weeks {
        println!("  Max weeks: {}", weeks);
    }
    if !config.params.is_empty() {
        println!("  Parameters: {}", config.params.len());
        let mut names: Vec<_> = config.params.keys().collect();
        names.sort();
        for name in names {
            let def = &config.params[name];
            let req = if def.required { " (required)" } else { "" };
            let desc = def.description.as_deref().unwrap_or("");
            println!("    - {}{}: {}", name, req, desc);
        }
    }
}
