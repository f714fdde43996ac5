use crate::controller::{job_cards, load_view, news_cards, DashboardShell};
use crate::server;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use jobs_intel::config::{AppConfig, BackendConfig};
use jobs_intel::dashboard::render::render_ticker;
use jobs_intel::dashboard::{DataClient, JobsQuery};
use jobs_intel::error::AppError;
use jobs_intel::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "IT Jobs Intelligence Dashboard",
    about = "Serve and inspect the jobs intelligence dashboard from the command line",
    version
)]
struct Cli {
    /// Override the backend base URL (DASHBOARD_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print job cards for a query
    Jobs(JobsArgs),
    /// Print news cards
    News(ForceArgs),
    /// Print the headline ticker
    Ticker,
    /// Navigate to a view and print its activation and markup
    View(ViewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Initial route token, as it would appear in the URL hash
    #[arg(long)]
    pub(crate) route: Option<String>,
}

#[derive(Args, Debug)]
struct JobsArgs {
    /// Free-text search
    #[arg(long, default_value = "")]
    query: String,
    /// Employment type filter ("all" disables it)
    #[arg(long = "type", default_value = "all")]
    job_type: String,
    /// Case-insensitive source filter ("all" disables it)
    #[arg(long, default_value = "all")]
    source: String,
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Ask the backend to bypass its cache
    #[arg(long)]
    force: bool,
}

impl From<JobsArgs> for JobsQuery {
    fn from(args: JobsArgs) -> Self {
        JobsQuery {
            query: args.query,
            job_type: args.job_type,
            source: args.source,
            page: args.page.max(1),
            force: args.force,
        }
    }
}

#[derive(Args, Debug)]
struct ForceArgs {
    /// Ask the backend to bypass its cache
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Route name: dashboard, jobs, trends, news or insights
    route: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, cli.api_base).await,
        Command::Jobs(args) => {
            let client = offline_client(cli.api_base)?;
            let payload = client.fetch_jobs(&JobsQuery::from(args)).await?;
            println!("{}", job_cards(&payload.jobs, Utc::now()));
            Ok(())
        }
        Command::News(args) => {
            let client = offline_client(cli.api_base)?;
            let payload = client.fetch_news(args.force).await?;
            println!("{}", news_cards(&payload.news, Utc::now()));
            Ok(())
        }
        Command::Ticker => {
            let client = offline_client(cli.api_base)?;
            let payload = client.fetch_news(false).await?;
            println!("{}", render_ticker(&payload.news));
            Ok(())
        }
        Command::View(args) => {
            let client = offline_client(cli.api_base)?;
            let (mut shell, _) = DashboardShell::start(None);
            let change = shell.show(&args.route);
            let html = load_view(&client, change.route, &JobsQuery::default()).await;
            println!("{} ({})", change.title, change.route);
            println!("{html}");
            Ok(())
        }
    }
}

/// Client for one-shot CLI commands, with config and logging initialised.
fn offline_client(api_base: Option<String>) -> Result<DataClient, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(api_base) = api_base {
        config.backend = BackendConfig::new(api_base)?;
    }
    telemetry::init(&config.telemetry)?;
    Ok(DataClient::new(&config.backend.api_base)?)
}
