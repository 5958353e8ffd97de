use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use session_sheets::config::Config;
use session_sheets::dashboard::{self, ClashKey, Credentials, DashboardQuery, SessionFilter};
use session_sheets::io::csv_export;
use session_sheets::transfer;
use session_sheets::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;
    let config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Transfer(args) => execute_transfer(config, args),
        Command::Dashboard(args) => execute_dashboard(config, args),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_transfer(mut config: Config, args: TransferArgs) -> Result<()> {
    args.apply(&mut config);
    if !config.source.exists() {
        return Err(ToolError::MissingInput(config.source));
    }

    let report = transfer::run(&config)?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "Transferred {} session(s) to '{}' in {}.",
        report.rows,
        config.section,
        config.destination.display()
    );
    Ok(())
}

fn execute_dashboard(config: Config, args: DashboardArgs) -> Result<()> {
    let credentials = Credentials::from_config(&config.dashboard)?;
    let user = credentials.authorize(&args.user, args.password.as_deref())?;

    let table = transfer::load_destination(&config)?;
    let query = args.query();
    let report = dashboard::build_report(&table, user, &query);

    if let Some(path) = &args.export {
        csv_export::export_csv(path, report.records.iter().copied())?;
        eprintln!("Exported {} session(s) to {}.", report.records.len(), path.display());
    }

    match args.format {
        OutputFormat::Table => print!("{}", dashboard::render::render_text(&report)),
        OutputFormat::Json => println!("{}", dashboard::render::render_json(&report)?),
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Normalise session schedules into a formatted workbook and report on them."
)]
struct Cli {
    /// Configuration file; defaults to session-sheets.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy the source schedule into the destination section.
    Transfer(TransferArgs),
    /// Show, filter and export the destination section.
    Dashboard(DashboardArgs),
}

#[derive(clap::Args)]
struct TransferArgs {
    /// Source workbook.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Sheet of the source workbook; the first sheet by default.
    #[arg(long)]
    source_sheet: Option<String>,

    /// Destination workbook.
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Destination section (sheet) to replace.
    #[arg(long)]
    section: Option<String>,

    /// Read ambiguous numeric dates such as 05/01/2024 as day first.
    #[arg(long)]
    day_first: bool,
}

impl TransferArgs {
    fn apply(self, config: &mut Config) {
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(sheet) = self.source_sheet {
            config.source_sheet = Some(sheet);
        }
        if let Some(destination) = self.destination {
            config.destination = destination;
        }
        if let Some(section) = self.section {
            config.section = section;
        }
        if self.day_first {
            config.transform.day_first = true;
        }
    }
}

#[derive(clap::Args)]
struct DashboardArgs {
    /// Name to sign in with.
    #[arg(long)]
    user: String,

    /// Password, when the configuration requires one.
    #[arg(long, env = "SESSION_SHEETS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Keep sessions in these months (repeatable).
    #[arg(long = "month")]
    months: Vec<String>,

    /// Keep sessions with these mentors (repeatable).
    #[arg(long = "mentor")]
    mentors: Vec<String>,

    /// Keep sessions of these programs (repeatable).
    #[arg(long = "program")]
    programs: Vec<String>,

    /// Keep sessions on these weekdays (repeatable).
    #[arg(long = "day")]
    days: Vec<String>,

    /// Keep sessions for these clients (repeatable).
    #[arg(long = "client")]
    clients: Vec<String>,

    /// Fields two sessions must share to be reported as a clash.
    #[arg(long, value_enum, default_value_t = ClashMode::DateTime)]
    clashes: ClashMode,

    /// Write the selected sessions to this CSV file.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl DashboardArgs {
    fn query(&self) -> DashboardQuery {
        DashboardQuery {
            filter: SessionFilter {
                months: self.months.clone(),
                mentors: self.mentors.clone(),
                programs: self.programs.clone(),
                days: self.days.clone(),
                clients: self.clients.clone(),
            },
            clash_key: self.clashes.into(),
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ClashMode {
    /// Same date and session time.
    DateTime,
    /// Same date, session time and mentor.
    DateTimeMentor,
}

impl From<ClashMode> for ClashKey {
    fn from(mode: ClashMode) -> Self {
        match mode {
            ClashMode::DateTime => ClashKey::DateAndTime,
            ClashMode::DateTimeMentor => ClashKey::DateTimeAndMentor,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}
