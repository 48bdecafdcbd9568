use clap::{Parser, Subcommand};
use quitlog_core::journal::read_entries;
use quitlog_core::view::{render_profile, render_status};
use quitlog_core::*;
use std::io;
use std::path::{Path, PathBuf};

mod session;

use session::MenuSettings;

#[derive(Parser)]
#[command(name = "quitlog")]
#[command(about = "Smoking and abstention tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status and read menu commands (default)
    Menu,

    /// Answer the questionnaire and create a new profile
    Init {
        /// Replace an existing profile
        #[arg(long)]
        force: bool,
    },

    /// Print elapsed time and savings
    Status,

    /// Print the stored profile
    Profile,

    /// Start abstaining now
    Start,

    /// Record that you smoked again
    Relapse,

    /// Spend money out of your savings
    Spend {
        /// Amount to spend (defaults to the configured spend unit)
        #[arg(long)]
        amount: Option<i64>,
    },

    /// List journaled state changes
    History,

    /// Export the timeline as CSV
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Print the effective configuration
    Config {
        /// Also write it to the config file (--config, or the default path)
        #[arg(long)]
        write: bool,
    },
}

/// Resolved locations and settings shared by every command
struct App {
    config: Config,
    record_path: PathBuf,
    journal_path: PathBuf,
    cigarette_price: i64,
}

impl App {
    fn new(config: Config, data_dir: PathBuf) -> Result<Self> {
        let cigarette_price = config.pricing.price_per_cigarette()?;
        Ok(Self {
            config,
            record_path: data_dir.join("record.json"),
            journal_path: data_dir.join("journal.jsonl"),
            cigarette_price,
        })
    }

    fn settings(&self) -> MenuSettings<'_> {
        MenuSettings {
            spend_unit: self.config.pricing.spend_unit,
            currency: &self.config.pricing.currency,
        }
    }

    /// Load the stored profile, if any.
    ///
    /// A stored timeline that had no open segment is saved back with the
    /// segment opened at load time.
    fn load_user(&self) -> Result<Option<UserData<SystemClock>>> {
        let Some(record) = UserRecord::load(&self.record_path)? else {
            return Ok(None);
        };
        let stored_segments = record.segments.len();

        let user = UserData::from_record(SystemClock, record)?
            .with_cigarette_price(self.cigarette_price);
        if user.segments().len() != stored_segments {
            user.to_record().save(&self.record_path)?;
        }
        Ok(Some(user))
    }

    fn require_user(&self) -> Result<UserData<SystemClock>> {
        self.load_user()?.ok_or_else(|| {
            Error::State("No profile found. Run `quitlog init` to create one.".into())
        })
    }

    /// Save the profile and journal what changed
    fn persist(&self, user: &UserData<SystemClock>, event: JournalEvent) -> Result<()> {
        user.to_record().save(&self.record_path)?;
        JsonlSink::new(&self.journal_path).append(&JournalEntry::new(user.now(), event))
    }

    fn create_user(&self) -> Result<UserData<SystemClock>> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout().lock();

        let today = SystemClock.now().date();
        let profile = session::ask_input_profile(&mut input, &mut out, today)?;
        let user = UserData::from_input(SystemClock, &profile)?
            .with_cigarette_price(self.cigarette_price);

        self.persist(&user, JournalEvent::ProfileCreated { plan: profile.plan })?;
        tracing::info!("Created profile at {:?}", self.record_path);
        Ok(user)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    quitlog_core::logging::init_with_level(quitlog_core::logging::level_for_verbosity(
        cli.verbose,
    ));

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let app = App::new(config, data_dir)?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cmd_menu(&app),
        Commands::Init { force } => cmd_init(&app, force),
        Commands::Status => {
            let user = app.require_user()?;
            print!("{}", render_status(&user, &app.config.pricing.currency));
            Ok(())
        }
        Commands::Profile => {
            let user = app.require_user()?;
            print!("{}", render_profile(&user));
            Ok(())
        }
        Commands::Start => cmd_transition(
            &app,
            UserData::start_abstention,
            JournalEvent::AbstentionStarted,
        ),
        Commands::Relapse => cmd_transition(&app, UserData::relapse, JournalEvent::Relapsed),
        Commands::Spend { amount } => cmd_spend(&app, amount),
        Commands::History => cmd_history(&app),
        Commands::Export { path } => cmd_export(&app, path),
        Commands::Config { write } => cmd_config(&app.config, cli.config.as_deref(), write),
    }
}

fn cmd_menu(app: &App) -> Result<()> {
    let mut user = match app.load_user()? {
        Some(user) => user,
        None => app.create_user()?,
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    session::run_menu(&mut user, &mut input, &mut out, &app.settings(), |user, event| {
        app.persist(user, event)
    })
}

fn cmd_init(app: &App, force: bool) -> Result<()> {
    if !force && app.record_path.exists() {
        return Err(Error::State(format!(
            "A profile already exists at {}. Use --force to replace it.",
            app.record_path.display()
        )));
    }

    let user = app.create_user()?;
    println!();
    print!("{}", render_status(&user, &app.config.pricing.currency));
    Ok(())
}

fn cmd_transition(
    app: &App,
    apply: fn(&mut UserData<SystemClock>) -> Result<()>,
    event: JournalEvent,
) -> Result<()> {
    let mut user = app.require_user()?;
    apply(&mut user)?;
    app.persist(&user, event)?;

    print!("{}", render_status(&user, &app.config.pricing.currency));
    Ok(())
}

fn cmd_spend(app: &App, amount: Option<i64>) -> Result<()> {
    let amount = amount.unwrap_or(app.config.pricing.spend_unit);
    if amount <= 0 {
        return Err(Error::Input(format!("spend amount must be positive, got {}", amount)));
    }

    let mut user = app.require_user()?;
    if user.is_smoking() {
        return Err(Error::State(
            "Savings can only be spent while abstaining".into(),
        ));
    }
    if !user.spend(amount) {
        return Err(Error::Input(format!(
            "spending {} more would overflow the recorded total",
            amount
        )));
    }
    app.persist(&user, JournalEvent::Spent { amount })?;

    println!("Spent {} {}", amount, app.config.pricing.currency);
    print!("{}", render_status(&user, &app.config.pricing.currency));
    Ok(())
}

fn cmd_history(app: &App) -> Result<()> {
    let entries = read_entries(&app.journal_path)?;
    if entries.is_empty() {
        println!("No history recorded yet.");
        return Ok(());
    }

    for entry in entries {
        let description = match entry.event {
            JournalEvent::ProfileCreated { plan } => format!("profile created ({:?})", plan),
            JournalEvent::AbstentionStarted => "started abstention".to_string(),
            JournalEvent::Relapsed => "relapsed".to_string(),
            JournalEvent::Spent { amount } => {
                format!("spent {} {}", amount, app.config.pricing.currency)
            }
        };
        println!("{}  {}", entry.at.format("%Y-%m-%d %H:%M:%S"), description);
    }
    Ok(())
}

fn cmd_config(config: &Config, path: Option<&Path>, write: bool) -> Result<()> {
    print!("{}", config.to_toml()?);
    if write {
        match path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
    }
    Ok(())
}

fn cmd_export(app: &App, path: PathBuf) -> Result<()> {
    let user = app.require_user()?;
    let count = export_timeline_csv(user.segments(), user.now(), &path)?;
    println!("✓ Exported {} segments to {}", count, path.display());
    Ok(())
}
