use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fintrack::cli::{
    handle_account_command, handle_budget_command, handle_category_command,
    handle_dashboard_command, handle_goal_command, handle_report_command,
    handle_transaction_command, AccountCommands, BudgetCommands, CategoryCommands, GoalCommands,
    ReportCommands, TransactionCommands,
};
use fintrack::config::{Backend, FintrackPaths, Settings};
use fintrack::storage::init::initialize_storage;
use fintrack::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracker: accounts, transactions, budgets and goals",
    long_about = "fintrack keeps accounts, transactions, categories, budgets and \
                  savings goals in a hosted record store, or in a local mock store \
                  seeded with sample data."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "tx")]
    Transaction(TransactionCommands),

    /// Category commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Financial overview for a month
    Dashboard {
        /// Any date in the month to show (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Print the headline figures as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Write the config file and seed the mock store
    Init {
        /// Overwrite existing mock data with the fixtures
        #[arg(long)]
        reset: bool,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FintrackPaths::new()?;
    let settings = Settings::load(&paths).context("Failed to load settings")?;
    fintrack::logging::init(&settings);

    let open = || Storage::from_settings(&settings, &paths);

    let Some(command) = cli.command else {
        println!("fintrack - personal finance tracker");
        println!();
        println!("Run 'fintrack --help' for usage information.");
        println!("Run 'fintrack init' to set up sample data.");
        return Ok(());
    };

    match command {
        Commands::Init { reset } => {
            println!("Initializing fintrack at: {}", paths.base_dir().display());
            let seeded = initialize_storage(&paths, &settings, reset)?;
            if seeded {
                println!("Sample accounts, categories, transactions, budgets and goals written to:");
                println!("  {}", paths.data_dir().display());
            } else {
                println!("Existing data kept. Use --reset to start over from the sample data.");
            }
            println!("Initialization complete!");
        }
        Commands::Config => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:     {}", paths.base_dir().display());
            println!("Settings file:      {}", paths.settings_file().display());
            println!("Data directory:     {}", paths.data_dir().display());
            println!("Fixtures directory: {}", paths.fixtures_dir().display());
            println!();
            println!("Settings:");
            println!("  Backend:         {}", settings.backend);
            match settings.backend {
                Backend::Mock => {
                    println!("  Latency:         {} ms", settings.mock.latency_ms);
                    println!("  Persist:         {}", settings.mock.persist);
                }
                Backend::Remote => {
                    println!("  API URL:         {}", settings.remote.base_url);
                    println!("  Project:         {}", settings.remote.project_id);
                    println!("  Timeout:         {} s", settings.remote.timeout_secs);
                }
            }
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Log level:       {}", settings.log_level);
        }
        Commands::Account(cmd) => handle_account_command(&open()?, &settings, cmd)?,
        Commands::Transaction(cmd) => handle_transaction_command(&open()?, &settings, cmd)?,
        Commands::Category(cmd) => handle_category_command(&open()?, &settings, cmd)?,
        Commands::Budget(cmd) => handle_budget_command(&open()?, &settings, cmd)?,
        Commands::Goal(cmd) => handle_goal_command(&open()?, &settings, cmd)?,
        Commands::Dashboard { date, csv } => {
            handle_dashboard_command(&open()?, &settings, date, csv)?
        }
        Commands::Report(cmd) => handle_report_command(&open()?, &settings, cmd)?,
    }

    Ok(())
}
