use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use kastoko::AppCommand;
use kastoko::core::log::init_logging;
use kastoko::core::{CustomRange, Kind, KindFilter, Period, Unit};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show balance, income, expense, the net-flow series and the transaction list
    Dashboard {
        /// all, today, week, month, year or custom
        #[arg(short, long)]
        period: Option<Period>,
        /// First day of a custom range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day of a custom range (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Narrow the list to income or expense
        #[arg(short, long, default_value = "all")]
        kind: KindFilter,
    },
    /// Record an income or expense
    AddTransaction {
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        amount: Decimal,
        /// income or expense
        #[arg(short, long)]
        kind: Kind,
        #[arg(long)]
        category: String,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List products
    Products {
        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a product to the catalog
    AddProduct {
        name: String,
        /// kg or dus
        #[arg(short, long, default_value = "kg")]
        unit: Unit,
    },
    /// Rename a product or change its default unit
    EditProduct {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        unit: Option<Unit>,
    },
    /// Remove a product from the catalog
    DeleteProduct { id: String },
    /// Show price history with changes against the previous record
    Prices {
        /// Only show this product id
        #[arg(short, long)]
        product: Option<String>,
    },
    /// Record a product price
    RecordPrice {
        product: String,
        price: Decimal,
        /// Defaults to the product's default unit
        #[arg(short, long)]
        unit: Option<Unit>,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Store the bearer token used for API requests
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored token
    Logout,
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Setup => AppCommand::Setup,
            Commands::Dashboard {
                period,
                from,
                to,
                kind,
            } => AppCommand::Dashboard {
                period,
                range: CustomRange::new(from, to),
                kind,
            },
            Commands::AddTransaction {
                description,
                amount,
                kind,
                category,
                date,
            } => AppCommand::AddTransaction {
                description,
                amount,
                kind,
                category,
                date,
            },
            Commands::Products { search } => AppCommand::Products { search },
            Commands::AddProduct { name, unit } => AppCommand::AddProduct { name, unit },
            Commands::EditProduct { id, name, unit } => AppCommand::EditProduct { id, name, unit },
            Commands::DeleteProduct { id } => AppCommand::DeleteProduct { id },
            Commands::Prices { product } => AppCommand::Prices { product },
            Commands::RecordPrice {
                product,
                price,
                unit,
                date,
            } => AppCommand::RecordPrice {
                product,
                price,
                unit,
                date,
            },
            Commands::Register {
                name,
                email,
                password,
            } => AppCommand::Register {
                name,
                email,
                password,
            },
            Commands::Login { token } => AppCommand::Login { token },
            Commands::Logout => AppCommand::Logout,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(cmd) => kastoko::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
