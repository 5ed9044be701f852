pub mod api;
pub mod cli;
pub mod core;

use crate::api::payload::{NewTransaction, NewUser, ProductDraft};
use crate::api::{ApiClient, SessionInvalidated, TokenFile};
use crate::cli::dashboard::DashboardQuery;
use crate::core::config::AppConfig;
use crate::core::{CustomRange, Kind, KindFilter, Period, Unit};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Write the example configuration file.
    Setup,
    Dashboard {
        /// Falls back to custom when a range bound is given, else to the configured default.
        period: Option<Period>,
        range: CustomRange,
        kind: KindFilter,
    },
    AddTransaction {
        description: String,
        amount: Decimal,
        kind: Kind,
        category: String,
        /// Defaults to today in the configured zone.
        date: Option<NaiveDate>,
    },
    Products {
        search: Option<String>,
    },
    AddProduct {
        name: String,
        unit: Unit,
    },
    EditProduct {
        id: String,
        name: Option<String>,
        unit: Option<Unit>,
    },
    DeleteProduct {
        id: String,
    },
    Prices {
        product: Option<String>,
    },
    RecordPrice {
        product: String,
        price: Decimal,
        unit: Option<Unit>,
        date: Option<NaiveDate>,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
    Login {
        token: String,
    },
    Logout,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    if matches!(command, AppCommand::Setup) {
        return match config_path {
            Some(path) => cli::setup::setup_at_path(path),
            None => cli::setup::setup(),
        };
    }

    info!("kastoko starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let tz = config.tz()?;
    let now = Utc::now().with_timezone(&tz);
    let tokens = TokenFile::in_dir(config.data_dir()?);

    match command {
        AppCommand::Login { token } => return cli::session::login(&tokens, &token),
        AppCommand::Logout => return cli::session::logout(&tokens),
        _ => {}
    }

    let invalidated = tokens.clone();
    let on_session_invalidated: SessionInvalidated =
        Arc::new(move || cli::session::invalidate_session(&invalidated));
    let client = ApiClient::from_config(&config.api, Arc::new(tokens), on_session_invalidated)?;

    match command {
        AppCommand::Dashboard {
            period,
            range,
            kind,
        } => {
            let period = period.unwrap_or(if range.start.is_some() || range.end.is_some() {
                Period::Custom
            } else {
                config.default_period
            });
            let query = DashboardQuery {
                period,
                range,
                kind,
            };
            cli::dashboard::run(&client, &query, &now).await
        }
        AppCommand::AddTransaction {
            description,
            amount,
            kind,
            category,
            date,
        } => {
            let transaction = NewTransaction {
                description,
                amount,
                kind,
                category,
                date: date.unwrap_or_else(|| now.date_naive()),
            };
            cli::transactions::add(&client, &transaction).await?;
            cli::dashboard::run(
                &client,
                &DashboardQuery::for_period(config.default_period),
                &now,
            )
            .await
        }
        AppCommand::Products { search } => cli::products::list(&client, search.as_deref()).await,
        AppCommand::AddProduct { name, unit } => {
            let draft = ProductDraft {
                name,
                default_unit: unit,
            };
            cli::products::add(&client, &draft).await
        }
        AppCommand::EditProduct { id, name, unit } => {
            cli::products::edit(&client, &id, name, unit).await
        }
        AppCommand::DeleteProduct { id } => cli::products::delete(&client, &id).await,
        AppCommand::Prices { product } => {
            cli::prices::show(&client, product.as_deref(), &now).await
        }
        AppCommand::RecordPrice {
            product,
            price,
            unit,
            date,
        } => {
            let date = date.unwrap_or_else(|| now.date_naive());
            cli::prices::record(&client, &product, price, unit, date, &now).await
        }
        AppCommand::Register {
            name,
            email,
            password,
        } => {
            let user = NewUser {
                name,
                email,
                password,
            };
            cli::session::register(&client, &user).await
        }
        AppCommand::Setup | AppCommand::Login { .. } | AppCommand::Logout => Ok(()),
    }
}
