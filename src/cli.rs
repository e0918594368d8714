// src/cli.rs: CLI definition (clap derive) and command dispatch

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::auth::models::{Credentials, Registration};
use crate::catalog::Catalog;
use crate::client::{
    ApiClient, FileCredentialStore, PredictionEngine, PredictionStatus, SelectionField,
    SessionManager, SubmitOutcome, ViewAccess,
};
use crate::config::Config;
use crate::server;

#[derive(Parser)]
#[command(
    name = "crypto-predictor",
    about = "Cryptocurrency price predictions",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the backend API server
    Serve,
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List the available cryptocurrencies and models
    Catalog,
    /// Request a price prediction
    Predict {
        /// Cryptocurrency id, e.g. bitcoin
        cryptocurrency: String,
        /// Model id, e.g. lstm
        model: String,
    },
}

/// Everything the client-side commands share
struct ClientContext {
    api: Arc<ApiClient>,
    session: SessionManager,
}

impl ClientContext {
    fn new(config: &Config) -> Result<Self> {
        let store = Arc::new(FileCredentialStore::new(&config.client.credentials_path));
        let api = Arc::new(ApiClient::new(
            config.client.api_base_url.clone(),
            store.clone(),
            config.prediction.request_timeout,
        )?);
        let session = SessionManager::new(api.clone(), store);
        Ok(Self { api, session })
    }
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve => server::start(config).await,
        command => run_client(command, &config).await,
    }
}

async fn run_client(command: Commands, config: &Config) -> Result<()> {
    let ctx = ClientContext::new(config)?;
    match command {
        Commands::Serve => bail!("`serve` is not a client command"),
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            let user = ctx
                .session
                .register(Registration {
                    name,
                    email,
                    password,
                    confirm_password,
                })
                .await?;
            println!("Registered and signed in as {} <{}>", user.name, user.email);
            Ok(())
        }
        Commands::Login { email, password } => {
            let user = ctx.session.login(Credentials::new(email, password)).await?;
            println!("Signed in as {} <{}>", user.name, user.email);
            Ok(())
        }
        Commands::Logout => {
            ctx.session.logout().await;
            println!("Signed out");
            Ok(())
        }
        Commands::Whoami => {
            match ctx.session.restore_session().await {
                Some(user) => {
                    let expires = ctx
                        .session
                        .state()
                        .expires_at
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| "unknown".to_string());
                    println!("{} <{}> (session expires {})", user.name, user.email, expires);
                }
                None => println!("Not signed in"),
            }
            Ok(())
        }
        Commands::Catalog => {
            let catalog = Catalog::load(ctx.api.as_ref())
                .await
                .context("Failed to load catalog")?;
            print_catalog(&catalog);
            Ok(())
        }
        Commands::Predict {
            cryptocurrency,
            model,
        } => predict(&ctx, config, cryptocurrency, model).await,
    }
}

fn print_catalog(catalog: &Catalog) {
    println!("Cryptocurrencies:");
    for crypto in &catalog.cryptocurrencies {
        println!("  {:<10} {:<10} {}", crypto.id, crypto.symbol, crypto.name);
    }
    println!("Models:");
    for model in &catalog.models {
        println!("  {:<12} {:<20} {}", model.id, model.name, model.description);
    }
}

async fn predict(
    ctx: &ClientContext,
    config: &Config,
    cryptocurrency: String,
    model: String,
) -> Result<()> {
    ctx.session.restore_session().await;
    let user = match ctx.session.access() {
        ViewAccess::Granted(user) => user,
        ViewAccess::Pending | ViewAccess::Denied => {
            bail!("Not signed in. Run `crypto-predictor login` first")
        }
    };
    tracing::debug!("Predicting as {}", user.email);

    let catalog = Catalog::load(ctx.api.as_ref())
        .await
        .context("Failed to load catalog")?;
    let engine = PredictionEngine::new(ctx.api.clone(), catalog, config.prediction.request_timeout);
    engine.set_selection(SelectionField::Cryptocurrency, cryptocurrency);
    engine.set_selection(SelectionField::Model, model);

    match engine.submit() {
        SubmitOutcome::Started { .. } => {}
        SubmitOutcome::Rejected(e) => bail!(e),
        SubmitOutcome::Ignored => bail!("Select both a cryptocurrency and a model"),
    }

    let state = engine.settled().await;
    match (state.status, state.result, state.error) {
        (PredictionStatus::Succeeded, Some(prediction), _) => {
            let name = engine
                .catalog()
                .cryptocurrency(&prediction.cryptocurrency)
                .map(|c| c.name.as_str())
                .unwrap_or(prediction.cryptocurrency.as_str());
            println!("{} ({})", name, prediction.model);
            println!("  Predicted price: ${:.2}", prediction.predicted_price);
            println!("  Confidence:      {}%", prediction.confidence);
            println!("  As of:           {}", prediction.timestamp.to_rfc3339());
            Ok(())
        }
        (_, _, Some(error)) if error.is_retryable() => {
            bail!("{} (try again)", error)
        }
        (_, _, Some(error)) => bail!(error),
        (status, _, None) => bail!("Prediction ended in unexpected state {:?}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predict_arguments() {
        let cli = Cli::try_parse_from(["crypto-predictor", "predict", "bitcoin", "lstm"]).unwrap();
        match cli.command {
            Commands::Predict {
                cryptocurrency,
                model,
            } => {
                assert_eq!(cryptocurrency, "bitcoin");
                assert_eq!(model, "lstm");
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn confirm_password_is_optional() {
        let cli = Cli::try_parse_from([
            "crypto-predictor",
            "register",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--password",
            "hodl2024",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Register {
                confirm_password: None,
                ..
            }
        ));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["crypto-predictor"]).is_err());
    }
}
