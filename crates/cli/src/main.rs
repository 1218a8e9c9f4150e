use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sente_core::api::{AnalysisApi, ApiError};
use sente_core::config::Settings;
use sente_core::domain::evaluation::ApplicantForm;

mod chat;
mod render;

/// Client count shown in the dashboard's top-performers panel.
const DASHBOARD_TOP_LIMIT: u32 = 5;

#[derive(Debug, Parser)]
#[command(name = "sente", about = "Terminal client for the portfolio analysis service")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask the analysis service a free-text question.
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// Interactive question-and-answer session.
    Chat,

    /// Upload a portfolio dataset (csv, xlsx or xls).
    Upload { file: PathBuf },

    /// Portfolio statistics.
    Stats,

    /// Stats, top clients and risk summary, fetched concurrently.
    Dashboard,

    /// Quick portfolio insights.
    Insights,

    /// Top performing clients.
    TopClients {
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Top performing groups.
    TopGroups {
        #[arg(long)]
        limit: Option<u32>,
    },

    /// High-risk clients above an overdue threshold.
    Risk {
        #[arg(long)]
        threshold: Option<u32>,
    },

    /// Performance broken down by business type.
    Business,

    /// List clients, with optional paging and name search.
    Clients {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },

    /// List groups, with optional paging and name search.
    Groups {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },

    /// Analyze one client by name.
    AnalyzeClient {
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Analyze one group by name.
    AnalyzeGroup {
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Evaluate a loan applicant from form fields and a PDF bank statement.
    Evaluate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        business_type: String,
        #[arg(long)]
        business_age: f64,
        #[arg(long)]
        monthly_income: f64,
        #[arg(long)]
        rent_amount: f64,
        #[arg(long)]
        statement: PathBuf,
    },

    /// Service health probe.
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    match run(&settings, args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // One inline failure line for service problems; everything else
            // goes to the error reporter.
            if let Some(api_err) = err.downcast_ref::<ApiError>() {
                render::report_error(api_err);
            } else {
                sentry_anyhow::capture_anyhow(&err);
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings, command: Command) -> anyhow::Result<()> {
    let api = AnalysisApi::from_settings(settings)?;
    tracing::debug!(base_url = api.base_url(), "using analysis service");

    match command {
        Command::Ask { question } => {
            let outcome = api.ask(&question.join(" ")).await?;
            render::ask_outcome(&outcome);
        }
        Command::Chat => chat::run(&api).await?,
        Command::Upload { file } => {
            let filename = file_name_of(&file)?;
            let contents = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let report = api.upload_dataset(&filename, contents).await?;
            render::upload_report(&report);
        }
        Command::Stats => match api.get_stats().await? {
            Some(stats) => render::stats(&stats),
            None => render::empty_state(),
        },
        Command::Dashboard => dashboard(&api).await,
        Command::Insights => {
            let insights = api.get_insights().await?;
            render::insights(&insights);
        }
        Command::TopClients { limit } => {
            let top = api.get_top_clients(limit).await?;
            render::top_clients(&top);
        }
        Command::TopGroups { limit } => {
            let top = api.get_top_groups(limit).await?;
            render::top_groups(&top);
        }
        Command::Risk { threshold } => {
            let report = api.get_risk_analysis(threshold).await?;
            render::risk(&report);
        }
        Command::Business => {
            let rows = api.get_business_performance().await?;
            render::business(&rows);
        }
        Command::Clients {
            limit,
            offset,
            search,
        } => {
            let rows = api.list_clients(limit, offset, search.as_deref()).await?;
            render::client_list(&rows);
        }
        Command::Groups {
            limit,
            offset,
            search,
        } => {
            let rows = api.list_groups(limit, offset, search.as_deref()).await?;
            render::group_list(&rows);
        }
        Command::AnalyzeClient { name } => {
            let analysis = api.analyze_client(&name.join(" ")).await?;
            render::client_analysis(&analysis);
        }
        Command::AnalyzeGroup { name } => {
            let analysis = api.analyze_group(&name.join(" ")).await?;
            render::group_analysis(&analysis);
        }
        Command::Evaluate {
            name,
            business_type,
            business_age,
            monthly_income,
            rent_amount,
            statement,
        } => {
            let form = ApplicantForm {
                applicant_name: name,
                business_type,
                business_age,
                monthly_income,
                rent_amount,
            };
            let filename = file_name_of(&statement)?;
            let contents = tokio::fs::read(&statement)
                .await
                .with_context(|| format!("failed to read {}", statement.display()))?;
            let report = api.evaluate_applicant(&form, &filename, contents).await?;
            render::evaluation(&report);
        }
        Command::Health => {
            let health = api.health().await?;
            println!("{} ({})", health.status, health.service);
        }
    }

    Ok(())
}

/// The three dashboard panels fetch concurrently and render independently; a
/// failure in one leaves the other two intact.
async fn dashboard(api: &AnalysisApi) {
    let (stats, top, risk) = tokio::join!(
        api.get_stats(),
        api.get_top_clients(Some(DASHBOARD_TOP_LIMIT)),
        api.get_risk_analysis(None),
    );

    match stats {
        Ok(Some(stats)) => render::stats(&stats),
        Ok(None) => render::empty_state(),
        Err(err) => render::report_error(&err),
    }
    println!();
    match top {
        Ok(top) => render::top_clients(&top),
        Err(err) => render::report_error(&err),
    }
    println!();
    match risk {
        Ok(risk) => render::risk(&risk),
        Err(err) => render::report_error(&err),
    }
}

fn file_name_of(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("path {} has no usable file name", path.display()))
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
