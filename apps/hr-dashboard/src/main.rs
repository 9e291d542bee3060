mod commands;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{
    Department, EmployeeForm, EmployeeId, EmployeeStore, HttpEmployeeSource, SeededEnrichment,
    source::ID_LISTING_LIMIT,
};

use crate::{commands::Dashboard, config::AppConfig};

#[derive(Parser, Debug)]
#[command(name = "hr-dashboard", version, about = "Browse, filter and bookmark employees")]
struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List employees matching the given filters.
    List(ListArgs),
    /// Show an employee's profile, looked up directly from the directory.
    Show { id: EmployeeId },
    /// Toggle a bookmark (persisted).
    Bookmark { id: EmployeeId },
    /// List bookmarked employees.
    Bookmarks,
    /// Promote an employee one rating step (current session only).
    Promote { id: EmployeeId },
    /// Assign an employee to a project.
    Assign { id: EmployeeId },
    /// Add an employee to the roster (current session only).
    Add(AddArgs),
    /// Department averages, quick stats and bookmark trend.
    Analytics,
    /// Enumerate employee ids the directory knows.
    Ids {
        /// How many directory records to enumerate.
        #[arg(long, default_value_t = ID_LISTING_LIMIT)]
        limit: usize,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Case-insensitive match on name, email or department.
    #[arg(long)]
    search: Option<String>,
    /// Restrict to a department; repeatable.
    #[arg(long = "department", value_name = "DEPARTMENT")]
    departments: Vec<Department>,
    /// Restrict to a performance rating; repeatable.
    #[arg(long = "rating", value_name = "1-5", value_parser = clap::value_parser!(u8).range(1..=5))]
    ratings: Vec<u8>,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    age: String,
    #[arg(long)]
    department: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long)]
    state: Option<String>,
}

impl From<AddArgs> for EmployeeForm {
    fn from(value: AddArgs) -> Self {
        EmployeeForm {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            age: value.age,
            department: value.department,
            address: value.address,
            city: value.city,
            postal_code: value.postal_code,
            state: value.state,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let dashboard = Dashboard::new(Arc::new(build_store(&config)?), cli.json);

    match cli.command {
        Command::List(args) => dashboard.list(args).await,
        Command::Show { id } => dashboard.show(id).await,
        Command::Bookmark { id } => dashboard.bookmark(id),
        Command::Bookmarks => dashboard.bookmarks().await,
        Command::Promote { id } => dashboard.promote(id).await,
        Command::Assign { id } => dashboard.assign(id),
        Command::Add(args) => dashboard.add(args.into()).await,
        Command::Analytics => dashboard.analytics().await,
        Command::Ids { limit } => dashboard.ids(limit).await,
    }
}

fn build_store(config: &AppConfig) -> Result<EmployeeStore<HttpEmployeeSource>> {
    let source = HttpEmployeeSource::with_timeout(&config.api_base_url, config.request_timeout)
        .context("failed to build employee directory client")?;
    tracing::debug!(base_url = %source.base_url(), "using employee directory");
    let storage = Arc::new(config.storage.open());
    tracing::debug!(dir = %storage.dir().display(), "using bookmark storage");
    let store = EmployeeStore::new(source, storage).with_page_size(config.page_size);
    Ok(match config.enrichment_seed {
        Some(seed) => store.with_enrichment(SeededEnrichment::new(seed)),
        None => store,
    })
}
