#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//! `doctrack` command-line client.
//!
//! # Examples
//! ```sh
//! doctrack check-route /dashboard/reports --role Auditor
//! doctrack stats inbox-export.json
//! DOCTRACK_TOKEN=... doctrack inbox --tab vencidos
//! DOCTRACK_TOKEN=... doctrack holidays --year 2025
//! ```

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, Offset, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use doctrack::config::ClientSettings;
use doctrack::domain::ports::{AuthApi, CatalogsApi, DepartmentsApi, DocumentsApi, HolidaysApi, UsersApi};
use doctrack::domain::{
    CatalogCategory, Document, DueSoonThreshold, HolidayCalendar, InboxFilter, InboxService,
    InboxTab, LoginCredentials, Notification, Role, Rollup, RollupOptions, RoutePermissions,
    Status, active_in_order, aggregate, compute_time_status, days_remaining, flatten_tree,
    standard_menu,
};
use doctrack::outbound::http::RestClient;

const PASSWORD_ENV: &str = "DOCTRACK_PASSWORD";

#[derive(Debug, Parser)]
#[command(
    name = "doctrack",
    about = "Inspect access rules, document deadlines and dashboard rollups",
    version
)]
struct Cli {
    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decide whether a role may open a route.
    CheckRoute {
        path: String,
        /// Role to evaluate; signed-out users are evaluated as USUARIO.
        #[arg(long)]
        role: Option<Role>,
    },
    /// List the navigation entries a role can see.
    Menu {
        #[arg(long)]
        role: Option<Role>,
    },
    /// Classify a deadline for a document status.
    TimeStatus {
        #[arg(long)]
        status: Status,
        /// RFC 3339 deadline.
        #[arg(long)]
        deadline: Option<DateTime<Utc>>,
    },
    /// Aggregate an exported document list (JSON array).
    Stats { file: PathBuf },
    /// Fetch the inbox and print its counters and rows.
    Inbox {
        #[arg(long, default_value_t = InboxTab::All)]
        tab: InboxTab,
        /// Department name, sender agency or department id.
        #[arg(long)]
        department: Option<String>,
    },
    /// List the active items of a catalog.
    Catalogs { category: CatalogCategory },
    /// Print the department tree.
    Departments,
    /// List user accounts.
    Users,
    /// List the non-working days of a year.
    Holidays {
        /// Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,
    },
    /// Exchange credentials for a token. The password is read from
    /// `DOCTRACK_PASSWORD`.
    Login {
        #[arg(long)]
        email: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.json);

    let settings = ClientSettings::load_from_iter([OsString::from("doctrack")])
        .map_err(|error| eyre!("failed to load settings: {error}"))?;
    match cli.command {
        Command::CheckRoute { path, role } => check_route(&settings, &path, role),
        Command::Menu { role } => menu(&settings, role),
        Command::TimeStatus { status, deadline } => {
            time_status(settings.due_soon_threshold(), status, deadline);
            Ok(())
        }
        Command::Stats { file } => stats(&settings, &file),
        command => {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .wrap_err("failed to build runtime")?;
            runtime.block_on(remote(&settings, command))
        }
    }
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

fn permissions(settings: &ClientSettings) -> Result<RoutePermissions> {
    Ok(RoutePermissions::standard().with_unlisted_policy(settings.unlisted_routes()?))
}

fn check_route(settings: &ClientSettings, path: &str, role: Option<Role>) -> Result<()> {
    let permissions = permissions(settings)?;
    let allowed = permissions.is_authorized(path, role);
    let rule = permissions.matching_rule(path).map_or_else(
        || format!("unlisted ({})", permissions.unlisted_policy()),
        |(prefix, _)| prefix.to_owned(),
    );
    println!(
        "{} {path} role={} rule={rule}",
        if allowed { "allow" } else { "deny" },
        role.unwrap_or_default()
    );
    Ok(())
}

fn menu(settings: &ClientSettings, role: Option<Role>) -> Result<()> {
    let permissions = permissions(settings)?;
    let items = standard_menu();
    for item in permissions.filter_menu(&items, role) {
        println!("{:<20} {}", item.label(), item.href());
    }
    Ok(())
}

fn time_status(threshold: DueSoonThreshold, status: Status, deadline: Option<DateTime<Utc>>) {
    let now = Utc::now();
    let classified = compute_time_status(status, deadline, now, threshold);
    match deadline {
        Some(deadline) => println!(
            "{classified} ({} días)",
            days_remaining(deadline, now, &Local)
        ),
        None => println!("{classified}"),
    }
}

fn rollup_options(settings: &ClientSettings) -> Result<RollupOptions> {
    let mut options = RollupOptions::at(Utc::now())
        .with_offset(Local::now().offset().fix())
        .with_threshold(settings.due_soon_threshold());
    options.trend_days = settings.trend_days()?;
    options.top_departments = settings.top_departments();
    Ok(options)
}

fn stats(settings: &ClientSettings, file: &Path) -> Result<()> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let documents: Vec<Document> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse documents in {}", file.display()))?;
    print_rollup(&aggregate(&documents, &rollup_options(settings)?));
    Ok(())
}

fn print_rollup(rollup: &Rollup) {
    let kpis = rollup.kpis;
    println!(
        "total={} pendientes={} en_tramite={} atendidos={} vencidos={}",
        kpis.total, kpis.pendientes, kpis.en_tramite, kpis.atendidos, kpis.vencidos
    );
    println!("-- por estatus");
    for slice in &rollup.by_status {
        println!("{:<12} {}", slice.label, slice.count);
    }
    println!("-- por área");
    for department in &rollup.by_department {
        println!("{:<24} {}", department.label, department.count);
    }
    println!("-- tendencia");
    for day in &rollup.trend {
        println!("{} recibidos={} atendidos={}", day.date, day.incoming, day.completed);
    }
}

fn rest_client(settings: &ClientSettings) -> Result<RestClient> {
    let client = RestClient::new(settings.api_url()?, settings.request_timeout()?)
        .wrap_err("failed to build HTTP client")?;
    Ok(match settings.token() {
        Some(token) => client.with_token(token),
        None => client,
    })
}

fn report(error: doctrack::domain::Error) -> color_eyre::Report {
    eyre!("{}", Notification::from(&error))
}

async fn remote(settings: &ClientSettings, command: Command) -> Result<()> {
    let client = rest_client(settings)?;
    match command {
        Command::Inbox { tab, department } => {
            if settings.token().is_none() {
                return Err(eyre!("DOCTRACK_TOKEN is required for the inbox"));
            }
            inbox(settings, client, tab, department).await
        }
        Command::Catalogs { category } => {
            let items = CatalogsApi::list(&client, category)
                .await
                .map_err(|e| report(e.into()))?;
            for item in active_in_order(items) {
                println!("{:>3} {:<12} {}", item.order, item.code, item.name);
            }
            Ok(())
        }
        Command::Departments => {
            let tree = DepartmentsApi::tree(&client).await.map_err(|e| report(e.into()))?;
            for (depth, unit) in flatten_tree(&tree) {
                println!("{}{} {}", "  ".repeat(depth), unit.code, unit.name);
            }
            Ok(())
        }
        Command::Users => {
            let users = UsersApi::list(&client).await.map_err(|e| report(e.into()))?;
            for user in users {
                println!(
                    "{:>4} {:<8} {:<8} {} <{}>",
                    user.id(),
                    user.role().as_str(),
                    user.status().as_str(),
                    user.name(),
                    user.email().as_ref()
                );
            }
            Ok(())
        }
        Command::Holidays { year } => {
            let holidays = HolidaysApi::list(&client).await.map_err(|e| report(e.into()))?;
            let calendar = HolidayCalendar::new(holidays);
            for (day, holiday) in calendar.in_year(year.unwrap_or_else(|| Local::now().year())) {
                let repeat = if holiday.recurring { "anual" } else { "único" };
                println!("{day} {repeat:<6} {}", holiday.description);
            }
            Ok(())
        }
        Command::Login { email } => {
            let password = env::var(PASSWORD_ENV)
                .map_err(|_| eyre!("{PASSWORD_ENV} must hold the password"))?;
            let credentials = LoginCredentials::try_from_parts(&email, &password)?;
            let context = client.login(&credentials).await.map_err(|e| report(e.into()))?;
            println!("{} {}", context.role(), context.token().expose());
            Ok(())
        }
        other => Err(eyre!("{other:?} runs locally")),
    }
}

async fn inbox(
    settings: &ClientSettings,
    client: RestClient,
    tab: InboxTab,
    department: Option<String>,
) -> Result<()> {
    let client = Arc::new(client);
    let service = InboxService::new(
        Arc::clone(&client),
        Arc::new(DefaultClock),
        settings.due_soon_threshold(),
    );
    service.refresh().await.map_err(report)?;

    let counts = service.counts().map_err(report)?;
    println!(
        "total={} pendientes={} urgentes={} atendidos={} vencidos={}",
        counts.total, counts.pendientes, counts.urgentes, counts.atendidos, counts.vencidos
    );
    let filter = match department {
        Some(department) => InboxFilter::tab(tab).with_department(department),
        None => InboxFilter::tab(tab),
    };
    let now = Utc::now();
    for document in service.visible(&filter).map_err(report)? {
        println!(
            "{} {:<10} {:<10} {:<24} {}",
            document.official_number,
            document.status.as_str(),
            document.time_status(now, settings.due_soon_threshold()).as_str(),
            document.assigned_department_name.as_deref().unwrap_or("-"),
            document.description
        );
    }

    let all = client.list_all().await.map_err(|e| report(e.into()))?;
    print_rollup(&aggregate(&all, &rollup_options(settings)?));
    Ok(())
}
