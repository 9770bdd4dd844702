//! Optica Console CLI
//!
//! Drives the advanced listings of the back-office API from a terminal.
//!
//! ```sh
//! # Check that the API and its database are up
//! optica-console status
//!
//! # First page of active customers named like "perez", newest first
//! optica-console list customers --query perez --sort fecha_alta --desc
//!
//! # Lab orders of one supplier, third page of 20
//! optica-console list lab-orders --filter id_proveedor=3 --page-size 20 --page 3
//!
//! # Interactive browsing (q, filter, sort, size, next, prev, refresh, quit)
//! optica-console browse supplies
//!
//! # Validate the configuration file
//! optica-console --config ./config.toml check
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use optica_console::application::{ListingController, ListingOptions, ListingSnapshot};
use optica_console::config::AppConfig;
use optica_console::domain::entities::{
    Customers, LabOrders, Prescriptions, Purchases, Suppliers, Supplies,
};
use optica_console::domain::listing::{Entity, FilterField, SortColumn, SortDir};
use optica_console::infrastructure::{ApiClient, HttpPageFetcher};
use optica_console::support::init_tracing;

type CliResult<T = ()> = Result<T, Box<dyn Error>>;

/// Optica Console: advanced listings of the optical-shop back office.
#[derive(Parser, Debug)]
#[command(
    name = "optica-console",
    version,
    about = "Browse the optical-shop back office from the terminal",
    long_about = "Optica Console: filtered, sorted, paginated listings of customers, \
                  suppliers, supplies, purchases, lab orders and prescriptions.\n\n\
                  Default config: ~/.config/optica-console/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "OPTICA_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the API base address.
    #[arg(long, env = "OPTICA_API_URL", global = true)]
    base_url: Option<String>,

    /// Override the shop identifier sent as X-Optica-Id.
    #[arg(long, env = "OPTICA_ID", global = true)]
    tenant: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Call GET /status and print the result.
    Status,
    /// Print one page of an entity listing as JSON lines.
    List(ListArgs),
    /// Browse an entity listing interactively (commands on stdin).
    Browse {
        #[arg(value_enum)]
        entity: EntityKind,
    },
    /// Validate the configuration file and print the effective settings.
    Check,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(value_enum)]
    entity: EntityKind,

    /// Free-text search.
    #[arg(short, long)]
    query: Option<String>,

    /// Filter as key=value; an empty value clears a default filter.
    #[arg(short, long = "filter", value_name = "KEY=VALUE")]
    filters: Vec<String>,

    /// Sort column (server-side name).
    #[arg(short, long)]
    sort: Option<String>,

    /// Sort descending.
    #[arg(long)]
    desc: bool,

    /// Rows per page (5, 10, 20 or 50).
    #[arg(long)]
    page_size: Option<u64>,

    /// 1-based page number.
    #[arg(short, long, default_value_t = 1)]
    page: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EntityKind {
    #[value(alias = "clientes")]
    Customers,
    #[value(alias = "proveedores")]
    Suppliers,
    #[value(alias = "insumos")]
    Supplies,
    #[value(alias = "compras")]
    Purchases,
    #[value(alias = "pedidos")]
    LabOrders,
    #[value(alias = "recetas")]
    Prescriptions,
}

/// Run a generic listing function for the selected entity.
macro_rules! for_entity {
    ($kind:expr, $func:ident($($arg:expr),* $(,)?)) => {
        match $kind {
            EntityKind::Customers => $func::<Customers>($($arg),*).await,
            EntityKind::Suppliers => $func::<Suppliers>($($arg),*).await,
            EntityKind::Supplies => $func::<Supplies>($($arg),*).await,
            EntityKind::Purchases => $func::<Purchases>($($arg),*).await,
            EntityKind::LabOrders => $func::<LabOrders>($($arg),*).await,
            EntityKind::Prescriptions => $func::<Prescriptions>($($arg),*).await,
        }
    };
}

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(optica_console::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(tenant) = &cli.tenant {
        config.api.tenant_id = tenant.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config.logging);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) if matches!(cli.command, Command::Check) => return Err(e.into()),
        Some(e) => {
            warn!("Failed to load config from {}: {}", config_path.display(), e);
            warn!("Using default configuration.");
        }
    }
    config.check()?;

    // ── Config validation mode ─────────────────────────────────
    if let Command::Check = cli.command {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api.base_url);
        println!("   Tenant      : {}", config.api.tenant_id);
        println!("   Timeout     : {}s", config.api.timeout_secs);
        println!("   Debounce    : {}ms", config.listing.debounce_ms);
        println!("   Page size   : {}", config.listing.page_size);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let client = ApiClient::new(&config.api)?;
    let options = ListingOptions::from_config(&config.listing)?;

    match cli.command {
        Command::Status => {
            let status = client.status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::List(args) => {
            // A one-shot listing has no typist to wait for.
            let options = ListingOptions {
                debounce: Duration::ZERO,
                ..options
            };
            for_entity!(args.entity, run_list(client, options, &args))?;
        }
        Command::Browse { entity } => {
            for_entity!(entity, run_browse(client, options))?;
        }
        Command::Check => {}
    }

    Ok(())
}

fn spawn_listing<E: Entity>(client: ApiClient, options: ListingOptions) -> ListingController<E> {
    ListingController::spawn(Arc::new(HttpPageFetcher::<E>::new(client)), options)
}

async fn run_list<E: Entity>(client: ApiClient, options: ListingOptions, args: &ListArgs) -> CliResult {
    let listing = spawn_listing::<E>(client, options);
    let mounted = listing.settled().await?;

    if let Some(query) = &args.query {
        listing.set_query(query.as_str())?;
    }
    for filter in &args.filters {
        let (key, value) = filter
            .split_once('=')
            .ok_or_else(|| format!("filter '{filter}' is not KEY=VALUE"))?;
        apply_filter(&listing, key, value)?;
    }
    if let Some(size) = args.page_size {
        listing.set_page_size(size)?;
    }

    let sort_key = match &args.sort {
        Some(column) => column.parse::<E::Sort>()?,
        None => mounted.sort_key,
    };
    let sort_dir = if args.desc {
        SortDir::Desc
    } else if args.sort.is_some() {
        SortDir::Asc
    } else {
        mounted.sort_dir
    };
    let mut current_dir = mounted.sort_dir;
    if sort_key != mounted.sort_key {
        listing.set_sort(sort_key)?;
        current_dir = SortDir::Asc;
    }
    if current_dir != sort_dir {
        listing.set_sort(sort_key)?;
    }

    let mut snapshot = listing.settled().await?;
    for _ in 1..args.page.max(1) {
        if !snapshot.page.can_next {
            break;
        }
        listing.go_to_next_page()?;
        snapshot = listing.settled().await?;
    }

    if let Some(error) = &snapshot.error {
        return Err(error.clone().into());
    }
    print_rows(&snapshot)?;
    print_summary(&snapshot);
    Ok(())
}

async fn run_browse<E: Entity>(client: ApiClient, options: ListingOptions) -> CliResult {
    let listing = spawn_listing::<E>(client, options);
    print_help::<E>();
    print_snapshot(&listing.settled().await?)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(command, rest)| (command, rest.trim()))
            .unwrap_or((line, ""));

        let outcome: CliResult = match command {
            "q" | "query" => listing.set_query(rest).map_err(Into::into),
            "filter" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .unwrap_or((rest, ""));
                apply_filter(&listing, key, value)
            }
            "sort" => rest
                .parse::<E::Sort>()
                .and_then(|key| listing.set_sort(key))
                .map_err(Into::into),
            "size" => rest
                .parse::<u64>()
                .map_err(Box::<dyn Error>::from)
                .and_then(|size| listing.set_page_size(size).map_err(Into::into)),
            "next" => listing.go_to_next_page().map_err(Into::into),
            "prev" => listing.go_to_previous_page().map_err(Into::into),
            "refresh" => listing.refresh().map_err(Into::into),
            "help" => {
                print_help::<E>();
                continue;
            }
            "quit" | "exit" => break,
            other => Err(format!("unknown command '{other}' (try 'help')").into()),
        };

        match outcome {
            Ok(()) => print_snapshot(&listing.settled().await?)?,
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}

/// Set `key` to the parsed `value`, or clear it when `value` is blank.
fn apply_filter<E: Entity>(listing: &ListingController<E>, key: &str, value: &str) -> CliResult {
    let field = key.trim().parse::<E::Filter>()?;
    let value = if value.trim().is_empty() {
        None
    } else {
        Some(field.parse_value(value)?)
    };
    listing.set_filter(field, value)?;
    Ok(())
}

fn print_rows<E: Entity>(snapshot: &ListingSnapshot<E>) -> CliResult {
    for row in &snapshot.items {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}

fn print_summary<E: Entity>(snapshot: &ListingSnapshot<E>) {
    let filters: Vec<String> = snapshot
        .filters
        .iter()
        .map(|(field, value)| format!("{field}={value}"))
        .collect();

    println!(
        "-- {} | page {}/{} | sort {} {} | size {} | q='{}' | filters [{}]",
        snapshot.page,
        snapshot.page.page,
        snapshot.page.total_pages,
        snapshot.sort_key,
        snapshot.sort_dir,
        snapshot.page_size,
        snapshot.effective_query,
        filters.join(", "),
    );
}

fn print_snapshot<E: Entity>(snapshot: &ListingSnapshot<E>) -> CliResult {
    if let Some(error) = &snapshot.error {
        eprintln!("error: {error}");
    }
    print_rows(snapshot)?;
    print_summary(snapshot);
    Ok(())
}

fn print_help<E: Entity>() {
    let columns: Vec<&str> = <E::Sort as SortColumn>::ALL.iter().map(|column| column.as_param()).collect();
    let filters: Vec<String> = <E::Filter as FilterField>::ALL
        .iter()
        .map(|field| format!("{}:{}", field.as_param(), field.kind()))
        .collect();

    println!("{} ({})", E::NAME, E::ENDPOINT);
    println!("  q <text>                 search (empty to clear)");
    println!("  filter <key> [value]     set a filter, or clear it without a value");
    println!("  sort <column>            sort; repeat to flip the direction");
    println!("  size <5|10|20|50>        rows per page");
    println!("  next | prev | refresh | help | quit");
    println!("  columns: {}", columns.join(", "));
    println!("  filters: {}", filters.join(", "));
}
