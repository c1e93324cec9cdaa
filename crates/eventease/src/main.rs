//! eventease - browse, book and administer events from the command line
//!
//! This is the main entry point for the eventease front end.
//! It wires together:
//! - Configuration loading
//! - Store initialization
//! - Session and catalog stores
//! - Console delivery of notices

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use eventease_api::{
    Booking, BookingFilter, BookingStatus, Event, EventPatch, EventQuery, NewEvent, Notice,
    Severity,
};
use eventease_config::{Settings, load_config_or_default};
use eventease_core::{CatalogStore, CredentialDirectory, Notifier, SessionStore};
use eventease_store::{KeyValueStore, SqliteStore};
use eventease_util::{
    BookingId, EventId, default_config_path, format_date, format_price, is_mock_time_active,
    today,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// eventease - event discovery and booking
#[derive(Parser, Debug)]
#[command(name = "eventease")]
#[command(about = "Event discovery and booking", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/eventease/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set EVENTEASE_DATA_DIR env var)
    #[arg(short, long, env = "EVENTEASE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with email and password
    Login { email: String, password: String },

    /// Log out of the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Browse and manage events
    #[command(subcommand)]
    Events(EventsCommand),

    /// Book an event for the logged-in user
    Book { event_id: String },

    /// Inspect and manage bookings
    #[command(subcommand)]
    Bookings(BookingsCommand),

    /// Dashboard statistics (admin)
    Stats,

    /// List registered users (admin)
    Users {
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum EventsCommand {
    /// List events, optionally filtered and sorted
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// date-asc, date-desc, price-asc or price-desc
        #[arg(long)]
        sort_by: Option<String>,
    },

    /// Featured events
    Featured,

    /// Upcoming events
    Upcoming,

    /// Show one event
    Show { id: String },

    /// Add an event from a JSON file (admin)
    Add { file: PathBuf },

    /// Update an event from a JSON file of changed fields (admin)
    Update { id: String, file: PathBuf },

    /// Delete an event and its bookings (admin)
    Delete { id: String },

    /// Search events by name, location or category (admin)
    Search { term: String },
}

#[derive(Subcommand, Debug)]
enum BookingsCommand {
    /// Bookings of the logged-in user
    Mine,

    /// Bookings against one event (admin)
    Event { id: String },

    /// All bookings, optionally filtered (admin)
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// confirmed, upcoming, attended or cancelled
        #[arg(long)]
        status: Option<BookingStatus>,
    },

    /// Change a booking's status (admin)
    SetStatus { id: String, status: BookingStatus },
}

/// Prints notices to the terminal
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Default => println!("{}: {}", notice.title, notice.description),
            Severity::Destructive => eprintln!("{}: {}", notice.title, notice.description),
        }
    }
}

/// Open stores for one command
struct App {
    session: SessionStore,
    catalog: CatalogStore,
    json: bool,
}

impl App {
    fn open(args: &Args) -> Result<Self> {
        let settings = load_config_or_default(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        debug!(
            config_path = %args.config.display(),
            users = settings.users.len(),
            "Configuration loaded"
        );

        let store = open_store(&settings, args.data_dir.as_deref())?;
        let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

        let session = SessionStore::open(
            store.clone(),
            CredentialDirectory::new(settings.users.clone()),
            notifier.clone(),
        );
        let catalog = CatalogStore::open(store, notifier, &settings.catalog)
            .context("Failed to load catalog")?;

        Ok(Self {
            session,
            catalog,
            json: args.json,
        })
    }

    fn run(mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { email, password } => {
                let identity = self.session.login(&email, &password)?;
                info!(user_id = %identity.id, "Logged in");
            }
            Command::Logout => self.session.logout(),
            Command::Whoami => match self.session.current() {
                Some(identity) if self.json => print_json(identity)?,
                Some(identity) => {
                    println!("{} <{}> ({})", identity.name, identity.email, identity.role)
                }
                None => println!("Not logged in"),
            },
            Command::Events(cmd) => self.run_events(cmd)?,
            Command::Book { event_id } => {
                let identity = self.session.require_user()?.clone();
                let booking = self.catalog.book_event(
                    &EventId::new(event_id),
                    &identity.id,
                    &identity.name,
                    &identity.email,
                )?;
                if self.json {
                    print_json(&booking)?;
                }
            }
            Command::Bookings(cmd) => self.run_bookings(cmd)?,
            Command::Stats => {
                self.session.require_admin()?;
                let stats = self.catalog.stats(today());
                if self.json {
                    return print_json(&stats);
                }
                println!("Events:    {} ({} upcoming)", stats.total_events, stats.upcoming_events);
                println!("Bookings:  {}", stats.total_bookings);
                for (status, count) in &stats.bookings_by_status {
                    println!("  {:<10} {}", status, count);
                }
                println!("Top events:");
                for top in &stats.top_events {
                    println!("  {:<30} {}", top.name, top.bookings);
                }
                println!("Bookings by category:");
                for entry in &stats.bookings_by_category {
                    println!("  {:<30} {}", entry.category.display_name(), entry.bookings);
                }
            }
            Command::Users { search } => {
                self.session.require_admin()?;
                let directory = self.session.directory();
                let users = match search {
                    Some(term) => directory.search(&term),
                    None => directory.users(),
                };
                if self.json {
                    return print_json(&users);
                }
                for user in &users {
                    println!(
                        "{:<6} {:<20} {:<28} {:<6} {} bookings",
                        user.id,
                        user.name,
                        user.email,
                        user.role,
                        self.catalog.user_booking_count(&user.id)
                    );
                }
            }
        }
        Ok(())
    }

    fn run_events(&mut self, cmd: EventsCommand) -> Result<()> {
        match cmd {
            EventsCommand::List {
                category,
                search,
                sort_by,
            } => {
                let mut params = Vec::new();
                if let Some(value) = category.as_deref() {
                    params.push(("category", value));
                }
                if let Some(value) = search.as_deref() {
                    params.push(("search", value));
                }
                if let Some(value) = sort_by.as_deref() {
                    params.push(("sortBy", value));
                }
                let events = self.catalog.list_events(&EventQuery::from_params(params));
                self.print_events(&events)?;
            }
            EventsCommand::Featured => {
                let events = self.catalog.featured_events();
                self.print_events(&events)?;
            }
            EventsCommand::Upcoming => {
                let events = self.catalog.upcoming_events(today());
                self.print_events(&events)?;
            }
            EventsCommand::Show { id } => {
                let id = EventId::new(id);
                let Some(event) = self.catalog.event_by_id(&id) else {
                    bail!("Event not found: {}", id);
                };
                if self.json {
                    return print_json(event);
                }
                println!("{}", event.name);
                println!(
                    "  {} | {} at {}",
                    event.category.display_name(),
                    format_date(event.date),
                    event.time
                );
                println!("  {}", event.location);
                println!("  Organized by {}", event.organizer_name);
                println!("  {}", format_price(event.price));
                println!();
                println!("{}", event.description);
            }
            EventsCommand::Add { file } => {
                self.session.require_admin()?;
                let new_event: NewEvent = read_json_file(&file)?;
                let event = self.catalog.add_event(new_event)?;
                if self.json {
                    print_json(&event)?;
                } else {
                    println!("{}", event.id);
                }
            }
            EventsCommand::Update { id, file } => {
                self.session.require_admin()?;
                let patch: EventPatch = read_json_file(&file)?;
                let event = self.catalog.update_event(&EventId::new(id), &patch)?;
                if self.json {
                    print_json(&event)?;
                }
            }
            EventsCommand::Delete { id } => {
                self.session.require_admin()?;
                let deleted = self.catalog.delete_event(&EventId::new(id))?;
                if !deleted.removed_bookings.is_empty() {
                    println!("Removed {} booking(s)", deleted.removed_bookings.len());
                }
            }
            EventsCommand::Search { term } => {
                self.session.require_admin()?;
                let events = self.catalog.search_events(&term);
                self.print_events(&events)?;
            }
        }
        Ok(())
    }

    fn run_bookings(&mut self, cmd: BookingsCommand) -> Result<()> {
        match cmd {
            BookingsCommand::Mine => {
                let user_id = self.session.require_user()?.id.clone();
                let (active, past) = self.catalog.user_bookings_split(&user_id);
                if self.json {
                    return print_json(&serde_json::json!({ "active": active, "past": past }));
                }
                println!("Active:");
                for booking in active {
                    self.print_booking(booking);
                }
                println!("Past:");
                for booking in past {
                    self.print_booking(booking);
                }
            }
            BookingsCommand::Event { id } => {
                self.session.require_admin()?;
                let bookings: Vec<&Booking> =
                    self.catalog.event_bookings(&EventId::new(id)).collect();
                self.print_bookings(&bookings)?;
            }
            BookingsCommand::List { search, status } => {
                self.session.require_admin()?;
                let bookings = self.catalog.filter_bookings(&BookingFilter { search, status });
                self.print_bookings(&bookings)?;
            }
            BookingsCommand::SetStatus { id, status } => {
                self.session.require_admin()?;
                self.catalog
                    .update_booking_status(&BookingId::new(id), status)?;
            }
        }
        Ok(())
    }

    fn print_events(&self, events: &[Event]) -> Result<()> {
        if self.json {
            return print_json(events);
        }
        if events.is_empty() {
            println!("No events found");
        }
        for event in events {
            println!(
                "{:<38} {:<28} {:<12} {} {:>10}",
                event.id,
                event.name,
                event.category.display_name(),
                event.date,
                format_price(event.price)
            );
        }
        Ok(())
    }

    fn print_bookings(&self, bookings: &[&Booking]) -> Result<()> {
        if self.json {
            return print_json(bookings);
        }
        if bookings.is_empty() {
            println!("No bookings found");
        }
        for booking in bookings {
            self.print_booking(booking);
        }
        Ok(())
    }

    fn print_booking(&self, booking: &Booking) {
        println!(
            "{:<38} {:<28} {:<20} {} {}",
            booking.id,
            self.catalog.event_name(&booking.event_id),
            booking.user_name,
            booking.date,
            booking.status
        );
    }
}

fn open_store(settings: &Settings, data_dir: Option<&Path>) -> Result<Arc<dyn KeyValueStore>> {
    let data_dir = data_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.storage.data_dir.clone());

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let db_path = data_dir.join(&settings.storage.database);
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open database {:?}", db_path))?;

    debug!(db_path = %db_path.display(), "Store initialized");
    Ok(Arc::new(store))
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "eventease starting");
    if is_mock_time_active() {
        warn!(today = %today(), "Mock time active, dates are offset");
    }

    let app = App::open(&args)?;
    app.run(args.command)
}
