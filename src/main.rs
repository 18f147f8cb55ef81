use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canchas_client::api::ReviewOutcome;
use canchas_client::booking::{NextStep, QuoteCache, QuoteRequester, ReservationSubmitter};
use canchas_client::config::Config;
use canchas_client::models::{Registration, Reservation, ReviewDraft, SlotRequest, VenueQuery};
use canchas_client::sort::{sort_reservations, SortDirection, SortKey};
use canchas_client::store::LocalStores;
use canchas_client::wire::datetime::parse_date;
use canchas_client::{ApiClient, Session};

#[derive(Debug, Parser)]
#[command(name = "canchas", version, about = "Book sports courts from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account and log into it
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Search venues
    Venues(VenueArgs),

    /// List the courts of a venue
    Courts { venue_id: String },

    /// Free slots of a court on one day
    Slots {
        court_id: i64,
        /// YYYY-MM-DD
        date: String,
        /// Block length in minutes (15 to 180)
        #[arg(long)]
        slot_min: Option<u32>,
    },

    /// Price a slot without booking it
    Quote(SlotArgs),

    /// Book a slot (quotes first unless --direct)
    Book {
        #[command(flatten)]
        slot: SlotArgs,

        /// Skip the quote and let the server price the booking
        #[arg(long)]
        direct: bool,
    },

    /// List your reservations
    Mine {
        #[arg(long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,

        /// Latest first
        #[arg(long)]
        desc: bool,
    },

    /// Show one reservation
    Show { id: String },

    /// Confirm a pending reservation
    Confirm { id: String },

    /// Cancel a reservation
    Cancel { id: String },

    /// Reservations across every court you operate
    Admin,

    /// Rate a finished reservation
    Review(ReviewArgs),
}

#[derive(Debug, Args)]
struct SlotArgs {
    court_id: String,
    /// YYYY-MM-DD
    date: String,
    /// HH:MM
    start: String,
    /// HH:MM
    end: String,
    #[arg(long)]
    coupon: Option<String>,
    #[arg(long)]
    note: Option<String>,
}

impl SlotArgs {
    fn to_slot(&self) -> canchas_client::Result<SlotRequest> {
        let mut slot = SlotRequest::parse(&self.court_id, &self.date, &self.start, &self.end)?;
        if let Some(note) = &self.note {
            slot = slot.with_note(note.as_str());
        }
        if let Some(coupon) = &self.coupon {
            slot = slot.with_coupon(coupon.as_str());
        }
        Ok(slot)
    }
}

#[derive(Debug, Args)]
struct VenueArgs {
    /// Free-text search
    #[arg(long)]
    q: Option<String>,
    #[arg(long)]
    comuna: Option<String>,
    #[arg(long)]
    deporte: Option<String>,
    /// distancia | rating | nombre | recientes
    #[arg(long)]
    sort_by: Option<String>,
    /// asc | desc
    #[arg(long)]
    order: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
}

#[derive(Debug, Args)]
struct ReviewArgs {
    #[arg(long)]
    reservation: i64,
    #[arg(long)]
    court: Option<i64>,
    #[arg(long)]
    venue: Option<i64>,
    /// 1 to 5
    #[arg(long)]
    rating: u8,
    #[arg(long, default_value = "")]
    comment: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    /// Reservation date and start time
    Date,
    /// When the reservation was made
    Created,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => SortKey::ReservationTime,
            SortArg::Created => SortKey::CreatedAt,
        }
    }
}

/// Everything a command needs
struct Context {
    api: ApiClient,
    stores: LocalStores,
    session: Session,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canchas=info,canchas_client=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    debug!("Configuration loaded: {:?}", config);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, config: &Config) -> canchas_client::Result<()> {
    let api = match config.http_timeout {
        Some(timeout) => ApiClient::with_timeout(&config.api_url, timeout)?,
        None => ApiClient::new(&config.api_url),
    };
    let stores = LocalStores::open_sqlite(&config.store_url, config.store_max_entries).await?;
    let session = Session::hydrate(stores.session.as_ref()).await?;
    info!("Using API at {}", api.base_url());

    let ctx = Context {
        api,
        stores,
        session,
    };

    match command {
        Command::Login { email, password } => {
            let session = ctx.api.login(ctx.stores.session.as_ref(), &email, &password).await?;
            if let Some(user) = session.user() {
                println!("Logged in as {} {} <{}>", user.name, user.last_name, user.email);
            }
        }
        Command::Register {
            name,
            last_name,
            email,
            password,
        } => {
            let form = Registration {
                name,
                last_name,
                email,
                password,
            };
            let session = ctx.api.register(ctx.stores.session.as_ref(), &form).await?;
            if let Some(user) = session.user() {
                println!("Welcome {} {} <{}>", user.name, user.last_name, user.email);
            }
        }
        Command::Logout => {
            ctx.api.logout(&ctx.session, ctx.stores.session.as_ref()).await?;
            println!("Logged out");
        }
        Command::Venues(args) => {
            let query = VenueQuery {
                q: args.q,
                comuna: args.comuna,
                deporte: args.deporte,
                sort_by: args.sort_by,
                order: args.order,
                page: args.page,
                page_size: args.page_size,
            };
            let page = ctx.api.venues(&ctx.session, &query).await?;
            for venue in &page.items {
                println!(
                    "{:>6}  {:<30} {:<20} {}",
                    venue.id,
                    venue.name,
                    venue.comuna.as_deref().unwrap_or("-"),
                    venue
                        .rating
                        .map(|r| format!("{r:.1}"))
                        .unwrap_or_else(|| "-".to_string())
                );
            }
            if let Some(total) = page.total {
                println!("{} of {} venues", page.items.len(), total);
            }
        }
        Command::Courts { venue_id } => {
            for court in ctx.api.courts(&ctx.session, &venue_id).await? {
                println!(
                    "{:>6}  {:<24} {:<12} {}",
                    court.id,
                    court.name,
                    court.sport.as_deref().unwrap_or("-"),
                    if court.active { "active" } else { "inactive" }
                );
            }
        }
        Command::Slots {
            court_id,
            date,
            slot_min,
        } => {
            let date = parse_date(&date)?;
            let availability = ctx
                .api
                .availability(&ctx.session, court_id, date, slot_min)
                .await?;
            if availability.slots.is_empty() {
                println!("No free slots on {}", availability.date);
            }
            for slot in &availability.slots {
                println!("  {}", slot.label());
            }
        }
        Command::Quote(args) => {
            let slot = args.to_slot()?;
            let requester = quote_requester(&ctx);
            let quote = requester.request(&ctx.session, &slot).await?;
            println!(
                "{} hours at {} {}/h: subtotal {}, discount {}, total {} {}",
                quote.hours,
                quote.price_per_hour,
                quote.currency,
                quote.subtotal,
                quote.discount.unwrap_or(0),
                quote.total,
                quote.currency
            );
            if let Some(promotion) = &quote.applied_promotion {
                println!("Promotion applied: {promotion}");
            }
        }
        Command::Book { slot, direct } => {
            let slot = slot.to_slot()?;
            let submitter = ReservationSubmitter::new(ctx.api.clone());

            let submission = if direct {
                submitter.create_direct(&ctx.session, &slot).await?
            } else {
                let quote = quote_requester(&ctx).request(&ctx.session, &slot).await?;
                println!("Quoted total: {} {}", quote.total, quote.currency);
                submitter.confirm_quoted(&ctx.session, &slot, &quote).await?
            };

            match &submission.reservation {
                Some(reservation) => print_reservation(reservation),
                None => println!("Reservation created"),
            }
            match submission.next {
                NextStep::Review(handoff) => println!(
                    "Rate {} after your game: canchas review --reservation {} --venue {} --rating <1-5>",
                    handoff.venue_name, handoff.reservation_id, handoff.venue_id
                ),
                NextStep::ReservationList => println!("See all bookings with: canchas mine"),
            }
        }
        Command::Mine { sort, desc } => {
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let reservations = ctx.api.my_reservations(&ctx.session).await?;
            for reservation in sort_reservations(reservations, sort.into(), direction) {
                print_reservation(&reservation);
            }
        }
        Command::Show { id } => {
            let reservation = ctx.api.reservation(&ctx.session, &id).await?;
            print_reservation(&reservation);
            if let Some(holder) = &reservation.holder {
                println!(
                    "  holder: {} {}",
                    holder.name.as_deref().unwrap_or("-"),
                    holder.email.as_deref().unwrap_or("")
                );
            }
            if let Some(notes) = &reservation.notes {
                println!("  notes: {notes}");
            }
        }
        Command::Confirm { id } => {
            let reservation = ctx.api.reservation(&ctx.session, &id).await?;
            print_reservation(&ctx.api.confirm(&ctx.session, &reservation).await?);
        }
        Command::Cancel { id } => {
            let reservation = ctx.api.reservation(&ctx.session, &id).await?;
            print_reservation(&ctx.api.cancel(&ctx.session, &reservation).await?);
        }
        Command::Admin => {
            let overview = ctx.api.admin_overview(&ctx.session).await?;
            println!(
                "{} venues, {} courts",
                overview.venues.len(),
                overview.courts.len()
            );
            for reservation in &overview.reservations {
                print_reservation(reservation);
            }
        }
        Command::Review(args) => {
            let draft = ReviewDraft {
                reservation_id: args.reservation,
                court_id: args.court,
                venue_id: args.venue,
                rating: args.rating,
                comment: args.comment,
            };
            match ctx.api.submit_review(&ctx.session, &draft).await? {
                ReviewOutcome::Created(_) => println!("Review saved"),
                ReviewOutcome::Updated(_) => println!("Your previous review was updated"),
            }
        }
    }

    Ok(())
}

fn quote_requester(ctx: &Context) -> QuoteRequester {
    QuoteRequester::new(ctx.api.clone(), QuoteCache::new(Arc::clone(&ctx.stores.quotes)))
}

fn print_reservation(reservation: &Reservation) {
    println!(
        "{:>6}  {:<10} {} {:<11}  {} / {}  {}",
        reservation.id,
        reservation.status,
        reservation
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string()),
        reservation.time_range(),
        reservation.venue.name,
        reservation.court.name,
        reservation
            .total_price
            .map(|p| format!("${p}"))
            .unwrap_or_default()
    );
}
