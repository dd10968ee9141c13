//! # Demo Data Loader
//!
//! Populates the database with sample customer locations for development.
//!
//! ## Usage
//! ```bash
//! # Load demo data into the default database
//! cargo run -p cashroute-db --bin seed
//!
//! # Specify database path
//! cargo run -p cashroute-db --bin seed -- --db ./data/cashroute.db
//!
//! # Wipe existing locations first
//! cargo run -p cashroute-db --bin seed -- --fresh
//! ```
//!
//! ## Generated Locations
//! A small, realistic route: a couple of visited sites with log history and
//! frozen commission snapshots, plus pending sites that have never been
//! collected.

use chrono::{Duration, NaiveDate, Utc};
use std::env;
use uuid::Uuid;

use cashroute_core::{
    BillCounts, CommissionRate, Location, LocationDetails, LogDraft, VisitLog,
};
use cashroute_db::{Database, DbConfig};

/// One demo site: details, plus (days_ago, collection, rate_bps, bills, notes)
/// visit history in oldest-first order.
struct DemoSite {
    name: &'static str,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    zip_code: &'static str,
    region: &'static str,
    location_type: &'static str,
    rate_bps: u32,
    change_machines: u32,
    notes: &'static str,
    visits: &'static [(i64, &'static str, u32, BillCounts, &'static str)],
}

const DEMO_SITES: &[DemoSite] = &[
    DemoSite {
        name: "Cafe Central",
        address: "112 Lexington Ave",
        city: "New York",
        state: "NY",
        zip_code: "10016",
        region: "Manhattan",
        location_type: "Cafe",
        rate_bps: 4000,
        change_machines: 1,
        notes: "Ask for Tony. Machines are in the back hallway.",
        visits: &[
            (
                24,
                "180.00",
                4000,
                BillCounts { fifty: 2, twenty: 3, ten: 2, five: 0, one: 0 },
                "",
            ),
            (
                10,
                "245.00",
                4000,
                BillCounts { fifty: 4, twenty: 2, ten: 0, five: 1, one: 0 },
                "Changer jammed, cleared it on site",
            ),
            (
                2,
                "212.00",
                4000,
                BillCounts { fifty: 3, twenty: 3, ten: 0, five: 0, one: 2 },
                "",
            ),
        ],
    },
    DemoSite {
        name: "Brooklyn Deli",
        address: "4807 5th Ave",
        city: "Brooklyn",
        state: "NY",
        zip_code: "11220",
        region: "Brooklyn",
        location_type: "Deli",
        rate_bps: 3500,
        change_machines: 0,
        notes: "Owner prefers collections before noon.",
        visits: &[
            (
                15,
                "96.00",
                3500,
                BillCounts { fifty: 1, twenty: 2, ten: 0, five: 1, one: 1 },
                "",
            ),
        ],
    },
    DemoSite {
        name: "Sunset Laundromat",
        address: "650 Sunset Blvd",
        city: "Queens",
        state: "NY",
        zip_code: "11377",
        region: "Queens",
        location_type: "Laundromat",
        rate_bps: 4500,
        change_machines: 2,
        notes: "",
        visits: &[],
    },
    DemoSite {
        name: "Riverside Barbershop",
        address: "23 Riverside Dr",
        city: "New York",
        state: "NY",
        zip_code: "10023",
        region: "Manhattan",
        location_type: "Barbershop",
        rate_bps: 4000,
        change_machines: 0,
        notes: "",
        visits: &[],
    },
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cashroute_dev.db");
    let mut fresh = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--fresh" | "-f" => fresh = true,
            "--help" | "-h" => {
                println!("Cashroute Demo Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cashroute_dev.db)");
                println!("  -f, --fresh        Delete existing locations before loading");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    // RUST_LOG=debug surfaces the pool and repository tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("🌱 Cashroute Demo Data Loader");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let repo = db.locations();

    if fresh {
        repo.clear_all().await?;
        println!("✓ Existing locations removed");
    } else {
        let existing = repo.count().await?;
        if existing > 0 {
            println!("⚠ Database already has {} locations", existing);
            println!("  Skipping seed to avoid duplicates. Use --fresh to reload.");
            return Ok(());
        }
    }

    let today: NaiveDate = Utc::now().date_naive();
    let mut order = repo.next_sort_order().await?;

    for site in DEMO_SITES {
        let mut location = Location::new(
            Uuid::new_v4().to_string(),
            LocationDetails {
                name: site.name.to_string(),
                address: site.address.to_string(),
                city: site.city.to_string(),
                state: site.state.to_string(),
                zip_code: site.zip_code.to_string(),
                region: site.region.to_string(),
                location_type: site.location_type.to_string(),
                commission_rate_bps: site.rate_bps,
                change_machine_count: site.change_machines,
            },
            order,
            Utc::now(),
        )?;
        location.notes = site.notes.to_string();

        // Oldest-first in the table; add_log prepends so the newest visit
        // ends up at the head.
        for (days_ago, collection, rate_bps, bills, notes) in site.visits {
            let date = today - Duration::days(*days_ago);
            let log = VisitLog::create(
                &LogDraft {
                    date: Some(date),
                    collection: (*collection).to_string(),
                    commission_rate_bps: Some(*rate_bps),
                    bills: *bills,
                    notes: (*notes).to_string(),
                },
                CommissionRate::from_bps(site.rate_bps),
                "Demo User",
                today,
                Utc::now(),
            )?;
            location.add_log(log);
        }

        repo.insert(&location).await?;
        println!(
            "  + {} ({} logs, order {})",
            location.name,
            location.logs.len(),
            location.order
        );
        order += 1;
    }

    println!();
    println!("✅ Loaded {} demo locations", DEMO_SITES.len());
    Ok(())
}
