//! # Seed Data Generator
//!
//! Populates the database with an apparel catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./ims_dev.db for user "demo-user" (defaults)
//! cargo run -p ims-db --bin seed
//!
//! # Seed a specific database and user (the JWT `sub` the dashboard uses)
//! cargo run -p ims-db --bin seed -- --db ./data/ims.db --user 6f1c9a
//! ```
//!
//! ## Generated Data
//! - Colors: Black, White, Navy, Olive, Burgundy
//! - Sizes: XS, S, M, L, XL
//! - Products: a dozen garments, each with a variation per color/size pair
//!   picked from the product's index
//! - A handful of sales and one partial refund so the report isn't empty

use anyhow::{bail, Context, Result};
use ims_core::{Color, NewProduct, NewVariation, Size, StockPolicy, UserId};
use ims_db::{Database, DbConfig};

const COLORS: &[&str] = &["Black", "White", "Navy", "Olive", "Burgundy"];

const SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];

/// (name, cost cents, selling cents)
const GARMENTS: &[(&str, i64, i64)] = &[
    ("Classic Crew Tee", 450, 1500),
    ("Heavyweight Hoodie", 1800, 5500),
    ("Linen Shirt", 1200, 3900),
    ("Oxford Button-Down", 1400, 4500),
    ("Slim Chino", 1600, 4900),
    ("Relaxed Denim", 2100, 6900),
    ("Merino Sweater", 2800, 8900),
    ("Quilted Vest", 2300, 6500),
    ("Rib Knit Beanie", 300, 1200),
    ("Canvas Work Jacket", 3500, 11900),
    ("Pique Polo", 900, 2900),
    ("Fleece Joggers", 1300, 3900),
];

struct Args {
    db_path: String,
    user: String,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = Args {
        db_path: String::from("./ims_dev.db"),
        user: String::from("demo-user"),
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                args.db_path = iter.next().context("--db needs a path")?;
            }
            "--user" | "-u" => {
                args.user = iter.next().context("--user needs a user id")?;
            }
            "--help" | "-h" => {
                println!("IMS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ims_dev.db)");
                println!("  -u, --user <ID>    Owning user id (default: demo-user)");
                println!("  -h, --help         Show this help message");
                return Ok(None);
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(Some(args))
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    println!("🌱 IMS Seed Data Generator");
    println!("==========================");
    println!("Database: {}", args.db_path);
    println!("User:     {}", args.user);
    println!();

    let db = Database::new(DbConfig::new(&args.db_path))
        .await
        .with_context(|| format!("opening {}", args.db_path))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count(&args.user).await?;
    if existing > 0 {
        println!("⚠ User already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    let mut colors: Vec<Color> = Vec::with_capacity(COLORS.len());
    for name in COLORS {
        colors.push(db.catalog().create_color(&args.user, name).await?);
    }
    let mut sizes: Vec<Size> = Vec::with_capacity(SIZES.len());
    for name in SIZES {
        sizes.push(db.catalog().create_size(&args.user, name).await?);
    }
    println!("✓ Created {} colors and {} sizes", colors.len(), sizes.len());

    let mut variation_ids = Vec::new();
    for (index, (name, cost, selling)) in GARMENTS.iter().enumerate() {
        let input = NewProduct {
            name: name.to_string(),
            description: Some(format!("{name} from the demo collection")),
            cost_price_cents: *cost,
            selling_price_cents: *selling,
            image_urls: Some(format!("[/images/product-{index}.png]")),
        };
        let variations = variation_inputs(index, &colors, &sizes);

        let (product, created) = db
            .products()
            .create_with_variations(&args.user, &input, &variations)
            .await
            .with_context(|| format!("creating {name}"))?;

        println!("  {} ({} variations)", product.name, created.len());
        if let Some(first) = created.first() {
            variation_ids.push(first.id.clone());
        }
    }

    // A little history for the sales report
    let ledger = db.ledger(StockPolicy::default());
    let user = UserId::new(args.user.clone());
    for (index, variation_id) in variation_ids.iter().enumerate().take(5) {
        let quantity = i64::try_from(index % 3 + 1)?;
        ledger.record_sale(variation_id, quantity, &user).await?;
    }
    if let Some(variation_id) = variation_ids.get(2) {
        ledger.record_refund(variation_id, 1, &user).await?;
    }

    println!();
    println!(
        "✓ Seeded {} products in {:?}",
        GARMENTS.len(),
        start.elapsed()
    );

    let report = ledger.sales_report(&user).await?;
    println!(
        "  Report: {} sales, {} refunds, net revenue {}",
        report.summary.sale_count, report.summary.refund_count, report.summary.net_revenue
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Two to four color/size combinations per product, rotating with `index`.
fn variation_inputs(index: usize, colors: &[Color], sizes: &[Size]) -> Vec<NewVariation> {
    let count = 2 + index % 3;

    (0..count)
        .map(|offset| {
            let color = &colors[(index + offset) % colors.len()];
            let size = &sizes[(index * 2 + offset) % sizes.len()];
            NewVariation {
                color_id: color.id.clone(),
                size_id: size.id.clone(),
                quantity: ((index * 7 + offset * 5) % 40 + 5) as i64,
            }
        })
        .collect()
}
