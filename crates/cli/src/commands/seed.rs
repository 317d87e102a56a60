//! Sample data for local development and demos.
//!
//! Running the command twice is harmless: categories and products are
//! matched by name and existing rows are left alone.

use tracing::info;

use kasir_api::db::{self, CategoryRepository, ProductRepository};
use kasir_api::models::{CategoryInput, ProductInput};
use kasir_core::Money;

use super::{CommandError, database_url};

/// Category name, description.
const CATEGORIES: &[(&str, &str)] = &[
    ("Makanan", "Makanan ringan dan berat"),
    ("Minuman", "Minuman dingin dan panas"),
    ("Kebutuhan Rumah", "Perlengkapan rumah tangga"),
];

/// Product name, category name, price, stock.
const PRODUCTS: &[(&str, &str, i64, i32)] = &[
    ("Indomie Goreng", "Makanan", 3_500, 120),
    ("Roti Tawar", "Makanan", 15_000, 20),
    ("Kopi Susu", "Minuman", 8_000, 50),
    ("Teh Botol", "Minuman", 5_000, 48),
    ("Air Mineral 600ml", "Minuman", 3_000, 96),
    ("Sabun Cuci Piring", "Kebutuhan Rumah", 12_500, 15),
];

/// Counts reported after seeding.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Insert the sample catalog.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;
    let pool = db::create_pool(&database_url, 2).await?;
    info!("Connected to database");

    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);
    let mut summary = SeedSummary::default();

    for (name, description) in CATEGORIES {
        if categories.get_by_name(name).await?.is_some() {
            summary.skipped += 1;
            continue;
        }
        let input = CategoryInput {
            name: (*name).to_string(),
            description: Some((*description).to_string()),
        };
        categories.create(&input).await?;
        summary.inserted += 1;
    }

    for (name, category, price, stock) in PRODUCTS {
        if products.get_by_name(name).await?.is_some() {
            summary.skipped += 1;
            continue;
        }
        let category_id = categories.get_by_name(category).await?.map(|c| c.id);
        let input = ProductInput {
            name: (*name).to_string(),
            price: Money::from_minor(*price)
                .map_err(|e| CommandError::InvalidSeed(format!("{name}: {e}")))?,
            stock: *stock,
            category_id,
        };
        products.create(&input).await?;
        summary.inserted += 1;
    }

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Seeding complete!"
    );
    Ok(())
}
