//! Reports over sales stored in `PostgreSQL`.
//!
//! These tests require a disposable `PostgreSQL` database in
//! `KASIR_TEST_DATABASE_URL` and must run with `--test-threads=1`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use kasir_api::models::ProductInput;
use kasir_api::services::{Catalog, CheckoutProcessor, ManualClock, ReportAggregator};
use kasir_core::{Cart, Money, ProductId, TimeRange};
use kasir_integration_tests::TestContext;

async fn sell(ctx: &TestContext, clock: &ManualClock, lines: &[(ProductId, i64)]) {
    let store = &*ctx.store;
    let cart = Cart::parse(lines.iter().copied()).unwrap();
    CheckoutProcessor::new(store, store, store, clock)
        .checkout(&cart)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "Requires KASIR_TEST_DATABASE_URL"]
async fn test_report_covers_only_sales_in_range() {
    let ctx = TestContext::new().await.unwrap();
    let kopi = ctx.product("Kopi", 8_000, 100).await.unwrap();
    let teh = ctx.product("Teh", 5_000, 100).await.unwrap();
    let store = &*ctx.store;
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap());

    // One sale just before the range, two inside, one at the exclusive end.
    sell(&ctx, &clock, &[(kopi.id, 5)]).await;
    clock.set(Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap());
    sell(&ctx, &clock, &[(kopi.id, 1), (teh.id, 3)]).await;
    clock.advance(Duration::hours(12));
    sell(&ctx, &clock, &[(kopi.id, 2)]).await;
    clock.set(Utc.with_ymd_and_hms(2026, 4, 2, 0, 0, 0).unwrap());
    sell(&ctx, &clock, &[(teh.id, 9)]).await;

    let range = TimeRange::day(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(), Tz::UTC).unwrap();
    let report = ReportAggregator::new(store, &clock, Tz::UTC)
        .report(range, true)
        .await
        .unwrap();

    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.total_revenue, Money::from_minor(39_000).unwrap());

    let top = report.top_product.unwrap();
    assert_eq!(top.product_id, kopi.id);
    assert_eq!(top.quantity_sold, 3);

    let products = report.products.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product_id, kopi.id);
    assert_eq!(products[0].revenue, Money::from_minor(24_000).unwrap());
    assert_eq!(products[1].revenue, Money::from_minor(15_000).unwrap());
}

#[tokio::test]
#[ignore = "Requires KASIR_TEST_DATABASE_URL"]
async fn test_report_uses_price_at_time_of_sale() {
    let ctx = TestContext::new().await.unwrap();
    let kopi = ctx.product("Kopi", 8_000, 100).await.unwrap();
    let store = &*ctx.store;
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap());

    let cart = Cart::parse([(kopi.id, 1)]).unwrap();
    CheckoutProcessor::new(store, store, store, &clock)
        .checkout(&cart)
        .await
        .unwrap();

    store
        .update_product(
            kopi.id,
            &ProductInput {
                name: "Kopi Susu".to_string(),
                price: Money::from_minor(12_000).unwrap(),
                stock: 50,
                category_id: None,
            },
        )
        .await
        .unwrap();
    store.delete_product(kopi.id).await.unwrap();

    let report = ReportAggregator::new(store, &clock, Tz::UTC)
        .report_today(false)
        .await
        .unwrap();

    assert_eq!(report.transaction_count, 1);
    assert_eq!(report.total_revenue, Money::from_minor(8_000).unwrap());
    assert_eq!(report.top_product.unwrap().product_name, "Kopi");
    assert!(report.products.is_none());
}
