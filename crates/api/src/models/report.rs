//! Sales report types.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use kasir_core::{Money, ProductId};

/// Units and revenue for one product within a report range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub product_id: ProductId,
    /// Name from the most recent sale in range.
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: Money,
}

/// Aggregated sales over `[range_start, range_end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub range_start: DateTime<Utc>,
    pub range_end: DateTime<Utc>,
    /// Timezone used to interpret calendar dates.
    #[serde(serialize_with = "serialize_tz")]
    pub timezone: Tz,
    pub total_revenue: Money,
    pub transaction_count: u64,
    /// Best seller by units; ties go to the lowest product id.
    pub top_product: Option<ProductSales>,
    /// Per-product rows, revenue descending. Omitted when not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductSales>>,
}

fn serialize_tz<S: serde::Serializer>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(tz.name())
}
