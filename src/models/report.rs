use super::photo::Photo;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::Serialize;

/// Manufactured units per product and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductCounts {
    pub product_a_small: u32,
    pub product_a_medium: u32,
    pub product_b_small: u32,
    pub product_b_medium: u32,
}

impl ProductCounts {
    pub fn total(&self) -> u64 {
        u64::from(self.product_a_small)
            + u64::from(self.product_a_medium)
            + u64::from(self.product_b_small)
            + u64::from(self.product_b_medium)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JarCounts {
    pub small: u32,
    pub medium: u32,
}

/// What the lead sends when filing the day's report.
#[derive(Debug, Clone, Default)]
pub struct ReportPayload {
    pub products: ProductCounts,
    pub jars: JarCounts,
    pub jar_photo: Option<Photo>,
    /// Site-local wall time; combined with today's date on submission.
    pub distributor_start: Option<NaiveTime>,
    pub sales_start: Option<NaiveTime>,
}

/// The single per-date production record.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionReport {
    pub id: i64,
    pub date: NaiveDate,
    pub lead_employee_id: String,
    pub products: Option<ProductCounts>,
    pub jars: JarCounts,
    pub jar_photo_ref: Option<String>,
    pub distributor_start: Option<DateTime<FixedOffset>>,
    pub sales_start: Option<DateTime<FixedOffset>>,
    pub updated_at: DateTime<FixedOffset>,
}

impl ProductionReport {
    /// Product counts present. Presentation blocks further edits from here
    /// on; the store does not.
    pub fn is_submitted(&self) -> bool {
        self.products.is_some()
    }
}

/// Row values written by an upsert, after photo upload and time resolution.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub lead_employee_id: String,
    pub products: ProductCounts,
    pub jars: JarCounts,
    pub jar_photo_ref: Option<String>,
    pub distributor_start: Option<DateTime<FixedOffset>>,
    pub sales_start: Option<DateTime<FixedOffset>>,
    pub updated_at: DateTime<FixedOffset>,
}
