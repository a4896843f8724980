//! Queries over the `production_reports` collection.

use crate::db::columns::{date_str, get_date, get_opt_ts, get_ts, opt_ts_str};
use crate::errors::AppResult;
use crate::models::report::{JarCounts, ProductCounts, ProductionReport, ReportRow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_row(row: &Row) -> Result<ProductionReport> {
    let a_s: Option<u32> = row.get("product_a_small")?;
    let a_m: Option<u32> = row.get("product_a_medium")?;
    let b_s: Option<u32> = row.get("product_b_small")?;
    let b_m: Option<u32> = row.get("product_b_medium")?;

    // Counts are written together; any NULL means "not submitted".
    let products = match (a_s, a_m, b_s, b_m) {
        (Some(a_s), Some(a_m), Some(b_s), Some(b_m)) => Some(ProductCounts {
            product_a_small: a_s,
            product_a_medium: a_m,
            product_b_small: b_s,
            product_b_medium: b_m,
        }),
        _ => None,
    };

    Ok(ProductionReport {
        id: row.get("id")?,
        date: get_date(row, "date")?,
        lead_employee_id: row.get("lead_employee_id")?,
        products,
        jars: JarCounts {
            small: row.get("jars_small")?,
            medium: row.get("jars_medium")?,
        },
        jar_photo_ref: row.get("jar_photo_ref")?,
        distributor_start: get_opt_ts(row, "distributor_start")?,
        sales_start: get_opt_ts(row, "sales_start")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

pub fn find_by_date(conn: &Connection, date: &NaiveDate) -> AppResult<Option<ProductionReport>> {
    let report = conn
        .query_row(
            "SELECT * FROM production_reports WHERE date = ?1",
            [date_str(date)],
            map_row,
        )
        .optional()?;
    Ok(report)
}

/// Insert-or-update keyed on `date`, in one statement. Optional fields that
/// are absent keep their stored value. Returns the row id.
pub fn upsert(conn: &Connection, r: &ReportRow) -> Result<i64> {
    conn.execute(
        "INSERT INTO production_reports (
             date, lead_employee_id,
             product_a_small, product_a_medium, product_b_small, product_b_medium,
             jars_small, jars_medium, jar_photo_ref,
             distributor_start, sales_start, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
         ON CONFLICT(date) DO UPDATE SET
             lead_employee_id  = excluded.lead_employee_id,
             product_a_small   = excluded.product_a_small,
             product_a_medium  = excluded.product_a_medium,
             product_b_small   = excluded.product_b_small,
             product_b_medium  = excluded.product_b_medium,
             jars_small        = excluded.jars_small,
             jars_medium       = excluded.jars_medium,
             jar_photo_ref     = COALESCE(excluded.jar_photo_ref, production_reports.jar_photo_ref),
             distributor_start = COALESCE(excluded.distributor_start, production_reports.distributor_start),
             sales_start       = COALESCE(excluded.sales_start, production_reports.sales_start),
             updated_at        = excluded.updated_at",
        params![
            date_str(&r.date),
            r.lead_employee_id,
            r.products.product_a_small,
            r.products.product_a_medium,
            r.products.product_b_small,
            r.products.product_b_medium,
            r.jars.small,
            r.jars.medium,
            r.jar_photo_ref,
            opt_ts_str(r.distributor_start),
            opt_ts_str(r.sales_start),
            r.updated_at.to_rfc3339(),
        ],
    )?;

    conn.query_row(
        "SELECT id FROM production_reports WHERE date = ?1",
        [date_str(&r.date)],
        |row| row.get(0),
    )
}

/// Number of report rows stored for `date` (0 or 1 under the unique key).
pub fn count_for_date(conn: &Connection, date: &NaiveDate) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM production_reports WHERE date = ?1",
        [date_str(date)],
        |row| row.get(0),
    )
}
