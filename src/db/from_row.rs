//! Row mapping trait and helpers for reducing boilerplate in queries.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Parse a string column into an enum type, converting parse errors to
/// rusqlite errors instead of panicking on corrupt data.
fn parse_enum<T: std::str::FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?.parse::<T>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Trait for constructing a type from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ SQL SELECT Constants ============

pub const USER_COLS: &str = "id, email, plan, billing_status, created_at, updated_at";

pub const INVOICE_COLS: &str = "id, user_id, plan_name, base_amount, unique_code, final_amount, payload, status, created_at, updated_at";

pub const SETTING_COLS: &str = "name, value";

// ============ FromRow Implementations ============

impl FromRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            plan: parse_enum(row, 2, "plan")?,
            billing_status: parse_enum(row, 3, "billing_status")?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl FromRow for Invoice {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Invoice {
            id: row.get(0)?,
            user_id: row.get(1)?,
            plan_name: row.get(2)?,
            base_amount: row.get(3)?,
            unique_code: row.get(4)?,
            final_amount: row.get(5)?,
            payload: row.get(6)?,
            status: parse_enum(row, 7, "status")?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

impl FromRow for Setting {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Setting {
            name: row.get(0)?,
            value: row.get(1)?,
        })
    }
}
