//! Product code encoding and serial allocation
//!
//! A product code is `<shift letter><2-digit day><month code><3-digit serial>`,
//! e.g. "A24MY001" for the first day-shift unit produced on 2024-05-24. The
//! month code is the first and last letter of the English month name. Codes
//! sort lexicographically by serial within one (shift, day, month) group but
//! are not globally chronological: the month code alone does not distinguish
//! years, and uniqueness is only guaranteed within a (shift, date) scope.

use chrono::{Datelike, NaiveDate};
use shared::types::Shift;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};

/// Serials run 001-999 within one (shift, production date) scope
pub const MAX_SERIAL: u32 = 999;

/// Bounded retries when a unique-violation races past the advisory lock
pub const ALLOC_MAX_RETRIES: u32 = 3;

const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// Advisory-lock keys for serial allocation live in their own key space so
/// they cannot collide with other advisory locks on the same database.
const SERIAL_LOCK_SPACE: i64 = 0x4652_5400 << 32;

/// Two-letter month code: first and last letter of the month's English name.
/// Not injective in general; collisions across months are a documented
/// limitation, not an invariant this code relies on.
pub fn month_code(month: u32) -> Option<String> {
    let name = MONTH_NAMES.get(month.checked_sub(1)? as usize)?;
    let first = name.chars().next()?;
    let last = name.chars().last()?;
    Some(format!("{}{}", first, last))
}

/// Parse a shift string from an external caller
pub fn parse_shift(s: &str) -> AppResult<Shift> {
    Shift::from_str(s).ok_or_else(|| AppError::InvalidShift(s.to_string()))
}

/// Format the serial component of a product code.
///
/// A value that parses as a non-negative integer under 1000 is zero-padded
/// to 3 digits; anything else (a pre-formatted external serial) is encoded
/// verbatim.
pub fn serial_component(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(n) if n < 1000 => format!("{:03}", n),
        _ => trimmed.to_string(),
    }
}

/// Encode a product code from its positional fields.
///
/// Deterministic and total over valid inputs: shift letter, zero-padded
/// calendar day, month code, serial component, concatenated without
/// separators.
pub fn encode_product_code(shift: Shift, production_date: NaiveDate, serial: &str) -> String {
    // month() is always in 1..=12, so the lookup cannot miss
    let month_code = month_code(production_date.month()).unwrap_or_default();

    format!(
        "{}{:02}{}{}",
        shift.code(),
        production_date.day(),
        month_code,
        serial_component(serial)
    )
}

/// Positional inverse: the trailing 3 characters of a code are its serial.
///
/// Returns None for codes whose trailing segment is not numeric; callers
/// skip such codes rather than fail, to stay robust to historical or
/// manually entered product numbers.
pub fn decode_serial(code: &str) -> Option<u32> {
    if code.len() < 3 {
        return None;
    }
    code.get(code.len() - 3..)?.parse().ok()
}

/// Successor of the highest allocated serial in a scope. An empty scope
/// starts at 1; past 999 the serial wraps back to 1 (the unique constraint
/// then decides whether the scope is genuinely full).
pub fn next_serial_after(max: Option<u32>) -> u32 {
    match max {
        Some(m) if m >= MAX_SERIAL => 1,
        Some(m) => m + 1,
        None => 1,
    }
}

/// Advisory-lock key for a (shift, production date) allocation scope
fn scope_lock_key(shift: Shift, production_date: NaiveDate) -> i64 {
    let shift_bit = match shift {
        Shift::Day => 0,
        Shift::Night => 1,
    };
    SERIAL_LOCK_SPACE | ((production_date.num_days_from_ce() as i64) << 1) | shift_bit
}

/// Human-readable scope name for errors and logs
pub fn scope_name(shift: Shift, production_date: NaiveDate) -> String {
    format!("({}, {})", shift.as_str(), production_date)
}

/// Allocate the next serial for a (shift, production date) scope.
///
/// Must run inside the transaction that inserts the unit: a per-scope
/// advisory transaction lock serializes concurrent allocations, and the
/// max is read from the raw serial column (not parsed out of code strings)
/// filtered by shift and production date. The lock is released when the
/// transaction commits or rolls back. The unique index on
/// (shift, production_date, serial_number) backstops the lock; callers
/// retry a bounded number of times on unique violation.
pub async fn next_serial(
    conn: &mut PgConnection,
    shift: Shift,
    production_date: NaiveDate,
) -> AppResult<u32> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(scope_lock_key(shift, production_date))
        .execute(&mut *conn)
        .await?;

    let max: Option<i32> = sqlx::query_scalar(
        "SELECT MAX(serial_number) FROM inventory_units WHERE shift = $1 AND production_date = $2",
    )
    .bind(shift.as_str())
    .bind(production_date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(next_serial_after(max.map(|m| m as u32)))
}

/// Highest allocated serial for a scope, without taking the allocation
/// lock. Used by the code preview endpoint, which must not serialize
/// against in-flight creations.
pub async fn peek_max_serial(
    conn: &mut PgConnection,
    shift: Shift,
    production_date: NaiveDate,
) -> AppResult<Option<u32>> {
    let max: Option<i32> = sqlx::query_scalar(
        "SELECT MAX(serial_number) FROM inventory_units WHERE shift = $1 AND production_date = $2",
    )
    .bind(shift.as_str())
    .bind(production_date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(max.map(|m| m as u32))
}

/// True when the error is a Postgres unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}
