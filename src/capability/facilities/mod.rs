//! One module per loadable facility. Each exposes `entries()`: the raw
//! (unwrapped) callables for its allow-listed operations, named by their
//! bare function names. The registry wraps and prefixes them.

pub(crate) mod base64;
pub(crate) mod datetime;
pub(crate) mod hashlib;
pub(crate) mod json;
pub(crate) mod random;
pub(crate) mod requests;
pub(crate) mod time;
pub(crate) mod urllib;

use chrono::format::{Item, StrftimeItems};

use super::native::CallError;

/// Format a datetime with a caller-supplied strftime pattern, rejecting
/// invalid patterns instead of panicking inside chrono's `Display`.
pub(crate) fn checked_format<Tz: chrono::TimeZone>(
    datetime: &chrono::DateTime<Tz>,
    format: &str,
    name: &str,
) -> Result<String, CallError>
where
    Tz::Offset: std::fmt::Display,
{
    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(CallError::InvalidArgument {
            name: name.to_string(),
            message: format!("invalid format string: {:?}", format),
        });
    }
    Ok(datetime.format_with_items(items.into_iter()).to_string())
}
