//! Shared traits, id allocation, and date encoding for ledger entries.

use serde::{Deserialize, Serialize};

/// Exposes the stable numeric identifier of a stored entry.
pub trait Identifiable {
    fn raw_id(&self) -> u64;
}

/// Supplies a common contract for retrieving the physical quantity of an entry.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entry into a short user-facing label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Sums the physical quantities of `entries`.
pub fn sum_amounts<'a, T, I>(entries: I) -> f64
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    entries.into_iter().map(Amounted::amount).sum()
}

/// Monotonic id allocator.
///
/// Seeded past the largest id already stored so entries loaded from an older
/// store (which used millisecond timestamps) never collide with new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequence {
    next: u64,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    pub fn after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let next = existing
            .into_iter()
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self { next }
    }

    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// Serde adapter for calendar dates.
///
/// Writes `YYYY-MM-DD`. Reads either that form or a full RFC 3339 timestamp,
/// which is how a generic JSON encoder flattens a date-time value.
pub mod calendar_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid calendar date `{raw}`")))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, FORMAT) {
            return Some(date);
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(stamp.date_naive());
        }
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.date())
    }
}
