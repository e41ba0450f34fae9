//! Serde helpers for loosely-typed store columns.
//!
//! Hosted rows are hand-edited and carry legacy values, so reads here are
//! lenient: unparseable timestamps become `None`, unknown statuses fall back
//! to their default, numbers may arrive as JSON numbers or strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Parse a stored timestamp. Zone-less values are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Decimal from a JSON number or numeric string.
#[must_use]
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// `Option<DateTime<Utc>>` stored as text.
pub mod timestamp {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc, parse_timestamp};

    /// # Errors
    ///
    /// Only fails if the underlying serializer does.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_str(&at.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// # Errors
    ///
    /// Fails only on non-string, non-null input.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }
}

/// `Option<Decimal>` stored as a JSON number.
pub mod decimal {
    use super::{Decimal, Deserialize, Deserializer, Serializer, ToPrimitive, Value, parse_decimal};

    /// # Errors
    ///
    /// Fails if the amount cannot be represented as `f64`.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error> {
        match value.map(|d| d.to_f64()) {
            Some(Some(number)) => serializer.serialize_f64(number),
            Some(None) => Err(serde::ser::Error::custom("amount out of range")),
            None => serializer.serialize_none(),
        }
    }

    /// # Errors
    ///
    /// Never fails on well-formed JSON; unparseable amounts read as `None`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(parse_decimal))
    }
}

/// `bool` stored as the text `"true"` / `"false"`.
pub mod flag_text {
    use super::{Deserialize, Deserializer, Serializer, Value};

    /// # Errors
    ///
    /// Only fails if the underlying serializer does.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    /// # Errors
    ///
    /// Never fails on well-formed JSON; anything but true reads as `false`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Bool(flag)) => flag,
            Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
    }
}

/// `OrderStatus` with unknown values read as pending.
pub mod order_status {
    use shopdesk_core::OrderStatus;

    use super::{Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Only fails if the underlying serializer does.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &OrderStatus, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_str())
    }

    /// # Errors
    ///
    /// Fails only on non-string, non-null input.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OrderStatus, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        if let Some(value) = raw.as_deref()
            && value.parse::<OrderStatus>().is_err()
        {
            tracing::debug!(status = value, "Unknown order status, reading as pending");
        }
        Ok(OrderStatus::from_stored(raw.as_deref()))
    }
}

/// `UserRole` with unknown values read as a plain user.
pub mod user_role {
    use shopdesk_core::UserRole;

    use super::{Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Only fails if the underlying serializer does.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &UserRole, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_str())
    }

    /// # Errors
    ///
    /// Fails only on non-string, non-null input.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UserRole, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(UserRole::from_stored(raw.as_deref()))
    }
}
