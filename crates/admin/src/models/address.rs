use serde::{Deserialize, Serialize};
use shopdesk_core::{AddressId, CardDetailId, UserId};

use super::Record;
use crate::store::Table;

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub pincode: Option<i64>,
}

impl Address {
    /// Single-line form, skipping empty parts.
    #[must_use]
    pub fn one_line(&self) -> String {
        let pincode = self.pincode.map(|code| code.to_string());
        [
            self.address.as_deref(),
            self.district.as_deref(),
            self.city.as_deref(),
            pincode.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

impl Record for Address {
    const TABLE: Table = Table::Addresses;
    const KEY: &'static str = "id";
}

/// A saved payment card. Only ever shown masked.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CardDetail {
    pub id: CardDetailId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub cardholder_name: Option<String>,
    #[serde(default)]
    card_number: Option<i64>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<u32>,
}

impl CardDetail {
    /// Last four digits of the card number.
    #[must_use]
    pub fn last_four(&self) -> Option<String> {
        let digits = self.card_number?.unsigned_abs().to_string();
        let start = digits.len().saturating_sub(4);
        digits.get(start..).map(str::to_owned)
    }

    /// Masked card number, e.g. `•••• 4242`.
    #[must_use]
    pub fn masked(&self) -> String {
        self.last_four()
            .map_or_else(|| "••••".to_string(), |last| format!("•••• {last}"))
    }

    /// Expiry as `MM/YY`.
    #[must_use]
    pub fn expiry(&self) -> Option<String> {
        let (month, year) = (self.month?, self.year?);
        Some(format!("{month:02}/{:02}", year % 100))
    }
}

impl std::fmt::Debug for CardDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetail")
            .field("id", &self.id)
            .field("card_number", &self.masked())
            .finish_non_exhaustive()
    }
}

impl Record for CardDetail {
    const TABLE: Table = Table::CardDetails;
    const KEY: &'static str = "id";
}
