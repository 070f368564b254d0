use serde::{Deserialize, Serialize};

/// Generic error body returned by the REST API.
///
/// `field` is set when the error belongs to a single form field
/// (e.g. `"email"` for a duplicate signup).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Signup {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        /// Signed JWT. The payload carries `exp` and the profile claims.
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SendOtp {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VerifyOtp {
        pub email: String,
        pub otp: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VerifyOtpResponse {
        #[serde(default)]
        pub message: Option<String>,
        pub reset_token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResetPassword {
        pub reset_token: String,
        pub password: String,
    }
}

pub mod entry {
    use super::*;
    use chrono::NaiveDate;
    use std::fmt;

    /// Longest title accepted by the entry form.
    pub const TITLE_MAX_LEN: usize = 45;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum EntryKind {
        Income,
        Expense,
    }

    impl EntryKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Income => "Income",
                Self::Expense => "Expense",
            }
        }

        pub fn toggle(self) -> Self {
            match self {
                Self::Income => Self::Expense,
                Self::Expense => Self::Income,
            }
        }
    }

    /// Categories offered by the entry form.
    ///
    /// Stored entries keep their category as free text (see [`Entry::category`]),
    /// so values outside this list survive a round trip through the client.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum Category {
        Food,
        Travel,
        Shopping,
        Salary,
        Other,
    }

    impl Category {
        pub const ALL: [Category; 5] = [
            Self::Food,
            Self::Travel,
            Self::Shopping,
            Self::Salary,
            Self::Other,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Food => "Food",
                Self::Travel => "Travel",
                Self::Shopping => "Shopping",
                Self::Salary => "Salary",
                Self::Other => "Other",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            Self::ALL.into_iter().find(|c| c.as_str() == value)
        }
    }

    impl fmt::Display for Category {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum PaidVia {
        Cash,
        Card,
        #[serde(rename = "UPI")]
        Upi,
        #[serde(rename = "Bank Transfer")]
        BankTransfer,
    }

    impl PaidVia {
        pub const ALL: [PaidVia; 4] = [Self::Cash, Self::Card, Self::Upi, Self::BankTransfer];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Cash => "Cash",
                Self::Card => "Card",
                Self::Upi => "UPI",
                Self::BankTransfer => "Bank Transfer",
            }
        }
    }

    impl fmt::Display for PaidVia {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// An entry as returned by `GET entries`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Entry {
        #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        #[serde(rename = "type")]
        pub kind: EntryKind,
        #[serde(default)]
        pub title: String,
        /// Major units. `None` when the server sent something that is not a number.
        #[serde(default, deserialize_with = "lenient::amount")]
        pub amount: Option<f64>,
        #[serde(deserialize_with = "lenient::date")]
        pub date: NaiveDate,
        /// Free text; empty when the server omitted it.
        #[serde(default, deserialize_with = "lenient::text")]
        pub category: String,
        #[serde(rename = "paidVia", default, deserialize_with = "lenient::paid_via")]
        pub paid_via: Option<PaidVia>,
        #[serde(default)]
        pub notes: Option<String>,
    }

    /// Body of `POST entries` and `PUT entries/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct EntryDraft {
        #[serde(rename = "type")]
        pub kind: EntryKind,
        pub title: String,
        pub amount: f64,
        pub date: NaiveDate,
        pub category: Category,
        #[serde(rename = "paidVia")]
        pub paid_via: PaidVia,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
    }

    /// Deserializers that never reject a field the display layer can live without.
    mod lenient {
        use chrono::{DateTime, NaiveDate};
        use serde::{Deserialize, Deserializer, de::Error};

        use super::PaidVia;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        pub(super) fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = match Option::<Raw>::deserialize(deserializer)? {
                Some(Raw::Number(n)) => Some(n),
                Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
                Some(Raw::Other(_)) | None => None,
            };
            Ok(value.filter(|n| n.is_finite()))
        }

        pub(super) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
        }

        pub(super) fn paid_via<'de, D>(deserializer: D) -> Result<Option<PaidVia>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            Ok(raw.and_then(|value| {
                PaidVia::ALL
                    .into_iter()
                    .find(|p| p.as_str().eq_ignore_ascii_case(value.trim()))
            }))
        }

        /// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its calendar date is kept).
        pub(super) fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = String::deserialize(deserializer)?;
            let raw = raw.trim();
            if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                return Ok(date);
            }
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.date_naive())
                .map_err(|_| D::Error::custom(format!("invalid entry date: {raw}")))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn entry_accepts_canonical_shape() {
            let json = r#"{
                "_id": "65f0c1",
                "type": "expense",
                "title": "Groceries",
                "amount": 120.5,
                "date": "2024-01-06",
                "category": "Food",
                "paidVia": "UPI",
                "notes": "weekly"
            }"#;
            let entry: Entry = serde_json::from_str(json).unwrap();
            assert_eq!(entry.id.as_deref(), Some("65f0c1"));
            assert_eq!(entry.kind, EntryKind::Expense);
            assert_eq!(entry.amount, Some(120.5));
            assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
            assert_eq!(entry.paid_via, Some(PaidVia::Upi));
            assert_eq!(entry.notes.as_deref(), Some("weekly"));
        }

        #[test]
        fn entry_tolerates_bad_amount_and_missing_category() {
            let json = r#"[
                {"type": "income", "title": "a", "amount": "500", "date": "2024-01-05"},
                {"type": "income", "title": "b", "amount": "abc", "date": "2024-01-05"},
                {"type": "income", "title": "c", "amount": null, "date": "2024-01-05"},
                {"type": "income", "title": "d", "amount": {"x": 1}, "date": "2024-01-05"},
                {"type": "income", "title": "e", "date": "2024-01-05", "category": null}
            ]"#;
            let entries: Vec<Entry> = serde_json::from_str(json).unwrap();
            let amounts: Vec<_> = entries.iter().map(|e| e.amount).collect();
            assert_eq!(amounts, vec![Some(500.0), None, None, None, None]);
            assert!(entries.iter().all(|e| e.category.is_empty()));
            assert!(entries.iter().all(|e| e.paid_via.is_none()));
        }

        #[test]
        fn entry_date_accepts_timestamps() {
            let json = r#"{"id": "1", "type": "income", "title": "pay",
                "amount": 1, "date": "2024-03-01T00:00:00.000Z"}"#;
            let entry: Entry = serde_json::from_str(json).unwrap();
            assert_eq!(entry.id.as_deref(), Some("1"));
            assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        }

        #[test]
        fn draft_uses_wire_names() {
            let draft = EntryDraft {
                kind: EntryKind::Income,
                title: "Salary".to_string(),
                amount: 500.0,
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                category: Category::Salary,
                paid_via: PaidVia::BankTransfer,
                notes: None,
            };
            let value = serde_json::to_value(&draft).unwrap();
            assert_eq!(value["type"], "income");
            assert_eq!(value["paidVia"], "Bank Transfer");
            assert_eq!(value["date"], "2024-01-05");
            assert_eq!(value["category"], "Salary");
            assert!(value.get("notes").is_none());
        }

        #[test]
        fn category_parse_is_exact() {
            assert_eq!(Category::parse("Travel"), Some(Category::Travel));
            assert_eq!(Category::parse("travel"), None);
        }
    }
}
