use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// One stored customer submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub country: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub message: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub submitted_at: DateTime<Utc>,
    pub ip_address: String,
}

/// Reads RFC 3339 timestamps, and offset-less ISO 8601 ones as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .or_else(|_| raw.parse::<NaiveDateTime>().map(|at| at.and_utc()))
            .map_err(|e| de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
    }
}

/// Fields a visitor supplies through the public form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub interests: Vec<String>,
    pub message: String,
}

impl NewCustomer {
    /// Names of the required fields left empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Stamps the submission with a fresh id, the current time and the caller address.
    pub fn into_record(self, ip_address: String) -> Result<CustomerRecord, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        Ok(CustomerRecord {
            id: Uuid::new_v4(),
            full_name: self.full_name,
            email: self.email,
            country: self.country,
            interests: self.interests,
            message: self.message,
            submitted_at: Utc::now(),
            ip_address,
        })
    }
}
