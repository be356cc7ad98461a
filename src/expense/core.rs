//! Defines the core data models for expenses and the validation of incoming fields.

use std::{fmt::Display, str::FromStr};

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{Error, ValidationError};

// ============================================================================
// MODELS
// ============================================================================

/// The store-assigned ID of an expense.
///
/// IDs are rendered as 24 lowercase hexadecimal characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpenseId(ObjectId);

impl ExpenseId {
    /// Create a new, unique ID.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub(crate) fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for ExpenseId {
    fn from(object_id: ObjectId) -> Self {
        Self(object_id)
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for ExpenseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| Error::InvalidExpenseId(s.to_owned()))
    }
}

impl Serialize for ExpenseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExpenseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A record of money spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the store.
    pub id: ExpenseId,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent, never negative.
    pub amount: f64,
    /// The category of the expense, e.g. "food", "transport".
    pub category: String,
    /// When the expense happened, in UTC with millisecond precision.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// The unvalidated fields of an expense, as sent by a client.
///
/// Used as the body of both create and update requests. Convert into a
/// [NewExpense] or an [ExpenseUpdate] to validate it.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ExpenseFields {
    /// A text description of the expense.
    pub description: Option<String>,
    /// The amount of money spent.
    pub amount: Option<f64>,
    /// The category of the expense.
    pub category: Option<String>,
    /// When the expense happened.
    ///
    /// Accepts an RFC 3339 timestamp, a timestamp without an offset (read as
    /// UTC), a calendar date (midnight UTC) or milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "deserialize_client_date")]
    pub date: Option<OffsetDateTime>,
}

/// A validated expense that has not been stored yet.
///
/// The only way to get one is by validating [ExpenseFields], so the store
/// never sees a record that breaks the expense invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    description: String,
    amount: f64,
    category: String,
    date: OffsetDateTime,
}

impl NewExpense {
    /// The description of the expense.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The amount of money spent.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The category of the expense.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// When the expense happened, the time of validation if the client did not give a date.
    pub fn date(&self) -> OffsetDateTime {
        self.date
    }

    /// Attach the store-assigned `id` to create the stored record.
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date,
        }
    }
}

impl TryFrom<ExpenseFields> for NewExpense {
    type Error = ValidationError;

    /// Validate the fields for a new expense.
    ///
    /// # Errors
    /// Returns a:
    /// - [ValidationError::MissingField] if the description, amount or category is missing,
    /// - [ValidationError::EmptyField] if the description or category is blank,
    /// - [ValidationError::NegativeAmount] or [ValidationError::InvalidAmount] for a bad amount.
    fn try_from(fields: ExpenseFields) -> Result<Self, Self::Error> {
        let description = fields
            .description
            .ok_or(ValidationError::MissingField("description"))?;
        let amount = fields
            .amount
            .ok_or(ValidationError::MissingField("amount"))?;
        let category = fields
            .category
            .ok_or(ValidationError::MissingField("category"))?;

        Ok(Self {
            description: validate_text("description", description)?,
            amount: validate_amount(amount)?,
            category: validate_text("category", category)?,
            date: normalize_date(fields.date.unwrap_or_else(OffsetDateTime::now_utc)),
        })
    }
}

/// A validated partial update to an expense.
///
/// Fields that are `None` are left as they are in the store.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpenseUpdate {
    description: Option<String>,
    amount: Option<f64>,
    category: Option<String>,
    date: Option<OffsetDateTime>,
}

impl ExpenseUpdate {
    /// The new description, if it should change.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The new amount, if it should change.
    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// The new category, if it should change.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The new date, if it should change.
    pub fn date(&self) -> Option<OffsetDateTime> {
        self.date
    }

    /// Whether the update leaves every field unchanged.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    /// Overwrite the fields of `expense` that this update sets.
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(description) = &self.description {
            expense.description.clone_from(description);
        }

        if let Some(amount) = self.amount {
            expense.amount = amount;
        }

        if let Some(category) = &self.category {
            expense.category.clone_from(category);
        }

        if let Some(date) = self.date {
            expense.date = date;
        }
    }
}

impl TryFrom<ExpenseFields> for ExpenseUpdate {
    type Error = ValidationError;

    /// Validate the fields that were supplied, ignoring the ones that were not.
    fn try_from(fields: ExpenseFields) -> Result<Self, Self::Error> {
        Ok(Self {
            description: fields
                .description
                .map(|description| validate_text("description", description))
                .transpose()?,
            amount: fields.amount.map(validate_amount).transpose()?,
            category: fields
                .category
                .map(|category| validate_text("category", category))
                .transpose()?,
            date: fields.date.map(normalize_date),
        })
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate_text(field: &'static str, text: String) -> Result<String, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }

    Ok(text)
}

fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount);
    }

    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount(amount));
    }

    // -0.0 passes the check above, store it as 0.0.
    Ok(amount.abs())
}

/// Convert `date` to UTC and drop anything finer than a millisecond, the
/// precision of the document store.
fn normalize_date(date: OffsetDateTime) -> OffsetDateTime {
    let date = date.to_offset(UtcOffset::UTC);
    let sub_millis = date.nanosecond() % 1_000_000;

    date - Duration::nanoseconds(i64::from(sub_millis))
}

// ============================================================================
// DATE PARSING
// ============================================================================

/// A date as a client may send it in JSON.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClientDate {
    EpochMillis(i64),
    Text(String),
}

const TIMESTAMP_WITHOUT_OFFSET: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

const CALENDAR_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

fn deserialize_client_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error> {
    let Some(date) = Option::<ClientDate>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let parsed = match date {
        ClientDate::EpochMillis(millis) => {
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
        }
        ClientDate::Text(text) => parse_date_text(&text),
    };

    parsed.map(Some).ok_or_else(|| {
        serde::de::Error::custom(
            "date must be an RFC 3339 timestamp, a timestamp without an offset, \
            a YYYY-MM-DD date or milliseconds since the Unix epoch",
        )
    })
}

fn parse_date_text(text: &str) -> Option<OffsetDateTime> {
    if let Ok(date) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date);
    }

    if let Ok(date) = PrimitiveDateTime::parse(text, TIMESTAMP_WITHOUT_OFFSET) {
        return Some(date.assume_utc());
    }

    Date::parse(text, CALENDAR_DATE)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

// ============================================================================
// TESTS
// ============================================================================
