//! Implements a MongoDB backed expense store.

use std::ops::Range;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{self, Document, doc, oid::ObjectId},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Expense, ExpenseId, ExpenseStore, ExpenseUpdate, NewExpense},
};

/// The connection string used when none is configured.
pub const DEFAULT_DATABASE_URL: &str = "mongodb://127.0.0.1:27017/expenses";

/// The database used when the connection string does not name one.
const DEFAULT_DATABASE: &str = "expenses";

/// The collection that holds expense documents.
const COLLECTION: &str = "expenses";

/// Stores expenses in a MongoDB collection.
///
/// Clones share the client's connection pool.
#[derive(Debug, Clone)]
pub struct MongoExpenseStore {
    database: Database,
    collection: Collection<ExpenseDocument>,
}

impl MongoExpenseStore {
    /// Create a store for the database named in `database_url`.
    ///
    /// The driver connects lazily, so this does not fail if the server is
    /// down. Use [MongoExpenseStore::ping] to check the connection.
    ///
    /// # Errors
    /// Returns [Error::Store] if `database_url` is not a valid connection string.
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let client = Client::with_uri_str(database_url).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        Ok(Self::from_database(database))
    }

    /// Create a store for the `expenses` collection in `database`.
    pub fn from_database(database: Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
            database,
        }
    }

    /// Check that the database server is reachable.
    ///
    /// # Errors
    /// Returns [Error::Store] if the server could not be reached.
    pub async fn ping(&self) -> Result<(), Error> {
        self.database.run_command(doc! { "ping": 1 }).await?;

        Ok(())
    }
}

#[async_trait]
impl ExpenseStore for MongoExpenseStore {
    async fn list(&self) -> Result<Vec<Expense>, Error> {
        let documents: Vec<ExpenseDocument> =
            self.collection.find(doc! {}).await?.try_collect().await?;

        documents.into_iter().map(Expense::try_from).collect()
    }

    async fn create(&self, expense: NewExpense) -> Result<Expense, Error> {
        let expense = expense.into_expense(ExpenseId::new());
        self.collection
            .insert_one(ExpenseDocument::from(&expense))
            .await?;

        Ok(expense)
    }

    async fn update_by_id(&self, id: ExpenseId, update: ExpenseUpdate) -> Result<Expense, Error> {
        let filter = id_filter(id);

        let document = if update.is_empty() {
            // MongoDB rejects an empty `$set`.
            self.collection.find_one(filter).await?
        } else {
            self.collection
                .find_one_and_update(filter, doc! { "$set": set_document(&update) })
                .return_document(ReturnDocument::After)
                .await?
        };

        document.ok_or(Error::NotFound)?.try_into()
    }

    async fn delete_by_id(&self, id: ExpenseId) -> Result<(), Error> {
        let result = self
            .collection
            .delete_one(id_filter(id))
            .await?;

        match result.deleted_count {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    async fn find_by_date_range(
        &self,
        range: Range<OffsetDateTime>,
    ) -> Result<Vec<Expense>, Error> {
        let documents: Vec<ExpenseDocument> = self
            .collection
            .find(date_range_filter(&range))
            .await?
            .try_collect()
            .await?;

        documents.into_iter().map(Expense::try_from).collect()
    }
}

// ============================================================================
// DOCUMENT MAPPING
// ============================================================================

/// An expense as it is stored in the `expenses` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ExpenseDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    description: String,
    amount: f64,
    category: String,
    date: bson::DateTime,
}

impl From<&Expense> for ExpenseDocument {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.object_id(),
            description: expense.description.clone(),
            amount: expense.amount,
            category: expense.category.clone(),
            date: to_bson_date(expense.date),
        }
    }
}

impl TryFrom<ExpenseDocument> for Expense {
    type Error = Error;

    fn try_from(document: ExpenseDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: document.id.into(),
            description: document.description,
            amount: document.amount,
            category: document.category,
            date: from_bson_date(document.date)?,
        })
    }
}

fn id_filter(id: ExpenseId) -> Document {
    doc! { "_id": id.object_id() }
}

/// Match documents dated in `range`, start inclusive and end exclusive.
fn date_range_filter(range: &Range<OffsetDateTime>) -> Document {
    doc! {
        "date": {
            "$gte": to_bson_date(range.start),
            "$lt": to_bson_date(range.end),
        }
    }
}

fn set_document(update: &ExpenseUpdate) -> Document {
    let mut fields = Document::new();

    if let Some(description) = update.description() {
        fields.insert("description", description);
    }

    if let Some(amount) = update.amount() {
        fields.insert("amount", amount);
    }

    if let Some(category) = update.category() {
        fields.insert("category", category);
    }

    if let Some(date) = update.date() {
        fields.insert("date", to_bson_date(date));
    }

    fields
}

fn to_bson_date(date: OffsetDateTime) -> bson::DateTime {
    let millis = date.unix_timestamp_nanos() / 1_000_000;

    bson::DateTime::from_millis(millis as i64)
}

fn from_bson_date(date: bson::DateTime) -> Result<OffsetDateTime, Error> {
    let nanos = i128::from(date.timestamp_millis()) * 1_000_000;

    OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|error| {
        Error::Store(format!(
            "stored date {} is out of range: {error}",
            date.timestamp_millis()
        ))
    })
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{self, Bson, doc, oid::ObjectId};
    use time::macros::datetime;

    use crate::{
        Error,
        expense::{Expense, ExpenseFields, ExpenseId, ExpenseUpdate, month_range},
    };

    use super::{
        ExpenseDocument, date_range_filter, from_bson_date, id_filter, set_document, to_bson_date,
    };

    #[test]
    fn date_converts_with_millisecond_precision() {
        let date = datetime!(2025-10-18 09:15:30.250 UTC);

        let bson_date = to_bson_date(date);

        assert_eq!(bson_date.timestamp_millis(), 1_760_778_930_250);
        assert_eq!(from_bson_date(bson_date), Ok(date));
    }

    #[test]
    fn date_before_epoch_converts() {
        let date = datetime!(1969-12-31 23:59:59.500 UTC);

        assert_eq!(from_bson_date(to_bson_date(date)), Ok(date));
    }

    #[test]
    fn out_of_range_date_is_store_error() {
        let result = from_bson_date(bson::DateTime::MAX);

        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[test]
    fn document_maps_to_expense() {
        let object_id = ObjectId::new();
        let document = ExpenseDocument {
            id: object_id,
            description: "coffee".to_owned(),
            amount: 4.5,
            category: "food".to_owned(),
            date: to_bson_date(datetime!(2025-10-18 08:00 UTC)),
        };

        let expense = Expense::try_from(document.clone()).unwrap();

        assert_eq!(expense.id.to_string(), object_id.to_hex());
        assert_eq!(expense.date, datetime!(2025-10-18 08:00 UTC));
        assert_eq!(ExpenseDocument::from(&expense), document);
    }

    #[test]
    fn set_document_only_contains_supplied_fields() {
        let update = ExpenseUpdate::try_from(ExpenseFields {
            amount: Some(7.25),
            category: Some("transport".to_owned()),
            ..Default::default()
        })
        .unwrap();

        let fields = set_document(&update);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("amount"), Some(&Bson::Double(7.25)));
        assert_eq!(
            fields.get("category"),
            Some(&Bson::String("transport".to_owned()))
        );
    }

    #[test]
    fn id_filter_matches_object_id() {
        let id = ExpenseId::new();

        assert_eq!(id_filter(id), doc! { "_id": id.object_id() });
    }

    #[test]
    fn date_range_filter_is_start_inclusive_end_exclusive() {
        let range = month_range(2025, 10).unwrap();

        let filter = date_range_filter(&range);

        let date = filter.get_document("date").unwrap();
        assert_eq!(date.len(), 2);
        assert_eq!(
            date.get("$gte"),
            Some(&Bson::DateTime(bson::DateTime::from_millis(1_759_276_800_000)))
        );
        assert_eq!(
            date.get("$lt"),
            Some(&Bson::DateTime(bson::DateTime::from_millis(1_761_955_200_000)))
        );
    }
}

/// These tests need a running MongoDB server at `DATABASE_URL` (default
/// [DEFAULT_DATABASE_URL](super::DEFAULT_DATABASE_URL)). Each test works in
/// its own database and drops it afterwards.
///
/// Run them with `cargo test -- --ignored`.
#[cfg(test)]
mod database_tests {
    use mongodb::{Client, bson::oid::ObjectId};
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        Error,
        expense::{
            ExpenseFields, ExpenseId, ExpenseStore, ExpenseUpdate, NewExpense, month_range,
        },
    };

    use super::{DEFAULT_DATABASE_URL, MongoExpenseStore};

    async fn must_create_store() -> MongoExpenseStore {
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());
        let client = Client::with_uri_str(&url)
            .await
            .expect("Could not parse DATABASE_URL.");
        let database = client.database(&format!("expense_tracker_test_{}", ObjectId::new()));

        let store = MongoExpenseStore::from_database(database);
        store.ping().await.expect("Could not reach MongoDB.");

        store
    }

    async fn must_drop(store: MongoExpenseStore) {
        store
            .database
            .drop()
            .await
            .expect("Could not drop test database.");
    }

    fn new_expense(description: &str, date: OffsetDateTime) -> NewExpense {
        NewExpense::try_from(ExpenseFields {
            description: Some(description.to_owned()),
            amount: Some(4.5),
            category: Some("food".to_owned()),
            date: Some(date),
        })
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "needs a MongoDB server"]
    async fn create_then_list() {
        let store = must_create_store().await;

        let coffee = store
            .create(new_expense("coffee", datetime!(2025-10-18 09:15:30.250 UTC)))
            .await
            .unwrap();
        let tea = store
            .create(new_expense("tea", datetime!(2025-10-19 10:00 UTC)))
            .await
            .unwrap();

        let mut got = store.list().await.unwrap();
        got.sort_by_key(|expense| expense.date);
        assert_eq!(got, vec![coffee, tea]);

        must_drop(store).await;
    }

    #[tokio::test]
    #[ignore = "needs a MongoDB server"]
    async fn update_returns_updated_expense() {
        let store = must_create_store().await;
        let expense = store
            .create(new_expense("coffee", datetime!(2025-10-18 09:00 UTC)))
            .await
            .unwrap();
        let update = ExpenseUpdate::try_from(ExpenseFields {
            amount: Some(5.0),
            date: Some(datetime!(2025-10-20 12:00 UTC)),
            ..Default::default()
        })
        .unwrap();

        let got = store.update_by_id(expense.id, update).await.unwrap();
        let unchanged = store
            .update_by_id(expense.id, ExpenseUpdate::default())
            .await
            .unwrap();
        let missing = store
            .update_by_id(ExpenseId::new(), ExpenseUpdate::default())
            .await;

        assert_eq!(got.amount, 5.0);
        assert_eq!(got.date, datetime!(2025-10-20 12:00 UTC));
        assert_eq!(got.description, "coffee");
        assert_eq!(unchanged, got);
        assert_eq!(missing, Err(Error::NotFound));

        must_drop(store).await;
    }

    #[tokio::test]
    #[ignore = "needs a MongoDB server"]
    async fn delete_twice_is_not_found() {
        let store = must_create_store().await;
        let expense = store
            .create(new_expense("coffee", datetime!(2025-10-18 09:00 UTC)))
            .await
            .unwrap();

        let first = store.delete_by_id(expense.id).await;
        let second = store.delete_by_id(expense.id).await;

        assert_eq!(first, Ok(()));
        assert_eq!(second, Err(Error::NotFound));
        assert!(store.list().await.unwrap().is_empty());

        must_drop(store).await;
    }

    #[tokio::test]
    #[ignore = "needs a MongoDB server"]
    async fn month_range_includes_start_and_excludes_end() {
        let store = must_create_store().await;
        let first = store
            .create(new_expense("first", datetime!(2025-10-01 00:00 UTC)))
            .await
            .unwrap();
        let last = store
            .create(new_expense("last", datetime!(2025-10-31 23:59:59.999 UTC)))
            .await
            .unwrap();
        for (description, date) in [
            ("before", datetime!(2025-09-30 23:59:59.999 UTC)),
            ("after", datetime!(2025-11-01 00:00 UTC)),
        ] {
            store.create(new_expense(description, date)).await.unwrap();
        }

        let mut got = store
            .find_by_date_range(month_range(2025, 10).unwrap())
            .await
            .unwrap();
        got.sort_by_key(|expense| expense.date);

        assert_eq!(got, vec![first, last]);

        must_drop(store).await;
    }
}
