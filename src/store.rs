use bson::{doc, Document};
use chrono::Utc;
use mongodb::options::{
    FindOneAndReplaceOptions, FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument,
};
use mongodb::{Database, IndexModel};
use rocket::futures::TryStreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::resp::problem::Problem;

/// One persisted entity kind. Implementors name their collection and expose
/// their server-generated id; everything else the store needs comes from
/// serde.
pub trait Resource: Serialize + DeserializeOwned + Unpin + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

#[inline]
pub fn id_filter(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

/// Typed handle over one resource collection. Every router talks to its
/// store through this surface; driver errors are translated into [`Problem`]s
/// at this boundary.
pub struct Store<T: Resource> {
    collection: mongodb::Collection<T>,
}

impl<T: Resource> Store<T> {
    pub fn open(db: &Database) -> Store<T> {
        Store {
            collection: db.collection(T::COLLECTION),
        }
    }

    pub async fn create(&self, resource: &T) -> Result<(), Problem> {
        self.collection
            .insert_one(resource, None)
            .await
            .map(|_| ())
            .map_err(Problem::from)
    }

    pub async fn list(&self, filter: impl Into<Option<Document>>) -> Result<Vec<T>, Problem> {
        let cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(Problem::from)?;

        cursor.try_collect().await.map_err(Problem::from)
    }

    pub async fn list_sorted(
        &self,
        filter: impl Into<Option<Document>>,
        sort: Document,
    ) -> Result<Vec<T>, Problem> {
        let options = FindOptions::builder().sort(sort).build();
        let cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(Problem::from)?;

        cursor.try_collect().await.map_err(Problem::from)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<T>, Problem> {
        self.collection
            .find_one(id_filter(id), None)
            .await
            .map_err(Problem::from)
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, Problem> {
        self.collection
            .find_one(filter, None)
            .await
            .map_err(Problem::from)
    }

    /// Full-document update; returns the new state, `None` when absent.
    pub async fn replace(&self, id: Uuid, resource: &T) -> Result<Option<T>, Problem> {
        let options = FindOneAndReplaceOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_replace(id_filter(id), resource, options)
            .await
            .map_err(Problem::from)
    }

    /// In-place write of a single-slot collection: replaces the document
    /// under a fixed id, inserting it when missing, with no window in which
    /// the slot is empty.
    pub async fn upsert(&self, id: Uuid, resource: &T) -> Result<(), Problem> {
        let options = FindOneAndReplaceOptions::builder().upsert(true).build();

        self.collection
            .find_one_and_replace(id_filter(id), resource, options)
            .await
            .map(|_| ())
            .map_err(Problem::from)
    }

    /// `$set` patch; stamps `updated` alongside the given fields.
    pub async fn update(&self, id: Uuid, set: Document) -> Result<Option<T>, Problem> {
        let mut set = set;
        set.insert("updated", Utc::now().to_rfc3339());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(id_filter(id), doc! { "$set": set }, options)
            .await
            .map_err(Problem::from)
    }

    /// Raw conditional update, for atomic read-modify-write operations such
    /// as seat counters. Returns the number of modified documents.
    pub async fn update_where(&self, filter: Document, update: Document) -> Result<u64, Problem> {
        self.collection
            .update_one(filter, update, None)
            .await
            .map(|r| r.modified_count)
            .map_err(Problem::from)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<T>, Problem> {
        self.collection
            .find_one_and_delete(id_filter(id), None)
            .await
            .map_err(Problem::from)
    }

    pub async fn delete_all(&self, filter: Document) -> Result<u64, Problem> {
        self.collection
            .delete_many(filter, None)
            .await
            .map(|r| r.deleted_count)
            .map_err(Problem::from)
    }
}

/// Unique-key enforcement lives in the store layer: user emails, course
/// codes, and one quiz result per user and quiz.
pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    use crate::data::course::Course;
    use crate::data::quiz::QuizResult;
    use crate::data::user::User;

    let unique = IndexOptions::builder().unique(true).build();

    db.collection::<User>(User::COLLECTION)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique.clone())
                .build(),
            None,
        )
        .await?;

    db.collection::<Course>(Course::COLLECTION)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "code": 1 })
                .options(unique.clone())
                .build(),
            None,
        )
        .await?;

    db.collection::<QuizResult>(QuizResult::COLLECTION)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "quiz": 1, "user": 1 })
                .options(unique)
                .build(),
            None,
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_filter_uses_hyphenated_uuid() {
        let id = Uuid::new_v4();
        let filter = id_filter(id);
        assert_eq!(filter.get_str("_id").unwrap(), id.to_string());
    }
}
