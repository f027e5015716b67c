use crate::config::{InsertFailurePolicy, DEST_COLLECTION};
use crate::taxii::ThreatObject;
use bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::time::Duration;
use thiserror::Error;

/// How long to wait for a reachable server before giving up on connect.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from the destination store.
///
/// `Connection` aborts the run before any insert; `Insert` and
/// `InvalidDocument` abort or skip depending on the configured
/// [`InsertFailurePolicy`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database unreachable or refused the connection probe
    #[error("Store connection failed: {0}")]
    Connection(#[source] mongodb::error::Error),
    /// A document failed to persist
    #[error("Insert failed: {0}")]
    Insert(#[source] mongodb::error::Error),
    /// An object could not be represented as a BSON document
    #[error("Object is not representable as a BSON document: {0}")]
    InvalidDocument(#[from] bson::ser::Error),
}

/// Handle on the destination collection.
#[derive(Clone, Debug)]
pub struct Store {
    collection: Collection<Document>,
}

impl Store {
    /// Connect to MongoDB and verify reachability with a `ping`.
    ///
    /// The driver connects lazily, so the ping is what actually surfaces an
    /// unreachable or misconfigured server here instead of at first insert.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        tracing::info!(db = db_name, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(StoreError::Connection)?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options).map_err(StoreError::Connection)?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(StoreError::Connection)?;

        tracing::info!(db = db_name, collection = DEST_COLLECTION, "Connected to MongoDB");
        Ok(Self {
            collection: db.collection::<Document>(DEST_COLLECTION),
        })
    }

    /// Insert each object as one new document, attributes verbatim.
    ///
    /// Returns the number of documents actually inserted. Empty input is a
    /// no-op. Under [`InsertFailurePolicy::Abort`] the whole batch goes in
    /// one ordered `insert_many` and any failure is fatal; under
    /// [`InsertFailurePolicy::Skip`] documents are inserted one at a time
    /// and failures are logged and counted but do not stop the run.
    pub async fn insert_all(
        &self,
        objects: &[ThreatObject],
        policy: InsertFailurePolicy,
    ) -> Result<usize, StoreError> {
        if objects.is_empty() {
            tracing::warn!("No objects to insert");
            return Ok(0);
        }

        match policy {
            InsertFailurePolicy::Abort => {
                let documents = objects
                    .iter()
                    .map(to_document)
                    .collect::<Result<Vec<_>, _>>()?;
                let result = self
                    .collection
                    .insert_many(documents)
                    .await
                    .map_err(StoreError::Insert)?;
                Ok(result.inserted_ids.len())
            }
            InsertFailurePolicy::Skip => {
                let mut inserted = 0usize;
                let mut skipped = 0usize;
                for obj in objects {
                    match self.insert_one(obj).await {
                        Ok(()) => inserted += 1,
                        Err(e) => {
                            skipped += 1;
                            tracing::warn!(
                                id = obj.0.get("id").and_then(|v| v.as_str()).unwrap_or("(no id)"),
                                error = %e,
                                "Skipping document that failed to insert"
                            );
                        }
                    }
                }
                if skipped > 0 {
                    tracing::warn!(inserted, skipped, "Some documents were not inserted");
                }
                Ok(inserted)
            }
        }
    }

    async fn insert_one(&self, obj: &ThreatObject) -> Result<(), StoreError> {
        let document = to_document(obj)?;
        self.collection
            .insert_one(document)
            .await
            .map_err(StoreError::Insert)?;
        Ok(())
    }
}

fn to_document(obj: &ThreatObject) -> Result<Document, StoreError> {
    Ok(bson::to_document(obj)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> ThreatObject {
        serde_json::from_value(value).unwrap()
    }

    /// Store backed by an unreachable server; the driver connects lazily so
    /// this only fails if an operation actually touches the network.
    async fn unreachable_store() -> Store {
        let options = ClientOptions::parse("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=100")
            .await
            .unwrap();
        let client = Client::with_options(options).unwrap();
        Store {
            collection: client.database("test").collection(DEST_COLLECTION),
        }
    }

    #[tokio::test]
    async fn test_empty_input_is_a_no_op() {
        // Zero inserts, zero network traffic, successful result
        let store = unreachable_store().await;
        let inserted = store
            .insert_all(&[], InsertFailurePolicy::Abort)
            .await
            .unwrap();
        assert_eq!(inserted, 0);
    }

    #[tokio::test]
    async fn test_skip_policy_continues_past_insert_failures() {
        // Every insert fails against an unreachable server; under Skip the
        // run still completes, reporting zero documents inserted.
        let store = unreachable_store().await;
        let obj = object(json!({"type": "malware", "id": "malware--1"}));

        let inserted = store
            .insert_all(&[obj], InsertFailurePolicy::Skip)
            .await
            .unwrap();
        assert_eq!(inserted, 0);
    }

    #[tokio::test]
    async fn test_abort_policy_fails_on_insert_failure() {
        let store = unreachable_store().await;
        let obj = object(json!({"type": "malware", "id": "malware--1"}));

        let result = store.insert_all(&[obj], InsertFailurePolicy::Abort).await;
        assert!(matches!(result.unwrap_err(), StoreError::Insert(_)));
    }

    #[tokio::test]
    async fn test_connect_failure_is_store_connection_error() {
        let result = Store::connect("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=100", "db").await;
        assert!(matches!(result.unwrap_err(), StoreError::Connection(_)));
    }

    #[test]
    fn test_objects_convert_verbatim() {
        let obj = object(json!({
            "type": "malware",
            "id": "malware--1",
            "name": "Emotet",
            "labels": ["trojan"],
            "is_family": true
        }));

        let document = to_document(&obj).unwrap();
        assert_eq!(document.get_str("type").unwrap(), "malware");
        assert_eq!(document.get_str("name").unwrap(), "Emotet");
        assert!(document.get_bool("is_family").unwrap());
        // Nothing added: same attribute count as the source object
        assert_eq!(document.len(), obj.0.len());
    }

    #[test]
    fn test_nested_attributes_preserved() {
        let obj = object(json!({
            "type": "attack-pattern",
            "id": "attack-pattern--1",
            "kill_chain_phases": [
                {"kill_chain_name": "mitre-attack", "phase_name": "execution"}
            ]
        }));

        let document = to_document(&obj).unwrap();
        let phases = document.get_array("kill_chain_phases").unwrap();
        assert_eq!(phases.len(), 1);
    }
}
