//! MongoDB backend
//!
//! Built on the official driver's blocking API. Each [`Connection`] owns its
//! own client, so nothing is pooled across operations. Statistics come from
//! `dbStats` and `collStats` and are passed through unchanged.

mod convert;

use bson::{doc, Bson, Document as BsonDocument};
use mongodb::options::FindOptions;
use mongodb::results::CollectionType;
use mongodb::sync::{Client, Collection};
use tracing::debug;

use docdesk_core::{
    CollectionEntry, DatabaseEntry, DatabaseListing, Descriptor, Document, DocumentValue, Error,
    Filter, Result,
};

use crate::driver::{Connection, Connector, FindQuery, PageOrder};
use convert::{
    bson_u64, filter_to_bson, from_bson_document, is_namespace_not_found, map_error, to_bson,
    to_bson_document,
};

/// Descriptor schemes served by [`MongoConnector`]
pub const MONGO_SCHEMES: &[&str] = &["mongodb", "mongodb+srv"];

/// Opens MongoDB connections from `mongodb://` descriptors
#[derive(Debug, Default, Clone, Copy)]
pub struct MongoConnector;

impl MongoConnector {
    /// Create a connector
    pub fn new() -> Self {
        MongoConnector
    }
}

impl Connector for MongoConnector {
    fn connect(&self, descriptor: &Descriptor) -> Result<Box<dyn Connection>> {
        let client = Client::with_uri_str(descriptor.expose())
            .map_err(|e| Error::connection(e.to_string()))?;
        debug!(target: "docdesk::mongo", descriptor = %descriptor, "Created client");
        Ok(Box::new(MongoConnection { client }))
    }
}

struct MongoConnection {
    client: Client,
}

impl MongoConnection {
    fn collection(&self, database: &str, collection: &str) -> Collection<BsonDocument> {
        self.client.database(database).collection(collection)
    }

    fn run_command(&self, database: &str, command: BsonDocument) -> Result<BsonDocument> {
        self.client
            .database(database)
            .run_command(command)
            .run()
            .map_err(map_error)
    }
}

impl Connection for MongoConnection {
    fn ping(&self) -> Result<()> {
        self.run_command("admin", doc! { "ping": 1 }).map(|_| ())
    }

    fn list_databases(&self) -> Result<DatabaseListing> {
        let reply = self.run_command("admin", doc! { "listDatabases": 1 })?;
        let databases = match reply.get("databases") {
            Some(Bson::Array(entries)) => entries
                .iter()
                .filter_map(|entry| match entry {
                    Bson::Document(d) => Some(DatabaseEntry {
                        name: d.get_str("name").unwrap_or_default().to_string(),
                        size_on_disk: bson_u64(d.get("sizeOnDisk")),
                        empty: d.get_bool("empty").unwrap_or(false),
                    }),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(DatabaseListing {
            databases,
            total_size: bson_u64(reply.get("totalSize")),
        })
    }

    fn database_stats(&self, database: &str) -> Result<Document> {
        self.run_command(database, doc! { "dbStats": 1 })
            .map(from_bson_document)
    }

    fn list_collections(&self, database: &str) -> Result<Vec<CollectionEntry>> {
        let cursor = self
            .client
            .database(database)
            .list_collections()
            .run()
            .map_err(map_error)?;
        cursor
            .map(|spec| {
                let spec = spec.map_err(map_error)?;
                let collection_type = match spec.collection_type {
                    CollectionType::Collection => "collection".to_string(),
                    CollectionType::View => "view".to_string(),
                    CollectionType::Timeseries => "timeseries".to_string(),
                    other => format!("{:?}", other).to_lowercase(),
                };
                Ok(CollectionEntry {
                    name: spec.name,
                    collection_type,
                })
            })
            .collect()
    }

    fn collection_stats(&self, database: &str, collection: &str) -> Result<Document> {
        self.run_command(database, doc! { "collStats": collection })
            .map(from_bson_document)
    }

    fn count(&self, database: &str, collection: &str, filter: &Filter) -> Result<u64> {
        self.collection(database, collection)
            .count_documents(filter_to_bson(filter))
            .run()
            .map_err(map_error)
    }

    fn estimated_count(&self, database: &str, collection: &str) -> Result<u64> {
        self.collection(database, collection)
            .estimated_document_count()
            .run()
            .map_err(map_error)
    }

    fn find(&self, database: &str, collection: &str, query: &FindQuery) -> Result<Vec<Document>> {
        let mut options = FindOptions::default();
        if query.skip > 0 {
            options.skip = Some(query.skip);
        }
        options.limit = query
            .limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX));
        if query.order == PageOrder::ById {
            options.sort = Some(doc! { "_id": 1 });
        }
        let cursor = self
            .collection(database, collection)
            .find(filter_to_bson(&query.filter))
            .with_options(options)
            .run()
            .map_err(map_error)?;
        cursor
            .map(|doc| doc.map(from_bson_document).map_err(map_error))
            .collect()
    }

    fn create_collection(&self, database: &str, collection: &str) -> Result<()> {
        self.client
            .database(database)
            .create_collection(collection)
            .run()
            .map_err(map_error)
    }

    fn drop_collection(&self, database: &str, collection: &str) -> Result<()> {
        match self.collection(database, collection).drop().run() {
            Ok(()) => Ok(()),
            Err(e) if is_namespace_not_found(&e) => Ok(()),
            Err(e) => Err(map_error(e)),
        }
    }

    fn drop_database(&self, database: &str) -> Result<()> {
        self.client.database(database).drop().run().map_err(map_error)
    }

    fn delete_one(&self, database: &str, collection: &str, filter: &Filter) -> Result<u64> {
        self.collection(database, collection)
            .delete_one(filter_to_bson(filter))
            .run()
            .map(|r| r.deleted_count)
            .map_err(map_error)
    }

    fn delete_many(&self, database: &str, collection: &str, filter: &Filter) -> Result<u64> {
        self.collection(database, collection)
            .delete_many(filter_to_bson(filter))
            .run()
            .map(|r| r.deleted_count)
            .map_err(map_error)
    }

    fn upsert_fields(
        &self,
        database: &str,
        collection: &str,
        id: &DocumentValue,
        fields: &Document,
    ) -> Result<bool> {
        let id = to_bson(id);
        // `$set` must not be empty; re-setting `_id` to itself is a no-op
        let set = if fields.is_empty() {
            doc! { "_id": id.clone() }
        } else {
            to_bson_document(fields)
        };
        let result = self
            .collection(database, collection)
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .upsert(true)
            .run()
            .map_err(map_error)?;
        Ok(result.upserted_id.is_some())
    }

    fn close(self: Box<Self>) -> Result<()> {
        drop(self.client);
        debug!(target: "docdesk::mongo", "Dropped client");
        Ok(())
    }
}
