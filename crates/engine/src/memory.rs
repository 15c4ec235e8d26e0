//! In-process document server
//!
//! [`MemoryServer`] holds databases, collections and documents behind a
//! lock and behaves like a small MongoDB deployment:
//! - a database exists while it holds at least one collection
//! - writes create their database and collection on demand
//! - creating an existing collection fails with the server's message
//! - drops of absent namespaces succeed
//! - natural order is insertion order
//!
//! [`MemoryConnector`] maps `memory://[user:password@]<name>` descriptors to
//! registered servers. Every test in the workspace runs against it.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use docdesk_core::{
    encode, CollectionEntry, DatabaseEntry, DatabaseListing, Descriptor, Document, DocumentValue,
    Error, Filter, ObjectId, Result, ID_FIELD,
};

use crate::driver::{Connection, Connector, FindQuery, PageOrder};

/// Descriptor scheme served by [`MemoryConnector`]
pub const MEMORY_SCHEME: &str = "memory";

type Collection = Vec<Document>;
type Database = IndexMap<String, Collection>;

/// One in-process server
#[derive(Debug, Default)]
pub struct MemoryServer {
    databases: RwLock<IndexMap<String, Database>>,
    credentials: Option<(String, String)>,
    offline: AtomicBool,
    open_connections: AtomicUsize,
    opened_total: AtomicUsize,
    next_id: AtomicU64,
}

impl MemoryServer {
    /// A server accepting any (or no) credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// A server that only accepts `user:password`
    pub fn with_credentials(user: impl Into<String>, password: impl Into<String>) -> Self {
        MemoryServer {
            credentials: Some((user.into(), password.into())),
            ..Self::default()
        }
    }

    /// Make the server unreachable (or reachable again)
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Connections opened and not yet closed
    pub fn open_connections(&self) -> usize {
        self.open_connections.load(Ordering::SeqCst)
    }

    /// Connections opened over the server's lifetime
    pub fn opened_total(&self) -> usize {
        self.opened_total.load(Ordering::SeqCst)
    }

    /// Insert a document directly, creating the namespace on demand.
    ///
    /// A fresh identifier is assigned when the document has no `_id`.
    pub fn insert(&self, database: &str, collection: &str, mut doc: Document) -> DocumentValue {
        let id = match doc.get(ID_FIELD) {
            Some(id) => id.clone(),
            None => {
                let id = DocumentValue::Identifier(self.generate_id());
                doc.shift_insert(0, ID_FIELD.to_string(), id.clone());
                id
            }
        };
        self.databases
            .write()
            .entry(database.to_string())
            .or_default()
            .entry(collection.to_string())
            .or_default()
            .push(doc);
        id
    }

    /// Every document in a collection, in natural order
    pub fn documents(&self, database: &str, collection: &str) -> Vec<Document> {
        self.databases
            .read()
            .get(database)
            .and_then(|db| db.get(collection))
            .cloned()
            .unwrap_or_default()
    }

    /// True when the database currently exists
    pub fn has_database(&self, database: &str) -> bool {
        self.databases.read().contains_key(database)
    }

    fn generate_id(&self) -> ObjectId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(b"mem\0");
        bytes[4..].copy_from_slice(&n.to_be_bytes());
        ObjectId::from_bytes(bytes)
    }

    fn authenticate(&self, userinfo: Option<(&str, &str)>) -> Result<()> {
        match (&self.credentials, userinfo) {
            (None, _) => Ok(()),
            (Some((user, password)), Some((u, p))) if user == u && password == p => Ok(()),
            (Some(_), _) => Err(Error::connection("Authentication failed.")),
        }
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::connection("server selection timeout: no available servers"));
        }
        Ok(())
    }
}

/// Approximate BSON size of a document (its compact text length)
fn document_size(doc: &Document) -> u64 {
    encode(&DocumentValue::Object(doc.clone()), 0).len() as u64
}

/// Resolves `memory://` descriptors to registered servers
#[derive(Debug, Default)]
pub struct MemoryConnector {
    servers: RwLock<IndexMap<String, Arc<MemoryServer>>>,
}

impl MemoryConnector {
    /// A connector with no servers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh server under `name` and return it
    pub fn add_server(&self, name: &str) -> Arc<MemoryServer> {
        self.register(name, MemoryServer::new())
    }

    /// Register an existing server under `name`
    pub fn register(&self, name: &str, server: MemoryServer) -> Arc<MemoryServer> {
        let server = Arc::new(server);
        self.servers
            .write()
            .insert(name.to_string(), Arc::clone(&server));
        server
    }

    /// Look up a registered server
    pub fn server(&self, name: &str) -> Option<Arc<MemoryServer>> {
        self.servers.read().get(name).cloned()
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, descriptor: &Descriptor) -> Result<Box<dyn Connection>> {
        let (userinfo, name) = parse_memory_uri(descriptor.expose())
            .ok_or_else(|| Error::connection(format!("invalid memory descriptor '{}'", descriptor)))?;
        let server = self
            .server(name)
            .ok_or_else(|| Error::connection(format!("getaddrinfo ENOTFOUND {}", name)))?;
        server.ensure_online()?;
        server.authenticate(userinfo)?;

        server.open_connections.fetch_add(1, Ordering::SeqCst);
        server.opened_total.fetch_add(1, Ordering::SeqCst);
        debug!(target: "docdesk::memory", server = name, "Opened connection");
        Ok(Box::new(MemoryConnection { server }))
    }
}

/// Split `memory://[user:password@]name[/...]` into credentials and server name
fn parse_memory_uri(uri: &str) -> Option<(Option<(&str, &str)>, &str)> {
    let (scheme, rest) = uri.split_once("://")?;
    if !scheme.eq_ignore_ascii_case(MEMORY_SCHEME) {
        return None;
    }
    let authority = rest.split(&['/', '?'][..]).next().unwrap_or_default();
    let (userinfo, name) = match authority.rsplit_once('@') {
        Some((userinfo, name)) => (Some(userinfo.split_once(':')?), name),
        None => (None, authority),
    };
    if name.is_empty() {
        return None;
    }
    Some((userinfo, name))
}

struct MemoryConnection {
    server: Arc<MemoryServer>,
}

impl MemoryConnection {
    fn read<T>(&self, f: impl FnOnce(&IndexMap<String, Database>) -> T) -> Result<T> {
        self.server.ensure_online()?;
        Ok(f(&self.server.databases.read()))
    }

    fn write<T>(&self, f: impl FnOnce(&mut IndexMap<String, Database>) -> Result<T>) -> Result<T> {
        self.server.ensure_online()?;
        f(&mut self.server.databases.write())
    }

    fn with_collection<T>(
        &self,
        database: &str,
        collection: &str,
        f: impl FnOnce(&Collection) -> T,
    ) -> Result<T> {
        self.read(|dbs| {
            let empty = Collection::new();
            let docs = dbs
                .get(database)
                .and_then(|db| db.get(collection))
                .unwrap_or(&empty);
            f(docs)
        })
    }
}

impl Connection for MemoryConnection {
    fn ping(&self) -> Result<()> {
        self.server.ensure_online()
    }

    fn list_databases(&self) -> Result<DatabaseListing> {
        self.read(|dbs| {
            let databases: Vec<DatabaseEntry> = dbs
                .iter()
                .map(|(name, colls)| {
                    let size: u64 = colls.values().flatten().map(document_size).sum();
                    DatabaseEntry {
                        name: name.clone(),
                        size_on_disk: size,
                        empty: size == 0,
                    }
                })
                .collect();
            let total_size = databases.iter().map(|d| d.size_on_disk).sum();
            DatabaseListing {
                databases,
                total_size,
            }
        })
    }

    fn database_stats(&self, database: &str) -> Result<Document> {
        self.read(|dbs| {
            let (collections, objects, data_size) = match dbs.get(database) {
                Some(colls) => (
                    colls.len() as i64,
                    colls.values().map(|c| c.len() as i64).sum::<i64>(),
                    colls.values().flatten().map(document_size).sum::<u64>() as i64,
                ),
                None => (0, 0, 0),
            };
            let mut stats = Document::new();
            stats.insert("db".into(), database.into());
            stats.insert("collections".into(), collections.into());
            stats.insert("views".into(), 0i64.into());
            stats.insert("objects".into(), objects.into());
            stats.insert("avgObjSize".into(), average(data_size, objects).into());
            stats.insert("dataSize".into(), data_size.into());
            stats.insert("ok".into(), 1.0.into());
            stats
        })
    }

    fn list_collections(&self, database: &str) -> Result<Vec<CollectionEntry>> {
        self.read(|dbs| {
            dbs.get(database)
                .map(|colls| colls.keys().map(CollectionEntry::collection).collect())
                .unwrap_or_default()
        })
    }

    fn collection_stats(&self, database: &str, collection: &str) -> Result<Document> {
        self.with_collection(database, collection, |docs| {
            let count = docs.len() as i64;
            let size = docs.iter().map(document_size).sum::<u64>() as i64;
            let mut stats = Document::new();
            stats.insert("ns".into(), format!("{}.{}", database, collection).into());
            stats.insert("count".into(), count.into());
            stats.insert("size".into(), size.into());
            stats.insert("avgObjSize".into(), average(size, count).into());
            stats.insert("nindexes".into(), 1i64.into());
            stats.insert("ok".into(), 1.0.into());
            stats
        })
    }

    fn count(&self, database: &str, collection: &str, filter: &Filter) -> Result<u64> {
        self.with_collection(database, collection, |docs| {
            docs.iter().filter(|d| filter.matches(d)).count() as u64
        })
    }

    fn estimated_count(&self, database: &str, collection: &str) -> Result<u64> {
        self.with_collection(database, collection, |docs| docs.len() as u64)
    }

    fn find(&self, database: &str, collection: &str, query: &FindQuery) -> Result<Vec<Document>> {
        self.with_collection(database, collection, |docs| {
            let mut matching: Vec<&Document> =
                docs.iter().filter(|d| query.filter.matches(d)).collect();
            if query.order == PageOrder::ById {
                matching.sort_by(|a, b| match (a.get(ID_FIELD), b.get(ID_FIELD)) {
                    (Some(x), Some(y)) => x.canonical_cmp(y),
                    (x, y) => x.is_some().cmp(&y.is_some()),
                });
            }
            let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
            let limit = query
                .limit
                .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
                .unwrap_or(usize::MAX);
            matching
                .into_iter()
                .skip(skip)
                .take(limit)
                .cloned()
                .collect()
        })
    }

    fn create_collection(&self, database: &str, collection: &str) -> Result<()> {
        self.write(|dbs| {
            let db = dbs.entry(database.to_string()).or_default();
            if db.contains_key(collection) {
                return Err(Error::driver(format!(
                    "Collection {}.{} already exists.",
                    database, collection
                )));
            }
            db.insert(collection.to_string(), Collection::new());
            Ok(())
        })
    }

    fn drop_collection(&self, database: &str, collection: &str) -> Result<()> {
        self.write(|dbs| {
            if let Some(db) = dbs.get_mut(database) {
                db.shift_remove(collection);
                if db.is_empty() {
                    dbs.shift_remove(database);
                }
            }
            Ok(())
        })
    }

    fn drop_database(&self, database: &str) -> Result<()> {
        self.write(|dbs| {
            dbs.shift_remove(database);
            Ok(())
        })
    }

    fn delete_one(&self, database: &str, collection: &str, filter: &Filter) -> Result<u64> {
        self.write(|dbs| {
            let Some(docs) = dbs.get_mut(database).and_then(|db| db.get_mut(collection)) else {
                return Ok(0);
            };
            match docs.iter().position(|d| filter.matches(d)) {
                Some(pos) => {
                    docs.remove(pos);
                    Ok(1)
                }
                None => Ok(0),
            }
        })
    }

    fn delete_many(&self, database: &str, collection: &str, filter: &Filter) -> Result<u64> {
        self.write(|dbs| {
            let Some(docs) = dbs.get_mut(database).and_then(|db| db.get_mut(collection)) else {
                return Ok(0);
            };
            let before = docs.len();
            docs.retain(|d| !filter.matches(d));
            Ok((before - docs.len()) as u64)
        })
    }

    fn upsert_fields(
        &self,
        database: &str,
        collection: &str,
        id: &DocumentValue,
        fields: &Document,
    ) -> Result<bool> {
        let by_id = Filter::by_id(id.clone());
        self.write(|dbs| {
            let docs = dbs
                .entry(database.to_string())
                .or_default()
                .entry(collection.to_string())
                .or_default();
            match docs.iter_mut().find(|d| by_id.matches(d)) {
                Some(existing) => {
                    for (key, value) in fields {
                        existing.insert(key.clone(), value.clone());
                    }
                    Ok(false)
                }
                None => {
                    let mut doc = Document::with_capacity(fields.len() + 1);
                    doc.insert(ID_FIELD.to_string(), id.clone());
                    doc.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                    docs.push(doc);
                    Ok(true)
                }
            }
        })
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.server.open_connections.fetch_sub(1, Ordering::SeqCst);
        debug!(target: "docdesk::memory", "Closed connection");
        Ok(())
    }
}

fn average(total: i64, count: i64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}
