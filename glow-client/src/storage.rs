//! redb-based snapshot storage for cart and wishlist state
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `cart_snapshot` | fixed `"cart"` | `Vec<CartLineItem>` | session-restore snapshot |
//! | `wishlist_sets` | user key | `Vec<WishlistKey>` | membership set per user |
//! | `wishlist_lists` | user key | `Vec<WishlistEntry>` | full entries per user |
//!
//! Values are JSON-serialized. The set and list for a user are written in
//! one transaction so a snapshot is always internally consistent. Absence is
//! not an error: load methods return `Option`.

use redb::{Database, ReadableDatabase, TableDefinition};
use shared::{CartLineItem, WishlistEntry, WishlistKey};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for the cart snapshot: key = fixed "cart", value = JSON-serialized Vec<CartLineItem>
const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart_snapshot");

/// Table for wishlist membership sets: key = user key, value = JSON-serialized Vec<WishlistKey>
const WISHLIST_SET_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("wishlist_sets");

/// Table for wishlist entry lists: key = user key, value = JSON-serialized Vec<WishlistEntry>
const WISHLIST_LIST_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("wishlist_lists");

const CART_SNAPSHOT_KEY: &str = "cart";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Snapshot storage backed by redb
#[derive(Clone)]
pub struct SnapshotStorage {
    db: Arc<Database>,
}

impl SnapshotStorage {
    /// Open or create the snapshot database at the given path.
    ///
    /// redb commits are durable as soon as `commit()` returns, and the file
    /// stays consistent across crashes, so a snapshot written mid-session
    /// survives a hard page close.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::init(Database::create(path)?)
    }

    /// Open an in-memory database (for tests and demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
            let _ = write_txn.open_table(WISHLIST_SET_TABLE)?;
            let _ = write_txn.open_table(WISHLIST_LIST_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    // ========== Cart Snapshot ==========

    /// Store the full line list under the fixed cart key
    pub fn store_cart(&self, items: &[CartLineItem]) -> StorageResult<()> {
        let bytes = serde_json::to_vec(items)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART_TABLE)?;
            table.insert(CART_SNAPSHOT_KEY, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Load the persisted cart snapshot, if any
    pub fn load_cart(&self) -> StorageResult<Option<Vec<CartLineItem>>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(CART_TABLE)?;
        match table.get(CART_SNAPSHOT_KEY)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    // ========== Wishlist Snapshots ==========

    /// Store a user's membership set and entry list in one transaction
    pub fn store_wishlist(
        &self,
        user_key: &str,
        set: &[WishlistKey],
        list: &[WishlistEntry],
    ) -> StorageResult<()> {
        let set_bytes = serde_json::to_vec(set)?;
        let list_bytes = serde_json::to_vec(list)?;
        let txn = self.db.begin_write()?;
        {
            let mut set_table = txn.open_table(WISHLIST_SET_TABLE)?;
            set_table.insert(user_key, set_bytes.as_slice())?;
            let mut list_table = txn.open_table(WISHLIST_LIST_TABLE)?;
            list_table.insert(user_key, list_bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Load a user's persisted wishlist pair, if any
    pub fn load_wishlist(
        &self,
        user_key: &str,
    ) -> StorageResult<Option<(Vec<WishlistKey>, Vec<WishlistEntry>)>> {
        let txn = self.db.begin_read()?;

        let set_table = txn.open_table(WISHLIST_SET_TABLE)?;
        let set: Option<Vec<WishlistKey>> = match set_table.get(user_key)? {
            Some(guard) => Some(serde_json::from_slice(guard.value())?),
            None => None,
        };

        let list_table = txn.open_table(WISHLIST_LIST_TABLE)?;
        let list: Option<Vec<WishlistEntry>> = match list_table.get(user_key)? {
            Some(guard) => Some(serde_json::from_slice(guard.value())?),
            None => None,
        };

        match (set, list) {
            (None, None) => Ok(None),
            (set, list) => Ok(Some((set.unwrap_or_default(), list.unwrap_or_default()))),
        }
    }
}
