use crate::foundation::database::{StoreError, UserRecord};
use sled::{Db, Tree};
use tracing::debug;

/// Read access to the subscriber table.
#[cfg_attr(test, mockall::automock)]
pub trait UserStore {
    /// Returns every user record in the table.
    fn get_users(&self) -> Result<Vec<UserRecord>, StoreError>;
}

/// Opens a database at the specified path.
///
/// This function creates a new database or opens an existing one at the given path.
///
/// # Examples
///
/// ```no_run
/// use newmusic::open_database;
/// let db = open_database("/path/to/my/database")?;
/// # Ok::<(), newmusic::StoreError>(())
/// ```
pub fn open_database(path: &str) -> Result<Db, StoreError> {
    Ok(sled::open(path)?)
}

/// A sled tree used as the user favorites table.
///
/// Each entry maps the user's email to a bincode-encoded [`UserRecord`].
pub struct SledUserStore {
    tree: Tree,
}

impl SledUserStore {
    /// Opens the table named `table` inside an already opened database.
    pub fn from_db(db: &Db, table: &str) -> Result<Self, StoreError> {
        Ok(Self {
            tree: db.open_tree(table)?,
        })
    }

    /// Opens the database at `path` and the table named `table` inside it.
    pub fn open(path: &str, table: &str) -> Result<Self, StoreError> {
        let db = open_database(path)?;
        Self::from_db(&db, table)
    }

    /// Inserts or replaces the record stored under `record.email`.
    ///
    /// The digest run never calls this; it backs the `users add` command.
    pub fn store_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        let serialized =
            bincode::serialize(record).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.tree.insert(record.email.as_bytes(), serialized)?;
        self.tree.flush()?;
        Ok(())
    }
}

impl UserStore for SledUserStore {
    /// Full scan of the table. No filtering and no paging: every record is
    /// loaded in one pass.
    fn get_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut users = Vec::new();

        for entry in self.tree.iter() {
            let (key, value) = entry?;
            let record: UserRecord =
                bincode::deserialize(&value).map_err(|e| StoreError::Corrupt {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    message: e.to_string(),
                })?;
            users.push(record);
        }

        debug!(count = users.len(), "scanned user table");
        Ok(users)
    }
}
