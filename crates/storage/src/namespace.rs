//! Database/collection namespace

/// Namespace of a collection: `<database>.<collection>`
///
/// Different namespaces live in different shards and never contend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
    /// Database name
    pub database: String,
    /// Collection name
    pub collection: String,
}

impl Namespace {
    /// Create a namespace
    ///
    /// # Examples
    ///
    /// ```
    /// use contend_storage::Namespace;
    ///
    /// let ns = Namespace::new("enact", "test-write-conflict");
    /// assert_eq!(ns.to_string(), "enact.test-write-conflict");
    /// ```
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}
