//! Error handling and result types for BTreeIndex operations.
//!
//! `insert` and `delete` never fail. Errors come from configuration
//! validation, invariant checking and the checked `try_*` mutations.

/// Error type for tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Occupancy limits that cannot produce a valid tree.
    InvalidConfig(String),
    /// Internal data structure integrity violation.
    DataIntegrityError(String),
    /// Arena operation failed.
    ArenaError(String),
    /// Tree corruption detected.
    CorruptedTree(String),
}

impl TreeError {
    /// Create an InvalidConfig error with context
    pub fn invalid_config(setting: &str, details: &str) -> Self {
        Self::InvalidConfig(format!("{} is invalid: {}", setting, details))
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create an ArenaError with context
    pub fn arena_error(operation: &str, details: &str) -> Self {
        Self::ArenaError(format!("{} failed: {}", operation, details))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            TreeError::DataIntegrityError(msg) => write!(f, "Data integrity error: {}", msg),
            TreeError::ArenaError(msg) => write!(f, "Arena error: {}", msg),
            TreeError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {}

/// Result type for invariant checks
pub type TreeResult<T> = Result<T, TreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, TreeError>;

/// Result type for tree construction
pub type InitResult<T> = Result<T, TreeError>;
