mod delete;
pub use delete::Delete;

mod insert;
pub use insert::Insert;

mod insert_all;
pub use insert_all::InsertAll;

mod transaction;
pub use transaction::Transaction;

mod update;
pub use update::Update;

use super::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create a single record
    Insert(Insert),

    /// Update the records matching the filters
    Update(Update),

    /// Delete the records matching the filters
    Delete(Delete),

    /// Create a batch of records sharing one column list
    InsertAll(InsertAll),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert(_))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete(_))
    }

    pub fn is_insert_all(&self) -> bool {
        matches!(self, Self::InsertAll(_))
    }

    pub fn is_transaction(&self) -> bool {
        matches!(self, Self::Transaction(_))
    }
}
