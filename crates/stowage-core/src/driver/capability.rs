#[derive(Debug)]
pub struct Capability {
    /// When true, the driver honors `Transaction` operations. Writes that
    /// touch associations or run prepare hooks are then wrapped in one.
    pub transactions: bool,
}

impl Capability {
    /// Relational databases.
    pub const SQL: Self = Self { transactions: true };

    /// Key-value stores without multi-statement transactions.
    pub const KEY_VALUE: Self = Self {
        transactions: false,
    };
}
