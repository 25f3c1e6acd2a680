use crate::mock_driver::State;
use std::sync::{Arc, Mutex};
use stowage_core::driver::{operation::Transaction, Operation};

/// A wrapper around the operations log that provides a clean API for tests
#[derive(Debug, Clone)]
pub struct ExecLog {
    state: Arc<Mutex<State>>,
}

impl ExecLog {
    pub(crate) fn new(state: Arc<Mutex<State>>) -> Self {
        Self { state }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().ops.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().ops.is_empty()
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.state
            .lock()
            .unwrap()
            .ops
            .iter()
            .filter(|op| predicate(&op.operation))
            .count()
    }

    /// Number of writes, transaction ops excluded
    pub fn writes(&self) -> usize {
        self.count(|op| !op.is_transaction())
    }

    /// One line per operation, e.g. `insert users` or `commit`, in
    /// execution order
    pub fn sequence(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .ops
            .iter()
            .map(|op| describe(&op.operation))
            .collect()
    }

    /// All logged operations, in execution order
    pub fn operations(&self) -> Vec<Operation> {
        self.state
            .lock()
            .unwrap()
            .ops
            .iter()
            .map(|op| op.operation.clone())
            .collect()
    }

    /// Clear the log
    pub fn clear(&self) {
        self.state.lock().unwrap().ops.clear();
    }

    /// Number of operations the driver answered with an error
    pub fn failures(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .ops
            .iter()
            .filter(|op| op.response.is_err())
            .count()
    }

    /// Remove and return the first write, skipping transaction ops
    pub fn pop_write(&self) -> Option<Operation> {
        let mut state = self.state.lock().unwrap();
        let index = state
            .ops
            .iter()
            .position(|op| !op.operation.is_transaction())?;
        Some(state.ops.remove(index).operation)
    }
}

fn describe(op: &Operation) -> String {
    match op {
        Operation::Insert(op) => format!("insert {}", op.source),
        Operation::Update(op) => format!("update {}", op.source),
        Operation::Delete(op) => format!("delete {}", op.source),
        Operation::InsertAll(op) => format!("insert_all {}", op.source),
        Operation::Transaction(Transaction::Start) => "start".to_string(),
        Operation::Transaction(Transaction::Commit) => "commit".to_string(),
        Operation::Transaction(Transaction::Rollback) => "rollback".to_string(),
    }
}
