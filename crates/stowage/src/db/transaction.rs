use crate::{Db, Result};

use stowage_core::{driver::operation::Transaction as TransactionOp, err, Error};

/// An open driver transaction. The handle it holds is marked as being in a
/// transaction, so writes issued through it never start another one.
pub(crate) struct Transaction {
    db: Db,
}

impl Transaction {
    pub(crate) async fn begin(db: &Db) -> Result<Transaction> {
        let tx = Transaction {
            db: Db {
                shared: db.shared.clone(),
                in_transaction: true,
            },
        };

        tx.exec(TransactionOp::Start).await?;
        Ok(tx)
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub(crate) async fn commit(self) -> Result<()> {
        self.exec(TransactionOp::Commit).await
    }

    pub(crate) async fn rollback(self) -> Result<()> {
        self.exec(TransactionOp::Rollback).await
    }

    /// Rolls back after `err` aborted the transaction. A failing rollback is
    /// reported with `err` kept as its cause.
    pub(crate) async fn abort(self, err: Error) -> Error {
        match self.rollback().await {
            Ok(()) => err,
            Err(rollback) => err.context(err!("transaction rollback failed: {rollback}")),
        }
    }

    async fn exec(&self, op: TransactionOp) -> Result<()> {
        log::debug!("transaction op={op:?}");
        self.db.driver().exec(op.into()).await?;
        Ok(())
    }
}

impl Db {
    /// Runs `f` inside a transaction, committing when it returns `Ok` and
    /// rolling back otherwise.
    ///
    /// Writes made through the handle passed to `f` join the transaction.
    /// Calling this on a handle already inside a transaction runs `f`
    /// directly.
    pub async fn transaction<O>(&self, f: impl AsyncFnOnce(&Db) -> Result<O>) -> Result<O> {
        if self.in_transaction {
            return f(self).await;
        }

        if !self.driver().capability().transactions {
            return Err(Error::invalid_argument(
                "the driver does not support transactions",
            ));
        }

        let tx = Transaction::begin(self).await?;

        match f(tx.db()).await {
            Ok(res) => {
                tx.commit().await?;
                Ok(res)
            }
            Err(err) => Err(tx.abort(err).await),
        }
    }
}
