use super::{Engine, Nesting, Outcome};
use crate::db::Transaction;

use log::debug;
use std::future::Future;

impl Engine {
    /// Decides whether a write is wrapped in a transaction. `structural` is
    /// whether the write touches associations or runs prepare hooks.
    pub(super) fn wraps(&self, nesting: Nesting, structural: bool) -> bool {
        structural
            && nesting == Nesting::Root
            && !self.db.in_transaction()
            && self.db.driver().capability().transactions
    }

    /// Runs `body`, inside a transaction when `wrap` is set. Any error, and
    /// any changeset handed back as invalid, rolls the transaction back.
    pub(super) async fn transaction(
        &self,
        wrap: bool,
        body: impl Future<Output = Outcome> + Send,
    ) -> Outcome {
        if !wrap {
            return body.await;
        }

        let tx = Transaction::begin(&self.db).await?;

        match body.await {
            Ok(Ok(entity)) => {
                tx.commit().await?;
                Ok(Ok(entity))
            }
            Ok(Err(changeset)) => {
                debug!("rolling back; changeset is invalid");
                tx.rollback().await?;
                Ok(Err(changeset))
            }
            Err(err) => {
                debug!("rolling back; err={err}");
                Err(tx.abort(err).await)
            }
        }
    }
}
