mod capability;
pub use capability::Capability;

mod response;
pub use response::{Response, Violation};

pub mod operation;
pub use operation::Operation;

use crate::{
    async_trait,
    stmt::{Type, Value},
};

use std::fmt::Debug;

/// The storage adapter: executes write operations against a backend.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability, which informs how writes are
    /// wrapped.
    fn capability(&self) -> &Capability;

    /// Execute a database operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;

    /// Generates a key value of type `ty` before the write, when the backend
    /// has a native way to do so. `None` leaves it to the type converter, and
    /// failing that, to the backend during the write.
    fn autogenerate(&self, _ty: &Type) -> Option<Value> {
        None
    }
}
