pub mod changeset;
pub use changeset::Changeset;

pub mod convert;
pub use convert::TypeConverter;

pub mod driver;
pub use driver::Driver;

pub mod entity;
pub use entity::Entity;

mod error;
pub use error::Error;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

/// A Result type alias that uses Stowage's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
