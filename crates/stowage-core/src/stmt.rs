mod row;
pub use row::Row;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
