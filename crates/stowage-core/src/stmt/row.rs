use super::Value;

use indexmap::IndexMap;

/// Column (or field) name to value mapping, in insertion order.
///
/// Rows flow in both directions across the driver boundary: dumped changes
/// and filters on the way in, returned values on the way out.
pub type Row = IndexMap<String, Value>;
