use super::{dump, Engine};
use crate::{InsertAllOptions, Returning, Target};

use stowage_core::{
    driver::{operation, Response},
    schema::Model,
    stmt::Row,
    Error, Result,
};

use indexmap::IndexSet;

impl Engine {
    /// Writes a batch of rows in one driver call.
    ///
    /// With a model target each row is keyed by field name and dumped; with
    /// a bare source rows are passed through as given. The header is the
    /// union of the columns present across rows, in first-seen order.
    pub(crate) async fn insert_all(
        &self,
        target: Target,
        rows: Vec<Row>,
        options: &InsertAllOptions,
    ) -> Result<(u64, Option<Vec<Row>>)> {
        let (model, base) = match &target {
            Target::Model(id) => {
                let model = self.model(*id)?;
                (Some(model), &model.source)
            }
            Target::Source(source) => (None, source),
        };

        let returning = self.insert_all_returning(model, &options.returning)?;

        if rows.is_empty() {
            return Ok((0, returning.map(|_| vec![])));
        }

        let prefix = options
            .prefix
            .as_deref()
            .or(base.prefix.as_deref())
            .or(self.db.default_prefix());
        let source = base.prefixed(prefix);

        let mut header = IndexSet::new();
        let mut dumped = Vec::with_capacity(rows.len());

        for row in rows {
            let row = match model {
                Some(model) => self.dump_row(model, row)?,
                None => row,
            };

            header.extend(row.keys().cloned());
            dumped.push(row);
        }

        let rows = dumped
            .iter()
            .map(|row| header.iter().map(|column| row.get(column).cloned()).collect())
            .collect();

        let op = operation::InsertAll {
            source: source.clone(),
            header: header.into_iter().collect(),
            rows,
            returning: returning.clone(),
        };

        let (count, returned) = match self.exec(op).await? {
            Response::Rows { count, rows } => (count, rows),
            Response::ConstraintViolation(violations) => {
                let violation = violations.first().ok_or_else(|| {
                    Error::invalid_result("driver reported an empty constraint violation")
                })?;
                return Err(Error::unmapped_constraint(violation.kind, &violation.name));
            }
            other => {
                return Err(Error::invalid_result(format!(
                    "unexpected response to insert_all into `{source}`: {other:?}"
                )))
            }
        };

        let returned = match (returning, returned, model) {
            (None, _, _) => None,
            (Some(_), None, _) => Some(vec![]),
            (Some(_), Some(rows), Some(model)) => Some(
                rows.into_iter()
                    .map(|row| dump::load(self.converter(), model, row))
                    .collect::<Result<_>>()?,
            ),
            (Some(_), Some(rows), None) => Some(rows),
        };

        Ok((count, returned))
    }

    /// Keys a row by column and dumps its values, filling in the
    /// autogenerated key when it can be produced up front.
    fn dump_row(&self, model: &Model, mut row: Row) -> Result<Row> {
        self.autogenerate_row_id(model, &mut row);

        let mut dumped = Row::new();

        for (name, value) in &row {
            dumped.insert(
                dump::column(model, name)?.to_string(),
                dump::value(self.converter(), model, name, value)?,
            );
        }

        Ok(dumped)
    }

    fn insert_all_returning(
        &self,
        model: Option<&Model>,
        returning: &Returning,
    ) -> Result<Option<Vec<String>>> {
        match (returning, model) {
            (Returning::Nothing, _) => Ok(None),
            (Returning::All, Some(model)) => Ok(Some(
                model
                    .primitives()
                    .map(|field| field.column_name().to_string())
                    .collect(),
            )),
            (Returning::All, None) => Err(Error::invalid_argument(
                "`Returning::All` requires a registered model",
            )),
            (Returning::Fields(fields), _) if fields.is_empty() => Err(Error::invalid_argument(
                "`returning` expects at least one field",
            )),
            (Returning::Fields(fields), Some(model)) => fields
                .iter()
                .map(|field| dump::column(model, field).map(str::to_string))
                .collect::<Result<Vec<_>>>()
                .map(Some),
            (Returning::Fields(fields), None) => Ok(Some(fields.clone())),
        }
    }
}
