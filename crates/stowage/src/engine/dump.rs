use stowage_core::{
    changeset::Change,
    entity::Entity,
    schema::{Field, Model},
    stmt::{Row, Value},
    Error, Result, TypeConverter,
};

use indexmap::IndexMap;

/// Dumps the plain value changes into a row keyed by column. Association
/// changes are skipped; they are resolved separately.
pub(super) fn changes(
    converter: &dyn TypeConverter,
    model: &Model,
    changes: &IndexMap<String, Change>,
) -> Result<Row> {
    let mut row = Row::new();

    for (name, change) in changes {
        let Change::Value(value) = change else {
            continue;
        };

        row.insert(
            column(model, name)?.to_string(),
            self::value(converter, model, name, value)?,
        );
    }

    Ok(row)
}

/// Dumps the value of `model.field`.
pub(super) fn value(
    converter: &dyn TypeConverter,
    model: &Model,
    field: &str,
    value: &Value,
) -> Result<Value> {
    let field = primitive(model, field)?;
    let Some(ty) = field.ty.as_primitive() else {
        return Err(not_primitive(model, field.name()));
    };

    converter.dump(&ty, value).map_err(|cause| {
        cause.context(Error::type_mismatch(
            format!("{}.{}", model.name, field.name()),
            ty,
            value,
        ))
    })
}

/// Storage column of a primitive field.
pub(super) fn column<'a>(model: &'a Model, field: &str) -> Result<&'a str> {
    Ok(primitive(model, field)?.column_name())
}

/// Applies the plain value changes to the record.
pub(super) fn apply_changes(entity: &mut Entity, changes: &IndexMap<String, Change>) {
    for (name, change) in changes {
        if let Change::Value(value) = change {
            entity.set(name.clone(), value.clone());
        }
    }
}

/// Loads a row returned by the driver into the record.
pub(super) fn load_row(
    converter: &dyn TypeConverter,
    model: &Model,
    entity: &mut Entity,
    row: Row,
) -> Result<()> {
    for (field, value) in load(converter, model, row)? {
        entity.set(field, value);
    }

    Ok(())
}

/// Decodes a returned row, re-keying it by field name.
pub(super) fn load(converter: &dyn TypeConverter, model: &Model, row: Row) -> Result<Row> {
    let mut loaded = Row::new();

    for (column, value) in row {
        let Some(field) = model.field_by_column(&column) else {
            return Err(Error::invalid_result(format!(
                "driver returned unknown column `{column}` for `{}`",
                model.name
            )));
        };

        let Some(ty) = field.ty.as_primitive() else {
            return Err(not_primitive(model, field.name()));
        };

        let value = converter.load(&ty, &value).map_err(|cause| {
            cause.context(Error::type_mismatch(
                format!("{}.{}", model.name, field.name()),
                ty,
                &value,
            ))
        })?;

        loaded.insert(field.name().to_string(), value);
    }

    Ok(loaded)
}

fn primitive<'a>(model: &'a Model, name: &str) -> Result<&'a Field> {
    match model.field(name) {
        Some(field) if field.ty.is_primitive() => Ok(field),
        Some(field) => Err(not_primitive(model, field.name())),
        None => Err(Error::invalid_argument(format!(
            "`{}` has no field `{name}`",
            model.name
        ))),
    }
}

fn not_primitive(model: &Model, field: &str) -> Error {
    Error::invalid_argument(format!(
        "`{}.{field}` is an association, not a value field",
        model.name
    ))
}
