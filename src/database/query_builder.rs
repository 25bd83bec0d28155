use serde_json::{Map, Value};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};

use crate::database::manager::DatabaseError;
use crate::filter::types::SqlResult;

pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Prepare `sql` with every parameter bound in order.
///
/// Refuses to build a statement whose placeholder count differs from the
/// number of values, rather than letting the driver bind NULLs or drop extras.
pub fn build_query(sql: &SqlResult) -> Result<SqliteQuery<'_>, DatabaseError> {
    let placeholders = sql.placeholder_count();
    if placeholders != sql.params.len() {
        return Err(DatabaseError::ParamMismatch {
            placeholders,
            params: sql.params.len(),
        });
    }

    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_param(q, p)?;
    }
    Ok(q)
}

fn bind_param<'q>(q: SqliteQuery<'q>, v: &Value) -> Result<SqliteQuery<'q>, DatabaseError> {
    Ok(match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                return Err(DatabaseError::UnsupportedParam(n.to_string()));
            }
        }
        Value::String(s) => q.bind(s.clone()),
        // Lists must be expanded into one placeholder per element upstream
        Value::Array(_) | Value::Object(_) => {
            return Err(DatabaseError::UnsupportedParam(v.to_string()));
        }
    })
}

/// Convert a row into a JSON object keyed by column name, using the runtime
/// SQLite type of each value.
pub fn row_to_json(row: &SqliteRow) -> Result<Value, DatabaseError> {
    let mut map = Map::new();
    for column in row.columns() {
        let i = column.ordinal();
        let raw = row.try_get_raw(i)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(i)?),
                "REAL" | "NUMERIC" => Value::from(row.try_get::<f64, _>(i)?),
                "BLOB" => {
                    let bytes = row.try_get::<Vec<u8>, _>(i)?;
                    Value::from(String::from_utf8_lossy(&bytes).into_owned())
                }
                _ => Value::from(row.try_get::<String, _>(i)?),
            }
        };
        map.insert(column.name().to_string(), value);
    }
    Ok(Value::Object(map))
}
