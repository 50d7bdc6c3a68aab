use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{Filter, RecordStore, Selection, Table};
use crate::errors::{CoreError, Result};

/// In-process reference backend.
///
/// Assigns `id` and `created_at` on insert the way the hosted store does,
/// so rows round-trip through the same typed decoding as remote ones.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn select(&self, table: Table, selection: &Selection) -> Result<Vec<Value>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| CoreError::Upstream("store lock poisoned".into()))?;
        let mut rows: Vec<Value> = tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, selection.filters()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = selection.order() {
            rows.sort_by(|a, b| {
                let ordering = compare_fields(a, b, &order.field);
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        if let Some(limit) = selection.max_rows() {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn insert(&self, table: Table, row: Value) -> Result<Value> {
        let Value::Object(mut object) = row else {
            return Err(CoreError::MalformedRecord(format!(
                "insert into {} requires an object row",
                table.name()
            )));
        };
        object
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        // Stamped through serde so the text form matches service-written
        // timestamps and string comparison stays order-correct.
        object
            .entry("created_at")
            .or_insert_with(|| json!(Utc::now()));

        let row = Value::Object(object);
        let mut tables = self
            .tables
            .write()
            .map_err(|_| CoreError::Upstream("store lock poisoned".into()))?;
        tables.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    fn update(&self, table: Table, selection: &Selection, patch: Value) -> Result<Vec<Value>> {
        let Value::Object(patch) = patch else {
            return Err(CoreError::MalformedRecord(format!(
                "update of {} requires an object patch",
                table.name()
            )));
        };
        let mut tables = self
            .tables
            .write()
            .map_err(|_| CoreError::Upstream("store lock poisoned".into()))?;
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(&table) {
            for row in rows.iter_mut() {
                if !matches_all(row, selection.filters()) {
                    continue;
                }
                if let Value::Object(fields) = row {
                    for (key, value) in &patch {
                        fields.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    fn delete(&self, table: Table, selection: &Selection) -> Result<usize> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| CoreError::Upstream("store lock poisoned".into()))?;
        let Some(rows) = tables.get_mut(&table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !matches_all(row, selection.filters()));
        Ok(before - rows.len())
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| match filter {
        Filter::Eq(field, value) => row.get(field) == Some(value),
        Filter::In(field, values) => row
            .get(field)
            .is_some_and(|actual| values.iter().any(|v| v == actual)),
        Filter::Gte(field, value) => row
            .get(field)
            .is_some_and(|actual| compare_values(actual, value) != Ordering::Less),
    })
}

fn compare_fields(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(left), Some(right)) => compare_values(left, right),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l
            .as_f64()
            .partial_cmp(&r.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(l), Value::String(r)) => l.cmp(r),
        _ => Ordering::Equal,
    }
}
