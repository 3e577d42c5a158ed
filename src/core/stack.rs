use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::core::datum::{DataAccessor, DatumValue};
use crate::error::{ChartError, ChartResult};

/// One category with its value per layer key, ready for stacking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackRow {
    pub id: usize,
    pub category: DatumValue,
    pub values: IndexMap<String, f64>,
}

/// Cumulative extent of one layer within one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSegment {
    pub id: usize,
    pub category: DatumValue,
    pub baseline: f64,
    pub top: f64,
}

impl StackSegment {
    #[must_use]
    pub fn pair(&self) -> [f64; 2] {
        [self.baseline, self.top]
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.top - self.baseline
    }
}

/// All segments of one layer key, in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackLayer {
    pub key: String,
    pub index: usize,
    pub segments: Vec<StackSegment>,
}

/// Stacks `keys` on top of each other for every row, in key order.
///
/// Missing or non-finite values contribute zero height, so a segment with no
/// value sits on the previous layer's top.
#[must_use]
pub fn stack_layers(rows: &[StackRow], keys: &[String]) -> Vec<StackLayer> {
    let mut tops = vec![0.0; rows.len()];
    keys.iter()
        .enumerate()
        .map(|(index, key)| {
            let segments = rows
                .iter()
                .zip(tops.iter_mut())
                .map(|(row, top)| {
                    let value = row
                        .values
                        .get(key)
                        .copied()
                        .filter(|value| value.is_finite())
                        .unwrap_or(0.0);
                    let baseline = *top;
                    *top += value;
                    StackSegment {
                        id: row.id,
                        category: row.category.clone(),
                        baseline,
                        top: *top,
                    }
                })
                .collect();
            StackLayer {
                key: key.clone(),
                index,
                segments,
            }
        })
        .collect()
}

/// Field names used to flatten nested per-category records into stack rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StackFields {
    /// Category of the outer record (one stacked bar per category).
    pub stack: DataAccessor,
    /// Array of inner records on the outer record.
    pub data: String,
    /// Layer key of an inner record.
    pub layer: DataAccessor,
    /// Value of an inner record.
    pub value: DataAccessor,
}

/// Flattens `[{stack, data: [{layer, value}, ..]}, ..]` records into rows.
///
/// Row ids are assigned from the outer record index.
pub fn stack_rows_from_records(
    records: &[Value],
    fields: &StackFields,
) -> ChartResult<Vec<StackRow>> {
    records
        .iter()
        .enumerate()
        .map(|(id, record)| {
            let category = fields.stack.require(record)?;
            let inner = record
                .get(&fields.data)
                .and_then(Value::as_array)
                .ok_or_else(|| ChartError::MissingField {
                    field: fields.data.clone(),
                })?;

            let mut values = IndexMap::with_capacity(inner.len());
            for datum in inner {
                let layer = fields.layer.require(datum)?;
                let value = fields.value.require(datum)?.require_number()?;
                values.insert(layer.category_key(), value);
            }
            trace!(id, category = %category, layers = values.len(), "stack row");
            Ok(StackRow {
                id,
                category,
                values,
            })
        })
        .collect()
}

/// Builds stacked layers straight from nested records.
pub fn stacked_data_array(
    records: &[Value],
    fields: &StackFields,
    keys: &[String],
) -> ChartResult<Vec<StackLayer>> {
    let rows = stack_rows_from_records(records, fields)?;
    debug!(rows = rows.len(), keys = keys.len(), "stack records");
    Ok(stack_layers(&rows, keys))
}

/// Largest cumulative top across all layers; zero when nothing is stacked.
#[must_use]
pub fn stacked_max(layers: &[StackLayer]) -> f64 {
    layers
        .iter()
        .flat_map(|layer| layer.segments.iter())
        .map(|segment| ordered_float::OrderedFloat(segment.top.max(segment.baseline)))
        .max()
        .map_or(0.0, |max| max.0)
}

#[cfg(test)]
mod tests {
    use super::{StackFields, stacked_data_array, stacked_max};
    use crate::core::datum::{DataAccessor, DatumValue};
    use serde_json::json;

    fn fields() -> StackFields {
        StackFields {
            stack: DataAccessor::field("location"),
            data: "values".to_owned(),
            layer: DataAccessor::field("year_id"),
            value: DataAccessor::field("population"),
        }
    }

    #[test]
    fn layers_accumulate_in_key_order() {
        let records = vec![
            json!({ "location": "Brazil", "values": [
                { "year_id": 2000, "population": 10 },
                { "year_id": 2001, "population": 5 },
            ]}),
            json!({ "location": "India", "values": [
                { "year_id": 2001, "population": 7 },
            ]}),
        ];
        let keys = vec!["2000".to_owned(), "2001".to_owned()];
        let layers = stacked_data_array(&records, &fields(), &keys).expect("stack");

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].segments[0].pair(), [0.0, 10.0]);
        assert_eq!(layers[1].segments[0].pair(), [10.0, 15.0]);
        // India has no 2000 value, so its 2001 segment starts at zero.
        assert_eq!(layers[0].segments[1].pair(), [0.0, 0.0]);
        assert_eq!(layers[1].segments[1].pair(), [0.0, 7.0]);
        assert_eq!(layers[1].segments[1].id, 1);
        assert_eq!(layers[1].segments[1].category, DatumValue::from("India"));
        assert_eq!(stacked_max(&layers), 15.0);
    }

    #[test]
    fn records_without_inner_array_are_rejected() {
        let records = vec![json!({ "location": "Brazil" })];
        let err = stacked_data_array(&records, &fields(), &[]).expect_err("missing values");
        assert!(format!("{err}").contains("values"));
    }
}
