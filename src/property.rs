use crate::model::label_from_iri;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

pub static PROPERTY: &str = "Property";
pub static TYPE: &str = "Type";
pub static RANGE: &str = "Range";
pub static MAX_CARDINALITY: &str = "Max Cardinality";
pub static SOME_VALUES_FROM: &str = "Some Values From";

/// One class-owned property as the service returns it. `max` and `some`
/// are qualifiers that only restricted properties carry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default)]
    pub prop: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub max: Option<Value>,
    #[serde(default)]
    pub some: Option<String>,
}

/// The reduced per-property view the graph builder works with.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySummary {
    pub property: String,
    pub range: String,
    pub kind: String,
}

///Given an IRI and the namespace-prefix table, return its compact form:
///the substring up to and including the last `#` is looked up in the table
///and replaced by `prefix:`. Values without a `#`, or with an unknown
///namespace, pass through unchanged.
pub fn compact_iri(value: &str, prefixes: &HashMap<String, String>) -> String {
    match value.rsplit_once('#') {
        Some((namespace, fragment)) => {
            let namespace = format!("{}#", namespace);
            match prefixes.get(&namespace) {
                Some(prefix) => format!("{}:{}", prefix, fragment),
                None => String::from(value),
            }
        }
        None => String::from(value),
    }
}

///Given raw property records, return compacted table rows with columns
///{Property, Type, Range}. The qualifier columns Max Cardinality and
///Some Values From are only present when at least one record carries the
///qualifier; absent values render as the empty string.
pub fn property_table(
    records: &[PropertyRecord],
    prefixes: &HashMap<String, String>,
) -> Vec<Map<String, Value>> {
    let has_max = records.iter().any(|record| record.max.is_some());
    let has_some = records.iter().any(|record| record.some.is_some());

    records
        .iter()
        .map(|record| {
            let mut row = Map::new();
            row.insert(
                String::from(PROPERTY),
                json!(compact_iri(&record.prop, prefixes)),
            );
            row.insert(
                String::from(TYPE),
                json!(compact_iri(&record.kind, prefixes)),
            );
            row.insert(
                String::from(RANGE),
                json!(compact_iri(&record.range, prefixes)),
            );
            if has_max {
                let max = match &record.max {
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                row.insert(String::from(MAX_CARDINALITY), json!(max));
            }
            if has_some {
                let some = match &record.some {
                    Some(value) => compact_iri(value, prefixes),
                    None => String::new(),
                };
                row.insert(String::from(SOME_VALUES_FROM), json!(some));
            }
            row
        })
        .collect()
}

///Given raw property records, return the flat summaries the graph builder
///consumes. The kind is the lowercased fragment of the property-kind IRI,
///e.g. `datatypeproperty` or `objectproperty`.
pub fn summarize(records: &[PropertyRecord]) -> Vec<PropertySummary> {
    records
        .iter()
        .map(|record| PropertySummary {
            property: record.prop.clone(),
            range: record.range.clone(),
            kind: label_from_iri(&record.kind).to_lowercase(),
        })
        .collect()
}
