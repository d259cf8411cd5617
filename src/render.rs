use crate::error::OntoviewError;
use serde_json::{json, Map, Value};
use std::io::Write;
use tabwriter::TabWriter;

///Render rows in the named format: `text`, `csv`, `json` or `pretty.json`.
pub fn render(rows: &[Map<String, Value>], format: &str) -> Result<String, OntoviewError> {
    match format {
        "text" => rows_to_text(rows),
        "csv" => rows_to_csv(rows),
        "json" => Ok(rows_to_json(rows)),
        "pretty.json" => Ok(serde_json::to_string_pretty(&json!(rows))?),
        _ => Err(OntoviewError::General(format!(
            "Unsupported format '{}'",
            format
        ))),
    }
}

///Render rows as a header line plus one line per row, aligned with
///elastic tabstops. Empty input renders as the empty string.
pub fn rows_to_text(rows: &[Map<String, Value>]) -> Result<String, OntoviewError> {
    let mut lines: Vec<String> = vec![];
    match rows.first() {
        Some(first) => lines.push(first.keys().cloned().collect::<Vec<String>>().join("\t")),
        None => return Ok(String::new()),
    }
    for row in rows {
        let line: Vec<String> = row.values().map(cell_to_string).collect();
        lines.push(line.join("\t"));
    }

    //format using elastic tabstops
    let mut tw = TabWriter::new(vec![]);
    write!(&mut tw, "{}", lines.join("\n"))?;
    tw.flush()?;
    let bytes = tw
        .into_inner()
        .map_err(|e| OntoviewError::General(format!("{:?}", e)))?;

    Ok(String::from_utf8_lossy(&bytes).to_string())
}

///Render rows as CSV with a header record, columns in row order.
pub fn rows_to_csv(rows: &[Map<String, Value>]) -> Result<String, OntoviewError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    if let Some(first) = rows.first() {
        writer.write_record(first.keys())?;
        for row in rows {
            writer.write_record(row.values().map(cell_to_string))?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| OntoviewError::General(format!("{:?}", e)))?;

    Ok(String::from_utf8_lossy(&bytes).to_string())
}

pub fn rows_to_json(rows: &[Map<String, Value>]) -> String {
    json!(rows).to_string()
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
