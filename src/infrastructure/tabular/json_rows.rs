// ============================================================
// JSON ROW-ARRAY PARSER
// ============================================================
// Structured uploads: an array of objects keyed by column name, or an
// array of arrays whose first element is the header row

use serde_json::Value;

/// Parse a JSON row array; `None` when the content has another shape
pub fn parse_json_rows(content: &str) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if !trimmed.starts_with('[') {
        return None;
    }

    let items = match serde_json::from_str::<Value>(trimmed).ok()? {
        Value::Array(items) => items,
        _ => return None,
    };

    match items.first()? {
        Value::Object(_) => parse_objects(&items),
        Value::Array(_) => parse_arrays(&items),
        _ => None,
    }
}

fn parse_objects(items: &[Value]) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let mut headers: Vec<String> = Vec::new();
    for item in items {
        let obj = item.as_object()?;
        for key in obj.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    let records = items
        .iter()
        .filter_map(|item| item.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(cell_to_string).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .filter(|cells| !is_blank(cells))
        .collect();

    Some((headers, records))
}

fn parse_arrays(items: &[Value]) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let cells = item.as_array()?;
        rows.push(cells.iter().map(cell_to_string).collect::<Vec<_>>());
    }

    let mut rows = rows.into_iter();
    let headers = rows.next()?;
    let records = rows.filter(|cells| !is_blank(cells)).collect();

    Some((headers, records))
}

fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}
