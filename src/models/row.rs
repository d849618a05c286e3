use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Logical columns the validator looks for in an uploaded row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Field {
    Date,
    Source,
    Item,
    Robux,
    AdSpend
}

impl Field {
    /// Header names that identify the field outright (compared case-insensitively).
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Date => &["date"],
            Field::Source => &["source"],
            Field::Item => &["item", "item name", "item_name"],
            Field::Robux => &["robux"],
            Field::AdSpend => &["adspend"]
        }
    }

    /// Fragment accepted anywhere inside a header when no alias matched.
    fn fragment(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Source => "source",
            Field::Item => "item",
            Field::Robux => "robux",
            Field::AdSpend => "adspend"
        }
    }

    fn normalize(&self, header: &str) -> String {
        let lowered = header.trim().to_lowercase();

        //NOTE: Ad spend shows up as `AdSpend`, `adSpend`, `Ad Spend` and `ad_spend`, so only letters and digits count.
        match self {
            Field::AdSpend => lowered.chars().filter(|c| c.is_ascii_alphanumeric()).collect(),
            _ => lowered
        }
    }
}

/// One untyped CSV record as delivered by a client-side parser: column name to string or number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(Map<String, Value>);

impl RawRow {
    pub fn new() -> Self {
        RawRow(Map::new())
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the trimmed text of a logical field, or `None` when it is absent or blank.
    ///
    /// Exact alias matches win over headers that merely contain the field name, so a row with
    /// both `Date` and `Upload Date` columns reads `Date`.
    pub fn field(&self, field: Field) -> Option<String> {
        let exact = self.0.iter()
            .filter(|(header, _)| field.aliases().contains(&field.normalize(header).as_str()));

        let partial = self.0.iter()
            .filter(|(header, _)| field.normalize(header).contains(field.fragment()));

        exact.chain(partial).find_map(|(_, value)| value_text(value))
    }
}

impl From<Map<String, Value>> for RawRow {
    fn from(map: Map<String, Value>) -> Self {
        RawRow(map)
    }
}

//NOTE: Anything but an object becomes an empty row, which the validator rejects as missing fields.
impl From<Value> for RawRow {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(columns) => RawRow(columns),
            _ => RawRow::new()
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = RawRow::new();

        for (column, value) in iter {
            row.insert(column, value);
        }

        row
    }
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number_text(number)?,
        _ => return None
    };

    if text.is_empty() { None } else { Some(text) }
}


//NOTE: `Number` prints large and tiny floats in exponent form; `f64` display always writes plain digits.
fn number_text(number: &Number) -> Option<String> {
    number.as_i64().map(|value| value.to_string())
        .or_else(|| number.as_u64().map(|value| value.to_string()))
        .or_else(|| number.as_f64().map(|value| value.to_string()))
}
