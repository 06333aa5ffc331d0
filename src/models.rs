use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::path::Path;

use crate::errors::TableError;

/// A value read out of a row by a column's field accessor.
///
/// Values are totally ordered so any column can be sorted: `Null` sorts
/// first, then booleans, then numbers (ints and floats compare numerically),
/// then text.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Text(_) => 3,
        }
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) if a == b => Ordering::Equal,
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::Int(a), CellValue::Float(b)) => cmp_int_float(*a, *b),
            (CellValue::Float(a), CellValue::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Exact comparison of an integer against a float.
///
/// Casting the int to `f64` rounds above 2^53, so compare integer parts in
/// `i128` and let the fraction break ties. NaN sits where `total_cmp` puts it:
/// negative NaN below everything, positive NaN above.
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float.is_infinite() {
        return if float > 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    let floor = float.floor();
    // `as` saturates, and i128 covers every i64 with room to spare
    match i128::from(int).cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Ordering::Less,
        ordering => ordering,
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => CellValue::Text(s),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// A record that can be shown in a [`DataTable`](crate::components::DataTable).
///
/// The table only ever looks at the row's identifier and at the fields its
/// columns name; everything else about the row is opaque.
pub trait TableRow {
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// Stable, unique key of this row
    fn id(&self) -> Self::Id;

    /// Read the named field, `None` if the row has no such field
    fn field(&self, name: &str) -> Option<CellValue>;
}

/// Caller-supplied description of one displayed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Unique key of the column
    pub key: String,
    /// Header label
    pub title: String,
    /// Name of the row field this column reads
    pub field: String,
    pub sortable: bool,
}

impl Column {
    pub fn new(key: &str, title: &str, field: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            field: field.to_string(),
            sortable: false,
        }
    }

    /// Column whose key and field share a name, titled after it
    pub fn for_field(field: &str) -> Self {
        Self::new(field, &title_case(field), field)
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }
}

/// Turn `first_name` or `email` into `First Name` / `Email`
fn title_case(field: &str) -> String {
    field
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Identifier of a generic [`Record`], either numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<RecordId> for CellValue {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Number(n) => CellValue::Int(n),
            RecordId::Text(s) => CellValue::Text(s),
        }
    }
}

/// Schemaless row loaded from JSON: an `id` plus named fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub fields: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<CellValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Field names other than `id`, in sorted order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Wire shape of a record: an `id` plus any other keys
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: RecordId,
    #[serde(flatten)]
    fields: BTreeMap<String, serde_json::Value>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        let fields = raw
            .fields
            .into_iter()
            .map(|(name, value)| (name, CellValue::from(value)))
            .collect();
        Self { id: raw.id, fields }
    }
}

impl TableRow for Record {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<CellValue> {
        if name == "id" {
            return Some(self.id.clone().into());
        }
        self.fields.get(name).cloned()
    }
}

/// Parse a JSON array of objects into records
pub fn parse_records(json: &str) -> Result<Vec<Record>, TableError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<RawRecord>(value)
                .map(Record::from)
                .map_err(|e| TableError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Load records from a JSON file
pub fn load_records(path: &Path) -> Result<Vec<Record>, TableError> {
    let json = std::fs::read_to_string(path)?;
    parse_records(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cell_value_ordering() {
        assert!(CellValue::Null < CellValue::Bool(false));
        assert!(CellValue::Bool(true) < CellValue::Int(-5));
        assert!(CellValue::Int(2) < CellValue::Float(2.5));
        assert!(CellValue::Float(10.0) < CellValue::Text("1".into()));
        assert!(CellValue::from("Jane Smith") < CellValue::from("John Doe"));
        assert_eq!(CellValue::Int(3), CellValue::Float(3.0));
    }

    #[test]
    fn test_int_float_ordering_is_exact_past_f64_precision() {
        let big = 1_i64 << 53;
        let above = CellValue::Int(big + 1);
        let float = CellValue::Float(big as f64);
        let exact = CellValue::Int(big);

        assert!(above > float);
        assert_eq!(float, exact);
        assert!(above > exact);

        let mut forward = vec![above.clone(), float.clone(), exact.clone()];
        let mut backward = vec![exact.clone(), float.clone(), above.clone()];
        forward.sort();
        backward.sort();
        assert!(matches!(forward[2], CellValue::Int(n) if n == big + 1));
        assert!(matches!(backward[2], CellValue::Int(n) if n == big + 1));
    }

    #[test]
    fn test_int_float_edges() {
        assert!(CellValue::Int(2) < CellValue::Float(2.5));
        assert!(CellValue::Int(-3) < CellValue::Float(-2.5));
        assert!(CellValue::Int(-2) > CellValue::Float(-2.5));
        assert!(CellValue::Int(i64::MAX) < CellValue::Float(f64::INFINITY));
        assert!(CellValue::Int(i64::MIN) > CellValue::Float(f64::NEG_INFINITY));
        assert!(CellValue::Int(i64::MAX) < CellValue::Float(1e300));
        assert!(CellValue::Int(0) < CellValue::Float(f64::NAN));
        assert_eq!(CellValue::Int(0), CellValue::Float(-0.0));
        assert_eq!(CellValue::Float(0.0), CellValue::Float(-0.0));
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(CellValue::Float(2.0).to_string(), "2");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_column_builders() {
        let col = Column::new("name", "Name", "name").sortable();
        assert!(col.sortable);
        let col = Column::for_field("first_name");
        assert_eq!(col.title, "First Name");
        assert_eq!(col.key, "first_name");
        assert!(!col.sortable);
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records(
            r#"[{"id": 1, "name": "John Doe", "age": 41},
                {"id": "u-2", "name": "Jane Smith", "tags": ["a"]}]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), RecordId::Number(1));
        assert_eq!(records[0].field("age"), Some(CellValue::Int(41)));
        assert_eq!(records[0].field("id"), Some(CellValue::Int(1)));
        assert_eq!(records[1].id(), RecordId::Text("u-2".to_string()));
        assert_eq!(records[1].field("tags"), Some(CellValue::from(r#"["a"]"#)));
        assert_eq!(records[1].field("age"), None);
    }

    #[test]
    fn test_parse_records_rejects_missing_id() {
        let err = parse_records(r#"[{"id": 1}, {"name": "no id"}]"#).unwrap_err();
        assert!(matches!(err, TableError::InvalidRecord { index: 1, .. }));

        let err = parse_records(r#"[3]"#).unwrap_err();
        assert!(matches!(err, TableError::InvalidRecord { index: 0, .. }));

        let err = parse_records(r#"[{"id": 1}, {"id": 2}, {"id": 1.5}]"#).unwrap_err();
        assert!(matches!(err, TableError::InvalidRecord { index: 2, .. }));

        let err = parse_records(r#"[{"id": null}]"#).unwrap_err();
        assert!(matches!(err, TableError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn test_load_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 7, "email": "john@example.com"}}]"#).unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field_names().collect::<Vec<_>>(), vec!["email"]);
    }
}
