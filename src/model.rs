//! Service package records and the editable draft form.
//!
//! `ServicePackage` mirrors what the backend returns; `Draft` is the text-only
//! form state used while the edit dialog is open.
//!
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque, server-assigned identifier of a service package.
///
/// The backend may send it as a string or an integer; either way it is held as text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ServiceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

/// A field value as the server sent it.
///
/// Anything that is not a number, string, bool or null is kept as raw JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
    Bool(bool),
    #[default]
    Null,
    Other(serde_json::Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => Ok(()),
            FieldValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServicePackage {
    #[serde(rename = "_id", alias = "id")]
    pub id: ServiceId,
    #[serde(default, deserialize_with = "text_or_any")]
    pub name: String,
    #[serde(default)]
    pub price: FieldValue,
    #[serde(default)]
    pub duration: FieldValue,
    #[serde(default)]
    pub accuracy: FieldValue,
}

/// Accept whatever JSON the server put in a text column and render it as text.
fn text_or_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(FieldValue::deserialize(deserializer)?.to_string())
}

/// The four editable fields of a service package, in form order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Price,
    Duration,
    Accuracy,
}

impl DraftField {
    pub const ALL: [DraftField; 4] = [
        DraftField::Name,
        DraftField::Price,
        DraftField::Duration,
        DraftField::Accuracy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Name => "Name",
            DraftField::Price => "Price",
            DraftField::Duration => "Duration",
            DraftField::Accuracy => "Accuracy",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DraftField::Name => DraftField::Price,
            DraftField::Price => DraftField::Duration,
            DraftField::Duration => DraftField::Accuracy,
            DraftField::Accuracy => DraftField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DraftField::Name => DraftField::Accuracy,
            DraftField::Price => DraftField::Name,
            DraftField::Duration => DraftField::Price,
            DraftField::Accuracy => DraftField::Duration,
        }
    }
}

/// Unvalidated form state. Serialized as-is into create/update request bodies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub name: String,
    pub price: String,
    pub duration: String,
    pub accuracy: String,
}

impl Draft {
    /// Seed a draft from an existing record, coercing every field to text.
    pub fn from_record(record: &ServicePackage) -> Self {
        Self {
            name: record.name.clone(),
            price: record.price.to_string(),
            duration: record.duration.to_string(),
            accuracy: record.accuracy.to_string(),
        }
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Price => &self.price,
            DraftField::Duration => &self.duration,
            DraftField::Accuracy => &self.accuracy,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Name => &mut self.name,
            DraftField::Price => &mut self.price,
            DraftField::Duration => &mut self.duration,
            DraftField::Accuracy => &mut self.accuracy,
        }
    }

    /// Check that the numeric fields parse as numbers.
    ///
    /// Only used when strict number checking is enabled; by default any draft is submittable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in [DraftField::Price, DraftField::Duration, DraftField::Accuracy] {
            let raw = self.field(field).trim();
            if !matches!(raw.parse::<f64>(), Ok(v) if v.is_finite()) {
                return Err(ValidationError {
                    field,
                    value: raw.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} must be a number, got {value:?}", .field.label())]
pub struct ValidationError {
    pub field: DraftField,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mongo_style_ids_and_mixed_field_types() {
        let json = r#"[
            {"_id":"65a1f","name":"Basic","price":10,"duration":"5 days","accuracy":99.5},
            {"id":42,"name":"Pro","price":"20","duration":null}
        ]"#;
        let items: Vec<ServicePackage> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].id.as_str(), "65a1f");
        assert_eq!(items[0].price.to_string(), "10");
        assert_eq!(items[0].duration.to_string(), "5 days");
        assert_eq!(items[0].accuracy.to_string(), "99.5");
        assert_eq!(items[1].id, ServiceId::new("42"));
        assert_eq!(items[1].duration, FieldValue::Null);
        assert_eq!(items[1].accuracy.to_string(), "");
    }

    #[test]
    fn odd_field_types_do_not_reject_the_list() {
        let json = r#"[
            {"_id":"a","name":null,"price":1,"duration":"2","accuracy":true,"__v":0},
            {"_id":"b","name":7,"price":[1,2],"duration":{"d":1},"accuracy":false},
            {"_id":"c","name":"Ok","price":"3","duration":"4","accuracy":"5"}
        ]"#;
        let items: Vec<ServicePackage> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "");
        assert_eq!(items[0].accuracy, FieldValue::Bool(true));
        assert_eq!(items[0].accuracy.to_string(), "true");
        assert_eq!(items[1].name, "7");
        assert_eq!(items[1].price.to_string(), "[1,2]");
        assert_eq!(items[1].duration.to_string(), r#"{"d":1}"#);
        assert_eq!(items[2].name, "Ok");

        let d = Draft::from_record(&items[0]);
        assert_eq!(d.name, "");
        assert_eq!(d.accuracy, "true");
    }

    #[test]
    fn draft_from_record_coerces_to_text() {
        let rec = ServicePackage {
            id: ServiceId::new("1"),
            name: "Gold".into(),
            price: 150i64.into(),
            duration: "30".into(),
            accuracy: FieldValue::Null,
        };
        let d = Draft::from_record(&rec);
        assert_eq!(d.name, "Gold");
        assert_eq!(d.price, "150");
        assert_eq!(d.duration, "30");
        assert_eq!(d.accuracy, "");
    }

    #[test]
    fn draft_serializes_all_fields_as_strings() {
        let d = Draft {
            name: "X".into(),
            price: "10".into(),
            duration: "5".into(),
            accuracy: "99".into(),
        };
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"name":"X","price":"10","duration":"5","accuracy":"99"})
        );
    }

    #[test]
    fn validate_rejects_non_numeric_fields() {
        let mut d = Draft {
            name: String::new(),
            price: "10".into(),
            duration: "abc".into(),
            accuracy: "99".into(),
        };
        let err = d.validate().unwrap_err();
        assert_eq!(err.field, DraftField::Duration);
        assert_eq!(err.value, "abc");

        d.duration = " 5 ".into();
        assert!(d.validate().is_ok());
    }

    #[test]
    fn field_focus_cycles() {
        let mut f = DraftField::Name;
        for _ in 0..4 {
            f = f.next();
        }
        assert_eq!(f, DraftField::Name);
        assert_eq!(DraftField::Name.prev(), DraftField::Accuracy);
    }
}
