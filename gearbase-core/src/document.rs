//! Identity and record types, plus the JSON <-> BSON conversions used at the
//! edge of the store.
//!
//! Records are schemaless: apart from the store-assigned [`DocumentId`] they
//! carry an arbitrary map of JSON values supplied by the caller.

use bson::{Bson, Document, oid::ObjectId};
use chrono::SecondsFormat;
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Number, Value};
use std::{fmt, str::FromStr};

use crate::error::{StoreError, StoreResult};

/// Name of the identity field in stored documents and in JSON output.
pub const ID_FIELD: &str = "_id";

/// Store-assigned identity of a document.
///
/// Wraps a BSON [`ObjectId`]. In JSON it is rendered as a 24 character
/// lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Generates a fresh identity.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parses an identity from its hex representation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidIdentity`] if `input` is not a well-formed
    /// ObjectId (wrong length or non-hex characters).
    pub fn parse(input: &str) -> StoreResult<Self> {
        ObjectId::parse_str(input)
            .map(Self)
            .map_err(|_| StoreError::InvalidIdentity(input.to_string()))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl From<ObjectId> for DocumentId {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl From<DocumentId> for Bson {
    fn from(id: DocumentId) -> Self {
        Bson::ObjectId(id.0)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

/// A stored document: its identity plus the caller-supplied fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: DocumentId,
    fields: Map<String, Value>,
}

impl Record {
    /// Creates a record. Any `_id` entry in `fields` is discarded so the
    /// identity can only come from `id`.
    pub fn new(id: DocumentId, mut fields: Map<String, Value>) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Returns the value of a caller-supplied field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Converts the record into a flat JSON object with `_id` first.
    pub fn into_json(self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        object.insert(ID_FIELD.to_string(), Value::String(self.id.to_hex()));
        object.extend(self.fields);
        Value::Object(object)
    }

    /// Builds a record from a stored BSON document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDocument`] if the document has no
    /// ObjectId `_id` field.
    pub fn from_document(mut document: Document) -> StoreResult<Self> {
        let id = match document.remove(ID_FIELD) {
            Some(Bson::ObjectId(id)) => DocumentId::from(id),
            Some(other) => {
                return Err(StoreError::InvalidDocument(format!(
                    "expected an ObjectId {ID_FIELD}, found {other}"
                )));
            }
            None => {
                return Err(StoreError::InvalidDocument(format!(
                    "document has no {ID_FIELD} field"
                )));
            }
        };

        Ok(Self {
            id,
            fields: document_to_json_map(&document),
        })
    }

}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(ID_FIELD, &self.id)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Converts caller-supplied JSON fields into a BSON document, dropping `_id`.
pub fn fields_to_document(fields: Map<String, Value>) -> Document {
    fields
        .into_iter()
        .filter(|(key, _)| key != ID_FIELD)
        .map(|(key, value)| (key, json_to_bson(value)))
        .collect()
}

/// Converts a JSON value into BSON.
///
/// Integers that fit in 32 bits become `Int32`, other integers `Int64`, and
/// everything else numeric becomes `Double`.
pub fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(value) => Bson::Boolean(value),
        Value::Number(number) => match number.as_i64() {
            Some(value) => match i32::try_from(value) {
                Ok(small) => Bson::Int32(small),
                Err(_) => Bson::Int64(value),
            },
            None => Bson::Double(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(value) => Bson::String(value),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(object) => Bson::Document(
            object
                .into_iter()
                .map(|(key, value)| (key, json_to_bson(value)))
                .collect(),
        ),
    }
}

/// Converts a BSON value into JSON.
///
/// ObjectIds become hex strings and datetimes RFC 3339 strings. Non-finite
/// doubles become `null`; any other BSON-only type is rendered as its display
/// string.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(value) => Value::Bool(*value),
        Bson::Int32(value) => Value::from(*value),
        Bson::Int64(value) => Value::from(*value),
        Bson::Double(value) => Number::from_f64(*value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::String(value) => Value::String(value.clone()),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(document) => Value::Object(document_to_json_map(document)),
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(datetime) => Value::String(
            datetime
                .to_chrono()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        other => Value::String(other.to_string()),
    }
}

fn document_to_json_map(document: &Document) -> Map<String, Value> {
    document
        .iter()
        .map(|(key, value)| (key.clone(), bson_to_json(value)))
        .collect()
}
