// MongoDB query builder — converts store-level filters into BSON documents and
// BSON documents back into JSON maps.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};

use mongo_auth_core::db::store::{WhereClause, ID_FIELD};

/// Convert equality clauses to a MongoDB filter document (implicit AND).
pub fn build_filter(clauses: &[WhereClause]) -> Document {
    let mut filter = Document::new();
    for clause in clauses {
        filter.insert(clause.field.clone(), json_to_bson(&clause.value));
    }
    filter
}

/// Primary-key filter for a string identifier.
///
/// The identifier is the stringified form of whatever type `_id` was stored
/// with, so the filter matches every BSON value that stringifies back to it:
/// the string itself, an `ObjectId` for 24-hex input, and integer keys.
pub fn id_filter(id: &str) -> Document {
    doc! { ID_FIELD: { "$in": id_candidates(id) } }
}

/// BSON values whose stringified form is `id`.
pub fn id_candidates(id: &str) -> Vec<Bson> {
    let mut candidates = vec![Bson::String(id.to_string())];
    if let Ok(oid) = ObjectId::parse_str(id) {
        candidates.push(Bson::ObjectId(oid));
    }
    // Only canonical integers: "042" or "+42" never came from a numeric key.
    if let Ok(n) = id.parse::<i64>() {
        if n.to_string() == id {
            if let Ok(small) = i32::try_from(n) {
                candidates.push(Bson::Int32(small));
            }
            candidates.push(Bson::Int64(n));
        }
    }
    candidates
}

/// Single-field `$set` update document.
pub fn build_set_doc(field: &str, value: &serde_json::Value) -> Document {
    doc! { "$set": { field: json_to_bson(value) } }
}

/// Convert serde_json::Value to MongoDB BSON.
pub fn json_to_bson(v: &serde_json::Value) -> Bson {
    match v {
        serde_json::Value::Null => Bson::Null,
        serde_json::Value::Bool(b) => Bson::Boolean(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Bson::Int64(i)
            } else if let Some(f) = n.as_f64() {
                Bson::Double(f)
            } else {
                Bson::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Bson::String(s.clone()),
        serde_json::Value::Array(arr) => Bson::Array(arr.iter().map(json_to_bson).collect()),
        serde_json::Value::Object(map) => {
            let mut doc = Document::new();
            for (k, v) in map {
                doc.insert(k.clone(), json_to_bson(v));
            }
            Bson::Document(doc)
        }
    }
}

/// Convert BSON to serde_json::Value.
///
/// `ObjectId` becomes its hex string; types without a plain JSON form fall
/// back to relaxed extended JSON so no stored value is dropped.
pub fn bson_to_json(b: &Bson) -> serde_json::Value {
    match b {
        Bson::Null => serde_json::Value::Null,
        Bson::Boolean(b) => serde_json::json!(*b),
        Bson::Int32(i) => serde_json::json!(*i),
        Bson::Int64(i) => serde_json::json!(*i),
        Bson::Double(f) => serde_json::json!(*f),
        Bson::String(s) => serde_json::json!(s),
        Bson::ObjectId(oid) => serde_json::json!(oid.to_hex()),
        Bson::Array(arr) => serde_json::Value::Array(arr.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => serde_json::Value::Object(doc_to_json(doc)),
        Bson::DateTime(dt) => serde_json::json!(dt.timestamp_millis()),
        other => other.clone().into_relaxed_extjson(),
    }
}

/// Convert a MongoDB Document to a JSON map. `_id` is kept under its own name.
pub fn doc_to_json(doc: &Document) -> serde_json::Map<String, serde_json::Value> {
    doc.iter()
        .map(|(k, v)| (k.clone(), bson_to_json(v)))
        .collect()
}
