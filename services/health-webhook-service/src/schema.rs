//! Explicit schema for inbound health submissions.
//!
//! Each record is described by an [`ObjectSchema`] listing its fields in wire
//! order. [`validate`] walks a JSON document against a schema and collects
//! every violation instead of stopping at the first one. Only presence and
//! primitive types are checked; categorical fields such as species or stage
//! are plain text.

use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Value};

const BODY: &str = "body";

const MODEL_MISMATCH: (&str, &str) = (
    "model_attributes_type",
    "Input should be a valid dictionary or object to extract fields from",
);

#[derive(Clone, Copy)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Object(&'static ObjectSchema),
}

impl FieldKind {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Integer => as_whole_i64(value).is_some(),
            FieldKind::Float => value.is_number(),
            FieldKind::Object(_) => value.is_object(),
        }
    }

    fn mismatch(&self) -> (&'static str, &'static str) {
        match self {
            FieldKind::Text => ("string_type", "Input should be a valid string"),
            FieldKind::Integer => ("int_type", "Input should be a valid integer"),
            FieldKind::Float => ("float_type", "Input should be a valid number"),
            FieldKind::Object(_) => MODEL_MISMATCH,
        }
    }

    fn json_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "number",
            FieldKind::Object(_) => "object",
        }
    }
}

/// Integers, or floats with no fractional part that fit in an i64.
fn as_whole_i64(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    let float = value.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}

pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
    pub example: Option<&'static str>,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
            example: None,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
            example: None,
        }
    }

    /// Example values are kept as JSON literals so numbers stay numbers.
    const fn example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }
}

pub struct ObjectSchema {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

pub static PET_INFO: ObjectSchema = ObjectSchema {
    title: "PetInfo",
    fields: &[
        FieldSpec::required("name", FieldKind::Text, "Pet name").example("\"복실이\""),
        FieldSpec::required("type", FieldKind::Text, "Species").example("\"DOG\""),
        FieldSpec::required("birth", FieldKind::Text, "Date of birth (YYYY-MM-DD)")
            .example("\"2025-08-13\""),
        FieldSpec::required("breed", FieldKind::Text, "Breed").example("\"Maltipoo\""),
        FieldSpec::required("gender", FieldKind::Text, "Gender").example("\"MALE\""),
    ],
};

pub static ANALYSIS: ObjectSchema = ObjectSchema {
    title: "Analysis",
    fields: &[
        FieldSpec::required("result", FieldKind::Text, "Cardiac analysis result")
            .example("\"WARNING\""),
        FieldSpec::required(
            "abnormal_probability",
            FieldKind::Integer,
            "Abnormal probability (%)",
        )
        .example("68"),
        FieldSpec::required("mmvd_stage", FieldKind::Text, "MMVD stage").example("\"B1\""),
    ],
};

pub static VITALS: ObjectSchema = ObjectSchema {
    title: "Vitals",
    fields: &[
        FieldSpec::required("bpm", FieldKind::Integer, "Heart rate (beats per minute)")
            .example("72"),
        FieldSpec::required("weight", FieldKind::Float, "Body weight (kg)").example("1.0"),
        FieldSpec::required("bcs", FieldKind::Integer, "Body condition score (1-5)")
            .example("3"),
        FieldSpec::required(
            "respiration_rate",
            FieldKind::Integer,
            "Respiration rate (breaths per minute)",
        )
        .example("20"),
    ],
};

pub static SURVEY: ObjectSchema = ObjectSchema {
    title: "Survey",
    fields: &[
        FieldSpec::optional("vitality", FieldKind::Integer, "Vitality score"),
        FieldSpec::optional("appetite", FieldKind::Integer, "Appetite score"),
        FieldSpec::optional("cough", FieldKind::Integer, "Cough frequency"),
    ],
};

pub static HEALTH_SUBMISSION: ObjectSchema = ObjectSchema {
    title: "HealthDataPayload",
    fields: &[
        FieldSpec::required("pet_info", FieldKind::Object(&PET_INFO), "Pet identity"),
        FieldSpec::required("analysis", FieldKind::Object(&ANALYSIS), "Cardiac analysis"),
        FieldSpec::required("vitals", FieldKind::Object(&VITALS), "Vital signs"),
        FieldSpec::optional("survey", FieldKind::Object(&SURVEY), "Owner survey"),
    ],
};

/// One step of a violation path: an object key, or a character offset into the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LocSegment {
    Key(String),
    Offset(usize),
}

impl From<&str> for LocSegment {
    fn from(key: &str) -> Self {
        LocSegment::Key(key.to_string())
    }
}

impl PartialEq<&str> for LocSegment {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, LocSegment::Key(key) if key == other)
    }
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Key(key) => f.write_str(key),
            LocSegment::Offset(offset) => write!(f, "{offset}"),
        }
    }
}

/// One failing field path. Serialized as an entry of the 422 `detail` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctx: Option<Value>,
}

impl Violation {
    pub fn missing(loc: Vec<LocSegment>) -> Self {
        Self {
            kind: "missing",
            loc,
            msg: "Field required".to_string(),
            input: None,
            ctx: None,
        }
    }

    pub fn empty_body() -> Self {
        Self::missing(vec![BODY.into()])
    }

    /// `raw` is the undecodable body; the error position is reported as a character offset.
    pub fn invalid_json(error: &serde_json::Error, raw: &[u8]) -> Self {
        let offset = char_offset(raw, error.line(), error.column());
        Self {
            kind: "json_invalid",
            loc: vec![BODY.into(), LocSegment::Offset(offset)],
            msg: "JSON decode error".to_string(),
            input: None,
            ctx: Some(json!({ "error": error.to_string() })),
        }
    }

    fn mismatch(
        (tag, msg): (&'static str, &'static str),
        loc: Vec<LocSegment>,
        input: &Value,
    ) -> Self {
        Self {
            kind: tag,
            loc,
            msg: msg.to_string(),
            input: Some(input.clone()),
            ctx: None,
        }
    }

    /// Dotted path without the leading `body` segment, e.g. `vitals.bpm`.
    pub fn field_path(&self) -> String {
        self.loc
            .get(1..)
            .unwrap_or_default()
            .iter()
            .map(LocSegment::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

// serde_json reports 1-based line and byte column; line 0 means no position.
fn char_offset(raw: &[u8], line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let preceding: usize = raw
        .split(|byte| *byte == b'\n')
        .take(line - 1)
        .map(|segment| segment.len() + 1)
        .sum();
    let end = (preceding + column.saturating_sub(1)).min(raw.len());
    String::from_utf8_lossy(&raw[..end]).chars().count()
}

/// Validates a request body against `schema`, returning every violation found.
pub fn validate(schema: &ObjectSchema, body: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut path = vec![LocSegment::from(BODY)];
    match body {
        Value::Object(map) => check_fields(schema, map, &mut path, &mut violations),
        other => violations.push(Violation::mismatch(MODEL_MISMATCH, path, other)),
    }
    violations
}

fn check_value(
    kind: &FieldKind,
    value: &Value,
    path: &mut Vec<LocSegment>,
    out: &mut Vec<Violation>,
) {
    if !kind.accepts(value) {
        out.push(Violation::mismatch(kind.mismatch(), path.clone(), value));
        return;
    }
    if let (FieldKind::Object(schema), Value::Object(map)) = (kind, value) {
        check_fields(schema, map, path, out);
    }
}

fn check_fields(
    schema: &ObjectSchema,
    map: &Map<String, Value>,
    path: &mut Vec<LocSegment>,
    out: &mut Vec<Violation>,
) {
    for field in schema.fields {
        path.push(field.name.into());
        match map.get(field.name) {
            None if field.required => out.push(Violation::missing(path.clone())),
            None => {}
            Some(Value::Null) if !field.required => {}
            Some(value) => check_value(&field.kind, value, path, out),
        }
        path.pop();
    }
}

/// Rewrites whole-number floats in integer fields as JSON integers.
/// Expects a document that already passed [`validate`].
pub fn normalize_integers(schema: &ObjectSchema, body: &mut Value) {
    let Value::Object(map) = body else {
        return;
    };
    for field in schema.fields {
        let Some(value) = map.get_mut(field.name) else {
            continue;
        };
        match field.kind {
            FieldKind::Integer if !value.is_i64() => {
                if let Some(int) = as_whole_i64(value) {
                    *value = Value::from(int);
                }
            }
            FieldKind::Object(nested) => normalize_integers(nested, value),
            _ => {}
        }
    }
}

impl ObjectSchema {
    /// Renders this schema as a JSON Schema document, nesting object fields.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in self.fields {
            let mut property = match field.kind {
                FieldKind::Object(nested) => nested.to_json_schema(),
                kind => json!({ "type": kind.json_type() }),
            };
            if let Value::Object(entry) = &mut property {
                entry.insert("description".into(), field.description.into());
                if let Some(example) = field.example.and_then(|raw| serde_json::from_str(raw).ok())
                {
                    entry.insert("examples".into(), Value::Array(vec![example]));
                }
            }
            if field.required {
                required.push(Value::from(field.name));
            } else {
                property = json!({ "anyOf": [property, { "type": "null" }] });
            }
            properties.insert(field.name.to_string(), property);
        }

        json!({
            "title": self.title,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
