use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub const DEFAULT_COLOR: &str = "#8884d8";

// Records round-trip verbatim through import/export: every known field is
// optional and absent fields stay absent, unknown (or wrongly typed) fields
// ride along in `extra`, and masses keep their original JSON number form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Filament {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copies: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_mass: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_mass: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Filament {
    pub fn start_grams(&self) -> Option<f64> {
        self.start_mass.as_ref().and_then(Number::as_f64)
    }

    pub fn current_grams(&self) -> Option<f64> {
        self.current_mass.as_ref().and_then(Number::as_f64)
    }
}

impl From<Value> for Filament {
    fn from(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Filament {
            id: take_i64(&mut fields, "id"),
            name: take_string(&mut fields, "name"),
            brand: take_string(&mut fields, "brand"),
            material: take_string(&mut fields, "material"),
            color: take_string(&mut fields, "color"),
            notes: take_string(&mut fields, "notes"),
            copies: take_u32(&mut fields, "copies"),
            start_mass: take_number(&mut fields, "startMass"),
            current_mass: take_number(&mut fields, "currentMass"),
            extra: fields,
        }
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(_)) => match fields.remove(key) {
            Some(Value::String(text)) => Some(text),
            _ => None,
        },
        _ => None,
    }
}

fn take_number(fields: &mut Map<String, Value>, key: &str) -> Option<Number> {
    match fields.get(key) {
        Some(Value::Number(_)) => match fields.remove(key) {
            Some(Value::Number(number)) => Some(number),
            _ => None,
        },
        _ => None,
    }
}

fn take_i64(fields: &mut Map<String, Value>, key: &str) -> Option<i64> {
    let number = fields.get(key).and_then(Value::as_i64);
    if number.is_some() {
        fields.remove(key);
    }
    number
}

fn take_u32(fields: &mut Map<String, Value>, key: &str) -> Option<u32> {
    let number = fields
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());
    if number.is_some() {
        fields.remove(key);
    }
    number
}

// Partial update: only fields present in the body overwrite the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilamentPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub copies: Option<u32>,
    pub start_mass: Option<f64>,
    pub current_mass: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UseRequest {
    pub grams: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
