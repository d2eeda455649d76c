//! Typed request parsing.
//!
//! Request bodies arrive as raw JSON. Every field is validated and converted
//! here, before any predictor is called, so handlers only ever see fully
//! typed requests.

use ml_model::AdmissionQuery;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a request body was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Missing required field '{field}'")]
    Missing { field: &'static str },

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

type Fields = Map<String, Value>;

pub fn parse_object(body: &[u8]) -> Result<Fields, FieldError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| FieldError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(FieldError::NotAnObject),
    }
}

fn required<'a>(fields: &'a Fields, field: &'static str) -> Result<&'a Value, FieldError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(FieldError::Missing { field }),
        Some(value) => Ok(value),
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> FieldError {
    FieldError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Accepts integers, integral floats, numeric strings and booleans
fn integer(fields: &Fields, field: &'static str) -> Result<i64, FieldError> {
    let value = required(fields, field)?;
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(field, format!("expected an integer, got {value}")))
}

fn integer_in<T: TryFrom<i64>>(
    fields: &Fields,
    field: &'static str,
    min: i64,
) -> Result<T, FieldError> {
    let n = integer(fields, field)?;
    if n < min {
        return Err(invalid(field, format!("must be at least {min}, got {n}")));
    }
    T::try_from(n).map_err(|_| invalid(field, format!("{n} is out of range")))
}

/// Accepts strings, and numbers or booleans in their JSON spelling
fn string(fields: &Fields, field: &'static str) -> Result<String, FieldError> {
    match required(fields, field)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(invalid(field, format!("expected a string, got {other}"))),
    }
}

/// Body of `POST /api/predict`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub rank: u32,
    pub category: String,
}

impl RecommendationRequest {
    pub fn from_fields(fields: &Fields) -> Result<Self, FieldError> {
        Ok(Self {
            rank: integer_in(fields, "rank", 1)?,
            category: string(fields, "category")?,
        })
    }
}

/// Body of `POST /api/predict-specific`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecificPredictionRequest {
    pub rank: u32,
    pub year: u16,
    pub round: u8,
    pub category: String,
    pub quota: String,
    pub gender: String,
    pub institute_type: String,
    pub institute_name: String,
    pub branch: String,
    pub is_pwd: bool,
}

impl SpecificPredictionRequest {
    pub fn from_fields(fields: &Fields) -> Result<Self, FieldError> {
        let is_pwd = match integer(fields, "is_pwd")? {
            0 => false,
            1 => true,
            n => return Err(invalid("is_pwd", format!("must be 0 or 1, got {n}"))),
        };

        Ok(Self {
            rank: integer_in(fields, "rank", 1)?,
            year: integer_in(fields, "year", 0)?,
            round: integer_in(fields, "round", 1)?,
            category: string(fields, "category")?,
            quota: string(fields, "quota")?,
            gender: string(fields, "gender")?,
            institute_type: string(fields, "institute_type")?,
            institute_name: string(fields, "institute_name")?,
            branch: string(fields, "branch")?,
            is_pwd,
        })
    }
}

impl From<SpecificPredictionRequest> for AdmissionQuery {
    fn from(req: SpecificPredictionRequest) -> Self {
        AdmissionQuery {
            student_rank: req.rank,
            year: req.year,
            round: req.round,
            category: req.category,
            quota: req.quota,
            gender: req.gender,
            institute_type: req.institute_type,
            institute_name: req.institute_name,
            branch: req.branch,
            is_pwd: req.is_pwd,
        }
    }
}
