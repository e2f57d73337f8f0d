//! Krathong submission model
//!
//! A submission is created once and never modified. The store owns both the
//! identifier and the creation timestamp, so [`NewKrathong`] carries neither.

use chrono::{DateTime, Utc};
use serde::de::{value::MapAccessDeserializer, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::types::KrathongId;

/// Maximum length of `emp_name` and `emp_department`, enforced by the schema
pub const MAX_TEXT_FIELD_LEN: usize = 50;

/// A persisted Krathong submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Krathong {
    /// Store-assigned identifier
    #[schema(value_type = i64, example = 1)]
    pub krathong_id: KrathongId,

    /// Krathong classification (no server-side domain)
    #[schema(example = 1)]
    pub krathong_type: i32,

    /// Submitter name
    #[schema(example = "Som", max_length = 50)]
    pub emp_name: String,

    /// Submitter department
    #[schema(example = "IT", max_length = 50)]
    pub emp_department: String,

    /// Free-form wish text
    #[schema(example = "health")]
    pub emp_wish: Option<String>,

    /// Insert time, assigned by the store
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting a new submission
///
/// Every field is optional at the type level. An omitted field is written as
/// SQL `NULL` and rejected by the non-nullable columns, so presence is
/// enforced by the schema rather than by request binding.
///
/// Only a JSON object is accepted; arrays are not bound to fields by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct NewKrathong {
    /// Krathong classification
    #[schema(example = 1)]
    pub krathong_type: Option<i32>,

    /// Submitter name
    #[schema(example = "Som", max_length = 50)]
    pub emp_name: Option<String>,

    /// Submitter department
    #[schema(example = "IT", max_length = 50)]
    pub emp_department: Option<String>,

    /// Free-form wish text
    #[schema(example = "health")]
    pub emp_wish: Option<String>,
}

/// Field-wise mirror of [`NewKrathong`] used once the input is known to be a map
#[derive(Deserialize)]
struct NewKrathongFields {
    #[serde(default)]
    krathong_type: Option<i32>,
    #[serde(default)]
    emp_name: Option<String>,
    #[serde(default)]
    emp_department: Option<String>,
    #[serde(default)]
    emp_wish: Option<String>,
}

impl From<NewKrathongFields> for NewKrathong {
    fn from(fields: NewKrathongFields) -> Self {
        Self {
            krathong_type: fields.krathong_type,
            emp_name: fields.emp_name,
            emp_department: fields.emp_department,
            emp_wish: fields.emp_wish,
        }
    }
}

struct NewKrathongVisitor;

impl<'de> Visitor<'de> for NewKrathongVisitor {
    type Value = NewKrathong;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        NewKrathongFields::deserialize(MapAccessDeserializer::new(map)).map(NewKrathong::from)
    }
}

impl<'de> Deserialize<'de> for NewKrathong {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(NewKrathongVisitor)
    }
}

impl NewKrathong {
    /// Create a fully populated submission
    pub fn new(
        krathong_type: i32,
        emp_name: impl Into<String>,
        emp_department: impl Into<String>,
        emp_wish: impl Into<String>,
    ) -> Self {
        Self {
            krathong_type: Some(krathong_type),
            emp_name: Some(emp_name.into()),
            emp_department: Some(emp_department.into()),
            emp_wish: Some(emp_wish.into()),
        }
    }
}
