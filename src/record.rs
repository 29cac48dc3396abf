//! Typed street-asset rows and the schema used to print them.

use std::{fmt, io, str::FromStr};

use serde::{Deserialize, Deserializer};

use crate::P2;

/// Number of columns in every dataset row.
pub const FIELD_COUNT: usize = 19;

/// One footpath segment, fields in dataset column order.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Record {
    #[serde(deserialize_with = "lenient")]
    pub footpath_id: i64,
    pub address: String,
    pub clue_sa: String,
    pub asset_type: String,
    #[serde(deserialize_with = "lenient")]
    pub deltaz: f64,
    #[serde(deserialize_with = "lenient")]
    pub distance: f64,
    #[serde(deserialize_with = "lenient")]
    pub grade1in: f64,
    #[serde(deserialize_with = "lenient")]
    pub mcc_id: i64,
    #[serde(deserialize_with = "lenient")]
    pub mccid_int: i64,
    #[serde(deserialize_with = "lenient")]
    pub rlmax: f64,
    #[serde(deserialize_with = "lenient")]
    pub rlmin: f64,
    pub segside: String,
    #[serde(deserialize_with = "lenient")]
    pub statusid: i64,
    #[serde(deserialize_with = "lenient")]
    pub streetid: i64,
    #[serde(deserialize_with = "lenient")]
    pub street_group: i64,
    #[serde(deserialize_with = "lenient")]
    pub start_lat: f64,
    #[serde(deserialize_with = "lenient")]
    pub start_lon: f64,
    #[serde(deserialize_with = "lenient")]
    pub end_lat: f64,
    #[serde(deserialize_with = "lenient")]
    pub end_lon: f64,
}

/// Numeric columns may be padded or left blank; blank reads as zero.
/// Anything else must parse in full as the column's type: `"19458.0"` or `"12abc"`
/// in an integer column is an error, not a prefix read.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse()
        .map_err(|e| serde::de::Error::custom(format!("{raw:?}: {e}")))
}

/// A single field value borrowed out of a [`Record`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl Record {
    /// Start coordinate as (longitude, latitude)
    pub fn start(&self) -> P2 {
        P2::new(self.start_lon, self.start_lat)
    }

    /// End coordinate as (longitude, latitude)
    pub fn end(&self) -> P2 {
        P2::new(self.end_lon, self.end_lat)
    }

    /// True if either endpoint equals `point` exactly
    pub fn touches(&self, point: &P2) -> bool {
        self.start() == *point || self.end() == *point
    }

    /// All fields in column order
    pub fn values(&self) -> [FieldValue<'_>; FIELD_COUNT] {
        use FieldValue::*;
        [
            Int(self.footpath_id),
            Text(&self.address),
            Text(&self.clue_sa),
            Text(&self.asset_type),
            Float(self.deltaz),
            Float(self.distance),
            Float(self.grade1in),
            Int(self.mcc_id),
            Int(self.mccid_int),
            Float(self.rlmax),
            Float(self.rlmin),
            Text(&self.segside),
            Int(self.statusid),
            Int(self.streetid),
            Int(self.street_group),
            Float(self.start_lat),
            Float(self.start_lon),
            Float(self.end_lat),
            Float(self.end_lon),
        ]
    }

    /// Write every field as `label: value || ` using the schema's labels and precisions
    pub fn render<W: io::Write>(&self, schema: &Schema, out: &mut W) -> io::Result<()> {
        for (spec, value) in schema.fields.iter().zip(self.values()) {
            write!(out, "{}: ", spec.name)?;
            match value {
                FieldValue::Int(v) => write!(out, "{v}")?,
                FieldValue::Text(v) => write!(out, "{v}")?,
                FieldValue::Float(v) => match spec.precision {
                    Some(p) => write!(out, "{v:.p$}")?,
                    None => write!(out, "{v}")?,
                },
            }
            write!(out, " || ")?;
        }
        Ok(())
    }
}

/// Label and print precision of one column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Fixed number of decimals for floating-point columns
    pub precision: Option<usize>,
}

const fn field(name: &'static str, precision: Option<usize>) -> FieldSpec {
    FieldSpec { name, precision }
}

/// Column labels and precisions for rendering records
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schema {
    pub fields: [FieldSpec; FIELD_COUNT],
}

impl Schema {
    pub const FOOTPATH: Schema = Schema {
        fields: [
            field("footpath_id", None),
            field("address", None),
            field("clue_sa", None),
            field("asset_type", None),
            field("deltaz", Some(2)),
            field("distance", Some(2)),
            field("grade1in", Some(1)),
            field("mcc_id", None),
            field("mccid_int", None),
            field("rlmax", Some(2)),
            field("rlmin", Some(2)),
            field("segside", None),
            field("statusid", None),
            field("streetid", None),
            field("street_group", None),
            field("start_lat", Some(6)),
            field("start_lon", Some(6)),
            field("end_lat", Some(6)),
            field("end_lon", Some(6)),
        ],
    };
}

impl Default for Schema {
    fn default() -> Self {
        Self::FOOTPATH
    }
}
