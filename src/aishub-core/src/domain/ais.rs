use std::{fmt::Display, num::ParseIntError, str::FromStr};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::OptionExt;

use crate::{Result, error::error::MalformedRecordSnafu};

/// Field codes used by the AisHub web service.
pub mod fields {
    pub const MMSI: &str = "MMSI";
    pub const TIME: &str = "TIME";
    pub const LATITUDE: &str = "LATITUDE";
    pub const LONGITUDE: &str = "LONGITUDE";
    pub const COG: &str = "COG";
    pub const SOG: &str = "SOG";
    pub const HEADING: &str = "HEADING";
    pub const NAVSTAT: &str = "NAVSTAT";
    pub const IMO: &str = "IMO";
    pub const NAME: &str = "NAME";
    pub const CALLSIGN: &str = "CALLSIGN";
    pub const TYPE: &str = "TYPE";
    /// Distance from the reference point to the bow.
    pub const A: &str = "A";
    /// Distance from the reference point to the stern.
    pub const B: &str = "B";
    /// Distance from the reference point to port.
    pub const C: &str = "C";
    /// Distance from the reference point to starboard.
    pub const D: &str = "D";
    pub const DRAUGHT: &str = "DRAUGHT";
    pub const DEST: &str = "DEST";
    pub const ETA: &str = "ETA";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Mmsi(i32);

/// A single vessel as reported by AisHub, field code to value.
///
/// The schema is owned by AisHub, fields may be missing, empty strings or hold
/// "no data" sentinels.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawVesselRecord(Map<String, Value>);

#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
#[repr(i32)]
pub enum NavigationStatus {
    UnderWayUsingEngine = 0,
    AtAnchor = 1,
    NotUnderCommand = 2,
    RestrictedManoeuverability = 3,
    ConstrainedByDraught = 4,
    Moored = 5,
    Aground = 6,
    EngagedInFishing = 7,
    UnderWaySailing = 8,
    HazardousMaterialHighSpeed = 9,
    HazardousMaterialWingInGround = 10,
    Reserved11 = 11,
    Reserved12 = 12,
    Reserved13 = 13,
    AisSartIsActive = 14,
    NotDefined = 15,
}

impl Mmsi {
    /// The context vessels are published under, `vessels.urn:mrn:imo:mmsi:<mmsi>`.
    pub fn context(&self) -> String {
        format!("vessels.urn:mrn:imo:mmsi:{}", self.0)
    }

    fn from_value(value: &Value) -> Option<Mmsi> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
                .and_then(|v| i32::try_from(v).ok())
                .map(Mmsi),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromStr for Mmsi {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<Mmsi> for i32 {
    fn from(value: Mmsi) -> Self {
        value.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl RawVesselRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Numeric view of a field, numeric strings are accepted as AisHub is not
    /// consistent about quoting.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(as_number)
    }

    pub fn mmsi(&self) -> Result<Mmsi> {
        let value = self.get(fields::MMSI).context(MalformedRecordSnafu {
            reason: "missing MMSI",
        })?;

        Mmsi::from_value(value).with_context(|| MalformedRecordSnafu {
            reason: format!("invalid MMSI '{value}'"),
        })
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }
}

impl TryFrom<Value> for RawVesselRecord {
    type Error = crate::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(RawVesselRecord(map)),
            other => MalformedRecordSnafu {
                reason: format!("expected a json object, got '{other}'"),
            }
            .fail(),
        }
    }
}

impl NavigationStatus {
    pub fn from_code(code: f64) -> Option<NavigationStatus> {
        if code.fract() != 0.0 {
            return None;
        }
        NavigationStatus::from_i64(code as i64)
    }

    /// The name published under `navigation.state`, codes without a
    /// meaningful state yield `None`.
    pub fn state_name(self) -> Option<&'static str> {
        use NavigationStatus::*;

        match self {
            UnderWayUsingEngine => Some("motoring"),
            AtAnchor => Some("anchored"),
            NotUnderCommand => Some("not under command"),
            RestrictedManoeuverability => Some("restricted manouverability"),
            ConstrainedByDraught => Some("constrained by draft"),
            Moored => Some("moored"),
            Aground => Some("aground"),
            EngagedInFishing => Some("fishing"),
            UnderWaySailing => Some("sailing"),
            HazardousMaterialHighSpeed => Some("hazardous material high speed"),
            HazardousMaterialWingInGround => Some("hazardous material wing in ground"),
            AisSartIsActive => Some("ais-sart"),
            Reserved11 | Reserved12 | Reserved13 | NotDefined => None,
        }
    }
}

pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

#[cfg(feature = "test")]
mod test {
    use rand::Rng;
    use serde_json::json;

    use super::*;

    impl Mmsi {
        pub fn test_new(mmsi: i32) -> Self {
            Self(mmsi)
        }
    }

    impl RawVesselRecord {
        pub fn test_default(mmsi: Option<Mmsi>) -> RawVesselRecord {
            let mmsi = mmsi
                .map(i32::from)
                .unwrap_or_else(|| rand::rng().random_range(200_000_000..800_000_000));

            let value = json!({
                "MMSI": mmsi,
                "TIME": "2017-05-21 14:31:07 GMT",
                "LONGITUDE": 5.32415,
                "LATITUDE": 60.39299,
                "COG": 90,
                "SOG": 10,
                "HEADING": 180,
                "NAVSTAT": 0,
                "IMO": 9234567,
                "NAME": "STATSRAAD LEHMKUHL",
                "CALLSIGN": "LDSB",
                "TYPE": 36,
                "A": 60,
                "B": 38,
                "C": 6,
                "D": 6,
                "DRAUGHT": 5.2,
                "DEST": "BERGEN",
                "ETA": "2017-05-22 08:00"
            });

            match value {
                Value::Object(map) => RawVesselRecord(map),
                _ => unreachable!(),
            }
        }
    }
}
