use serde_json::{Number, Value, json};

use crate::{NavigationStatus, RawVesselRecord, ShipTypeLookup, domain::as_number, fields};

static COURSE_NOT_AVAILABLE: f64 = 360.0;
static HEADING_NOT_AVAILABLE: f64 = 511.0;
static SPEED_NOT_AVAILABLE: f64 = 102.4;
static KNOTS_TO_METERS_PER_SECOND: f64 = 0.514444;

/// What a conversion gets to look at besides the value of its own field.
pub struct ConversionInput<'a> {
    pub vessel: &'a RawVesselRecord,
    pub ship_types: &'a dyn ShipTypeLookup,
}

/// Converts the raw value of a field, `None` omits the value for this vessel.
pub type Conversion = fn(&ConversionInput<'_>, &Value) -> Option<Value>;

/// Describes how one value of a vessel delta is derived from an AisHub field.
#[derive(Clone, Copy)]
pub struct MappingRule {
    /// Dotted path of the value, or the key of the value when `root` is set.
    pub path: &'static str,
    pub key: &'static str,
    /// Root values are published as `{path: value}` on the empty path.
    pub root: bool,
    pub conversion: Option<Conversion>,
}

impl std::fmt::Debug for MappingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingRule")
            .field("path", &self.path)
            .field("key", &self.key)
            .field("root", &self.root)
            .field("conversion", &self.conversion.is_some())
            .finish()
    }
}

impl MappingRule {
    const fn new(path: &'static str, key: &'static str) -> MappingRule {
        MappingRule {
            path,
            key,
            root: false,
            conversion: None,
        }
    }

    const fn root(mut self) -> MappingRule {
        self.root = true;
        self
    }

    const fn conversion(mut self, conversion: Conversion) -> MappingRule {
        self.conversion = Some(conversion);
        self
    }

    /// Applies the rule to `vessel`, returning the path and value to publish.
    pub fn apply(&self, input: &ConversionInput<'_>) -> Option<(&'static str, Value)> {
        let value = input.vessel.get(self.key)?;

        if value.as_str().is_some_and(str::is_empty) {
            return None;
        }

        let value = match self.conversion {
            Some(convert) => convert(input, value)?,
            None => value.clone(),
        };

        if self.root {
            let mut root = serde_json::Map::with_capacity(1);
            root.insert(self.path.to_string(), value);
            Some(("", Value::Object(root)))
        } else {
            Some((self.path, value))
        }
    }
}

pub static MAPPINGS: &[MappingRule] = &[
    MappingRule::new("mmsi", fields::MMSI)
        .root()
        .conversion(number_to_string),
    MappingRule::new("name", fields::NAME).root(),
    MappingRule::new("callsign", fields::CALLSIGN).root(),
    MappingRule::new("imo", fields::IMO)
        .root()
        .conversion(number_to_string),
    MappingRule::new("navigation.courseOverGroundTrue", fields::COG).conversion(course),
    MappingRule::new("navigation.headingTrue", fields::HEADING).conversion(heading),
    MappingRule::new("navigation.destination.commonName", fields::DEST),
    MappingRule::new("sensors.ais.fromBow", fields::A).conversion(from_bow),
    MappingRule::new("sensors.ais.fromCenter", fields::C).conversion(from_center),
    MappingRule::new("design.length", fields::A).conversion(length),
    MappingRule::new("design.beam", fields::C).conversion(beam),
    MappingRule::new("design.draft", fields::DRAUGHT).conversion(draft),
    MappingRule::new("navigation.position", fields::LATITUDE).conversion(position),
    MappingRule::new("navigation.speedOverGround", fields::SOG).conversion(speed_over_ground),
    MappingRule::new("design.aisShipType", fields::TYPE).conversion(ship_type),
    MappingRule::new("navigation.state", fields::NAVSTAT).conversion(navigation_state),
    MappingRule::new(
        "navigation.courseGreatCircle.activeRoute.estimatedTimeOfArrival",
        fields::ETA,
    )
    .conversion(eta),
];

/// Turns AisHub's `"<date> <time>"` into `"<date>T<time>Z"`, the format is not validated.
pub fn convert_time(val: &str) -> String {
    let mut parts = val.split(' ');
    let date = parts.next().unwrap_or_default();
    let time = parts.next().unwrap_or_default();
    format!("{date}T{time}Z")
}

pub fn number_to_string(_: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    match val {
        Value::String(s) => Some(Value::String(s.clone())),
        Value::Number(n) => Some(Value::String(number_string(n))),
        _ => None,
    }
}

fn number_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn course(_: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    as_number(val)
        .filter(|v| *v != COURSE_NOT_AVAILABLE)
        .map(|v| json!(v.to_radians()))
}

fn heading(_: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    as_number(val)
        .filter(|v| *v != HEADING_NOT_AVAILABLE)
        .map(|v| json!(v.to_radians()))
}

/// Sum of two dimension fields, `None` if either is missing or the sum is zero.
fn dimension_sum(vessel: &RawVesselRecord, a: &str, b: &str) -> Option<f64> {
    let sum = vessel.number(a)? + vessel.number(b)?;
    (sum != 0.0).then_some(sum)
}

fn from_bow(input: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    dimension_sum(input.vessel, fields::A, fields::B)?;
    Some(val.clone())
}

fn from_center(input: &ConversionInput<'_>, _: &Value) -> Option<Value> {
    let width = dimension_sum(input.vessel, fields::C, fields::D)?;
    let to_starboard = input.vessel.number(fields::D)?;
    let half = width / 2.0;

    let offset = if to_starboard > half {
        -(to_starboard - half)
    } else {
        half - to_starboard
    };

    Some(json!(offset))
}

fn length(input: &ConversionInput<'_>, _: &Value) -> Option<Value> {
    dimension_sum(input.vessel, fields::A, fields::B).map(|overall| json!({ "overall": overall }))
}

fn beam(input: &ConversionInput<'_>, _: &Value) -> Option<Value> {
    dimension_sum(input.vessel, fields::C, fields::D).map(|beam| json!(beam))
}

fn draft(_: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    as_number(val)
        .filter(|v| *v != 0.0)
        .map(|maximum| json!({ "maximum": maximum }))
}

fn position(input: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    let latitude = as_number(val)?;
    let longitude = input.vessel.number(fields::LONGITUDE)?;
    Some(json!({ "latitude": latitude, "longitude": longitude }))
}

fn speed_over_ground(_: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    as_number(val)
        .filter(|v| *v != SPEED_NOT_AVAILABLE)
        .map(|v| json!(v * KNOTS_TO_METERS_PER_SECOND))
}

fn ship_type(input: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    let id = as_number(val).filter(|v| v.fract() == 0.0)? as i64;
    let name = input.ship_types.ship_type_name(id)?;
    Some(json!({ "id": id, "name": name }))
}

fn navigation_state(_: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    let status = NavigationStatus::from_code(as_number(val)?)?;
    status.state_name().map(Value::from)
}

fn eta(_: &ConversionInput<'_>, val: &Value) -> Option<Value> {
    val.as_str().map(|v| Value::String(convert_time(v)))
}
