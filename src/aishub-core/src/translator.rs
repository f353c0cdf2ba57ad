use std::sync::Arc;

use serde_json::Value;
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::{
    AisShipTypes, Delta, RawVesselRecord, Result, ShipTypeLookup,
    error::error::{MalformedRecordSnafu, MalformedResponseSnafu, UpstreamSnafu},
    fields,
    mapping::{ConversionInput, MAPPINGS, convert_time},
};

/// Translates AisHub vessel records into deltas.
#[derive(Clone)]
pub struct Translator {
    ship_types: Arc<dyn ShipTypeLookup>,
}

impl Translator {
    pub fn new(ship_types: Arc<dyn ShipTypeLookup>) -> Translator {
        Translator { ship_types }
    }

    /// Translates a single vessel, vessels whose context equals
    /// `self_context` are never reported and yield `None`.
    pub fn translate(&self, vessel: &RawVesselRecord, self_context: &str) -> Result<Option<Delta>> {
        let context = vessel.mmsi()?.context();
        if context == self_context {
            debug!("ignoring vessel: {context}");
            return Ok(None);
        }

        let timestamp = match vessel.get(fields::TIME) {
            None => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(convert_time(s)),
            Some(other) => {
                return MalformedRecordSnafu {
                    reason: format!("invalid TIME '{other}'"),
                }
                .fail();
            }
        };

        let input = ConversionInput {
            vessel,
            ship_types: self.ship_types.as_ref(),
        };

        let mut delta = Delta::new(context, timestamp);
        for (path, value) in MAPPINGS.iter().filter_map(|m| m.apply(&input)) {
            delta.push(path, value);
        }

        Ok(Some(delta))
    }

    /// Translates a full AisHub response body, `[status, [vessel, ..]]`.
    ///
    /// An error flag in the status fails the whole batch, malformed vessels are
    /// logged and skipped. Deltas keep the order of the vessels in the body.
    pub fn translate_response(&self, body: &str, self_context: &str) -> Result<Vec<Delta>> {
        let mut hub: Vec<Value> = serde_json::from_str(body).context(MalformedResponseSnafu)?;

        let failed = hub.first().filter(|s| s.get("ERROR").is_some_and(is_truthy));
        if let Some(status) = failed {
            return UpstreamSnafu {
                status: status.clone(),
            }
            .fail();
        }

        let vessels = match hub.get_mut(1).map(Value::take) {
            Some(Value::Array(vessels)) => vessels,
            _ => Vec::new(),
        };

        let mut deltas = Vec::with_capacity(vessels.len());
        for vessel in vessels {
            debug!("found vessel {vessel}");
            match RawVesselRecord::try_from(vessel).and_then(|v| self.translate(&v, self_context)) {
                Ok(Some(delta)) => {
                    debug!("vessel delta: {delta:?}");
                    deltas.push(delta);
                }
                Ok(None) => {}
                Err(e) => warn!("skipping vessel: {e:?}"),
            }
        }

        Ok(deltas)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Translator::new(Arc::new(AisShipTypes))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
