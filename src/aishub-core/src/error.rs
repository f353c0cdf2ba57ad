use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid observer position, latitude: '{latitude}', longitude: '{longitude}'"))]
    InvalidPosition {
        #[snafu(implicit)]
        location: Location,
        latitude: f64,
        longitude: f64,
    },
    #[snafu(display("AisHub responded with an error status: '{status}'"))]
    Upstream {
        #[snafu(implicit)]
        location: Location,
        status: serde_json::Value,
    },
    #[snafu(display("AisHub response was not a '[status, records]' json array"))]
    MalformedResponse {
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
    #[snafu(display("Malformed vessel record: {reason}"))]
    MalformedRecord {
        #[snafu(implicit)]
        location: Location,
        reason: String,
    },
}

impl Error {
    /// Whether the error only concerns a single record and the rest of the batch can proceed.
    pub fn is_record_local(&self) -> bool {
        matches!(self, Error::MalformedRecord { .. })
    }
}
