use reqwest::StatusCode;
use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to compute the query or translate the response"))]
    Core {
        #[snafu(implicit)]
        location: Location,
        source: aishub_core::Error,
    },
    #[snafu(display("Failed to send request to AisHub"))]
    Request {
        #[snafu(implicit)]
        location: Location,
        source: reqwest_middleware::Error,
    },
    #[snafu(display("Failed to read the AisHub response body"))]
    Body {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },
    #[snafu(display("AisHub request failed, status: '{status}', url: '{url}', body: '{body}'"))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: String,
        status: StatusCode,
        body: String,
    },
    #[snafu(display("The delta channel was closed"))]
    SinkClosed {
        #[snafu(implicit)]
        location: Location,
    },
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::FailedRequest { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The core error behind this error, if any.
    pub fn core(&self) -> Option<&aishub_core::Error> {
        match self {
            Error::Core { source, .. } => Some(source),
            _ => None,
        }
    }
}
