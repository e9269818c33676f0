//! toadr3-core - OpenADR3 domain records and wire codecs
//!
//! This crate holds the protocol-level types a VEN exchanges with a VTN:
//! events, programs, reports and subscriptions, together with the ISO 8601
//! duration codec used by interval periods and time zone offsets.
//!
//! Records are plain serde types validated with [`validator::Validate`].
//! They are transport agnostic; the HTTP side lives in `toadr3-client`.

pub mod duration;
pub mod error;
pub mod models;
pub mod validate;

pub use duration::{format_iso8601_duration, parse_iso8601_duration};
pub use error::{DurationError, ModelError, ModelResult};
pub use models::*;
pub use validator::Validate;
