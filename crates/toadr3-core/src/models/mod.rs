//! OpenADR3 domain records
//!
//! All records serialize with the protocol's camelCase field names and omit
//! absent optional fields. Records that carry an `objectType` discriminator
//! always emit it, even when the input did not contain one.

/// Define a single-valued discriminator type for an `objectType` field.
///
/// Deserializing any other value fails, so a record of the wrong kind is
/// rejected instead of silently accepted.
macro_rules! object_type_tag {
    ($(#[$meta:meta])* $name:ident => $value:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            #[default]
            #[serde(rename = $value)]
            Tag,
        }

        impl $name {
            /// Wire value of this discriminator
            pub const fn as_str(&self) -> &'static str {
                $value
            }
        }
    };
}

mod enums;
mod event;
mod interval;
mod problem;
mod program;
mod report;
mod subscription;
mod values_map;

pub use enums::*;
pub use event::*;
pub use interval::*;
pub use problem::*;
pub use program::*;
pub use report::*;
pub use subscription::*;
pub use values_map::*;
