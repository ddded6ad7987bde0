//! Domain layer: request types with validation and typed results (no I/O).
//!
//! Every request is checked when it is constructed, so a value that exists is
//! always safe to send. Results are plain structs for endpoints with a fixed
//! shape and [`serde_json::Value`] documents for the open-ended ones.

/// A request identified by a single positive id.
macro_rules! id_request {
    ($(#[$meta:meta])* $name:ident { $accessor:ident: $field:literal }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            $accessor: u64,
        }

        impl $name {
            pub fn new($accessor: u64) -> Result<Self, $crate::domain::ValidationError> {
                Ok(Self {
                    $accessor: $crate::domain::validation::positive($field, $accessor)?,
                })
            }

            pub fn $accessor(&self) -> u64 {
                self.$accessor
            }
        }
    };
}

mod account;
mod api_error;
mod billing;
mod calls;
mod devices;
mod dids;
mod messaging;
mod pbx;
mod routing;
mod system;
mod tariffs;
pub(crate) mod validation;
mod value;

pub use account::*;
pub use api_error::KnownApiError;
pub use billing::*;
pub use calls::*;
pub use devices::*;
pub use dids::*;
pub use messaging::*;
pub use pbx::*;
pub use routing::*;
pub use system::*;
pub use tariffs::*;
pub use validation::ValidationError;
pub use value::{ExtraParams, PhoneNumber, RawPhoneNumber, UnixTimestamp};
