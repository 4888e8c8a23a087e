//! Strongly typed 128-bit identifiers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys without
//! ceremony.  The wire form is the 16 big-endian bytes of the inner integer;
//! the scheduler hashes exactly those bytes to pick a runner, so
//! [`to_bytes`](DeviceId::to_bytes) must stay stable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, SeededRng};

/// Generate a typed 128-bit ID wrapper.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
        $vis struct $name(pub u128);

        impl $name {
            /// The all-zero ID, used for "not assigned".
            pub const NIL: $name = $name(0);

            /// Draw a fresh non-nil ID from `rng`.
            pub fn random(rng: &mut SeededRng) -> Self {
                $name(rng.random::<u128>().max(1))
            }

            #[inline]
            pub fn is_nil(self) -> bool {
                self.0 == 0
            }

            /// Raw identity bytes (big-endian).
            #[inline]
            pub fn to_bytes(self) -> [u8; 16] {
                self.0.to_be_bytes()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:032x}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            /// Accepts 32 hex digits, with or without UUID-style hyphens.
            fn from_str(s: &str) -> Result<Self, CoreError> {
                let hex: String = s.chars().filter(|&c| c != '-').collect();
                if hex.len() != 32 {
                    return Err(CoreError::InvalidId(s.to_owned()));
                }
                u128::from_str_radix(&hex, 16)
                    .map($name)
                    .map_err(|_| CoreError::InvalidId(s.to_owned()))
            }
        }
    };
}

typed_id! {
    /// Identity of a simulated device.  Drives scheduler sharding.
    pub struct DeviceId;
}

typed_id! {
    /// Identity of a route.
    pub struct RouteId;
}

typed_id! {
    /// Identity of a track within a route.
    pub struct TrackId;
}

typed_id! {
    /// Identity of a sensor attached to a device.
    pub struct SensorId;
}
