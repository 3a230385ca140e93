// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Deserializer};

/// Tri-state PATCH field: distinguishes an absent key from an explicit
/// `null`.
///
/// Use with `#[serde(default, deserialize_with = "tri_state::deserialize")]`
/// on an `Option<Option<T>>` field: `None` = absent, `Some(None)` = null,
/// `Some(Some(v))` = value.
pub mod tri_state {
    use super::*;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
