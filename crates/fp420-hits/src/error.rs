// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for hit bookkeeping
//!
//! None of these reach the transport engine: the detector logs them and keeps
//! going.

use crate::hit::HitKey;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HitError {
    #[error("hit {key} not stored: no valid primary recorded (last primary = {last_primary:?})")]
    StoreRejected {
        key: HitKey,
        last_primary: Option<i32>,
    },

    #[error("hit {key} not stored: collection '{collection}' is finalized for this event")]
    CollectionSealed { key: HitKey, collection: String },
}

pub type Result<T> = core::result::Result<T, HitError>;
