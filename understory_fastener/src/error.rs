// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by fastener reads and writes.

use alloc::string::String;

use crate::id::FastenerId;

/// Errors returned by [`FastenerTree`](crate::FastenerTree) operations.
///
/// These are programming errors: they are returned to the immediate caller
/// and never converted into a default value inside the tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FastenerError {
    /// Neither a local value, an inherited value, nor a default is available.
    #[error("fastener `{name}` ({id}) has no state")]
    MissingState {
        /// The fastener that was read.
        id: FastenerId,
        /// Its name.
        name: &'static str,
    },
    /// The handle's value type does not match the stored value type.
    #[error("fastener `{name}` ({id}) holds `{stored}`, not `{requested}`")]
    TypeMismatch {
        /// The fastener that was accessed.
        id: FastenerId,
        /// Its name.
        name: &'static str,
        /// Type name of the stored value.
        stored: &'static str,
        /// Type name requested through the handle.
        requested: &'static str,
    },
    /// The handle refers to a fastener that was removed.
    #[error("{0} is stale")]
    StaleFastener(FastenerId),
    /// The raw input could not be coerced to the fastener's value type.
    #[error("cannot coerce {input:?} for fastener `{name}`: {reason}")]
    Coercion {
        /// Name of the fastener being written.
        name: &'static str,
        /// The raw input.
        input: String,
        /// Why coercion failed.
        reason: String,
    },
}
