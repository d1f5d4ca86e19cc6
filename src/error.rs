// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::NodeId;

/// Error conditions which may occur while building a [RoadCatalog](crate::RoadCatalog).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An edge refers to a node which doesn't exist in the [RoadGraph](crate::RoadGraph).
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// A feature can't be converted into a pair of roads. Only returned with
    /// [MalformedFeaturePolicy::Fail](crate::catalog::MalformedFeaturePolicy::Fail).
    #[error("feature {index}: {reason}")]
    MalformedFeature {
        index: usize,
        reason: MalformedReason,
    },

    /// All [NodeIds](NodeId) have been used up.
    #[error("too many crossroads (limit: {})", NodeId::MAX)]
    TooManyCrossroads,
}

/// Explains why a feature was rejected during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    #[error("expected at least 2 coordinates, got {0}")]
    TooFewCoordinates(usize),

    #[error("coordinate {0} does not project onto a finite point")]
    NonFiniteCoordinate(usize),
}
