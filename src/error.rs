//! Error types for finalbevel.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`BevelError`].
pub type Result<T> = std::result::Result<T, BevelError>;

/// Errors that can occur while building meshes or running the tiered bevel.
#[derive(Error, Debug)]
pub enum BevelError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face repeats a vertex or has fewer than three corners.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge was given a negative bevel weight.
    #[error("edge ({v0}, {v1}) has negative bevel weight {weight}")]
    NegativeWeight {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
        /// The rejected weight.
        weight: f64,
    },

    /// A weighted edge does not exist in the mesh.
    #[error("no edge between vertices {v0} and {v1}")]
    MissingEdge {
        /// First vertex of the requested edge.
        v0: usize,
        /// Second vertex of the requested edge.
        v1: usize,
    },

    /// Vertex index arithmetic stepped outside the mesh.
    #[error("vertex index {index} out of range (mesh has {len} vertices)")]
    VertexOutOfRange {
        /// The offending index (may be negative when stepping below zero).
        index: i64,
        /// Number of vertices in the mesh.
        len: usize,
    },

    /// The edges to bevel for a tier could not be found.
    #[error("no edges carry bevel weight {weight}")]
    EmptySelection {
        /// The tier weight that matched nothing.
        weight: f64,
    },

    /// The host bevel primitive reported a failure.
    #[error("bevel primitive failed: {message}")]
    Primitive {
        /// Message from the host.
        message: String,
    },

    /// A tier failed; the mesh may be left mid-transformation.
    #[error("tier {tier} (weight {weight}) aborted: {source}")]
    Aborted {
        /// Index of the failing tier.
        tier: usize,
        /// Weight of the failing tier.
        weight: f64,
        /// Index of the last tier that completed, if any.
        last_completed: Option<usize>,
        /// The underlying failure.
        #[source]
        source: Box<BevelError>,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl BevelError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        BevelError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a host primitive error.
    pub fn primitive<T: Into<String>>(message: T) -> Self {
        BevelError::Primitive {
            message: message.into(),
        }
    }

    /// The last completed tier, if this error came out of a tier iteration.
    pub fn last_completed_tier(&self) -> Option<usize> {
        match self {
            BevelError::Aborted { last_completed, .. } => *last_completed,
            _ => None,
        }
    }
}
