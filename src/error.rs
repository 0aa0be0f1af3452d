//! Error types
//!
//! Gameplay outcomes (self-collision, wall death) are phase transitions and
//! never surface here. These are the failures a caller has to handle.

use std::path::PathBuf;

use thiserror::Error;

/// Arithmetic that has no meaningful result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("division by zero")]
    DivisionByZero,
}

/// Failure reading or writing a JSON file
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by a renderer while drawing a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The drawing surface is gone (closed window, detached canvas, ...)
    #[error("render surface unavailable: {0}")]
    SurfaceLost(String),
    #[error("render failed: {0}")]
    Other(String),
}

/// Failure reported by a score-reporting collaborator
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("score rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
