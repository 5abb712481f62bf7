use std::path::PathBuf;

use thiserror::Error;

pub mod mat;
pub mod mesh;

pub use mat::{Material, Texture};
pub use mesh::{Edge, Mesh, Vertex};

/// Asset loading failures. All of these are raised before the frame loop
/// starts; none are recoverable mid-game.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("resource not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to parse {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to load material library for {path}: {source}")]
    Mtl {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to decode texture {path}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
