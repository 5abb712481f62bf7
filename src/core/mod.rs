pub mod camera;
pub mod color;
pub mod entity;
pub mod geometry;
pub mod scene;

pub use camera::{CameraFrame, ShipPose, View, ViewBank, ViewId};
pub use color::Color;
pub use entity::Body;
pub use scene::{DrawHandle, DrawStore, Scene};
