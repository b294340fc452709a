pub mod renderer;

pub use renderer::{BoardGeometry, Renderer};
