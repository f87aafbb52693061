pub mod debug;
mod radar;

pub use radar::{overlay_background, Radar};
