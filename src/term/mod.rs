//! Terminal presentation: canvas buffer, screen flushing and the board view.

pub mod canvas;
pub mod screen;
pub mod view;

pub use canvas::{Canvas, Glyph, Rgb, TextStyle};
pub use screen::Screen;
pub use view::{BoardView, Viewport};
