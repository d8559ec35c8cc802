//! Data types shared by the loader, the analysers and the renderer.

mod cell;
mod style;
mod workbook;

pub use cell::*;
pub use style::*;
pub use workbook::*;
