pub mod hit;
pub mod paint;
pub mod svg;

pub use hit::hit_test;
pub use paint::paint_frame;
pub use svg::{SvgDocument, export_filename, export_svg};
