pub mod cpu_canvas;

pub use cpu_canvas::{CpuCanvas, GlyphBitmap, GlyphRasterizer};
