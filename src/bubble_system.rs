use std::{path::PathBuf, sync::Arc};

use palette::Srgba;
use parking_lot::Mutex;

use crate::{
    background::{self, BackgroundStyle, FillSurface},
    font_storage::FontStorage,
    renderer::CpuCanvas,
    text::{MeasuredText, TextLayout, TextStyle, measure},
};

/// High-level entry point: fonts, measurement and background painting.
///
/// Rendering is always two explicit phases. [`BubbleSystem::measure`]
/// publishes an immutable [`MeasuredText`] snapshot, and only then does
/// [`BubbleSystem::paint_background`] read it. A newer snapshot simply
/// replaces an older one; nothing is cached between repaints.
///
/// Uses `Mutex` so one system can be shared across UI threads. The fields are
/// public for callers that want to hold a lock over several operations.
pub struct BubbleSystem {
    pub font_storage: Mutex<FontStorage>,
    pub background_style: Mutex<BackgroundStyle>,
}

impl Default for BubbleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl BubbleSystem {
    /// Creates a system with no fonts and the default background style.
    pub fn new() -> Self {
        Self::with_style(BackgroundStyle::default())
    }

    pub fn with_style(style: BackgroundStyle) -> Self {
        Self {
            font_storage: Mutex::new(FontStorage::new()),
            background_style: Mutex::new(style),
        }
    }
}

/// font storage
impl BubbleSystem {
    pub fn load_system_fonts(&self) {
        self.font_storage.lock().load_system_fonts();
    }

    pub fn load_font_binary(&self, data: impl Into<Vec<u8>>) {
        self.font_storage.lock().load_font_binary(data);
    }

    pub fn load_font_file(&self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_storage.lock().load_font_file(path)
    }

    pub fn load_fonts_dir(&self, dir: PathBuf) {
        self.font_storage.lock().load_fonts_dir(dir)
    }

    pub fn is_empty(&self) -> bool {
        self.font_storage.lock().is_empty()
    }

    pub fn query(&self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        self.font_storage.lock().query(query)
    }

    pub fn default_face(&self) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        self.font_storage.lock().default_face()
    }
}

/// background style
impl BubbleSystem {
    /// Returns a copy of the current style.
    pub fn background_style(&self) -> BackgroundStyle {
        self.background_style.lock().clone()
    }

    pub fn set_background_style(&self, style: BackgroundStyle) {
        *self.background_style.lock() = style;
    }
}

/// measure, then paint
impl BubbleSystem {
    /// Lays out `text` with the face `font_id`.
    ///
    /// Returns `None` when the face is not loaded.
    pub fn measure(&self, text: &str, font_id: fontdb::ID, style: &TextStyle) -> Option<MeasuredText> {
        let Some(font) = self.font_storage.lock().font(font_id) else {
            log::warn!("Measure called with a font that is not loaded (id: {:?}).", font_id);
            return None;
        };

        Some(measure(text, font.as_ref(), style))
    }

    /// Fills the background of every line of `layout` into `surface`.
    pub fn paint_background<L, S>(&self, layout: &L, canvas_width: f32, surface: &mut S)
    where
        L: TextLayout + ?Sized,
        S: FillSurface + ?Sized,
    {
        let style = self.background_style();
        background::paint_background(layout, canvas_width, &style, surface);
    }

    /// Measures `text`, then draws backgrounds and glyphs into `canvas`.
    ///
    /// `canvas` is cleared to transparent first. The measured snapshot is
    /// returned so the caller can reuse it, e.g. for hit boxes of its own.
    pub fn cpu_render(
        &self,
        text: &str,
        font_id: fontdb::ID,
        text_style: &TextStyle,
        text_color: Srgba<u8>,
        canvas: &mut CpuCanvas,
    ) -> Option<MeasuredText> {
        let font = self.font_storage.lock().font(font_id);
        let Some(font) = font else {
            log::warn!("Render called with a font that is not loaded (id: {:?}).", font_id);
            return None;
        };

        let layout = measure(text, font.as_ref(), text_style);

        canvas.clear(Srgba::new(0, 0, 0, 0));
        self.paint_background(&layout, canvas.width() as f32, canvas);
        canvas.draw_glyphs(&layout, font.as_ref(), text_color);

        Some(layout)
    }
}
