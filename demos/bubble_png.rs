use image::RgbaImage;

use fukidashi::{
    BubbleSystem, CpuCanvas,
    palette::Srgba,
    text::{HorizontalAlign, TextStyle, WrapStyle},
};

const WIDTH: u32 = 480;
const HEIGHT: u32 = 260;

#[allow(clippy::unwrap_used)]
fn main() {
    let system = BubbleSystem::new();
    system.load_system_fonts();

    let (font_id, _) = system
        .default_face()
        .expect("system fonts are required for the bubble demo");

    let style = TextStyle {
        font_size: 26.0,
        line_height: Some(30.0),
        horizontal_align: HorizontalAlign::Center,
        max_width: Some(WIDTH as f32),
        wrap_style: WrapStyle::WordWrap,
    };

    let mut canvas = CpuCanvas::new(WIDTH, HEIGHT).unwrap();
    let layout = system
        .cpu_render(
            "In the\nbeginning were\nthe words\nand the words made the world.",
            font_id,
            &style,
            Srgba::new(255, 255, 255, 255),
            &mut canvas,
        )
        .unwrap();

    println!("rendered {} line(s)", layout.lines.len());

    let image = RgbaImage::from_raw(WIDTH, HEIGHT, canvas.to_rgba8()).unwrap();
    image.save("bubble.png").unwrap();
}
