//! Pixmap backend tests - engine output rasterized with tiny-skia

use vfont_render::{Color, PixmapBackend};
use vfont_text::{
    HorizontalJustify, StrokeFont, TextAttributes, TextRenderer, Vec2, VerticalJustify,
};

fn attrs() -> TextAttributes {
    TextAttributes::new()
        .with_size(24.0, 24.0)
        .with_thickness(3.0)
        .justify(HorizontalJustify::Center, VerticalJustify::Center)
}

#[test]
fn test_text_inks_pixels_inside_its_box() {
    let mut backend = PixmapBackend::new(200, 80).unwrap();
    let layout = TextRenderer::new().draw(
        &mut backend,
        StrokeFont::embedded(),
        "vfont",
        Vec2::new(100.0, 40.0),
        &attrs(),
    );

    assert!(backend.inked_pixels() > 100);

    // Nothing is drawn far outside the layout box
    let bbox = layout.bounding_box;
    let pixmap = backend.pixmap();
    for y in 0..pixmap.height() {
        for x in 0..pixmap.width() {
            let inked = pixmap.pixel(x, y).is_some_and(|p| p.alpha() > 0);
            if inked {
                assert!(x as f32 >= bbox.min.x - 6.0 && x as f32 <= bbox.max.x + 6.0);
                assert!(y as f32 >= bbox.min.y - 6.0 && y as f32 <= bbox.max.y + 6.0);
            }
        }
    }
}

#[test]
fn test_mirrored_text_inks_the_same_amount() {
    let font = StrokeFont::embedded();
    let renderer = TextRenderer::new();

    let mut plain = PixmapBackend::new(200, 80).unwrap();
    renderer.draw(&mut plain, font, "mirror", Vec2::new(100.0, 40.0), &attrs());

    let mut mirrored = PixmapBackend::new(200, 80).unwrap();
    renderer.draw(
        &mut mirrored,
        font,
        "mirror",
        Vec2::new(100.0, 40.0),
        &attrs().mirrored(true),
    );

    let a = plain.inked_pixels() as f32;
    let b = mirrored.inked_pixels() as f32;
    assert!((a - b).abs() / a < 0.05, "{a} vs {b}");
}

#[test]
fn test_png_export() -> anyhow::Result<()> {
    let mut backend = PixmapBackend::new(64, 32)?;
    backend.clear(Color::WHITE);
    TextRenderer::new().draw(
        &mut backend,
        StrokeFont::embedded(),
        "Hi",
        Vec2::new(32.0, 16.0),
        &attrs(),
    );

    let bytes = backend.encode_png()?;
    let decoder = png::Decoder::new(bytes.as_slice());
    let reader = decoder.read_info()?;
    let info = reader.info();
    assert_eq!((info.width, info.height), (64, 32));
    Ok(())
}
