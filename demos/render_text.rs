//! Example: render marked-up text to a PNG
//!
//! cargo run -p vfont-render --example render_text -- "V_{CC} ~{RESET}" [font] [out.png]

use vfont_render::{Color, PixmapBackend};
use vfont_text::{
    FontConfig, HorizontalJustify, TextAttributes, TextFont, TextRenderer, Vec2, VerticalJustify,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let text = args.next().unwrap_or_else(|| "vfont ~{RESET}\nx^{2} + y_{i}".to_string());
    let font = match args.next() {
        Some(name) => TextFont::load_or_default(&name, &FontConfig::from_env()),
        None => TextFont::default(),
    };
    let output = args.next().unwrap_or_else(|| "render_text.png".to_string());

    let attrs = TextAttributes::new()
        .with_size(32.0, 32.0)
        .with_thickness(3.0)
        .justify(HorizontalJustify::Center, VerticalJustify::Center);

    let mut backend = PixmapBackend::new(640, 240)?;
    backend.clear(Color::WHITE);
    backend.set_color(Color::rgb(20, 40, 120));

    let layout = TextRenderer::new().draw(
        &mut backend,
        font.source(),
        &text,
        Vec2::new(320.0, 120.0),
        &attrs,
    );
    backend.save_png(&output)?;

    println!(
        "Rendered {} glyphs on {} lines ({:.1} x {:.1}) to {output}",
        layout.glyphs.len(),
        layout.line_count,
        layout.width,
        layout.height,
    );
    Ok(())
}
