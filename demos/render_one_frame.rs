use glimt::{Fps, FrameIndex, Player, SurfaceOpts, WidgetKind, build_widget};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = serde_json::json!({ "color": "#3399ff", "speed": 0.8 });
    let widget = build_widget(WidgetKind::Plasma, opts)?;

    let surface = SurfaceOpts {
        width: 512,
        height: 288,
        dpr: 1.0,
        scale: 1.0,
    };
    let mut player = Player::new(widget, surface, Fps::display_refresh())?;
    player.render_frame(FrameIndex(30))?;
    let frame = player.surface().frame();

    let out_path = std::path::Path::new("target").join("render_one_frame.png");
    image::save_buffer_with_format(
        &out_path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;

    eprintln!("wrote {}", out_path.display());
    Ok(())
}
