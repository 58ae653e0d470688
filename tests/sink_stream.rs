use glimt::{
    Fps, FrameIndex, FrameRange, InMemorySink, Player, PngDirSink, SurfaceOpts, WidgetKind,
    build_widget,
};

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "glimt_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn plasma_player() -> Player {
    let widget = build_widget(WidgetKind::Plasma, serde_json::Value::Null).unwrap();
    Player::new(widget, SurfaceOpts::logical(16, 12), Fps::new(30, 1).unwrap()).unwrap()
}

#[test]
fn in_memory_sink_sees_config_and_ordered_frames() {
    let mut player = plasma_player();
    let mut sink = InMemorySink::new();
    let range = FrameRange::new(FrameIndex(2), FrameIndex(6)).unwrap();
    player.render_range(range, &mut sink).unwrap();

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (16, 12));
    assert_eq!(cfg.fps, Fps::new(30, 1).unwrap());

    let idxs: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idxs, vec![2, 3, 4, 5]);
    for (_, frame) in sink.frames() {
        assert_eq!(frame.data.len(), 16 * 12 * 4);
        assert!(!frame.premultiplied);
    }
}

#[test]
fn png_dir_sink_writes_numbered_frames() {
    let dir = temp_dir("png_dir_stream");
    let mut player = plasma_player();
    let mut sink = PngDirSink::new(dir.clone());
    let range = FrameRange::new(FrameIndex(0), FrameIndex(3)).unwrap();
    player.render_range(range, &mut sink).unwrap();

    for idx in 0..3u64 {
        let path = dir.join(format!("frame_{idx:05}.png"));
        assert!(path.exists(), "missing {}", path.display());
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (16, 12));
    }
    assert!(!dir.join("frame_00003.png").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn rendering_a_range_leaves_the_player_clock_alone() {
    let mut player = plasma_player();
    player.tick().unwrap();
    player.tick().unwrap();

    let mut sink = InMemorySink::new();
    let range = FrameRange::new(FrameIndex(10), FrameIndex(12)).unwrap();
    player.render_range(range, &mut sink).unwrap();
    assert_eq!(player.frame(), FrameIndex(2));
}
