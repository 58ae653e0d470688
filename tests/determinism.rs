use glimt::{Fps, FrameIndex, Player, SurfaceOpts, WidgetKind, build_widget};

fn player_with(kind: WidgetKind, options: serde_json::Value) -> Player {
    let widget = build_widget(kind, options).unwrap();
    Player::new(widget, SurfaceOpts::logical(24, 16), Fps::display_refresh()).unwrap()
}

#[test]
fn same_frame_renders_identical_pixels_across_players() {
    for kind in WidgetKind::ALL {
        let mut a = player_with(kind, serde_json::Value::Null);
        let mut b = player_with(kind, serde_json::Value::Null);
        a.render_frame(FrameIndex(5)).unwrap();
        b.render_frame(FrameIndex(5)).unwrap();
        assert_eq!(
            a.surface().data(),
            b.surface().data(),
            "{kind:?} is not deterministic"
        );
    }
}

#[test]
fn time_comes_from_the_frame_index_not_the_clock() {
    let mut player = player_with(WidgetKind::Plasma, serde_json::Value::Null);
    player.render_frame(FrameIndex(30)).unwrap();
    let first = player.surface().data().to_vec();

    std::thread::sleep(std::time::Duration::from_millis(30));
    player.render_frame(FrameIndex(30)).unwrap();
    assert_eq!(player.surface().data(), &first[..]);
}

#[test]
fn pointer_input_feeds_interactive_widgets_deterministically() {
    let mut a = player_with(WidgetKind::LiquidChrome, serde_json::Value::Null);
    let mut b = player_with(WidgetKind::LiquidChrome, serde_json::Value::Null);

    a.pointer_moved(20.0, 4.0);
    b.pointer_moved(20.0, 4.0);
    a.render_frame(FrameIndex(2)).unwrap();
    b.render_frame(FrameIndex(2)).unwrap();
    assert_eq!(a.surface().data(), b.surface().data());

    // A different pointer position changes the field.
    let mut c = player_with(WidgetKind::LiquidChrome, serde_json::Value::Null);
    c.pointer_moved(2.0, 14.0);
    c.render_frame(FrameIndex(2)).unwrap();
    assert_ne!(a.surface().data(), c.surface().data());
}

#[test]
fn letter_glitch_seed_selects_the_sequence() {
    let seeded = |seed: u64| {
        let widget =
            build_widget(WidgetKind::LetterGlitch, serde_json::json!({ "seed": seed })).unwrap();
        let mut p =
            Player::new(widget, SurfaceOpts::logical(96, 48), Fps::display_refresh()).unwrap();
        p.render_frame(FrameIndex(0)).unwrap();
        p.surface().data().to_vec()
    };
    assert_eq!(seeded(7), seeded(7));
    assert_ne!(seeded(7), seeded(8));
}
