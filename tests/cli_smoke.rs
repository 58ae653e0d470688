use std::path::PathBuf;

fn glimt_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_glimt")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) { "glimt.exe" } else { "glimt" });
            p
        })
}

#[test]
fn cli_frame_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let opts_path = dir.join("opts.json");
    let out_path = dir.join("out.png");
    let _ = std::fs::remove_file(&out_path);

    std::fs::write(&opts_path, r##"{ "color": "#3399ff", "speed": 1.0 }"##).unwrap();

    let status = std::process::Command::new(glimt_exe())
        .args(["frame", "--widget", "plasma", "--frame", "12"])
        .args(["--width", "48", "--height", "36"])
        .arg("--options")
        .arg(&opts_path)
        .arg("--out")
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out_path).unwrap().to_rgba8();
    assert_eq!((img.width(), img.height()), (48, 36));
}

#[test]
fn cli_rejects_unknown_widget_option() {
    let dir = PathBuf::from("target").join("cli_smoke_bad");
    std::fs::create_dir_all(&dir).unwrap();

    let opts_path = dir.join("opts.json");
    std::fs::write(&opts_path, r#"{ "no_such_knob": true }"#).unwrap();

    let status = std::process::Command::new(glimt_exe())
        .args(["frame", "--widget", "plasma", "--frame", "0"])
        .arg("--options")
        .arg(&opts_path)
        .arg("--out")
        .arg(dir.join("out.png"))
        .status()
        .unwrap();

    assert!(!status.success());
}
