use std::path::{Path, PathBuf};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_pixel-reveal")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "pixel-reveal.exe"
            } else {
                "pixel-reveal"
            });
            p
        })
}

fn fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    std::fs::create_dir_all(dir).unwrap();
    let subject = dir.join("subject.png");
    let control = dir.join("control.png");
    image::RgbaImage::from_fn(6, 4, |x, _| image::Rgba([40 * x as u8, 80, 160, 255]))
        .save(&subject)
        .unwrap();
    image::RgbaImage::from_fn(3, 2, |x, _| image::Rgba([120 * x as u8, 0, 0, 255]))
        .save(&control)
        .unwrap();
    (subject, control)
}

#[test]
fn cli_frame_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke_frame");
    let (subject, control) = fixtures(&dir);
    let out_path = dir.join("out.png");
    let _ = std::fs::remove_file(&out_path);

    let status = std::process::Command::new(exe())
        .arg("frame")
        .arg("--subject")
        .arg(&subject)
        .arg("--control")
        .arg(&control)
        .args(["--duration-ms", "1000", "--at-ms", "1000", "--out"])
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    let written = image::open(&out_path).unwrap().to_rgba8();
    let original = image::open(&subject).unwrap().to_rgba8();
    assert_eq!(written, original);
}

#[test]
fn cli_render_writes_sequence_with_fallback() {
    let dir = PathBuf::from("target").join("cli_smoke_render");
    let (subject, _) = fixtures(&dir);
    let broken = dir.join("broken.png");
    std::fs::write(&broken, b"not a png").unwrap();
    let out_dir = dir.join("frames");
    let _ = std::fs::remove_dir_all(&out_dir);

    let status = std::process::Command::new(exe())
        .arg("render")
        .arg("--subject")
        .arg(&subject)
        .arg("--control")
        .arg(&broken)
        .args(["--duration-ms", "100", "--fps", "50", "--out-dir"])
        .arg(&out_dir)
        .status()
        .unwrap();

    assert!(status.success());
    // Ticks at 0, 20, 40, 60, 80 and the terminal one at 100 ms.
    for i in 0..6 {
        assert!(out_dir.join(format!("frame_{i:05}.png")).exists(), "frame {i}");
    }
    assert!(!out_dir.join("frame_00006.png").exists());
}

#[test]
fn cli_countdown_prints_days() {
    let output = std::process::Command::new(exe())
        .args([
            "countdown",
            "--date",
            "2025-07-20",
            "--now",
            "2025-07-10T12:00:00Z",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "9");
}
