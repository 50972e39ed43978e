use std::env;
use std::path::{Path, PathBuf};

const WATCHED_VARIABLES: &[&str] = &["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_TRIPLET", "PKG_CONFIG_PATH"];

fn warn(message: impl AsRef<str>) {
    println!("cargo:warning={}", message.as_ref());
}

/// Guess where vcpkg put FFmpeg for the configured triplet.
fn vcpkg_ffmpeg_dir(vcpkg_root: &Path) -> PathBuf {
    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    vcpkg_root.join("installed").join(triplet)
}

fn main() {
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    // ffmpeg-next finds FFmpeg through pkg-config elsewhere; only Windows
    // needs a hint.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }
    if env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Some(vcpkg_root) = env::var_os("VCPKG_ROOT").map(PathBuf::from) else {
        warn("panosweep needs the FFmpeg libraries: set FFMPEG_DIR, or install FFmpeg with vcpkg and set VCPKG_ROOT.");
        return;
    };

    let ffmpeg_dir = vcpkg_ffmpeg_dir(&vcpkg_root);
    if ffmpeg_dir.join("include").join("libavcodec").exists() {
        warn(format!(
            "Found vcpkg FFmpeg at {}; set FFMPEG_DIR to that path to pin it.",
            ffmpeg_dir.display()
        ));
    } else {
        warn(format!(
            "VCPKG_ROOT is set but FFmpeg headers are missing under {}.",
            ffmpeg_dir.display()
        ));
    }
}
