// vidtoolz-cli/tests/cli_integration.rs
//
// Runs the compiled binaries. External plugin discovery is switched off
// unless a test sets up its own plugins.

use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn vidtoolz_cmd() -> Command {
    let mut cmd = Command::cargo_bin("vidtoolz").expect("Failed to find vidtoolz binary");
    cmd.env("VIDTOOLZ_NO_EXTERNAL_PLUGINS", "1").env("NO_COLOR", "1");
    cmd
}

fn touch(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, "dummy content").unwrap();
    path
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
fn path_with(dir: &Path) -> std::ffi::OsString {
    let mut dirs = vec![dir.to_path_buf()];
    if let Some(path) = std::env::var_os("PATH") {
        dirs.extend(std::env::split_paths(&path));
    }
    std::env::join_paths(dirs).unwrap()
}

#[test]
fn test_no_subcommand_prints_listing() {
    vidtoolz_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains(" plugins "))
        .stdout(predicate::str::contains(" ffoverlay "))
        .stdout(predicate::str::contains("Get all listed plugins"));
}

#[test]
fn test_unknown_subcommand_exits_2() {
    vidtoolz_cmd()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("frobnicate"));
}

#[test]
fn test_bad_flag_exits_2() {
    vidtoolz_cmd()
        .args(["play", "a.mp4", "--loop", "many"])
        .assert()
        .code(2);
}

#[test]
fn test_plugins_lists_builtins() {
    vidtoolz_cmd()
        .arg("plugins")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Installed Plugins:"))
        .stdout(predicate::str::contains("vidtoolz.builtin.clip [register_commands]"));
}

#[test]
fn test_plugins_json() -> Result<(), Box<dyn Error>> {
    let output = vidtoolz_cmd().args(["plugins", "--json"]).output()?;
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names.len(), 8);
    assert_eq!(names[0], "vidtoolz.builtin.clip");
    Ok(())
}

#[test]
fn test_speed_out_of_range_is_reported() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = touch(&dir, "input.mp4");
    vidtoolz_cmd()
        .env("VIDTOOLZ_FFMPEG", "/nonexistent/ffmpeg")
        .args(["speed", input.to_str().unwrap(), "out.mp4", "11.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Speed must be between 0.1 and 10.0."));
    Ok(())
}

#[test]
fn test_negative_speed_is_reported() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = touch(&dir, "input.mp4");
    vidtoolz_cmd()
        .args(["speed", input.to_str().unwrap(), "out.mp4", "-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Speed must be between 0.1 and 10.0."));
    Ok(())
}

#[test]
fn test_concat_names_missing_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let a = touch(&dir, "a.mp4");
    let missing = dir.path().join("missing.mp4");
    vidtoolz_cmd()
        .args(["ffconcat", a.to_str().unwrap(), missing.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Input file"))
        .stdout(predicate::str::contains("missing.mp4 not found."));
    Ok(())
}

#[test]
fn test_concat_without_inputs() {
    vidtoolz_cmd()
        .arg("ffconcat")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Error: No input files provided. Use positional arguments or -i/--input-list.",
        ));
}

#[test]
fn test_clip_missing_input() {
    vidtoolz_cmd()
        .args(["clip", "surely/not/here.mp4", "-s", "1", "-d", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Input file surely/not/here.mp4 not found."));
}

#[test]
fn test_vid_alias() {
    Command::cargo_bin("vid")
        .expect("Failed to find vid binary")
        .env("VIDTOOLZ_NO_EXTERNAL_PLUGINS", "1")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clip"));
}

#[cfg(unix)]
#[test]
fn test_failed_tool_prints_its_output() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = touch(&dir, "input.mp4");
    let fake = write_script(dir.path(), "fake-ffmpeg", "echo 'Invalid data found' >&2\nexit 3");
    vidtoolz_cmd()
        .env("VIDTOOLZ_FFMPEG", &fake)
        .args(["clip", input.to_str().unwrap(), "-d", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error clipping video. Return code: 3"))
        .stdout(predicate::str::contains("FFmpeg output:"))
        .stdout(predicate::str::contains("Invalid data found"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_path_plugin_receives_arguments() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    write_script(dir.path(), "vidtoolz-hello", "echo \"hello $*\"");
    Command::cargo_bin("vidtoolz")?
        .env("PATH", path_with(dir.path()))
        .env("VIDTOOLZ_PLUGIN_MANIFEST", dir.path().join("none.json"))
        .args(["hello", "world", "-x", "--flag"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello world -x --flag"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_manifest_plugin_listed_with_version() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let exe = write_script(dir.path(), "gif-tool", "echo \"$@\"");
    let manifest = dir.path().join("plugins.json");
    std::fs::write(
        &manifest,
        serde_json::json!({
            "plugins": [{
                "name": "vidtoolz-gif",
                "version": "0.3.1",
                "executable": exe,
                "commands": [{"name": "gif", "description": "Convert to GIF"}]
            }]
        })
        .to_string(),
    )?;

    Command::cargo_bin("vidtoolz")?
        .env("VIDTOOLZ_PLUGIN_MANIFEST", &manifest)
        .env("NO_COLOR", "1")
        .arg("plugins")
        .assert()
        .success()
        .stdout(predicate::str::contains("vidtoolz-gif 0.3.1 [register_commands]"));

    Command::cargo_bin("vidtoolz")?
        .env("VIDTOOLZ_PLUGIN_MANIFEST", &manifest)
        .args(["gif", "in.mp4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gif in.mp4"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_plugin_taking_builtin_name_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let exe = write_script(dir.path(), "clipper", "exit 0");
    let manifest = dir.path().join("plugins.json");
    std::fs::write(
        &manifest,
        serde_json::json!({
            "plugins": [{
                "name": "clipper",
                "executable": exe,
                "commands": [{"name": "clip", "description": "Another clip"}]
            }]
        })
        .to_string(),
    )?;

    Command::cargo_bin("vidtoolz")?
        .env("VIDTOOLZ_PLUGIN_MANIFEST", &manifest)
        .arg("plugins")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'clip' is already registered"));
    Ok(())
}

// ---- End-to-end with a real ffmpeg ----

fn ffmpeg_available() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn make_test_video(dir: &TempDir, name: &str, seconds: u32) -> PathBuf {
    let path = dir.path().join(name);
    let status = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=duration={seconds}:size=320x240:rate=25"))
        .args(["-f", "lavfi", "-i"])
        .arg(format!("sine=frequency=440:duration={seconds}"))
        .args(["-shortest", "-y"])
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());
    path
}

#[test]
#[ignore = "requires ffmpeg on PATH"]
fn test_e2e_clip_is_shorter() -> Result<(), Box<dyn Error>> {
    assert!(ffmpeg_available());
    let dir = tempdir()?;
    let input = make_test_video(&dir, "ten.mp4", 10);
    let output = dir.path().join("short.mp4");
    vidtoolz_cmd()
        .args(["clip", input.to_str().unwrap(), output.to_str().unwrap(), "-s", "1", "-d", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Video clipped and saved to"));
    assert!(std::fs::metadata(&output)?.len() < std::fs::metadata(&input)?.len());
    Ok(())
}

#[test]
#[ignore = "requires ffmpeg on PATH"]
fn test_e2e_filter_concat_is_larger() -> Result<(), Box<dyn Error>> {
    assert!(ffmpeg_available());
    let dir = tempdir()?;
    let a = make_test_video(&dir, "a.mp4", 3);
    let b = make_test_video(&dir, "b.mp4", 3);
    let output = dir.path().join("joined.mp4");
    vidtoolz_cmd()
        .args(["ffconcat", a.to_str().unwrap(), b.to_str().unwrap(), "--no-fast", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Videos FFmpeg concatenated and saved to"));
    let joined = std::fs::metadata(&output)?.len();
    assert!(joined > std::fs::metadata(&a)?.len());
    assert!(joined > std::fs::metadata(&b)?.len());
    Ok(())
}
