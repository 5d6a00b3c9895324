//! Integration tests for `mdsite build`, `mdsite render` and `mdsite init`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn mdsite_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mdsite"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn temp_out(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("mdsite-build-test").join(name);
    // Clean up from previous runs
    let _ = fs::remove_dir_all(&dir);
    dir
}

/// Copy the fixture site into a scratch directory so builds can write to it.
fn scratch_site(name: &str) -> PathBuf {
    let src = fixture("site");
    let dst = temp_out(name);
    for entry in walkdir::WalkDir::new(&src).min_depth(1) {
        let entry = entry.unwrap();
        let target = dst.join(entry.path().strip_prefix(&src).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::copy(entry.path(), &target).unwrap();
        }
    }
    dst
}

fn build(root: &Path) -> std::process::Output {
    Command::new(mdsite_bin())
        .args(["build", "--root", root.to_str().unwrap(), "--quiet"])
        .output()
        .expect("failed to run mdsite build")
}

#[test]
fn build_produces_correct_file_tree() {
    let site = scratch_site("file-tree");
    let output = build(&site);
    assert!(output.status.success(), "mdsite build should succeed: {output:?}");

    let public = site.join("public");
    assert!(public.join("index.html").exists(), "index.html should exist");
    assert!(public.join("blog/glorfindel.html").exists());
    assert!(public.join("blog/tom.html").exists());
    assert!(public.join("index.css").exists(), "static files should be mirrored");
    assert!(public.join("images/tolkien.png").exists());

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn build_fills_template() {
    let site = scratch_site("template");
    assert!(build(&site).status.success());

    let html = fs::read_to_string(site.join("public/index.html")).unwrap();
    assert!(html.contains("<title>Tolkien Fan Club</title>"));
    assert!(html.contains("<article><div><h1>Tolkien Fan Club</h1>"));
    assert!(html.contains(r#"<img src="/images/tolkien.png" alt="JRR Tolkien sitting">"#));
    assert!(html.contains(r#"<a href="/blog/tom.html">Why Tom Bombadil Was a Mistake</a>"#));
    assert!(!html.contains("{{ Content }}"));

    let post = fs::read_to_string(site.join("public/blog/glorfindel.html")).unwrap();
    assert!(post.contains("<li>He scared the <i>Witch-king</i></li>"));
    assert!(post.contains("<blockquote>Glorfindel rode a white horse with golden bells.</blockquote>"));

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn build_removes_stale_output() {
    let site = scratch_site("stale");
    fs::create_dir_all(site.join("public/old")).unwrap();
    fs::write(site.join("public/old/gone.html"), "stale").unwrap();

    assert!(build(&site).status.success());
    assert!(!site.join("public/old").exists(), "stale output should be deleted");
    assert!(site.join("public/index.html").exists());

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn build_fails_on_untitled_page() {
    let site = scratch_site("untitled");
    fs::write(site.join("content/notes.md"), "no title here").unwrap();

    let output = build(&site);
    assert!(!output.status.success(), "untitled page should fail the build");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("notes.md"), "stderr should name the page: {stderr}");
    // The other pages are still written.
    assert!(site.join("public/index.html").exists());

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn build_honours_config_dirs() {
    let site = scratch_site("config");
    fs::write(site.join("site.json"), r#"{ "outputDir": "dist" }"#).unwrap();

    assert!(build(&site).status.success());
    assert!(site.join("dist/index.html").exists());
    assert!(!site.join("public").exists());

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn render_prints_fragment() {
    let output = Command::new(mdsite_bin())
        .args(["render", fixture("site/content/blog/tom.md").to_str().unwrap()])
        .output()
        .expect("failed to run mdsite render");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim_end(),
        "<div><h1>Why Tom Bombadil Was a Mistake</h1><p>He is <b>cheerful</b>, but the plot never needed him.</p><pre><code>hey dol! merry dol!</code></pre></div>"
    );
}

#[test]
fn render_json_tree() {
    let output = Command::new(mdsite_bin())
        .args([
            "render",
            fixture("site/content/blog/tom.md").to_str().unwrap(),
            "--format",
            "json",
        ])
        .output()
        .expect("failed to run mdsite render");
    assert!(output.status.success());
    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["tag"], "div");
    assert_eq!(tree["children"].as_array().unwrap().len(), 3);
}

#[test]
fn render_page_needs_template() {
    let output = Command::new(mdsite_bin())
        .args([
            "render",
            fixture("site/content/index.md").to_str().unwrap(),
            "--format",
            "page",
        ])
        .output()
        .expect("failed to run mdsite render");
    assert!(!output.status.success());
}

#[test]
fn render_reports_fallback_blocks() {
    let dir = temp_out("render-warn");
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join("broken.md");
    fs::write(&file, "# Title\n\nan **unclosed marker").unwrap();

    let output = Command::new(mdsite_bin())
        .args(["render", file.to_str().unwrap()])
        .output()
        .expect("failed to run mdsite render");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("block 2"), "stderr: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<p>an **unclosed marker</p>"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn init_then_build() {
    let dir = temp_out("init");
    let status = Command::new(mdsite_bin())
        .args(["init", dir.to_str().unwrap(), "--quiet"])
        .status()
        .expect("failed to run mdsite init");
    assert!(status.success());

    assert!(build(&dir).status.success());
    assert!(dir.join("public/index.html").exists());
    assert!(dir.join("public/blog/first-post.html").exists());
    assert!(dir.join("public/index.css").exists());

    let _ = fs::remove_dir_all(&dir);
}
