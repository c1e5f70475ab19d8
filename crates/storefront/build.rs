//! Stamps the static assets with a content version.
//!
//! Every file under `static/` is hashed in path order; templates append the
//! first 8 hex chars as `?v=` so browsers refetch only after a change.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

fn main() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
    println!("cargo:rerun-if-changed={}", root.display());

    let mut files = Vec::new();
    collect_files(&root, &mut files);
    files.sort();

    let mut hasher = Sha256::new();
    for file in &files {
        println!("cargo:rerun-if-changed={}", file.display());
        if let Ok(relative) = file.strip_prefix(&root) {
            hasher.update(relative.to_string_lossy().as_bytes());
        }
        match fs::read(file) {
            Ok(content) => hasher.update(&content),
            Err(e) => println!("cargo:warning=Could not read {}: {e}", file.display()),
        }
    }

    let digest = format!("{:x}", hasher.finalize());
    let version = digest.get(..8).unwrap_or(&digest);
    println!("cargo:rustc-env=ASSET_VERSION={version}");
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}
