use std::path::{Path, PathBuf};

const CONTENT_FILE: &str = "assets/content.toml";
const TEXTURES_FILE: &str = "assets/textures.toml";

pub fn resolve_assets_root(cli: Option<PathBuf>) -> PathBuf {
    // Precedence: CLI flag -> QUARRY_ASSETS env -> search nearby dirs -> CWD
    if let Some(p) = cli {
        if p.exists() {
            return p;
        }
    }
    if let Ok(p) = std::env::var("QUARRY_ASSETS") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return pb;
        }
    }
    // Search candidates: CWD, executable dir, crate root; climb up to 5 parents
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.to_path_buf());
        }
    }
    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    for base in candidates {
        let mut cur = base;
        for _ in 0..5 {
            if cur.join(CONTENT_FILE).exists() {
                return cur;
            }
            match cur.parent() {
                Some(parent) => cur = parent.to_path_buf(),
                None => break,
            }
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn content_path(root: &Path) -> PathBuf {
    root.join(CONTENT_FILE)
}

pub fn textures_path(root: &Path) -> PathBuf {
    root.join(TEXTURES_FILE)
}
