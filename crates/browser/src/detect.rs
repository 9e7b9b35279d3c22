//! Browser detection and install guidance.

use std::path::PathBuf;

/// Known Chromium-based browser executable names to search for.
/// All of these speak CDP (Chrome DevTools Protocol).
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "chrome",
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "msedge",
    "microsoft-edge-stable",
    "brave-browser",
];

/// Result of browser detection.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Whether a browser was found.
    pub found: bool,
    /// Path to the browser executable (if found).
    pub path: Option<PathBuf>,
    /// Install instructions when nothing was found.
    pub install_hint: String,
}

/// Detect if a Chromium-based browser is available on the system.
///
/// Checks (in order):
/// 1. Custom path from config (if provided)
/// 2. `CHROME` environment variable
/// 3. Known executable names in PATH
pub fn detect_browser(custom_path: Option<&str>) -> DetectionResult {
    if let Some(path) = custom_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return found(p);
        }
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return found(p);
        }
    }

    for name in CHROMIUM_EXECUTABLES {
        if let Ok(path) = which::which(name) {
            return found(path);
        }
    }

    DetectionResult {
        found: false,
        path: None,
        install_hint: install_instructions(),
    }
}

fn found(path: PathBuf) -> DetectionResult {
    DetectionResult {
        found: true,
        path: Some(path),
        install_hint: String::new(),
    }
}

/// Get install instructions for the missing-browser error message.
pub fn install_instructions() -> String {
    "No Chromium-based browser found. Install one:\n\n  \
     Debian/Ubuntu: sudo apt install chromium-browser\n  \
     Fedora:        sudo dnf install chromium\n  \
     Arch:          sudo pacman -S chromium\n  \
     macOS:         brew install --cask google-chrome\n\n\
     Or set chrome_path in chartrelay.toml, or the CHROME environment variable."
        .to_string()
}
