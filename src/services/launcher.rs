//! Application launching for the launch intents
//!
//! Launches are fire-and-forget: the child is spawned and never awaited, so the
//! report only reflects whether the spawn itself succeeded.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::kernel::intent::LaunchTarget;

const YOUTUBE_URL: &str = "https://www.youtube.com";
const APPLE_MUSIC_URL: &str = "https://music.apple.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchReport {
    pub name: String,
    pub launched: bool,
}

impl LaunchReport {
    /// The spoken result, e.g. "Opening YouTube".
    pub fn message(&self) -> String {
        if self.launched {
            format!("Opening {}", self.name)
        } else {
            format!("Could not open {}", self.name)
        }
    }
}

/// Failures are reported in the returned text, never raised.
pub trait Launcher: Send + Sync {
    fn launch(&self, target: LaunchTarget) -> LaunchReport;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Other,
        }
    }
}

/// Program and arguments for `target` on `platform`.
pub fn resolve(target: LaunchTarget, platform: Platform) -> Vec<String> {
    let argv: Vec<&str> = match (platform, target) {
        (Platform::Windows, LaunchTarget::Chrome) => vec!["cmd", "/C", "start", "chrome"],
        (Platform::Windows, LaunchTarget::YouTube) => vec!["cmd", "/C", "start", YOUTUBE_URL],
        (Platform::Windows, LaunchTarget::ITunes) => vec!["cmd", "/C", "start", "itunes"],
        (Platform::MacOs, LaunchTarget::Chrome) => vec!["open", "-a", "Google Chrome"],
        (Platform::MacOs, LaunchTarget::YouTube) => vec!["open", YOUTUBE_URL],
        (Platform::MacOs, LaunchTarget::ITunes) => vec!["open", "-a", "iTunes"],
        (Platform::Other, LaunchTarget::Chrome) => vec!["google-chrome"],
        (Platform::Other, LaunchTarget::YouTube) => vec!["xdg-open", YOUTUBE_URL],
        (Platform::Other, LaunchTarget::ITunes) => vec!["xdg-open", APPLE_MUSIC_URL],
    };
    argv.into_iter().map(String::from).collect()
}

/// Spawns the resolved command on the host OS.
#[derive(Debug, Clone, Copy)]
pub struct SystemLauncher {
    platform: Platform,
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
        }
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, target: LaunchTarget) -> LaunchReport {
        let argv = resolve(target, self.platform);
        let name = target.display_name().to_string();

        let Some((program, args)) = argv.split_first() else {
            return LaunchReport { name, launched: false };
        };

        // Not awaited; tokio reaps the child in the background
        match tokio::process::Command::new(program).args(args).spawn() {
            Ok(_child) => {
                info!(target = ?target, program = %program, "launched application");
                LaunchReport { name, launched: true }
            }
            Err(e) => {
                warn!(
                    target = ?target,
                    program = %program,
                    error = %e,
                    "failed to launch application"
                );
                LaunchReport { name, launched: false }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_go_through_the_platform_opener() {
        assert_eq!(resolve(LaunchTarget::YouTube, Platform::MacOs), vec!["open", YOUTUBE_URL]);
        assert_eq!(resolve(LaunchTarget::YouTube, Platform::Other), vec!["xdg-open", YOUTUBE_URL]);
        assert_eq!(resolve(LaunchTarget::ITunes, Platform::MacOs), vec!["open", "-a", "iTunes"]);
    }

    #[test]
    fn report_text_reflects_spawn_result() {
        let ok = LaunchReport { name: "YouTube".into(), launched: true };
        let failed = LaunchReport { name: "iTunes".into(), launched: false };
        assert_eq!(ok.message(), "Opening YouTube");
        assert_eq!(failed.message(), "Could not open iTunes");
    }
}
