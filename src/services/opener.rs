use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no browser launcher on this platform")]
    Unsupported,
}

/// Hands a resolved URL to whatever can display it.
#[async_trait]
pub trait NavigationOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Launches the desktop browser. Fire-and-forget: success means the launcher started.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    fn launcher(url: &str) -> Option<Command> {
        Self::launcher_for(std::env::consts::OS, url)
    }

    /// The URL is always a single argv entry; no launcher goes through a shell.
    fn launcher_for(os: &str, url: &str) -> Option<Command> {
        let mut cmd = match os {
            "macos" => Command::new("open"),
            "windows" => {
                let mut cmd = Command::new("rundll32");
                cmd.arg("url.dll,FileProtocolHandler");
                cmd
            }
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" | "solaris" | "illumos" => {
                Command::new("xdg-open")
            }
            _ => return None,
        };
        cmd.arg(url);
        Some(cmd)
    }
}

#[async_trait]
impl NavigationOpener for SystemOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        let mut cmd = Self::launcher(url).ok_or(OpenError::Unsupported)?;
        let program = cmd.as_std().get_program().to_string_lossy().into_owned();

        let mut child = cmd
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| OpenError::Spawn { program: program.clone(), source })?;

        info!("Browser launcher '{}' started for {}", program, url);

        // Reap in the background; the caller never waits on the browser.
        tokio::spawn(async move {
            if let Err(e) = child.wait().await {
                warn!("Browser launcher exited abnormally: {}", e);
            }
        });

        Ok(())
    }
}

/// For front-ends without a desktop; the URL reaches the user through the response instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOpener;

#[async_trait]
impl NavigationOpener for NoopOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        info!("Navigation surfaced to caller: {}", url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(cmd: &Command) -> Vec<String> {
        let std = cmd.as_std();
        std::iter::once(std.get_program())
            .chain(std.get_args())
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn windows_launch_bypasses_cmd() {
        let url = "https://www.foo&calc.com";
        let cmd = SystemOpener::launcher_for("windows", url).unwrap();
        assert_eq!(argv(&cmd), vec!["rundll32", "url.dll,FileProtocolHandler", url]);
    }

    #[test]
    fn url_is_one_argument() {
        let url = "https://www.new york times.com";
        assert_eq!(argv(&SystemOpener::launcher_for("macos", url).unwrap()), vec!["open", url]);
        assert_eq!(argv(&SystemOpener::launcher_for("linux", url).unwrap()), vec!["xdg-open", url]);
        assert!(SystemOpener::launcher_for("uefi", url).is_none());
    }
}
