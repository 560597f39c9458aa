//! Platform abstraction layer for sakura.
//!
//! Everything the assistant does to the host machine goes through the traits
//! in this crate: reading environment variables and files, spawning
//! processes, and opening URLs in the system browser. The tools crate only
//! ever sees a [`Platform`], so tests can swap in recording implementations
//! instead of launching browsers or shells.
//!
//! # Example
//!
//! ```rust,no_run
//! use sakura_platform::{NativePlatform, Platform};
//! use sakura_platform::process::CommandSpec;
//!
//! # async fn example() {
//! let platform = NativePlatform::new();
//! let out = platform
//!     .process()
//!     .run(&CommandSpec::new("uname").arg("-a"))
//!     .await
//!     .unwrap();
//! println!("{}", out.stdout);
//! # }
//! ```

pub mod browser;
pub mod config_loader;
pub mod env;
pub mod fs;
pub mod process;

use std::sync::Arc;

/// Bundle of all platform capabilities.
pub trait Platform: Send + Sync {
    /// Filesystem operations.
    fn fs(&self) -> &dyn fs::FileSystem;

    /// Environment variable access.
    fn env(&self) -> &dyn env::Environment;

    /// External process execution.
    fn process(&self) -> &dyn process::ProcessSpawner;

    /// URL launching.
    fn browser(&self) -> &dyn browser::UrlOpener;
}

/// Native platform using `std::env`, `tokio::fs`, `tokio::process` and the
/// system URL handler.
pub struct NativePlatform {
    fs: fs::NativeFileSystem,
    env: env::NativeEnvironment,
    process: process::NativeProcessSpawner,
    browser: Arc<dyn browser::UrlOpener>,
}

impl NativePlatform {
    /// Create a native platform that opens URLs in the system browser.
    pub fn new() -> Self {
        Self::with_browser(Arc::new(browser::SystemBrowser))
    }

    /// Create a native platform with a custom URL opener.
    ///
    /// Used by tests (and headless setups) to capture URLs instead of
    /// launching a browser.
    pub fn with_browser(browser: Arc<dyn browser::UrlOpener>) -> Self {
        Self {
            fs: fs::NativeFileSystem,
            env: env::NativeEnvironment,
            process: process::NativeProcessSpawner,
            browser,
        }
    }
}

impl Default for NativePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for NativePlatform {
    fn fs(&self) -> &dyn fs::FileSystem {
        &self.fs
    }

    fn env(&self) -> &dyn env::Environment {
        &self.env
    }

    fn process(&self) -> &dyn process::ProcessSpawner {
        &self.process
    }

    fn browser(&self) -> &dyn browser::UrlOpener {
        self.browser.as_ref()
    }
}
