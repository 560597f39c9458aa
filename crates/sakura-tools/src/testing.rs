//! Scripted platform for tool tests.

use std::sync::Mutex;

use async_trait::async_trait;
use sakura_platform::Platform;
use sakura_platform::browser::{RecordingBrowser, UrlOpener};
use sakura_platform::env::{Environment, MapEnvironment};
use sakura_platform::fs::{FileSystem, NativeFileSystem};
use sakura_platform::process::{CommandSpec, ProcessError, ProcessOutput, ProcessSpawner};

type Reply = Box<dyn Fn(&CommandSpec) -> Result<ProcessOutput, ProcessError> + Send + Sync>;

/// Answers every spawn with a canned reply and records the specs it saw.
pub(crate) struct ScriptedSpawner {
    reply: Reply,
    seen: Mutex<Vec<CommandSpec>>,
}

#[async_trait]
impl ProcessSpawner for ScriptedSpawner {
    async fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, ProcessError> {
        self.seen.lock().unwrap().push(spec.clone());
        (self.reply)(spec)
    }
}

pub(crate) struct ScriptedPlatform {
    fs: NativeFileSystem,
    env: MapEnvironment,
    process: ScriptedSpawner,
    browser: RecordingBrowser,
}

impl ScriptedPlatform {
    pub(crate) fn new<F>(reply: F) -> Self
    where
        F: Fn(&CommandSpec) -> Result<ProcessOutput, ProcessError> + Send + Sync + 'static,
    {
        Self {
            fs: NativeFileSystem,
            env: MapEnvironment::new(),
            process: ScriptedSpawner {
                reply: Box::new(reply),
                seen: Mutex::new(Vec::new()),
            },
            browser: RecordingBrowser::default(),
        }
    }

    /// Always exit 0 with the given stdout.
    pub(crate) fn stdout(text: &'static str) -> Self {
        Self::new(move |_| {
            Ok(ProcessOutput {
                exit_code: 0,
                stdout: text.to_string(),
                stderr: String::new(),
            })
        })
    }

    pub(crate) fn seen(&self) -> Vec<CommandSpec> {
        self.process.seen.lock().unwrap().clone()
    }
}

impl Platform for ScriptedPlatform {
    fn fs(&self) -> &dyn FileSystem {
        &self.fs
    }

    fn env(&self) -> &dyn Environment {
        &self.env
    }

    fn process(&self) -> &dyn ProcessSpawner {
        &self.process
    }

    fn browser(&self) -> &dyn UrlOpener {
        &self.browser
    }
}
