//! The interactive session: a sleeping/awake state machine over a line
//! reader and a writer.
//!
//! While sleeping the maid only listens for the wake word. Once awake every
//! line is either a session command (`help`, `sleep`, `thinking`, ...) or a
//! request handed to the [`Assistant`]. Ctrl-C (the cancellation token) or
//! end of input ends the session from either state.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use sakura_core::MaidAgent;
use sakura_voice::{VoiceError, VoiceInput};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::art;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";
const WAKE_FRAME_DELAY: Duration = Duration::from_millis(500);
const SLEEP_DELAY: Duration = Duration::from_secs(2);

/// What the session needs from the agent.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn respond(&self, input: &str) -> String;

    fn is_thinking(&self) -> bool;

    /// Flip thinking mode and return the new state.
    fn toggle_thinking(&self) -> bool;

    /// `(name, description)` of every tool.
    fn tools(&self) -> Vec<(String, String)>;
}

#[async_trait]
impl Assistant for MaidAgent {
    async fn respond(&self, input: &str) -> String {
        self.process(input).await
    }

    fn is_thinking(&self) -> bool {
        MaidAgent::is_thinking(self)
    }

    fn toggle_thinking(&self) -> bool {
        MaidAgent::toggle_thinking(self)
    }

    fn tools(&self) -> Vec<(String, String)> {
        MaidAgent::tools(self).describe()
    }
}

/// Records speech until `stop` fires and returns the transcript.
#[async_trait]
pub trait Listener: Send + Sync {
    async fn listen(&self, stop: oneshot::Receiver<()>) -> Result<String, VoiceError>;
}

#[async_trait]
impl Listener for VoiceInput {
    async fn listen(&self, stop: oneshot::Receiver<()>) -> Result<String, VoiceError> {
        VoiceInput::listen(self, stop).await
    }
}

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Sleeping,
    Awake,
}

/// Presentation settings.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub name: String,
    pub wake_word: String,
    /// Screen clearing, wake animation, delays and "Press Enter" pauses.
    pub animations: bool,
}

/// What one awake-state line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleThinking,
    Sleep,
    Help,
    Voice,
    Tools,
    Empty,
    Request(String),
}

impl Command {
    /// Classify a line. Keywords match case-insensitively on the trimmed text.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Self::Empty,
            "quit" | "exit" | "bye" => Self::Quit,
            "thinking" | "think" | "debug" => Self::ToggleThinking,
            "sleep" | "rest" => Self::Sleep,
            "help" => Self::Help,
            "voice" | "listen" => Self::Voice,
            "tools" => Self::Tools,
            _ => Self::Request(trimmed.to_string()),
        }
    }
}

/// Whether `line` contains the wake word (case-insensitive).
pub fn is_wake(line: &str, wake_word: &str) -> bool {
    let wake = wake_word.trim().to_lowercase();
    !wake.is_empty() && line.trim().to_lowercase().contains(&wake)
}

enum Flow {
    Continue,
    End,
}

/// Outcome of one voice take.
enum VoiceTurn {
    Heard(String),
    Nothing,
    Cancelled,
}

pub struct Session<'a> {
    assistant: &'a dyn Assistant,
    listener: Option<&'a dyn Listener>,
    settings: SessionSettings,
    cancel: CancellationToken,
    state: State,
}

impl<'a> Session<'a> {
    pub fn new(assistant: &'a dyn Assistant, settings: SessionSettings) -> Self {
        Self {
            assistant,
            listener: None,
            settings,
            cancel: CancellationToken::new(),
            state: State::Sleeping,
        }
    }

    /// Enable the `voice` command.
    pub fn with_listener(mut self, listener: &'a dyn Listener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Run until quit, end of input or cancellation.
    pub async fn run<R, W>(&mut self, reader: &mut R, writer: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        info!(name = %self.settings.name, "session started");
        loop {
            let flow = match self.state {
                State::Sleeping => self.sleeping(reader, writer).await?,
                State::Awake => self.awake(reader, writer).await?,
            };
            if let Flow::End = flow {
                break;
            }
        }
        writer.flush().await?;
        info!("session ended");
        Ok(())
    }

    async fn sleeping<R, W>(&mut self, reader: &mut R, writer: &mut W) -> io::Result<Flow>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        self.clear(writer).await?;
        let s = &self.settings;
        writer
            .write_all(art::sleeping(&s.name, &s.wake_word).as_bytes())
            .await?;
        writer
            .write_all(
                format!(
                    "Type '{}' to wake her up, 'quit' to exit, or 'help' for commands\n",
                    s.wake_word
                )
                .as_bytes(),
            )
            .await?;
        writer.flush().await?;

        loop {
            let Some(line) = self.read_line(reader).await? else {
                return self.farewell(writer).await;
            };
            if is_wake(&line, &self.settings.wake_word) {
                debug!("wake word heard");
                self.wake_animation(writer).await?;
                self.state = State::Awake;
                return Ok(Flow::Continue);
            }
            if Command::parse(&line) == Command::Quit {
                return self.goodbye(writer).await;
            }
        }
    }

    async fn awake<R, W>(&mut self, reader: &mut R, writer: &mut W) -> io::Result<Flow>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        self.clear(writer).await?;
        writer
            .write_all(art::awake(&self.settings.name, "What can I do?").as_bytes())
            .await?;
        writer.write_all(b"Master: ").await?;
        writer.flush().await?;

        let Some(line) = self.read_line(reader).await? else {
            return self.farewell(writer).await;
        };

        match Command::parse(&line) {
            Command::Quit => return self.goodbye(writer).await,
            Command::ToggleThinking => {
                let status = if self.assistant.toggle_thinking() {
                    "enabled"
                } else {
                    "disabled"
                };
                self.say(writer, &format!("Thinking mode is now {status}!"))
                    .await?;
                self.pause(reader, writer).await?;
            }
            Command::Sleep => {
                self.say(writer, "Good night Master! Call me when you need me... 💤")
                    .await?;
                writer.flush().await?;
                self.delay(SLEEP_DELAY).await;
                self.state = State::Sleeping;
            }
            Command::Help => {
                self.help(writer).await?;
                self.pause(reader, writer).await?;
            }
            Command::Tools => {
                writer.write_all("\n🧰 My tools:\n".as_bytes()).await?;
                for (name, description) in self.assistant.tools() {
                    writer
                        .write_all(format!("  • {name}: {description}\n").as_bytes())
                        .await?;
                }
                self.pause(reader, writer).await?;
            }
            Command::Voice => match self.listener {
                Some(listener) => {
                    match self.record(listener, reader, writer).await? {
                        VoiceTurn::Heard(transcript) => {
                            if !self.request(writer, &transcript).await? {
                                return Ok(Flow::End);
                            }
                        }
                        VoiceTurn::Nothing => {}
                        VoiceTurn::Cancelled => return self.farewell(writer).await,
                    }
                    self.pause(reader, writer).await?;
                }
                None => {
                    self.say(
                        writer,
                        "Voice input is not enabled, Master. Start me with --voice! 🎙️",
                    )
                    .await?;
                    self.pause(reader, writer).await?;
                }
            },
            Command::Empty => {}
            Command::Request(text) => {
                if !self.request(writer, &text).await? {
                    return Ok(Flow::End);
                }
                self.pause(reader, writer).await?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Hand `text` to the assistant. Returns `false` when cancelled.
    async fn request<W>(&self, writer: &mut W, text: &str) -> io::Result<bool>
    where
        W: AsyncWrite + Unpin + Send,
    {
        writer.write_all("\n🤔 Thinking...\n".as_bytes()).await?;
        writer.flush().await?;
        let reply = tokio::select! {
            reply = self.assistant.respond(text) => reply,
            () = self.cancel.cancelled() => {
                self.farewell(writer).await?;
                return Ok(false);
            }
        };
        self.say(writer, &reply).await?;
        Ok(true)
    }

    /// Record until Master presses Enter.
    async fn record<R, W>(
        &self,
        listener: &dyn Listener,
        reader: &mut R,
        writer: &mut W,
    ) -> io::Result<VoiceTurn>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        writer
            .write_all(
                "\n🎤 I am listening, Master... Press Enter when you are finished speaking.\n"
                    .as_bytes(),
            )
            .await?;
        writer.flush().await?;

        let (stop, rx) = oneshot::channel();
        let listening = listener.listen(rx);
        tokio::pin!(listening);

        let mut line = String::new();
        let result = tokio::select! {
            biased;
            // Capture failed before Master finished.
            early = &mut listening => early,
            () = self.cancel.cancelled() => {
                let _ = stop.send(());
                debug!("recording cancelled");
                return Ok(VoiceTurn::Cancelled);
            }
            read = reader.read_line(&mut line) => {
                read?;
                let _ = stop.send(());
                writer
                    .write_all("✅ Recording finished.\n🧠 Transcribing audio...\n".as_bytes())
                    .await?;
                writer.flush().await?;
                listening.await
            }
        };

        match result {
            Ok(text) if !text.trim().is_empty() => {
                let text = text.trim().to_string();
                writer
                    .write_all(format!("🎙️ You said: {text}\n").as_bytes())
                    .await?;
                Ok(VoiceTurn::Heard(text))
            }
            Ok(_) => {
                self.say(writer, "Sorry Master, I didn't catch that... 🙏")
                    .await?;
                Ok(VoiceTurn::Nothing)
            }
            Err(e) => {
                warn!(error = %e, "voice input failed");
                writer
                    .write_all(format!("❌ Error during transcription: {e}\n").as_bytes())
                    .await?;
                Ok(VoiceTurn::Nothing)
            }
        }
    }

    async fn help<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.clear(writer).await?;
        let mut text = art::awake(&self.settings.name, "Help Menu");
        text.push_str("\n💭 I can help you with:\n");
        for line in [
            "  🔍 Internet searches",
            "  🎵 Playing music on Spotify",
            "  📁 Searching in files (grep)",
            "  💻 Checking system processes",
            "  ℹ️  Getting system information",
            "  🐚 Executing shell commands",
            "  🧠 Toggle thinking mode (type 'thinking')",
            "  🧰 Listing my tools (type 'tools')",
        ] {
            text.push_str(line);
            text.push('\n');
        }
        if self.listener.is_some() {
            text.push_str("  🎙️ Voice input (type 'voice')\n");
        }
        text.push_str("  💤 Going to sleep\n");
        text.push_str("  💬 General conversation\n");
        let status = if self.assistant.is_thinking() { "ON" } else { "OFF" };
        text.push_str(&format!("  🔧 Debug mode: {status}\n"));
        writer.write_all(text.as_bytes()).await
    }

    /// `🌸 <name>: <text>`
    async fn say<W>(&self, writer: &mut W, text: &str) -> io::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        writer
            .write_all(format!("\n🌸 {}: {text}\n", self.settings.name).as_bytes())
            .await
    }

    async fn goodbye<W>(&self, writer: &mut W) -> io::Result<Flow>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.clear(writer).await?;
        writer.write_all(art::goodbye().as_bytes()).await?;
        Ok(Flow::End)
    }

    async fn farewell<W>(&self, writer: &mut W) -> io::Result<Flow>
    where
        W: AsyncWrite + Unpin + Send,
    {
        writer.write_all("\n\nGoodbye Master! 👋\n".as_bytes()).await?;
        Ok(Flow::End)
    }

    async fn wake_animation<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        if !self.settings.animations {
            return Ok(());
        }
        for frame in art::wake_frames() {
            self.clear(writer).await?;
            writer.write_all(frame.as_bytes()).await?;
            writer.flush().await?;
            self.delay(WAKE_FRAME_DELAY).await;
        }
        Ok(())
    }

    async fn pause<R, W>(&self, reader: &mut R, writer: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        if !self.settings.animations {
            return Ok(());
        }
        writer.write_all(b"\nPress Enter to continue...").await?;
        writer.flush().await?;
        self.read_line(reader).await?;
        Ok(())
    }

    async fn clear<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        if self.settings.animations {
            writer.write_all(CLEAR_SCREEN.as_bytes()).await?;
        }
        Ok(())
    }

    async fn delay(&self, duration: Duration) {
        if self.settings.animations {
            tokio::select! {
                () = tokio::time::sleep(duration) => {}
                () = self.cancel.cancelled() => {}
            }
        }
    }

    /// Next line without its terminator; `None` on end of input or cancellation.
    async fn read_line<R>(&self, reader: &mut R) -> io::Result<Option<String>>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        if self.cancel.is_cancelled() {
            return Ok(None);
        }
        let mut line = String::new();
        tokio::select! {
            read = reader.read_line(&mut line) => {
                if read? == 0 {
                    Ok(None)
                } else {
                    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
                }
            }
            () = self.cancel.cancelled() => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeAssistant {
        thinking: AtomicBool,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Assistant for FakeAssistant {
        async fn respond(&self, input: &str) -> String {
            self.seen.lock().unwrap().push(input.to_string());
            format!("Of course, Master! ({input})")
        }

        fn is_thinking(&self) -> bool {
            self.thinking.load(Ordering::Relaxed)
        }

        fn toggle_thinking(&self) -> bool {
            !self.thinking.fetch_xor(true, Ordering::Relaxed)
        }

        fn tools(&self) -> Vec<(String, String)> {
            vec![("get_system_info".into(), "System details.".into())]
        }
    }

    /// Waits for the stop signal, then "hears" a fixed phrase.
    struct FakeListener(&'static str);

    #[async_trait]
    impl Listener for FakeListener {
        async fn listen(&self, stop: oneshot::Receiver<()>) -> Result<String, VoiceError> {
            let _ = stop.await;
            Ok(self.0.to_string())
        }
    }

    struct BrokenMic;

    #[async_trait]
    impl Listener for BrokenMic {
        async fn listen(&self, _stop: oneshot::Receiver<()>) -> Result<String, VoiceError> {
            Err(VoiceError::NoDevice("no default input device available".into()))
        }
    }

    /// Hands the stop signal to a background task and never finishes.
    #[derive(Default)]
    struct StuckMic {
        stopped: Mutex<Option<tokio::task::JoinHandle<bool>>>,
    }

    #[async_trait]
    impl Listener for StuckMic {
        async fn listen(&self, stop: oneshot::Receiver<()>) -> Result<String, VoiceError> {
            let handle = tokio::spawn(async move { stop.await.is_ok() });
            *self.stopped.lock().unwrap() = Some(handle);
            std::future::pending().await
        }
    }

    fn settings() -> SessionSettings {
        SessionSettings {
            name: "Sakura".into(),
            wake_word: "maid".into(),
            animations: false,
        }
    }

    async fn drive(session: &mut Session<'_>, input: &str) -> String {
        let mut reader = input.as_bytes();
        let mut out = Vec::new();
        session.run(&mut reader, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Feed `input` over a pipe that stays open, then cancel after `after`.
    async fn drive_then_cancel(
        session: &mut Session<'_>,
        cancel: CancellationToken,
        input: &str,
        after: Duration,
    ) -> String {
        let (mut keyboard, stdin) = tokio::io::duplex(1024);
        keyboard.write_all(input.as_bytes()).await.unwrap();
        let mut reader = tokio::io::BufReader::new(stdin);
        let mut out = Vec::new();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            cancel.cancel();
        });
        tokio::time::timeout(Duration::from_secs(5), session.run(&mut reader, &mut out))
            .await
            .expect("session should stop once cancelled")
            .unwrap();
        drop(keyboard);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn command_parsing() {
        assert_eq!(Command::parse("  QUIT "), Command::Quit);
        assert_eq!(Command::parse("Bye"), Command::Quit);
        assert_eq!(Command::parse("debug"), Command::ToggleThinking);
        assert_eq!(Command::parse("rest"), Command::Sleep);
        assert_eq!(Command::parse("Listen"), Command::Voice);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(
            Command::parse(" what time is it? "),
            Command::Request("what time is it?".into())
        );
    }

    #[test]
    fn wake_word_matching() {
        assert!(is_wake("Hey MAID, wake up", "maid"));
        assert!(is_wake("maiden", "maid"));
        assert!(!is_wake("hello", "maid"));
        assert!(!is_wake("anything", "  "));
    }

    #[tokio::test]
    async fn ignores_input_until_wake_word() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(&assistant, settings());
        let out = drive(&mut session, "hello\nplease\nmaid\nhi there\nquit\n").await;

        assert_eq!(*assistant.seen.lock().unwrap(), vec!["hi there"]);
        assert!(out.contains("Sakura is sleeping"));
        assert!(out.contains("🌸 Sakura: Of course, Master! (hi there)"));
        assert!(out.contains("Goodbye Master!"));
    }

    #[tokio::test]
    async fn eof_while_sleeping_ends() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(&assistant, settings());
        let out = drive(&mut session, "zzz\n").await;
        assert!(out.ends_with("Goodbye Master! 👋\n"));
        assert_eq!(session.state(), State::Sleeping);
    }

    #[tokio::test]
    async fn eof_while_awake_says_goodbye() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(&assistant, settings());
        let out = drive(&mut session, "maid\n").await;
        assert!(out.contains("Master: "));
        assert!(out.ends_with("Goodbye Master! 👋\n"));
        assert_eq!(session.state(), State::Awake);
    }

    #[tokio::test]
    async fn thinking_toggle_round_trip() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(&assistant, settings());
        let out = drive(&mut session, "maid\nthinking\nhelp\nTHINK\nexit\n").await;
        assert!(out.contains("🌸 Sakura: Thinking mode is now enabled!"));
        assert!(out.contains("🔧 Debug mode: ON"));
        assert!(out.contains("🌸 Sakura: Thinking mode is now disabled!"));
        assert!(!assistant.is_thinking());
    }

    #[tokio::test]
    async fn sleep_returns_to_sleeping() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(&assistant, settings());
        let out = drive(&mut session, "maid\nsleep\nhow are you\n").await;
        assert!(out.contains("Good night Master! Call me when you need me... 💤"));
        assert!(assistant.seen.lock().unwrap().is_empty());
        assert_eq!(session.state(), State::Sleeping);
        assert_eq!(out.matches("is sleeping").count(), 2);
    }

    #[tokio::test]
    async fn tools_are_listed() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(&assistant, settings());
        let out = drive(&mut session, "maid\ntools\nquit\n").await;
        assert!(out.contains("  • get_system_info: System details."));
    }

    #[tokio::test]
    async fn voice_transcript_becomes_request() {
        let assistant = FakeAssistant::default();
        let listener = FakeListener("play bad apple");
        let mut session = Session::new(&assistant, settings()).with_listener(&listener);
        let out = drive(&mut session, "maid\nvoice\n\nquit\n").await;
        assert!(out.contains("🎤 I am listening, Master..."));
        assert!(out.contains("🎙️ You said: play bad apple"));
        assert_eq!(*assistant.seen.lock().unwrap(), vec!["play bad apple"]);
        assert!(out.contains("Goodbye Master!"));
    }

    #[tokio::test]
    async fn voice_failure_is_reported() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(&assistant, settings()).with_listener(&BrokenMic);
        let out = drive(&mut session, "maid\nlisten\nquit\n").await;
        assert!(out.contains("❌ Error during transcription: no input device"));
        assert!(assistant.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn voice_disabled_message() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(&assistant, settings());
        let out = drive(&mut session, "maid\nvoice\nquit\n").await;
        assert!(out.contains("Voice input is not enabled"));
    }

    #[tokio::test]
    async fn quit_while_sleeping() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(&assistant, settings());
        let out = drive(&mut session, "exit\nmaid\n").await;
        assert!(out.contains("See you later!"));
        assert_eq!(session.state(), State::Sleeping);
    }

    #[tokio::test]
    async fn cancelled_session_stops_reading() {
        let assistant = FakeAssistant::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut session = Session::new(&assistant, settings()).with_cancel(cancel);
        let out = drive(&mut session, "maid\nhello\n").await;
        assert!(out.ends_with("Goodbye Master! 👋\n"));
        assert!(assistant.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_while_waiting_for_input() {
        let assistant = FakeAssistant::default();
        let cancel = CancellationToken::new();
        let mut session = Session::new(&assistant, settings()).with_cancel(cancel.clone());
        let out =
            drive_then_cancel(&mut session, cancel, "maid\n", Duration::from_millis(100)).await;
        assert!(out.contains("Master: "));
        assert!(out.ends_with("Goodbye Master! 👋\n"));
        assert_eq!(session.state(), State::Awake);
    }

    #[tokio::test]
    async fn cancel_while_sleeping() {
        let assistant = FakeAssistant::default();
        let cancel = CancellationToken::new();
        let mut session = Session::new(&assistant, settings()).with_cancel(cancel.clone());
        let out =
            drive_then_cancel(&mut session, cancel, "hello\n", Duration::from_millis(100)).await;
        assert!(out.ends_with("Goodbye Master! 👋\n"));
        assert_eq!(session.state(), State::Sleeping);
    }

    #[tokio::test]
    async fn cancel_while_recording_stops_the_mic() {
        let assistant = FakeAssistant::default();
        let mic = StuckMic::default();
        let cancel = CancellationToken::new();
        let mut session = Session::new(&assistant, settings())
            .with_listener(&mic)
            .with_cancel(cancel.clone());
        let out = drive_then_cancel(
            &mut session,
            cancel,
            "maid\nvoice\n",
            Duration::from_millis(150),
        )
        .await;

        assert!(out.contains("🎤 I am listening, Master..."));
        assert!(!out.contains("Transcribing"));
        assert!(out.ends_with("Goodbye Master! 👋\n"));
        assert!(assistant.seen.lock().unwrap().is_empty());

        let handle = mic.stopped.lock().unwrap().take().expect("mic was started");
        assert!(handle.await.unwrap(), "stop signal should be sent");
    }

    #[tokio::test]
    async fn animations_add_pause_and_clear() {
        let assistant = FakeAssistant::default();
        let mut session = Session::new(
            &assistant,
            SessionSettings {
                animations: true,
                ..settings()
            },
        );
        tokio::time::pause();
        let out = drive(&mut session, "maid\nhello\n\nquit\n").await;
        assert!(out.contains(CLEAR_SCREEN));
        assert!(out.contains("Ready to serve!"));
        assert!(out.contains("Press Enter to continue..."));
        assert_eq!(*assistant.seen.lock().unwrap(), vec!["hello"]);
    }
}
