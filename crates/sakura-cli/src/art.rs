//! ASCII art for the maid.

const SLEEPING: &str = r#"
    ╭─────────────────────────╮
    │   ～(￣▽￣)～ zzzZ...    │
    │        /|\              │
    │       / | \             │
    │      👗     👗          │
    │    {name} is sleeping
    │   Say '{wake}' to wake!
    ╰─────────────────────────╯
"#;

const AWAKE: &str = r#"
    ╭─────────────────────────╮
    │      (◕‿◕)✨           │
    │        /|\             │
    │       / | \            │
    │      👗     👗          │
    │   {name} at your
    │   service, Master!     │
    │                        │
    │   {message}   │
    ╰─────────────────────────╯
"#;

const WAKE_FRAMES: [&str; 3] = [
    r#"
    ╭─────────────────────────╮
    │      (￣o￣) !          │
    │        /|\             │
    │       / | \            │
    │      👗     👗          │
    │   *yawn* Waking up...   │
    ╰─────────────────────────╯
"#,
    r#"
    ╭─────────────────────────╮
    │      (◔_◔)             │
    │        /|\             │
    │       / | \            │
    │      👗     👗          │
    │   Getting ready...     │
    ╰─────────────────────────╯
"#,
    r#"
    ╭─────────────────────────╮
    │      (◕‿◕)✨           │
    │        /|\             │
    │       / | \            │
    │      👗     👗          │
    │   Ready to serve!      │
    ╰─────────────────────────╯
"#,
];

const GOODBYE: &str = r#"
    ╭─────────────────────────╮
    │      (◕‿◕)ﾉ            │
    │        /|\             │
    │       / | \            │
    │      👗     👗          │
    │   Goodbye Master!      │
    │   See you later! 💕    │
    ╰─────────────────────────╯
"#;

pub fn sleeping(name: &str, wake_word: &str) -> String {
    SLEEPING
        .replace("{name}", name)
        .replace("{wake}", wake_word)
}

/// Awake maid with `message` left-aligned in a 20-character slot.
pub fn awake(name: &str, message: &str) -> String {
    AWAKE
        .replace("{name}", name)
        .replace("{message}", &format!("{message:<20}"))
}

pub fn wake_frames() -> &'static [&'static str] {
    &WAKE_FRAMES
}

pub fn goodbye() -> &'static str {
    GOODBYE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleeping_mentions_wake_word() {
        let art = sleeping("Hana", "nyan");
        assert!(art.contains("Hana is sleeping"));
        assert!(art.contains("Say 'nyan' to wake!"));
    }

    #[test]
    fn awake_pads_message() {
        let art = awake("Sakura", "Help Menu");
        assert!(art.contains(&format!("│   {:<20}   │", "Help Menu")));
        assert!(art.contains("Sakura at your"));
    }

    #[test]
    fn three_wake_frames() {
        assert_eq!(wake_frames().len(), 3);
        assert!(wake_frames()[2].contains("Ready to serve!"));
        assert!(goodbye().contains("Goodbye Master!"));
    }
}
