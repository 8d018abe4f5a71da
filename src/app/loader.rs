use std::time::Duration;

/// How long each loading message stays on screen
pub const MESSAGE_INTERVAL: Duration = Duration::from_millis(2500);

pub const LOADING_MESSAGES: [&str; 5] = [
    "Scanning your ingredients...",
    "Consulting our gourmet AI chef...",
    "Dreaming up delicious recipes...",
    "Photographing the final dishes...",
    "Plating your suggestions now!",
];

/// Endless rotation through [`LOADING_MESSAGES`], starting at the first
#[derive(Debug, Clone, Default)]
pub struct LoadingMessages {
    index: usize,
}

impl LoadingMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static str {
        LOADING_MESSAGES[self.index]
    }
}

impl Iterator for LoadingMessages {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        let message = self.current();
        self.index = (self.index + 1) % LOADING_MESSAGES.len();
        Some(message)
    }
}
