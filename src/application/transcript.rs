//! # Transcript
//!
//! Append-only conversation history. The stored transcript is never pruned;
//! callers read it through a bounded [`Window`] of the most recent entries.

use crate::domain::types::{Message, Role};

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    pin_system: bool,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            pin_system: true,
        }
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript seeded with a single system message.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.append(Message::system(prompt));
        transcript
    }

    /// Whether a leading system message survives window truncation.
    pub fn pin_system(mut self, pin: bool) -> Self {
        self.pin_system = pin;
        self
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Slots a window always spends on the pinned system message (0 or 1).
    pub fn pinned_len(&self) -> usize {
        match self.messages.first() {
            Some(first) if self.pin_system && first.role == Role::System => 1,
            _ => 0,
        }
    }

    /// The last `max` entries.
    pub fn window(&self, max: usize) -> Window<'_> {
        self.window_until(self.messages.len(), max)
    }

    /// The last `max` entries among the first `end` ones.
    ///
    /// Lets a caller keep viewing the transcript as it was at a checkpoint
    /// while appending to it.
    pub fn window_until(&self, end: usize, max: usize) -> Window<'_> {
        let visible = &self.messages[..end.min(self.messages.len())];
        Window::over(visible, max, self.pin_system)
    }
}

/// Bounded, restartable view over a transcript.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pinned: Option<&'a Message>,
    tail: &'a [Message],
}

impl<'a> Window<'a> {
    fn over(messages: &'a [Message], max: usize, pin_system: bool) -> Self {
        if max == 0 {
            return Self {
                pinned: None,
                tail: &[],
            };
        }

        match messages.split_first() {
            Some((first, rest)) if pin_system && first.role == Role::System => Self {
                pinned: Some(first),
                tail: last(rest, max - 1),
            },
            _ => Self {
                pinned: None,
                tail: last(messages, max),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.pinned.is_some() as usize + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Message> + Clone + 'a {
        self.pinned.into_iter().chain(self.tail.iter())
    }

    pub fn to_vec(&self) -> Vec<Message> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for Window<'a> {
    type Item = &'a Message;
    type IntoIter =
        std::iter::Chain<std::option::IntoIter<&'a Message>, std::slice::Iter<'a, Message>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pinned.into_iter().chain(self.tail.iter())
    }
}

fn last(messages: &[Message], n: usize) -> &[Message] {
    &messages[messages.len().saturating_sub(n)..]
}
