//! Collapsing of consecutive duplicate messages

use super::format;

/// What to do with an incoming tagged message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Same as the previous message; counted, nothing queued
    Suppressed,
    /// New message; queue `summary` first if present, then the message itself
    Accepted { summary: Option<String> },
}

/// Last accepted message and how many identical ones followed it
#[derive(Debug, Default)]
pub struct DedupState {
    last_message: Option<String>,
    repeat_count: u32,
}

impl DedupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `tagged` is a repeat, updating the state either way
    pub fn admit(&mut self, tagged: &str) -> Admission {
        if self.last_message.as_deref() == Some(tagged) {
            self.repeat_count = self.repeat_count.saturating_add(1);
            return Admission::Suppressed;
        }

        let summary = self.take_summary();
        self.last_message = Some(tagged.to_string());
        Admission::Accepted { summary }
    }

    /// Pending repeat summary, if any suppressed duplicates are outstanding
    ///
    /// Resets the counter but keeps `last_message`, so a further identical message
    /// after this is still treated as a repeat.
    pub fn take_summary(&mut self) -> Option<String> {
        if self.repeat_count == 0 {
            return None;
        }
        let occurrences = self.repeat_count.saturating_add(1);
        self.repeat_count = 0;
        self.last_message
            .as_deref()
            .map(|last| format::repeated(occurrences, last))
    }

    /// Flush the pending summary and forget the last message
    pub fn finish(&mut self) -> Option<String> {
        let summary = self.take_summary();
        self.last_message = None;
        summary
    }

    #[cfg(test)]
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }
}
