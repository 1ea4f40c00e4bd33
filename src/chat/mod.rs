//! Chat transcript with delayed, request-ordered replies.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;

use crate::config::ChatConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

/// Transcript of one chat session.
///
/// Every submitted query gets a sequence number. Replies may complete in any
/// order but are appended strictly in the order their queries were asked.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_seq: u64,
    next_reply: u64,
    completed: BTreeMap<u64, String>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user query and return the sequence number its reply must carry.
    pub fn submit(&mut self, text: impl Into<String>) -> u64 {
        self.push(Speaker::User, text.into());
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Hand in a finished reply. Returns how many replies became visible.
    pub fn deliver(&mut self, seq: u64, text: impl Into<String>) -> usize {
        if seq < self.next_reply || seq >= self.next_seq {
            tracing::warn!(seq, "ignoring reply for unknown or already answered query");
            return 0;
        }
        self.completed.insert(seq, text.into());

        let mut released = 0;
        while let Some(text) = self.completed.remove(&self.next_reply) {
            self.push(Speaker::Assistant, text);
            self.next_reply += 1;
            released += 1;
        }
        released
    }

    /// Queries still waiting for their reply to be shown.
    pub fn pending(&self) -> usize {
        (self.next_seq - self.next_reply) as usize
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.messages.push(ChatMessage {
            speaker,
            text,
            timestamp: chrono::Local::now(),
        });
    }
}

/// Cosmetic "thinking" pause before a reply is produced.
pub fn typing_delay(config: &ChatConfig, rng: &mut impl Rng) -> Duration {
    let ms = rng.gen_range(config.typing_delay_min_ms..=config.typing_delay_max_ms);
    Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn transcript(log: &ChatLog) -> Vec<(Speaker, &str)> {
        log.messages()
            .iter()
            .map(|m| (m.speaker, m.text.as_str()))
            .collect()
    }

    #[test]
    fn in_order_replies_show_immediately() {
        let mut log = ChatLog::new();
        let seq = log.submit("hello");
        assert_eq!(log.pending(), 1);

        assert_eq!(log.deliver(seq, "hi"), 1);
        assert_eq!(log.pending(), 0);
        assert_eq!(
            transcript(&log),
            vec![(Speaker::User, "hello"), (Speaker::Assistant, "hi")]
        );
    }

    #[test]
    fn early_reply_waits_for_earlier_query() {
        let mut log = ChatLog::new();
        let first = log.submit("first");
        let second = log.submit("second");

        assert_eq!(log.deliver(second, "answer two"), 0);
        assert_eq!(log.messages().len(), 2);
        assert_eq!(log.pending(), 2);

        assert_eq!(log.deliver(first, "answer one"), 2);
        assert_eq!(
            transcript(&log),
            vec![
                (Speaker::User, "first"),
                (Speaker::User, "second"),
                (Speaker::Assistant, "answer one"),
                (Speaker::Assistant, "answer two"),
            ]
        );
        assert_eq!(log.pending(), 0);
    }

    #[test]
    fn unknown_and_duplicate_replies_are_ignored() {
        let mut log = ChatLog::new();
        assert_eq!(log.deliver(0, "nobody asked"), 0);

        let seq = log.submit("q");
        assert_eq!(log.deliver(seq, "a"), 1);
        assert_eq!(log.deliver(seq, "a again"), 0);
        assert_eq!(log.messages().len(), 2);
    }

    #[test]
    fn typing_delay_stays_in_configured_range() {
        let config = ChatConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            let delay = typing_delay(&config, &mut rng);
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(2000));
        }

        let fixed = ChatConfig {
            typing_delay_min_ms: 250,
            typing_delay_max_ms: 250,
        };
        assert_eq!(typing_delay(&fixed, &mut rng), Duration::from_millis(250));
    }
}
