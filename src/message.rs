// SPDX-License-Identifier: AGPL-3.0-or-later

/// One line of input bound for a topic. The partition is left to the
/// client, so there is no partition field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl OutboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Returns `None` for an empty line; those are never produced.
    pub fn from_line(topic: &str, line: String) -> Option<Self> {
        if line.is_empty() {
            return None;
        }
        Some(Self::new(topic, line.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_is_not_a_message() {
        assert_eq!(OutboundMessage::from_line("t", String::new()), None);
    }

    #[test]
    fn line_becomes_payload() {
        let msg = OutboundMessage::from_line("t", "hello".to_string()).unwrap();
        assert_eq!(msg.topic, "t");
        assert_eq!(msg.payload, b"hello");
    }
}
