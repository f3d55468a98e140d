use matchvision_models::ChatMessage;

pub const GREETING: &str = "Hey! I'm **MatchVision AI** ⚽ — ask me anything about football: match predictions, player stats, team tactics, transfer news, or anything else!";
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again.";

// At most one assistant reply is in progress, rewritten in place while streaming
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    // Transcript length when the reply began; an entry past it is the live reply
    reply_base: Option<usize>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            reply_base: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn is_replying(&self) -> bool {
        self.reply_base.is_some()
    }

    pub fn begin_reply(&mut self) {
        self.reply_base = Some(self.messages.len());
    }

    pub fn update_reply(&mut self, so_far: &str) {
        let len = self.messages.len();
        let base = *self.reply_base.get_or_insert(len);
        match self.messages.last_mut() {
            Some(last) if last.is_assistant() && len > base => {
                last.content.clear();
                last.content.push_str(so_far);
            }
            _ => self.messages.push(ChatMessage::assistant(so_far)),
        }
    }

    pub fn finish_reply(&mut self) {
        self.reply_base = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchvision_models::ChatRole;

    #[test]
    fn test_first_fragment_appends_then_updates_in_place() {
        let mut transcript = ChatTranscript::with_greeting();
        transcript.push(ChatMessage::user("Who wins?"));
        transcript.begin_reply();

        transcript.update_reply("Ars");
        assert_eq!(transcript.len(), 3);
        transcript.update_reply("Arsenal");
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.last().unwrap().content, "Arsenal");
        assert_eq!(transcript.last().unwrap().role, ChatRole::Assistant);
    }

    #[test]
    fn test_greeting_is_never_overwritten() {
        let mut transcript = ChatTranscript::with_greeting();
        transcript.begin_reply();
        transcript.update_reply("new reply");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].content, GREETING);
    }

    #[test]
    fn test_finished_reply_is_frozen() {
        let mut transcript = ChatTranscript::new();
        transcript.push(ChatMessage::user("one"));
        transcript.begin_reply();
        transcript.update_reply("first");
        transcript.finish_reply();
        assert!(!transcript.is_replying());

        transcript.push(ChatMessage::user("two"));
        transcript.begin_reply();
        transcript.update_reply("second");

        let contents: Vec<&str> = transcript.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "first", "two", "second"]);
    }
}
