use std::collections::VecDeque;
use std::future::Future;

use matchvision_models::{ChatMessage, ChatRequest};
use reqwest::{Client, Response};
use thiserror::Error;
use tracing::{debug, error};

use crate::decoder::SseDecoder;
use crate::transcript::{ChatTranscript, FALLBACK_REPLY};

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Stream failed with status {0}")]
    Status(u16),

    #[error("Stream transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

// Ok(None) marks the end of the stream
pub trait ChunkSource {
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, ChatError>>;
}

impl ChunkSource for Response {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, ChatError> {
        Ok(self.chunk().await?.map(|bytes| bytes.to_vec()))
    }
}

impl ChunkSource for VecDeque<Vec<u8>> {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, ChatError> {
        Ok(self.pop_front())
    }
}

// Ends at transport completion or `data: [DONE]`, whichever comes first
pub async fn stream_reply<S, F>(
    source: &mut S,
    transcript: &mut ChatTranscript,
    mut on_update: F,
) -> Result<String, ChatError>
where
    S: ChunkSource,
    F: FnMut(&ChatTranscript),
{
    let mut decoder = SseDecoder::new();
    let mut assistant_so_far = String::new();

    while !decoder.is_done() {
        let Some(chunk) = source.next_chunk().await? else {
            break;
        };
        for fragment in decoder.push(&chunk) {
            assistant_so_far.push_str(&fragment);
            transcript.update_reply(&assistant_so_far);
            on_update(transcript);
        }
    }

    Ok(assistant_so_far)
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    url: String,
    public_key: String,
}

impl ChatClient {
    pub fn new(client: Client, url: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            public_key: public_key.into(),
        }
    }

    pub async fn open(&self, messages: &[ChatMessage]) -> Result<Response, ChatError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.public_key)
            .json(&ChatRequest { messages: messages.to_vec() })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

pub struct ChatSession {
    client: ChatClient,
    transcript: ChatTranscript,
    loading: bool,
}

impl ChatSession {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            transcript: ChatTranscript::with_greeting(),
            loading: false,
        }
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn send(&mut self, input: &str) -> bool {
        self.send_with_updates(input, |_| {}).await
    }

    // Failures never escape; they become a fallback assistant message
    pub async fn send_with_updates<F>(&mut self, input: &str, on_update: F) -> bool
    where
        F: FnMut(&ChatTranscript),
    {
        let input = input.trim();
        if input.is_empty() || self.loading {
            return false;
        }

        self.transcript.push(ChatMessage::user(input));
        self.transcript.begin_reply();
        self.loading = true;

        let result = match self.client.open(self.transcript.messages()).await {
            Ok(mut response) => stream_reply(&mut response, &mut self.transcript, on_update).await,
            Err(e) => Err(e),
        };

        self.settle(result);
        true
    }

    // A failed reply keeps whatever streamed so far, then the fallback
    fn settle(&mut self, result: Result<String, ChatError>) {
        match result {
            Ok(reply) => debug!("💬 Assistant reply complete ({} chars)", reply.chars().count()),
            Err(e) => {
                error!("❌ Chat stream failed: {}", e);
                self.transcript.push(ChatMessage::assistant(FALLBACK_REPLY));
            }
        }

        self.transcript.finish_reply();
        self.loading = false;
    }
}
