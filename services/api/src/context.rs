//! Turns a [`DebateRequest`] into the message list sent to the model.
//!
//! Long debates are windowed: once the history passes [`MAX_CONTEXT_MESSAGES`]
//! the oldest turns are folded into a single summary message so the prompt
//! stays bounded while the model still sees where the debate started.

use crate::completion::ChatMessage;
use crate::prompts;
use debate_types::{DebateRequest, Turn};

pub const MAX_CONTEXT_MESSAGES: usize = 20;
const SUMMARY_PAIRS: usize = 5;
const PREVIEW_CHARS: usize = 100;

pub fn build_messages(request: &DebateRequest) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(prompts::SYSTEM_PROMPT)];

    if request.is_opening() {
        messages.push(ChatMessage::user(prompts::opening_message(
            request.topic(),
            request.initial_viewpoint(),
        )));
    } else {
        messages.push(ChatMessage::system(prompts::topic_context(
            request.topic(),
            request.initial_viewpoint(),
        )));
        messages.extend(window_history(
            request.history(),
            request.topic(),
            MAX_CONTEXT_MESSAGES,
        ));
    }
    messages
}

/// Keeps the last `max_messages - 2` turns and summarizes the rest.
pub fn window_history(history: &[Turn], topic: &str, max_messages: usize) -> Vec<ChatMessage> {
    if history.len() <= max_messages {
        return history.iter().map(ChatMessage::from).collect();
    }

    let keep = max_messages.saturating_sub(2).max(1);
    let (older, recent) = history.split_at(history.len() - keep);

    // A trailing unpaired turn is left out of the summary.
    let points: Vec<String> = older
        .chunks_exact(2)
        .map(|pair| {
            format!(
                "User: {}... | You: {}...",
                preview(pair[0].content()),
                preview(pair[1].content())
            )
        })
        .collect();
    let summary = points[points.len().saturating_sub(SUMMARY_PAIRS)..].join("\n");

    let mut messages = Vec::with_capacity(recent.len() + 1);
    messages.push(ChatMessage::system(prompts::summary_context(topic, &summary)));
    messages.extend(recent.iter().map(ChatMessage::from));
    messages
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
