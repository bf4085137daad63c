//! Conversation pipeline
//!
//! Owns the message timeline for one conversation. A submitted message is
//! answered from the canned table when possible, otherwise by one completion
//! request through the injected transport. Whatever happens upstream, each
//! accepted user message gets exactly one assistant reply, and only one turn
//! is in flight at a time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::api::{ChatMessage, ChatRequest};
use crate::core::canned::CannedReplyTable;
use crate::core::config::ChatConfig;
use crate::core::message::{Message, MessageIdGenerator};
use crate::core::timeline::Timeline;
use crate::core::transport::{CompletionTransport, TransportError};


/// Reply appended when the completion request fails for any reason.
pub const FALLBACK_REPLY: &str = "抱歉，我现在无法回应。请稍后再试。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Submitted,
    CannedHit,
    Dispatched,
    Resolved,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    MessageAppended(Message),
    AwaitingReply(bool),
}

/// Request parameters for dispatched turns.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub stream: bool,
    pub system_prompt: String,
    pub include_history: bool,
    pub timeout: Duration,
}

impl CompletionSettings {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            stream: config.stream,
            system_prompt: config.system_prompt.clone(),
            include_history: config.include_history,
            timeout: config.timeout(),
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

/// Resolves to the assistant message that closes the submitted turn.
#[derive(Debug)]
pub struct ReplyHandle {
    rx: oneshot::Receiver<Message>,
}

impl ReplyHandle {
    pub async fn reply(self) -> Option<Message> {
        self.rx.await.ok()
    }
}

struct PipelineState {
    timeline: Timeline,
    awaiting_reply: bool,
    phase: TurnPhase,
}

struct Shared {
    state: Mutex<PipelineState>,
    ids: MessageIdGenerator,
    events: mpsc::UnboundedSender<PipelineEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter_phase(&self, phase: TurnPhase) {
        debug!(?phase, "turn phase");
        self.lock().phase = phase;
    }

    /// Append the assistant reply and return to idle. Events are sent under
    /// the lock so their order matches the timeline.
    fn finish_turn(&self, text: String, outcome: TurnPhase) -> Message {
        let mut state = self.lock();
        let message = Message::assistant(&self.ids, text);
        state.timeline.push(message.clone());
        debug!(phase = ?outcome, "turn phase");
        state.awaiting_reply = false;
        state.phase = TurnPhase::Idle;
        let _ = self
            .events
            .send(PipelineEvent::MessageAppended(message.clone()));
        let _ = self.events.send(PipelineEvent::AwaitingReply(false));
        message
    }
}

#[derive(Clone)]
pub struct ConversationPipeline {
    shared: Arc<Shared>,
    transport: Arc<dyn CompletionTransport>,
    replies: Arc<CannedReplyTable>,
    settings: Arc<CompletionSettings>,
}

impl ConversationPipeline {
    /// Build a pipeline and the receiver for its events.
    ///
    /// The event channel is unbounded. Callers that render from events must
    /// keep draining the receiver; callers that only use [`ReplyHandle`]s or
    /// [`timeline`](Self::timeline) should drop it, after which events are
    /// discarded.
    pub fn new(
        transport: Arc<dyn CompletionTransport>,
        replies: Arc<CannedReplyTable>,
        settings: CompletionSettings,
    ) -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            state: Mutex::new(PipelineState {
                timeline: Timeline::new(),
                awaiting_reply: false,
                phase: TurnPhase::Idle,
            }),
            ids: MessageIdGenerator::new(),
            events,
        });
        let pipeline = Self {
            shared,
            transport,
            replies,
            settings: Arc::new(settings),
        };
        (pipeline, rx)
    }

    /// Submit user text.
    ///
    /// Returns `None` without touching the timeline when the trimmed text is
    /// empty or a reply is still pending. Canned replies are appended before
    /// this returns; other replies are resolved on a spawned task, so this
    /// must be called from within a Tokio runtime.
    pub fn submit(&self, text: &str) -> Option<ReplyHandle> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring empty submission");
            return None;
        }

        let history = {
            let mut state = self.shared.lock();
            if state.awaiting_reply {
                debug!("ignoring submission while a reply is pending");
                return None;
            }
            let history = if self.settings.include_history {
                state.timeline.as_api_messages()
            } else {
                Vec::new()
            };
            let message = Message::user(&self.shared.ids, text);
            state.timeline.push(message.clone());
            state.awaiting_reply = true;
            state.phase = TurnPhase::Submitted;
            let _ = self.shared.events.send(PipelineEvent::MessageAppended(message));
            let _ = self.shared.events.send(PipelineEvent::AwaitingReply(true));
            history
        };

        let (tx, rx) = oneshot::channel();

        if let Some(canned) = self.replies.lookup(text) {
            self.shared.enter_phase(TurnPhase::CannedHit);
            let reply = self
                .shared
                .finish_turn(canned.to_string(), TurnPhase::Resolved);
            let _ = tx.send(reply);
            return Some(ReplyHandle { rx });
        }

        let request = self.build_request(history, text);
        self.shared.enter_phase(TurnPhase::Dispatched);

        let shared = Arc::clone(&self.shared);
        let transport = Arc::clone(&self.transport);
        let timeout = self.settings.timeout;
        tokio::spawn(async move {
            // The call runs on its own task so a panicking transport still
            // ends the turn.
            let call = tokio::spawn(async move {
                match tokio::time::timeout(timeout, transport.complete(&request)).await {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout(timeout)),
                }
            });
            let reply = match call.await {
                Ok(Ok(text)) => shared.finish_turn(text, TurnPhase::Resolved),
                Ok(Err(err)) => {
                    warn!(error = %err, "completion failed, replying with fallback");
                    shared.finish_turn(FALLBACK_REPLY.to_string(), TurnPhase::Failed)
                }
                Err(err) => {
                    warn!(error = %err, "completion task aborted, replying with fallback");
                    shared.finish_turn(FALLBACK_REPLY.to_string(), TurnPhase::Failed)
                }
            };
            let _ = tx.send(reply);
        });

        Some(ReplyHandle { rx })
    }

    fn build_request(&self, history: Vec<ChatMessage>, text: &str) -> ChatRequest {
        let settings = &self.settings;
        let mut messages = Vec::with_capacity(history.len() + 2);
        if !settings.system_prompt.trim().is_empty() {
            messages.push(ChatMessage::system(settings.system_prompt.clone()));
        }
        messages.extend(history);
        messages.push(ChatMessage::user(text));

        ChatRequest {
            model: settings.model.clone(),
            messages,
            temperature: settings.temperature,
            stream: settings.stream,
        }
    }

    pub fn timeline(&self) -> Vec<Message> {
        self.shared.lock().timeline.snapshot()
    }

    pub fn len(&self) -> usize {
        self.shared.lock().timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().timeline.is_empty()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.shared.lock().awaiting_reply
    }

    pub fn phase(&self) -> TurnPhase {
        self.shared.lock().phase
    }
}
