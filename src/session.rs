//! Per-view conversational state: the transcript, the pending gate, and the
//! submit flow that drives one completion request per user turn.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::llm::CompletionClient;
use crate::message::Message;
use crate::prompt::compose_chat;
use crate::snapshot::NetworkSnapshot;
use crate::transcript::Transcript;

/// Appended in place of a reply when the request fails for any reason.
pub const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error. Please check your API key and try again.";

/// At-most-one-in-flight flag for a single session.
#[derive(Default, Clone)]
pub struct PendingGate {
    flag: Arc<AtomicBool>,
}

impl PendingGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Claims the gate. Returns `None` if a request is already in flight.
    /// The returned guard releases the gate on drop, so every exit path of
    /// the caller settles back to idle.
    pub fn acquire(&self) -> Option<PendingGuard> {
        self.flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| PendingGuard {
                flag: Arc::clone(&self.flag),
            })
    }
}

pub struct PendingGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// What happened to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input or a request already in flight; nothing changed.
    Ignored,
    /// The remote reply was appended to the transcript.
    Replied,
    /// The request failed; the fixed fallback message was appended instead.
    Fallback,
}

/// One conversational assistant view over a fixed network snapshot.
///
/// Each view owns an independent session; nothing is shared across views.
pub struct ChatSession {
    snapshot: NetworkSnapshot,
    transcript: Mutex<Transcript>,
    gate: PendingGate,
    client: Arc<dyn CompletionClient>,
}

impl ChatSession {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            snapshot: NetworkSnapshot::demo(),
            transcript: Mutex::new(Transcript::new()),
            gate: PendingGate::new(),
            client,
        }
    }

    pub fn with_snapshot(mut self, snapshot: NetworkSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }

    /// Snapshot of the transcript in display order.
    pub fn transcript(&self) -> Vec<Message> {
        self.transcript
            .lock()
            .expect("transcript poisoned")
            .iter()
            .cloned()
            .collect()
    }

    pub fn transcript_len(&self) -> usize {
        self.transcript.lock().expect("transcript poisoned").len()
    }

    /// Runs one user turn: append the user message, issue one completion
    /// request, append the reply or the fallback.
    ///
    /// Empty or whitespace-only input is ignored, as is any submission while
    /// a request is already pending. Failures never propagate; the error is
    /// logged and the transcript receives [`FALLBACK_REPLY`].
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::Ignored;
        }
        let Some(_guard) = self.gate.acquire() else {
            return SubmitOutcome::Ignored;
        };

        let payload = {
            let mut transcript = self.transcript.lock().expect("transcript poisoned");
            transcript.push(Message::user(trimmed));
            compose_chat(&self.snapshot, &transcript)
        };

        match self.client.complete(&payload).await {
            Ok(reply) => {
                self.transcript
                    .lock()
                    .expect("transcript poisoned")
                    .push(Message::assistant(reply));
                SubmitOutcome::Replied
            }
            Err(err) => {
                tracing::error!(error = %err, "assistant request failed");
                self.transcript
                    .lock()
                    .expect("transcript poisoned")
                    .push(Message::assistant(FALLBACK_REPLY));
                SubmitOutcome::Fallback
            }
        }
    }
}
