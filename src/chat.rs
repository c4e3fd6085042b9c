//! Chat input: the message draft and its single-flight send.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::client::{Backend, RemoteError};
use crate::models::{Message, SendMessageInput};
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyDraft,
    #[error("No user found")]
    NoUser,
    #[error("a message is already being sent")]
    InFlight,
    #[error("failed to send message: {0}")]
    Remote(#[from] RemoteError),
}

/// Draft and send state for one conversation.
///
/// Methods take `&self` so the input can be shared between the key handler
/// and the send button; at most one send is outstanding at a time.
pub struct ChatInput {
    conversation_id: Uuid,
    draft: Mutex<String>,
    sending: AtomicBool,
}

/// Releases the in-flight latch when dropped, whatever the send's outcome.
struct SendLatch<'a>(&'a AtomicBool);

impl Drop for SendLatch<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatInput {
    pub fn new(conversation_id: Uuid) -> Self {
        Self {
            conversation_id,
            draft: Mutex::new(String::new()),
            sending: AtomicBool::new(false),
        }
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    fn lock_draft(&self) -> MutexGuard<'_, String> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn draft(&self) -> String {
        self.lock_draft().clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        *self.lock_draft() = text.into();
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    /// Whether the send affordance is active (otherwise the quick-reaction
    /// button shows).
    pub fn has_content(&self) -> bool {
        !self.lock_draft().is_empty()
    }

    fn acquire(&self) -> Option<SendLatch<'_>> {
        self.sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SendLatch(&self.sending))
    }

    /// Send the current draft.
    ///
    /// Rejected without a backend call when another send is outstanding, the
    /// draft is blank, or nobody is signed in. The draft is cleared only
    /// after the backend accepted the message.
    pub async fn send<B: Backend + ?Sized>(&self, session: &Session, backend: &B) -> Result<Message, ChatError> {
        let Some(_latch) = self.acquire() else {
            tracing::debug!("Send ignored, previous message still in flight");
            return Err(ChatError::InFlight);
        };

        let content = self.draft();
        if content.trim().is_empty() {
            return Err(ChatError::EmptyDraft);
        }
        let Some(user) = session.user.as_ref() else {
            tracing::error!("No user found");
            return Err(ChatError::NoUser);
        };

        let input = SendMessageInput {
            conversation_id: self.conversation_id,
            sender_id: user.id,
            content,
        };
        match backend.send_message(input).await {
            Ok(message) => {
                self.lock_draft().clear();
                Ok(message)
            }
            Err(error) => {
                tracing::error!("Error sending message: {}", error);
                Err(error.into())
            }
        }
    }
}
