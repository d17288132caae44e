//! User intents accepted by the inbox.

use omnichat_assist::{AssistMode, Tone};
use omnichat_core::{ConversationId, MessageId};
use serde::{Deserialize, Serialize};

/// Something the presentation layer asks the inbox to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Make a conversation the active one.
    SelectConversation { id: ConversationId },
    /// Replace the draft of the active conversation.
    SetDraft { text: String },
    /// Quote a message of the active conversation, or clear the quote.
    SetReplyTarget { message_id: Option<MessageId> },
    /// Send the draft of the active conversation.
    Send,
    /// Open the assist panel.
    OpenAssist,
    /// Close the assist panel.
    CloseAssist,
    /// Switch the assist mode.
    SelectAssistMode { mode: AssistMode },
    /// Run Analyze or Summarize.
    StartAssistAction,
    /// Run Generate in a tone.
    SelectTone { tone: Tone },
    /// Discard the assist result and start over in the same mode.
    ResetAssist,
    /// Send the assist result into the active conversation.
    AcceptAssistResult,
    /// A message pushed by the conversation's platform.
    ReceiveRemote {
        conversation_id: ConversationId,
        sender_name: String,
        content: String,
        reply_to: Option<MessageId>,
    },
}
