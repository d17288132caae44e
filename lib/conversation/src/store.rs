//! Per-conversation append-only message logs.
//!
//! The store is a map of independent logs. Nothing ever needs ordering
//! across conversations, so each log only keeps its own insertion order
//! plus an id index for reply lookups.

use crate::error::ConversationError;
use crate::message::{Message, NewMessage, Sender};
use chrono::Utc;
use omnichat_core::{ConversationId, MessageId};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct ConversationLog {
    messages: Vec<Message>,
    index: HashMap<MessageId, usize>,
}

/// Holds every message, grouped by conversation.
#[derive(Debug, Default)]
pub struct MessageStore {
    logs: HashMap<ConversationId, ConversationLog>,
}

impl MessageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to a conversation and returns the stored copy.
    ///
    /// Assigns an id and the current time unless the message carries them.
    ///
    /// # Errors
    ///
    /// Fails without storing anything when the content is blank, a remote
    /// message has no sender name, a preassigned id is already taken, or
    /// `reply_to` does not resolve inside the same conversation.
    pub fn append(
        &mut self,
        conversation_id: &ConversationId,
        message: NewMessage,
    ) -> Result<&Message, ConversationError> {
        if message.content.trim().is_empty() {
            return Err(ConversationError::EmptyContent);
        }
        if message.sender == Sender::Remote && message.sender_display_name.is_none() {
            return Err(ConversationError::MissingSenderName);
        }

        let log = self.logs.entry(conversation_id.clone()).or_default();

        if let Some(reply_to) = message.reply_to {
            if !log.index.contains_key(&reply_to) {
                return Err(ConversationError::ReplyTargetMissing {
                    conversation_id: conversation_id.clone(),
                    message_id: reply_to,
                });
            }
        }

        let id = message.id.unwrap_or_default();
        if log.index.contains_key(&id) {
            return Err(ConversationError::DuplicateMessage {
                conversation_id: conversation_id.clone(),
                message_id: id,
            });
        }

        let sender_display_name = match message.sender {
            Sender::Remote => message.sender_display_name,
            Sender::Local => None,
        };

        let position = log.messages.len();
        log.messages.push(Message {
            id,
            conversation_id: conversation_id.clone(),
            content: message.content,
            sender: message.sender,
            platform: message.platform,
            sender_display_name,
            timestamp: message.timestamp.unwrap_or_else(Utc::now),
            reply_to: message.reply_to,
        });
        log.index.insert(id, position);

        Ok(&log.messages[position])
    }

    /// Returns the messages of a conversation in append order.
    ///
    /// A conversation without messages yields an empty slice.
    #[must_use]
    pub fn list_for(&self, conversation_id: &ConversationId) -> &[Message] {
        self.logs
            .get(conversation_id)
            .map(|log| log.messages.as_slice())
            .unwrap_or_default()
    }

    /// Looks up a message inside one conversation.
    ///
    /// # Errors
    ///
    /// Returns `MessageNotFound` if the id is not part of that conversation.
    pub fn resolve(
        &self,
        conversation_id: &ConversationId,
        message_id: MessageId,
    ) -> Result<&Message, ConversationError> {
        self.logs
            .get(conversation_id)
            .and_then(|log| log.index.get(&message_id).map(|&i| &log.messages[i]))
            .ok_or_else(|| ConversationError::MessageNotFound {
                conversation_id: conversation_id.clone(),
                message_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    fn conv(id: &str) -> ConversationId {
        ConversationId::new(id)
    }

    #[test]
    fn list_for_unknown_conversation_is_empty() {
        let store = MessageStore::new();
        assert!(store.list_for(&conv("C1")).is_empty());
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut store = MessageStore::new();
        let c1 = conv("C1");
        for text in ["first", "second", "third"] {
            store
                .append(&c1, NewMessage::local(text, Platform::Telegram))
                .expect("append");
        }

        let contents: Vec<_> = store.list_for(&c1).iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[test]
    fn append_assigns_id_and_timestamp() {
        let mut store = MessageStore::new();
        let before = Utc::now();
        let stored = store
            .append(&conv("C1"), NewMessage::local("hi", Platform::Discord))
            .expect("append")
            .clone();

        assert!(stored.timestamp >= before);
        assert_eq!(stored.conversation_id, conv("C1"));
        assert_eq!(
            store.resolve(&conv("C1"), stored.id).expect("resolve").content,
            "hi"
        );
    }

    #[test]
    fn append_keeps_preassigned_id() {
        let mut store = MessageStore::new();
        let id = MessageId::new();
        let stored = store
            .append(&conv("C1"), NewMessage::local("hi", Platform::Telegram).with_id(id))
            .expect("append");
        assert_eq!(stored.id, id);

        let err = store
            .append(&conv("C1"), NewMessage::local("again", Platform::Telegram).with_id(id))
            .unwrap_err();
        assert!(matches!(err, ConversationError::DuplicateMessage { .. }));
        assert_eq!(store.list_for(&conv("C1")).len(), 1);
    }

    #[test]
    fn blank_content_is_rejected() {
        let mut store = MessageStore::new();
        let err = store
            .append(&conv("C1"), NewMessage::local("  \n", Platform::Telegram))
            .unwrap_err();
        assert_eq!(err, ConversationError::EmptyContent);
        assert!(store.list_for(&conv("C1")).is_empty());
    }

    #[test]
    fn reply_must_resolve_in_same_conversation() {
        let mut store = MessageStore::new();
        let other = store
            .append(
                &conv("C2"),
                NewMessage::remote("elsewhere", Platform::Discord, "Dev Community"),
            )
            .expect("append")
            .id;

        let err = store
            .append(
                &conv("C1"),
                NewMessage::local("reply", Platform::Telegram).with_reply_to(Some(other)),
            )
            .unwrap_err();
        assert!(matches!(err, ConversationError::ReplyTargetMissing { .. }));
        assert!(store.list_for(&conv("C1")).is_empty());
    }

    #[test]
    fn every_reply_resolves_within_its_conversation() {
        let mut store = MessageStore::new();
        let c1 = conv("C1");
        let question = store
            .append(
                &c1,
                NewMessage::remote("Send the files?", Platform::Telegram, "Alex Johnson"),
            )
            .expect("append")
            .id;
        store
            .append(
                &c1,
                NewMessage::local("Sure", Platform::Telegram).with_reply_to(Some(question)),
            )
            .expect("append");

        for message in store.list_for(&c1) {
            if let Some(target) = message.reply_to {
                let resolved = store.resolve(&c1, target).expect("reply resolves");
                assert_eq!(resolved.conversation_id, c1);
            }
        }
    }

    #[test]
    fn remote_requires_sender_name() {
        let mut store = MessageStore::new();
        let mut msg = NewMessage::remote("hey", Platform::Telegram, "Sarah Miller");
        msg.sender_display_name = None;
        let err = store.append(&conv("C1"), msg).unwrap_err();
        assert_eq!(err, ConversationError::MissingSenderName);
    }

    #[test]
    fn local_messages_drop_sender_name() {
        let mut store = MessageStore::new();
        let mut msg = NewMessage::local("hey", Platform::Telegram);
        msg.sender_display_name = Some("me".to_string());
        let stored = store.append(&conv("C1"), msg).expect("append");
        assert!(stored.sender_display_name.is_none());
    }

    #[test]
    fn resolve_unknown_message_fails() {
        let store = MessageStore::new();
        let err = store.resolve(&conv("C1"), MessageId::new()).unwrap_err();
        assert!(err.is_not_found());
    }
}
