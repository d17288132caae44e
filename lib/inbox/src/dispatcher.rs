//! Intent dispatcher.
//!
//! The dispatcher owns every piece of inbox state and is the only code that
//! writes messages. Each operation validates first and mutates after, with
//! no suspension point in between, so no caller ever observes a half-applied
//! intent.

use crate::error::DispatchError;
use crate::intent::Intent;
use crate::snapshot::{InboxSnapshot, MessageView, ReplyPreview};
use chrono::{DateTime, Utc};
use omnichat_assist::{AssistError, AssistJob, AssistMode, AssistSession, Completion, Tone};
use omnichat_conversation::fixtures;
use omnichat_conversation::{
    ComposeSession, ConversationError, ConversationRegistry, Message, MessageStore, NewMessage,
};
use omnichat_core::{ConversationId, MessageId};
use std::collections::HashMap;
use tracing::{debug, info};

/// Owns the registry, the message store, compose drafts and the assist panel.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: ConversationRegistry,
    store: MessageStore,
    compose: HashMap<ConversationId, ComposeSession>,
    assist: AssistSession,
    active: Option<ConversationId>,
}

impl Dispatcher {
    /// Creates a dispatcher over already loaded conversations.
    #[must_use]
    pub fn new(registry: ConversationRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Creates a dispatcher preloaded with the demo inbox.
    #[must_use]
    pub fn with_demo_data(now: DateTime<Utc>) -> Self {
        let mut dispatcher = Self::new(ConversationRegistry::load(fixtures::demo_conversations(
            now,
        )));
        let (conversation_id, thread) = fixtures::demo_thread(now);
        for message in thread {
            if let Err(err) = dispatcher.replay(&conversation_id, message) {
                debug!(%conversation_id, error = %err, "skipping demo message");
            }
        }
        dispatcher
    }

    /// The selected conversation, if any.
    #[must_use]
    pub fn active_conversation(&self) -> Option<&ConversationId> {
        self.active.as_ref()
    }

    /// Messages of a conversation, in order.
    #[must_use]
    pub fn messages(&self, conversation_id: &ConversationId) -> &[Message] {
        self.store.list_for(conversation_id)
    }

    /// The assist panel state.
    #[must_use]
    pub fn assist(&self) -> &AssistSession {
        &self.assist
    }

    /// Compose state of a conversation, if one was started.
    #[must_use]
    pub fn compose(&self, conversation_id: &ConversationId) -> Option<&ComposeSession> {
        self.compose.get(conversation_id)
    }

    /// Applies an intent.
    ///
    /// Returns the assist job to run when the intent started one.
    ///
    /// # Errors
    ///
    /// See the individual operations. References to unknown ids are not
    /// errors; they leave the state unchanged.
    pub fn apply(&mut self, intent: Intent) -> Result<Option<AssistJob>, DispatchError> {
        match intent {
            Intent::SelectConversation { id } => self.select_conversation(&id).map(|()| None),
            Intent::SetDraft { text } => self.set_draft(text).map(|()| None),
            Intent::SetReplyTarget { message_id } => {
                self.set_reply_target(message_id).map(|()| None)
            }
            Intent::Send => self.send_draft().map(|()| None),
            Intent::OpenAssist => self.open_assist().map(|()| None),
            Intent::CloseAssist => {
                self.close_assist();
                Ok(None)
            }
            Intent::SelectAssistMode { mode } => self.select_assist_mode(mode).map(|()| None),
            Intent::StartAssistAction => self.start_assist_action().map(Some),
            Intent::SelectTone { tone } => self.select_tone(tone).map(Some),
            Intent::ResetAssist => self.reset_assist().map(|()| None),
            Intent::AcceptAssistResult => self.accept_assist_result().map(|()| None),
            Intent::ReceiveRemote {
                conversation_id,
                sender_name,
                content,
                reply_to,
            } => self
                .receive_remote(&conversation_id, &sender_name, &content, reply_to)
                .map(|()| None),
        }
    }

    /// Makes a conversation active. Its list entry is left as it is.
    ///
    /// An unknown id deselects everything.
    ///
    /// # Errors
    ///
    /// Never fails; unknown ids fall through to the empty state.
    pub fn select_conversation(&mut self, id: &ConversationId) -> Result<(), DispatchError> {
        match self.registry.get(id) {
            Ok(_) => {
                self.active = Some(id.clone());
                Ok(())
            }
            Err(err) => {
                self.active = None;
                absorb(Err(err.into()))
            }
        }
    }

    /// Replaces the draft of the active conversation.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveConversation` when nothing is selected.
    pub fn set_draft(&mut self, text: String) -> Result<(), DispatchError> {
        let active = self.require_active()?;
        self.compose.entry(active).or_default().set_draft(text);
        Ok(())
    }

    /// Sets or clears the reply target of the active conversation.
    ///
    /// Unknown ids and local messages are ignored.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveConversation` when nothing is selected.
    pub fn set_reply_target(&mut self, message_id: Option<MessageId>) -> Result<(), DispatchError> {
        let active = self.require_active()?;
        let Some(message_id) = message_id else {
            if let Some(compose) = self.compose.get_mut(&active) {
                compose.clear_reply_target();
            }
            return Ok(());
        };

        let message = match self.store.resolve(&active, message_id) {
            Ok(message) => message,
            Err(err) => return absorb(Err(err.into())),
        };
        if !self.compose.entry(active).or_default().set_reply_target(message) {
            debug!(%message_id, "ignoring local message as reply target");
        }
        Ok(())
    }

    /// Sends the draft of the active conversation.
    ///
    /// A reply target that no longer resolves is dropped and the text is
    /// sent without a quote.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveConversation` when nothing is selected and
    /// `ValidationFailed` for a blank draft; compose state is untouched in
    /// both cases. A failed append is returned as is and also keeps the
    /// draft.
    pub fn send_draft(&mut self) -> Result<(), DispatchError> {
        let active = self.require_active()?;
        let draft = self
            .compose
            .get(&active)
            .map(ComposeSession::prepare)
            .unwrap_or(Err(ConversationError::EmptyDraft))?;

        let reply_to = draft.reply_target.as_ref().map(|target| target.id).filter(|&target| {
            let resolves = self.store.resolve(&active, target).is_ok();
            if !resolves {
                debug!(message_id = %target, "dropping reply target that no longer resolves");
            }
            resolves
        });
        let id = self.append_local(&active, draft.text, reply_to)?;
        if let Some(compose) = self.compose.get_mut(&active) {
            compose.clear();
        }
        info!(conversation_id = %active, message_id = %id, "sent draft");
        Ok(())
    }

    /// Opens the assist panel; an open panel stays as it is.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the open check runs first.
    pub fn open_assist(&mut self) -> Result<(), DispatchError> {
        if self.assist.is_open() {
            return Ok(());
        }
        self.assist.open()?;
        Ok(())
    }

    /// Closes the assist panel, orphaning any running job.
    pub fn close_assist(&mut self) {
        self.assist.close();
    }

    /// Switches the assist mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the panel is closed.
    pub fn select_assist_mode(&mut self, mode: AssistMode) -> Result<(), DispatchError> {
        self.assist.select_mode(mode)?;
        Ok(())
    }

    /// Starts the Analyze or Summarize job of the current mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless idle in one of those modes.
    pub fn start_assist_action(&mut self) -> Result<AssistJob, DispatchError> {
        let job = self.assist.start()?;
        info!(token = %job.token, mode = %job.request.mode(), "assist job started");
        Ok(job)
    }

    /// Starts a Generate job in the given tone.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside Generate mode.
    pub fn select_tone(&mut self, tone: Tone) -> Result<AssistJob, DispatchError> {
        let job = self.assist.select_tone(tone)?;
        info!(token = %job.token, %tone, "assist job started");
        Ok(job)
    }

    /// Discards the assist result and returns to the start of the mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the panel is closed.
    pub fn reset_assist(&mut self) -> Result<(), DispatchError> {
        self.assist.reset()?;
        Ok(())
    }

    /// Sends the assist result as a local message and closes the panel.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when no result is ready and
    /// `NoActiveConversation` when nothing is selected. A failed append is
    /// returned as is; the result stays ready in that case.
    pub fn accept_assist_result(&mut self) -> Result<(), DispatchError> {
        let Some(result) = self.assist.result() else {
            return Err(DispatchError::InvalidTransition(
                AssistError::InvalidTransition {
                    phase: self.assist.phase_label(),
                    operation: "accept result",
                },
            ));
        };
        let text = result.text();
        let active = self.require_active()?;

        let id = self.append_local(&active, text, None)?;
        self.assist.close();
        info!(conversation_id = %active, message_id = %id, "accepted assist result");
        Ok(())
    }

    /// Delivers a finished assist job. Returns whether it was applied.
    pub fn complete_assist_job(&mut self, completion: Completion) -> bool {
        let token = completion.token;
        let applied = self.assist.complete(completion);
        if applied {
            info!(%token, "assist result ready");
        }
        applied
    }

    /// Appends a message pushed by a conversation's platform.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for blank content or a blank sender name.
    /// Unknown conversations and reply targets are ignored.
    pub fn receive_remote(
        &mut self,
        conversation_id: &ConversationId,
        sender_name: &str,
        content: &str,
        reply_to: Option<MessageId>,
    ) -> Result<(), DispatchError> {
        if sender_name.trim().is_empty() {
            return Err(DispatchError::ValidationFailed(
                ConversationError::MissingSenderName,
            ));
        }
        absorb(self.receive_remote_inner(conversation_id, sender_name, content, reply_to))
    }

    /// Builds the state the presentation layer renders.
    #[must_use]
    pub fn snapshot(&self) -> InboxSnapshot {
        let messages = self
            .active
            .as_ref()
            .map(|active| {
                self.store
                    .list_for(active)
                    .iter()
                    .map(|message| MessageView {
                        reply_preview: message.reply_to.and_then(|target| {
                            self.store
                                .resolve(active, target)
                                .ok()
                                .map(ReplyPreview::of)
                        }),
                        message: message.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        InboxSnapshot {
            conversations: self.registry.list(),
            active_conversation: self.active.clone(),
            messages,
            compose: self
                .active
                .as_ref()
                .map(|active| self.compose.get(active).cloned().unwrap_or_default()),
            assist: self.assist.clone(),
        }
    }

    fn receive_remote_inner(
        &mut self,
        conversation_id: &ConversationId,
        sender_name: &str,
        content: &str,
        reply_to: Option<MessageId>,
    ) -> Result<(), DispatchError> {
        let platform = self.registry.get(conversation_id)?.platform;
        let message = NewMessage::remote(content.trim(), platform, sender_name.trim())
            .with_reply_to(reply_to);
        let stored = self.store.append(conversation_id, message)?;
        let (id, timestamp) = (stored.id, stored.timestamp);
        let preview = stored.content.clone();
        self.registry
            .record_incoming(conversation_id, &preview, timestamp)?;
        debug!(%conversation_id, message_id = %id, "received remote message");
        Ok(())
    }

    /// The single write path for local messages.
    fn append_local(
        &mut self,
        conversation_id: &ConversationId,
        text: String,
        reply_to: Option<MessageId>,
    ) -> Result<MessageId, DispatchError> {
        let platform = self.registry.get(conversation_id)?.platform;
        let stored = self
            .store
            .append(conversation_id, NewMessage::local(text, platform).with_reply_to(reply_to))?;
        let (id, timestamp) = (stored.id, stored.timestamp);
        let preview = stored.content.clone();
        self.registry
            .record_activity(conversation_id, &preview, timestamp)?;
        Ok(id)
    }

    /// Loads history without touching unread counters.
    fn replay(
        &mut self,
        conversation_id: &ConversationId,
        message: NewMessage,
    ) -> Result<(), DispatchError> {
        let stored = self.store.append(conversation_id, message)?;
        let (timestamp, preview) = (stored.timestamp, stored.content.clone());
        self.registry
            .record_activity(conversation_id, &preview, timestamp)?;
        Ok(())
    }

    fn require_active(&self) -> Result<ConversationId, DispatchError> {
        self.active
            .clone()
            .ok_or(DispatchError::NoActiveConversation)
    }
}

/// Turns lookup failures into silent no-ops.
fn absorb(result: Result<(), DispatchError>) -> Result<(), DispatchError> {
    match result {
        Err(DispatchError::NotFound(err)) => {
            debug!(error = %err, "ignoring reference to unknown id");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnichat_assist::{AssistPhase, AssistRequest, CannedProvider};
    use omnichat_conversation::{Conversation, Platform, Sender};

    fn c1() -> ConversationId {
        ConversationId::new("C1")
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(ConversationRegistry::load([
            Conversation::new("C1", "Alex Johnson", Platform::Telegram),
            Conversation::new("C2", "Gaming Squad", Platform::Discord),
        ]))
    }

    fn selected() -> Dispatcher {
        let mut dispatcher = dispatcher();
        dispatcher.select_conversation(&c1()).expect("select");
        dispatcher
    }

    fn receive(dispatcher: &mut Dispatcher, id: &ConversationId, text: &str) -> MessageId {
        dispatcher
            .receive_remote(id, "Alex Johnson", text, None)
            .expect("receive");
        dispatcher.messages(id).last().expect("stored").id
    }

    fn finish(job: AssistJob) -> Completion {
        Completion {
            token: job.token,
            result: CannedProvider::result_for(job.request),
        }
    }

    #[test]
    fn send_to_empty_conversation() {
        let mut dispatcher = selected();
        assert!(dispatcher.messages(&c1()).is_empty());

        dispatcher.set_draft("hi".to_string()).expect("draft");
        dispatcher.send_draft().expect("send");

        let messages = dispatcher.messages(&c1());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[0].sender, Sender::Local);
        assert_eq!(messages[0].platform, Platform::Telegram);
        assert!(messages[0].reply_to.is_none());

        let compose = dispatcher.compose(&c1()).expect("compose");
        assert_eq!(compose.draft_text(), "");
        assert!(compose.reply_target().is_none());
    }

    #[test]
    fn whitespace_draft_is_rejected() {
        let mut dispatcher = selected();
        let target = receive(&mut dispatcher, &c1(), "Send the files?");
        dispatcher.set_draft("  \n ".to_string()).expect("draft");
        dispatcher.set_reply_target(Some(target)).expect("reply");
        let before = dispatcher.compose(&c1()).cloned();

        for _ in 0..2 {
            let err = dispatcher.send_draft().unwrap_err();
            assert!(matches!(
                err,
                DispatchError::ValidationFailed(ConversationError::EmptyDraft)
            ));
            assert_eq!(dispatcher.compose(&c1()).cloned(), before);
            assert_eq!(dispatcher.messages(&c1()).len(), 1);
        }
    }

    #[test]
    fn send_without_draft_is_rejected() {
        let mut dispatcher = selected();
        assert!(matches!(
            dispatcher.send_draft(),
            Err(DispatchError::ValidationFailed(_))
        ));
    }

    #[test]
    fn send_clears_draft_and_reply_target() {
        let mut dispatcher = selected();
        let target = receive(&mut dispatcher, &c1(), "Can you send me the project files?");
        dispatcher.set_draft("Sure".to_string()).expect("draft");
        dispatcher.set_reply_target(Some(target)).expect("reply");

        dispatcher.send_draft().expect("send");

        let sent = dispatcher.messages(&c1()).last().expect("sent");
        assert_eq!(sent.reply_to, Some(target));
        let compose = dispatcher.compose(&c1()).expect("compose");
        assert!(compose.is_empty());

        let snapshot = dispatcher.snapshot();
        let preview = snapshot.messages[1].reply_preview.as_ref().expect("preview");
        assert_eq!(preview.message_id, target);
        assert_eq!(preview.excerpt, "Can you send me the project files?");
    }

    #[test]
    fn local_message_is_not_a_reply_target() {
        let mut dispatcher = selected();
        let remote = receive(&mut dispatcher, &c1(), "Ping");
        dispatcher.set_draft("Pong".to_string()).expect("draft");
        dispatcher.send_draft().expect("send");
        let local = dispatcher.messages(&c1()).last().expect("sent").id;

        dispatcher.set_reply_target(Some(remote)).expect("reply");
        dispatcher.set_reply_target(Some(local)).expect("ignored");

        let compose = dispatcher.compose(&c1()).expect("compose");
        assert_eq!(compose.reply_target().map(|m| m.id), Some(remote));
    }

    #[test]
    fn reply_target_from_other_conversation_is_ignored() {
        let mut dispatcher = selected();
        let elsewhere = receive(&mut dispatcher, &ConversationId::new("C2"), "GG");

        dispatcher.set_reply_target(Some(elsewhere)).expect("no-op");
        assert!(dispatcher.compose(&c1()).is_none());

        dispatcher.set_reply_target(None).expect("clear");
    }

    #[test]
    fn unknown_conversation_falls_through_to_empty_state() {
        let mut dispatcher = selected();
        dispatcher
            .select_conversation(&ConversationId::new("gone"))
            .expect("silent");

        let snapshot = dispatcher.snapshot();
        assert!(snapshot.active_conversation.is_none());
        assert!(snapshot.messages.is_empty());
        assert!(snapshot.compose.is_none());
        assert_eq!(
            dispatcher.set_draft("x".to_string()),
            Err(DispatchError::NoActiveConversation)
        );
    }

    #[test]
    fn drafts_are_kept_per_conversation() {
        let mut dispatcher = selected();
        dispatcher.set_draft("for Alex".to_string()).expect("draft");
        dispatcher
            .select_conversation(&ConversationId::new("C2"))
            .expect("select");
        dispatcher.set_draft("for the squad".to_string()).expect("draft");
        dispatcher.select_conversation(&c1()).expect("select");

        let snapshot = dispatcher.snapshot();
        assert_eq!(
            snapshot.compose.as_ref().map(ComposeSession::draft_text),
            Some("for Alex")
        );
    }

    #[test]
    fn incoming_messages_count_as_unread() {
        let mut dispatcher = selected();
        let c2 = ConversationId::new("C2");
        receive(&mut dispatcher, &c2, "GG everyone!");
        receive(&mut dispatcher, &c2, "Same time tomorrow?");

        let snapshot = dispatcher.snapshot();
        let squad = snapshot.conversation(&c2).expect("listed");
        assert_eq!(squad.unread_count, 2);
        assert_eq!(squad.preview_text, "Same time tomorrow?");
        assert_eq!(snapshot.conversations[0].id, c2);

        dispatcher.select_conversation(&c2).expect("select");
        assert_eq!(
            dispatcher.snapshot().conversation(&c2).map(|c| c.unread_count),
            Some(2)
        );
    }

    #[test]
    fn selecting_leaves_list_entry_untouched() {
        let mut dispatcher = Dispatcher::new(ConversationRegistry::load([Conversation::new(
            "C1",
            "Alex Johnson",
            Platform::Telegram,
        )
        .with_preview("Can you send me the project files?", Utc::now())
        .with_unread(5)]));
        let before = dispatcher.snapshot().conversations;

        dispatcher.select_conversation(&c1()).expect("select");

        assert!(dispatcher.messages(&c1()).is_empty());
        assert_eq!(dispatcher.snapshot().conversations, before);
        assert_eq!(
            dispatcher.snapshot().conversation(&c1()).map(|c| c.unread_count),
            Some(5)
        );
    }

    #[test]
    fn own_messages_do_not_count_as_unread() {
        let mut dispatcher = selected();
        dispatcher.set_draft("hello".to_string()).expect("draft");
        dispatcher.send_draft().expect("send");

        let snapshot = dispatcher.snapshot();
        let conversation = snapshot.conversation(&c1()).expect("listed");
        assert_eq!(conversation.unread_count, 0);
        assert_eq!(conversation.preview_text, "hello");
        assert_eq!(snapshot.conversations[0].id, c1());
    }

    #[test]
    fn remote_message_to_unknown_conversation_is_ignored() {
        let mut dispatcher = dispatcher();
        let ghost = ConversationId::new("ghost");
        dispatcher
            .receive_remote(&ghost, "Nobody", "boo", None)
            .expect("silent");
        assert!(dispatcher.messages(&ghost).is_empty());
        assert!(matches!(
            dispatcher.receive_remote(&c1(), " ", "hi", None),
            Err(DispatchError::ValidationFailed(_))
        ));
    }

    #[test]
    fn accept_appends_result_and_closes_panel() {
        let mut dispatcher = selected();
        dispatcher.open_assist().expect("open");
        dispatcher
            .select_assist_mode(AssistMode::Generate)
            .expect("mode");
        let job = dispatcher.select_tone(Tone::Professional).expect("tone");
        let expected = CannedProvider::result_for(job.request).text();
        assert!(dispatcher.complete_assist_job(finish(job)));

        dispatcher.accept_assist_result().expect("accept");

        let messages = dispatcher.messages(&c1());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, expected);
        assert_eq!(messages[0].sender, Sender::Local);
        assert_eq!(dispatcher.assist().phase(), &AssistPhase::Closed);
    }

    #[test]
    fn accept_without_result_is_rejected() {
        let mut dispatcher = selected();
        dispatcher.open_assist().expect("open");
        let job = dispatcher.start_assist_action().expect("start");

        let err = dispatcher.accept_assist_result().unwrap_err();
        assert!(matches!(err, DispatchError::InvalidTransition(_)));
        assert!(dispatcher.messages(&c1()).is_empty());
        assert_eq!(dispatcher.assist().pending_token(), Some(job.token));
    }

    #[test]
    fn accept_needs_active_conversation() {
        let mut dispatcher = dispatcher();
        dispatcher.open_assist().expect("open");
        let job = dispatcher.start_assist_action().expect("start");
        dispatcher.complete_assist_job(finish(job));

        assert_eq!(
            dispatcher.accept_assist_result(),
            Err(DispatchError::NoActiveConversation)
        );
        assert!(dispatcher.assist().result().is_some());
    }

    #[test]
    fn mode_switch_discards_pending_completion() {
        let mut dispatcher = selected();
        dispatcher.open_assist().expect("open");
        let first = dispatcher.start_assist_action().expect("start");
        assert_eq!(first.request, AssistRequest::Analyze);

        dispatcher
            .select_assist_mode(AssistMode::Summarize)
            .expect("mode");
        assert!(!dispatcher.complete_assist_job(finish(first)));

        assert_eq!(dispatcher.assist().phase(), &AssistPhase::Idle);
        assert_eq!(dispatcher.assist().mode(), AssistMode::Summarize);
    }

    #[test]
    fn later_tone_wins() {
        let mut dispatcher = selected();
        dispatcher.open_assist().expect("open");
        dispatcher
            .select_assist_mode(AssistMode::Generate)
            .expect("mode");
        let professional = dispatcher.select_tone(Tone::Professional).expect("tone");
        let casual = dispatcher.select_tone(Tone::Casual).expect("tone");

        assert!(!dispatcher.complete_assist_job(finish(professional)));
        assert!(dispatcher.complete_assist_job(finish(casual)));

        assert_eq!(
            dispatcher.assist().result(),
            Some(&CannedProvider::result_for(AssistRequest::Generate(
                Tone::Casual
            )))
        );
    }

    #[test]
    fn invalid_assist_transition_leaves_state_unchanged() {
        let mut dispatcher = selected();
        assert!(matches!(
            dispatcher.select_tone(Tone::Casual),
            Err(DispatchError::InvalidTransition(_))
        ));

        dispatcher.open_assist().expect("open");
        let before = dispatcher.assist().clone();
        assert!(matches!(
            dispatcher.apply(Intent::SelectTone { tone: Tone::Casual }),
            Err(DispatchError::InvalidTransition(_))
        ));
        assert_eq!(dispatcher.assist(), &before);
    }

    #[test]
    fn open_assist_twice_keeps_progress() {
        let mut dispatcher = selected();
        dispatcher.open_assist().expect("open");
        let job = dispatcher.start_assist_action().expect("start");
        dispatcher.open_assist().expect("still open");
        assert_eq!(dispatcher.assist().pending_token(), Some(job.token));
    }

    #[test]
    fn apply_returns_started_jobs() {
        let mut dispatcher = selected();
        assert_eq!(dispatcher.apply(Intent::OpenAssist), Ok(None));
        let job = dispatcher
            .apply(Intent::StartAssistAction)
            .expect("start")
            .expect("job");
        assert_eq!(dispatcher.assist().pending_token(), Some(job.token));
        assert_eq!(dispatcher.apply(Intent::ResetAssist), Ok(None));
        assert_eq!(dispatcher.apply(Intent::CloseAssist), Ok(None));
        assert!(!dispatcher.assist().is_open());
    }

    #[test]
    fn switching_conversation_keeps_assist_session() {
        let mut dispatcher = selected();
        dispatcher.open_assist().expect("open");
        let job = dispatcher.start_assist_action().expect("start");
        dispatcher
            .select_conversation(&ConversationId::new("C2"))
            .expect("select");
        assert!(dispatcher.complete_assist_job(finish(job)));
    }

    #[test]
    fn every_reply_resolves_in_its_conversation() {
        let mut dispatcher = Dispatcher::with_demo_data(Utc::now());
        let id = ConversationId::new(fixtures::DEMO_THREAD_CONVERSATION);
        dispatcher.select_conversation(&id).expect("select");
        let question = dispatcher.messages(&id)[2].id;
        dispatcher.set_reply_target(Some(question)).expect("reply");
        dispatcher.set_draft("Sending now".to_string()).expect("draft");
        dispatcher.send_draft().expect("send");

        for message in dispatcher.messages(&id) {
            if let Some(target) = message.reply_to {
                assert!(dispatcher.store.resolve(&id, target).is_ok());
            }
        }
    }

    #[test]
    fn demo_data_is_loaded() {
        let dispatcher = Dispatcher::with_demo_data(Utc::now());
        let snapshot = dispatcher.snapshot();
        assert_eq!(snapshot.conversations.len(), 5);
        assert_eq!(snapshot.conversations[0].id.as_str(), "1");
        assert_eq!(
            snapshot.conversations[0].preview_text,
            "Perfect! Also, do we have the meeting confirmed for tomorro…"
        );
        assert_eq!(
            dispatcher
                .messages(&ConversationId::new(fixtures::DEMO_THREAD_CONVERSATION))
                .len(),
            5
        );
    }

    #[test]
    fn dangling_reply_target_is_dropped_on_send() {
        let mut dispatcher = selected();
        let elsewhere = receive(&mut dispatcher, &ConversationId::new("C2"), "GG");
        let stale = dispatcher.messages(&ConversationId::new("C2"))[0].clone();
        assert_eq!(stale.id, elsewhere);
        dispatcher
            .compose
            .entry(c1())
            .or_default()
            .set_reply_target(&stale);
        dispatcher.set_draft("still sent".to_string()).expect("draft");

        dispatcher.send_draft().expect("send");

        let messages = dispatcher.messages(&c1());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "still sent");
        assert!(messages[0].reply_to.is_none());
        assert!(dispatcher.compose(&c1()).expect("compose").is_empty());
    }

    #[test]
    fn failed_append_is_reported() {
        let mut dispatcher = selected();
        dispatcher.set_draft("hello".to_string()).expect("draft");
        dispatcher.open_assist().expect("open");
        let job = dispatcher.start_assist_action().expect("start");
        dispatcher.complete_assist_job(finish(job));
        dispatcher.active = Some(ConversationId::new("gone"));
        dispatcher
            .compose
            .entry(ConversationId::new("gone"))
            .or_default()
            .set_draft("hello");

        assert!(matches!(
            dispatcher.send_draft(),
            Err(DispatchError::NotFound(_))
        ));
        assert_eq!(
            dispatcher
                .compose(&ConversationId::new("gone"))
                .map(ComposeSession::draft_text),
            Some("hello")
        );

        assert!(matches!(
            dispatcher.accept_assist_result(),
            Err(DispatchError::NotFound(_))
        ));
        assert!(dispatcher.assist().result().is_some());
    }
}
