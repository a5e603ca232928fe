use super::profile::SessionProfile;
use super::transport::ProxyTransport;
use crate::models::chat::{ ChatRequest, ChatResponse, Language, Message, Sender };

use log::{ debug, info, warn };
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub const NO_REPLY_TEXT: &str = "Sorry, I couldn't process that request.";
pub const TIMEOUT_TEXT: &str = "The assistant is taking too long to respond. Please try again.";
pub const CANCELLED_TEXT: &str = "Request cancelled.";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingReply,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("A reply is still pending")]
    Busy,
    #[error("No reply is pending")]
    NotAwaiting,
    #[error("No quick reply at position {0}")]
    UnknownQuickReply(usize),
    #[error("Language is fixed for this chat")]
    LanguageLocked,
}

/// How a pending turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Replied(ChatResponse),
    TransportFailed,
    TimedOut,
    Cancelled,
}

/// One conversation: an append-only transcript plus the idle/awaiting-reply flag.
///
/// A turn is `begin_turn` (user message appended, request built) followed by exactly one
/// `complete_turn` (bot message appended). `send` runs both around a single proxy call.
#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    profile: SessionProfile,
    language: Language,
    location: String,
    transcript: Vec<Message>,
    state: SessionState,
    request_timeout: Duration,
}

impl ChatSession {
    pub fn new(profile: SessionProfile) -> Self {
        let id = Uuid::new_v4();
        debug!("New {:?} chat session {}", profile.kind, id);
        Self {
            id,
            language: Language::default(),
            location: profile.default_location.to_string(),
            transcript: vec![Message::bot(profile.greeting)],
            state: SessionState::Idle,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            profile,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == SessionState::AwaitingReply
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn quick_replies(&self) -> &'static [&'static str] {
        self.profile.quick_replies
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), SessionError> {
        if !self.profile.language_selectable {
            return Err(SessionError::LanguageLocked);
        }
        self.language = language;
        Ok(())
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Starts a turn. Blank input is a no-op and yields `Ok(None)`.
    pub fn begin_turn(&mut self, text: &str) -> Result<Option<ChatRequest>, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if text.trim().is_empty() {
            return Ok(None);
        }

        self.transcript.push(Message::user(text));
        self.state = SessionState::AwaitingReply;

        Ok(
            Some(ChatRequest {
                message: text.to_string(),
                language: Some(self.language.to_string()),
                location: Some(self.location.clone()),
            })
        )
    }

    /// Resolves the pending turn with exactly one bot message and returns to idle.
    pub fn complete_turn(&mut self, outcome: TurnOutcome) -> Result<&Message, SessionError> {
        if !self.is_busy() {
            return Err(SessionError::NotAwaiting);
        }

        let text = match outcome {
            TurnOutcome::Replied(resp) =>
                resp.reply.filter(|r| !r.is_empty()).unwrap_or_else(|| NO_REPLY_TEXT.to_string()),
            TurnOutcome::TransportFailed => self.profile.transport_error_text.to_string(),
            TurnOutcome::TimedOut => TIMEOUT_TEXT.to_string(),
            TurnOutcome::Cancelled => CANCELLED_TEXT.to_string(),
        };

        self.transcript.push(Message::bot(text));
        self.state = SessionState::Idle;
        let last = self.transcript.len() - 1;
        Ok(&self.transcript[last])
    }

    pub async fn send<T>(
        &mut self,
        transport: &T,
        text: &str
    ) -> Result<Option<&Message>, SessionError>
        where T: ProxyTransport + ?Sized
    {
        self.send_with_cancel(transport, text, &CancellationToken::new()).await
    }

    /// Same as [`ChatSession::send`]; cancelling `cancel` abandons the in-flight request.
    pub async fn send_with_cancel<T>(
        &mut self,
        transport: &T,
        text: &str,
        cancel: &CancellationToken
    ) -> Result<Option<&Message>, SessionError>
        where T: ProxyTransport + ?Sized
    {
        let request = match self.begin_turn(text)? {
            Some(request) => request,
            None => return Ok(None),
        };
        let timeout = self.request_timeout;

        let outcome = tokio::select! {
            _ = cancel.cancelled() => TurnOutcome::Cancelled,
            res = tokio::time::timeout(timeout, transport.send(&request)) => match res {
                Ok(Ok(resp)) => TurnOutcome::Replied(resp),
                Ok(Err(e)) => {
                    warn!("Session {}: proxy unreachable: {}", self.id, e);
                    TurnOutcome::TransportFailed
                }
                Err(_) => {
                    warn!("Session {}: no reply within {:?}", self.id, timeout);
                    TurnOutcome::TimedOut
                }
            },
        };
        if outcome == TurnOutcome::Cancelled {
            info!("Session {}: request cancelled", self.id);
        }

        self.complete_turn(outcome).map(Some)
    }

    /// Sends the quick reply at `index` exactly as if it had been typed.
    pub async fn send_quick_reply<T>(
        &mut self,
        transport: &T,
        index: usize
    ) -> Result<Option<&Message>, SessionError>
        where T: ProxyTransport + ?Sized
    {
        let text = *self.profile.quick_replies
            .get(index)
            .ok_or(SessionError::UnknownQuickReply(index))?;
        self.send(transport, text).await
    }

    pub fn user_turns(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.sender == Sender::User)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::transport::TransportError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Script {
        Reply(Option<&'static str>),
        Status(u16),
        Hang,
    }

    struct FakeTransport {
        script: Script,
        sent: Mutex<Vec<ChatRequest>>,
    }

    impl FakeTransport {
        fn new(script: Script) -> Self {
            Self { script, sent: Mutex::new(Vec::new()) }
        }

        fn sent(&self) -> Vec<ChatRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProxyTransport for FakeTransport {
        async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            match self.script {
                Script::Reply(text) => Ok(ChatResponse { reply: text.map(String::from) }),
                Script::Status(code) => Err(TransportError::Status(code)),
                Script::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }
    }

    #[test]
    fn new_session_is_idle_with_greeting() {
        let session = ChatSession::new(SessionProfile::widget());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].sender, Sender::Bot);
        assert_eq!(session.location(), "Current Location");
    }

    #[test]
    fn begin_turn_moves_to_awaiting_reply() {
        let mut session = ChatSession::new(SessionProfile::full_page());
        let before = session.transcript().len();

        let request = session.begin_turn("Is this area safe at night?").unwrap().unwrap();

        assert_eq!(session.state(), SessionState::AwaitingReply);
        assert_eq!(session.transcript().len(), before + 1);
        let last = session.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "Is this area safe at night?");
        assert_eq!(request.message, "Is this area safe at night?");
        assert_eq!(request.language.as_deref(), Some("English"));
        assert_eq!(request.location.as_deref(), Some("Paris, France"));
    }

    #[test]
    fn begin_turn_while_pending_is_busy() {
        let mut session = ChatSession::new(SessionProfile::full_page());
        session.begin_turn("first").unwrap();
        assert_eq!(session.begin_turn("second"), Err(SessionError::Busy));
        assert_eq!(session.user_turns(), 1);
    }

    #[test]
    fn complete_turn_without_pending_request_fails() {
        let mut session = ChatSession::new(SessionProfile::widget());
        let err = session.complete_turn(TurnOutcome::TimedOut).unwrap_err();
        assert_eq!(err, SessionError::NotAwaiting);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let mut session = ChatSession::new(SessionProfile::full_page());
        for text in ["", "   ", "\n\t"] {
            assert_eq!(session.begin_turn(text), Ok(None));
        }
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn send_appends_user_and_bot_messages() {
        let transport = FakeTransport::new(Script::Reply(Some("Mostly, but avoid the canal path.")));
        let mut session = ChatSession::new(SessionProfile::full_page());
        let before = session.transcript().len();

        let bot = session.send(&transport, "Is this area safe at night?").await.unwrap().unwrap();
        assert_eq!(bot.text, "Mostly, but avoid the canal path.");

        assert_eq!(session.transcript().len(), before + 2);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn blank_send_issues_no_request() {
        let transport = FakeTransport::new(Script::Reply(Some("unused")));
        let mut session = ChatSession::new(SessionProfile::widget());
        assert!(session.send(&transport, "  ").await.unwrap().is_none());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn missing_reply_uses_placeholder() {
        let transport = FakeTransport::new(Script::Reply(None));
        let mut session = ChatSession::new(SessionProfile::widget());
        let bot = session.send(&transport, "hello").await.unwrap().unwrap();
        assert_eq!(bot.text, NO_REPLY_TEXT);
    }

    #[tokio::test]
    async fn transport_failure_uses_profile_error_text() {
        let transport = FakeTransport::new(Script::Status(500));

        let mut page = ChatSession::new(SessionProfile::full_page());
        let text = page.send(&transport, "hello").await.unwrap().unwrap().text.clone();
        assert_eq!(text, SessionProfile::full_page().transport_error_text);

        let mut widget = ChatSession::new(SessionProfile::widget());
        let text = widget.send(&transport, "hello").await.unwrap().unwrap().text.clone();
        assert_eq!(text, SessionProfile::widget().transport_error_text);
        assert_ne!(text, crate::assistant::FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn hung_proxy_times_out_back_to_idle() {
        let transport = FakeTransport::new(Script::Hang);
        let mut session = ChatSession::new(SessionProfile::full_page())
            .with_request_timeout(Duration::from_millis(20));

        let bot = session.send(&transport, "hello").await.unwrap().unwrap();
        assert_eq!(bot.text, TIMEOUT_TEXT);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.transcript().len(), 3);
    }

    #[tokio::test]
    async fn cancellation_resolves_pending_turn() {
        let transport = FakeTransport::new(Script::Hang);
        let mut session = ChatSession::new(SessionProfile::widget());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let bot = session.send_with_cancel(&transport, "hello", &cancel).await.unwrap().unwrap();
        assert_eq!(bot.text, CANCELLED_TEXT);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn quick_reply_matches_typed_text() {
        let quick_transport = FakeTransport::new(Script::Reply(Some("Call 112.")));
        let typed_transport = FakeTransport::new(Script::Reply(Some("Call 112.")));
        let mut quick = ChatSession::new(SessionProfile::widget());
        let mut typed = ChatSession::new(SessionProfile::widget());

        quick.send_quick_reply(&quick_transport, 0).await.unwrap();
        typed.send(&typed_transport, "Need emergency help").await.unwrap();

        assert_eq!(quick_transport.sent(), typed_transport.sent());
        assert_eq!(quick.state(), typed.state());
        let texts = |s: &ChatSession| {
            s.transcript()
                .iter()
                .map(|m| (m.sender, m.text.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(texts(&quick), texts(&typed));
    }

    #[tokio::test]
    async fn unknown_quick_reply_is_rejected() {
        let transport = FakeTransport::new(Script::Reply(Some("x")));
        let mut session = ChatSession::new(SessionProfile::widget());
        let err = session.send_quick_reply(&transport, 9).await.unwrap_err();
        assert_eq!(err, SessionError::UnknownQuickReply(9));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn sessions_do_not_share_transcripts() {
        let transport = FakeTransport::new(Script::Reply(Some("ok")));
        let mut page = ChatSession::new(SessionProfile::full_page());
        let widget = ChatSession::new(SessionProfile::widget());
        let widget_before = widget.transcript().to_vec();

        page.send(&transport, "hello").await.unwrap();

        assert_eq!(widget.transcript(), widget_before.as_slice());
        assert_ne!(page.id(), widget.id());
    }

    #[test]
    fn widget_language_is_fixed() {
        let mut widget = ChatSession::new(SessionProfile::widget());
        assert_eq!(widget.set_language(Language::French), Err(SessionError::LanguageLocked));

        let mut page = ChatSession::new(SessionProfile::full_page());
        page.set_language(Language::French).unwrap();
        let request = page.begin_turn("Bonjour").unwrap().unwrap();
        assert_eq!(request.language.as_deref(), Some("French"));
    }
}
