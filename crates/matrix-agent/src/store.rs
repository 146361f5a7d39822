// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session store.
//!
//! Holds the session list and the active conversation. A conversation is a
//! draft until its first exchange completes; at that point it receives a
//! permanent id and is prepended to the session list.
//!
//! One send may be in flight at a time. The analysis branch and the provider
//! branch of a send run concurrently and are joined before the assistant
//! message is appended.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use matrix_analysis::first_address;
use matrix_config::model::ChatConfig;
use matrix_core::error::MatrixError;
use matrix_core::traits::AnalysisEngine;
use matrix_core::types::{ChatSession, Message, ModelProvider, ProviderMessage};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, info};

use crate::attachment::Attachment;
use crate::bridge::LlmBridge;

/// Title given to a new session opened by an attachment-only message.
pub const IMAGE_SESSION_TITLE: &str = "Image Analysis";

/// Sidebar tools. Activating one opens a new chat seeded with a prompt prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Tool {
    #[strum(to_string = "Address Profiler", serialize = "profiler")]
    AddressProfiler,
    #[strum(to_string = "Graph Visualizer", serialize = "graph")]
    GraphVisualizer,
    #[strum(to_string = "Contract Auditor", serialize = "audit")]
    ContractAuditor,
    #[strum(to_string = "Fund Tracing", serialize = "trace")]
    FundTracing,
}

impl Tool {
    pub fn prefix(&self) -> &'static str {
        match self {
            Tool::AddressProfiler => "Analyze the risk profile of address: ",
            Tool::GraphVisualizer => "Visualize the transaction graph for: ",
            Tool::ContractAuditor => "Audit the smart contract at: ",
            Tool::FundTracing => "Trace the flow of funds starting from: ",
        }
    }
}

/// Prefix for a tool name; unknown names get the generic prefix.
pub fn tool_prefix(name: &str) -> &'static str {
    Tool::from_str(name.trim()).map_or("Analyze: ", |t| t.prefix())
}

/// Result of [`ChatStore::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Nothing to send: blank text and no attachment.
    Ignored,
    /// Another send is still in flight.
    Busy,
    /// The exchange completed; carries the appended assistant message.
    Replied(Message),
}

#[derive(Debug, Default)]
struct ChatState {
    sessions: Vec<ChatSession>,
    /// `None` while the active conversation is a draft.
    active: Option<String>,
    messages: Vec<Message>,
    provider: ModelProvider,
    /// Bumped whenever the visible conversation is switched or reset.
    view: u64,
}

/// Clears the in-flight flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ChatStore {
    bridge: Arc<LlmBridge>,
    engine: Arc<dyn AnalysisEngine>,
    analysis_delay: Duration,
    preview_chars: usize,
    thinking: AtomicBool,
    state: Mutex<ChatState>,
}

impl ChatStore {
    pub fn new(
        bridge: Arc<LlmBridge>,
        engine: Arc<dyn AnalysisEngine>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            bridge,
            engine,
            analysis_delay: Duration::from_millis(config.analysis_delay_ms),
            preview_chars: config.preview_chars,
            thinking: AtomicBool::new(false),
            state: Mutex::new(ChatState {
                provider: config.default_provider,
                ..ChatState::default()
            }),
        }
    }

    pub fn with_analysis_delay(mut self, delay: Duration) -> Self {
        self.analysis_delay = delay;
        self
    }

    pub fn bridge(&self) -> &LlmBridge {
        &self.bridge
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sessions, most recently updated first.
    pub fn sessions(&self) -> Vec<ChatSession> {
        self.state().sessions.clone()
    }

    /// Messages of the active conversation.
    pub fn messages(&self) -> Vec<Message> {
        self.state().messages.clone()
    }

    /// Id of the active session, `None` for a draft.
    pub fn active_session_id(&self) -> Option<String> {
        self.state().active.clone()
    }

    pub fn is_draft(&self) -> bool {
        self.state().active.is_none()
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking.load(Ordering::Acquire)
    }

    pub fn provider(&self) -> ModelProvider {
        self.state().provider
    }

    pub fn select_provider(&self, provider: ModelProvider) {
        info!(provider = %provider, "model provider selected");
        self.state().provider = provider;
    }

    /// Resets the active conversation to an empty draft.
    pub fn start_new_chat(&self) {
        let mut st = self.state();
        st.messages.clear();
        st.active = None;
        st.view += 1;
    }

    /// Makes `id` the active conversation. Returns `false` if unknown.
    pub fn select_session(&self, id: &str) -> bool {
        let mut st = self.state();
        let Some(messages) = st
            .sessions
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.messages.clone())
        else {
            return false;
        };
        st.messages = messages;
        st.active = Some(id.to_string());
        st.view += 1;
        true
    }

    /// Starts a new chat and returns the tool's prompt prefix.
    pub fn activate_tool(&self, name: &str) -> &'static str {
        self.start_new_chat();
        tool_prefix(name)
    }

    /// Drops every session and starts a new draft.
    pub fn clear_history(&self) {
        let mut st = self.state();
        let dropped = st.sessions.len();
        st.sessions.clear();
        st.messages.clear();
        st.active = None;
        st.view += 1;
        info!(sessions = dropped, "chat history cleared");
    }

    /// All sessions as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, MatrixError> {
        let sessions = self.sessions();
        Ok(serde_json::to_string_pretty(&sessions)?)
    }

    /// Sends one user turn and appends the assistant reply.
    pub async fn send(&self, text: &str, attachment: Option<Attachment>) -> SendOutcome {
        if text.trim().is_empty() && attachment.is_none() {
            return SendOutcome::Ignored;
        }
        let Some(_guard) = InFlight::acquire(&self.thinking) else {
            debug!("send rejected, another send is in flight");
            return SendOutcome::Busy;
        };

        let user = Message::user(text, attachment.as_ref().map(Attachment::preview));
        let (history, mut transcript, origin, view, provider) = {
            let mut st = self.state();
            let history: Vec<ProviderMessage> = st
                .messages
                .iter()
                .map(|m| ProviderMessage {
                    role: m.role,
                    text: m.text.clone(),
                })
                .collect();
            st.messages.push(user);
            (
                history,
                st.messages.clone(),
                st.active.clone(),
                st.view,
                st.provider,
            )
        };

        let address = first_address(text);
        let inline = attachment.as_ref().map(Attachment::inline_data);

        let analysis = async {
            let addr = address?;
            tokio::time::sleep(self.analysis_delay).await;
            Some(self.engine.generate(addr))
        };
        let reply = self
            .bridge
            .complete(text, &history, inline.as_ref(), provider);
        let (report, reply_text) = tokio::join!(analysis, reply);

        let assistant = Message::assistant(reply_text, report);
        transcript.push(assistant.clone());
        let preview = preview_text(&assistant.text, self.preview_chars);
        let now = Utc::now();

        let mut st = self.state();
        let visible = st.view == view;
        match origin {
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                let title = session_title(text, address);
                info!(session_id = %id, title = %title, "session created");
                st.sessions.insert(
                    0,
                    ChatSession {
                        id: id.clone(),
                        title,
                        last_message: preview,
                        updated_at: now,
                        messages: transcript.clone(),
                    },
                );
                if visible {
                    st.active = Some(id);
                    st.messages = transcript;
                }
            }
            Some(id) => {
                if let Some(session) = st.sessions.iter_mut().find(|s| s.id == id) {
                    session.last_message = preview;
                    session.updated_at = now;
                    session.messages = transcript.clone();
                }
                st.sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                if visible {
                    st.messages = transcript;
                }
            }
        }

        SendOutcome::Replied(assistant)
    }
}

/// Title for a new session opened by `text`.
pub fn session_title(text: &str, address: Option<&str>) -> String {
    if let Some(addr) = address {
        let head: String = addr.chars().take(6).collect();
        return format!("Analysis: {head}...");
    }
    if text.trim().is_empty() {
        return IMAGE_SESSION_TITLE.to_string();
    }
    let words: Vec<&str> = text.split_whitespace().take(4).collect();
    format!("{}...", words.join(" "))
}

/// First `max_chars` characters of `text` followed by an ellipsis.
pub fn preview_text(text: &str, max_chars: usize) -> String {
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}
