// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `matrix shell` command implementation.
//!
//! Walks the user through the disclaimer and the invite-code gate, then
//! launches an interactive REPL over the chat store with readline history.
//! Preferences are read from and written back to the local store.

use std::io::IsTerminal;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use colored::{Color, Colorize};
use matrix_agent::locale::{self, Strings};
use matrix_agent::{
    Attachment, ChatStore, Language, LlmBridge, Preferences, SendOutcome, SettingsAction,
    SettingsState, ThemeMode, Tool, apply, is_dark,
};
use matrix_analysis::MockAnalysisEngine;
use matrix_config::model::MatrixConfig;
use matrix_core::types::ModelProvider;
use matrix_core::{KeyValueStore, MatrixError, PluginAdapter};
use matrix_deepseek::DeepSeekProvider;
use matrix_gate::{
    AccessFlow, ConsentLogger, EnvironmentSignals, GateError, HttpAddressLookup, InviteGate,
};
use matrix_gemini::GeminiProvider;
use matrix_storage::MemoryStore;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use strum::IntoEnumIterator;
use tracing::{info, warn};

use crate::commands::open_local_store;
use crate::render;

/// Seconds the disclaimer stays on screen before it can be accepted.
const DISCLAIMER_COUNTDOWN_SECS: u64 = 10;

const DISCLAIMER: &str = "\
IMPORTANT: closed beta user agreement and risk disclaimer

1. This system is an experimental tool in a closed internal test. Service may
   be interrupted, reset or withdrawn at any time.
2. Output is produced by generative models and may be wrong. Trace paths,
   fund-flow graphs, labels and risk scores are for technical reference only.
   They are not legal evidence and not investment advice. Verify every result
   independently on a block explorer before relying on it.
3. Only public ledger data is analyzed. Do not use the system to identify
   private individuals, to launder funds or evade controls, or to obtain keys
   or assets that are not yours. Do not enter secrets or personal data.
4. Prompts may be analyzed in de-identified form. Keys, seed phrases and
   identifying data are not stored.
5. Accounts used for unlawful activity are terminated without notice.";

const HELP: &str = "\
  /new              start a new investigation
  /sessions         list recent cases
  /open <n>         reopen case number n
  /model [name]     show or select the model (deepseek, flash, pro)
  /lang [code]      show or select the language (en, zh, ja)
  /theme [mode]     show or select the theme (system, light, dark)
  /attach <path>    attach a file to the next message
  /detach           drop the pending attachment
  /tool [name]      start a tool (profiler, graph, audit, trace)
  /clear            delete all cases
  /export [path]    export all cases as JSON
  /settings         show account settings
  /profile <n> <e>  set profile name and email
  /key [show|regen] show, reveal or regenerate the API key
  /2fa              toggle two-factor authentication
  /card <last4>     update the billing card
  /logout           log out and exit
  /help             show this help
  /quit             exit";

/// A parsed line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    New,
    Sessions,
    Open(Option<&'a str>),
    Model(Option<&'a str>),
    Lang(Option<&'a str>),
    Theme(Option<&'a str>),
    Attach(Option<&'a str>),
    Detach,
    Tool(Option<&'a str>),
    Clear,
    Export(Option<&'a str>),
    Settings,
    Profile(Option<&'a str>),
    Key(Option<&'a str>),
    TwoFactor,
    Card(Option<&'a str>),
    Logout,
    Help,
    Quit,
    Unknown(&'a str),
    Message(&'a str),
}

fn parse_command(line: &str) -> ShellCommand<'_> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return ShellCommand::Message(line);
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    match name {
        "new" => ShellCommand::New,
        "sessions" => ShellCommand::Sessions,
        "open" => ShellCommand::Open(arg),
        "model" => ShellCommand::Model(arg),
        "lang" => ShellCommand::Lang(arg),
        "theme" => ShellCommand::Theme(arg),
        "attach" => ShellCommand::Attach(arg),
        "detach" => ShellCommand::Detach,
        "tool" => ShellCommand::Tool(arg),
        "clear" => ShellCommand::Clear,
        "export" => ShellCommand::Export(arg),
        "settings" => ShellCommand::Settings,
        "profile" => ShellCommand::Profile(arg),
        "key" => ShellCommand::Key(arg),
        "2fa" => ShellCommand::TwoFactor,
        "card" => ShellCommand::Card(arg),
        "logout" => ShellCommand::Logout,
        "help" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(name),
    }
}

/// Accepts canonical provider names plus `flash` and `pro`.
fn parse_model(name: &str) -> Option<ModelProvider> {
    match name.to_ascii_lowercase().as_str() {
        "flash" => Some(ModelProvider::GeminiFlash),
        "pro" => Some(ModelProvider::GeminiPro),
        other => ModelProvider::from_str(other).ok(),
    }
}

/// Splits `name words <email>` on the last whitespace.
fn parse_profile(arg: Option<&str>) -> (String, String) {
    match arg.and_then(|a| a.rsplit_once(char::is_whitespace)) {
        Some((name, email)) => (name.trim().to_string(), email.to_string()),
        None => (arg.unwrap_or_default().to_string(), String::new()),
    }
}

/// Reads a `COLORFGBG` value (`fg;bg`); dark unless the background is light.
fn prefers_dark(colorfgbg: Option<&str>) -> bool {
    colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_none_or(|bg| bg < 7 || bg == 8)
}

fn terminal_prefers_dark() -> bool {
    prefers_dark(std::env::var("COLORFGBG").ok().as_deref())
}

enum Flow {
    Continue,
    Quit,
}

/// REPL state around one chat store.
struct Shell {
    chat: ChatStore,
    local: Arc<dyn KeyValueStore>,
    settings: SettingsState,
    pending: Option<Attachment>,
    prefill: Option<&'static str>,
    use_color: bool,
}

impl Shell {
    fn new(chat: ChatStore, local: Arc<dyn KeyValueStore>, settings: SettingsState) -> Self {
        chat.select_provider(settings.preferences.model);
        Self {
            chat,
            local,
            settings,
            pending: None,
            prefill: None,
            use_color: std::io::stdout().is_terminal(),
        }
    }

    fn strings(&self) -> &'static Strings {
        locale::strings(self.settings.preferences.language)
    }

    fn accent(&self) -> Color {
        if is_dark(self.settings.preferences.theme, terminal_prefers_dark()) {
            Color::BrightCyan
        } else {
            Color::Blue
        }
    }

    fn paint(&self, text: &str) -> String {
        if self.use_color {
            text.color(self.accent()).to_string()
        } else {
            text.to_string()
        }
    }

    fn prompt(&self) -> String {
        let mut prompt = format!("matrix[{}]", self.chat.provider());
        if let Some(attachment) = &self.pending {
            prompt.push_str(&format!(" +{}", attachment.name));
        }
        format!("{}> ", self.paint(&prompt))
    }

    fn print_welcome(&self) {
        let s = self.strings();
        let title = if self.use_color {
            s.app_title.color(self.accent()).bold().to_string()
        } else {
            s.app_title.to_string()
        };
        println!("{title}");
        println!("{}", s.welcome());
        println!("{}\n", s.welcome_desc);
        for suggestion in s.suggestions {
            println!("  - {suggestion}");
        }
        println!("\nType {} for commands.\n", self.paint("/help"));
    }

    /// Applies a settings action and persists the resulting preferences.
    async fn update_settings(&mut self, action: SettingsAction) -> bool {
        match apply(&self.settings, action) {
            Ok(next) => {
                self.settings = next;
                if let Err(e) = self.settings.preferences.save(self.local.as_ref()).await {
                    warn!(error = %e, "failed to save preferences");
                }
                true
            }
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                false
            }
        }
    }

    fn print_settings(&self) {
        let s = self.strings();
        let state = &self.settings;
        let on_off = |on: bool| if on { "on" } else { "off" };
        println!("{}", s.settings);
        println!(
            "  [{}] {} <{}>  {}",
            state.profile.initials(),
            state.profile.name,
            state.profile.email,
            state.profile.plan
        );
        println!("  API key:  {}", state.api_key.masked());
        println!("  {}: {}", s.two_factor, on_off(state.security.two_factor));
        println!("  Card:     **** {}", state.billing.card_last4);
        println!(
            "  {}: {}  {}: {}  model: {}",
            s.language,
            state.preferences.language.native_name(),
            s.appearance,
            state.preferences.theme,
            state.preferences.model
        );
    }

    async fn send(&mut self, text: &str) {
        if self.use_color {
            eprintln!("{}", "analyzing...".dimmed());
        }
        let attachment = self.pending.take();
        match self.chat.send(text, attachment).await {
            SendOutcome::Replied(message) => {
                println!("\n{}", message.text);
                if let Some(report) = &message.analysis {
                    println!();
                    print!("{}", render::render_report(report, self.use_color));
                }
                println!();
            }
            SendOutcome::Busy => eprintln!("still waiting for the previous reply"),
            SendOutcome::Ignored => {}
        }
    }

    async fn handle(&mut self, command: ShellCommand<'_>) -> Flow {
        let s = self.strings();
        match command {
            ShellCommand::Quit => return Flow::Quit,
            ShellCommand::Message(text) => self.send(text).await,
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::New => {
                self.chat.start_new_chat();
                println!("{}", s.new_chat);
            }
            ShellCommand::Sessions => {
                let sessions = self.chat.sessions();
                if sessions.is_empty() {
                    println!("no cases yet");
                } else {
                    println!("{}", s.recent_cases);
                    let active = self.chat.active_session_id();
                    print!("{}", render::render_sessions(&sessions, active.as_deref()));
                }
            }
            ShellCommand::Open(arg) => {
                let sessions = self.chat.sessions();
                let picked = arg
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| sessions.get(i));
                match picked {
                    Some(session) if self.chat.select_session(&session.id) => {
                        println!("{}", session.title);
                        for message in self.chat.messages() {
                            println!("[{}] {}", message.role, message.text);
                        }
                    }
                    _ => eprintln!("usage: /open <n> (see /sessions)"),
                }
            }
            ShellCommand::Model(None) => {
                let current = self.chat.provider();
                for provider in ModelProvider::ALL {
                    let marker = if provider == current { "*" } else { " " };
                    let note = if self.chat_has_backend(provider) {
                        ""
                    } else {
                        "  (no API key)"
                    };
                    println!("{marker} {provider}{note}");
                }
            }
            ShellCommand::Model(Some(name)) => match parse_model(name) {
                Some(provider) => {
                    if self.update_settings(SettingsAction::SetModel(provider)).await {
                        self.chat.select_provider(provider);
                        println!("model: {provider}");
                    }
                }
                None => eprintln!("unknown model: {name}"),
            },
            ShellCommand::Lang(None) => {
                println!("{}: {}", s.language, self.settings.preferences.language.native_name());
                println!("{}", s.lang_desc);
            }
            ShellCommand::Lang(Some(code)) => match Language::from_str(code) {
                Ok(language) => {
                    if self.update_settings(SettingsAction::SetLanguage(language)).await {
                        let s = self.strings();
                        println!("{}: {}", s.language, language.native_name());
                    }
                }
                Err(_) => eprintln!("unknown language: {code} (en, zh, ja)"),
            },
            ShellCommand::Theme(None) => {
                let label = match self.settings.preferences.theme {
                    ThemeMode::System => s.system,
                    ThemeMode::Light => s.light,
                    ThemeMode::Dark => s.dark,
                };
                println!("{}: {label}", s.appearance);
            }
            ShellCommand::Theme(Some(mode)) => match ThemeMode::from_str(mode) {
                Ok(theme) => {
                    if self.update_settings(SettingsAction::SetTheme(theme)).await {
                        println!("{}: {theme}", s.appearance);
                    }
                }
                Err(_) => eprintln!("unknown theme: {mode} (system, light, dark)"),
            },
            ShellCommand::Attach(None) => eprintln!("usage: /attach <path>"),
            ShellCommand::Attach(Some(path)) => match Attachment::from_path(path).await {
                Ok(attachment) => {
                    if !self.chat.provider().is_multimodal() {
                        eprintln!(
                            "note: {} ignores attachments, switch with /model flash",
                            self.chat.provider()
                        );
                    }
                    println!("attached {} ({})", attachment.name, attachment.mime_type);
                    self.pending = Some(attachment);
                }
                Err(e) => eprintln!("{}: {e}", "error".red()),
            },
            ShellCommand::Detach => {
                if self.pending.take().is_some() {
                    println!("attachment removed");
                }
            }
            ShellCommand::Tool(None) => {
                println!("{}", s.tools);
                for tool in Tool::iter() {
                    println!("  {tool}");
                }
            }
            ShellCommand::Tool(Some(name)) => {
                let prefix = self.chat.activate_tool(name);
                self.prefill = Some(prefix);
            }
            ShellCommand::Clear => {
                self.chat.clear_history();
                println!("{}", s.clear_history);
            }
            ShellCommand::Export(target) => match self.chat.export_json() {
                Ok(json) => match target {
                    Some(path) => match tokio::fs::write(path, &json).await {
                        Ok(()) => println!("{}: {path}", s.export_data),
                        Err(e) => eprintln!("{}: {e}", "error".red()),
                    },
                    None => println!("{json}"),
                },
                Err(e) => eprintln!("{}: {e}", "error".red()),
            },
            ShellCommand::Settings => self.print_settings(),
            ShellCommand::Profile(arg) => {
                let (name, email) = parse_profile(arg);
                if self.update_settings(SettingsAction::UpdateProfile { name, email }).await {
                    println!("{} <{}>", self.settings.profile.name, self.settings.profile.email);
                }
            }
            ShellCommand::Key(None) => println!("API key: {}", self.settings.api_key.masked()),
            ShellCommand::Key(Some("show")) => {
                if self.update_settings(SettingsAction::ToggleKeyVisibility).await {
                    println!("API key: {}", self.settings.api_key.masked());
                }
            }
            ShellCommand::Key(Some("regen")) => {
                if self.update_settings(SettingsAction::RegenerateKey).await {
                    if self.settings.api_key.confirm_pending {
                        println!("{}: run /key regen again to confirm", s.regen_key);
                    } else {
                        println!("API key: {}", self.settings.api_key.masked());
                    }
                }
            }
            ShellCommand::Key(Some(other)) => eprintln!("usage: /key [show|regen], got {other}"),
            ShellCommand::TwoFactor => {
                if self.update_settings(SettingsAction::ToggleTwoFactor).await {
                    let state = if self.settings.security.two_factor {
                        "on"
                    } else {
                        "off"
                    };
                    println!("{}: {state}", s.two_factor);
                }
            }
            ShellCommand::Card(arg) => {
                let last4 = arg.unwrap_or_default().to_string();
                if self.update_settings(SettingsAction::UpdateCard { last4 }).await {
                    println!("Card: **** {}", self.settings.billing.card_last4);
                }
            }
            ShellCommand::Logout => {
                println!("{}", s.logout);
                return Flow::Quit;
            }
            ShellCommand::Unknown(name) => eprintln!("unknown command: /{name} (try /help)"),
        }
        Flow::Continue
    }

    fn chat_has_backend(&self, provider: ModelProvider) -> bool {
        self.chat.bridge().is_registered(provider)
    }
}

/// Reads one line; `None` on Ctrl+C, Ctrl+D or a terminal error.
fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Option<String> {
    match rl.readline(prompt) {
        Ok(line) => Some(line),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            None
        }
    }
}

fn confirm(rl: &mut DefaultEditor, question: &str) -> bool {
    read_line(rl, &format!("{question} [y/N] "))
        .is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Disclaimer then invite code. Returns `false` if the user leaves.
async fn run_access(rl: &mut DefaultEditor, flow: &mut AccessFlow) -> Result<bool, MatrixError> {
    println!("{DISCLAIMER}\n");

    if !flow.consent().has_consented().await? {
        for remaining in (1..=DISCLAIMER_COUNTDOWN_SECS).rev() {
            eprint!("\rplease read the agreement ({remaining}s) ");
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        eprintln!("\r{}", " ".repeat(40));
    }

    if !confirm(rl, "I have read and understood the agreement above.")
        || !confirm(rl, "I accept the risks and will use the system lawfully.")
    {
        println!("declined, exiting");
        return Ok(false);
    }
    flow.accept_disclaimer().await;

    loop {
        let Some(line) = read_line(rl, "invite code> ") else {
            return Ok(false);
        };
        match flow.login(&line).await {
            Ok(code) => {
                println!("{} {code}\n", "access granted:".green());
                return Ok(true);
            }
            Err(GateError::Locked { retry_after: None }) => {
                eprintln!("{}", "too many failed attempts, restart to try again".red());
                return Ok(false);
            }
            Err(GateError::Locked {
                retry_after: Some(wait),
            }) => {
                eprintln!(
                    "{}",
                    format!("too many failed attempts, try again in {}s", wait.as_secs()).red()
                );
            }
            Err(GateError::Storage(e)) => return Err(e),
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }
}

/// Registers every provider whose credentials resolve.
async fn build_bridge(config: &MatrixConfig) -> LlmBridge {
    let mut bridge = LlmBridge::from_config(config).await;

    match DeepSeekProvider::new(config) {
        Ok(provider) => bridge.register(ModelProvider::DeepSeek, Arc::new(provider)),
        Err(e) => warn!(error = %e, "DeepSeek unavailable, replies will fall back"),
    }
    match GeminiProvider::new(config) {
        Ok(provider) => {
            let provider = Arc::new(provider);
            bridge.register(ModelProvider::GeminiFlash, provider.clone());
            bridge.register(ModelProvider::GeminiPro, provider);
        }
        Err(e) => warn!(error = %e, "Gemini unavailable, replies will fall back"),
    }
    bridge
}

/// Runs the `matrix shell` interactive REPL.
pub async fn run_shell(config: MatrixConfig) -> Result<(), MatrixError> {
    let local = open_local_store(&config).await?;
    let session: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let preferences = Preferences::load(local.as_ref()).await.unwrap_or_else(|e| {
        warn!(error = %e, "failed to load preferences, using defaults");
        Preferences::default()
    });

    let mut rl = DefaultEditor::new()
        .map_err(|e| MatrixError::Internal(format!("failed to initialize readline: {e}")))?;

    let lookup = Arc::new(HttpAddressLookup::new(&config.consent)?);
    let consent = ConsentLogger::new(
        &config.consent,
        local.clone(),
        lookup,
        EnvironmentSignals::detect(),
    );
    let mut flow = AccessFlow::new(consent, InviteGate::new(&config.gate, session));
    if !run_access(&mut rl, &mut flow).await? {
        local.shutdown().await?;
        return Ok(());
    }

    let bridge = Arc::new(build_bridge(&config).await);
    let chat = ChatStore::new(bridge, Arc::new(MockAnalysisEngine::new()), &config.chat);
    let mut shell = Shell::new(chat, local.clone(), SettingsState::with_preferences(preferences));
    info!(provider = %shell.chat.provider(), "shell started");
    shell.print_welcome();

    loop {
        let prompt = shell.prompt();
        let read = match shell.prefill.take() {
            Some(prefix) => rl.readline_with_initial(&prompt, (prefix, "")),
            None => rl.readline(&prompt),
        };
        let line = match read {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        if line.trim().is_empty() && shell.pending.is_none() {
            continue;
        }
        let _ = rl.add_history_entry(&line);

        let command = parse_command(&line);
        if command == ShellCommand::Clear && !confirm(&mut rl, shell.strings().danger_zone) {
            continue;
        }
        if let Flow::Quit = shell.handle(command).await {
            break;
        }
    }

    local.shutdown().await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}
