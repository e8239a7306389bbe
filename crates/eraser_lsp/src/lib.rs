//! eraser_lsp: Language Server Protocol implementation.
//!
//! Publishes emoji diagnostics for open documents, offers a quick fix per
//! emoji, and implements the editor commands. Scans are debounced per
//! document: opening a document or changing configuration scans right away,
//! edits wait for typing to pause.

#![allow(clippy::needless_update)]

mod debounce;

pub use debounce::Debouncer;

use eraser_core::text::{LineAndColumn, LineMap, TextSpan};
use eraser_diagnostics::Severity;
use eraser_ls::{is_scannable_uri, ExcludeKind, LanguageService};
use eraser_options::{load_settings_file, Settings, CONFIG_FILE_NAME};
use eraser_project::{remove_emojis_from_file, FileError, RemovalSummary};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

/// Delay before scanning a newly opened document or after a settings change.
pub const OPEN_DELAY: Duration = Duration::ZERO;
/// Delay before scanning an edited document.
pub const EDIT_DELAY: Duration = Duration::from_millis(150);

pub const REMOVE_EMOJI_COMMAND: &str = "emojiEraser.removeEmoji";
pub const REMOVE_FROM_FILES_COMMAND: &str = "emojiEraser.removeEmojisFromFiles";
pub const EXCLUDE_FILE_COMMAND: &str = "emojiEraser.excludeThisFile";
pub const EXCLUDE_EXTENSION_COMMAND: &str = "emojiEraser.excludeAllWithSameExtension";
pub const EXCLUDE_FOLDER_COMMAND: &str = "emojiEraser.excludeThisFolder";

const DIAGNOSTIC_SOURCE: &str = "emoji-eraser";

fn lock(ls: &Mutex<LanguageService>) -> MutexGuard<'_, LanguageService> {
    ls.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The LSP backend.
pub struct EmojiEraserLspServer {
    client: Client,
    language_service: Arc<Mutex<LanguageService>>,
    debouncer: Debouncer,
}

impl EmojiEraserLspServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            language_service: Arc::new(Mutex::new(LanguageService::new())),
            debouncer: Debouncer::new(),
        }
    }

    fn position_to_offset(text: &str, line_map: &LineMap, position: Position) -> u32 {
        line_map.offset_of(text, LineAndColumn::new(position.line, position.character))
    }

    fn offset_to_position(text: &str, line_map: &LineMap, offset: u32) -> Position {
        let lc = line_map.line_and_column_of(text, offset);
        Position::new(lc.line, lc.character)
    }

    fn span_to_range(text: &str, line_map: &LineMap, span: TextSpan) -> Range {
        Range::new(
            Self::offset_to_position(text, line_map, span.start),
            Self::offset_to_position(text, line_map, span.end()),
        )
    }

    fn to_lsp_diagnostic(
        text: &str,
        line_map: &LineMap,
        diagnostic: &eraser_diagnostics::Diagnostic,
    ) -> Diagnostic {
        Diagnostic {
            range: Self::span_to_range(text, line_map, diagnostic.span),
            severity: Some(to_lsp_severity(diagnostic.severity)),
            code: Some(NumberOrString::Number(diagnostic.code as i32)),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: diagnostic.message_text.clone(),
            ..Default::default()
        }
    }

    /// Scan a document after `delay`, replacing any scan already pending.
    fn schedule_scan(&self, uri: Url, delay: Duration) {
        if !is_scannable_uri(uri.as_str()) {
            return;
        }
        let client = self.client.clone();
        let language_service = Arc::clone(&self.language_service);
        let key = uri.to_string();
        self.debouncer.schedule(key, delay, async move {
            publish_diagnostics(&client, &language_service, uri).await;
        });
    }

    /// Re-scan every open document immediately.
    fn rescan_all(&self) {
        let uris = lock(&self.language_service).document_uris();
        for uri in uris {
            match Url::parse(&uri) {
                Ok(uri) => self.schedule_scan(uri, OPEN_DELAY),
                Err(err) => tracing::warn!(uri = %uri, error = %err, "unparseable document URI"),
            }
        }
    }

    /// Remove every emoji from an open document. Returns whether the client
    /// applied an edit.
    async fn remove_emoji(&self, uri: Url) -> bool {
        let edit = {
            let ls = lock(&self.language_service);
            let key = uri.as_str();
            let Some(text) = ls.get_document_text(key) else {
                return false;
            };
            let Some(edit) = ls.remove_all_edit(key) else {
                return false;
            };
            let line_map = LineMap::new(text);
            TextEdit::new(Self::span_to_range(text, &line_map, edit.span), edit.new_text)
        };

        self.apply_edits(uri, vec![edit]).await
    }

    async fn apply_edits(&self, uri: Url, edits: Vec<TextEdit>) -> bool {
        let mut changes = HashMap::new();
        changes.insert(uri, edits);
        match self.client.apply_edit(WorkspaceEdit::new(changes)).await {
            Ok(response) => response.applied,
            Err(err) => {
                tracing::warn!(error = %err, "workspace/applyEdit failed");
                false
            }
        }
    }

    /// Remove every emoji from each file. Open documents are edited through
    /// the client; other files are rewritten on disk.
    async fn remove_emojis_from_files(&self, uris: Vec<Url>) {
        if uris.is_empty() {
            return;
        }

        let mut summary = RemovalSummary {
            attempted: uris.len(),
            ..RemovalSummary::default()
        };
        for uri in uris {
            let is_open = lock(&self.language_service).is_open(uri.as_str());
            if is_open {
                if self.remove_emoji(uri).await {
                    summary.changed += 1;
                }
                continue;
            }

            let Ok(path) = uri.to_file_path() else {
                continue;
            };
            match remove_emojis_from_file(&path) {
                Ok(true) => summary.changed += 1,
                Ok(false) => {}
                Err(FileError::NotUtf8 { .. }) => summary.skipped += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to remove emojis");
                    summary.failures.push(err);
                }
            }
        }

        self.client
            .show_message(MessageType::INFO, format!("Emoji Eraser: {}", summary.message()))
            .await;
    }

    async fn exclude(&self, uri: Url, kind: ExcludeKind) {
        let Ok(path) = uri.to_file_path() else {
            return;
        };

        let result = {
            let mut ls = lock(&self.language_service);
            let relative = ls.relative_path_of(&path);
            ls.add_exclusion(&path, kind)
                .map(|outcome| outcome.message(kind, &relative))
        };

        match result {
            Ok(message) => {
                self.client.show_message(MessageType::INFO, message).await;
                self.rescan_all();
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to add exclusion");
                self.client
                    .show_message(MessageType::ERROR, format!("Emoji Eraser: {}", err))
                    .await;
            }
        }
    }
}

async fn publish_diagnostics(
    client: &Client,
    language_service: &Mutex<LanguageService>,
    uri: Url,
) {
    let (diagnostics, version) = {
        let ls = lock(language_service);
        let key = uri.as_str();
        let Some(text) = ls.get_document_text(key) else {
            return;
        };
        let line_map = LineMap::new(text);
        let diagnostics = ls
            .get_diagnostics(key)
            .iter()
            .map(|d| EmojiEraserLspServer::to_lsp_diagnostic(text, &line_map, d))
            .collect::<Vec<_>>();
        (diagnostics, ls.get_document_version(key))
    };

    tracing::debug!(uri = %uri, count = diagnostics.len(), "publishing diagnostics");
    client.publish_diagnostics(uri, diagnostics, version).await;
}

fn to_lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Hint => DiagnosticSeverity::HINT,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Error => DiagnosticSeverity::ERROR,
    }
}

/// Collect URIs with one of `schemes` from command arguments, which may be
/// single URI strings or arrays of them. Duplicates are kept once.
fn uri_arguments(arguments: &[Value], schemes: &[&str]) -> Vec<Url> {
    let mut uris: Vec<Url> = Vec::new();
    let mut add = |value: &Value| {
        let Some(uri) = value.as_str().and_then(|s| Url::parse(s).ok()) else {
            return;
        };
        if schemes.contains(&uri.scheme()) && !uris.contains(&uri) {
            uris.push(uri);
        }
    };
    for argument in arguments {
        match argument {
            Value::Array(values) => values.iter().for_each(&mut add),
            value => add(value),
        }
    }
    uris
}

/// The workspace root from the initialize request.
#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    let folder = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri);
    folder
        .or(params.root_uri.as_ref())
        .and_then(|uri| uri.to_file_path().ok())
}

/// Settings at startup: initialization options win over the workspace
/// config file, which wins over defaults.
fn initial_settings(root: Option<&PathBuf>, options: Option<&Value>) -> Settings {
    if let Some(settings) = options.and_then(Settings::from_editor_value) {
        return settings;
    }
    let Some(root) = root else {
        return Settings::default();
    };
    match load_settings_file(&root.join(CONFIG_FILE_NAME)) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "using default settings");
            Settings::default()
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for EmojiEraserLspServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root = workspace_root(&params);
        let settings = initial_settings(root.as_ref(), params.initialization_options.as_ref());
        {
            let mut ls = lock(&self.language_service);
            ls.set_workspace_root(root);
            ls.set_settings(settings);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        ..Default::default()
                    },
                )),
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                        ..Default::default()
                    },
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![
                        REMOVE_EMOJI_COMMAND.to_string(),
                        REMOVE_FROM_FILES_COMMAND.to_string(),
                        EXCLUDE_FILE_COMMAND.to_string(),
                        EXCLUDE_EXTENSION_COMMAND.to_string(),
                        EXCLUDE_FOLDER_COMMAND.to_string(),
                    ],
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "emoji-eraser".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "emoji-eraser language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.debouncer.cancel_all();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        {
            let mut ls = lock(&self.language_service);
            ls.open_document(
                uri.to_string(),
                uri.to_file_path().ok(),
                params.text_document.text,
                &params.text_document.language_id,
                params.text_document.version,
            );
        }
        self.schedule_scan(uri, OPEN_DELAY);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        {
            let mut ls = lock(&self.language_service);
            // We use FULL sync, so take the last change
            if let Some(change) = params.content_changes.into_iter().last() {
                ls.update_document(uri.as_str(), change.text, params.text_document.version);
            }
        }
        self.schedule_scan(uri, EDIT_DELAY);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.debouncer.cancel(uri.as_str());
        lock(&self.language_service).close_document(uri.as_str());
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let Some(settings) = Settings::from_editor_value(&params.settings) else {
            return;
        };
        let changed = lock(&self.language_service).set_settings(settings);
        if changed {
            tracing::info!("settings changed, rescanning open documents");
            self.rescan_all();
        }
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;

        let actions = {
            let ls = lock(&self.language_service);
            let key = uri.as_str();
            let Some(text) = ls.get_document_text(key) else {
                return Ok(None);
            };
            let line_map = LineMap::new(text);
            let span = TextSpan::from_bounds(
                Self::position_to_offset(text, &line_map, params.range.start),
                Self::position_to_offset(text, &line_map, params.range.end),
            );

            ls.get_quick_fixes(key, span)
                .into_iter()
                .map(|(diagnostic, fix)| {
                    let range = Self::span_to_range(text, &line_map, fix.edit.span);
                    let mut changes = HashMap::new();
                    changes.insert(uri.clone(), vec![TextEdit::new(range, fix.edit.new_text)]);
                    CodeActionOrCommand::CodeAction(CodeAction {
                        title: fix.title.to_string(),
                        kind: Some(CodeActionKind::QUICKFIX),
                        diagnostics: Some(vec![Self::to_lsp_diagnostic(
                            text,
                            &line_map,
                            &diagnostic,
                        )]),
                        edit: Some(WorkspaceEdit::new(changes)),
                        is_preferred: Some(fix.is_preferred),
                        ..Default::default()
                    })
                })
                .collect::<Vec<_>>()
        };

        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        // Only the open-document command works on unsaved buffers.
        let schemes: &[&str] = match params.command.as_str() {
            REMOVE_EMOJI_COMMAND => &["file", "untitled"],
            _ => &["file"],
        };
        let mut uris = uri_arguments(&params.arguments, schemes).into_iter();
        match params.command.as_str() {
            REMOVE_EMOJI_COMMAND => {
                if let Some(uri) = uris.next() {
                    self.remove_emoji(uri).await;
                }
            }
            REMOVE_FROM_FILES_COMMAND => self.remove_emojis_from_files(uris.collect()).await,
            EXCLUDE_FILE_COMMAND | EXCLUDE_EXTENSION_COMMAND | EXCLUDE_FOLDER_COMMAND => {
                let kind = match params.command.as_str() {
                    EXCLUDE_FILE_COMMAND => ExcludeKind::File,
                    EXCLUDE_EXTENSION_COMMAND => ExcludeKind::Extension,
                    _ => ExcludeKind::Folder,
                };
                if let Some(uri) = uris.next() {
                    self.exclude(uri, kind).await;
                }
            }
            other => tracing::warn!(command = other, "unknown command"),
        }
        Ok(None)
    }
}

/// Start the LSP server.
pub async fn start_lsp_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(EmojiEraserLspServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uri_arguments() {
        let args = vec![
            json!("file:///a.rs"),
            json!(["file:///b.rs", "file:///a.rs", "untitled:Untitled-1"]),
            json!(42),
        ];
        let uris: Vec<String> = uri_arguments(&args, &["file"])
            .iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(uris, vec!["file:///a.rs", "file:///b.rs"]);
    }

    #[test]
    fn test_untitled_uri_arguments() {
        let args = vec![json!("untitled:Untitled-1"), json!("vscode-notebook:/x")];
        let uris: Vec<String> = uri_arguments(&args, &["file", "untitled"])
            .iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(uris, vec!["untitled:Untitled-1"]);
        assert!(uri_arguments(&args, &["file"]).is_empty());
    }

    #[test]
    fn test_positions_use_utf16_columns() {
        let text = "a\u{1F600}b\nc";
        let line_map = LineMap::new(text);
        let b = text.find('b').unwrap() as u32;
        assert_eq!(
            EmojiEraserLspServer::offset_to_position(text, &line_map, b),
            Position::new(0, 3)
        );
        assert_eq!(
            EmojiEraserLspServer::position_to_offset(text, &line_map, Position::new(0, 3)),
            b
        );
        let c = text.find('c').unwrap() as u32;
        assert_eq!(
            EmojiEraserLspServer::offset_to_position(text, &line_map, c),
            Position::new(1, 0)
        );
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(to_lsp_severity(Severity::Hint), DiagnosticSeverity::HINT);
        assert_eq!(to_lsp_severity(Severity::Error), DiagnosticSeverity::ERROR);
    }

    #[test]
    fn test_initial_settings_precedence() {
        let dir = std::env::temp_dir().join("emoji-eraser-no-such-root");
        let options = json!({ "emojiChecker": { "severity": "hint" } });
        let settings = initial_settings(Some(&dir), Some(&options));
        assert_eq!(settings.severity, Severity::Hint);

        let settings = initial_settings(Some(&dir), None);
        assert_eq!(settings, Settings::default());
        assert_eq!(initial_settings(None, None), Settings::default());
    }
}
