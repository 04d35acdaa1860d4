//! Sass Language Server Implementation
//!
//! Publishes parse diagnostics for open documents and answers document formatting
//! requests, using tower-lsp over stdio.

use std::sync::{Arc, Mutex};

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use crate::sass::file_registry::FileRegistry;
use crate::sass::formatter::SassFormatter;
use crate::sass::options::{SassAstOptions, SassFormatConfig};

/// Sass Language Server
pub struct SassLanguageServer {
    client: Client,
    registry: Arc<FileRegistry>,
    /// tower-lsp requires the server to be Send + Sync, and settings change from `&self`
    state: Arc<Mutex<SassServerState>>,
}

/// Settings that change over the lifetime of the server
struct SassServerState {
    format_config: SassFormatConfig,
    /// Indentation used for parsing, updated from each formatting request
    ast_options: SassAstOptions,
}

impl SassLanguageServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            registry: Arc::new(FileRegistry::new()),
            state: Arc::new(Mutex::new(SassServerState {
                format_config: SassFormatConfig::default(),
                ast_options: SassAstOptions::default(),
            })),
        }
    }

    fn ast_options(&self) -> SassAstOptions {
        match self.state.lock() {
            Ok(state) => state.ast_options,
            Err(_) => {
                log::error!("[ast_options] Failed to acquire state lock");
                SassAstOptions::default()
            }
        }
    }

    fn formatter(&self) -> SassFormatter {
        match self.state.lock() {
            Ok(state) => SassFormatter::new(state.format_config.clone()),
            Err(_) => {
                log::error!("[formatter] Failed to acquire state lock");
                SassFormatter::default()
            }
        }
    }

    fn update_settings(&self, settings: &serde_json::Value) {
        match SassFormatConfig::from_settings(settings) {
            Ok(config) => {
                log::info!("Format configuration updated: {:?}", config);
                if let Ok(mut state) = self.state.lock() {
                    state.format_config = config;
                } else {
                    log::error!("[update_settings] Failed to acquire state lock");
                }
            }
            Err(e) => log::warn!("Ignoring invalid sass configuration: {}", e),
        }
    }

    /// Parse a document and publish its diagnostics
    async fn validate_document(&self, uri: &Url) {
        let options = self.ast_options();
        let version = self.registry.document(uri).map(|document| document.version.minor);

        match self.registry.parse_document(uri, &options).await {
            Ok(entry) => {
                let diagnostics = entry.diagnostics.iter().map(|d| d.to_lsp()).collect();
                self.client
                    .publish_diagnostics(uri.clone(), diagnostics, version)
                    .await;
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}", uri, e);
            }
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for SassLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options.as_ref() {
            self.update_settings(options);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                document_formatting_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "sass_code_native".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Sass Language Server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        self.registry.open_document(
            uri.clone(),
            params.text_document.text,
            params.text_document.version,
        );
        self.validate_document(&uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        self.registry
            .change_document(&uri, params.content_changes, params.text_document.version);
        self.validate_document(&uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.registry.close_document(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.update_settings(&params.settings);
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let uri = params.text_document.uri;
        let options = SassAstOptions::from(&params.options);
        if let Ok(mut state) = self.state.lock() {
            state.ast_options = options;
        }

        let Some(text) = self.registry.document_text(&uri) else {
            log::warn!("Formatting requested for unknown document: {}", uri);
            return Ok(None);
        };

        let edits = self.formatter().format(&text, &options);
        log::debug!("Formatting {} produced {} edits", uri, edits.len());
        Ok(Some(edits))
    }
}

/// Start the Sass Language Server on stdio
pub async fn start_sass_language_server() -> Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(SassLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
