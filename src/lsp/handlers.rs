use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::archive::PackageRegistry;
use crate::core::SourceDocument;
use crate::lsp::backend::Backend;
use crate::lsp::document::DocumentState;
use crate::parser::locate_header;
use crate::validation::{Severity, HOST_PACKAGE};

/// Trait for handling hover requests
#[tower_lsp::async_trait]
pub trait HandleHover {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>>;
}

/// Trait for handling completion requests
#[tower_lsp::async_trait]
pub trait HandleCompletion {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>>;
}

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    fn create_document_state(&self, content: String, language_id: String) -> DocumentState;
    async fn publish_diagnostics(&self, uri: Url);
    fn create_lsp_diagnostic(
        &self,
        document: &SourceDocument,
        diagnostic: crate::validation::Diagnostic,
    ) -> tower_lsp::lsp_types::Diagnostic;
}

#[tower_lsp::async_trait]
impl HandleHover for Backend {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let tdpp = params.text_document_position_params;
        let uri = tdpp.text_document.uri;
        let pos = tdpp.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let Some(line) = header_line_at(&doc_state.document, pos.line) else {
            return Ok(None);
        };
        let Some(name) = symbol_at(line, char_index(line, pos.character)) else {
            return Ok(None);
        };

        let registry = self.packages.read().await;
        let value = match package_description(&registry, &name) {
            Some(value) => value,
            None => return Ok(None),
        };

        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: None,
        }))
    }
}

#[tower_lsp::async_trait]
impl HandleCompletion for Backend {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let Some(line) = header_line_at(&doc_state.document, pos.line) else {
            return Ok(None);
        };
        let prefix = symbol_prefix(line, char_index(line, pos.character));

        let registry = self.packages.read().await;
        let completions = package_completions(&registry, &prefix);

        if completions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CompletionResponse::Array(completions)))
        }
    }
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    fn create_document_state(&self, content: String, language_id: String) -> DocumentState {
        DocumentState {
            document: SourceDocument::new(content),
            language_id,
        }
    }

    /// Run the registered checkers and publish what they report
    async fn publish_diagnostics(&self, uri: Url) {
        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return,
        };

        let packages = self.packages.read().await.clone();
        let diagnostics: Vec<_> = self
            .checkers
            .run_checks(&doc_state.language_id, &doc_state.document, &packages)
            .into_iter()
            .map(|diagnostic| self.create_lsp_diagnostic(&doc_state.document, diagnostic))
            .collect();
        drop(docs);

        log::debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);
        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }

    fn create_lsp_diagnostic(
        &self,
        document: &SourceDocument,
        diagnostic: crate::validation::Diagnostic,
    ) -> tower_lsp::lsp_types::Diagnostic {
        let severity = match diagnostic.severity {
            Severity::Error => DiagnosticSeverity::ERROR,
            Severity::Warning => DiagnosticSeverity::WARNING,
        };

        // Diagnostic lines are 1-based; line 0 marks a document-level finding
        let line = diagnostic.line.saturating_sub(1);
        let end = document
            .line(line + 1)
            .map(|text| text.encode_utf16().count())
            .unwrap_or(0)
            .max(diagnostic.column);

        tower_lsp::lsp_types::Diagnostic::new(
            Range::new(
                Position::new(line as u32, diagnostic.column as u32),
                Position::new(line as u32, end as u32),
            ),
            Some(severity),
            None,
            Some("pkgreq-ls".to_string()),
            diagnostic.message,
            None,
            None,
        )
    }
}

/// Text of the header line if `line` (0-based) is the Package-Requires line
fn header_line_at(document: &SourceDocument, line: u32) -> Option<&str> {
    let header = locate_header(document.text())?;
    if header.line != line as usize + 1 {
        return None;
    }
    document.line(header.line)
}

/// Convert an LSP (UTF-16) column into a `char` index within `line`
fn char_index(line: &str, utf16_offset: u32) -> usize {
    let mut units = 0;
    for (index, c) in line.chars().enumerate() {
        if units >= utf16_offset as usize {
            return index;
        }
        units += c.len_utf16();
    }
    line.chars().count()
}

fn is_symbol_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '"' | '\'' | ';' | ':')
}

/// Symbol surrounding the cursor
fn symbol_at(line: &str, character: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    let character = character.min(chars.len());

    let mut start = character;
    while start > 0 && is_symbol_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = character;
    while end < chars.len() && is_symbol_char(chars[end]) {
        end += 1;
    }

    if start >= end {
        return None;
    }
    Some(chars[start..end].iter().collect())
}

/// Symbol text between its start and the cursor
fn symbol_prefix(line: &str, character: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let character = character.min(chars.len());

    let mut start = character;
    while start > 0 && is_symbol_char(chars[start - 1]) {
        start -= 1;
    }
    chars[start..character].iter().collect()
}

fn package_description(registry: &PackageRegistry, name: &str) -> Option<String> {
    if name == HOST_PACKAGE {
        return Some(format!(
            "**{}**\n\nMinimum Emacs version required by this package.",
            HOST_PACKAGE
        ));
    }

    let package = registry.get(name)?;
    let mut text = format!("**{}**", package.entry.name);
    if let Some(version) = &package.entry.version {
        text.push_str(&format!(" {}", version));
    }
    text.push_str(&format!(" _({})_", package.archive));
    if let Some(summary) = &package.entry.summary {
        text.push_str(&format!("\n\n{}", summary));
    }
    Some(text)
}

fn package_completions(registry: &PackageRegistry, prefix: &str) -> Vec<CompletionItem> {
    std::iter::once(HOST_PACKAGE)
        .chain(registry.names())
        .filter(|name| name.starts_with(prefix))
        .map(|name| {
            let detail = registry
                .get(name)
                .map(|package| match &package.entry.version {
                    Some(version) => format!("{} ({})", version, package.archive),
                    None => package.archive.clone(),
                })
                .unwrap_or_else(|| "Emacs version".to_string());

            CompletionItem {
                label: name.to_string(),
                kind: Some(CompletionItemKind::MODULE),
                detail: Some(detail),
                documentation: registry
                    .get(name)
                    .and_then(|package| package.entry.summary.clone())
                    .map(Documentation::String),
                ..Default::default()
            }
        })
        .collect()
}
