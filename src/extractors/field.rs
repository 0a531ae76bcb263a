// src/extractors/field.rs
//! Tree-query primitives shared by the extractors: find a descendant by
//! selector, read its trimmed text, step to the next element sibling.

use scraper::{ElementRef, Selector};
use thiserror::Error;

use crate::registry::models::{Diagnostic, DiagnosticKind, Field};
use crate::utils::error::ExtractError;

/// Why a field lookup came back empty.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMiss {
    #[error("node not found")]
    NodeAbsent,
    #[error("containing block not found")]
    ScopeAbsent,
}

/// Parses a CSS selector, keeping the source text in the error.
pub fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        css: css.to_string(),
        reason: e.to_string(),
    })
}

/// First descendant of `node` (excluding `node` itself) in document order.
pub fn find<'a>(node: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    node.select(selector).next()
}

/// Every matching descendant of `node`, in document order.
pub fn find_all<'a>(node: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    node.select(selector).collect()
}

pub fn next_element_sibling(node: ElementRef<'_>) -> Option<ElementRef<'_>> {
    node.next_siblings().find_map(ElementRef::wrap)
}

/// All text under `node`, trimmed of surrounding whitespace and newlines.
pub fn text_of(node: ElementRef<'_>) -> String {
    node.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first match inside `scope`.
pub fn find_text(scope: Option<ElementRef<'_>>, selector: &Selector) -> Result<String, FieldMiss> {
    let scope = scope.ok_or(FieldMiss::ScopeAbsent)?;
    find(scope, selector)
        .map(text_of)
        .ok_or(FieldMiss::NodeAbsent)
}

/// Logs a miss at a level matching how often the field is present, and records it.
pub fn note_miss(diagnostics: &mut Vec<Diagnostic>, field: Field, appointment: Option<usize>, miss: FieldMiss) {
    if field.is_expected() {
        tracing::warn!(?field, ?appointment, "Field lookup failed: {}", miss);
    } else {
        tracing::debug!(?field, ?appointment, "Optional field not present: {}", miss);
    }
    let kind = match miss {
        FieldMiss::NodeAbsent => DiagnosticKind::Missing,
        FieldMiss::ScopeAbsent => DiagnosticKind::ScopeMissing,
    };
    diagnostics.push(Diagnostic { field, appointment, kind });
}

/// Records text that was found but did not parse.
pub fn note_unparseable(diagnostics: &mut Vec<Diagnostic>, field: Field, appointment: Option<usize>, text: &str) {
    tracing::warn!(?field, ?appointment, "Could not parse field text: '{}'", text);
    diagnostics.push(Diagnostic {
        field,
        appointment,
        kind: DiagnosticKind::Unparseable { text: text.to_string() },
    });
}
