// src/view.rs
//
// Maps a report plus filter criteria into renderable tab content. Rendering
// proper (HTML/terminal) happens elsewhere; this module only shapes data.

use crate::filter::{
    self, FilterCriteria, filter_exports, filter_findings, filter_imports, filter_sections,
    filter_strings, filter_symbols,
};
use crate::format::{format_addr, format_bytes};
use crate::report::{
    AnalysisReport, CodeSignRow, ExportInfo, Finding, ImportInfo, SectionInfo, StringInfo,
    SymbolInfo,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Overview,
    Findings,
    Sections,
    Imports,
    Exports,
    Symbols,
    Strings,
    Raw,
}

impl Tab {
    pub const ALL: [Tab; 8] = [
        Tab::Overview,
        Tab::Findings,
        Tab::Sections,
        Tab::Imports,
        Tab::Exports,
        Tab::Symbols,
        Tab::Strings,
        Tab::Raw,
    ];

    /// Display label, matching the viewer's tab strip.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Summary",
            Tab::Findings => "Alerts",
            Tab::Sections => "File Parts",
            Tab::Imports => "Dependencies",
            Tab::Exports => "Exposed Items",
            Tab::Symbols => "Named Items",
            Tab::Strings => "Text Found",
            Tab::Raw => "Raw Data",
        }
    }
}

impl FromStr for Tab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(Tab::Overview),
            "findings" => Ok(Tab::Findings),
            "sections" => Ok(Tab::Sections),
            "imports" => Ok(Tab::Imports),
            "exports" => Ok(Tab::Exports),
            "symbols" => Ok(Tab::Symbols),
            "strings" => Ok(Tab::Strings),
            "raw" => Ok(Tab::Raw),
            _ => Err(anyhow::anyhow!("unknown tab: {}", s)),
        }
    }
}

/// Why a table tab has nothing to show. "No data at all" and "nothing
/// matches the current filter" render differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoData,
    NoMatches,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionView<T> {
    pub rows: Vec<T>,
    /// Pre-filter collection size.
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<EmptyReason>,
}

impl<T: Clone> CollectionView<T> {
    fn new(rows: Vec<&T>, total: usize) -> Self {
        let empty = if !rows.is_empty() {
            None
        } else if total == 0 {
            Some(EmptyReason::NoData)
        } else {
            Some(EmptyReason::NoMatches)
        };
        Self {
            rows: rows.into_iter().cloned().collect(),
            total,
            empty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionCounts {
    pub findings: usize,
    pub sections: usize,
    pub imports: usize,
    pub exports: usize,
    pub symbols: usize,
    pub strings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewView {
    pub platform: String,
    pub arch: String,
    pub entrypoint: String,
    pub file_size: String,
    pub magic: String,
    pub is_stripped: bool,
    pub has_debug: bool,
    pub sha256: String,
    pub sha1: String,
    pub counts: CollectionCounts,
    /// Post-filter row sum across all collections.
    pub visible_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codesign: Option<Vec<CodeSignRow>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tab", content = "content", rename_all = "lowercase")]
pub enum TabContent {
    Overview(OverviewView),
    Findings(CollectionView<Finding>),
    Sections(CollectionView<SectionInfo>),
    Imports(CollectionView<ImportInfo>),
    Exports(CollectionView<ExportInfo>),
    Symbols(CollectionView<SymbolInfo>),
    Strings(CollectionView<StringInfo>),
    Raw(String),
}

fn overview(report: &AnalysisReport, criteria: &FilterCriteria) -> OverviewView {
    OverviewView {
        platform: report.binary.format.platform_label().to_string(),
        arch: report.binary.arch.clone(),
        entrypoint: format_addr(report.binary.entrypoint),
        file_size: format_bytes(report.binary.file_size),
        magic: report.binary.magic.clone(),
        is_stripped: report.binary.is_stripped,
        has_debug: report.binary.has_debug,
        sha256: report.hashes.sha256.clone(),
        sha1: report.hashes.sha1.clone(),
        counts: CollectionCounts {
            findings: report.findings.len(),
            sections: report.sections.len(),
            imports: report.imports.len(),
            exports: report.exports.len(),
            symbols: report.symbols.len(),
            strings: report.strings.len(),
        },
        visible_rows: filter::visible_rows(report, criteria),
        codesign: report.codesign.as_ref().map(|cs| cs.rows()),
    }
}

/// Derive the content for one tab. The raw tab serializes the whole report
/// verbatim and ignores the criteria.
pub fn compose(report: &AnalysisReport, criteria: &FilterCriteria, tab: Tab) -> TabContent {
    match tab {
        Tab::Overview => TabContent::Overview(overview(report, criteria)),
        Tab::Findings => TabContent::Findings(CollectionView::new(
            filter_findings(report, criteria),
            report.findings.len(),
        )),
        Tab::Sections => TabContent::Sections(CollectionView::new(
            filter_sections(report, criteria),
            report.sections.len(),
        )),
        Tab::Imports => TabContent::Imports(CollectionView::new(
            filter_imports(report, criteria),
            report.imports.len(),
        )),
        Tab::Exports => TabContent::Exports(CollectionView::new(
            filter_exports(report, criteria),
            report.exports.len(),
        )),
        Tab::Symbols => TabContent::Symbols(CollectionView::new(
            filter_symbols(report, criteria),
            report.symbols.len(),
        )),
        Tab::Strings => TabContent::Strings(CollectionView::new(
            filter_strings(report, criteria),
            report.strings.len(),
        )),
        Tab::Raw => TabContent::Raw(
            serde_json::to_string_pretty(report)
                .unwrap_or_else(|e| format!("report serialization failed: {e}")),
        ),
    }
}
