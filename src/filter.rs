// src/filter.rs
//
// Pure, order-preserving filtering over report collections. Each filter
// applies, in order: a severity equality check (findings only), a case-folded
// substring match over the collection's searchable fields, and truncation to
// the first `row_limit` matches. Filtering never mutates the report.

use crate::report::{
    AnalysisReport, ExportInfo, Finding, ImportInfo, SectionInfo, Severity, StringInfo, SymbolInfo,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ROW_LIMIT_MIN: usize = 25;
pub const ROW_LIMIT_MAX: usize = 500;
pub const ROW_LIMIT_STEP: usize = 25;
pub const ROW_LIMIT_DEFAULT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
    Info,
}

impl SeverityFilter {
    fn matches(self, severity: Severity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::High => severity == Severity::High,
            SeverityFilter::Medium => severity == Severity::Medium,
            SeverityFilter::Low => severity == Severity::Low,
            SeverityFilter::Info => severity == Severity::Info,
        }
    }
}

impl FromStr for SeverityFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(SeverityFilter::All),
            "high" => Ok(SeverityFilter::High),
            "medium" => Ok(SeverityFilter::Medium),
            "low" => Ok(SeverityFilter::Low),
            "info" => Ok(SeverityFilter::Info),
            _ => Err(anyhow::anyhow!("invalid severity filter: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub severity: SeverityFilter,
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,
}

fn default_row_limit() -> usize {
    ROW_LIMIT_DEFAULT
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            query: String::new(),
            severity: SeverityFilter::All,
            row_limit: ROW_LIMIT_DEFAULT,
        }
    }
}

impl FilterCriteria {
    /// Trimmed, case-folded query. Empty matches everything.
    pub fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }
}

fn value_matches(query: &str, values: &[String]) -> bool {
    if query.is_empty() {
        return true;
    }
    values.iter().any(|value| value.to_lowercase().contains(query))
}

fn opt_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_num<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn filter_findings<'a>(report: &'a AnalysisReport, criteria: &FilterCriteria) -> Vec<&'a Finding> {
    let query = criteria.normalized_query();
    report
        .findings
        .iter()
        .filter(|finding| criteria.severity.matches(finding.severity))
        .filter(|finding| {
            value_matches(
                &query,
                &[
                    finding.title.clone(),
                    finding.details.clone(),
                    finding.evidence.join(" "),
                    finding.severity.as_str().to_string(),
                ],
            )
        })
        .take(criteria.row_limit)
        .collect()
}

pub fn filter_sections<'a>(
    report: &'a AnalysisReport,
    criteria: &FilterCriteria,
) -> Vec<&'a SectionInfo> {
    let query = criteria.normalized_query();
    report
        .sections
        .iter()
        .filter(|section| {
            value_matches(
                &query,
                &[
                    section.name.clone(),
                    section.flags.join(" "),
                    section.offset.to_string(),
                    section.size.to_string(),
                    opt_num(section.entropy),
                ],
            )
        })
        .take(criteria.row_limit)
        .collect()
}

pub fn filter_imports<'a>(
    report: &'a AnalysisReport,
    criteria: &FilterCriteria,
) -> Vec<&'a ImportInfo> {
    let query = criteria.normalized_query();
    report
        .imports
        .iter()
        .filter(|import| {
            value_matches(&query, &[opt_text(&import.library), import.symbol.clone()])
        })
        .take(criteria.row_limit)
        .collect()
}

pub fn filter_exports<'a>(
    report: &'a AnalysisReport,
    criteria: &FilterCriteria,
) -> Vec<&'a ExportInfo> {
    let query = criteria.normalized_query();
    report
        .exports
        .iter()
        .filter(|export| {
            value_matches(&query, &[export.symbol.clone(), opt_num(export.addr)])
        })
        .take(criteria.row_limit)
        .collect()
}

pub fn filter_symbols<'a>(
    report: &'a AnalysisReport,
    criteria: &FilterCriteria,
) -> Vec<&'a SymbolInfo> {
    let query = criteria.normalized_query();
    report
        .symbols
        .iter()
        .filter(|symbol| {
            value_matches(
                &query,
                &[symbol.name.clone(), symbol.kind.clone(), opt_num(symbol.addr)],
            )
        })
        .take(criteria.row_limit)
        .collect()
}

pub fn filter_strings<'a>(
    report: &'a AnalysisReport,
    criteria: &FilterCriteria,
) -> Vec<&'a StringInfo> {
    let query = criteria.normalized_query();
    report
        .strings
        .iter()
        .filter(|entry| {
            value_matches(&query, &[entry.offset.to_string(), entry.value.clone()])
        })
        .take(criteria.row_limit)
        .collect()
}

/// Post-filter row count summed across all six collections. Cheap cross-tab
/// sanity metric shown on the overview.
pub fn visible_rows(report: &AnalysisReport, criteria: &FilterCriteria) -> usize {
    filter_findings(report, criteria).len()
        + filter_sections(report, criteria).len()
        + filter_imports(report, criteria).len()
        + filter_exports(report, criteria).len()
        + filter_symbols(report, criteria).len()
        + filter_strings(report, criteria).len()
}
