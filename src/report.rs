// src/report.rs
//
// Data model for the external analyzer's report. The report is produced
// atomically by one analysis call and treated as an immutable value once
// received; re-analysis replaces it wholesale.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryFormat {
    Pe,
    Elf,
    MachO,
    Wasm,
    Unknown,
}

impl BinaryFormat {
    /// Human-readable platform label shown in the overview.
    pub fn platform_label(self) -> &'static str {
        match self {
            BinaryFormat::Pe => "Windows",
            BinaryFormat::Elf => "Linux",
            BinaryFormat::MachO => "macOS",
            BinaryFormat::Wasm => "Web",
            BinaryFormat::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

/// Presentational badge color for a severity. Total over all four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBadge {
    Red,
    Amber,
    Blue,
    Neutral,
}

impl Severity {
    pub fn badge(self) -> SeverityBadge {
        match self {
            Severity::High => SeverityBadge::Red,
            Severity::Medium => SeverityBadge::Amber,
            Severity::Low => SeverityBadge::Blue,
            Severity::Info => SeverityBadge::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryInfo {
    pub format: BinaryFormat,
    pub arch: String,
    pub entrypoint: Option<u64>,
    pub file_size: u64,
    pub magic: String,
    pub is_stripped: bool,
    pub has_debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hashes {
    pub sha256: String,
    pub sha1: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSignInfo {
    pub present: bool,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub flags: Option<String>,
    #[serde(default)]
    pub hash_type: Option<String>,
    #[serde(default)]
    pub page_size: Option<u64>,
    #[serde(default)]
    pub code_limit: Option<u64>,
    #[serde(default)]
    pub cdhash: Option<String>,
    pub has_cms_signature: bool,
    #[serde(default)]
    pub entitlements: Option<String>,
    #[serde(default)]
    pub code_directory_hashes_verified: Option<bool>,
    #[serde(default)]
    pub verified_pages: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub mismatch_pages: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    pub severity: Severity,
    pub details: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionInfo {
    pub name: String,
    #[serde(default)]
    pub addr: Option<u64>,
    pub offset: u64,
    pub size: u64,
    #[serde(default)]
    pub entropy: Option<f64>,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportInfo {
    #[serde(default)]
    pub library: Option<String>,
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportInfo {
    pub symbol: String,
    #[serde(default)]
    pub addr: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub addr: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringInfo {
    pub offset: u64,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub binary: BinaryInfo,
    pub hashes: Hashes,
    #[serde(default)]
    pub codesign: Option<CodeSignInfo>,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub sections: Vec<SectionInfo>,
    #[serde(default)]
    pub imports: Vec<ImportInfo>,
    #[serde(default)]
    pub exports: Vec<ExportInfo>,
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
    #[serde(default)]
    pub strings: Vec<StringInfo>,
}

/// One labeled row of the code-signing listing in the overview.
#[derive(Debug, Clone, Serialize)]
pub struct CodeSignRow {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

fn opt_string(value: &Option<String>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.clone(),
        _ => "-".to_string(),
    }
}

fn opt_u64(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl CodeSignInfo {
    /// The fixed 13-row listing rendered on the overview tab.
    pub fn rows(&self) -> Vec<CodeSignRow> {
        vec![
            CodeSignRow {
                key: "present",
                label: "Signature Present",
                value: self.present.to_string(),
            },
            CodeSignRow {
                key: "identifier",
                label: "App Identifier",
                value: opt_string(&self.identifier),
            },
            CodeSignRow {
                key: "flags",
                label: "Security Flags",
                value: opt_string(&self.flags),
            },
            CodeSignRow {
                key: "hash_type",
                label: "Hash Type",
                value: opt_string(&self.hash_type),
            },
            CodeSignRow {
                key: "page_size",
                label: "Page Size",
                value: opt_u64(self.page_size),
            },
            CodeSignRow {
                key: "code_limit",
                label: "Signed Size",
                value: opt_u64(self.code_limit),
            },
            CodeSignRow {
                key: "cdhash",
                label: "Signature Hash",
                value: opt_string(&self.cdhash),
            },
            CodeSignRow {
                key: "has_cms_signature",
                label: "Developer Certificate",
                value: self.has_cms_signature.to_string(),
            },
            CodeSignRow {
                key: "entitlements",
                label: "Permissions",
                value: opt_string(&self.entitlements),
            },
            CodeSignRow {
                key: "verified",
                label: "Integrity Check",
                value: self.code_directory_hashes_verified.unwrap_or(false).to_string(),
            },
            CodeSignRow {
                key: "verified_pages",
                label: "Verified Chunks",
                value: opt_u64(self.verified_pages),
            },
            CodeSignRow {
                key: "total_pages",
                label: "Total Chunks",
                value: opt_u64(self.total_pages),
            },
            CodeSignRow {
                key: "mismatch_pages",
                label: "Mismatched Chunks",
                value: if self.mismatch_pages.is_empty() {
                    "-".to_string()
                } else {
                    self.mismatch_pages
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                },
            },
        ]
    }
}
