// tests/filter_tests.rs

use binlens::filter::{
    FilterCriteria, SeverityFilter, filter_exports, filter_findings, filter_imports,
    filter_sections, filter_strings, filter_symbols, visible_rows,
};
use binlens::report::{
    AnalysisReport, BinaryFormat, BinaryInfo, ExportInfo, Finding, Hashes, ImportInfo,
    SectionInfo, Severity, StringInfo, SymbolInfo,
};

fn sample_report() -> AnalysisReport {
    AnalysisReport {
        binary: BinaryInfo {
            format: BinaryFormat::Elf,
            arch: "x86_64".to_string(),
            entrypoint: Some(0x1000),
            file_size: 4096,
            magic: "\u{7f}ELF".to_string(),
            is_stripped: false,
            has_debug: true,
        },
        hashes: Hashes {
            sha256: "aa".repeat(32),
            sha1: "bb".repeat(20),
        },
        codesign: None,
        findings: vec![
            Finding {
                title: "Writable and executable segment".to_string(),
                severity: Severity::High,
                details: "A segment is mapped W+X.".to_string(),
                evidence: vec!["LOAD at 0x1000".to_string()],
            },
            Finding {
                title: "Stack canary present".to_string(),
                severity: Severity::Info,
                details: "__stack_chk_fail imported.".to_string(),
                evidence: vec![],
            },
            Finding {
                title: "High entropy section".to_string(),
                severity: Severity::Medium,
                details: "Section .data has entropy 7.9.".to_string(),
                evidence: vec![".data".to_string(), "entropy=7.9".to_string()],
            },
        ],
        sections: vec![
            SectionInfo {
                name: ".text".to_string(),
                addr: Some(0x1000),
                offset: 4096,
                size: 2048,
                entropy: Some(6.1),
                flags: vec!["read".to_string(), "execute".to_string()],
            },
            SectionInfo {
                name: ".data".to_string(),
                addr: Some(0x2000),
                offset: 8192,
                size: 512,
                entropy: Some(7.9),
                flags: vec!["read".to_string(), "write".to_string()],
            },
        ],
        imports: vec![
            ImportInfo {
                library: Some("libc.so.6".to_string()),
                symbol: "printf".to_string(),
            },
            ImportInfo {
                library: Some("libc.so.6".to_string()),
                symbol: "malloc".to_string(),
            },
            ImportInfo {
                library: None,
                symbol: "__stack_chk_fail".to_string(),
            },
        ],
        exports: vec![
            ExportInfo {
                symbol: "main".to_string(),
                addr: Some(0x1100),
            },
            ExportInfo {
                symbol: "helper".to_string(),
                addr: None,
            },
        ],
        symbols: vec![
            SymbolInfo {
                name: "main".to_string(),
                kind: "func".to_string(),
                addr: Some(0x1100),
            },
            SymbolInfo {
                name: "buffer".to_string(),
                kind: "object".to_string(),
                addr: Some(0x2010),
            },
        ],
        strings: vec![
            StringInfo {
                offset: 100,
                value: "/lib64/ld-linux-x86-64.so.2".to_string(),
            },
            StringInfo {
                offset: 200,
                value: "Hello, world!".to_string(),
            },
            StringInfo {
                offset: 300,
                value: "secret-token".to_string(),
            },
        ],
    }
}

fn unlimited() -> FilterCriteria {
    FilterCriteria {
        query: String::new(),
        severity: SeverityFilter::All,
        row_limit: usize::MAX,
    }
}

#[test]
fn empty_query_is_identity_on_every_collection() {
    let report = sample_report();
    let criteria = unlimited();

    assert_eq!(filter_findings(&report, &criteria).len(), report.findings.len());
    assert_eq!(filter_sections(&report, &criteria).len(), report.sections.len());
    assert_eq!(filter_imports(&report, &criteria).len(), report.imports.len());
    assert_eq!(filter_exports(&report, &criteria).len(), report.exports.len());
    assert_eq!(filter_symbols(&report, &criteria).len(), report.symbols.len());
    assert_eq!(filter_strings(&report, &criteria).len(), report.strings.len());
}

#[test]
fn row_limit_truncates_after_matching() {
    let report = sample_report();
    let criteria = FilterCriteria {
        row_limit: 2,
        ..unlimited()
    };

    let findings = filter_findings(&report, &criteria);
    assert_eq!(findings.len(), 2);
    // Original order preserved: first two findings of the report.
    assert_eq!(findings[0].title, report.findings[0].title);
    assert_eq!(findings[1].title, report.findings[1].title);

    let imports = filter_imports(&report, &criteria);
    assert_eq!(imports.len(), 2);
    assert_eq!(imports[0].symbol, "printf");
}

#[test]
fn row_limit_is_min_of_limit_and_matches() {
    let report = sample_report();
    let criteria = FilterCriteria {
        row_limit: 50,
        ..unlimited()
    };
    assert_eq!(filter_exports(&report, &criteria).len(), 2);
}

#[test]
fn severity_filter_applies_to_findings_only() {
    let report = sample_report();
    let criteria = FilterCriteria {
        severity: SeverityFilter::High,
        ..unlimited()
    };

    let findings = filter_findings(&report, &criteria);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::High);

    // Other collections ignore the severity selector.
    assert_eq!(filter_sections(&report, &criteria).len(), 2);
    assert_eq!(filter_strings(&report, &criteria).len(), 3);
}

#[test]
fn query_is_case_folded_and_trimmed() {
    let report = sample_report();
    let criteria = FilterCriteria {
        query: "  LIBC  ".to_string(),
        ..unlimited()
    };
    assert_eq!(filter_imports(&report, &criteria).len(), 2);
}

#[test]
fn findings_match_on_evidence_and_severity_text() {
    let report = sample_report();

    let by_evidence = FilterCriteria {
        query: "entropy=7.9".to_string(),
        ..unlimited()
    };
    assert_eq!(filter_findings(&report, &by_evidence).len(), 1);

    let by_severity_text = FilterCriteria {
        query: "medium".to_string(),
        ..unlimited()
    };
    let matches = filter_findings(&report, &by_severity_text);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].severity, Severity::Medium);
}

#[test]
fn numeric_fields_match_in_decimal_form() {
    let report = sample_report();

    let by_offset = FilterCriteria {
        query: "8192".to_string(),
        ..unlimited()
    };
    let sections = filter_sections(&report, &by_offset);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].name, ".data");

    let by_entropy = FilterCriteria {
        query: "7.9".to_string(),
        ..unlimited()
    };
    assert_eq!(filter_sections(&report, &by_entropy).len(), 1);

    let strings_by_offset = FilterCriteria {
        query: "300".to_string(),
        ..unlimited()
    };
    let strings = filter_strings(&report, &strings_by_offset);
    assert_eq!(strings.len(), 1);
    assert_eq!(strings[0].value, "secret-token");
}

#[test]
fn missing_optional_fields_do_not_match_placeholder_text() {
    let report = sample_report();
    // The dash is presentation only; absent library must not match "-".
    let criteria = FilterCriteria {
        query: "-".to_string(),
        ..unlimited()
    };
    assert!(filter_imports(&report, &criteria).is_empty());
    // Strings that genuinely contain a dash still match.
    assert_eq!(filter_strings(&report, &criteria).len(), 2);
}

#[test]
fn filtering_is_pure_and_repeatable() {
    let report = sample_report();
    let before = serde_json::to_value(&report).unwrap();
    let criteria = FilterCriteria {
        query: "main".to_string(),
        ..unlimited()
    };

    let first: Vec<String> = filter_symbols(&report, &criteria)
        .iter()
        .map(|s| s.name.clone())
        .collect();
    let second: Vec<String> = filter_symbols(&report, &criteria)
        .iter()
        .map(|s| s.name.clone())
        .collect();

    assert_eq!(first, second);
    let after = serde_json::to_value(&report).unwrap();
    assert_eq!(before, after);
}

#[test]
fn visible_rows_sums_all_collections() {
    let report = sample_report();
    assert_eq!(visible_rows(&report, &unlimited()), 3 + 2 + 3 + 2 + 2 + 3);

    let narrowed = FilterCriteria {
        query: "no-such-token-anywhere".to_string(),
        ..unlimited()
    };
    assert_eq!(visible_rows(&report, &narrowed), 0);
}
