// tests/scenario_tests.rs
//
// Full upload-analyze-view-clear cycle against a stubbed analyzer.

use async_trait::async_trait;
use binlens::analyzer::{Analyzer, AnalyzerError};
use binlens::clock::ManualClock;
use binlens::filter::FilterCriteria;
use binlens::format::format_addr;
use binlens::report::{AnalysisReport, BinaryFormat, BinaryInfo, Hashes};
use binlens::session::{AnalysisSession, SessionStatus};
use binlens::view::{Tab, TabContent, compose};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

struct WasmAnalyzer;

#[async_trait]
impl Analyzer for WasmAnalyzer {
    async fn analyze(&self, bytes: &[u8]) -> Result<AnalysisReport, AnalyzerError> {
        Ok(AnalysisReport {
            binary: BinaryInfo {
                format: BinaryFormat::Wasm,
                arch: "wasm32".to_string(),
                entrypoint: Some(0x10),
                file_size: bytes.len() as u64,
                magic: "\\0asm".to_string(),
                is_stripped: false,
                has_debug: false,
            },
            hashes: Hashes {
                sha256: "00".repeat(32),
                sha1: "11".repeat(20),
            },
            codesign: None,
            findings: vec![],
            sections: vec![],
            imports: vec![],
            exports: vec![],
            symbols: vec![],
            strings: vec![],
        })
    }

    async fn api_version(&self) -> Result<String, AnalyzerError> {
        Ok("1.0.0".to_string())
    }
}

#[tokio::test]
async fn wasm_upload_view_and_clear_cycle() {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
    ));
    let analyzer = WasmAnalyzer;
    let mut session = AnalysisSession::new(clock);

    let wasm_bytes = b"\0asm\x01\0\0\0".to_vec();
    session.load(&analyzer, wasm_bytes, "module.wasm").await;

    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.file_name(), "module.wasm");

    let report = session.report().expect("report expected");
    assert_eq!(format_addr(report.binary.entrypoint), "0x10");

    let TabContent::Overview(overview) = compose(report, &FilterCriteria::default(), Tab::Overview)
    else {
        panic!("expected overview content");
    };
    assert_eq!(overview.platform, "Web");
    assert_eq!(overview.entrypoint, "0x10");

    session.clear();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.file_name(), "");
    assert!(session.report().is_none());
}
