#![expect(clippy::print_stdout, reason = "CLI output is emitted here")]
#![expect(clippy::print_stderr, reason = "CLI output is emitted here")]

//! CLI output presenter.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use crate::common::Colors;
use crate::domain::CaseKey;
use crate::domain::CaseVerdict;
use crate::domain::Catalogue;
use crate::domain::Counts;
use crate::domain::Expectation;
use crate::domain::Observed;
use crate::domain::QueryCategory;
use crate::domain::SuiteReport;
use crate::domain::Verdict;

const PROGRAM_NAME: &str = "registry-e2e";

/// Output format for CLI commands
#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub trait Presenter {
    fn present_report(&self, report: &SuiteReport);

    fn present_catalogue(&self, catalogue: &Catalogue);

    fn present_error(&self, message: &str);

    fn present_info(&self, message: &str);
}

pub struct TextPresenter;

impl Presenter for TextPresenter {
    fn present_report(&self, report: &SuiteReport) {
        print!("{}", render_report_text(report));
    }

    fn present_catalogue(&self, catalogue: &Catalogue) {
        print!("{}", render_catalogue_text(catalogue));
    }

    fn present_error(&self, message: &str) {
        eprintln!("{}: {} {}", PROGRAM_NAME, Colors::error("Error:"), message);
    }

    fn present_info(&self, message: &str) {
        eprintln!("{}", Colors::dim(message));
    }
}

pub struct JsonPresenter;

impl Presenter for JsonPresenter {
    fn present_report(&self, report: &SuiteReport) {
        println!("{}", to_pretty_json(report));
    }

    fn present_catalogue(&self, catalogue: &Catalogue) {
        println!("{}", to_pretty_json(&CatalogueListing::from(catalogue)));
    }

    fn present_error(&self, message: &str) {
        let output = serde_json::json!({ "success": false, "error": message });
        eprintln!("{}", to_pretty_json(&output));
    }

    // Informational chatter would corrupt machine-readable stdout.
    fn present_info(&self, _message: &str) {}
}

pub fn create_presenter(format: OutputFormat) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Json => Box::new(JsonPresenter),
        OutputFormat::Text => Box::new(TextPresenter),
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({ "success": false, "error": e.to_string() }).to_string()
    })
}

fn verdict_label(verdict: Verdict) -> String {
    match verdict {
        Verdict::Passed => Colors::success("PASS "),
        Verdict::Failed => Colors::error("FAIL "),
        Verdict::Errored => Colors::warning("ERROR"),
    }
}

fn counts_line(counts: &Counts) -> String {
    format!(
        "{} passed, {} failed, {} errored",
        counts.passed, counts.failed, counts.errored
    )
}

pub fn render_report_text(report: &SuiteReport) -> String {
    let mut out = String::new();
    for verdict in &report.verdicts {
        let _ = writeln!(
            out,
            "{} {} {} {}",
            verdict_label(verdict.verdict),
            Colors::group(verdict.category.as_str()),
            verdict.key,
            Colors::dim(&verdict.description)
        );
        if verdict.verdict != Verdict::Passed {
            write_details(&mut out, verdict);
        }
    }

    if !report.verdicts.is_empty() {
        out.push('\n');
    }
    for group in &report.groups {
        let _ = writeln!(
            out,
            "  {:<16} {}",
            group.category.as_str(),
            counts_line(&group.counts)
        );
    }

    let totals = report.totals();
    let _ = writeln!(
        out,
        "{} {} cases: {}",
        Colors::bold("Total:"),
        totals.total(),
        counts_line(&totals)
    );
    if report.aborted {
        let _ = writeln!(
            out,
            "{} run aborted; only completed cases are counted",
            Colors::warning("Note:")
        );
    }
    out
}

fn write_details(out: &mut String, verdict: &CaseVerdict) {
    let _ = writeln!(
        out,
        "      expected {}, observed {}",
        verdict.expected.as_str(),
        observed_str(verdict)
    );
    if let Some(message) = verdict.message.as_deref() {
        let _ = writeln!(out, "      message: {}", message);
    }
    if let Some(payload) = verdict.payload.as_ref() {
        let _ = writeln!(out, "      payload: {}", payload.to_json());
    }
}

fn observed_str(verdict: &CaseVerdict) -> &'static str {
    match verdict.observed {
        Observed::Success => "success",
        Observed::Failure => "failure",
        Observed::Error => "error",
    }
}

pub fn render_catalogue_text(catalogue: &Catalogue) -> String {
    let mut out = String::new();
    for group in catalogue.groups() {
        let _ = writeln!(
            out,
            "{} ({} cases, tool {})",
            Colors::group(group.category().as_str()),
            group.len(),
            group.category().tool_name()
        );
        for (key, case) in group.entries() {
            let _ = writeln!(
                out,
                "  {:<40} {:<8} {}",
                key.to_string(),
                case.expectation().as_str(),
                Colors::dim(&case.description)
            );
        }
    }
    out
}

#[derive(Debug, Serialize)]
struct CatalogueListing {
    groups: Vec<GroupListing>,
}

#[derive(Debug, Serialize)]
struct GroupListing {
    category: QueryCategory,
    tool: &'static str,
    cases: Vec<CaseListing>,
}

#[derive(Debug, Serialize)]
struct CaseListing {
    key: CaseKey,
    expected: Expectation,
    description: String,
}

impl From<&Catalogue> for CatalogueListing {
    fn from(catalogue: &Catalogue) -> Self {
        let groups = catalogue
            .groups()
            .iter()
            .map(|group| GroupListing {
                category: group.category(),
                tool: group.category().tool_name(),
                cases: group
                    .entries()
                    .map(|(key, case)| CaseListing {
                        key,
                        expected: case.expectation(),
                        description: case.description.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Payload;
    use crate::domain::ReportAccumulator;

    fn report() -> SuiteReport {
        let mut acc = ReportAccumulator::new();
        acc.record(CaseVerdict {
            category: QueryCategory::Provider,
            key: CaseKey::Named("valid_provider".into()),
            description: "Resolve a known resource".into(),
            expected: Expectation::Success,
            observed: Observed::Success,
            verdict: Verdict::Passed,
            payload: None,
            message: None,
        });
        acc.record(CaseVerdict {
            category: QueryCategory::ProviderDocs,
            key: CaseKey::Index(1),
            description: "Unknown doc id".into(),
            expected: Expectation::Failure,
            observed: Observed::Success,
            verdict: Verdict::Failed,
            payload: Some(Payload::new().with("provider_doc_id", "3356809")),
            message: None,
        });
        acc.record(CaseVerdict {
            category: QueryCategory::ProviderDocs,
            key: CaseKey::Index(2),
            description: "Slow backend".into(),
            expected: Expectation::Success,
            observed: Observed::Error,
            verdict: Verdict::Errored,
            payload: Some(Payload::new()),
            message: Some("No response within 20ms".into()),
        });
        acc.finish(true)
    }

    #[test]
    fn test_text_report_lines_and_totals() {
        let text = render_report_text(&report());
        assert!(text.contains("PASS  provider valid_provider Resolve a known resource"));
        assert!(text.contains("FAIL  providerDocs #1 Unknown doc id"));
        assert!(text.contains("expected failure, observed success"));
        assert!(text.contains(r#"payload: {"provider_doc_id":"3356809"}"#));
        assert!(text.contains("message: No response within 20ms"));
        assert!(text.contains("Total: 3 cases: 1 passed, 1 failed, 1 errored"));
        assert!(text.contains("run aborted"));
    }

    #[test]
    fn test_text_report_omits_details_for_passes() {
        let mut acc = ReportAccumulator::new();
        acc.record(report().verdicts[0].clone());
        let text = render_report_text(&acc.finish(false));
        assert!(!text.contains("expected"));
        assert!(!text.contains("aborted"));
    }

    #[test]
    fn test_catalogue_listing_text() {
        let text = render_catalogue_text(Catalogue::builtin());
        assert!(text.contains("provider ("));
        assert!(text.contains("tool resolveProviderDocID"));
        assert!(text.contains("hashicorp_without_namespace"));
    }

    #[test]
    fn test_catalogue_listing_json() {
        let listing = CatalogueListing::from(Catalogue::builtin());
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["groups"].as_array().unwrap().len(), 6);
        assert_eq!(json["groups"][0]["category"], "provider");
        assert_eq!(json["groups"][0]["tool"], "resolveProviderDocID");
        assert!(json["groups"][0]["cases"][0]["expected"].is_string());
    }

    #[test]
    fn test_create_presenter_by_format() {
        let presenter = create_presenter(OutputFormat::Json);
        presenter.present_info("hidden");
        let presenter = create_presenter(OutputFormat::Text);
        presenter.present_info("shown");
    }
}
