//! Landing document audit.
//!
//! Validates an existing landing document against the markup contract the
//! checklist script and assistive technologies depend on. Findings come in
//! two severities: errors break the contract, warnings flag things that
//! degrade the experience but leave the checklist functional.

use regex::Regex;
use serde::Serialize;

use crate::config::LandingConfig;
use crate::registry::CapabilityId;

/// How bad a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    /// The contract is broken; collaborators will misbehave.
    Error,
    /// Degraded but functional.
    Warning,
}

/// One audit finding.
#[derive(Debug, Clone, Serialize)]
pub struct AuditFinding {
    pub severity: AuditSeverity,
    pub message: String,
}

impl AuditFinding {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: AuditSeverity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: AuditSeverity::Warning,
            message: message.into(),
        }
    }
}

/// The outcome of auditing one document.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    findings: Vec<AuditFinding>,
}

impl AuditReport {
    /// All findings, errors first.
    pub fn findings(&self) -> &[AuditFinding] {
        &self.findings
    }

    /// Whether the document satisfies the contract (no errors).
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }

    /// Number of contract-breaking findings.
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == AuditSeverity::Error)
            .count()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.error_count()
    }
}

/// Audit a landing document against the markup contract.
pub fn audit_document(html: &str, config: &LandingConfig) -> AuditReport {
    let mut findings = Vec::new();

    check_dependency_items(html, &mut findings);
    check_status_region(html, &mut findings);
    check_app_state(html, &mut findings);
    check_title(html, config, &mut findings);
    check_viewport(html, &mut findings);
    check_scripts(html, config, &mut findings);
    check_noscript_stylesheets(html, &mut findings);
    check_controls(html, &mut findings);

    findings.sort_by_key(|f| f.severity == AuditSeverity::Warning);
    AuditReport { findings }
}

fn check_dependency_items(html: &str, findings: &mut Vec<AuditFinding>) {
    let id_pattern =
        Regex::new(r#"data-dependency="([^"]*)""#).expect("static dependency pattern");
    let found: Vec<&str> = id_pattern
        .captures_iter(html)
        .map(|c| c.get(1).expect("capture group").as_str())
        .collect();

    for id in CapabilityId::ALL {
        if !found.contains(&id.as_str()) {
            findings.push(AuditFinding::error(format!(
                "missing checklist item for '{}'",
                id
            )));
        }
    }
    for value in &found {
        if value.parse::<CapabilityId>().is_err() {
            findings.push(AuditFinding::error(format!(
                "unexpected checklist item '{}'",
                value
            )));
        }
    }

    let item_pattern = Regex::new(r#"<li\b[^>]*>"#).expect("static li pattern");
    let mut item_count = 0usize;
    for tag in item_pattern.find_iter(html) {
        let tag = tag.as_str();
        if !tag.contains("dependency-item") {
            continue;
        }
        item_count += 1;
        for attr in ["data-pass-status", "data-fail-status"] {
            if !tag.contains(attr) {
                findings.push(AuditFinding::error(format!(
                    "checklist item {} lacks {}",
                    tag, attr
                )));
            }
        }
    }

    let status_spans = html.matches("dependency-status").count();
    if status_spans < item_count {
        findings.push(AuditFinding::warning(format!(
            "only {} visible status indicators for {} checklist items",
            status_spans, item_count
        )));
    }
}

fn check_status_region(html: &str, findings: &mut Vec<AuditFinding>) {
    if !html.contains(r#"role="status""#) {
        findings.push(AuditFinding::error(
            "no live status region (role=\"status\") found",
        ));
    }
}

fn check_app_state(html: &str, findings: &mut Vec<AuditFinding>) {
    let pattern =
        Regex::new(r#"<body[^>]*data-app-state="landing""#).expect("static body pattern");
    if !pattern.is_match(html) {
        findings.push(AuditFinding::error(
            "body lacks data-app-state=\"landing\"",
        ));
    }
}

fn check_title(html: &str, config: &LandingConfig, findings: &mut Vec<AuditFinding>) {
    let pattern = Regex::new(r"(?s)<title>(.*?)</title>").expect("static title pattern");
    match pattern.captures(html) {
        None => findings.push(AuditFinding::error("document has no <title>")),
        Some(captures) => {
            let title = captures.get(1).expect("capture group").as_str().trim();
            if title.is_empty() {
                findings.push(AuditFinding::error("document <title> is empty"));
            } else if !title.contains(config.title.trim()) {
                findings.push(AuditFinding::warning(format!(
                    "document title '{}' does not mention '{}'",
                    title, config.title
                )));
            }
        }
    }
}

fn check_viewport(html: &str, findings: &mut Vec<AuditFinding>) {
    let pattern = Regex::new(r#"<meta[^>]*name="viewport"[^>]*>"#).expect("static meta pattern");
    let metas: Vec<&str> = pattern.find_iter(html).map(|m| m.as_str()).collect();
    match metas.len() {
        0 => findings.push(AuditFinding::error("responsive viewport meta is missing")),
        1 => {
            if !metas[0].contains("width=device-width") {
                findings.push(AuditFinding::error(
                    "viewport meta lacks width=device-width",
                ));
            }
        }
        n => findings.push(AuditFinding::error(format!(
            "viewport meta is duplicated ({} occurrences)",
            n
        ))),
    }
}

fn check_scripts(html: &str, config: &LandingConfig, findings: &mut Vec<AuditFinding>) {
    let landing_src = config.landing_bundle_src();
    if !html.contains(&format!("src=\"{}\"", landing_src)) {
        findings.push(AuditFinding::error(format!(
            "cache-busted landing bundle '{}' is not loaded",
            landing_src
        )));
    }
    if !html.contains("src=\"AI/app.js\"") {
        findings.push(AuditFinding::error(
            "downstream application bundle 'AI/app.js' is not loaded",
        ));
    }
}

fn check_noscript_stylesheets(html: &str, findings: &mut Vec<AuditFinding>) {
    let pattern = Regex::new(r"(?s)<noscript>(.*?)</noscript>").expect("static noscript pattern");
    let stylesheets: usize = pattern
        .captures_iter(html)
        .map(|c| {
            c.get(1)
                .expect("capture group")
                .as_str()
                .matches(r#"rel="stylesheet""#)
                .count()
        })
        .sum();
    if stylesheets < 2 {
        findings.push(AuditFinding::error(format!(
            "noscript block needs at least two stylesheet fallbacks, found {}",
            stylesheets
        )));
    }
}

fn check_controls(html: &str, findings: &mut Vec<AuditFinding>) {
    for (id, what) in [
        ("launch-button", "launch control"),
        ("recheck-button", "recheck control"),
    ] {
        if !html.contains(&format!("id=\"{}\"", id)) {
            findings.push(AuditFinding::warning(format!(
                "no {} (#{}) found",
                what, id
            )));
        }
    }
}
