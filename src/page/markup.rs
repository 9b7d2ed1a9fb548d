//! Landing document renderer.
//!
//! Produces the static landing page from the registry and config. The
//! decision logic stays in the evaluator; this markup only has to expose
//! the hooks the checklist script and assistive technologies rely on.

use crate::config::LandingConfig;
use crate::controller::AppState;
use crate::registry::{CapabilityId, DependencyRegistry};

/// Human-readable checklist label for a capability.
fn label(id: CapabilityId) -> &'static str {
    match id {
        CapabilityId::SecureContext => "Secure connection",
        CapabilityId::SpeechRecognition => "Speech recognition",
        CapabilityId::SpeechSynthesis => "Speech synthesis",
        CapabilityId::Microphone => "Microphone",
    }
}

/// Minimal HTML attribute/text escaping.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the landing document.
///
/// The output satisfies the external contract end to end: exact
/// `data-dependency` identifiers, per-item pass/fail message attributes and
/// visible status indicators, an accessible live status region, the
/// `data-app-state` body attribute, head scripts for the cache-busted
/// landing bundle and the downstream app bundle, and noscript stylesheet
/// fallbacks.
pub fn render_landing_document(config: &LandingConfig, registry: &DependencyRegistry) -> String {
    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    doc.push_str("  <meta charset=\"utf-8\">\n");
    doc.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    doc.push_str(&format!("  <title>{}</title>\n", escape(&config.title)));
    doc.push_str(&format!(
        "  <script src=\"{}\" defer></script>\n",
        escape(&config.landing_bundle_src())
    ));
    doc.push_str("  <script src=\"AI/app.js\" defer></script>\n");
    doc.push_str("  <noscript>\n");
    for stylesheet in &config.stylesheets {
        doc.push_str(&format!(
            "    <link rel=\"stylesheet\" href=\"{}\">\n",
            escape(stylesheet)
        ));
    }
    doc.push_str("  </noscript>\n</head>\n");
    doc.push_str(&format!(
        "<body data-app-state=\"{}\">\n",
        AppState::Landing.as_str()
    ));
    doc.push_str("  <main class=\"landing\">\n");
    doc.push_str(&format!("    <h1>{}</h1>\n", escape(&config.title)));
    doc.push_str(
        "    <div class=\"status-banner\" role=\"status\" aria-live=\"polite\">Checking your system…</div>\n",
    );
    doc.push_str("    <ul class=\"dependency-list\">\n");
    for descriptor in registry.list() {
        doc.push_str(&format!(
            "      <li class=\"dependency-item\" data-dependency=\"{}\" data-pass-status=\"{}\" data-fail-status=\"{}\">\n",
            descriptor.id().as_str(),
            escape(descriptor.pass_message()),
            escape(descriptor.fail_message()),
        ));
        doc.push_str(&format!(
            "        <span class=\"dependency-name\">{}</span>\n",
            label(descriptor.id())
        ));
        doc.push_str("        <span class=\"dependency-status\" aria-hidden=\"true\">◌</span>\n");
        doc.push_str("      </li>\n");
    }
    doc.push_str("    </ul>\n");
    doc.push_str("    <div class=\"landing-actions\">\n");
    doc.push_str(
        "      <button type=\"button\" id=\"recheck-button\">Re-run checks</button>\n",
    );
    doc.push_str(
        "      <button type=\"button\" id=\"launch-button\" disabled>Launch Unity Voice Lab</button>\n",
    );
    doc.push_str("    </div>\n  </main>\n</body>\n</html>\n");
    doc
}
