//! Landing page markup contract.
//!
//! The landing document is the surface external collaborators integrate
//! with: the checklist items carry `data-dependency` identifiers and
//! pass/fail message attributes, a `role="status"` region receives live
//! updates, and the head loads the cache-busted landing bundle next to the
//! downstream application bundle.
//!
//! [`markup`] renders a document that satisfies the contract;
//! [`audit`] validates an existing document against it.

pub mod audit;
pub mod markup;

pub use audit::{audit_document, AuditFinding, AuditReport, AuditSeverity};
pub use markup::render_landing_document;
