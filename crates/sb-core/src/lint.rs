//! Lint diagnostics for scenario documents.
//!
//! Reports structural issues without modifying the scenario. Loading runs
//! these and logs the findings; `sbctl check` prints them.

use crate::id::TabId;
use crate::model::Scenario;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Should be fixed; the editor works around it.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    /// Tab the finding belongs to, if any.
    pub tab: Option<TabId>,
    /// The object, line, or field the finding is about.
    pub subject: String,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-connection").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the scenario and return diagnostics.
#[must_use]
pub fn lint_scenario(scenario: &Scenario) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_no_tabs(scenario, &mut diags);
    lint_duplicate_ids(scenario, &mut diags);
    lint_connections(scenario, &mut diags);
    lint_stale_counters(scenario, &mut diags);
    lint_unknown_active_tab(scenario, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_no_tabs(scenario: &Scenario, diags: &mut Vec<LintDiagnostic>) {
    if scenario.tabs.is_empty() {
        diags.push(LintDiagnostic {
            tab: None,
            subject: "tabs".into(),
            message: "Scenario has no tabs; a default tab is created on load.".into(),
            severity: LintSeverity::Info,
            rule: "no-tabs",
        });
    }
}

/// Object and line IDs are unique across the whole scenario.
///
/// Decoded documents are rejected outright on duplicates; this catches
/// scenarios assembled in memory.
fn lint_duplicate_ids(scenario: &Scenario, diags: &mut Vec<LintDiagnostic>) {
    let mut objects = HashSet::new();
    let mut lines = HashSet::new();
    for tab in &scenario.tabs {
        let ids = tab
            .canvas
            .objects
            .iter()
            .map(|o| (o.id.to_string(), objects.insert(o.id)))
            .chain(
                tab.canvas
                    .connections
                    .iter()
                    .map(|c| (c.id.to_string(), lines.insert(c.id))),
            );
        for (id, fresh) in ids {
            if !fresh {
                diags.push(LintDiagnostic {
                    tab: Some(tab.id),
                    message: format!("`{id}` is used more than once."),
                    subject: id,
                    severity: LintSeverity::Warning,
                    rule: "duplicate-id",
                });
            }
        }
    }
}

/// Connections must join two distinct objects on their own tab.
fn lint_connections(scenario: &Scenario, diags: &mut Vec<LintDiagnostic>) {
    for tab in &scenario.tabs {
        let present: HashSet<_> = tab.canvas.objects.iter().map(|o| o.id).collect();
        for line in &tab.canvas.connections {
            if line.start == line.end {
                diags.push(LintDiagnostic {
                    tab: Some(tab.id),
                    subject: line.id.to_string(),
                    message: format!(
                        "Line `{}` connects `{}` to itself.",
                        line.id, line.start
                    ),
                    severity: LintSeverity::Warning,
                    rule: "self-connection",
                });
            }
            for endpoint in [line.start, line.end] {
                if !present.contains(&endpoint) {
                    diags.push(LintDiagnostic {
                        tab: Some(tab.id),
                        subject: line.id.to_string(),
                        message: format!(
                            "Line `{}` references `{endpoint}`, which is not on {}; \
                             it will not be drawn.",
                            line.id, tab.id
                        ),
                        severity: LintSeverity::Warning,
                        rule: "dangling-connection",
                    });
                }
            }
        }
    }
}

/// Counters that would re-mint an existing ID.
fn lint_stale_counters(scenario: &Scenario, diags: &mut Vec<LintDiagnostic>) {
    let (tab, obj, line) = scenario.minimum_counters();
    let checks = [
        ("nextTabId", u64::from(scenario.next_tab_id), u64::from(tab)),
        ("nextObjId", scenario.next_obj_id, obj),
        ("nextLineId", scenario.next_line_id, line),
    ];
    for (field, value, minimum) in checks {
        if value < minimum {
            diags.push(LintDiagnostic {
                tab: None,
                subject: field.into(),
                message: format!(
                    "`{field}` is {value} but must be at least {minimum}; it is raised on load."
                ),
                severity: LintSeverity::Warning,
                rule: "stale-counter",
            });
        }
    }
}

fn lint_unknown_active_tab(scenario: &Scenario, diags: &mut Vec<LintDiagnostic>) {
    if let Some(active) = scenario.active
        && scenario.tab(active).is_none()
    {
        diags.push(LintDiagnostic {
            tab: Some(active),
            subject: "currentTabId".into(),
            message: format!("`currentTabId` names {active}, which does not exist."),
            severity: LintSeverity::Info,
            rule: "unknown-active-tab",
        });
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
