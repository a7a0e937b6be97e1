//! Plain-text reports printed by `sbctl`.

use sb_core::codec::from_json;
use sb_core::id::TabId;
use sb_core::lint::{LintSeverity, lint_scenario};
use sb_core::model::Scenario;
use sb_core::routing::Router;
use sb_render::paint::to_bez_path;
use std::fmt::Write;

/// Lint report for a document. The flag is `false` on a parse failure or
/// any warning.
pub fn check(text: &str) -> (String, bool) {
    let scenario = match from_json(text) {
        Ok(s) => s,
        Err(err) => return (format!("error: {err}\n"), false),
    };

    let mut out = String::new();
    let mut clean = true;
    for diag in lint_scenario(&scenario) {
        let level = match diag.severity {
            LintSeverity::Warning => {
                clean = false;
                "warning"
            }
            LintSeverity::Info => "info",
        };
        let _ = writeln!(out, "{level}[{}]: {}", diag.rule, diag.message);
    }
    if clean {
        let _ = writeln!(out, "ok: `{}`", scenario.title);
    }
    (out, clean)
}

/// Title plus one line per tab.
pub fn info(scenario: &Scenario) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "title: {}", scenario.title);
    for tab in &scenario.tabs {
        let marker = if Some(tab.id) == scenario.active { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {:>3}  {:<20} {:>4} objects {:>4} lines  {}x{}",
            tab.id.0,
            tab.name,
            tab.canvas.objects.len(),
            tab.canvas.connections.len(),
            tab.canvas.size.width,
            tab.canvas.size.height,
        );
    }
    out
}

/// `<line id> <svg path>` for every connection, or `<line id> (dangling)`.
pub fn routes(scenario: &Scenario, router: &Router, only: Option<TabId>) -> String {
    let mut out = String::new();
    for tab in scenario.tabs.iter().filter(|t| only.is_none_or(|id| id == t.id)) {
        let _ = writeln!(out, "# {} ({})", tab.name, tab.id);
        for line in &tab.canvas.connections {
            match router.route_connection(&tab.canvas, line) {
                Some(route) => {
                    let _ = writeln!(out, "{} {}", line.id, to_bez_path(&route).to_svg());
                }
                None => {
                    let _ = writeln!(out, "{} (dangling)", line.id);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"{ "title": "Pilot", "currentTabId": 1,
        "nextTabId": 3, "nextObjId": 3, "nextLineId": 3,
        "tabs": [
          { "id": 1, "name": "Cold open", "canvasWidth": 2000, "canvasHeight": 1000,
            "objects": [
              { "id": "obj-1", "type": "title", "x": "100px", "y": "100px" },
              { "id": "obj-2", "type": "desc", "x": "400px", "y": "300px" }
            ],
            "lines": [
              { "id": "line-1", "start": "obj-1", "startDir": "right", "end": "obj-2", "endDir": "left" },
              { "id": "line-2", "start": "obj-1", "startDir": "top", "end": "obj-9", "endDir": "left" }
            ] },
          { "id": 2, "name": "Act one", "canvasWidth": 2500, "canvasHeight": 1000,
            "objects": [], "lines": [] }
        ] }"#;

    #[test]
    fn check_flags_dangling_line() {
        let (out, clean) = check(DOC);
        assert!(!clean);
        assert!(out.contains("warning[dangling-connection]"), "{out}");
    }

    #[test]
    fn check_reports_parse_errors() {
        let (out, clean) = check("{}");
        assert!(!clean);
        assert!(out.starts_with("error: malformed document"), "{out}");
    }

    #[test]
    fn info_lists_tabs() {
        let out = info(&from_json(DOC).unwrap());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "title: Pilot");
        assert!(lines[1].starts_with("*   1  Cold open"), "{}", lines[1]);
        assert!(lines[2].contains("2500x1000"));
    }

    #[test]
    fn routes_marks_dangling() {
        let out = routes(&from_json(DOC).unwrap(), &Router::default(), Some(TabId(1)));
        assert!(out.contains("line-2 (dangling)"));
        assert!(out.lines().any(|l| l.starts_with("line-1 M")));
        assert!(!out.contains("Act one"));
    }
}
