//! Members command - show the roster and who is tracked

use super::Project;
use crate::config::Roster;
use crate::models::MemberStatus;
use anyhow::Result;
use console::style;
use std::path::Path;

/// Run the members command
pub fn run(path: &Path) -> Result<()> {
    let project = Project::open(path)?;
    let roster = project.roster()?;
    print!("{}", render(&roster));
    Ok(())
}

fn render(roster: &Roster) -> String {
    let mut out = format!(
        "\n{} ({} tracked of {} configured)\n\n",
        style("Members").bold(),
        style(roster.whitelist().len()).cyan(),
        roster.participants().len()
    );
    for p in roster.participants() {
        let status = match p.status() {
            MemberStatus::Active => style(p.status().to_string()).green(),
            MemberStatus::Inactive => style(p.status().to_string()).yellow(),
            MemberStatus::Alumni => style(p.status().to_string()).dim(),
        };
        let marker = if p.is_eligible() {
            style("✓").green()
        } else {
            style("-").dim()
        };
        let name = p
            .name
            .as_deref()
            .map(|n| format!(" ({})", n))
            .unwrap_or_default();
        out.push_str(&format!("  {} @{}{}  {}\n", marker, p.github, name, status));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_marks_alumni() {
        let roster = Roster::from_json(
            r#"{ "members": [
                { "github": "alice", "name": "Alice" },
                { "github": "carol", "status": "alumni" }
            ] }"#,
        )
        .unwrap();
        let out = console::strip_ansi_codes(&render(&roster)).to_string();
        assert!(out.contains("1 tracked of 2 configured"));
        assert!(out.contains("✓ @alice (Alice)  active"));
        assert!(out.contains("- @carol  alumni"));
    }
}
