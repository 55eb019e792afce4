/// Final ranked report.
///
/// The crawl produces an in-memory report; persistence and presentation
/// belong to external collaborators (spreadsheet sink, dashboard). The JSON
/// form here is the stable hand-off shape, and the markdown renderer serves
/// the CLI's offline `report` command.
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::path::Path;

#[cfg(test)]
use anyhow::{anyhow, bail};
#[cfg(test)]
use jsonschema::{Draft, JSONSchema};

use crate::classify::StatusTier;
use crate::crawl::types::Participant;
use crate::timefmt::{format_instant, format_instant_opt, format_silence};

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: i32,
    pub project_id: String,
    pub generated_at: String,
    pub pages_visited: u32,
    pub participants: Vec<ReportRow>,
}

/// One participant as handed to the sink: raw counters plus the formatted
/// fields the sheet columns expect.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportRow {
    pub identifier: String,
    pub secondary_identifier: String,
    pub display_name: String,
    pub respondent_posts: u32,
    pub moderator_posts: u32,
    pub posts_since_moderator: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
    pub last_activity_formatted: String,
    pub silence_hours: u32,
    pub silence_formatted: String,
    pub status_message: String,
    pub tier: StatusTier,
    pub page_number: u32,
}

impl ReportRow {
    fn from_participant(p: Participant) -> Self {
        ReportRow {
            identifier: p.email,
            secondary_identifier: p.nick,
            display_name: p.display_name,
            respondent_posts: p.respondent_posts,
            moderator_posts: p.moderator_posts,
            posts_since_moderator: p.posts_since_moderator,
            last_activity: p.last_activity.map(format_instant),
            last_activity_formatted: format_instant_opt(p.last_activity),
            silence_hours: p.silence_hours,
            silence_formatted: format_silence(p.silence_hours),
            status_message: p.status_message,
            tier: p.status_tier,
            page_number: p.page_number,
        }
    }
}

/// Rank participants for the report: tier severity first, then longest
/// silence, then identifier for a stable order. Error-tier participants land
/// at the bottom by construction of the tier ordering.
pub fn sort_for_report(participants: &mut [Participant]) {
    participants.sort_by(|a, b| {
        (a.status_tier, Reverse(a.silence_hours), &a.email).cmp(&(
            b.status_tier,
            Reverse(b.silence_hours),
            &b.email,
        ))
    });
}

impl Report {
    pub fn build(
        project_id: &str,
        generated_at: NaiveDateTime,
        pages_visited: u32,
        mut participants: Vec<Participant>,
    ) -> Report {
        sort_for_report(&mut participants);
        Report {
            schema_version: 1,
            project_id: project_id.to_string(),
            generated_at: format_instant(generated_at),
            pages_visited,
            participants: participants
                .into_iter()
                .map(ReportRow::from_participant)
                .collect(),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report JSON from: {}", path.display()))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report file: {}", path.display()))
    }

    /// Render the ranked listing as a markdown table.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Engagement report — {}\n\n", self.project_id));
        out.push_str(&format!(
            "Generated at {} · {} participant(s) · {} page(s)\n\n",
            self.generated_at,
            self.participants.len(),
            self.pages_visited
        ));
        out.push_str("| Nick | Email | Last post | Silence | R | M | Since mod. | Status |\n");
        out.push_str("|------|-------|-----------|---------|---|---|------------|--------|\n");
        for row in &self.participants {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
                row.secondary_identifier,
                row.identifier,
                row.last_activity_formatted,
                row.silence_formatted,
                row.respondent_posts,
                row.moderator_posts,
                row.posts_since_moderator,
                row.status_message
            ));
        }
        out
    }

    #[cfg(test)]
    /// Validate report JSON against the JSON schema.
    pub fn validate_with_schema(report_json: &serde_json::Value, schema: &JSONSchema) -> Result<()> {
        match schema.validate(report_json) {
            Ok(_) => Ok(()),
            Err(errors) => {
                let error_messages: Vec<String> = errors
                    .map(|e| format!("  - {}: {}", e.instance_path, e))
                    .collect();
                bail!("Report validation failed:\n{}", error_messages.join("\n"))
            }
        }
    }

    #[cfg(test)]
    /// Compile the report JSON schema.
    pub fn compile_schema(schema_json: &serde_json::Value) -> Result<JSONSchema> {
        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema_json)
            .map_err(|e| anyhow!("Failed to compile JSON schema: {}", e))
    }
}
