//! Insight prompt building and response parsing.
//!
//! The request carries a compact per-project summary (no line-item breakups)
//! plus the declared output schema derived from [`InsightResult`]. The
//! response must be a JSON object with all three insight fields.

use schemars::schema_for;
use serde::Serialize;

use crate::error::InsightError;
use crate::types::{InsightResult, Project, ProjectStatus};

const PROMPT_PREAMBLE: &str = "Analyze these space agency projects and provide a high-level \
executive summary, identifying critical risks and budget concerns: ";

/// What the summarization service sees of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub status: ProjectStatus,
    pub progress: u8,
    pub total_budget: u64,
    pub spent_budget: u64,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            status: project.status,
            progress: project.progress,
            total_budget: project.total_budget,
            spent_budget: project.spent_budget,
        }
    }
}

/// A fully built insight request, ready for any provider.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRequest {
    pub prompt: String,
    pub response_schema: serde_json::Value,
    pub project_count: usize,
}

impl InsightRequest {
    pub fn for_projects(projects: &[Project]) -> Self {
        let summaries: Vec<ProjectSummary> = projects.iter().map(ProjectSummary::from).collect();
        Self {
            prompt: build_insight_prompt(&summaries),
            response_schema: insight_response_schema(),
            project_count: summaries.len(),
        }
    }
}

pub fn build_insight_prompt(summaries: &[ProjectSummary]) -> String {
    // Serializing plain structs of strings and integers cannot fail.
    let payload = serde_json::to_string(summaries).unwrap_or_else(|_| "[]".to_string());
    format!("{}{}", PROMPT_PREAMBLE, payload)
}

/// JSON Schema for [`InsightResult`], without the draft/title envelope.
pub fn insight_response_schema() -> serde_json::Value {
    let mut schema = serde_json::to_value(schema_for!(InsightResult))
        .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    schema
}

/// Parse the service's text output into an [`InsightResult`].
///
/// Empty text, text that is not JSON, and JSON that does not match the
/// insight shape are distinct errors so the log can tell them apart.
pub fn parse_insight_response(text: &str) -> Result<InsightResult, InsightError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(InsightError::EmptyResponse);
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| InsightError::Parse(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| InsightError::Schema(e.to_string()))
}

/// "```json\n{...}\n```" → "{...}"
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_omits_breakup() {
        let catalog = Catalog::builtin();
        let summary = ProjectSummary::from(&catalog.projects()[0]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Nebula-X Heavy Lift",
                "status": "In Progress",
                "progress": 75,
                "totalBudget": 450_000_000u64,
                "spentBudget": 320_000_000u64,
            })
        );
    }

    #[test]
    fn test_prompt_embeds_json_payload() {
        let catalog = Catalog::builtin();
        let request = InsightRequest::for_projects(&catalog.projects()[2..4]);
        assert!(request.prompt.starts_with("Analyze these space agency projects"));
        assert!(request.prompt.contains("\"name\":\"GeoScan 360\""));
        assert!(request.prompt.contains("\"status\":\"Planning\""));
        assert!(!request.prompt.contains("breakup"));
        assert_eq!(request.project_count, 2);
    }

    #[test]
    fn test_prompt_for_empty_set() {
        let request = InsightRequest::for_projects(&[]);
        assert!(request.prompt.ends_with(": []"));
        assert_eq!(request.project_count, 0);
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = insight_response_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema.get("$schema").is_none());
        let mut required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        required.sort();
        assert_eq!(
            required,
            vec!["executiveSummary", "financialHealth", "riskAlerts"]
        );
        assert_eq!(schema["properties"]["riskAlerts"]["type"], "array");
        assert_eq!(schema["properties"]["riskAlerts"]["items"]["type"], "string");
        assert_eq!(schema["properties"]["executiveSummary"]["type"], "string");
    }

    #[test]
    fn test_parse_valid_response() {
        let text = r#"{"executiveSummary":"Stable.","riskAlerts":["SI-02 early"],"financialHealth":"Healthy"}"#;
        let result = parse_insight_response(text).unwrap();
        assert_eq!(result.executive_summary, "Stable.");
        assert_eq!(result.risk_alerts, vec!["SI-02 early".to_string()]);
    }

    #[test]
    fn test_parse_fenced_response() {
        let text = "```json\n{\"executiveSummary\":\"a\",\"riskAlerts\":[],\"financialHealth\":\"b\"}\n```";
        assert!(parse_insight_response(text).is_ok());
    }

    #[test]
    fn test_parse_error_kinds() {
        assert!(matches!(
            parse_insight_response("   "),
            Err(InsightError::EmptyResponse)
        ));
        assert!(matches!(
            parse_insight_response("not json"),
            Err(InsightError::Parse(_))
        ));
        assert!(matches!(
            parse_insight_response("{}"),
            Err(InsightError::Schema(_))
        ));
        assert!(matches!(
            parse_insight_response(r#"{"executiveSummary":"a","riskAlerts":[1],"financialHealth":"b"}"#),
            Err(InsightError::Schema(_))
        ));
    }
}
