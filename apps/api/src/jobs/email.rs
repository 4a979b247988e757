//! Application emails: a candidate, a target role and portfolio links in, a
//! drafted email out. Drafting only; nothing here sends mail.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::prompts::{EMAIL_PROMPT_TEMPLATE, EMAIL_SYSTEM};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_RULES, NO_INVENTION_RULE};
use crate::llm_client::LlmClient;
use crate::tailoring::target::TargetContext;

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub name: String,
    /// Skills or achievements the email may draw on.
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DraftEmail {
    pub subject: String,
    pub body: String,
}

/// Drafts an application email for `target` written as `candidate`.
pub async fn draft_email(
    candidate: &Candidate,
    target: &TargetContext,
    links: &[String],
    llm: &LlmClient,
) -> Result<DraftEmail, AppError> {
    let prompt = build_email_prompt(candidate, target, links);
    let system = format!("{EMAIL_SYSTEM} {NO_INVENTION_RULE} {JSON_ONLY_RULES}");

    let draft: DraftEmail = llm.call_json(&prompt, &system).await.map_err(|e| {
        if e.is_unusable_output() {
            AppError::UpstreamParse(format!("unable to parse drafted email: {e}"))
        } else {
            AppError::Llm(format!("email drafting failed: {e}"))
        }
    })?;

    if draft.subject.trim().is_empty() || draft.body.trim().is_empty() {
        return Err(AppError::UpstreamParse(
            "drafted email has an empty subject or body".to_string(),
        ));
    }

    info!(
        "Drafted application email for {} at {}",
        target.role, target.company
    );
    Ok(draft)
}

fn build_email_prompt(candidate: &Candidate, target: &TargetContext, links: &[String]) -> String {
    let highlights = bullet_list(&candidate.highlights, "None provided.");
    let links = bullet_list(links, "No portfolio links available.");

    fill_template(
        EMAIL_PROMPT_TEMPLATE,
        &[
            ("candidate_name", candidate.name.trim()),
            ("company", target.company.trim()),
            ("role", target.role.trim()),
            (
                "job_description",
                target.job_description.as_deref().unwrap_or("(none)"),
            ),
            ("highlights", highlights.as_str()),
            ("links", links.as_str()),
        ],
    )
}

fn bullet_list(items: &[String], empty: &str) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| format!("- {item}"))
        .collect();
    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate() -> Candidate {
        Candidate {
            name: "Ada Lovelace".to_string(),
            highlights: vec!["Rust services".to_string(), "  ".to_string()],
        }
    }

    #[test]
    fn test_prompt_carries_candidate_target_and_links() {
        let target = TargetContext::new(
            "Globex",
            "Platform Engineer",
            Some("Own the payments platform".to_string()),
            ["Rust"],
        );
        let links = vec![
            "https://github.com/ada".to_string(),
            "https://ada.dev/ledger".to_string(),
        ];
        let prompt = build_email_prompt(&candidate(), &target, &links);

        assert!(prompt.contains("Name: Ada Lovelace"));
        assert!(prompt.contains("Company: Globex"));
        assert!(prompt.contains("Role: Platform Engineer"));
        assert!(prompt.contains("Own the payments platform"));
        assert!(prompt.contains("- Rust services\n"));
        assert!(prompt.contains("- https://github.com/ada\n- https://ada.dev/ledger"));
        assert!(!prompt.contains("{links}"));
        assert!(prompt.contains("\"subject\": \"Application for Backend Engineer\""));
    }

    #[test]
    fn test_prompt_placeholders_for_missing_inputs() {
        let target = TargetContext::new("Initech", "Analyst", None, Vec::<String>::new());
        let candidate = Candidate {
            name: "Bo".to_string(),
            highlights: vec![],
        };
        let prompt = build_email_prompt(&candidate, &target, &[]);

        assert!(prompt.contains("No portfolio links available."));
        assert!(prompt.contains("None provided."));
        assert!(prompt.contains("Job description:\n(none)"));
    }

    #[test]
    fn test_user_text_inserted_literally() {
        let target = TargetContext::new("Acme", "Dev", Some("Ping {links} daily".to_string()), ["Go"]);
        let prompt = build_email_prompt(&candidate(), &target, &["https://a.dev".to_string()]);
        assert!(prompt.contains("Ping {links} daily"));
    }

    #[test]
    fn test_draft_reply_shape() {
        let draft: DraftEmail =
            serde_json::from_value(json!({"subject": "Hello", "body": "Dear team"})).unwrap();
        assert_eq!(draft.subject, "Hello");
        assert!(serde_json::from_value::<DraftEmail>(json!({"email": "Dear team"})).is_err());
    }
}
