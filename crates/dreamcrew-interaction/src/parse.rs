//! Decoding of oracle output.
//!
//! The oracle answers either structured JSON or free text wrapped in
//! markdown code fences; both forms are accepted here. Any shape mismatch
//! surfaces as [`AgentError::InvalidResponse`] for the caller to handle.

use crate::agent::AgentError;
use dreamcrew_core::{Deliverables, PersonaId};
use serde::Deserialize;

/// Removes a leading ```json / ``` fence and a trailing ``` fence.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let body = body.trim_start();
    body.strip_suffix("```").map(str::trim_end).unwrap_or(body)
}

/// One crew utterance as the oracle emits it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCrewReply {
    agent_id: String,
    content: String,
}

/// Envelope of a refine call: the updated document plus an explanatory
/// comment.
#[derive(Debug, Deserialize)]
struct RefineEnvelope {
    project: Deliverables,
    comment: String,
}

/// Parses an array of crew replies, resolving persona ids leniently.
///
/// Unknown ids are attributed to the lead persona rather than dropped: the
/// oracle's deviation from the role list is used as-is, never enforced.
pub fn parse_crew_replies(raw: &str) -> Result<Vec<(PersonaId, String)>, AgentError> {
    let cleaned = strip_code_fences(raw);
    let replies: Vec<RawCrewReply> = serde_json::from_str(cleaned)
        .map_err(|err| AgentError::InvalidResponse(format!("crew reply payload: {err}")))?;

    Ok(replies
        .into_iter()
        .map(|reply| {
            let persona = PersonaId::parse_lenient(&reply.agent_id).unwrap_or_else(|| {
                tracing::warn!(
                    "[parse] Unknown persona id '{}' in oracle reply, attributing to lead",
                    reply.agent_id
                );
                PersonaId::lead()
            });
            (persona, reply.content)
        })
        .collect())
}

/// Parses a full deliverables document.
pub fn parse_deliverables(raw: &str) -> Result<Deliverables, AgentError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned)
        .map_err(|err| AgentError::InvalidResponse(format!("deliverables payload: {err}")))
}

/// Parses a refine envelope into the updated document and its comment.
pub fn parse_refine_envelope(raw: &str) -> Result<(Deliverables, String), AgentError> {
    let cleaned = strip_code_fences(raw);
    let envelope: RefineEnvelope = serde_json::from_str(cleaned)
        .map_err(|err| AgentError::InvalidResponse(format!("refine payload: {err}")))?;
    Ok((envelope.project, envelope.comment))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELIVERABLES_JSON: &str = r#"{
        "strategicPlan": {"coreValues": "v", "narrativeStructure": "n", "logicFlow": "l"},
        "script": [{"sceneNumber": 1, "shotType": "特写", "transition": "切", "visual": "芯片",
                    "midjourneyPrompt": "macro chip", "audio": "旁白", "interaction": "无", "duration": "3s"}],
        "dataVerification": [{"fact": "f", "source": "s", "url": "https://example.com", "status": "Verified"}]
    }"#;

    #[test]
    fn strips_json_fences_and_plain_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn crew_replies_resolve_known_and_unknown_personas() {
        let raw = r#"[
            {"agentId": "ChiefEditor", "content": "收到需求。"},
            {"agentId": "interactiontech", "content": "沙盘需要投影校准。"},
            {"agentId": "Narrator", "content": "谁在说话？"}
        ]"#;
        let replies = parse_crew_replies(raw).unwrap();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0].0, PersonaId::ChiefEditor);
        assert_eq!(replies[1].0, PersonaId::InteractionTech);
        // unknown id degrades to the lead persona, content kept as-is
        assert_eq!(replies[2].0, PersonaId::lead());
        assert_eq!(replies[2].1, "谁在说话？");
    }

    #[test]
    fn malformed_crew_payload_is_an_invalid_response() {
        assert!(matches!(
            parse_crew_replies("not json"),
            Err(AgentError::InvalidResponse(_))
        ));
    }

    #[test]
    fn deliverables_parse_accepts_fenced_payloads() {
        let fenced = format!("```json\n{DELIVERABLES_JSON}\n```");
        let doc = parse_deliverables(&fenced).unwrap();
        assert_eq!(doc.script.len(), 1);
        assert_eq!(doc.fact_checks.len(), 1);
    }

    #[test]
    fn deliverables_parse_rejects_wrong_shapes() {
        assert!(matches!(
            parse_deliverables(r#"{"script": "not-an-array"}"#),
            Err(AgentError::InvalidResponse(_))
        ));
    }

    #[test]
    fn refine_envelope_returns_document_and_comment() {
        let raw = format!(r#"{{"project": {DELIVERABLES_JSON}, "comment": "已调整第1镜"}}"#);
        let (doc, comment) = parse_refine_envelope(&raw).unwrap();
        assert_eq!(doc.script[0].shot_type, "特写");
        assert_eq!(comment, "已调整第1镜");
    }
}
