//! The deliverables document: strategic plan, shot script, and fact checks.
//!
//! Wire names follow the generation oracle's JSON contract (camelCase,
//! `dataVerification` for the fact-check list), so a structured oracle
//! response deserializes directly into these types.

use serde::{Deserialize, Serialize};

/// The strategic-plan section of the deliverables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicPlan {
    pub core_values: String,
    pub narrative_structure: String,
    pub logic_flow: String,
}

/// One shot/segment entry within the deliverables' script.
///
/// The `id` is assigned locally and preserved across partial edits so
/// unrelated scenes are never perceived as new; the oracle never supplies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scene {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub scene_number: u32,
    pub shot_type: String,
    pub transition: String,
    pub visual: String,
    /// Image-generation prompt (kept in English by the oracle contract)
    #[serde(rename = "midjourneyPrompt")]
    pub image_prompt: String,
    pub audio: String,
    pub interaction: String,
    pub duration: String,
}

/// Verification status of a fact-check entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerificationStatus {
    Verified,
    #[default]
    NeedsCheck,
    Manual,
}

impl From<String> for VerificationStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Verified" => VerificationStatus::Verified,
            "Manual" => VerificationStatus::Manual,
            // Unknown statuses from the oracle degrade to "needs check"
            _ => VerificationStatus::NeedsCheck,
        }
    }
}

impl From<VerificationStatus> for String {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Verified => "Verified".to_string(),
            VerificationStatus::NeedsCheck => "Needs Check".to_string(),
            VerificationStatus::Manual => "Manual".to_string(),
        }
    }
}

/// One verified (or to-be-verified) factual claim with its source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FactCheck {
    pub fact: String,
    /// Name of the source
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub status: VerificationStatus,
}

/// The generated output document: strategic plan + scene list + fact checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverables {
    pub strategic_plan: StrategicPlan,
    pub script: Vec<Scene>,
    #[serde(rename = "dataVerification")]
    pub fact_checks: Vec<FactCheck>,
}
