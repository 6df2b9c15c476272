//! Persona domain model.
//!
//! Represents the AI crew members that participate in project discussions.
//! Each persona has unique characteristics, a role, and an area of expertise.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Identifier of a crew persona.
///
/// This is a closed set: personas are never created or destroyed at runtime,
/// and every id resolves to a profile via [`PersonaId::profile`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum PersonaId {
    /// 总策划 / 内容总监 — leads the crew and opens every discussion.
    ChiefEditor,
    /// 资深策划 / 文案导演
    ContentDirector,
    /// 调研编辑 / 数据研究
    Researcher,
    /// 体验脚本编写
    ExperienceDesigner,
    /// 互动技术专家 — hardware and interaction feasibility.
    InteractionTech,
}

impl PersonaId {
    /// The persona that leads discussions and authors fallback messages
    /// when no other persona is targeted.
    pub fn lead() -> Self {
        PersonaId::ChiefEditor
    }

    /// Resolves loosely-formatted external ids ("chiefeditor", "Researcher ")
    /// to a persona id. Returns `None` when nothing matches.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if let Ok(id) = trimmed.parse::<PersonaId>() {
            return Some(id);
        }
        PersonaId::iter().find(|id| id.to_string().eq_ignore_ascii_case(trimmed))
    }
}

/// A crew member with specific characteristics and expertise.
///
/// Profiles are immutable process-wide data defined in this crate; display
/// metadata (avatar, styling tokens) is carried for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Display name of the persona
    pub name: &'static str,
    /// Role or title describing the persona's position in the crew
    pub role: &'static str,
    /// Avatar image reference
    pub avatar: &'static str,
    /// Foreground styling token
    pub color: &'static str,
    /// Background styling token
    pub bg_color: &'static str,
    /// Description of the persona's area of expertise
    pub expertise: &'static str,
    /// One-line focus used when describing the crew to the oracle
    pub focus: &'static str,
}
