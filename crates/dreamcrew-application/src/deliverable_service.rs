//! Deliverable service: full-document generation and targeted refinement.
//!
//! Scene identity is owned locally: the oracle's ids are never trusted.
//! Generation stamps every scene with a fresh uuid; refinement re-stamps
//! scenes with their prior ids by position so untouched scenes keep their
//! identity across edits.

use dreamcrew_core::{Brief, Deliverables, PersonaId};
use dreamcrew_interaction::parse;
use dreamcrew_interaction::prompt;
use dreamcrew_interaction::{AgentError, GenerationAgent, GenerationRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static SCENE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"第\s*([0-9一二三四五六七八九十]+)\s*[镜个场幕]|[Ss]cene\s*#?([0-9]{1,3})|#([0-9]{1,3})",
    )
    .expect("static scene reference pattern")
});

/// Best-effort detection of a scene-number reference in a free-text
/// instruction ("#3", "Scene 5", "第三镜", "第12镜").
///
/// Detection only strengthens the prompt; an undetected reference falls
/// back to a whole-document edit, never an error.
pub fn detect_scene_reference(instruction: &str) -> Option<u32> {
    let captures = SCENE_REFERENCE.captures(instruction)?;
    captures
        .iter()
        .skip(1)
        .flatten()
        .next()
        .and_then(|m| parse_scene_number(m.as_str()))
}

fn parse_scene_number(raw: &str) -> Option<u32> {
    if let Ok(number) = raw.parse::<u32>() {
        return Some(number);
    }
    chinese_numeral(raw)
}

/// Converts simple Chinese numerals (一 .. 九十九) to their value.
fn chinese_numeral(raw: &str) -> Option<u32> {
    fn digit(c: char) -> Option<u32> {
        "一二三四五六七八九".find(c).map(|i| (i / 3) as u32 + 1)
    }

    let chars: Vec<char> = raw.chars().collect();
    match chars.as_slice() {
        [c] if *c == '十' => Some(10),
        [c] => digit(*c),
        ['十', ones] => digit(*ones).map(|o| 10 + o),
        [tens, '十'] => digit(*tens).map(|t| t * 10),
        [tens, '十', ones] => match (digit(*tens), digit(*ones)) {
            (Some(t), Some(o)) => Some(t * 10 + o),
            _ => None,
        },
        _ => None,
    }
}

fn restamp_scene_ids(updated: &mut Deliverables, prior: &Deliverables) {
    for (index, scene) in updated.script.iter_mut().enumerate() {
        scene.id = prior
            .script
            .get(index)
            .map(|prior_scene| prior_scene.id.clone())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    }
}

/// Drives the oracle to produce and patch the deliverables document.
pub struct DeliverableService {
    agent: Arc<dyn GenerationAgent>,
}

impl DeliverableService {
    pub fn new(agent: Arc<dyn GenerationAgent>) -> Self {
        Self { agent }
    }

    /// Generates the full deliverables document from the brief and the
    /// flattened discussion transcript.
    ///
    /// The oracle is asked to substantiate factual claims via external
    /// search. Every returned scene gets a fresh unique id.
    ///
    /// # Errors
    ///
    /// Propagates oracle and shape errors; the caller rolls back its
    /// optimistic step advance.
    pub async fn generate(
        &self,
        brief: &Brief,
        transcript: &str,
    ) -> Result<Deliverables, AgentError> {
        let request =
            GenerationRequest::text(prompt::deliverables_prompt(brief, transcript)).with_search();
        let raw = self.agent.execute(request).await?;
        let mut document = parse::parse_deliverables(&raw)?;

        for scene in &mut document.script {
            scene.id = uuid::Uuid::new_v4().to_string();
        }

        let (band_lo, band_hi) = brief.shot_count_band();
        let scene_count = document.script.len() as u32;
        if !(band_lo..=band_hi).contains(&scene_count) {
            tracing::warn!(
                "[DeliverableService] Oracle returned {} scenes, outside the requested {}-{} band",
                scene_count,
                band_lo,
                band_hi
            );
        }
        tracing::info!(
            "[DeliverableService] Generated deliverables: {} scenes, {} fact checks",
            document.script.len(),
            document.fact_checks.len()
        );
        Ok(document)
    }

    /// Applies a free-text instruction to the current document.
    ///
    /// Returns the updated document (prior scene ids restored by position)
    /// and the oracle's explanatory comment. On failure the caller keeps
    /// the prior document untouched.
    pub async fn refine(
        &self,
        current: &Deliverables,
        instruction: &str,
        persona: PersonaId,
    ) -> Result<(Deliverables, String), AgentError> {
        let scene_hint = detect_scene_reference(instruction);
        if let Some(number) = scene_hint {
            tracing::info!("[DeliverableService] Instruction targets scene {}", number);
        }

        let request =
            GenerationRequest::text(prompt::refine_prompt(current, instruction, persona, scene_hint))
                .with_response_schema(prompt::refine_response_schema());
        let raw = self.agent.execute(request).await?;
        let (mut document, comment) = parse::parse_refine_envelope(&raw)?;

        restamp_scene_ids(&mut document, current);
        Ok((document, comment))
    }
}
