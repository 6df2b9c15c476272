//! Prompt assembly for the generation oracle.
//!
//! Every oracle call is a rendered Jinja template: the shared project/team
//! context plus a task block. Templates keep the original product's
//! Chinese-output directives.

use dreamcrew_core::{Brief, Deliverables, PersonaId};
use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use strum::IntoEnumIterator;

const TEAM_CONTEXT_TEMPLATE: &str = r#"PROJECT CONTEXT:
- Industry: {{ brief.industry }}
- Topic: {{ brief.topic }}
- Usage/Format: {{ brief.usage_format }} (IMPORTANT: Adapt visuals for this format)
- Content Details: {{ brief.content_details }}
- Target Audience: {{ brief.target_audience }}
- Visual Style: {{ brief.visual_style }}
- Key Message: {{ brief.key_message }}
- Target Duration: {{ brief.duration }}
- Estimated Shot Count: {{ brief.shot_count }}

TEAM ROLES:
{% for member in team %}{{ loop.index }}. {{ member.name }} ({{ member.role }}): {{ member.focus }}
{% endfor %}"#;

const KICKOFF_TEMPLATE: &str = r#"{{ context }}

TASK:
Initiate the project kickoff meeting.
1. The Chief Editor should acknowledge the project, specifically mentioning the Usage Format ({{ usage_format }}) and Industry.
2. The Interaction Tech Expert MUST speak early if the format is complex (like LED Wall or Sand Table).
3. The Researcher or Content Director should point out a potential gap or ambiguity in the brief.
{% if special_hardware %}
NOTE: The chosen format requires special hardware. The Interaction Tech Expert must be among the first speakers.
{% endif %}
Output format: JSON Array of objects { "agentId": "Role", "content": "Message" }.
Language: Chinese (Professional & Insightful)."#;

const CONTINUE_TEMPLATE: &str = r#"{{ context }}

CHAT HISTORY:
{{ transcript }}

LATEST USER MESSAGE:
"{{ user_message }}"

TASK:
The user has replied.
{% if target_name %}IMPORTANT: The user has specifically asked {{ target_name }} ({{ target_id }}) to respond. Only this agent should speak, or this agent should lead the response.{% else %}Agents should react to the user's input. Provide 1 to 2 responses.{% endif %}
If the user's input is empty, they might just be nudging the agent to speak. In that case, the agent should propose an idea or ask a relevant question based on their expertise.

Output format: JSON Array of objects { "agentId": "Role", "content": "Message" }.
Language: Chinese."#;

const DELIVERABLES_TEMPLATE: &str = r#"{{ context }}

TEAM DISCUSSION LOG:
{{ transcript }}

TASK:
Generate the final project deliverables (Project Bible).
You MUST use the Google Search tool to find REAL URLs for the Data Verification section.

REQUIREMENTS:
1. **SCRIPT (分镜脚本)**:
   - **QUANTITY**: Based on user request: {{ shot_count }} (deliver between {{ band_lo }} and {{ band_hi }} scenes).
   - **FORMAT ADAPTATION**: The visuals MUST be designed for: {{ usage_format }}. (e.g., if LED Wall, focus on high-res wide visuals; if Sand Table, focus on projection alignment).
   - **DURATION**: Vary duration between 1s to 10s+.
   - **CONTENT**: Detailed Visuals, Camera Movements, and Audio.

2. **DATA VERIFICATION (数据核实)**:
   - You must verify 3-5 technical facts used in the script.
   - **CRITICAL**: You MUST provide a valid URL link for the source in the 'url' field.

REQUIRED OUTPUT FORMAT (Raw JSON):
{
  "strategicPlan": {
    "coreValues": "...",
    "narrativeStructure": "...",
    "logicFlow": "..."
  },
  "script": [
    {
      "sceneNumber": 1,
      "shotType": "...",
      "transition": "...",
      "visual": "...",
      "midjourneyPrompt": "...",
      "audio": "...",
      "interaction": "...",
      "duration": "..."
    }
  ],
  "dataVerification": [
    {
      "fact": "...",
      "source": "Name of source",
      "url": "https://...",
      "status": "Verified"
    }
  ]
}

Language: Chinese (Simplified), except for 'midjourneyPrompt' (English)."#;

const REFINE_TEMPLATE: &str = r##"Current Project JSON: {{ current_json }}
User Instruction: "{{ instruction }}"
Acting Agent: {{ agent_name }} ({{ agent_role }})
{% if scene_hint %}
DETECTED TARGET: the instruction refers to Scene {{ scene_hint }}. Modify ONLY that scene.
{% endif %}
TASK:
1. Modify the project JSON based on the instruction.
2. **TARGETED EDITING**: If the user mentions a specific Scene Number (e.g., "#3", "Scene 5", "第三镜"), LOCATE that specific scene object and modify ONLY that scene (visual, audio, etc.) while keeping the rest intact.
3. If the user instruction is general, apply it to the whole script or strategy.
4. Provide a short comment explaining what was changed.

Language: Chinese."##;

static PROMPT_ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("team_context", TEAM_CONTEXT_TEMPLATE)
        .expect("static team_context template");
    env.add_template("kickoff", KICKOFF_TEMPLATE)
        .expect("static kickoff template");
    env.add_template("continue", CONTINUE_TEMPLATE)
        .expect("static continue template");
    env.add_template("deliverables", DELIVERABLES_TEMPLATE)
        .expect("static deliverables template");
    env.add_template("refine", REFINE_TEMPLATE)
        .expect("static refine template");
    env
});

fn render(name: &str, ctx: minijinja::Value) -> String {
    PROMPT_ENV
        .get_template(name)
        .and_then(|template| template.render(ctx))
        .expect("prompt template render")
}

fn team_members() -> Vec<Value> {
    PersonaId::iter()
        .map(|id| {
            let profile = id.profile();
            json!({
                "name": profile.name,
                "role": profile.role,
                "focus": profile.focus,
            })
        })
        .collect()
}

/// Renders the shared project/team context block.
pub fn team_context(brief: &Brief) -> String {
    render(
        "team_context",
        context! { brief => brief, team => team_members() },
    )
}

/// Prompt for the kickoff meeting call.
pub fn kickoff_prompt(brief: &Brief) -> String {
    render(
        "kickoff",
        context! {
            context => team_context(brief),
            usage_format => brief.usage_format,
            special_hardware => brief.requires_special_hardware(),
        },
    )
}

/// Prompt for a continue-discussion call.
///
/// `transcript` is the flattened history; `target` forces (or leads) the
/// reply to one persona.
pub fn continue_prompt(
    brief: &Brief,
    transcript: &str,
    user_message: &str,
    target: Option<PersonaId>,
) -> String {
    render(
        "continue",
        context! {
            context => team_context(brief),
            transcript => transcript,
            user_message => user_message,
            target_name => target.map(|id| id.profile().name),
            target_id => target.map(|id| id.to_string()),
        },
    )
}

/// Prompt for the full deliverables generation call.
pub fn deliverables_prompt(brief: &Brief, transcript: &str) -> String {
    let (band_lo, band_hi) = brief.shot_count_band();
    render(
        "deliverables",
        context! {
            context => team_context(brief),
            transcript => transcript,
            shot_count => brief.shot_count,
            usage_format => brief.usage_format,
            band_lo => band_lo,
            band_hi => band_hi,
        },
    )
}

/// Prompt for a targeted refine call.
///
/// `scene_hint` carries a locally detected scene-number reference; when the
/// detection found nothing the oracle falls back to its own reading of the
/// instruction (and from there to a whole-document edit).
pub fn refine_prompt(
    current: &Deliverables,
    instruction: &str,
    persona: PersonaId,
    scene_hint: Option<u32>,
) -> String {
    let profile = persona.profile();
    let current_json = serde_json::to_string(current).unwrap_or_else(|_| "{}".to_string());
    render(
        "refine",
        context! {
            current_json => current_json,
            instruction => instruction,
            agent_name => profile.name,
            agent_role => profile.role,
            scene_hint => scene_hint,
        },
    )
}

/// Response schema for crew-reply calls: an array of {agentId, content}.
pub fn crew_reply_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "agentId": { "type": "STRING" },
                "content": { "type": "STRING" }
            }
        }
    })
}

/// Response schema for refine calls: the full document plus a comment.
pub fn refine_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "project": {
                "type": "OBJECT",
                "properties": {
                    "strategicPlan": {
                        "type": "OBJECT",
                        "properties": {
                            "coreValues": { "type": "STRING" },
                            "narrativeStructure": { "type": "STRING" },
                            "logicFlow": { "type": "STRING" }
                        }
                    },
                    "script": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "sceneNumber": { "type": "INTEGER" },
                                "shotType": { "type": "STRING" },
                                "transition": { "type": "STRING" },
                                "visual": { "type": "STRING" },
                                "midjourneyPrompt": { "type": "STRING" },
                                "audio": { "type": "STRING" },
                                "interaction": { "type": "STRING" },
                                "duration": { "type": "STRING" }
                            }
                        }
                    },
                    "dataVerification": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "fact": { "type": "STRING" },
                                "source": { "type": "STRING" },
                                "url": { "type": "STRING" },
                                "status": { "type": "STRING" }
                            }
                        }
                    }
                }
            },
            "comment": { "type": "STRING" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sand_table_brief() -> Brief {
        Brief {
            industry: "量子计算 (Quantum Computing)".to_string(),
            topic: "量子优越性".to_string(),
            content_details: "从量子比特讲到展望".to_string(),
            target_audience: "展馆观众".to_string(),
            key_message: "科技自立".to_string(),
            usage_format: "数字沙盘 (Digital Sand Table)".to_string(),
            ..Brief::default()
        }
    }

    #[test]
    fn team_context_lists_all_five_roles() {
        let context = team_context(&sand_table_brief());
        assert!(context.contains("量子计算"));
        for id in PersonaId::iter() {
            assert!(context.contains(id.profile().name));
        }
    }

    #[test]
    fn kickoff_prompt_flags_special_hardware_formats() {
        let prompt = kickoff_prompt(&sand_table_brief());
        assert!(prompt.contains("Interaction Tech Expert MUST speak early"));
        assert!(prompt.contains("potential gap or ambiguity"));
        assert!(prompt.contains("requires special hardware"));

        let standard = Brief {
            usage_format: "标准屏幕 / 手机 / PC (Standard 16:9)".to_string(),
            ..sand_table_brief()
        };
        assert!(!kickoff_prompt(&standard).contains("requires special hardware"));
    }

    #[test]
    fn continue_prompt_switches_on_target() {
        let brief = sand_table_brief();
        let targeted = continue_prompt(&brief, "USER: 你好", "补充一下", Some(PersonaId::Researcher));
        assert!(targeted.contains("Dr. Chen"));
        assert!(targeted.contains("Only this agent should speak"));

        let open = continue_prompt(&brief, "USER: 你好", "补充一下", None);
        assert!(open.contains("Provide 1 to 2 responses"));
    }

    #[test]
    fn deliverables_prompt_carries_band_and_search_requirement() {
        let prompt = deliverables_prompt(&sand_table_brief(), "USER: 开始吧");
        assert!(prompt.contains("Google Search tool"));
        assert!(prompt.contains("between 20 and 25 scenes"));
        assert!(prompt.contains("数字沙盘"));
    }

    #[test]
    fn refine_prompt_includes_hint_only_when_detected() {
        let doc: Deliverables = serde_json::from_str(
            r#"{"strategicPlan":{"coreValues":"v","narrativeStructure":"n","logicFlow":"l"},"script":[],"dataVerification":[]}"#,
        )
        .unwrap();

        let hinted = refine_prompt(&doc, "第三镜改成夜景", PersonaId::ExperienceDesigner, Some(3));
        assert!(hinted.contains("DETECTED TARGET: the instruction refers to Scene 3"));

        let plain = refine_prompt(&doc, "整体更有科技感", PersonaId::ExperienceDesigner, None);
        assert!(!plain.contains("DETECTED TARGET"));
    }
}
