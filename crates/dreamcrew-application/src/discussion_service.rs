//! Discussion service: oracle-backed crew conversation.
//!
//! Assembles prompts, executes one oracle call per operation, and decodes
//! the replies into domain messages. Pacing and persistence live in the
//! workflow, not here.

use dreamcrew_core::{Brief, Message, MessageRole, PersonaId};
use dreamcrew_interaction::parse;
use dreamcrew_interaction::prompt;
use dreamcrew_interaction::{AgentError, GenerationAgent, GenerationRequest};
use std::sync::Arc;

/// Flattens a discussion history into the transcript format the oracle
/// reads: one `SENDER: content` line per message.
pub fn flatten_transcript(history: &[Message]) -> String {
    history
        .iter()
        .map(|message| match message.role {
            MessageRole::User => format!("USER: {}", message.content),
            MessageRole::Crew => format!(
                "{}: {}",
                message.persona.unwrap_or_else(PersonaId::lead),
                message.content
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drives the oracle to author crew utterances.
pub struct DiscussionService {
    agent: Arc<dyn GenerationAgent>,
}

impl DiscussionService {
    pub fn new(agent: Arc<dyn GenerationAgent>) -> Self {
        Self { agent }
    }

    /// Opens the kickoff meeting for a freshly submitted brief.
    ///
    /// Returns the crew's opening statements in oracle order.
    pub async fn kickoff(&self, brief: &Brief) -> Result<Vec<Message>, AgentError> {
        let request = GenerationRequest::text(prompt::kickoff_prompt(brief))
            .with_response_schema(prompt::crew_reply_schema());
        let raw = self.agent.execute(request).await?;
        let replies = parse::parse_crew_replies(&raw)?;

        tracing::info!(
            "[DiscussionService] Kickoff produced {} crew messages",
            replies.len()
        );
        Ok(replies
            .into_iter()
            .map(|(persona, content)| Message::from_persona(persona, content))
            .collect())
    }

    /// Requests 1-2 crew replies to the user's latest utterance.
    ///
    /// `history` must already include the user's message. When `target` is
    /// set the oracle is instructed that only (or primarily) that persona
    /// may respond; if it deviates, the result is used as-is.
    pub async fn continue_discussion(
        &self,
        brief: &Brief,
        history: &[Message],
        user_message: &str,
        target: Option<PersonaId>,
    ) -> Result<Vec<Message>, AgentError> {
        let transcript = flatten_transcript(history);
        let request = GenerationRequest::text(prompt::continue_prompt(
            brief,
            &transcript,
            user_message,
            target,
        ))
        .with_response_schema(prompt::crew_reply_schema());
        let raw = self.agent.execute(request).await?;
        let replies = parse::parse_crew_replies(&raw)?;

        tracing::info!(
            "[DiscussionService] Discussion continued with {} crew messages (target: {:?})",
            replies.len(),
            target
        );
        Ok(replies
            .into_iter()
            .map(|(persona, content)| Message::from_persona(persona, content))
            .collect())
    }
}
