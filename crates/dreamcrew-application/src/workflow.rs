//! Project workflow: the UI-facing operations over the active project.
//!
//! Owns the active [`Project`], validates lifecycle steps, sequences oracle
//! calls through the discussion/deliverable services, persists after every
//! mutation, and publishes [`ProjectEvent`]s so a renderer can observe each
//! change - including every single message of a timed reveal.

use crate::deliverable_service::DeliverableService;
use crate::discussion_service::{DiscussionService, flatten_transcript};
use dreamcrew_core::error::{DreamCrewError, Result};
use dreamcrew_core::event::ProjectEvent;
use dreamcrew_core::persona::PersonaId;
use dreamcrew_core::project::{Brief, Deliverables, Message, Project, ProjectRepository, ProjectStep};
use dreamcrew_interaction::GenerationAgent;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};

/// Canned lead-persona message used when the kickoff call fails; a kickoff
/// attempt must never leave the discussion empty.
pub const KICKOFF_FALLBACK: &str = "收到需求。请问您对这个视频的具体技术侧重点有什么特别要求吗？";

/// Canned reply used when a continue-discussion call fails.
pub const REPLY_FALLBACK: &str = "收到，我们已记录您的反馈。";

/// Apology appended when a refine call fails; the document stays untouched.
pub const REFINE_FALLBACK: &str = "抱歉，由于系统繁忙，无法完成修改。";

/// Sentinel stored when the user sends an empty utterance: an invitation
/// for the targeted persona to speak rather than a no-op.
pub const INVITE_PLACEHOLDER: &str = "(邀请您发言)";

/// User-facing notice published when deliverables generation fails.
pub const GENERATION_FAILED_NOTICE: &str = "生成全案失败，请重试。";

/// Pacing interval between revealed messages, simulating a live meeting.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(800);

/// Clears the in-flight flag when an oracle-backed operation finishes,
/// whatever path it exits through.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// The workflow engine behind the UI.
///
/// Exactly one project is active at a time; all mutation goes through the
/// operations here. At most one oracle-backed operation may be in flight -
/// re-entrant calls are rejected with [`DreamCrewError::Busy`].
pub struct ProjectWorkflow {
    repository: Arc<dyn ProjectRepository>,
    discussion: DiscussionService,
    deliverable: DeliverableService,
    /// The active project
    current: RwLock<Project>,
    /// Set while an oracle-backed operation is running
    in_flight: AtomicBool,
    events: mpsc::UnboundedSender<ProjectEvent>,
    reveal_delay: Duration,
}

impl ProjectWorkflow {
    /// Creates a workflow over a repository and a generation agent.
    ///
    /// Returns the workflow plus the event stream a renderer subscribes to.
    /// The initial active project is a fresh default; it is not persisted
    /// until the first mutation.
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        agent: Arc<dyn GenerationAgent>,
    ) -> (Self, mpsc::UnboundedReceiver<ProjectEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let workflow = Self {
            repository,
            discussion: DiscussionService::new(agent.clone()),
            deliverable: DeliverableService::new(agent),
            current: RwLock::new(Project::new()),
            in_flight: AtomicBool::new(false),
            events,
            reveal_delay: DEFAULT_REVEAL_DELAY,
        };
        (workflow, receiver)
    }

    /// Overrides the reveal pacing interval.
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    /// Whether an oracle-backed operation is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// A snapshot of the active project.
    pub async fn current_project(&self) -> Project {
        self.current.read().await.clone()
    }

    /// Lists stored projects, most recently updated first.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.repository.list_all().await
    }

    /// Creates a fresh default project, persists it, and makes it active.
    /// The previous active project stays in the store.
    pub async fn create_new_project(&self) -> Result<Project> {
        let stored = self.persist(&Project::new()).await;
        *self.current.write().await = stored.clone();
        self.publish(ProjectEvent::StepChanged { step: stored.step });
        Ok(stored)
    }

    /// Loads a stored project and makes it active.
    pub async fn load_project(&self, project_id: &str) -> Result<Project> {
        let project = self
            .repository
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DreamCrewError::not_found("project", project_id))?;
        *self.current.write().await = project.clone();
        self.publish(ProjectEvent::StepChanged { step: project.step });
        Ok(project)
    }

    /// Deletes a stored project. Deleting the active project makes a brand
    /// new default project active. The caller is responsible for asking the
    /// user for confirmation before invoking this.
    pub async fn delete_project(&self, project_id: &str) -> Result<Project> {
        self.repository.delete(project_id).await?;
        let deleted_active = self.current.read().await.id == project_id;
        if deleted_active {
            self.create_new_project().await
        } else {
            Ok(self.current_project().await)
        }
    }

    /// Submits the brief, advances to the discussion step, and kicks off
    /// the crew meeting.
    ///
    /// The kickoff messages are revealed one at a time with the pacing
    /// delay; each append is persisted and published before the next. On
    /// oracle failure a single canned lead-persona message is appended
    /// instead.
    pub async fn submit_brief(&self, brief: Brief) -> Result<Project> {
        let _guard = self.begin_operation("submit_brief")?;

        let (project_id, submitted) = {
            let mut current = self.current.write().await;
            current.submit_brief(brief)?;
            let stored = self.persist(&current).await;
            *current = stored;
            (current.id.clone(), current.brief.clone())
        };
        self.publish(ProjectEvent::StepChanged {
            step: ProjectStep::Discussion,
        });

        let messages = match self.discussion.kickoff(&submitted).await {
            Ok(messages) if !messages.is_empty() => messages,
            Ok(_) => {
                tracing::warn!("[ProjectWorkflow] Kickoff returned no messages, using fallback");
                vec![Message::from_persona(PersonaId::lead(), KICKOFF_FALLBACK)]
            }
            Err(err) => {
                tracing::warn!("[ProjectWorkflow] Kickoff failed: {err}");
                vec![Message::from_persona(PersonaId::lead(), KICKOFF_FALLBACK)]
            }
        };
        self.reveal_messages(&project_id, messages).await;

        Ok(self.current_project().await)
    }

    /// Appends the user's utterance and reveals the crew's replies.
    ///
    /// An empty utterance is stored as [`INVITE_PLACEHOLDER`] - an
    /// invitation for the targeted persona to speak. Oracle errors degrade
    /// to one fallback reply attributed to the target (or the lead); they
    /// never propagate past this operation.
    pub async fn send_discussion_message(
        &self,
        text: &str,
        target: Option<PersonaId>,
    ) -> Result<Project> {
        let _guard = self.begin_operation("send_discussion_message")?;

        let (project_id, brief, history) = {
            let mut current = self.current.write().await;
            if current.step != ProjectStep::Discussion {
                return Err(DreamCrewError::InvalidTransition {
                    operation: "send_discussion_message",
                    step: current.step,
                });
            }
            let content = if text.trim().is_empty() {
                INVITE_PLACEHOLDER.to_string()
            } else {
                text.to_string()
            };
            let user_message = Message::from_user(content);
            current.append_message(user_message.clone());
            let stored = self.persist(&current).await;
            *current = stored;
            self.publish(ProjectEvent::MessageRevealed {
                message: user_message,
            });
            (
                current.id.clone(),
                current.brief.clone(),
                current.discussion_history.clone(),
            )
        };

        let replies = match self
            .discussion
            .continue_discussion(&brief, &history, text, target)
            .await
        {
            Ok(replies) => replies,
            Err(err) => {
                tracing::warn!("[ProjectWorkflow] Continue discussion failed: {err}");
                vec![Message::from_persona(
                    target.unwrap_or_else(PersonaId::lead),
                    REPLY_FALLBACK,
                )]
            }
        };
        self.reveal_messages(&project_id, replies).await;

        Ok(self.current_project().await)
    }

    /// Optimistically advances to the delivery step and generates the
    /// deliverables document.
    ///
    /// On oracle failure or malformed output the advance is rolled back to
    /// the discussion step and the error propagates.
    pub async fn advance_to_delivery(&self) -> Result<Project> {
        let _guard = self.begin_operation("advance_to_delivery")?;

        let (project_id, brief, transcript) = {
            let mut current = self.current.write().await;
            current.advance_to_delivery()?;
            let stored = self.persist(&current).await;
            *current = stored;
            (
                current.id.clone(),
                current.brief.clone(),
                flatten_transcript(&current.discussion_history),
            )
        };
        self.publish(ProjectEvent::StepChanged {
            step: ProjectStep::Delivery,
        });

        match self.deliverable.generate(&brief, &transcript).await {
            Ok(document) => {
                let scene_count = document.script.len();
                let mut current = self.current.write().await;
                if current.id != project_id {
                    tracing::warn!(
                        "[ProjectWorkflow] Active project changed during generation, dropping result"
                    );
                    return Ok(current.clone());
                }
                current.set_deliverables(document)?;
                let notice = Message::from_persona(
                    PersonaId::lead(),
                    format!(
                        "全案策划已生成。分镜已扩展至约{scene_count}个镜头。相关数据源已确认并附带链接。"
                    ),
                );
                current.append_message(notice.clone());
                let stored = self.persist(&current).await;
                *current = stored;
                let project = current.clone();
                drop(current);

                self.publish(ProjectEvent::DeliverablesUpdated);
                self.publish(ProjectEvent::MessageRevealed { message: notice });
                Ok(project)
            }
            Err(err) => {
                {
                    let mut current = self.current.write().await;
                    if current.id == project_id {
                        current.revert_to_discussion()?;
                        let stored = self.persist(&current).await;
                        *current = stored;
                    }
                }
                self.publish(ProjectEvent::StepChanged {
                    step: ProjectStep::Discussion,
                });
                self.publish(ProjectEvent::Notice {
                    content: GENERATION_FAILED_NOTICE.to_string(),
                });
                Err(DreamCrewError::generation(err.to_string()))
            }
        }
    }

    /// Applies a free-text refine instruction through the acting persona.
    ///
    /// On success the document is replaced (untouched scenes keep their
    /// ids) and the oracle's comment joins the discussion. On failure the
    /// document is left untouched and exactly one apology message is
    /// appended; the error never propagates.
    pub async fn send_refine_instruction(
        &self,
        instruction: &str,
        persona: PersonaId,
    ) -> Result<Project> {
        let _guard = self.begin_operation("send_refine_instruction")?;

        let (project_id, current_document) = {
            let mut current = self.current.write().await;
            let Some(document) = current.deliverables.clone() else {
                return Err(DreamCrewError::not_found("deliverables", current.id.clone()));
            };
            let user_message = Message::from_user(instruction);
            current.append_message(user_message.clone());
            let stored = self.persist(&current).await;
            *current = stored;
            self.publish(ProjectEvent::MessageRevealed {
                message: user_message,
            });
            (current.id.clone(), document)
        };

        match self
            .deliverable
            .refine(&current_document, instruction, persona)
            .await
        {
            Ok((document, comment)) => {
                let mut current = self.current.write().await;
                if current.id == project_id {
                    current.set_deliverables(document)?;
                    let message = Message::from_persona(persona, comment);
                    current.append_message(message.clone());
                    let stored = self.persist(&current).await;
                    *current = stored;
                    drop(current);
                    self.publish(ProjectEvent::DeliverablesUpdated);
                    self.publish(ProjectEvent::MessageRevealed { message });
                }
            }
            Err(err) => {
                tracing::warn!("[ProjectWorkflow] Refine failed, document left unchanged: {err}");
                let mut current = self.current.write().await;
                if current.id == project_id {
                    let message = Message::from_persona(persona, REFINE_FALLBACK);
                    current.append_message(message.clone());
                    let stored = self.persist(&current).await;
                    *current = stored;
                    drop(current);
                    self.publish(ProjectEvent::MessageRevealed { message });
                }
            }
        }

        Ok(self.current_project().await)
    }

    /// Replaces the deliverables document with a manually edited one.
    pub async fn apply_manual_edit(&self, deliverables: Deliverables) -> Result<Project> {
        let mut current = self.current.write().await;
        if current.deliverables.is_none() {
            return Err(DreamCrewError::InvalidTransition {
                operation: "apply_manual_edit",
                step: current.step,
            });
        }
        current.set_deliverables(deliverables)?;
        let stored = self.persist(&current).await;
        *current = stored;
        let project = current.clone();
        drop(current);
        self.publish(ProjectEvent::DeliverablesUpdated);
        Ok(project)
    }

    fn begin_operation(&self, operation: &'static str) -> Result<InFlightGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(DreamCrewError::Busy { operation });
        }
        Ok(InFlightGuard {
            flag: &self.in_flight,
        })
    }

    /// Appends messages one at a time with the pacing delay. Each append is
    /// persisted and published before the next one starts, so the project
    /// can be observed mid-stream. If the active project changes while a
    /// reveal is running, the remaining messages are dropped.
    async fn reveal_messages(&self, origin_id: &str, messages: Vec<Message>) {
        for message in messages {
            tokio::time::sleep(self.reveal_delay).await;

            let mut current = self.current.write().await;
            if current.id != origin_id {
                tracing::warn!(
                    "[ProjectWorkflow] Active project changed mid-reveal, dropping remaining messages"
                );
                return;
            }
            current.append_message(message.clone());
            let stored = self.persist(&current).await;
            *current = stored;
            drop(current);

            self.publish(ProjectEvent::MessageRevealed { message });
        }
    }

    /// Persists a project snapshot. A failed write is logged and dropped -
    /// the store is a local cache, not the source of truth.
    async fn persist(&self, project: &Project) -> Project {
        match self.repository.upsert(project).await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(
                    "[ProjectWorkflow] Dropped write for project {}: {}",
                    project.id,
                    err
                );
                project.clone()
            }
        }
    }

    /// Non-blocking event publication; a dropped receiver just means a
    /// headless run.
    fn publish(&self, event: ProjectEvent) {
        let _ = self.events.send(event);
    }
}
