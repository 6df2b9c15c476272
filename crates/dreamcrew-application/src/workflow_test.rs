#[cfg(test)]
mod tests {
    use crate::workflow::{
        INVITE_PLACEHOLDER, KICKOFF_FALLBACK, ProjectWorkflow, REFINE_FALLBACK, REPLY_FALLBACK,
    };
    use async_trait::async_trait;
    use dreamcrew_core::error::Result;
    use dreamcrew_core::event::ProjectEvent;
    use dreamcrew_core::persona::PersonaId;
    use dreamcrew_core::project::{Brief, Message, Project, ProjectRepository, ProjectStep};
    use dreamcrew_core::{DreamCrewError, MessageRole};
    use dreamcrew_interaction::{AgentError, GenerationAgent, GenerationRequest};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::mpsc;

    const KICKOFF_REPLIES: &str = r#"[
        {"agentId": "ChiefEditor", "content": "收到，数字沙盘项目我们按展项逻辑推进。"},
        {"agentId": "InteractionTech", "content": "沙盘需要提前确认投影校准和传感器布点。"},
        {"agentId": "Researcher", "content": "简报里的量子比特数量没有给出处，需要补充。"}
    ]"#;

    const DELIVERABLES_PAYLOAD: &str = r#"{
        "strategicPlan": {"coreValues": "自主创新", "narrativeStructure": "三幕式", "logicFlow": "总-分-总"},
        "script": [
            {"sceneNumber": 1, "shotType": "远景", "transition": "淡入", "visual": "沙盘俯瞰",
             "midjourneyPrompt": "aerial sand table", "audio": "序曲", "interaction": "无", "duration": "5s"},
            {"sceneNumber": 2, "shotType": "特写", "transition": "切", "visual": "量子芯片",
             "midjourneyPrompt": "macro quantum chip", "audio": "旁白", "interaction": "触摸高亮", "duration": "8s"}
        ],
        "dataVerification": [
            {"fact": "2024年量子计算市场规模", "source": "McKinsey", "url": "https://example.com/q", "status": "Verified"},
            {"fact": "超导量子比特相干时间", "source": "Nature", "url": "https://example.com/n", "status": "Verified"},
            {"fact": "国内量子专利数量", "source": "WIPO", "url": "https://example.com/w", "status": "Needs Check"}
        ]
    }"#;

    const REFINE_PAYLOAD: &str = r#"{
        "project": {
            "strategicPlan": {"coreValues": "自主创新", "narrativeStructure": "三幕式", "logicFlow": "总-分-总"},
            "script": [
                {"sceneNumber": 1, "shotType": "远景", "transition": "淡入", "visual": "沙盘俯瞰",
                 "midjourneyPrompt": "aerial sand table", "audio": "序曲", "interaction": "无", "duration": "5s"},
                {"sceneNumber": 2, "shotType": "特写", "transition": "切", "visual": "量子芯片夜景",
                 "midjourneyPrompt": "macro quantum chip, night", "audio": "旁白", "interaction": "触摸高亮", "duration": "8s"}
            ],
            "dataVerification": []
        },
        "comment": "已将第2镜调整为夜景氛围。"
    }"#;

    // Scripted GenerationAgent that pops pre-recorded responses and records
    // every request it receives.
    struct ScriptedAgent {
        responses: Mutex<VecDeque<std::result::Result<String, String>>>,
        calls: Mutex<Vec<GenerationRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedAgent {
        fn new(responses: Vec<std::result::Result<String, String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn recorded_prompts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|request| request.prompt.clone())
                .collect()
        }
    }

    #[async_trait]
    impl GenerationAgent for ScriptedAgent {
        async fn execute(&self, request: GenerationRequest) -> std::result::Result<String, AgentError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.calls.lock().unwrap().push(request);
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(AgentError::ExecutionFailed(message)),
                None => Err(AgentError::ExecutionFailed("no scripted response".into())),
            }
        }
    }

    // In-memory ProjectRepository with the same upsert/delete semantics as
    // the JSON store.
    struct InMemoryProjectStore {
        projects: Mutex<Vec<Project>>,
    }

    impl InMemoryProjectStore {
        fn new() -> Self {
            Self {
                projects: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProjectRepository for InMemoryProjectStore {
        async fn list_all(&self) -> Result<Vec<Project>> {
            let mut projects = self.projects.lock().unwrap().clone();
            projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(projects)
        }

        async fn find_by_id(&self, project_id: &str) -> Result<Option<Project>> {
            Ok(self
                .projects
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == project_id)
                .cloned())
        }

        async fn upsert(&self, project: &Project) -> Result<Project> {
            let mut projects = self.projects.lock().unwrap();
            let now = chrono::Utc::now().to_rfc3339();
            let mut stored = project.clone();
            stored.updated_at = now.clone();
            match projects.iter_mut().find(|p| p.id == project.id) {
                Some(existing) => {
                    stored.created_at = existing.created_at.clone();
                    *existing = stored.clone();
                }
                None => {
                    stored.created_at = now;
                    projects.push(stored.clone());
                }
            }
            Ok(stored)
        }

        async fn delete(&self, project_id: &str) -> Result<()> {
            let mut projects = self.projects.lock().unwrap();
            let Some(index) = projects.iter().position(|p| p.id == project_id) else {
                return Err(DreamCrewError::not_found("project", project_id));
            };
            projects.remove(index);
            Ok(())
        }
    }

    fn filled_brief() -> Brief {
        Brief {
            topic: "量子计算科普".to_string(),
            content_details: "从量子比特讲到应用前景".to_string(),
            target_audience: "展馆观众".to_string(),
            key_message: "量子优越性".to_string(),
            ..Brief::default()
        }
    }

    fn sand_table_brief() -> Brief {
        Brief {
            industry: "量子计算 (Quantum Computing)".to_string(),
            usage_format: "数字沙盘 (Digital Sand Table)".to_string(),
            ..filled_brief()
        }
    }

    fn workflow_with_agent(
        agent: Arc<ScriptedAgent>,
    ) -> (
        Arc<ProjectWorkflow>,
        mpsc::UnboundedReceiver<ProjectEvent>,
        Arc<InMemoryProjectStore>,
    ) {
        let store = Arc::new(InMemoryProjectStore::new());
        let (workflow, events) = ProjectWorkflow::new(store.clone(), agent);
        let workflow = Arc::new(workflow.with_reveal_delay(Duration::ZERO));
        (workflow, events, store)
    }

    fn scripted_workflow(
        responses: Vec<std::result::Result<String, String>>,
    ) -> (
        Arc<ProjectWorkflow>,
        mpsc::UnboundedReceiver<ProjectEvent>,
        Arc<InMemoryProjectStore>,
    ) {
        workflow_with_agent(Arc::new(ScriptedAgent::new(responses)))
    }

    fn drain_revealed(events: &mut mpsc::UnboundedReceiver<ProjectEvent>) -> Vec<Message> {
        let mut revealed = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let ProjectEvent::MessageRevealed { message } = event {
                revealed.push(message);
            }
        }
        revealed
    }

    #[tokio::test]
    async fn kickoff_reveals_each_oracle_message_in_order() {
        let (workflow, mut events, _store) =
            scripted_workflow(vec![Ok(KICKOFF_REPLIES.to_string())]);

        let project = workflow.submit_brief(filled_brief()).await.unwrap();
        assert_eq!(project.step, ProjectStep::Discussion);

        let history = &project.discussion_history;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].persona, Some(PersonaId::ChiefEditor));
        assert_eq!(history[1].persona, Some(PersonaId::InteractionTech));
        assert_eq!(history[2].persona, Some(PersonaId::Researcher));
        for pair in history.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }

        let revealed = drain_revealed(&mut events);
        assert_eq!(revealed.len(), 3);
        assert!(!workflow.is_loading());
    }

    #[tokio::test]
    async fn kickoff_error_falls_back_to_single_lead_message() {
        let (workflow, _events, _store) =
            scripted_workflow(vec![Err("oracle unavailable".to_string())]);

        let project = workflow.submit_brief(filled_brief()).await.unwrap();
        assert_eq!(project.step, ProjectStep::Discussion);
        assert_eq!(project.discussion_history.len(), 1);
        let fallback = &project.discussion_history[0];
        assert_eq!(fallback.persona, Some(PersonaId::lead()));
        assert_eq!(fallback.content, KICKOFF_FALLBACK);
    }

    #[tokio::test]
    async fn resubmitting_a_brief_is_rejected_from_discussion() {
        let (workflow, _events, _store) =
            scripted_workflow(vec![Ok(KICKOFF_REPLIES.to_string())]);
        workflow.submit_brief(filled_brief()).await.unwrap();

        let err = workflow.submit_brief(filled_brief()).await.unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[tokio::test]
    async fn sand_table_kickoff_engages_interaction_tech_before_delivery() {
        let agent = Arc::new(ScriptedAgent::new(vec![Ok(KICKOFF_REPLIES.to_string())]));
        let (workflow, _events, _store) = workflow_with_agent(agent.clone());

        let project = workflow.submit_brief(sand_table_brief()).await.unwrap();
        assert!(project.step < ProjectStep::Delivery);
        assert!(
            project
                .discussion_history
                .iter()
                .any(|m| m.persona == Some(PersonaId::InteractionTech))
        );

        let prompts = agent.recorded_prompts();
        assert!(prompts[0].contains("requires special hardware"));
        assert!(prompts[0].contains("量子计算"));
    }

    #[tokio::test]
    async fn empty_utterance_is_stored_as_an_invitation() {
        let replies = r#"[{"agentId": "ExperienceDesigner", "content": "我先抛一个动线方案。"}]"#;
        let (workflow, _events, _store) = scripted_workflow(vec![
            Ok(KICKOFF_REPLIES.to_string()),
            Ok(replies.to_string()),
        ]);
        workflow.submit_brief(filled_brief()).await.unwrap();

        let project = workflow
            .send_discussion_message("", Some(PersonaId::ExperienceDesigner))
            .await
            .unwrap();

        let history = &project.discussion_history;
        assert_eq!(history.len(), 5);
        assert_eq!(history[3].role, MessageRole::User);
        assert_eq!(history[3].content, INVITE_PLACEHOLDER);
        assert_eq!(history[4].persona, Some(PersonaId::ExperienceDesigner));
    }

    #[tokio::test]
    async fn discussion_error_appends_one_targeted_fallback() {
        let (workflow, _events, _store) = scripted_workflow(vec![
            Ok(KICKOFF_REPLIES.to_string()),
            Err("rate limited".to_string()),
        ]);
        workflow.submit_brief(filled_brief()).await.unwrap();

        let project = workflow
            .send_discussion_message("数据部分再细一点", Some(PersonaId::Researcher))
            .await
            .unwrap();

        let history = &project.discussion_history;
        assert_eq!(history.len(), 5); // 3 kickoff + user + fallback
        let fallback = history.last().unwrap();
        assert_eq!(fallback.persona, Some(PersonaId::Researcher));
        assert_eq!(fallback.content, REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn discussion_messages_are_rejected_outside_the_discussion_step() {
        let (workflow, _events, _store) = scripted_workflow(vec![]);
        let err = workflow
            .send_discussion_message("你好", None)
            .await
            .unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[tokio::test]
    async fn reentrant_operations_are_rejected_while_in_flight() {
        let agent = Arc::new(
            ScriptedAgent::new(vec![Ok(KICKOFF_REPLIES.to_string())])
                .with_delay(Duration::from_millis(200)),
        );
        let (workflow, _events, _store) = workflow_with_agent(agent);

        let background = {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.submit_brief(filled_brief()).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(workflow.is_loading());
        let err = workflow
            .send_discussion_message("太快了", None)
            .await
            .unwrap_err();
        assert!(err.is_busy());

        background.await.unwrap().unwrap();
        assert!(!workflow.is_loading());
    }

    #[tokio::test]
    async fn advance_failure_rolls_back_to_discussion() {
        let (workflow, _events, store) = scripted_workflow(vec![
            Ok(KICKOFF_REPLIES.to_string()),
            Err("oracle exploded".to_string()),
        ]);
        workflow.submit_brief(filled_brief()).await.unwrap();
        let history_before = workflow.current_project().await.discussion_history;

        let err = workflow.advance_to_delivery().await.unwrap_err();
        assert!(matches!(err, DreamCrewError::Generation(_)));

        let project = workflow.current_project().await;
        assert_eq!(project.step, ProjectStep::Discussion);
        assert_eq!(project.discussion_history, history_before);
        assert!(project.deliverables.is_none());

        // the rollback is durable, not just in memory
        let stored = store.find_by_id(&project.id).await.unwrap().unwrap();
        assert_eq!(stored.step, ProjectStep::Discussion);
    }

    #[tokio::test]
    async fn advance_success_sets_deliverables_and_appends_notice() {
        let (workflow, _events, _store) = scripted_workflow(vec![
            Ok(KICKOFF_REPLIES.to_string()),
            Ok(DELIVERABLES_PAYLOAD.to_string()),
        ]);
        workflow.submit_brief(filled_brief()).await.unwrap();

        let project = workflow.advance_to_delivery().await.unwrap();
        assert_eq!(project.step, ProjectStep::Delivery);

        let document = project.deliverables.as_ref().unwrap();
        assert_eq!(document.script.len(), 2);
        assert!(document.script.iter().all(|scene| !scene.id.is_empty()));
        assert_ne!(document.script[0].id, document.script[1].id);
        assert_eq!(document.fact_checks.len(), 3);

        let notice = project.discussion_history.last().unwrap();
        assert_eq!(notice.persona, Some(PersonaId::lead()));
        assert!(notice.content.contains("全案策划已生成"));
        assert!(notice.content.contains("约2个镜头"));
    }

    #[tokio::test]
    async fn refine_failure_leaves_the_document_untouched() {
        let (workflow, _events, _store) = scripted_workflow(vec![
            Ok(KICKOFF_REPLIES.to_string()),
            Ok(DELIVERABLES_PAYLOAD.to_string()),
            Err("busy".to_string()),
        ]);
        workflow.submit_brief(filled_brief()).await.unwrap();
        workflow.advance_to_delivery().await.unwrap();
        let document_before = workflow.current_project().await.deliverables.unwrap();
        let history_len = workflow.current_project().await.discussion_history.len();

        let project = workflow
            .send_refine_instruction("第1镜亮一点", PersonaId::ExperienceDesigner)
            .await
            .unwrap();

        assert_eq!(project.deliverables.as_ref().unwrap(), &document_before);
        assert_eq!(project.discussion_history.len(), history_len + 2);
        let fallback = project.discussion_history.last().unwrap();
        assert_eq!(fallback.persona, Some(PersonaId::ExperienceDesigner));
        assert_eq!(fallback.content, REFINE_FALLBACK);
    }

    #[tokio::test]
    async fn refine_success_preserves_untouched_scene_ids() {
        let (workflow, _events, _store) = scripted_workflow(vec![
            Ok(KICKOFF_REPLIES.to_string()),
            Ok(DELIVERABLES_PAYLOAD.to_string()),
            Ok(REFINE_PAYLOAD.to_string()),
        ]);
        workflow.submit_brief(filled_brief()).await.unwrap();
        workflow.advance_to_delivery().await.unwrap();
        let ids_before: Vec<String> = workflow
            .current_project()
            .await
            .deliverables
            .unwrap()
            .script
            .iter()
            .map(|scene| scene.id.clone())
            .collect();

        let project = workflow
            .send_refine_instruction("第2镜改成夜景", PersonaId::ExperienceDesigner)
            .await
            .unwrap();

        let document = project.deliverables.as_ref().unwrap();
        let ids_after: Vec<String> = document.script.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids_after, ids_before);
        assert_eq!(document.script[1].visual, "量子芯片夜景");

        let comment = project.discussion_history.last().unwrap();
        assert_eq!(comment.persona, Some(PersonaId::ExperienceDesigner));
        assert_eq!(comment.content, "已将第2镜调整为夜景氛围。");
    }

    #[tokio::test]
    async fn refine_without_deliverables_fails_fast() {
        let (workflow, _events, _store) = scripted_workflow(vec![]);
        let err = workflow
            .send_refine_instruction("改一下", PersonaId::ChiefEditor)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn manual_edit_replaces_the_document_directly() {
        let (workflow, _events, _store) = scripted_workflow(vec![
            Ok(KICKOFF_REPLIES.to_string()),
            Ok(DELIVERABLES_PAYLOAD.to_string()),
        ]);
        workflow.submit_brief(filled_brief()).await.unwrap();
        workflow.advance_to_delivery().await.unwrap();

        let mut edited = workflow.current_project().await.deliverables.unwrap();
        edited.strategic_plan.core_values = "手动修改".to_string();

        let project = workflow.apply_manual_edit(edited).await.unwrap();
        assert_eq!(
            project.deliverables.unwrap().strategic_plan.core_values,
            "手动修改"
        );
    }

    #[tokio::test]
    async fn deleting_the_active_project_activates_a_fresh_default() {
        let (workflow, _events, store) = scripted_workflow(vec![]);
        let created = workflow.create_new_project().await.unwrap();

        let fresh = workflow.delete_project(&created.id).await.unwrap();
        assert_ne!(fresh.id, created.id);
        assert_eq!(fresh.step, ProjectStep::Brief);
        assert!(fresh.discussion_history.is_empty());

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, fresh.id);
    }

    #[tokio::test]
    async fn create_then_list_returns_exactly_one_project() {
        let (workflow, _events, _store) = scripted_workflow(vec![]);
        let created = workflow.create_new_project().await.unwrap();

        let listed = workflow.list_projects().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn loading_a_missing_project_is_not_found() {
        let (workflow, _events, _store) = scripted_workflow(vec![]);
        let err = workflow.load_project("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
