//! Project store commands: list, show, create, delete.

use anyhow::Result;
use colored::{Color, Colorize};
use dreamcrew_core::persona::PersonaId;
use dreamcrew_core::project::{MessageRole, Project, ProjectRepository};
use dreamcrew_infrastructure::JsonProjectStore;
use std::io::Write;

/// Terminal color for a persona, matching its profile styling token.
fn persona_color(id: PersonaId) -> Color {
    match id {
        PersonaId::ChiefEditor => Color::Magenta,
        PersonaId::ContentDirector => Color::Yellow,
        PersonaId::Researcher => Color::Blue,
        PersonaId::ExperienceDesigner => Color::Green,
        PersonaId::InteractionTech => Color::Red,
    }
}

pub async fn list() -> Result<()> {
    let store = JsonProjectStore::try_default()?;
    let projects = store.list_all().await?;

    if projects.is_empty() {
        println!("没有已保存的项目。用 `dreamcrew new` 创建一个。");
        return Ok(());
    }

    for project in &projects {
        println!(
            "{}  {}  [{} {}]  {}",
            project.id.dimmed(),
            project.name.bold(),
            u8::from(project.step),
            project.step.label(),
            project.updated_at.dimmed(),
        );
    }
    Ok(())
}

pub async fn show(id: &str) -> Result<()> {
    let store = JsonProjectStore::try_default()?;
    let Some(project) = store.find_by_id(id).await? else {
        anyhow::bail!("Project not found: {id}");
    };

    print_project(&project);
    Ok(())
}

pub async fn create() -> Result<()> {
    let store = JsonProjectStore::try_default()?;
    let project = store.upsert(&Project::new()).await?;
    println!("已创建项目 {} ({})", project.name.bold(), project.id.dimmed());
    Ok(())
}

pub async fn delete(id: &str, yes: bool) -> Result<()> {
    if !yes && !confirm("确定删除该项目吗? [y/N] ")? {
        println!("已取消。");
        return Ok(());
    }

    let store = JsonProjectStore::try_default()?;
    store.delete(id).await?;
    println!("已删除项目 {}", id.dimmed());
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_project(project: &Project) {
    println!("{} ({})", project.name.bold(), project.id.dimmed());
    println!(
        "步骤 {} · {}  创建于 {}",
        u8::from(project.step),
        project.step.label(),
        project.created_at.dimmed(),
    );
    println!();
    println!("{}", "简报".bold());
    println!("  行业: {}", project.brief.industry);
    println!("  主题: {}", project.brief.topic);
    println!("  用途: {}", project.brief.usage_format);
    println!("  分镜: {}", project.brief.shot_count);

    if !project.discussion_history.is_empty() {
        println!();
        println!("{}", "团队研讨".bold());
        for message in &project.discussion_history {
            match message.role {
                MessageRole::User => println!("  USER: {}", message.content),
                MessageRole::Crew => {
                    let persona = message.persona.unwrap_or_else(PersonaId::lead);
                    let name = persona.profile().name.color(persona_color(persona));
                    println!("  {}: {}", name, message.content);
                }
            }
        }
    }

    if let Some(deliverables) = &project.deliverables {
        println!();
        println!("{}", "交付全案".bold());
        println!("  核心价值: {}", deliverables.strategic_plan.core_values);
        println!("  分镜数量: {}", deliverables.script.len());
        for scene in &deliverables.script {
            println!(
                "    #{} {} ({}) - {}",
                scene.scene_number,
                scene.shot_type,
                scene.duration,
                scene.visual,
            );
        }
        println!("  数据核实: {} 条", deliverables.fact_checks.len());
        for fact_check in &deliverables.fact_checks {
            let status: String = fact_check.status.into();
            println!(
                "    [{}] {} ({})",
                status,
                fact_check.fact,
                fact_check.source,
            );
        }
    }
}
