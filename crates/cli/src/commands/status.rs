//! `storyloom status` — Show project status.

use crate::project::Project;

pub async fn run(project_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::load(project_path)?;
    let kb = &project.kb;

    println!("Project: {}", project.path().display());
    println!("==================\n");

    match &kb.outline {
        Some(outline) => {
            println!("  Title:      {}", outline.title);
            println!("  Genre:      {}", outline.genre);
        }
        None => println!("  No outline yet — run `storyloom outline`"),
    }

    println!("  Characters: {}", kb.characters.len());
    println!("  Chapters:   {}", kb.chapter_summaries.len());

    if let Some(last) = kb.chapter_summaries.last() {
        println!("\n  Latest chapter: \"{}\"", last.title);
        println!("  {}", last.summary);
    }

    if let Some(updated) = kb.updated_at {
        println!("\n  Last updated: {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }

    Ok(())
}
