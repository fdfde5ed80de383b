//! `storyloom chapter` — Generate the next chapter.

use storyloom_config::AppConfig;

use crate::commands::build_writer;
use crate::project::Project;

pub async fn run(
    project_path: &str,
    instruction: &str,
    out: Option<&str>,
    no_summary: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let mut project = Project::load(project_path)?;
    let writer = build_writer(&config)?;

    let chapter_index = project.kb.next_chapter_index();
    eprintln!("  Generating chapter {}...", chapter_index + 1);

    let content = writer
        .generate_chapter(&project.kb, chapter_index, instruction)
        .await?;

    match out {
        Some(path) => {
            std::fs::write(path, &content.body)?;
            println!("  Wrote \"{}\" to {path}", content.title);
        }
        None => {
            println!("\n# {}\n", content.title);
            println!("{}", content.body);
        }
    }

    if no_summary {
        return Ok(());
    }

    eprintln!("  Summarizing for future chapters...");
    let index = writer
        .summarize_chapter(&mut project.kb, &content.title, &content.body)
        .await?;
    project.save()?;
    eprintln!("  Chapter {} recorded in {}", index + 1, project.path().display());

    Ok(())
}
