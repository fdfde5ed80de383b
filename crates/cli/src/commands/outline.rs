//! `storyloom outline` — Generate an outline from a story idea.

use storyloom_config::AppConfig;
use storyloom_context::validate_outline;

use crate::commands::build_writer;
use crate::project::Project;

pub async fn run(
    project_path: &str,
    description: &str,
    style: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let mut project = Project::load(project_path)?;
    let writer = build_writer(&config)?;

    eprintln!("  Generating outline...");
    let outline = writer.generate_outline(description, style).await?;

    println!("\n{}\n", outline.premise);

    let report = validate_outline(Some(&outline));
    if !report.valid {
        for issue in &report.issues {
            eprintln!("  Note: {issue}");
        }
        eprintln!("  Refine the outline in {} before generating chapters.", project_path);
    }

    project.kb.set_outline(outline);
    project.save()?;
    println!("  Outline saved to {}", project.path().display());

    Ok(())
}
