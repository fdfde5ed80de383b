//! `storyloom init` — Initialize configuration and a new project file.

use storyloom_config::AppConfig;

use crate::project::Project;

pub async fn run(project_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Storyloom — Setup");
    println!("==================\n");

    // Config file
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        println!("  Config already exists: {}", config_path.display());
    } else {
        std::fs::create_dir_all(&config_dir)?;
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("  Created config: {}", config_path.display());
    }

    // Project file
    let project = Project::create(project_path)?;
    println!("  Created project: {}", project.path().display());

    println!();
    println!("  Next steps:");
    println!("    1. Set your API key: export DEEPSEEK_API_KEY=sk-...");
    println!("    2. Generate an outline: storyloom outline \"your story idea\"");
    println!("    3. Write the first chapter: storyloom chapter \"Chapter One: ...\"");

    Ok(())
}
