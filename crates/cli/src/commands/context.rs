//! `storyloom context` — Show the composed context for a chapter.
//!
//! Useful for checking what the model will actually see before paying for a
//! generation.

use storyloom_config::AppConfig;
use storyloom_context::{estimate_tokens, ContextBuilder};

use crate::project::Project;

pub async fn run(
    project_path: &str,
    index: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let project = Project::load(project_path)?;

    let chapter_index = index.unwrap_or_else(|| project.kb.next_chapter_index());
    let builder = ContextBuilder::new(config.context.token_budget, config.context.core_ratio);
    let ctx = builder.build(&project.kb, chapter_index);

    println!("Context for chapter {} (budget {} tokens)", chapter_index + 1, ctx.token_budget);
    println!("===================================================\n");

    println!(
        "--- Core ({} tokens) ---",
        estimate_tokens(&ctx.core_context)
    );
    println!("{}\n", ctx.core_context);

    println!(
        "--- Dynamic ({} tokens) ---",
        estimate_tokens(&ctx.dynamic_context)
    );
    if ctx.dynamic_context.is_empty() {
        println!("(no prior chapters)\n");
    } else {
        println!("{}\n", ctx.dynamic_context);
    }

    println!("Remaining for generation: {} tokens", ctx.remaining_tokens);

    Ok(())
}
