//! `storyloom doctor` — Diagnose setup health.

use storyloom_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Storyloom Doctor — Setup Diagnostics");
    println!("====================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  OK   Config file valid");

                if config.has_api_key() {
                    println!("  OK   API key configured");
                } else {
                    println!("  WARN No API key — set DEEPSEEK_API_KEY or add api_key to config.toml");
                    issues += 1;
                }
            }
            Err(e) => {
                println!("  FAIL Config file invalid: {e}");
                issues += 1;
            }
        }
    } else {
        // Environment variables alone are enough to run
        match AppConfig::load() {
            Ok(config) if config.has_api_key() => {
                println!("  OK   No config file, API key found in environment");
            }
            _ => {
                println!("  WARN No config file — run `storyloom init`");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
