use reggen_core::config::loader::{ConfigLoader, default_config_path};
use reggen_core::Section;
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            println!("OK   rgen doctor");
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            match &rc.responses_dir {
                Some(dir) => println!("responses_dir: {}", dir.display()),
                None => println!("responses_dir: (built-in)"),
            }
            println!("fallback_anchor: {}", rc.fallback_anchor);
            println!("latency_ms: {}", rc.latency_ms);
            for section in Section::all() {
                let source = if rc.prompts.contains_key(&section) { "config" } else { "built-in" };
                println!("prompt.{section}: {source}");
            }
            println!("logging.level: {}", rc.logging.level);
            if let Some(file) = &rc.logging.file {
                println!("logging.file: {}", file.display());
            }

            let missing: Vec<_> = match &rc.responses_dir {
                Some(dir) => Section::all()
                    .into_iter()
                    .filter(|s| !dir.join(format!("{s}.txt")).exists())
                    .collect(),
                None => Vec::new(),
            };
            if !missing.is_empty() {
                let names: Vec<_> = missing.iter().map(|s| s.as_str()).collect();
                println!("warning: no canned response for: {}", names.join(", "));
            }
        }
        Err(e) => {
            println!("FAIL rgen doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
