//! Resolve command handler

use super::read_input;
use crate::cli::ResolveArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::{OutputFormatter, OutputWriter};
use specref_core::loader::looks_like_yaml;
use specref_core::{Format, ParseOptions, SpecLoader};
use std::path::Path;
use tracing::{info, instrument};

/// Format named by the file extension, or guessed from the content
fn detect_format(path: &Path, data: &[u8]) -> Format {
    Format::from_path(path).unwrap_or_else(|| {
        if looks_like_yaml(data) {
            Format::Yaml
        } else {
            Format::Json
        }
    })
}

/// Handle the resolve command
#[instrument(skip(config, output), fields(file = %args.file.display()))]
pub fn handle_resolve(args: ResolveArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("resolve_command", &args.file.display().to_string());
    output.info(&format!("Resolving references in {}", args.file.display()))?;

    let data = read_input(&args.file)?;
    output.info(&format!("Detected {:?} input", detect_format(&args.file, &data)))?;

    let options = ParseOptions {
        file_path: Some(args.file.clone()),
        base_dir: args.base_dir.clone(),
    };

    let loader = SpecLoader::with_config(config.resolver_for(&args));
    let loaded = loader.load_bytes(&data, &options)?;
    info!(
        references = loaded.references.len(),
        format = ?loaded.format,
        "Resolution finished"
    );

    match &args.save_to {
        Some(path) => {
            let content = output.format().format_document(&loaded.content, loaded.format)?;
            std::fs::write(path, content)?;
            output.success(&format!(
                "Resolved {} reference(s), saved to {}",
                loaded.references.len(),
                path.display()
            ))?;
        }
        None => output.document(&loaded.content, loaded.format)?,
    }

    Ok(())
}
