use anyhow::{Context, Result};
use clap::Parser;

use bindform::binding::{read, Compiler};
use bindform::cli::CliArgs;
use bindform::config::CompilerConfig;
use bindform::output;

fn main() -> Result<()> {
    bindform::tracing::init();

    let args = CliArgs::parse();

    let file_config = match &args.config {
        Some(path) => CompilerConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CompilerConfig::load(),
    };

    let run = args.into_config(&file_config);
    let compiler = Compiler::new(file_config.registry()?, run.compile);

    let source = run
        .input
        .read_to_string()
        .with_context(|| format!("Failed to read {}", run.input))?;
    let elements = read(&source).with_context(|| format!("Failed to parse {}", run.input))?;

    let batches = compiler.compile(&elements).with_context(|| {
        format!("Failed to compile {} ({} elements)", run.input, elements.len())
    })?;
    tracing::info!("Compiled {} batches from {}", batches.len(), run.input);

    let rendered = if run.bind {
        output::render_bind_calls(&batches)
    } else {
        output::render(&batches, run.format)?
    };
    print!("{}", rendered);

    Ok(())
}
