use clap::Parser;
use rulestack::batch;
use rulestack::cli::{def_file, format, Cli, Commands, OutputFormat};
use rulestack::presets;
use rulestack::registry::Registry;
use rulestack::resolve::Resolver;
use std::error::Error;
use std::path::Path;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("\x1b[31merror\x1b[0m: {}", e);
        process::exit(2);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Resolve {
            paths,
            layer,
            config,
            root,
            format: output,
        } => {
            let registry = load_registry(config.as_deref())?;

            // A single explicit file gets its full table; anything else is
            // summarized per file.
            if paths.len() == 1 && paths[0].is_file() {
                let resolver = Resolver::new(&registry, root);
                let table = resolver.resolve(&layer, &paths[0])?;
                let path = paths[0].display().to_string();
                match output {
                    OutputFormat::Pretty => format::print_table_pretty(&layer, &path, &table),
                    OutputFormat::Json => format::print_table_json(&layer, &path, &table),
                }
            } else {
                let result = batch::run_batch(&registry, &layer, &paths, &root)?;
                match output {
                    OutputFormat::Pretty => format::print_batch_pretty(&result),
                    OutputFormat::Json => format::print_batch_json(&result),
                }
            }
        }

        Commands::Explain {
            path,
            layer,
            config,
            root,
        } => {
            let registry = load_registry(config.as_deref())?;
            let resolver = Resolver::new(&registry, root);
            let resolution = resolver.resolve_traced(&layer, &path)?;
            format::print_resolution_pretty(&layer, &path.display().to_string(), &resolution);
        }

        Commands::Layers {
            config,
            format: output,
        } => {
            let registry = load_registry(config.as_deref())?;
            match output {
                OutputFormat::Pretty => format::print_layers_pretty(&registry),
                OutputFormat::Json => format::print_layers_json(&registry),
            }
        }
    }

    Ok(())
}

fn load_registry(config: Option<&Path>) -> Result<Registry, Box<dyn Error>> {
    let defs = match config {
        Some(path) => def_file::load_defs(path)?,
        None => presets::builtin_defs(),
    };
    Ok(Registry::build(defs)?)
}
