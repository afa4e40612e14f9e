use std::io::Read;
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, tree_io};
use crate::model::config::EngineConfig;
use crate::model::tree::Tree;
use crate::ops::check;
use crate::parse::parse_script;
use crate::session::engine::Engine;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = config_io::load_config(cli.config.as_deref().map(Path::new), &cwd)?;
    let json = cli.json || config.output.json;

    match cli.command {
        Commands::Sample => cmd_sample(json),
        Commands::Show(args) => cmd_show(args, json),
        Commands::Check(args) => cmd_check(args, &config, json),
        Commands::Counts(args) => cmd_counts(args, json),
        Commands::Replay(args) => cmd_replay(args, config, json),
    }
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_sample(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tree = Tree::sample();
    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", tree_io::tree_to_toml(&tree)?);
    }
    Ok(())
}

fn cmd_show(args: TreeArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tree = tree_io::read_tree(Path::new(&args.tree))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        for line in format_tree(&tree) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_counts(args: TreeArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tree = tree_io::read_tree(Path::new(&args.tree))?;
    let counts = tree.counts();
    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        println!("{}", format_counts(&counts));
    }
    Ok(())
}

fn cmd_check(
    args: TreeArgs,
    config: &EngineConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = tree_io::read_tree(Path::new(&args.tree))?;
    let result = check::check_tree(&tree, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    check::CheckError::DuplicateId { id, kinds } => {
                        let kinds: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
                        println!("  {} is used by: {}", id, kinds.join(", "));
                    }
                    check::CheckError::MissingSentinel { sentinel_id } => {
                        println!("  first process is not the sentinel '{}'", sentinel_id);
                    }
                    check::CheckError::SentinelMisplaced { sentinel_id, index } => {
                        println!("  sentinel '{}' is at index {}, not 0", sentinel_id, index);
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    check::CheckWarning::SentinelHasSubs { count } => {
                        println!("  sentinel holds {} subprocess(es) that can never move", count);
                    }
                    check::CheckWarning::EmptyId { kind, name } => {
                        println!("  {} \"{}\" has an empty id", kind, name);
                    }
                    check::CheckWarning::WhitespaceInId { id } => {
                        println!("  id \"{}\" contains whitespace", id);
                    }
                }
            }
        }
        if result.valid {
            println!("✓ tree is valid");
        } else {
            println!("✗ tree has errors");
        }
    }

    if !result.valid {
        return Err("tree failed validation".into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

fn cmd_replay(
    args: ReplayArgs,
    config: EngineConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = tree_io::read_tree(Path::new(&args.tree))?;
    let script = read_script(&args.script)?;
    let events = parse_script(&script)?;
    let mut engine = Engine::try_new(tree, config)?;

    for (step, event) in events.iter().enumerate() {
        engine.apply(event);
        if args.trace {
            if json {
                let trace = TraceStepJson {
                    step: step + 1,
                    event: event.to_string(),
                    dirty: engine.is_dirty(),
                    working: engine.working_tree(),
                };
                println!("{}", serde_json::to_string(&trace)?);
            } else {
                println!("# {}: {}", step + 1, event);
                for line in format_tree(engine.working_tree()) {
                    println!("{}", line);
                }
                println!();
            }
        }
    }

    if json {
        let out = ReplayJson {
            events: events.len(),
            dirty: engine.is_dirty(),
            working: engine.working_tree(),
            preview: engine.active_preview(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_tree(engine.working_tree()) {
            println!("{}", line);
        }
        println!();
        if let Some(preview) = engine.active_preview() {
            println!("{}", format_preview(preview));
        }
        println!("dirty: {}", if engine.is_dirty() { "yes" } else { "no" });
    }
    Ok(())
}

fn read_script(arg: &str) -> Result<String, Box<dyn std::error::Error>> {
    if arg == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(arg).map_err(|e| format!("could not read {}: {}", arg, e).into())
    }
}
