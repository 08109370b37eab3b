use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use kin_sdk::{
    ConflictField, ConflictRecord, FileForestStore, ForestStore, Kinfold, MergeOptions, MergeStats,
    MergeStrategy, Person, PersonFields, TreeSeed,
};

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let data_file = cli.data.unwrap_or_else(|| config.data_file.clone());
    let store = FileForestStore::open_with_config(&data_file, config.forest_config())
        .with_context(|| format!("open forest {}", data_file.display()))?;
    let mut session = Kinfold::open(store)?;
    debug!(data = %data_file.display(), tree = session.tree_name(), "session ready");
    execute(cli.command, &mut session, &config, cli.format)
}

pub fn execute<S: ForestStore>(
    command: Command,
    session: &mut Kinfold<S>,
    config: &CliConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let out = Output { format };
    match command {
        Command::Person(args) => cmd_person(args.action, session, out),
        Command::Tree(args) => cmd_tree(args.action, session, out),
        Command::Merge(args) => cmd_merge(args, session, config, out),
        Command::Dot(args) => cmd_dot(args, session, out),
        Command::Import(args) => cmd_import(args, session, config, out),
    }
}

#[derive(Clone, Copy)]
struct Output {
    format: OutputFormat,
}

impl Output {
    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn emit(&self, value: &impl Serialize) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn cmd_person<S: ForestStore>(
    action: PersonAction,
    session: &mut Kinfold<S>,
    out: Output,
) -> anyhow::Result<()> {
    match action {
        PersonAction::Add { name, mother, father, info } => {
            session.add_person(Person { name: name.clone(), mother, father, info })?;
            report_change(session, out, &format!("Added {}", name.bold()))
        }
        PersonAction::Update { original, name, mother, father, info, clear } => {
            let existing = session.registry().get(&original).cloned().unwrap_or_default();
            let updated = Person {
                name: name.unwrap_or_else(|| original.clone()),
                mother: edited(mother, clear.clear_mother, existing.mother),
                father: edited(father, clear.clear_father, existing.father),
                info: edited(info, clear.clear_info, existing.info),
            };
            let message = if updated.name == original {
                format!("Updated {}", original.bold())
            } else {
                format!("Renamed {} → {}", original.bold(), updated.name.bold())
            };
            session.update_person(&original, updated)?;
            report_change(session, out, &message)
        }
        PersonAction::Remove { name } => {
            if !session.remove_person(&name)? {
                bail!("no person named {name:?} in tree {:?}", session.tree_name());
            }
            report_change(session, out, &format!("Removed {}", name.bold()))
        }
        PersonAction::List => {
            if out.json() {
                return out.emit(&session.persons());
            }
            println!("Tree {} ({} persons)", session.tree_name().yellow().bold(), session.persons().len());
            for person in session.persons() {
                print_person(person);
            }
            Ok(())
        }
    }
}

/// New value of an edited field: cleared, replaced, or kept.
fn edited(given: Option<String>, clear: bool, current: Option<String>) -> Option<String> {
    if clear {
        None
    } else {
        given.or(current)
    }
}

fn report_change<S: ForestStore>(session: &Kinfold<S>, out: Output, message: &str) -> anyhow::Result<()> {
    if out.json() {
        return out.emit(&session.snapshot()?);
    }
    println!(
        "{} {} in {} ({} persons)",
        "✓".green(),
        message,
        session.tree_name().yellow(),
        session.registry().len()
    );
    Ok(())
}

fn print_person(person: &Person) {
    if person.is_placeholder() {
        println!("  {}", person.name.dimmed());
        return;
    }
    let mut line = format!("  {}", person.name.bold());
    let parents: Vec<String> = [("mother", person.mother_name()), ("father", person.father_name())]
        .into_iter()
        .filter_map(|(role, name)| name.map(|n| format!("{role}: {n}")))
        .collect();
    if !parents.is_empty() {
        line.push_str(&format!("  ({})", parents.join(", ")));
    }
    if let Some(info) = person.info_text() {
        line.push_str(&format!("  {}", info.cyan()));
    }
    println!("{line}");
}

fn cmd_tree<S: ForestStore>(action: TreeAction, session: &mut Kinfold<S>, out: Output) -> anyhow::Result<()> {
    match action {
        TreeAction::List => {
            let names = session.tree_names()?;
            if out.json() {
                return out.emit(&json!({ "active": session.tree_name(), "trees": names }));
            }
            for name in names {
                if name == session.tree_name() {
                    println!("* {}", name.green().bold());
                } else {
                    println!("  {name}");
                }
            }
            Ok(())
        }
        TreeAction::Create { name, copy } => {
            let seed = if copy { TreeSeed::CopyCurrent } else { TreeSeed::Empty };
            let name = session.create_tree(&name, seed)?;
            tree_done(session, out, &format!("Created tree {}", name.yellow()))
        }
        TreeAction::Delete { name } => {
            session.delete_tree(&name)?;
            tree_done(session, out, &format!("Deleted tree {}", name.yellow()))
        }
        TreeAction::Rename { old, new } => {
            let new = session.rename_tree(&old, &new)?;
            tree_done(session, out, &format!("Renamed tree {} → {}", old.yellow(), new.yellow()))
        }
        TreeAction::Switch { name } => {
            if !session.switch_to_tree(&name)? {
                bail!("tree not found: {name}");
            }
            tree_done(session, out, &format!("Switched to {}", name.yellow().bold()))
        }
        TreeAction::Stats => {
            let stats = session.stats()?;
            if out.json() {
                return out.emit(&stats);
            }
            println!(
                "{} trees, {} persons, active: {}",
                stats.tree_count.to_string().bold(),
                stats.total_persons.to_string().bold(),
                stats.active_tree.yellow()
            );
            for (name, tree) in &stats.trees {
                let marker = if tree.is_active { "*" } else { " " };
                println!("{marker} {name}: {} persons", tree.person_count);
            }
            Ok(())
        }
        TreeAction::Reset => {
            session.reset_forest()?;
            tree_done(session, out, "Reset forest to the example family")
        }
    }
}

fn tree_done<S: ForestStore>(session: &Kinfold<S>, out: Output, message: &str) -> anyhow::Result<()> {
    if out.json() {
        return out.emit(&session.snapshot()?);
    }
    println!("{} {}", "✓".green(), message);
    Ok(())
}

fn merge_options(
    config: &CliConfig,
    strategy: Option<String>,
    skip_closure: bool,
) -> anyhow::Result<MergeOptions> {
    let strategy = strategy.unwrap_or_else(|| config.merge_strategy.clone());
    strategy.parse::<MergeStrategy>()?;
    Ok(MergeOptions {
        strategy,
        update_references: config.update_references && !skip_closure,
    })
}

fn cmd_merge<S: ForestStore>(
    args: MergeArgs,
    session: &mut Kinfold<S>,
    config: &CliConfig,
    out: Output,
) -> anyhow::Result<()> {
    let options = merge_options(config, args.strategy, args.no_update_references)?;
    match args.into {
        Some(new_name) => {
            let (name, stats) = session.merge_into_new_tree(&new_name, &args.source, &options)?;
            print_merge(out, &format!("{} + {} → {}", session.tree_name(), args.source, name), &options, &stats)
        }
        None => {
            let stats = session.merge_from_tree(&args.source, &options)?;
            print_merge(out, &format!("{} → {}", args.source, session.tree_name()), &options, &stats)
        }
    }
}

fn cmd_import<S: ForestStore>(
    args: ImportArgs,
    session: &mut Kinfold<S>,
    config: &CliConfig,
    out: Output,
) -> anyhow::Result<()> {
    let options = merge_options(config, args.strategy, false)?;
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    let payload: Value =
        serde_json::from_str(&text).with_context(|| format!("parse {}", args.file.display()))?;
    let stats = session.merge_payload(&payload, &options)?;
    let label = format!("{} → {}", args.file.display(), session.tree_name());
    print_merge(out, &label, &options, &stats)
}

fn print_merge(out: Output, label: &str, options: &MergeOptions, stats: &MergeStats) -> anyhow::Result<()> {
    if out.json() {
        return out.emit(stats);
    }
    println!(
        "{} Merged {} ({}): {} merged, {} added",
        "✓".green(),
        label.bold(),
        options.strategy.cyan(),
        stats.merged,
        stats.added
    );
    for record in &stats.conflicts {
        match record {
            ConflictRecord::Field { name, existing, incoming, resolved, fields } => {
                for field in fields {
                    println!(
                        "  {} {}.{}: {:?} vs {:?}, kept {:?}",
                        "conflict".yellow(),
                        name,
                        field,
                        field_value(existing, *field),
                        field_value(incoming, *field),
                        field_value(resolved, *field)
                    );
                }
            }
            ConflictRecord::Failed { name, error } => {
                println!("  {} {}: {}", "✗".red(), name, error);
            }
        }
    }
    if !options.update_references {
        println!("  {} placeholders were not created", "note:".dimmed());
    }
    Ok(())
}

fn field_value(fields: &PersonFields, field: ConflictField) -> &str {
    let value = match field {
        ConflictField::Mother => &fields.mother,
        ConflictField::Father => &fields.father,
        ConflictField::Info => &fields.info,
    };
    value.as_deref().unwrap_or("")
}

fn cmd_dot<S: ForestStore>(args: DotArgs, session: &Kinfold<S>, out: Output) -> anyhow::Result<()> {
    let (tree, dot) = match args.tree {
        Some(name) => {
            let dot = session.dot_for_tree(&name)?;
            (name, dot)
        }
        None => (session.tree_name().to_string(), session.dot()),
    };
    if out.json() {
        return out.emit(&json!({ "tree": tree, "dot": dot }));
    }
    println!("{dot}");
    Ok(())
}
