use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kinfold",
    about = "Kinfold: family trees with merge and Graphviz export",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./kinfold.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Forest data file, overriding the configured one
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add, edit, remove, or list persons in the current tree
    Person(PersonArgs),
    /// Manage the trees of the forest
    Tree(TreeArgs),
    /// Merge another tree into the current one
    Merge(MergeArgs),
    /// Print a tree as Graphviz DOT
    Dot(DotArgs),
    /// Merge a JSON {"persons": [...]} file into the current tree
    Import(ImportArgs),
}

#[derive(Args)]
pub struct PersonArgs {
    #[command(subcommand)]
    pub action: PersonAction,
}

#[derive(Subcommand)]
pub enum PersonAction {
    /// Add a person; unknown parents get placeholder entries
    Add {
        name: String,
        #[arg(long)]
        mother: Option<String>,
        #[arg(long)]
        father: Option<String>,
        #[arg(long)]
        info: Option<String>,
    },
    /// Edit a person; a new --name is propagated to every child
    Update {
        original: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        mother: Option<String>,
        #[arg(long)]
        father: Option<String>,
        #[arg(long)]
        info: Option<String>,
        #[command(flatten)]
        clear: ClearFields,
    },
    /// Remove a person and clear references to them
    Remove { name: String },
    /// List persons of the current tree
    List,
}

/// Fields `person update` resets to empty.
#[derive(Args, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClearFields {
    #[arg(long, conflicts_with = "mother")]
    pub clear_mother: bool,
    #[arg(long, conflicts_with = "father")]
    pub clear_father: bool,
    #[arg(long, conflicts_with = "info")]
    pub clear_info: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    #[command(subcommand)]
    pub action: TreeAction,
}

#[derive(Subcommand)]
pub enum TreeAction {
    List,
    Create {
        name: String,
        /// Start from a copy of the current tree
        #[arg(long)]
        copy: bool,
    },
    Delete { name: String },
    Rename { old: String, new: String },
    Switch { name: String },
    Stats,
    /// Drop every tree and restore the example family
    Reset,
}

#[derive(Args)]
pub struct MergeArgs {
    pub source: String,
    #[arg(long)]
    pub strategy: Option<String>,
    /// Skip placeholder creation after the merge
    #[arg(long)]
    pub no_update_references: bool,
    /// Store the result as a new tree instead of changing the current one
    #[arg(long)]
    pub into: Option<String>,
}

#[derive(Args)]
pub struct DotArgs {
    #[arg(long)]
    pub tree: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub strategy: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_person_add() {
        let cli = Cli::try_parse_from([
            "kinfold", "person", "add", "John Doe", "--mother", "Jane Doe", "--info", "b. 1990",
        ])
        .unwrap();
        if let Command::Person(PersonArgs {
            action: PersonAction::Add { name, mother, father, info },
        }) = cli.command
        {
            assert_eq!(name, "John Doe");
            assert_eq!(mother, Some("Jane Doe".into()));
            assert_eq!(father, None);
            assert_eq!(info, Some("b. 1990".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_person_update_rename() {
        let cli = Cli::try_parse_from(["kinfold", "person", "update", "Old", "--name", "New"]).unwrap();
        if let Command::Person(PersonArgs {
            action: PersonAction::Update { original, name, .. },
        }) = cli.command
        {
            assert_eq!(original, "Old");
            assert_eq!(name, Some("New".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_person_update_clear_flags() {
        let cli = Cli::try_parse_from([
            "kinfold", "person", "update", "Kid", "--clear-father", "--clear-info",
        ])
        .unwrap();
        if let Command::Person(PersonArgs {
            action: PersonAction::Update { clear, .. },
        }) = cli.command
        {
            assert_eq!(
                clear,
                ClearFields { clear_mother: false, clear_father: true, clear_info: true }
            );
        } else {
            panic!("wrong command");
        }

        assert!(Cli::try_parse_from([
            "kinfold", "person", "update", "Kid", "--mother", "M", "--clear-mother",
        ])
        .is_err());
    }

    #[test]
    fn parse_person_list() {
        let cli = Cli::try_parse_from(["kinfold", "person", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Person(PersonArgs { action: PersonAction::List })
        ));
    }

    #[test]
    fn parse_tree_create_copy() {
        let cli = Cli::try_parse_from(["kinfold", "tree", "create", "Backup", "--copy"]).unwrap();
        if let Command::Tree(TreeArgs {
            action: TreeAction::Create { name, copy },
        }) = cli.command
        {
            assert_eq!(name, "Backup");
            assert!(copy);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_tree_rename() {
        let cli = Cli::try_parse_from(["kinfold", "tree", "rename", "a", "b"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Tree(TreeArgs { action: TreeAction::Rename { .. } })
        ));
    }

    #[test]
    fn parse_merge_flags() {
        let cli = Cli::try_parse_from([
            "kinfold",
            "merge",
            "Other",
            "--strategy",
            "keep-second",
            "--no-update-references",
            "--into",
            "Combined",
        ])
        .unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.source, "Other");
            assert_eq!(args.strategy, Some("keep-second".into()));
            assert!(args.no_update_references);
            assert_eq!(args.into, Some("Combined".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_dot_tree() {
        let cli = Cli::try_parse_from(["kinfold", "dot", "--tree", "Other"]).unwrap();
        if let Command::Dot(args) = cli.command {
            assert_eq!(args.tree, Some("Other".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_import() {
        let cli = Cli::try_parse_from(["kinfold", "import", "family.json"]).unwrap();
        if let Command::Import(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("family.json"));
            assert_eq!(args.strategy, None);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kinfold", "tree", "list", "--data", "/tmp/f.json", "--format", "json", "-v",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/f.json")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["kinfold"]).is_err());
        assert!(Cli::try_parse_from(["kinfold", "tree"]).is_err());
    }
}
