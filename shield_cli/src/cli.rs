use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shield_core::catalog::{Material, TableVariant, WallPosition};

#[derive(Debug, Parser)]
#[command(name = "shield", version, about = "NCRP 147 barrier thickness calculator")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate one barrier request
    Evaluate(EvaluateArgs),
    /// List every option a request can take
    Options,
    /// Print a tabulated thickness column
    Table(TableArgs),
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    #[arg(long, help = "Request JSON file")]
    pub request: PathBuf,

    #[arg(long, help = "Engine settings JSON file")]
    pub settings: Option<PathBuf>,

    #[arg(long, help = "Catalog TOML file replacing the built-in NCRP 147 data")]
    pub catalog: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Print the result as JSON")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TableArgs {
    #[arg(long, value_enum)]
    pub material: MaterialArg,

    #[arg(long, value_enum, default_value_t = VariantArg::Primary)]
    pub variant: VariantArg,

    #[arg(long, value_enum, default_value_t = WallArg::Floor)]
    pub wall: WallArg,

    #[arg(long, help = "Catalog TOML file replacing the built-in NCRP 147 data")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MaterialArg {
    Lead,
    Concrete,
}

impl From<MaterialArg> for Material {
    fn from(arg: MaterialArg) -> Self {
        match arg {
            MaterialArg::Lead => Material::Lead,
            MaterialArg::Concrete => Material::Concrete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Primary,
    PrimaryPreshielded,
    Secondary,
}

impl From<VariantArg> for TableVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Primary => TableVariant::Primary,
            VariantArg::PrimaryPreshielded => TableVariant::PrimaryPreshielded,
            VariantArg::Secondary => TableVariant::Secondary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WallArg {
    ChestBucky,
    Floor,
    CrossTableLateral,
    OppositeChestBucky,
}

impl From<WallArg> for WallPosition {
    fn from(arg: WallArg) -> Self {
        match arg {
            WallArg::ChestBucky => WallPosition::ChestBucky,
            WallArg::Floor => WallPosition::Floor,
            WallArg::CrossTableLateral => WallPosition::CrossTableLateral,
            WallArg::OppositeChestBucky => WallPosition::OppositeChestBucky,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_parses_paths_and_flags() {
        let cli = Cli::parse_from(["shield", "evaluate", "--request", "wall.json", "--json"]);
        match cli.command {
            Commands::Evaluate(args) => {
                assert_eq!(args.request, PathBuf::from("wall.json"));
                assert!(args.json);
                assert!(args.settings.is_none());
            }
            _ => panic!("expected evaluate command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn table_defaults_to_primary_floor() {
        let cli = Cli::parse_from(["shield", "table", "--material", "concrete"]);
        match cli.command {
            Commands::Table(args) => {
                assert_eq!(Material::from(args.material), Material::Concrete);
                assert_eq!(TableVariant::from(args.variant), TableVariant::Primary);
                assert_eq!(WallPosition::from(args.wall), WallPosition::Floor);
            }
            _ => panic!("expected table command"),
        }
    }

    #[test]
    fn table_accepts_kebab_case_values() {
        let cli = Cli::parse_from([
            "shield",
            "-v",
            "table",
            "--material",
            "lead",
            "--variant",
            "primary-preshielded",
            "--wall",
            "cross-table-lateral",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Table(args) => {
                assert_eq!(args.variant, VariantArg::PrimaryPreshielded);
                assert_eq!(args.wall, WallArg::CrossTableLateral);
            }
            _ => panic!("expected table command"),
        }
    }
}
