//! # Shield CLI
//!
//! Command-line front end for `shield_core`: evaluates barrier requests
//! stored as JSON, lists the option sets a request can use and prints the
//! tabulated thickness columns.

mod cli;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shield_core::calculations::{CalculationRequest, CalculationResult};
use shield_core::catalog::{
    self, BarrierClass, Catalog, CtVoltage, ImagingCategory, Material, Modality, PreshieldingCategory,
    SecondaryKermaComponent, TableId, TableVariant, WallPosition,
};
use shield_core::settings::{self, EngineSettings, PreshieldCorrection};
use shield_core::{Engine, ShieldError};

use cli::{Cli, Commands, EvaluateArgs, TableArgs};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "shield_cli=debug,shield_core=debug"
    } else {
        "shield_cli=info,shield_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(cli) {
        eprintln!("Error: {:#}", error);
        if let Some(diagnostic) = error.downcast_ref::<ShieldError>() {
            if let Ok(json) = serde_json::to_string_pretty(diagnostic) {
                eprintln!("{}", json);
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Evaluate(args) => evaluate(&args),
        Commands::Options => {
            print_options();
            Ok(())
        }
        Commands::Table(args) => print_table(&args),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => catalog::load_catalog(path).with_context(|| format!("loading catalog {}", path.display())),
        None => Ok(catalog::builtin().clone()),
    }
}

fn evaluate(args: &EvaluateArgs) -> Result<()> {
    let text = fs::read_to_string(&args.request)
        .with_context(|| format!("reading request {}", args.request.display()))?;
    let request: CalculationRequest = serde_json::from_str(&text)
        .map_err(|e| ShieldError::SerializationError {
            reason: format!("Invalid request JSON in {}: {}", args.request.display(), e),
        })?;

    let settings = match &args.settings {
        Some(path) => settings::load_settings(path)?,
        None => EngineSettings::default(),
    };
    let catalog = load_catalog(args.catalog.as_deref())?;

    tracing::info!(label = %request.label, catalog = %catalog.version, "evaluating barrier");
    let engine = Engine::new(&catalog, settings)?;
    let result = engine.evaluate(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &CalculationResult) {
    println!("═══════════════════════════════════════");
    println!("  BARRIER: {}", if result.label.is_empty() { "(unlabelled)" } else { result.label.as_str() });
    println!("═══════════════════════════════════════");
    println!();
    println!("Case:      {}", result.case);
    println!("Barrier:   {}", result.barrier.display_name());
    println!("Material:  {}", result.material.display_name());
    println!("Outcome:   {}", result.outcome.display_name());
    if let Some(reason) = result.outcome.reason() {
        println!("           {}", reason);
    }
    println!();
    println!("Required thickness: {:.2} mm", result.thickness_mm);
    if let Some(rate) = result.kerma_rate {
        println!("  Unshielded kerma: {:.4} mGy/wk", rate);
    }
    if let Some(b) = result.transmission {
        println!("  Transmission B:   {:.4e}", b);
    }
    if let (Some(b), Some(b_net)) = (result.transmission, result.net_transmission) {
        if b_net != b {
            println!("  Net B (pre-shielding credited): {:.4e}", b_net);
        }
    }
    if let Some(n) = result.attenuation_lengths {
        println!("  Attenuation lengths n: {:.3}", n);
    }

    if !result.components.is_empty() {
        println!();
        println!("Secondary components:");
        for c in &result.components {
            println!("  {:<32} {:>8.2} mm", c.component.display_name(), c.thickness_mm);
        }
    }

    if !result.flags.is_empty() {
        println!();
        println!("Flags:");
        for flag in &result.flags {
            println!("  ⚠ {}", flag.description());
        }
    }

    println!();
    println!("Derivation:");
    for entry in result.trail.iter() {
        println!("  {}", entry);
    }
}

fn print_options() {
    println!("Imaging cases:");
    for category in [
        ImagingCategory::StandardRoom,
        ImagingCategory::Specialized,
        ImagingCategory::ComputedTomography,
        ImagingCategory::Tabulated,
    ] {
        println!("  {}", category.display_name());
    }

    println!();
    println!("Modalities:");
    for modality in Modality::ALL {
        println!("  {:<26} {} ({})", modality.key(), modality.display_name(), modality.category());
    }

    println!();
    println!("CT voltages:");
    for voltage in CtVoltage::ALL {
        println!("  {:<26} {}", voltage.key(), voltage.display_name());
    }

    println!();
    println!("Materials:");
    for material in Material::ALL {
        println!("  {}", material.display_name());
    }

    println!();
    println!("Barrier classes:");
    for barrier in BarrierClass::ALL {
        println!("  {}", barrier.display_name());
    }

    println!();
    println!("Wall positions (tabulated):");
    for wall in WallPosition::ALL {
        println!("  {:<26} {}", wall.key(), wall.display_name());
    }

    println!();
    println!("Pre-shielding:");
    for category in PreshieldingCategory::ALL {
        println!("  {}", category.display_name());
    }
    println!("  Custom thickness (mm)");

    println!();
    println!("Settings:");
    for correction in PreshieldCorrection::ALL {
        println!("  preshield_correction: {}", correction.display_name());
    }
    for component in SecondaryKermaComponent::ALL {
        println!("  secondary_component:  {}", component.display_name());
    }
}

fn print_table(args: &TableArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let id = TableId {
        material: args.material.into(),
        variant: args.variant.into(),
    };
    let wall: WallPosition = args.wall.into();
    let barrier = match id.variant {
        TableVariant::Secondary => BarrierClass::Secondary,
        _ => BarrierClass::Primary,
    };
    let column = wall.tabulated_column(barrier);
    if column != wall {
        tracing::info!(wall = wall.key(), column = column.key(), "no column of its own, using floor column");
    }
    let table = catalog.table(id, column)?;

    println!("Table {} (kerma from {})", table.identifier(), table.kerma_source.display_name());
    println!("   n   thickness (mm)");
    for (n, mm) in table.thickness_mm.iter().enumerate() {
        println!("  {:>2}   {:>10.3}", n, mm);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo(text: &str) -> CalculationResult {
        let request: CalculationRequest = serde_json::from_str(text).unwrap();
        Engine::default().evaluate(&request).unwrap()
    }

    #[test]
    fn demo_requests_evaluate() {
        let primary = demo(include_str!("../../demos/rad_room_floor_primary.json"));
        assert!(primary.outcome.is_computed());
        assert!(primary.thickness_mm > 0.0 && primary.thickness_mm < 1.3167);

        let ct = demo(include_str!("../../demos/ct_control_booth.json"));
        assert!(ct.outcome.is_computed());
        assert_eq!(ct.material, Material::Concrete);

        let table = demo(include_str!("../../demos/chest_bucky_table.json"));
        assert!(table.attenuation_lengths.is_some());
    }

    #[test]
    fn demo_settings_parse() {
        let settings =
            EngineSettings::from_json_str(include_str!("../../demos/thickness_subtraction_settings.json")).unwrap();
        assert_eq!(settings.preshield_correction, PreshieldCorrection::ThicknessSubtraction);
    }
}
