//! # Equation Registry
//!
//! Central registry of the shielding relations used by the engine. Each
//! equation carries its formula, NCRP 147 reference, variables and the
//! function that implements it, so every value in a derivation trail can be
//! traced back to a published relation.
//!
//! ## Usage
//!
//! ```rust
//! use shield_core::equations::registry::Equation;
//!
//! let meta = Equation::RequiredTransmission.metadata();
//! assert_eq!(meta.formula_plain, "B = P / (K · T)");
//! println!("{}", meta.reference.citation());
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Code References
// ============================================================================

/// Published source of an equation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// NCRP Report No. 147, Structural Shielding Design for Medical X-Ray Imaging Facilities
    Ncrp147 { section: &'static str },
    /// Archer, Thornby and Bushong (1983), broad-beam transmission model
    Archer1983,
    /// Plain arithmetic (interpolation, subtraction)
    Arithmetic,
}

impl CodeReference {
    /// Format the reference for display
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Ncrp147 { section } => format!("NCRP Report 147, {}", section),
            CodeReference::Archer1983 => "Archer et al., Health Phys. 44 (1983)".to_string(),
            CodeReference::Arithmetic => "Arithmetic".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::Ncrp147 { .. } => "NCRP 147",
            CodeReference::Archer1983 => "Archer",
            CodeReference::Arithmetic => "Arithmetic",
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Groups of equations, in calculation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Unshielded kerma at the barrier
    IncidentKerma,
    /// Required transmission factor
    Transmission,
    /// Barrier thickness from transmission
    Thickness,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::IncidentKerma => "Incident Kerma",
            EquationCategory::Transmission => "Transmission",
            EquationCategory::Thickness => "Thickness",
        }
    }

    /// Sort order (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::IncidentKerma => 1,
            EquationCategory::Transmission => 2,
            EquationCategory::Thickness => 3,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for one equation
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    pub name: &'static str,
    pub description: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    pub reference: CodeReference,
    pub variables: Vec<Variable>,
    pub assumptions: Vec<&'static str>,
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function name implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All shielding equations used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    /// K = K1 · U · N / d²
    IncidentKerma,
    /// K1' = K1 · W_site / W_norm
    WorkloadScaling,
    /// K1sec(head) = κ_head · DLP_head · Kc
    CtHeadKerma,
    /// K1sec(body) = 1.2 · κ_body · DLP_body · Kc
    CtBodyKerma,
    /// K = (K1sec(head)·N_head + K1sec(body)·N_body) / d²
    CtWeeklyKerma,
    /// B = P / (K · T)
    RequiredTransmission,
    /// B_net = B / B(x_pre)
    PreshieldSplit,
    /// B(x) = [(1 + β/α)·e^(αγx) − β/α]^(−1/γ)
    ArcherTransmission,
    /// x = ln[(B^−γ + β/α)/(1 + β/α)] / (αγ)
    ArcherThickness,
    /// x = max(0, x_ref − x_pre)
    PreshieldSubtraction,
    /// n = log10(N·T·K1 / (P·d²))
    AttenuationLengths,
    /// x(n) by linear interpolation on a thickness column
    TableInterpolation,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::IncidentKerma => EquationMetadata {
                name: "Unshielded Kerma at the Barrier",
                description: "Weekly air kerma at the occupied point with no barrier, inverse-square from 1 m",
                formula_plain: "K = K1 · U · N / d²",
                reference: CodeReference::Ncrp147 { section: "Eq. 4.3" },
                variables: vec![
                    Variable::new("K1", "Unshielded kerma per patient at 1 m", "mGy·m²/patient"),
                    Variable::new("U", "Use factor (1 for secondary barriers)", ""),
                    Variable::new("N", "Patients per week", "patients/wk"),
                    Variable::new("d", "Source to occupied point distance", "m"),
                ],
                assumptions: vec!["Point source", "Zero is returned for d <= 0"],
                category: EquationCategory::IncidentKerma,
                source_module: "calculations/kerma.rs",
                source_function: "incident_kerma",
            },

            Equation::WorkloadScaling => EquationMetadata {
                name: "Workload Normalization",
                description: "Rescales a kerma coefficient when the site workload per patient differs from the survey value",
                formula_plain: "K1' = K1 · W_site / W_norm",
                reference: CodeReference::Ncrp147 { section: "Section 4.1.6" },
                variables: vec![
                    Variable::new("W_site", "Site workload per patient", "mA·min/patient"),
                    Variable::new("W_norm", "Normalized workload per patient", "mA·min/patient"),
                ],
                assumptions: vec!["Kerma proportional to workload at fixed spectrum"],
                category: EquationCategory::IncidentKerma,
                source_module: "calculations/kerma.rs",
                source_function: "scale_for_workload",
            },

            Equation::CtHeadKerma => EquationMetadata {
                name: "CT Head Scatter Kerma",
                description: "Secondary kerma at 1 m per head procedure",
                formula_plain: "K1sec(head) = κ_head · DLP_head · Kc",
                reference: CodeReference::Ncrp147 { section: "Eq. 5.1" },
                variables: vec![
                    Variable::new("κ_head", "Head scatter coefficient", "cm⁻¹"),
                    Variable::new("DLP_head", "Reference dose-length product", "mGy·cm"),
                    Variable::new("Kc", "Contrast multiplier", ""),
                ],
                assumptions: vec!["Reference DLP of 1200 mGy·cm"],
                category: EquationCategory::IncidentKerma,
                source_module: "calculations/kerma.rs",
                source_function: "ct_procedure_kerma",
            },

            Equation::CtBodyKerma => EquationMetadata {
                name: "CT Body Scatter Kerma",
                description: "Secondary kerma at 1 m per body procedure",
                formula_plain: "K1sec(body) = 1.2 · κ_body · DLP_body · Kc",
                reference: CodeReference::Ncrp147 { section: "Eq. 5.2" },
                variables: vec![
                    Variable::new("κ_body", "Body scatter coefficient", "cm⁻¹"),
                    Variable::new("DLP_body", "Reference dose-length product", "mGy·cm"),
                    Variable::new("Kc", "Contrast multiplier", ""),
                ],
                assumptions: vec!["Reference DLP of 550 mGy·cm", "1.2 anatomical correction for body"],
                category: EquationCategory::IncidentKerma,
                source_module: "calculations/kerma.rs",
                source_function: "ct_procedure_kerma",
            },

            Equation::CtWeeklyKerma => EquationMetadata {
                name: "CT Weekly Scatter Kerma",
                description: "Weekly secondary kerma at the occupied point from head and body procedures",
                formula_plain: "K = (K1sec(head)·N_head + K1sec(body)·N_body) / d²",
                reference: CodeReference::Ncrp147 { section: "Eq. 5.3" },
                variables: vec![
                    Variable::new("N_head", "Head procedures per week", "patients/wk"),
                    Variable::new("N_body", "Body procedures per week", "patients/wk"),
                    Variable::new("d", "Isocenter to occupied point distance", "m"),
                ],
                assumptions: vec!["Zero is returned for d <= 0"],
                category: EquationCategory::IncidentKerma,
                source_module: "calculations/kerma.rs",
                source_function: "ct_weekly_kerma",
            },

            Equation::RequiredTransmission => EquationMetadata {
                name: "Required Transmission",
                description: "Fraction of the unshielded kerma the barrier may pass",
                formula_plain: "B = P / (K · T)",
                reference: CodeReference::Ncrp147 { section: "Eq. 4.6" },
                variables: vec![
                    Variable::new("P", "Design goal", "mGy/wk"),
                    Variable::new("K", "Unshielded weekly kerma", "mGy/wk"),
                    Variable::new("T", "Occupancy factor", ""),
                ],
                assumptions: vec!["Undefined when P = 0 or K·T = 0", "B >= 1 means no added barrier"],
                category: EquationCategory::Transmission,
                source_module: "calculations/transmission.rs",
                source_function: "required_transmission",
            },

            Equation::PreshieldSplit => EquationMetadata {
                name: "Pre-shielding Transmission Split",
                description: "Transmission the added barrier must still provide after crediting pre-shielding",
                formula_plain: "B_net = B / B(x_pre)",
                reference: CodeReference::Ncrp147 { section: "Section 4.1.6" },
                variables: vec![
                    Variable::new("x_pre", "Pre-shielding equivalent thickness", "mm"),
                    Variable::new("B(x_pre)", "Transmission of the pre-shielding", ""),
                ],
                assumptions: vec!["Pre-shielding transmission from the primary-barrier fit"],
                category: EquationCategory::Transmission,
                source_module: "calculations/transmission.rs",
                source_function: "split_for_preshielding",
            },

            Equation::ArcherTransmission => EquationMetadata {
                name: "Archer Transmission Model",
                description: "Broad-beam transmission through thickness x",
                formula_plain: "B(x) = [(1 + β/α)·e^(αγx) − β/α]^(−1/γ)",
                reference: CodeReference::Archer1983,
                variables: vec![
                    Variable::new("α", "Fit parameter", "mm⁻¹"),
                    Variable::new("β", "Fit parameter", "mm⁻¹"),
                    Variable::new("γ", "Fit exponent", ""),
                    Variable::new("x", "Barrier thickness", "mm"),
                ],
                assumptions: vec!["Fit valid for x >= 0"],
                category: EquationCategory::Thickness,
                source_module: "calculations/closed_form.rs",
                source_function: "archer_transmission",
            },

            Equation::ArcherThickness => EquationMetadata {
                name: "Archer Thickness",
                description: "Thickness giving transmission B, inverse of the Archer model",
                formula_plain: "x = ln[(B^−γ + β/α)/(1 + β/α)] / (αγ)",
                reference: CodeReference::Ncrp147 { section: "Eq. A.3" },
                variables: vec![
                    Variable::new("B", "Required transmission", ""),
                    Variable::new("x", "Barrier thickness", "mm"),
                ],
                assumptions: vec![
                    "No valid solution when B <= 0, α = 0, γ = 0 or the log argument is not positive",
                    "Negative results clamp to 0",
                ],
                category: EquationCategory::Thickness,
                source_module: "calculations/closed_form.rs",
                source_function: "archer_thickness",
            },

            Equation::PreshieldSubtraction => EquationMetadata {
                name: "Pre-shielding Subtraction",
                description: "Added thickness after subtracting the pre-shielding equivalent",
                formula_plain: "x = max(0, x_ref − x_pre)",
                reference: CodeReference::Ncrp147 { section: "Section 4.1.6" },
                variables: vec![
                    Variable::new("x_ref", "Thickness with no pre-shielding", "mm"),
                    Variable::new("x_pre", "Pre-shielding equivalent thickness", "mm"),
                ],
                assumptions: vec!["Same material for barrier and pre-shielding equivalent"],
                category: EquationCategory::Thickness,
                source_module: "calculations/transmission.rs",
                source_function: "subtract_preshielding",
            },

            Equation::AttenuationLengths => EquationMetadata {
                name: "Attenuation Lengths",
                description: "Base-10 logarithm of the required attenuation",
                formula_plain: "n = log10(B⁻¹), B⁻¹ = N·T·K1 / (P·d²)",
                reference: CodeReference::Ncrp147 { section: "Section 4.2" },
                variables: vec![
                    Variable::new("n", "Attenuation-length count", ""),
                    Variable::new("N", "Patients per week", "patients/wk"),
                    Variable::new("K1", "Kerma per patient at 1 m", "mGy·m²/patient"),
                ],
                assumptions: vec!["Use factor folded into the tabulated column"],
                category: EquationCategory::Transmission,
                source_module: "calculations/table_lookup.rs",
                source_function: "attenuation_lengths",
            },

            Equation::TableInterpolation => EquationMetadata {
                name: "Thickness Table Interpolation",
                description: "Linear interpolation between neighbouring entries of a thickness column",
                formula_plain: "x(n) = x_i + (n − i)·(x_(i+1) − x_i)",
                reference: CodeReference::Arithmetic,
                variables: vec![
                    Variable::new("i", "Table index, floor(n)", ""),
                    Variable::new("x_i", "Tabulated thickness at index i", "mm"),
                ],
                assumptions: vec!["0 below n = 0", "Extrapolated from the last interval above the table"],
                category: EquationCategory::Thickness,
                source_module: "calculations/table_lookup.rs",
                source_function: "interpolate",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories in calculation order
    pub fn all_categories() -> Vec<EquationCategory> {
        let mut cats = vec![
            EquationCategory::Thickness,
            EquationCategory::Transmission,
            EquationCategory::IncidentKerma,
        ];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::IncidentKerma,
    Equation::WorkloadScaling,
    Equation::CtHeadKerma,
    Equation::CtBodyKerma,
    Equation::CtWeeklyKerma,
    Equation::RequiredTransmission,
    Equation::PreshieldSplit,
    Equation::AttenuationLengths,
    Equation::ArcherTransmission,
    Equation::ArcherThickness,
    Equation::PreshieldSubtraction,
    Equation::TableInterpolation,
];

// ============================================================================
// Markdown Reference
// ============================================================================

/// Generate the equations reference document (EQUATIONS.md).
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(
        r#"# Shielding Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

Every relation the barrier thickness engine evaluates, with its published
source and the function that implements it.

---

"#,
    );

    for category in Equation::all_categories() {
        let equations = Equation::in_category(category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();
            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n\n");
                for a in &meta.assumptions {
                    output.push_str(&format!("- {}\n", a));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** `{}` → `{}()`\n\n",
                meta.source_module, meta.source_function
            ));
        }
    }

    output.push_str("## Statistics\n\n");
    output.push_str(&format!("- **Total Equations:** {}\n", ALL_EQUATIONS.len()));
    output.push_str(&format!("- **Categories:** {}\n", Equation::all_categories().len()));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_equation_has_source_info() {
        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.source_module.is_empty(), "{:?} missing source_module", eq);
            assert!(!meta.source_function.is_empty(), "{:?} missing source_function", eq);
            assert!(!meta.formula_plain.is_empty(), "{:?} missing formula_plain", eq);
        }
    }

    #[test]
    fn test_categories_sorted() {
        let cats = Equation::all_categories();
        assert_eq!(cats[0], EquationCategory::IncidentKerma);
        assert_eq!(cats[2], EquationCategory::Thickness);
    }

    #[test]
    fn test_every_equation_in_a_category() {
        let total: usize = Equation::all_categories()
            .into_iter()
            .map(|c| Equation::in_category(c).len())
            .sum();
        assert_eq!(total, ALL_EQUATIONS.len());
    }

    #[test]
    fn test_generate_equations_markdown() {
        let markdown = generate_equations_markdown();
        assert!(markdown.contains("# Shielding Equations Reference"));
        assert!(markdown.contains("## Incident Kerma"));
        assert!(markdown.contains("### Archer Thickness"));
        assert!(markdown.contains("`B = P / (K · T)`"));
        assert!(markdown.contains("NCRP Report 147, Eq. 5.2"));
        assert!(markdown.contains("calculations/closed_form.rs"));
        assert!(markdown.contains("**Total Equations:** 12"));
        assert!(markdown.contains("**Categories:** 3"));
    }
}
