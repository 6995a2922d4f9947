//! # Barrier Dispatch
//!
//! Routes a [`CalculationRequest`] to the computation path for its imaging
//! case and assembles the [`CalculationResult`].
//!
//! | Case | Primary barrier | Secondary barrier |
//! |------|-----------------|-------------------|
//! | Standard rooms | closed form, or not applicable without K_P1 | closed form |
//! | Mammography, angiography | omitted by design | closed form |
//! | CT | not required | CT kerma, closed form with the voltage fit |
//! | Tabulated | table interpolation | table interpolation |
//!
//! A catalog lookup that fails inside a case is reported as
//! [`ShieldError::UnsupportedCombination`]. The one expected gap, a standard
//! room with no primary kerma, is an outcome and not an error.
//!
//! ## Example
//!
//! ```rust
//! use shield_core::calculations::dispatch::*;
//! use shield_core::catalog::{BarrierClass, Material, Modality};
//!
//! let request = CalculationRequest {
//!     label: "North wall".to_string(),
//!     source: SourceSpec::Radiographic(RadiographicSource {
//!         modality: Modality::RadRoomFloor,
//!         patients_per_week: 100.0,
//!         use_factor: 0.25,
//!         workload_per_patient: None,
//!     }),
//!     barrier: BarrierClass::Primary,
//!     material: Material::Lead,
//!     design_goal: 0.02,
//!     occupancy: 1.0,
//!     distance_m: 2.0,
//!     preshielding: None,
//! };
//!
//! let result = Engine::default().evaluate(&request).unwrap();
//! assert!((result.thickness_mm - 1.3167).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{
    self, AttenuationFit, BarrierClass, Catalog, CtVoltage, FitSource, ImagingCategory, Material, Modality,
    ModalityProfile, PreshieldingCategory, SecondaryKermaComponent, TableId, WallPosition,
};
use crate::equations::Equation;
use crate::errors::{ShieldError, ShieldResult};
use crate::settings::{EngineSettings, PreshieldCorrection};
use crate::units::Unit;

use super::closed_form::{archer_thickness, archer_transmission, Thickness};
use super::kerma::{ct_procedure_kerma, ct_weekly_kerma, incident_kerma, scale_for_workload};
use super::table_lookup::{attenuation_lengths, interpolate, InterpolationRegion};
use super::trail::{DerivationTrail, TrailFlag};
use super::transmission::{required_transmission, split_for_preshielding, subtract_preshielding};

// ============================================================================
// Request
// ============================================================================

/// Radiographic or fluoroscopic room source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiographicSource {
    pub modality: Modality,
    pub patients_per_week: f64,
    /// Use factor U (0 to 1); secondary barriers always use 1
    pub use_factor: f64,
    /// Site workload per patient (mA·min/patient); `None` uses the survey value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload_per_patient: Option<f64>,
}

/// CT scanner source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CtSource {
    pub voltage: CtVoltage,
    pub head_procedures_per_week: f64,
    pub body_procedures_per_week: f64,
    /// Contrast multiplier Kc (1.0 without contrast)
    #[serde(default = "default_contrast_factor")]
    pub contrast_factor: f64,
}

fn default_contrast_factor() -> f64 {
    1.0
}

/// Tabulated wall source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabulatedSource {
    pub wall: WallPosition,
    pub patients_per_week: f64,
}

/// Radiation source behind the barrier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceSpec {
    Radiographic(RadiographicSource),
    ComputedTomography(CtSource),
    Tabulated(TabulatedSource),
}

/// Attenuation already in the beam ahead of the barrier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Preshielding {
    /// Equivalent thickness from the catalog
    Category { category: PreshieldingCategory },
    /// Equivalent thickness in mm of the barrier material
    Custom { thickness_mm: f64 },
}

/// One barrier to evaluate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Control booth",
///   "source": { "kind": "computed-tomography", "voltage": "120kvp",
///               "head_procedures_per_week": 100, "body_procedures_per_week": 150 },
///   "barrier": "secondary",
///   "material": "lead",
///   "design_goal": 0.02,
///   "occupancy": 1.0,
///   "distance_m": 4.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// User label (e.g., "North wall")
    #[serde(default)]
    pub label: String,

    pub source: SourceSpec,

    pub barrier: BarrierClass,

    pub material: Material,

    /// Design goal P in mGy/wk
    pub design_goal: f64,

    /// Occupancy factor T (0 to 1)
    pub occupancy: f64,

    /// Source to occupied point distance in meters
    pub distance_m: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preshielding: Option<Preshielding>,
}

impl CalculationRequest {
    /// Validate input ranges.
    ///
    /// A zero design goal or occupancy passes here; the transmission resolver
    /// reports it with the values involved.
    pub fn validate(&self) -> ShieldResult<()> {
        if !self.distance_m.is_finite() || self.distance_m <= 0.0 {
            return Err(ShieldError::invalid_input(
                "distance_m",
                self.distance_m.to_string(),
                "Distance to the occupied point must be positive",
            ));
        }
        if self.occupancy > 1.0 {
            return Err(ShieldError::invalid_input(
                "occupancy",
                self.occupancy.to_string(),
                "Occupancy factor cannot exceed 1",
            ));
        }

        match &self.source {
            SourceSpec::Radiographic(src) => {
                check_count("patients_per_week", src.patients_per_week)?;
                if !(0.0..=1.0).contains(&src.use_factor) {
                    return Err(ShieldError::invalid_input(
                        "use_factor",
                        src.use_factor.to_string(),
                        "Use factor must be between 0 and 1",
                    ));
                }
            }
            SourceSpec::ComputedTomography(src) => {
                check_count("head_procedures_per_week", src.head_procedures_per_week)?;
                check_count("body_procedures_per_week", src.body_procedures_per_week)?;
                if !src.contrast_factor.is_finite() || src.contrast_factor <= 0.0 {
                    return Err(ShieldError::invalid_input(
                        "contrast_factor",
                        src.contrast_factor.to_string(),
                        "Contrast factor must be positive",
                    ));
                }
            }
            SourceSpec::Tabulated(src) => check_count("patients_per_week", src.patients_per_week)?,
        }

        if let Some(Preshielding::Custom { thickness_mm }) = self.preshielding {
            if !thickness_mm.is_finite() || thickness_mm < 0.0 {
                return Err(ShieldError::invalid_input(
                    "preshielding.thickness_mm",
                    thickness_mm.to_string(),
                    "Pre-shielding thickness cannot be negative",
                ));
            }
        }
        Ok(())
    }
}

fn check_count(field: &str, value: f64) -> ShieldResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ShieldError::invalid_input(field, value.to_string(), "Count cannot be negative"));
    }
    Ok(())
}

// ============================================================================
// Dispatch case
// ============================================================================

/// Computation path for a request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchCase {
    /// Standard radiographic and R&F rooms
    StandardRoom(RadiographicSource),
    /// Mammography and angiography
    Specialized(RadiographicSource),
    ComputedTomography(CtSource),
    Tabulated(TabulatedSource),
}

impl DispatchCase {
    pub fn from_source(source: &SourceSpec) -> DispatchCase {
        match *source {
            SourceSpec::Radiographic(src) => match src.modality.category() {
                ImagingCategory::Specialized => DispatchCase::Specialized(src),
                _ => DispatchCase::StandardRoom(src),
            },
            SourceSpec::ComputedTomography(src) => DispatchCase::ComputedTomography(src),
            SourceSpec::Tabulated(src) => DispatchCase::Tabulated(src),
        }
    }

    pub fn category(&self) -> ImagingCategory {
        match self {
            DispatchCase::StandardRoom(_) => ImagingCategory::StandardRoom,
            DispatchCase::Specialized(_) => ImagingCategory::Specialized,
            DispatchCase::ComputedTomography(_) => ImagingCategory::ComputedTomography,
            DispatchCase::Tabulated(_) => ImagingCategory::Tabulated,
        }
    }

    /// Short name of the source, used in diagnostics
    pub fn source_label(&self) -> String {
        match self {
            DispatchCase::StandardRoom(src) | DispatchCase::Specialized(src) => src.modality.key().to_string(),
            DispatchCase::ComputedTomography(src) => format!("ct-{}", src.voltage.key()),
            DispatchCase::Tabulated(src) => src.wall.key().to_string(),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// How the thickness was arrived at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    Computed,
    /// Closed form had no solution; thickness is the sentinel
    NoValidSolution,
    /// No data for this barrier (e.g. no primary kerma); thickness 0
    NotApplicable { reason: String },
    /// Case deliberately has no primary calculation; thickness 0
    OmittedByDesign { reason: String },
    /// Barrier needs no calculation (CT primary); thickness 0
    NotRequired { reason: String },
}

impl Outcome {
    pub fn is_computed(&self) -> bool {
        matches!(self, Outcome::Computed)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::NotApplicable { reason } | Outcome::OmittedByDesign { reason } | Outcome::NotRequired { reason } => {
                Some(reason)
            }
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Outcome::Computed => "Computed",
            Outcome::NoValidSolution => "No valid solution",
            Outcome::NotApplicable { .. } => "Not applicable",
            Outcome::OmittedByDesign { .. } => "Omitted by design",
            Outcome::NotRequired { .. } => "Not required",
        }
    }
}

/// Thickness for one secondary kerma component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentThickness {
    pub component: SecondaryKermaComponent,
    /// Kerma coefficient used (mGy·m²/patient)
    pub kerma_per_patient: f64,
    pub thickness_mm: f64,
}

/// Evaluated barrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub label: String,
    pub case: ImagingCategory,
    pub barrier: BarrierClass,
    pub material: Material,
    pub outcome: Outcome,

    /// Required added thickness in mm (>= 0; sentinel for no solution)
    pub thickness_mm: f64,

    /// Unshielded weekly kerma at the occupied point (mGy/wk)
    pub kerma_rate: Option<f64>,

    /// Required transmission B
    pub transmission: Option<f64>,

    /// Transmission the added barrier provides after pre-shielding
    pub net_transmission: Option<f64>,

    /// log10(B⁻¹), tabulated path only
    pub attenuation_lengths: Option<f64>,

    /// Thickness per secondary kerma component (secondary radiographic only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentThickness>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<TrailFlag>,

    pub trail: DerivationTrail,
}

impl CalculationResult {
    fn new(request: &CalculationRequest, case: ImagingCategory, outcome: Outcome, trail: DerivationTrail) -> Self {
        CalculationResult {
            label: request.label.clone(),
            case,
            barrier: request.barrier,
            material: request.material,
            outcome,
            thickness_mm: 0.0,
            kerma_rate: None,
            transmission: None,
            net_transmission: None,
            attenuation_lengths: None,
            components: Vec::new(),
            flags: Vec::new(),
            trail,
        }
    }

    pub fn has_flag(&self, flag: TrailFlag) -> bool {
        self.flags.contains(&flag)
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Pre-shielding resolved against the catalog
#[derive(Debug, Clone, Copy)]
struct PreshieldInput<'a> {
    thickness_mm: f64,
    /// Fit for B(x_pre); only needed for the transmission split
    fit: Option<&'a AttenuationFit>,
}

/// Closed-form solution of one barrier
#[derive(Debug, Clone, Copy)]
struct ClosedFormSolution {
    transmission: f64,
    preshield_transmission: Option<f64>,
    net_transmission: f64,
    reference: Thickness,
    thickness: Thickness,
}

/// Pre-shielding credit on a tabulated barrier
#[derive(Debug, Clone, Copy, PartialEq)]
enum TablePreshield {
    Plain,
    /// Read the pre-shielded column
    BuiltIn,
    /// Read the plain column, then subtract x_pre (mm)
    Subtracted(f64),
}

/// Evaluates requests against a catalog.
///
/// Holds only shared references and settings; one engine can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Engine<'a> {
    catalog: &'a Catalog,
    settings: EngineSettings,
}

impl Default for Engine<'static> {
    fn default() -> Self {
        Engine {
            catalog: catalog::builtin(),
            settings: EngineSettings::default(),
        }
    }
}

impl<'a> Engine<'a> {
    /// Build an engine over `catalog`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the settings fail [`EngineSettings::validate`].
    pub fn new(catalog: &'a Catalog, settings: EngineSettings) -> ShieldResult<Self> {
        settings.validate()?;
        Ok(Engine { catalog, settings })
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Evaluate one barrier.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for out-of-range request values
    /// - `InvalidTransmissionInput` when B cannot be formed
    /// - `UnsupportedCombination` when the catalog lacks data for the case
    pub fn evaluate(&self, request: &CalculationRequest) -> ShieldResult<CalculationResult> {
        request.validate()?;

        let case = DispatchCase::from_source(&request.source);
        debug!(
            label = %request.label,
            case = %case.category(),
            source = %case.source_label(),
            barrier = ?request.barrier,
            material = ?request.material,
            "dispatching barrier"
        );

        let result = match case {
            DispatchCase::StandardRoom(src) => self.standard_room(request, &src),
            DispatchCase::Specialized(src) => self.specialized(request, &src),
            DispatchCase::ComputedTomography(src) => self.computed_tomography(request, &src),
            DispatchCase::Tabulated(src) => self.tabulated(request, &src),
        };

        result.map_err(|e| {
            if e.is_missing_reference_data() {
                ShieldError::unsupported(
                    case.category().display_name(),
                    case.source_label(),
                    request.barrier.display_name(),
                    e.to_string(),
                )
            } else {
                e
            }
        })
    }

    // ------------------------------------------------------------------------
    // Cases
    // ------------------------------------------------------------------------

    fn standard_room(&self, request: &CalculationRequest, src: &RadiographicSource) -> ShieldResult<CalculationResult> {
        let profile = self.catalog.profile(src.modality)?;
        match (request.barrier, profile.primary_kerma) {
            (BarrierClass::Primary, Some(k1)) => self.radiographic_primary(request, src, profile, k1),
            (BarrierClass::Primary, None) => {
                let reason = format!("{} has no primary kerma coefficient", src.modality.display_name());
                debug!(modality = src.modality.key(), "primary barrier not applicable");
                Ok(self.skipped(request, ImagingCategory::StandardRoom, src.modality, Outcome::NotApplicable { reason }))
            }
            (BarrierClass::Secondary, _) => self.radiographic_secondary(request, src, profile, ImagingCategory::StandardRoom),
        }
    }

    fn specialized(&self, request: &CalculationRequest, src: &RadiographicSource) -> ShieldResult<CalculationResult> {
        match request.barrier {
            BarrierClass::Primary => {
                let reason = format!(
                    "{} primary beam is intercepted by the image receptor",
                    src.modality.display_name()
                );
                Ok(self.skipped(request, ImagingCategory::Specialized, src.modality, Outcome::OmittedByDesign { reason }))
            }
            BarrierClass::Secondary => {
                let profile = self.catalog.profile(src.modality)?;
                self.radiographic_secondary(request, src, profile, ImagingCategory::Specialized)
            }
        }
    }

    fn computed_tomography(&self, request: &CalculationRequest, src: &CtSource) -> ShieldResult<CalculationResult> {
        let mut trail = DerivationTrail::new();
        trail.text("Case", ImagingCategory::ComputedTomography.display_name());
        trail.text("Tube voltage", src.voltage.display_name());

        if request.barrier == BarrierClass::Primary {
            let reason = "CT primary beam is confined to the gantry".to_string();
            let mut result = CalculationResult::new(
                request,
                ImagingCategory::ComputedTomography,
                Outcome::NotRequired { reason },
                trail,
            );
            result.kerma_rate = Some(0.0);
            return Ok(result);
        }

        let ct = &self.catalog.ct;
        let per_procedure = ct_procedure_kerma(ct, src.contrast_factor);
        trail.number("Contrast factor Kc", src.contrast_factor, Unit::Dimensionless, None);
        trail.number("DLP head", ct.dlp_head, Unit::MilligrayCentimeter, None);
        trail.number("K1sec(head)", per_procedure.head, Unit::MilligrayPerPatient, Some(Equation::CtHeadKerma));
        trail.number("DLP body", ct.dlp_body, Unit::MilligrayCentimeter, None);
        trail.number("K1sec(body)", per_procedure.body, Unit::MilligrayPerPatient, Some(Equation::CtBodyKerma));
        trail.number("Head procedures N_head", src.head_procedures_per_week, Unit::PatientsPerWeek, None);
        trail.number("Body procedures N_body", src.body_procedures_per_week, Unit::PatientsPerWeek, None);
        trail.number("Distance d", request.distance_m, Unit::Meters, None);

        let rate = ct_weekly_kerma(
            &per_procedure,
            src.head_procedures_per_week,
            src.body_procedures_per_week,
            request.distance_m,
        );
        trail.number("Unshielded kerma K", rate, Unit::MilligrayPerWeek, Some(Equation::CtWeeklyKerma));

        let source = FitSource::CtVoltage(src.voltage);
        let fit = self.catalog.fit(source, request.material, BarrierClass::Secondary)?;
        let preshield = self.resolve_preshielding(request, source, BarrierClass::Secondary)?;

        let mut result = CalculationResult::new(request, ImagingCategory::ComputedTomography, Outcome::Computed, trail);
        self.apply_closed_form(request, &mut result, rate, fit, preshield)?;
        Ok(result)
    }

    fn tabulated(&self, request: &CalculationRequest, src: &TabulatedSource) -> ShieldResult<CalculationResult> {
        let mut trail = DerivationTrail::new();
        let mut flags = Vec::new();
        trail.text("Case", ImagingCategory::Tabulated.display_name());
        trail.text("Wall position", src.wall.display_name());

        let column = src.wall.tabulated_column(request.barrier);
        if matches!(src.wall, WallPosition::CrossTableLateral | WallPosition::OppositeChestBucky) {
            trail.text("Wall column", format!("{} (fallback)", column.display_name()));
            flags.push(TrailFlag::WallPositionFallback);
        }

        let credit = self.tabulated_preshielding(request, &mut trail)?;
        let id = TableId::select(request.material, request.barrier, credit == TablePreshield::BuiltIn);
        let table = self.catalog.table(id, column)?;
        trail.text("Thickness table", table.identifier());

        let k1 = match request.barrier {
            BarrierClass::Primary => self.catalog.primary_kerma(table.kerma_source)?,
            BarrierClass::Secondary => self
                .catalog
                .profile(table.kerma_source)?
                .secondary_kerma(self.settings.secondary_component),
        };
        trail.number("Kerma coefficient K1", k1, Unit::MilligraySquareMeterPerPatient, None);
        trail.number("Patients per week N", src.patients_per_week, Unit::PatientsPerWeek, None);
        trail.number("Occupancy T", request.occupancy, Unit::Dimensionless, None);
        trail.number("Design goal P", request.design_goal, Unit::MilligrayPerWeek, None);
        trail.number("Distance d", request.distance_m, Unit::Meters, None);

        let n = attenuation_lengths(src.patients_per_week, request.occupancy, k1, request.design_goal, request.distance_m)?;
        trail.number("Attenuation lengths n", n, Unit::AttenuationLengths, Some(Equation::AttenuationLengths));

        let reading = interpolate(&table.thickness_mm, n)?;
        let last = table.max_index();
        match reading.region {
            InterpolationRegion::Extrapolated => {
                warn!(table = %table.identifier(), n, "attenuation lengths beyond tabulated range, extrapolating");
                trail.text("Table region", format!("extrapolated beyond n = {}", last));
                flags.push(TrailFlag::Extrapolated);
            }
            InterpolationRegion::BelowRange => {
                trail.text("Table region", "below n = 0, no barrier needed");
                flags.push(TrailFlag::BelowTableRange);
                flags.push(TrailFlag::NoAddedShielding);
            }
            InterpolationRegion::Interpolated => {}
        }

        let thickness_mm = match credit {
            TablePreshield::Subtracted(x_pre) => {
                trail.number(
                    "Table reading x_ref",
                    reading.thickness_mm,
                    Unit::Millimeters,
                    Some(Equation::TableInterpolation),
                );
                let mm = subtract_preshielding(reading.thickness_mm, x_pre);
                trail.number("Required thickness x", mm, Unit::Millimeters, Some(Equation::PreshieldSubtraction));
                mm
            }
            TablePreshield::Plain | TablePreshield::BuiltIn => {
                trail.number(
                    "Required thickness x",
                    reading.thickness_mm,
                    Unit::Millimeters,
                    Some(Equation::TableInterpolation),
                );
                reading.thickness_mm
            }
        };

        let mut result = CalculationResult::new(request, ImagingCategory::Tabulated, Outcome::Computed, trail);
        result.thickness_mm = thickness_mm;
        result.kerma_rate = Some(incident_kerma(k1, 1.0, src.patients_per_week, request.distance_m));
        result.transmission = Some(10f64.powf(-n));
        result.attenuation_lengths = Some(n);
        result.flags = flags;
        Ok(result)
    }

    /// Decide how pre-shielding is credited on a tabulated barrier.
    ///
    /// The pre-shielded columns already carry the table/holder equivalent, so
    /// they are read only for exactly that thickness. Any other x_pre is
    /// subtracted from the plain column reading.
    fn tabulated_preshielding(
        &self,
        request: &CalculationRequest,
        trail: &mut DerivationTrail,
    ) -> ShieldResult<TablePreshield> {
        let x_pre = match request.preshielding {
            None => return Ok(TablePreshield::Plain),
            Some(Preshielding::Category { category }) => {
                self.catalog.preshielding_thickness(category, request.material)?
            }
            Some(Preshielding::Custom { thickness_mm }) => thickness_mm,
        };

        if request.barrier == BarrierClass::Secondary {
            trail.text("Pre-shielding", "not credited on secondary tables");
            return Ok(TablePreshield::Plain);
        }

        trail.number("Pre-shielding x_pre", x_pre, Unit::Millimeters, None);
        if x_pre <= 0.0 {
            trail.text("Pre-shielding credit", "none, plain table");
            return Ok(TablePreshield::Plain);
        }

        let built_in = self
            .catalog
            .preshielding_thickness(PreshieldingCategory::TableHolder, request.material)
            .ok();
        if built_in.is_some_and(|b| (x_pre - b).abs() < 1e-9) {
            trail.text("Pre-shielding credit", "built into pre-shielded table");
            Ok(TablePreshield::BuiltIn)
        } else {
            trail.text("Pre-shielding credit", "subtracted from plain table reading");
            Ok(TablePreshield::Subtracted(x_pre))
        }
    }

    // ------------------------------------------------------------------------
    // Radiographic paths
    // ------------------------------------------------------------------------

    fn radiographic_primary(
        &self,
        request: &CalculationRequest,
        src: &RadiographicSource,
        profile: &ModalityProfile,
        primary_kerma: f64,
    ) -> ShieldResult<CalculationResult> {
        let mut trail = self.radiographic_header(src);
        let mut flags = Vec::new();
        trail.number("Kerma coefficient K_P1", primary_kerma, Unit::MilligraySquareMeterPerPatient, None);
        let k1 = self.workload_adjusted(primary_kerma, src, profile, &mut trail, &mut flags)?;

        trail.number("Use factor U", src.use_factor, Unit::Dimensionless, None);
        trail.number("Patients per week N", src.patients_per_week, Unit::PatientsPerWeek, None);
        trail.number("Distance d", request.distance_m, Unit::Meters, None);
        let rate = incident_kerma(k1, src.use_factor, src.patients_per_week, request.distance_m);
        trail.number("Unshielded kerma K", rate, Unit::MilligrayPerWeek, Some(Equation::IncidentKerma));

        let source = FitSource::Modality(src.modality);
        let fit = self.catalog.fit(source, request.material, BarrierClass::Primary)?;
        let preshield = self.resolve_preshielding(request, source, BarrierClass::Primary)?;

        let mut result = CalculationResult::new(request, ImagingCategory::StandardRoom, Outcome::Computed, trail);
        result.flags = flags;
        self.apply_closed_form(request, &mut result, rate, fit, preshield)?;
        Ok(result)
    }

    fn radiographic_secondary(
        &self,
        request: &CalculationRequest,
        src: &RadiographicSource,
        profile: &ModalityProfile,
        case: ImagingCategory,
    ) -> ShieldResult<CalculationResult> {
        let mut trail = self.radiographic_header(src);
        let mut flags = Vec::new();
        let design_component = self.settings.secondary_component;

        trail.text("Secondary component", design_component.display_name());
        let coefficient = profile.secondary_kerma(design_component);
        trail.number("Kerma coefficient K_sec1", coefficient, Unit::MilligraySquareMeterPerPatient, None);
        let k1 = self.workload_adjusted(coefficient, src, profile, &mut trail, &mut flags)?;

        // Leakage and scatter reach the barrier regardless of beam direction
        trail.number("Use factor U", 1.0, Unit::Dimensionless, None);
        trail.number("Patients per week N", src.patients_per_week, Unit::PatientsPerWeek, None);
        trail.number("Distance d", request.distance_m, Unit::Meters, None);
        let rate = incident_kerma(k1, 1.0, src.patients_per_week, request.distance_m);
        trail.number("Unshielded kerma K", rate, Unit::MilligrayPerWeek, Some(Equation::IncidentKerma));

        let source = FitSource::Modality(src.modality);
        let fit = self.catalog.fit(source, request.material, BarrierClass::Secondary)?;
        let preshield = self.resolve_preshielding(request, source, BarrierClass::Secondary)?;

        let mut result = CalculationResult::new(request, case, Outcome::Computed, trail);
        result.flags = flags;
        self.apply_closed_form(request, &mut result, rate, fit, preshield)?;

        for component in SecondaryKermaComponent::ALL {
            let k = match src.workload_per_patient {
                Some(w) => scale_for_workload(profile.secondary_kerma(component), w, profile.normalized_workload)?,
                None => profile.secondary_kerma(component),
            };
            let thickness_mm = if component == design_component {
                result.thickness_mm
            } else {
                let rate = incident_kerma(k, 1.0, src.patients_per_week, request.distance_m);
                let solution = self.solve_closed_form(request, rate, fit, preshield)?;
                let mm = solution.thickness.to_mm(self.settings.no_solution_mm);
                result.trail.number(
                    format!("Thickness ({})", component.display_name()),
                    mm,
                    Unit::Millimeters,
                    None,
                );
                mm
            };
            result.components.push(ComponentThickness {
                component,
                kerma_per_patient: k,
                thickness_mm,
            });
        }

        Ok(result)
    }

    fn radiographic_header(&self, src: &RadiographicSource) -> DerivationTrail {
        let mut trail = DerivationTrail::new();
        trail.text("Case", src.modality.category().display_name());
        trail.text("Modality", src.modality.display_name());
        trail
    }

    /// Apply the site workload, if given, to a kerma coefficient.
    fn workload_adjusted(
        &self,
        kerma_per_patient: f64,
        src: &RadiographicSource,
        profile: &ModalityProfile,
        trail: &mut DerivationTrail,
        flags: &mut Vec<TrailFlag>,
    ) -> ShieldResult<f64> {
        let Some(workload) = src.workload_per_patient else {
            return Ok(kerma_per_patient);
        };
        let scaled = scale_for_workload(kerma_per_patient, workload, profile.normalized_workload)?;
        trail.number("Normalized workload W_norm", profile.normalized_workload, Unit::MilliampereMinutePerPatient, None);
        trail.number("Site workload W_site", workload, Unit::MilliampereMinutePerPatient, None);
        trail.number(
            "Scaled kerma coefficient K1'",
            scaled,
            Unit::MilligraySquareMeterPerPatient,
            Some(Equation::WorkloadScaling),
        );
        flags.push(TrailFlag::NonReferenceWorkload);
        Ok(scaled)
    }

    // ------------------------------------------------------------------------
    // Closed form
    // ------------------------------------------------------------------------

    fn resolve_preshielding(
        &self,
        request: &CalculationRequest,
        source: FitSource,
        barrier: BarrierClass,
    ) -> ShieldResult<Option<PreshieldInput<'a>>> {
        let Some(preshielding) = request.preshielding else {
            return Ok(None);
        };

        let thickness_mm = match preshielding {
            Preshielding::Category { category } => self.catalog.preshielding_thickness(category, request.material)?,
            Preshielding::Custom { thickness_mm } => thickness_mm,
        };

        // B(x_pre) uses the primary fit; CT has only secondary fits
        let fit = match self.settings.preshield_correction {
            PreshieldCorrection::TransmissionSplit => {
                let pre_barrier = match source {
                    FitSource::Modality(_) => BarrierClass::Primary,
                    FitSource::CtVoltage(_) => barrier,
                };
                Some(self.catalog.fit(source, request.material, pre_barrier)?)
            }
            PreshieldCorrection::ThicknessSubtraction => None,
        };

        Ok(Some(PreshieldInput { thickness_mm, fit }))
    }

    fn solve_closed_form(
        &self,
        request: &CalculationRequest,
        rate: f64,
        fit: &AttenuationFit,
        preshield: Option<PreshieldInput<'_>>,
    ) -> ShieldResult<ClosedFormSolution> {
        let transmission = required_transmission(request.design_goal, rate, request.occupancy)?;
        let reference = archer_thickness(fit, transmission);

        let solution = match preshield {
            None => ClosedFormSolution {
                transmission,
                preshield_transmission: None,
                net_transmission: transmission,
                reference,
                thickness: reference,
            },
            Some(PreshieldInput { thickness_mm, fit: Some(pre_fit) }) => {
                let b_pre = archer_transmission(pre_fit, thickness_mm);
                let net = split_for_preshielding(transmission, b_pre)?;
                ClosedFormSolution {
                    transmission,
                    preshield_transmission: Some(b_pre),
                    net_transmission: net,
                    reference,
                    thickness: archer_thickness(fit, net),
                }
            }
            Some(PreshieldInput { thickness_mm, fit: None }) => ClosedFormSolution {
                transmission,
                preshield_transmission: None,
                net_transmission: transmission,
                reference,
                thickness: match reference {
                    Thickness::Required(x) => Thickness::Required(subtract_preshielding(x, thickness_mm)),
                    Thickness::NoValidSolution => Thickness::NoValidSolution,
                },
            },
        };
        Ok(solution)
    }

    /// Solve B → x and record every step on the result.
    fn apply_closed_form(
        &self,
        request: &CalculationRequest,
        result: &mut CalculationResult,
        rate: f64,
        fit: &AttenuationFit,
        preshield: Option<PreshieldInput<'_>>,
    ) -> ShieldResult<()> {
        let trail = &mut result.trail;
        trail.number("Occupancy T", request.occupancy, Unit::Dimensionless, None);
        trail.number("Design goal P", request.design_goal, Unit::MilligrayPerWeek, None);

        let solution = self.solve_closed_form(request, rate, fit, preshield)?;
        trail.number(
            "Transmission B",
            solution.transmission,
            Unit::Dimensionless,
            Some(Equation::RequiredTransmission),
        );

        trail.text("Attenuation fit", fit.identifier());
        trail.number("α", fit.alpha, Unit::PerMillimeter, None);
        trail.number("β", fit.beta, Unit::PerMillimeter, None);
        trail.number("γ", fit.gamma, Unit::Dimensionless, None);

        if let Some(pre) = preshield {
            trail.number("Pre-shielding x_pre", pre.thickness_mm, Unit::Millimeters, None);
            match (solution.preshield_transmission, pre.fit) {
                (Some(b_pre), Some(pre_fit)) => {
                    trail.text("Pre-shielding fit", pre_fit.identifier());
                    trail.number(
                        "Pre-shielding transmission B_pre",
                        b_pre,
                        Unit::Dimensionless,
                        Some(Equation::ArcherTransmission),
                    );
                    trail.number(
                        "Net transmission B_net",
                        solution.net_transmission,
                        Unit::Dimensionless,
                        Some(Equation::PreshieldSplit),
                    );
                }
                _ => {
                    trail.number(
                        "Reference thickness x_ref",
                        solution.reference.to_mm(self.settings.no_solution_mm),
                        Unit::Millimeters,
                        Some(Equation::ArcherThickness),
                    );
                }
            }
        }

        let equation = match (preshield, solution.preshield_transmission) {
            (Some(_), None) => Equation::PreshieldSubtraction,
            _ => Equation::ArcherThickness,
        };

        result.kerma_rate = Some(rate);
        result.transmission = Some(solution.transmission);
        result.net_transmission = Some(solution.net_transmission);

        match solution.thickness {
            Thickness::Required(mm) => {
                result.outcome = Outcome::Computed;
                result.thickness_mm = mm;
                if solution.net_transmission >= 1.0 {
                    result.flags.push(TrailFlag::NoAddedShielding);
                }
            }
            Thickness::NoValidSolution => {
                warn!(
                    label = %request.label,
                    fit = %fit.identifier(),
                    transmission = solution.net_transmission,
                    "no valid closed-form solution"
                );
                result.outcome = Outcome::NoValidSolution;
                result.thickness_mm = self.settings.no_solution_mm;
            }
        }
        result
            .trail
            .number("Required thickness x", result.thickness_mm, Unit::Millimeters, Some(equation));

        debug!(
            label = %request.label,
            rate,
            transmission = solution.transmission,
            thickness_mm = result.thickness_mm,
            "closed-form barrier solved"
        );
        Ok(())
    }

    fn skipped(
        &self,
        request: &CalculationRequest,
        case: ImagingCategory,
        modality: Modality,
        outcome: Outcome,
    ) -> CalculationResult {
        let mut trail = DerivationTrail::new();
        trail.text("Case", case.display_name());
        trail.text("Modality", modality.display_name());
        if let Some(reason) = outcome.reason() {
            trail.text("Outcome", reason);
        }
        CalculationResult::new(request, case, outcome, trail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radiographic(modality: Modality, barrier: BarrierClass) -> CalculationRequest {
        CalculationRequest {
            label: "test".to_string(),
            source: SourceSpec::Radiographic(RadiographicSource {
                modality,
                patients_per_week: 100.0,
                use_factor: 0.25,
                workload_per_patient: None,
            }),
            barrier,
            material: Material::Lead,
            design_goal: 0.02,
            occupancy: 1.0,
            distance_m: 2.0,
            preshielding: None,
        }
    }

    fn ct(barrier: BarrierClass) -> CalculationRequest {
        CalculationRequest {
            label: "CT".to_string(),
            source: SourceSpec::ComputedTomography(CtSource {
                voltage: CtVoltage::Kvp120,
                head_procedures_per_week: 100.0,
                body_procedures_per_week: 150.0,
                contrast_factor: 1.0,
            }),
            barrier,
            material: Material::Lead,
            design_goal: 0.02,
            occupancy: 1.0,
            distance_m: 4.0,
            preshielding: None,
        }
    }

    fn tabulated(wall: WallPosition, barrier: BarrierClass) -> CalculationRequest {
        CalculationRequest {
            label: "table".to_string(),
            source: SourceSpec::Tabulated(TabulatedSource {
                wall,
                patients_per_week: 100.0,
            }),
            barrier,
            material: Material::Lead,
            design_goal: 0.02,
            occupancy: 1.0,
            distance_m: 2.0,
            preshielding: None,
        }
    }

    fn thickness(request: &CalculationRequest) -> f64 {
        Engine::default().evaluate(request).unwrap().thickness_mm
    }

    #[test]
    fn test_rad_room_floor_primary_lead() {
        let result = Engine::default()
            .evaluate(&radiographic(Modality::RadRoomFloor, BarrierClass::Primary))
            .unwrap();

        assert_eq!(result.outcome, Outcome::Computed);
        assert_eq!(result.case, ImagingCategory::StandardRoom);
        assert!((result.kerma_rate.unwrap() - 32.5).abs() < 1e-9);
        assert!((result.transmission.unwrap() - 6.1538e-4).abs() < 1e-7);
        assert!((result.thickness_mm - 1.3167).abs() < 0.01, "x = {}", result.thickness_mm);

        let fit = result.trail.find("Attenuation fit").unwrap();
        assert_eq!(fit.value.to_string(), "rad-room-floor/lead/primary");
        assert_eq!(result.trail.find("α").and_then(|e| e.number()), Some(2.651));
    }

    #[test]
    fn test_primary_without_primary_kerma_is_not_applicable() {
        for modality in [Modality::RadRoomAllBarriers, Modality::FluoroscopyTube] {
            let result = Engine::default()
                .evaluate(&radiographic(modality, BarrierClass::Primary))
                .unwrap();
            assert!(matches!(result.outcome, Outcome::NotApplicable { .. }), "{:?}", modality);
            assert_eq!(result.thickness_mm, 0.0);
            assert!(result.transmission.is_none());
        }
    }

    #[test]
    fn test_specialized_primary_is_omitted() {
        for modality in [Modality::Mammography, Modality::CardiacAngiography, Modality::PeripheralAngiography] {
            let result = Engine::default()
                .evaluate(&radiographic(modality, BarrierClass::Primary))
                .unwrap();
            assert!(matches!(result.outcome, Outcome::OmittedByDesign { .. }));
            assert_eq!(result.case, ImagingCategory::Specialized);
            assert_eq!(result.thickness_mm, 0.0);
        }
    }

    #[test]
    fn test_specialized_secondary_is_computed() {
        let result = Engine::default()
            .evaluate(&radiographic(Modality::CardiacAngiography, BarrierClass::Secondary))
            .unwrap();
        assert!(result.outcome.is_computed());
        assert!(result.thickness_mm > 0.0);
        assert_eq!(result.case, ImagingCategory::Specialized);
    }

    #[test]
    fn test_secondary_uses_unit_use_factor() {
        let result = Engine::default()
            .evaluate(&radiographic(Modality::RadRoomFloor, BarrierClass::Secondary))
            .unwrap();
        // 3.3e-2 · 1 · 100 / 4
        assert!((result.kerma_rate.unwrap() - 0.825).abs() < 1e-9);
        assert_eq!(result.trail.find("Use factor U").and_then(|e| e.number()), Some(1.0));
    }

    #[test]
    fn test_secondary_reports_every_component() {
        let result = Engine::default()
            .evaluate(&radiographic(Modality::CardiacAngiography, BarrierClass::Secondary))
            .unwrap();
        assert_eq!(result.components.len(), 3);
        let combined = result
            .components
            .iter()
            .find(|c| c.component == SecondaryKermaComponent::Combined)
            .unwrap();
        assert_eq!(combined.thickness_mm, result.thickness_mm);
        let leakage = result
            .components
            .iter()
            .find(|c| c.component == SecondaryKermaComponent::LeakageSide)
            .unwrap();
        // 2.7 < 3.8 mGy·m²/patient
        assert!(leakage.thickness_mm < combined.thickness_mm);
    }

    #[test]
    fn test_secondary_component_setting() {
        let settings = EngineSettings {
            secondary_component: SecondaryKermaComponent::LeakageSide,
            ..EngineSettings::default()
        };
        let engine = Engine::new(catalog::builtin(), settings).unwrap();
        let request = radiographic(Modality::CardiacAngiography, BarrierClass::Secondary);
        let leakage = engine.evaluate(&request).unwrap();
        let combined = Engine::default().evaluate(&request).unwrap();
        assert!(leakage.thickness_mm < combined.thickness_mm);
    }

    #[test]
    fn test_ct_primary_not_required() {
        let result = Engine::default().evaluate(&ct(BarrierClass::Primary)).unwrap();
        assert!(matches!(result.outcome, Outcome::NotRequired { .. }));
        assert_eq!(result.thickness_mm, 0.0);
        assert_eq!(result.kerma_rate, Some(0.0));
    }

    #[test]
    fn test_ct_secondary() {
        let result = Engine::default().evaluate(&ct(BarrierClass::Secondary)).unwrap();
        assert!(result.outcome.is_computed());
        assert!((result.kerma_rate.unwrap() - 40.5 / 16.0).abs() < 1e-9);
        assert_eq!(result.trail.find("K1sec(head)").and_then(|e| e.number()), Some(9.0e-5 * 1200.0));
        assert_eq!(
            result.trail.find("Attenuation fit").unwrap().value.to_string(),
            "ct-120kvp/lead/secondary"
        );
        assert!(result.thickness_mm > 0.0);
    }

    #[test]
    fn test_ct_with_no_procedures_is_an_error() {
        let mut request = ct(BarrierClass::Secondary);
        request.source = SourceSpec::ComputedTomography(CtSource {
            voltage: CtVoltage::Kvp140,
            head_procedures_per_week: 0.0,
            body_procedures_per_week: 0.0,
            contrast_factor: 1.0,
        });
        let err = Engine::default().evaluate(&request).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TRANSMISSION_INPUT");
    }

    #[test]
    fn test_tabulated_extrapolation_at_30_lengths() {
        // B⁻¹ = 100 · 1 · 5.2 / (P · 1²) = 1e30
        let mut request = tabulated(WallPosition::Floor, BarrierClass::Primary);
        request.design_goal = 5.2e-28;
        request.distance_m = 1.0;

        let result = Engine::default().evaluate(&request).unwrap();
        assert!((result.attenuation_lengths.unwrap() - 30.0).abs() < 1e-9);
        assert!(result.has_flag(TrailFlag::Extrapolated));
        assert_eq!(
            result.trail.find("Table region").unwrap().value.to_string(),
            "extrapolated beyond n = 26"
        );

        let table = catalog::builtin()
            .table(TableId::select(Material::Lead, BarrierClass::Primary, false), WallPosition::Floor)
            .unwrap();
        assert!(result.thickness_mm > table.thickness_mm[26]);
    }

    #[test]
    fn test_tabulated_interpolates_inside_range() {
        let result = Engine::default()
            .evaluate(&tabulated(WallPosition::ChestBucky, BarrierClass::Primary))
            .unwrap();
        // 100 · 2.3 / (0.02 · 4) = 2875
        assert!((result.attenuation_lengths.unwrap() - 2875f64.log10()).abs() < 1e-12);
        assert!(result.flags.is_empty());
        assert_eq!(
            result.trail.find("Thickness table").unwrap().value.to_string(),
            "lead/primary:chest-bucky"
        );
    }

    #[test]
    fn test_tabulated_below_range() {
        let mut request = tabulated(WallPosition::Floor, BarrierClass::Secondary);
        request.design_goal = 100.0;
        let result = Engine::default().evaluate(&request).unwrap();
        assert_eq!(result.thickness_mm, 0.0);
        assert!(result.has_flag(TrailFlag::BelowTableRange));
        assert!(result.trail.find("Table region").is_some());
    }

    #[test]
    fn test_tabulated_wall_fallback_is_flagged() {
        let result = Engine::default()
            .evaluate(&tabulated(WallPosition::CrossTableLateral, BarrierClass::Primary))
            .unwrap();
        assert!(result.has_flag(TrailFlag::WallPositionFallback));
        assert!(result.trail.find("Wall column").is_some());
        let floor = thickness(&tabulated(WallPosition::Floor, BarrierClass::Primary));
        assert_eq!(result.thickness_mm, floor);
    }

    #[test]
    fn test_tabulated_preshielded_variant_is_thinner() {
        let plain = tabulated(WallPosition::Floor, BarrierClass::Primary);
        let mut preshielded = plain.clone();
        preshielded.preshielding = Some(Preshielding::Category {
            category: PreshieldingCategory::TableHolder,
        });
        assert!(thickness(&preshielded) <= thickness(&plain));
    }

    #[test]
    fn test_tabulated_preshielding_credits_actual_thickness() {
        let plain = tabulated(WallPosition::Floor, BarrierClass::Primary);
        let x_plain = thickness(&plain);
        assert!(x_plain > 1.0);

        let mut none = plain.clone();
        none.preshielding = Some(Preshielding::Custom { thickness_mm: 0.0 });
        let result = Engine::default().evaluate(&none).unwrap();
        assert_eq!(result.thickness_mm, x_plain);
        assert_eq!(
            result.trail.find("Thickness table").unwrap().value.to_string(),
            "lead/primary:floor"
        );

        // Cross-table lateral is 0.3 mm lead, less than the 0.85 mm in the pre-shielded table
        let mut cross_table = plain.clone();
        cross_table.preshielding = Some(Preshielding::Category {
            category: PreshieldingCategory::CrossTableLateral,
        });
        let result = Engine::default().evaluate(&cross_table).unwrap();
        assert!((result.thickness_mm - (x_plain - 0.3)).abs() < 1e-9);
        assert_eq!(result.trail.find("Pre-shielding x_pre").unwrap().number(), Some(0.3));
        assert_eq!(
            result.trail.find("Thickness table").unwrap().value.to_string(),
            "lead/primary:floor"
        );

        let mut table_holder = plain.clone();
        table_holder.preshielding = Some(Preshielding::Category {
            category: PreshieldingCategory::TableHolder,
        });
        let result = Engine::default().evaluate(&table_holder).unwrap();
        assert_eq!(
            result.trail.find("Thickness table").unwrap().value.to_string(),
            "lead/primary-preshielded:floor"
        );
        assert!(result.thickness_mm < x_plain - 0.3);
    }

    #[test]
    fn test_engine_rejects_zero_sentinel() {
        let settings = EngineSettings {
            no_solution_mm: 0.0,
            ..EngineSettings::default()
        };
        let err = Engine::new(catalog::builtin(), settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_monotone_in_design_goal_distance_occupancy_and_workload() {
        let base = radiographic(Modality::RadRoomChestBucky, BarrierClass::Primary);
        let x0 = thickness(&base);

        let mut looser = base.clone();
        looser.design_goal = 0.1;
        assert!(thickness(&looser) <= x0);

        let mut farther = base.clone();
        farther.distance_m = 4.0;
        assert!(thickness(&farther) <= x0);

        let mut less_occupied = base.clone();
        less_occupied.occupancy = 0.25;
        assert!(thickness(&less_occupied) <= x0);

        let mut busier = base.clone();
        busier.source = SourceSpec::Radiographic(RadiographicSource {
            modality: Modality::RadRoomChestBucky,
            patients_per_week: 400.0,
            use_factor: 0.25,
            workload_per_patient: None,
        });
        assert!(thickness(&busier) >= x0);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let request = radiographic(Modality::RadiographicTubeRf, BarrierClass::Primary);
        let engine = Engine::default();
        let first = engine.evaluate(&request).unwrap();
        let second = engine.evaluate(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_preshielding_split_reduces_thickness() {
        let plain = radiographic(Modality::RadRoomFloor, BarrierClass::Primary);
        let mut preshielded = plain.clone();
        preshielded.preshielding = Some(Preshielding::Category {
            category: PreshieldingCategory::TableHolder,
        });

        let result = Engine::default().evaluate(&preshielded).unwrap();
        let b = result.transmission.unwrap();
        let b_net = result.net_transmission.unwrap();
        assert!(b_net > b);
        assert!(result.thickness_mm < thickness(&plain));
        assert!(result.trail.find("Pre-shielding transmission B_pre").is_some());
    }

    #[test]
    fn test_preshielding_subtraction_model() {
        let settings = EngineSettings {
            preshield_correction: PreshieldCorrection::ThicknessSubtraction,
            ..EngineSettings::default()
        };
        let engine = Engine::new(catalog::builtin(), settings).unwrap();

        let plain = radiographic(Modality::RadRoomFloor, BarrierClass::Primary);
        let mut preshielded = plain.clone();
        preshielded.preshielding = Some(Preshielding::Custom { thickness_mm: 0.85 });

        let x_ref = engine.evaluate(&plain).unwrap().thickness_mm;
        let x = engine.evaluate(&preshielded).unwrap().thickness_mm;
        assert!((x - (x_ref - 0.85)).abs() < 1e-9);

        preshielded.preshielding = Some(Preshielding::Custom { thickness_mm: 10.0 });
        assert_eq!(engine.evaluate(&preshielded).unwrap().thickness_mm, 0.0);
    }

    #[test]
    fn test_no_added_shielding_when_goal_already_met() {
        let mut request = radiographic(Modality::ChestRoom, BarrierClass::Secondary);
        request.design_goal = 1.0;
        let result = Engine::default().evaluate(&request).unwrap();
        assert_eq!(result.thickness_mm, 0.0);
        assert!(result.has_flag(TrailFlag::NoAddedShielding));
    }

    #[test]
    fn test_no_valid_solution_reports_sentinel() {
        let mut catalog = Catalog::ncrp147();
        let fit = catalog
            .fits
            .iter_mut()
            .find(|f| f.matches(FitSource::Modality(Modality::RadRoomFloor), Material::Lead, BarrierClass::Primary))
            .unwrap();
        // 1 + β/α < 0
        fit.beta = -2.0 * fit.alpha;

        let engine = Engine::new(&catalog, EngineSettings::default()).unwrap();
        let result = engine
            .evaluate(&radiographic(Modality::RadRoomFloor, BarrierClass::Primary))
            .unwrap();
        assert_eq!(result.outcome, Outcome::NoValidSolution);
        assert_eq!(result.thickness_mm, 999.0);
    }

    #[test]
    fn test_zero_design_goal_is_transmission_error() {
        let mut request = radiographic(Modality::RadRoomFloor, BarrierClass::Primary);
        request.design_goal = 0.0;
        let err = Engine::default().evaluate(&request).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TRANSMISSION_INPUT");
    }

    #[test]
    fn test_invalid_inputs() {
        let mut request = radiographic(Modality::RadRoomFloor, BarrierClass::Primary);
        request.distance_m = 0.0;
        assert_eq!(Engine::default().evaluate(&request).unwrap_err().error_code(), "INVALID_INPUT");

        let mut request = radiographic(Modality::RadRoomFloor, BarrierClass::Primary);
        request.occupancy = 1.5;
        assert_eq!(Engine::default().evaluate(&request).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_missing_catalog_data_is_unsupported() {
        let mut catalog = Catalog::ncrp147();
        catalog
            .fits
            .retain(|f| f.source != FitSource::CtVoltage(CtVoltage::Kvp120));
        let engine = Engine::new(&catalog, EngineSettings::default()).unwrap();

        let err = engine.evaluate(&ct(BarrierClass::Secondary)).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_COMBINATION");
        assert!(err.to_string().contains("ct-120kvp"));
    }

    #[test]
    fn test_workload_normalization() {
        let mut request = radiographic(Modality::RadRoomFloor, BarrierClass::Primary);
        request.source = SourceSpec::Radiographic(RadiographicSource {
            modality: Modality::RadRoomFloor,
            patients_per_week: 100.0,
            use_factor: 0.25,
            workload_per_patient: Some(3.8),
        });
        let result = Engine::default().evaluate(&request).unwrap();
        // W_site = 2 · W_norm doubles the kerma
        assert!((result.kerma_rate.unwrap() - 65.0).abs() < 1e-9);
        assert!(result.has_flag(TrailFlag::NonReferenceWorkload));
    }

    #[test]
    fn test_workload_scales_reported_component_kerma() {
        let mut request = radiographic(Modality::RadRoomFloor, BarrierClass::Secondary);
        request.source = SourceSpec::Radiographic(RadiographicSource {
            modality: Modality::RadRoomFloor,
            patients_per_week: 100.0,
            use_factor: 0.25,
            workload_per_patient: Some(3.8),
        });
        let result = Engine::default().evaluate(&request).unwrap();
        let profile = catalog::builtin().profile(Modality::RadRoomFloor).unwrap();
        for c in &result.components {
            let expected = 2.0 * profile.secondary_kerma(c.component);
            assert!((c.kerma_per_patient - expected).abs() < 1e-9, "{:?}", c.component);
        }
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "label": "Control booth",
            "source": { "kind": "computed-tomography", "voltage": "120kvp",
                        "head_procedures_per_week": 100, "body_procedures_per_week": 150 },
            "barrier": "secondary",
            "material": "lead",
            "design_goal": 0.02,
            "occupancy": 1.0,
            "distance_m": 4.0,
            "preshielding": { "kind": "category", "category": "table-holder" }
        }"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        match request.source {
            SourceSpec::ComputedTomography(src) => assert_eq!(src.contrast_factor, 1.0),
            other => panic!("unexpected source {:?}", other),
        }

        let result = Engine::default().evaluate(&request).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"]["status"], "computed");
        assert_eq!(json["case"], "computed-tomography");
    }
}
