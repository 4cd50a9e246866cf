//! Case types and the static case type to team type registry.
//!
//! The registry is a `const` match so lookups are compile-time tables rather
//! than maps rebuilt on every call.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TeamType;

/// Closed set of enforcement case types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    FlyTipping,
    FlyTippingPrivate,
    FlyTippingOrganised,
    AbandonedVehicle,
    Littering,
    DogFouling,
    PspoDogControl,
    UntidyLand,
    HighHedges,
    WasteCarrierLicensing,
    NuisanceVehicle,
    NuisanceVehicleSeller,
    ComplexEnvironmental,
}

/// Which detail section of the type-specific fields a case type accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    FlyTipping,
    AbandonedVehicle,
    Littering,
    DogFouling,
    Pspo,
    UntidyLand,
    HighHedges,
    WasteCarrier,
    NuisanceVehicle,
}

/// Reference prefix used when a case type has no dedicated code.
pub const FALLBACK_PREFIX: &str = "GE";

impl CaseType {
    /// Every case type, in registry order.
    pub const ALL: [CaseType; 13] = [
        Self::FlyTipping,
        Self::FlyTippingPrivate,
        Self::FlyTippingOrganised,
        Self::AbandonedVehicle,
        Self::Littering,
        Self::DogFouling,
        Self::PspoDogControl,
        Self::UntidyLand,
        Self::HighHedges,
        Self::WasteCarrierLicensing,
        Self::NuisanceVehicle,
        Self::NuisanceVehicleSeller,
        Self::ComplexEnvironmental,
    ];

    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FlyTipping => "fly_tipping",
            Self::FlyTippingPrivate => "fly_tipping_private",
            Self::FlyTippingOrganised => "fly_tipping_organised",
            Self::AbandonedVehicle => "abandoned_vehicle",
            Self::Littering => "littering",
            Self::DogFouling => "dog_fouling",
            Self::PspoDogControl => "pspo_dog_control",
            Self::UntidyLand => "untidy_land",
            Self::HighHedges => "high_hedges",
            Self::WasteCarrierLicensing => "waste_carrier_licensing",
            Self::NuisanceVehicle => "nuisance_vehicle",
            Self::NuisanceVehicleSeller => "nuisance_vehicle_seller",
            Self::ComplexEnvironmental => "complex_environmental",
        }
    }

    /// Dedicated two-letter reference code, if the type has one.
    pub const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::FlyTipping => Some("FT"),
            Self::FlyTippingPrivate => Some("FP"),
            Self::FlyTippingOrganised => Some("FO"),
            Self::AbandonedVehicle => Some("AV"),
            Self::Littering => Some("LT"),
            Self::DogFouling => Some("DF"),
            Self::PspoDogControl => Some("PS"),
            Self::UntidyLand => Some("UL"),
            Self::HighHedges => Some("HH"),
            Self::WasteCarrierLicensing => Some("WC"),
            Self::NuisanceVehicle => Some("NV"),
            Self::ComplexEnvironmental => Some("CE"),
            Self::NuisanceVehicleSeller => None,
        }
    }

    /// Prefix used in reference numbers, falling back to [`FALLBACK_PREFIX`].
    pub const fn reference_prefix(self) -> &'static str {
        match self.prefix() {
            Some(prefix) => prefix,
            None => FALLBACK_PREFIX,
        }
    }

    /// Team types eligible to handle this case type.
    pub const fn team_types(self) -> &'static [TeamType] {
        use TeamType::{Enforcement, EnvironmentalCrimes, WasteManagement};
        match self {
            Self::FlyTipping | Self::Littering => &[WasteManagement, Enforcement],
            Self::FlyTippingOrganised => &[Enforcement, EnvironmentalCrimes],
            Self::ComplexEnvironmental => &[EnvironmentalCrimes],
            Self::FlyTippingPrivate
            | Self::AbandonedVehicle
            | Self::DogFouling
            | Self::PspoDogControl
            | Self::UntidyLand
            | Self::HighHedges
            | Self::WasteCarrierLicensing
            | Self::NuisanceVehicle
            | Self::NuisanceVehicleSeller => &[Enforcement],
        }
    }

    /// Detail section accepted for this type, if any.
    pub const fn detail_kind(self) -> Option<DetailKind> {
        match self {
            Self::FlyTipping | Self::FlyTippingPrivate | Self::FlyTippingOrganised => {
                Some(DetailKind::FlyTipping)
            }
            Self::AbandonedVehicle => Some(DetailKind::AbandonedVehicle),
            Self::Littering => Some(DetailKind::Littering),
            Self::DogFouling => Some(DetailKind::DogFouling),
            Self::PspoDogControl => Some(DetailKind::Pspo),
            Self::UntidyLand => Some(DetailKind::UntidyLand),
            Self::HighHedges => Some(DetailKind::HighHedges),
            Self::WasteCarrierLicensing => Some(DetailKind::WasteCarrier),
            Self::NuisanceVehicle | Self::NuisanceVehicleSeller => {
                Some(DetailKind::NuisanceVehicle)
            }
            Self::ComplexEnvironmental => None,
        }
    }

    /// Fly-tipping variants accept a clearance outcome.
    pub const fn is_fly_tipping(self) -> bool {
        matches!(self.detail_kind(), Some(DetailKind::FlyTipping))
    }

    /// Human-readable label, e.g. `fly tipping private`.
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
