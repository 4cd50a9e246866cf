//! Per-case-type detail sections and the tagged union that holds them.
//!
//! On the wire the type-specific fields keep their historical object shape,
//! one optional key per section plus `clearance_outcome`. Internally at most
//! one section is populated; [`TypeSpecificFields`] enforces that while
//! deserialising and the lifecycle checks the section against the case type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::case_type::DetailKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WasteType {
    Household,
    Commercial,
    Construction,
    Mixed,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaxMotStatus {
    Valid,
    Taxed,
    Untaxed,
    Expired,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCondition {
    Good,
    Damaged,
    Vandalised,
    BurntOut,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LitterType {
    CigaretteEnd,
    FoodPackaging,
    GeneralWaste,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PspoBreachType {
    DogsOffLead,
    DogExclusionZone,
    FailureToPickUp,
    ExceedingDogLimit,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum YesNoUnknown {
    Yes,
    No,
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VehicleDetails {
    pub registration_number: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub colour: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FlyTippingDetails {
    pub waste_description: Option<String>,
    pub estimated_quantity: Option<String>,
    pub waste_type: Option<WasteType>,
    pub offender_witnessed: Option<bool>,
    pub offender_description: Option<String>,
    pub vehicle_details: Option<VehicleDetails>,
    pub identifying_evidence: Option<String>,
    pub no_evidence_available: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AbandonedVehicleDetails {
    pub registration_number: Option<String>,
    pub registration_not_visible: Option<bool>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub colour: Option<String>,
    pub tax_status: Option<TaxMotStatus>,
    pub mot_status: Option<TaxMotStatus>,
    pub condition: Option<VehicleCondition>,
    pub estimated_time_at_location: Option<String>,
    pub causing_obstruction: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LitteringDetails {
    pub litter_type: Option<LitterType>,
    pub offence_witnessed: Option<bool>,
    pub offender_description: Option<String>,
    pub supporting_evidence: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DogFoulingDetails {
    pub occurrence_datetime: Option<String>,
    pub repeat_occurrence: Option<YesNoUnknown>,
    pub offender_description: Option<String>,
    pub dog_description: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PspoDetails {
    pub breach_nature: Option<PspoBreachType>,
    pub location_within_area: Option<String>,
    pub signage_present: Option<YesNoUnknown>,
    pub exemptions_claimed: Option<String>,
    pub officer_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UntidyLandDetails {
    pub land_type: Option<String>,
    pub land_ownership: Option<String>,
    #[serde(default)]
    pub issues_identified: Vec<String>,
    pub previous_notices: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HighHedgesDetails {
    pub hedge_type: Option<String>,
    pub hedge_height_meters: Option<f64>,
    pub affected_property: Option<String>,
    pub previous_complaints: Option<bool>,
    pub mediation_attempted: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WasteCarrierDetails {
    pub business_name: Option<String>,
    pub carrier_license_number: Option<String>,
    pub license_status: Option<String>,
    pub vehicle_registration: Option<String>,
    pub breach_details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NuisanceVehicleDetails {
    pub vehicle_registration: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_colour: Option<String>,
    pub nuisance_type: Option<String>,
    pub business_activity: Option<String>,
    pub location_frequency: Option<String>,
    pub obstruction_caused: Option<bool>,
}

/// Waste-management clearance record, valid on fly-tipping cases only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClearanceOutcome {
    pub items_cleared: bool,
    pub clearance_date: Option<NaiveDate>,
    pub disposal_method: Option<String>,
    /// Required and non-blank when `items_cleared` is false.
    pub reason_not_cleared: Option<String>,
}

impl ClearanceOutcome {
    /// Whether the outcome carries the mandatory reason when nothing was cleared.
    pub fn is_complete(&self) -> bool {
        self.items_cleared
            || self
                .reason_not_cleared
                .as_deref()
                .is_some_and(|reason| !reason.trim().is_empty())
    }
}

/// Exactly one detail section.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseDetails {
    FlyTipping(FlyTippingDetails),
    AbandonedVehicle(AbandonedVehicleDetails),
    Littering(LitteringDetails),
    DogFouling(DogFoulingDetails),
    Pspo(PspoDetails),
    UntidyLand(UntidyLandDetails),
    HighHedges(HighHedgesDetails),
    WasteCarrier(WasteCarrierDetails),
    NuisanceVehicle(NuisanceVehicleDetails),
}

impl CaseDetails {
    pub const fn kind(&self) -> DetailKind {
        match self {
            Self::FlyTipping(_) => DetailKind::FlyTipping,
            Self::AbandonedVehicle(_) => DetailKind::AbandonedVehicle,
            Self::Littering(_) => DetailKind::Littering,
            Self::DogFouling(_) => DetailKind::DogFouling,
            Self::Pspo(_) => DetailKind::Pspo,
            Self::UntidyLand(_) => DetailKind::UntidyLand,
            Self::HighHedges(_) => DetailKind::HighHedges,
            Self::WasteCarrier(_) => DetailKind::WasteCarrier,
            Self::NuisanceVehicle(_) => DetailKind::NuisanceVehicle,
        }
    }
}

/// Type-specific fields attached to a case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TypeSpecificFieldsWire", into = "TypeSpecificFieldsWire")]
pub struct TypeSpecificFields {
    pub details: Option<CaseDetails>,
    pub clearance_outcome: Option<ClearanceOutcome>,
}

impl TypeSpecificFields {
    pub fn is_empty(&self) -> bool {
        self.details.is_none() && self.clearance_outcome.is_none()
    }

    /// Overlay the sections present in `patch` onto `self`.
    pub fn merge(&mut self, patch: TypeSpecificFields) {
        if let Some(details) = patch.details {
            self.details = Some(details);
        }
        if let Some(outcome) = patch.clearance_outcome {
            self.clearance_outcome = Some(outcome);
        }
    }
}

/// Wire shape of [`TypeSpecificFields`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TypeSpecificFieldsWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fly_tipping: Option<FlyTippingDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abandoned_vehicle: Option<AbandonedVehicleDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub littering: Option<LitteringDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dog_fouling: Option<DogFoulingDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pspo_dog_control: Option<PspoDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub untidy_land: Option<UntidyLandDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_hedges: Option<HighHedgesDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_carrier: Option<WasteCarrierDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nuisance_vehicle: Option<NuisanceVehicleDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance_outcome: Option<ClearanceOutcome>,
}

/// Raised when more than one detail section is supplied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("type_specific_fields may contain at most one detail section, found {count}")]
pub struct MultipleDetailSections {
    pub count: usize,
}

impl TryFrom<TypeSpecificFieldsWire> for TypeSpecificFields {
    type Error = MultipleDetailSections;

    fn try_from(wire: TypeSpecificFieldsWire) -> Result<Self, Self::Error> {
        let TypeSpecificFieldsWire {
            fly_tipping,
            abandoned_vehicle,
            littering,
            dog_fouling,
            pspo_dog_control,
            untidy_land,
            high_hedges,
            waste_carrier,
            nuisance_vehicle,
            clearance_outcome,
        } = wire;
        let sections: Vec<CaseDetails> = [
            fly_tipping.map(CaseDetails::FlyTipping),
            abandoned_vehicle.map(CaseDetails::AbandonedVehicle),
            littering.map(CaseDetails::Littering),
            dog_fouling.map(CaseDetails::DogFouling),
            pspo_dog_control.map(CaseDetails::Pspo),
            untidy_land.map(CaseDetails::UntidyLand),
            high_hedges.map(CaseDetails::HighHedges),
            waste_carrier.map(CaseDetails::WasteCarrier),
            nuisance_vehicle.map(CaseDetails::NuisanceVehicle),
        ]
        .into_iter()
        .flatten()
        .collect();
        if sections.len() > 1 {
            return Err(MultipleDetailSections {
                count: sections.len(),
            });
        }
        Ok(Self {
            details: sections.into_iter().next(),
            clearance_outcome,
        })
    }
}

impl From<TypeSpecificFields> for TypeSpecificFieldsWire {
    fn from(fields: TypeSpecificFields) -> Self {
        let mut wire = Self {
            clearance_outcome: fields.clearance_outcome,
            ..Self::default()
        };
        match fields.details {
            Some(CaseDetails::FlyTipping(d)) => wire.fly_tipping = Some(d),
            Some(CaseDetails::AbandonedVehicle(d)) => wire.abandoned_vehicle = Some(d),
            Some(CaseDetails::Littering(d)) => wire.littering = Some(d),
            Some(CaseDetails::DogFouling(d)) => wire.dog_fouling = Some(d),
            Some(CaseDetails::Pspo(d)) => wire.pspo_dog_control = Some(d),
            Some(CaseDetails::UntidyLand(d)) => wire.untidy_land = Some(d),
            Some(CaseDetails::HighHedges(d)) => wire.high_hedges = Some(d),
            Some(CaseDetails::WasteCarrier(d)) => wire.waste_carrier = Some(d),
            Some(CaseDetails::NuisanceVehicle(d)) => wire.nuisance_vehicle = Some(d),
            None => {}
        }
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn parses_single_section_with_clearance() {
        let fields: TypeSpecificFields = serde_json::from_value(json!({
            "fly_tipping": {"waste_type": "household"},
            "clearance_outcome": {"items_cleared": true, "clearance_date": "2026-01-15"}
        }))
        .expect("valid fields");
        assert_eq!(
            fields.details.as_ref().map(CaseDetails::kind),
            Some(DetailKind::FlyTipping)
        );
        assert!(fields.clearance_outcome.is_some());
    }

    #[test]
    fn rejects_two_sections() {
        let result: Result<TypeSpecificFields, _> = serde_json::from_value(json!({
            "fly_tipping": {},
            "littering": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn serialises_back_to_keyed_shape() {
        let fields = TypeSpecificFields {
            details: Some(CaseDetails::HighHedges(HighHedgesDetails {
                hedge_height_meters: Some(5.5),
                ..HighHedgesDetails::default()
            })),
            clearance_outcome: None,
        };
        let value = serde_json::to_value(fields).expect("serialise");
        assert_eq!(value["high_hedges"]["hedge_height_meters"], json!(5.5));
        assert!(value.get("clearance_outcome").is_none());
    }

    #[rstest]
    #[case(true, None, true)]
    #[case(false, None, false)]
    #[case(false, Some("  "), false)]
    #[case(false, Some("Access blocked by vehicle"), true)]
    fn clearance_completeness(
        #[case] items_cleared: bool,
        #[case] reason: Option<&str>,
        #[case] expected: bool,
    ) {
        let outcome = ClearanceOutcome {
            items_cleared,
            clearance_date: None,
            disposal_method: None,
            reason_not_cleared: reason.map(str::to_owned),
        };
        assert_eq!(outcome.is_complete(), expected);
    }

    #[test]
    fn merge_keeps_details_when_only_clearance_is_patched() {
        let mut current = TypeSpecificFields {
            details: Some(CaseDetails::FlyTipping(FlyTippingDetails::default())),
            clearance_outcome: None,
        };
        current.merge(TypeSpecificFields {
            details: None,
            clearance_outcome: Some(ClearanceOutcome {
                items_cleared: true,
                clearance_date: None,
                disposal_method: Some("Recycled".into()),
                reason_not_cleared: None,
            }),
        });
        assert!(current.details.is_some());
        assert!(current.clearance_outcome.is_some());
    }
}
