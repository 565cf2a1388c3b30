//! Built-in RPD relationships
//!
//! Each relationship pairs the collection that owns an id with every field in the
//! RPD that may reference it. Referencing fields are optional almost everywhere, so
//! most paths match nothing in a given document.

use std::sync::OnceLock;

use serde_json::Value;

use super::{check_references, CheckDefinition};

const HVAC_ID_PATHS: &[&str] = &[
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].heating_ventilating_air_conditioning_systems[*].id",
];

const HVAC_REFERENCE_PATHS: &[&str] = &[
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].terminals[*].served_by_heating_ventilating_air_conditioning_system",
];

const ZONE_ID_PATHS: &[&str] = &[
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].id",
];

const ZONE_REFERENCE_PATHS: &[&str] = &[
    "$.ruleset_model_descriptions[*].buildings[*].elevators[*].motor_location_zone",
    "$.ruleset_model_descriptions[*].buildings[*].elevators[*].cab_location_zone",
    "$.ruleset_model_descriptions[*].buildings[*].refrigerated_cases[*].zone",
    "$.ruleset_model_descriptions[*].service_water_heating_equipment[*].compressor_zone",
    "$.ruleset_model_descriptions[*].service_water_heating_equipment[*].compressor_heat_rejection_zone",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].zonal_exhaust_fan.motor_location_zone",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].terminals[*].fan.motor_location_zone",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].heating_ventilating_air_conditioning_systems[*].fan_system.supply_fans[*].motor_location_zone",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].heating_ventilating_air_conditioning_systems[*].fan_system.return_fans[*].motor_location_zone",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].heating_ventilating_air_conditioning_systems[*].fan_system.relief_fans[*].motor_location_zone",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].heating_ventilating_air_conditioning_systems[*].fan_system.exhaust_fans[*].motor_location_zone",
    "$.ruleset_model_descriptions[*].service_water_heating_equipment[*].tank.location_zone",
    "$.ruleset_model_descriptions[*].service_water_heating_equipment[*].solar_thermal_systems[*].tank.location_zone",
    "$.ruleset_model_descriptions[*].service_water_heating_distribution_systems[*].tanks[*].location_zone",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].surfaces[*].adjacent_zone",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].transfer_airflow_source_zone",
    "$.ruleset_model_descriptions[*].service_water_heating_distribution_systems[*].service_water_piping[*].location_zone",
];

const FLUID_LOOP_ID_PATHS: &[&str] = &[
    "$.ruleset_model_descriptions[*].fluid_loops[*].id",
    "$.ruleset_model_descriptions[*].fluid_loops[*].child_loops[*].id",
];

// Water heater loops are listed twice, so a dangling one is reported twice.
const FLUID_LOOP_REFERENCE_PATHS: &[&str] = &[
    "$.ruleset_model_descriptions[*].chillers[*].cooling_loop",
    "$.ruleset_model_descriptions[*].chillers[*].condensing_loop",
    "$.ruleset_model_descriptions[*].chillers[*].heat_recovery_loop",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].heating_ventilating_air_conditioning_systems[*].heating_system.hot_water_loop",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].heating_ventilating_air_conditioning_systems[*].heating_system.water_source_heat_pump_loop",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].heating_ventilating_air_conditioning_systems[*].cooling_system.chilled_water_loop",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].heating_ventilating_air_conditioning_systems[*].cooling_system.condenser_water_loop",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].spaces[*].miscellaneous_equipment[*].energy_from_loop",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].spaces[*].miscellaneous_equipment[*].remaining_fraction_to_loop",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].terminals[*].cooling_from_loop",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].terminals[*].heating_from_loop",
    "$.ruleset_model_descriptions[*].service_water_heating_equipment[*].hot_water_loop",
    "$.ruleset_model_descriptions[*].heat_rejections[*].loop",
    "$.ruleset_model_descriptions[*].boilers[*].loop",
    "$.ruleset_model_descriptions[*].service_water_heating_equipment[*].hot_water_loop",
    "$.ruleset_model_descriptions[*].external_fluid_sources[*].loop",
];

const SCHEDULE_ID_PATHS: &[&str] = &["$.ruleset_model_descriptions[*].schedules[*].id"];

// The fan system schedules sit under a top-level collection RPDs do not have, so they
// never match HVAC systems nested in building segments.
const SCHEDULE_REFERENCE_PATHS: &[&str] = &[
    "$.ruleset_model_descriptions[*].buildings[*].elevators[*].cab_motor_multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].elevators[*].cab_ventilation_fan_multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].elevators[*].cab_lighting_multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].refrigerated_cases[*].power_multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].exterior_lighting[*].multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].infiltration.multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].thermostat_cooling_setpoint_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].thermostat_heating_setpoint_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].minimum_humidity_setpoint_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].maximum_humidity_setpoint_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].exhaust_airflow_rate_multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].spaces[*].occupant_multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].spaces[*].interior_lighting[*].lighting_multiplier_schedule",
    "$.ruleset_model_descriptions[*].service_water_heating_distribution_systems[*].flow_multiplier_schedule",
    "$.ruleset_model_descriptions[*].service_water_heating_distribution_systems[*].entering_water_mains_temperature_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].spaces[*].service_water_heating_uses[*].use_multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_open_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].terminals[*].minimum_outdoor_airflow_multiplier_schedule",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].spaces[*].miscellaneous_equipment[*].multiplier_schedule",
    "$.ruleset_model_descriptions[*].fluid_loops[*].cooling_or_condensing_design_and_control.operation_schedule",
    "$.ruleset_model_descriptions[*].fluid_loops[*].heating_design_and_control.operation_schedule",
    "$.ruleset_model_descriptions[*].fluid_loops[*].child_loops[*].cooling_or_condensing_design_and_control.operation_schedule",
    "$.ruleset_model_descriptions[*].fluid_loops[*].child_loops[*].heating_design_and_control.operation_schedule",
    "$.ruleset_model_descriptions[*].heating_ventilation_air_conditioning_systems[*].fan_system.supply_air_temperature_reset_schedule",
    "$.ruleset_model_descriptions[*].heating_ventilation_air_conditioning_systems[*].fan_system.operating_schedule",
];

const FLUID_LOOP_OR_PIPING_ID_PATHS: &[&str] = &[
    "$.ruleset_model_descriptions[*].fluid_loops[*].id",
    "$.ruleset_model_descriptions[*].service_water_heating_distribution_systems[*].service_water_piping[*].id",
    "$.ruleset_model_descriptions[*].fluid_loops[*].child_loops[*].id",
];

const FLUID_LOOP_OR_PIPING_REFERENCE_PATHS: &[&str] =
    &["$.ruleset_model_descriptions[*].pumps[*].loop_or_piping"];

const SERVICE_WATER_HEATING_ID_PATHS: &[&str] =
    &["$.ruleset_model_descriptions[*].service_water_heating_distribution_systems[*].id"];

const SERVICE_WATER_HEATING_REFERENCE_PATHS: &[&str] = &[
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].spaces[*].service_water_heating_uses[*].served_by_distribution_system",
    "$.ruleset_model_descriptions[*].buildings[*].building_segments[*].zones[*].served_by_service_water_heating_system",
    "$.ruleset_model_descriptions[*].service_water_heating_equipment[*].distribution_system",
];

/// The relationships checked in every RPD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Association {
    /// Terminals -> HVAC systems
    Hvac,
    /// Fans, tanks, surfaces, elevators ... -> zones
    Zone,
    /// Plant equipment and terminals -> fluid loops
    FluidLoop,
    /// Anything with a multiplier or setpoint schedule -> schedules
    Schedule,
    /// Pumps -> fluid loops or service water piping
    FluidLoopOrPiping,
    /// Water uses and heaters -> service water heating distribution systems
    ServiceWaterHeating,
}

impl Association {
    /// All relationships, in reporting order
    pub const ALL: [Association; 6] = [
        Association::Hvac,
        Association::Zone,
        Association::FluidLoop,
        Association::Schedule,
        Association::FluidLoopOrPiping,
        Association::ServiceWaterHeating,
    ];

    /// Stable name of the relationship
    pub fn name(&self) -> &'static str {
        match self {
            Association::Hvac => "hvac_association",
            Association::Zone => "zone_association",
            Association::FluidLoop => "fluid_loop_association",
            Association::Schedule => "schedule_association",
            Association::FluidLoopOrPiping => "fluid_loop_or_piping_association",
            Association::ServiceWaterHeating => "service_water_heating_association",
        }
    }

    fn paths(&self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            Association::Hvac => (HVAC_ID_PATHS, HVAC_REFERENCE_PATHS),
            Association::Zone => (ZONE_ID_PATHS, ZONE_REFERENCE_PATHS),
            Association::FluidLoop => (FLUID_LOOP_ID_PATHS, FLUID_LOOP_REFERENCE_PATHS),
            Association::Schedule => (SCHEDULE_ID_PATHS, SCHEDULE_REFERENCE_PATHS),
            Association::FluidLoopOrPiping => {
                (FLUID_LOOP_OR_PIPING_ID_PATHS, FLUID_LOOP_OR_PIPING_REFERENCE_PATHS)
            }
            Association::ServiceWaterHeating => {
                (SERVICE_WATER_HEATING_ID_PATHS, SERVICE_WATER_HEATING_REFERENCE_PATHS)
            }
        }
    }

    /// The parsed definition of this relationship
    pub fn definition(&self) -> &'static CheckDefinition {
        static DEFINITIONS: OnceLock<Vec<CheckDefinition>> = OnceLock::new();

        let definitions = DEFINITIONS.get_or_init(|| {
            Association::ALL
                .iter()
                .map(|association| {
                    let (ids, references) = association.paths();
                    CheckDefinition::new(association.name(), ids, references)
                        .expect("built-in association paths are well-formed")
                })
                .collect()
        });

        &definitions[self.index()]
    }

    fn index(&self) -> usize {
        match self {
            Association::Hvac => 0,
            Association::Zone => 1,
            Association::FluidLoop => 2,
            Association::Schedule => 3,
            Association::FluidLoopOrPiping => 4,
            Association::ServiceWaterHeating => 5,
        }
    }

    /// Referenced ids that do not exist in the document
    pub fn check<'a>(&self, document: &'a Value) -> Vec<&'a Value> {
        check_references(self.definition(), document)
    }
}

/// HVAC systems referenced by terminals that are not defined
pub fn check_hvac_association(document: &Value) -> Vec<&Value> {
    Association::Hvac.check(document)
}

/// Zones referenced anywhere that are not defined
pub fn check_zone_association(document: &Value) -> Vec<&Value> {
    Association::Zone.check(document)
}

/// Fluid loops referenced anywhere that are not defined (top-level or child loops)
pub fn check_fluid_loop_association(document: &Value) -> Vec<&Value> {
    Association::FluidLoop.check(document)
}

/// Schedules referenced anywhere that are not defined
pub fn check_schedule_association(document: &Value) -> Vec<&Value> {
    Association::Schedule.check(document)
}

/// Pump `loop_or_piping` values matching neither a fluid loop nor service water piping
pub fn check_fluid_loop_or_piping_association(document: &Value) -> Vec<&Value> {
    Association::FluidLoopOrPiping.check(document)
}

/// Service water heating distribution systems referenced but not defined
pub fn check_service_water_heating_association(document: &Value) -> Vec<&Value> {
    Association::ServiceWaterHeating.check(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rpd_with_terminal(served_by: &str, systems: Value) -> Value {
        json!({
            "id": "project",
            "ruleset_model_descriptions": [{
                "id": "rmd",
                "buildings": [{
                    "id": "bldg",
                    "building_segments": [{
                        "id": "seg",
                        "heating_ventilating_air_conditioning_systems": systems,
                        "zones": [{
                            "id": "zone-1",
                            "terminals": [{
                                "id": "term-1",
                                "served_by_heating_ventilating_air_conditioning_system": served_by
                            }]
                        }]
                    }]
                }]
            }]
        })
    }

    #[test]
    fn test_every_builtin_definition_parses() {
        for association in Association::ALL {
            let definition = association.definition();
            assert_eq!(definition.name(), association.name());
            assert!(!definition.primary_paths().is_empty());
            assert!(!definition.reference_paths().is_empty());
        }
    }

    #[test]
    fn test_missing_hvac_system_is_reported() {
        let doc = rpd_with_terminal("sys-9", json!([]));
        assert_eq!(check_hvac_association(&doc), vec![&json!("sys-9")]);

        let fixed = rpd_with_terminal("sys-9", json!([{"id": "sys-9"}]));
        assert!(check_hvac_association(&fixed).is_empty());
    }

    #[test]
    fn test_child_loops_count_as_fluid_loops() {
        let doc = json!({
            "ruleset_model_descriptions": [{
                "fluid_loops": [{"id": "chw", "child_loops": [{"id": "chw-secondary"}]}],
                "boilers": [{"id": "b1", "loop": "hw"}],
                "chillers": [{"id": "ch1", "cooling_loop": "chw-secondary", "condensing_loop": "cw"}]
            }]
        });
        assert_eq!(check_fluid_loop_association(&doc), vec![&json!("cw"), &json!("hw")]);
    }

    #[test]
    fn test_pumps_may_reference_piping() {
        let doc = json!({
            "ruleset_model_descriptions": [{
                "fluid_loops": [{"id": "hw"}],
                "service_water_heating_distribution_systems": [{
                    "id": "swh",
                    "service_water_piping": [{"id": "pipe-1"}]
                }],
                "pumps": [
                    {"id": "p1", "loop_or_piping": "hw"},
                    {"id": "p2", "loop_or_piping": "pipe-1"},
                    {"id": "p3", "loop_or_piping": "pipe-2"}
                ]
            }]
        });
        assert_eq!(check_fluid_loop_or_piping_association(&doc), vec![&json!("pipe-2")]);
    }

    #[test]
    fn test_schedule_and_zone_references() {
        let doc = json!({
            "ruleset_model_descriptions": [{
                "schedules": [{"id": "always-on"}],
                "buildings": [{
                    "id": "bldg",
                    "building_open_schedule": "office-hours",
                    "building_segments": [{
                        "zones": [{
                            "id": "z1",
                            "thermostat_cooling_setpoint_schedule": "always-on",
                            "transfer_airflow_source_zone": "z2"
                        }]
                    }]
                }]
            }]
        });
        assert_eq!(check_schedule_association(&doc), vec![&json!("office-hours")]);
        assert_eq!(check_zone_association(&doc), vec![&json!("z2")]);
    }

    #[test]
    fn test_dangling_water_heater_loop_reported_per_path() {
        let doc = json!({
            "ruleset_model_descriptions": [{
                "fluid_loops": [{"id": "hw"}],
                "service_water_heating_equipment": [{"id": "wh1", "hot_water_loop": "ghost"}]
            }]
        });
        assert_eq!(check_fluid_loop_association(&doc), vec![&json!("ghost"), &json!("ghost")]);
    }

    #[test]
    fn test_segment_fan_system_schedules_are_not_checked() {
        let doc = json!({
            "ruleset_model_descriptions": [{
                "schedules": [],
                "buildings": [{
                    "id": "bldg",
                    "building_segments": [{
                        "id": "seg",
                        "heating_ventilating_air_conditioning_systems": [{
                            "id": "sys-1",
                            "fan_system": {
                                "operating_schedule": "ghost-sched",
                                "supply_air_temperature_reset_schedule": "ghost-reset"
                            }
                        }]
                    }]
                }]
            }]
        });
        assert!(check_schedule_association(&doc).is_empty());

        let top_level = json!({
            "ruleset_model_descriptions": [{
                "heating_ventilation_air_conditioning_systems": [{
                    "fan_system": {"operating_schedule": "ghost-sched"}
                }]
            }]
        });
        assert_eq!(check_schedule_association(&top_level), vec![&json!("ghost-sched")]);
    }

    #[test]
    fn test_service_water_heating_references() {
        let doc = json!({
            "ruleset_model_descriptions": [{
                "service_water_heating_distribution_systems": [{"id": "dhw"}],
                "service_water_heating_equipment": [
                    {"id": "wh1", "distribution_system": "dhw"},
                    {"id": "wh2", "distribution_system": "dhw-2"}
                ]
            }]
        });
        assert_eq!(check_service_water_heating_association(&doc), vec![&json!("dhw-2")]);
    }

    #[test]
    fn test_empty_document_passes_every_check() {
        let doc = json!({});
        for association in Association::ALL {
            assert!(association.check(&doc).is_empty());
        }
    }
}
