/// Resolves AIS ship type codes to human readable names.
pub trait ShipTypeLookup: Send + Sync {
    fn ship_type_name(&self, id: i64) -> Option<&str>;
}

/// The ship type table from ITU-R M.1371.
#[derive(Debug, Clone, Copy, Default)]
pub struct AisShipTypes;

static AIS_SHIP_TYPES: &[(i64, &str)] = &[
    (20, "Wing In Ground"),
    (29, "Wing In Ground (no other information)"),
    (30, "Fishing"),
    (31, "Towing"),
    (32, "Towing exceeds 200m or wider than 25m"),
    (33, "Engaged in dredging or underwater operations"),
    (34, "Engaged in diving operations"),
    (35, "Engaged in military operations"),
    (36, "Sailing"),
    (37, "Pleasure"),
    (40, "High speed craft"),
    (41, "High speed craft carrying dangerous goods"),
    (42, "High speed craft hazard cat B"),
    (43, "High speed craft hazard cat C"),
    (44, "High speed craft hazard cat D"),
    (49, "High speed craft (no additional information)"),
    (50, "Pilot vessel"),
    (51, "SAR"),
    (52, "Tug"),
    (53, "Port tender"),
    (54, "Anti-pollution"),
    (55, "Law enforcement"),
    (56, "Spare"),
    (57, "Spare #2"),
    (58, "Medical"),
    (59, "RR Resolution No.1"),
    (60, "Passenger ship"),
    (69, "Passenger ship (no additional information)"),
    (70, "Cargo ship"),
    (71, "Cargo ship carrying dangerous goods"),
    (72, "Cargo ship hazard cat B"),
    (73, "Cargo ship hazard cat C"),
    (74, "Cargo ship hazard cat D"),
    (79, "Cargo ship (no additional information)"),
    (80, "Tanker"),
    (81, "Tanker carrying dangerous goods"),
    (82, "Tanker hazard cat B"),
    (83, "Tanker hazard cat C"),
    (84, "Tanker hazard cat D"),
    (89, "Tanker (no additional information)"),
    (90, "Other"),
    (91, "Other carrying dangerous goods"),
    (92, "Other hazard cat B"),
    (93, "Other hazard cat C"),
    (94, "Other hazard cat D"),
    (99, "Other (no additional information)"),
];

impl ShipTypeLookup for AisShipTypes {
    fn ship_type_name(&self, id: i64) -> Option<&str> {
        AIS_SHIP_TYPES
            .binary_search_by_key(&id, |(code, _)| *code)
            .ok()
            .map(|idx| AIS_SHIP_TYPES[idx].1)
    }
}
