// ABOUTME: Option catalogs for record classification fields
// ABOUTME: Plant-to-validator routing table for PM review mail

/// Fixed choice lists offered by the record editor.
///
/// Catalogs are ordered the way they appear in the dropdowns; callers
/// should not sort them.
pub struct Options;

impl Options {
    pub const CATEGORY: [&'static str; 3] = ["Process & Maintenance", "Quality", "CIP"];

    pub const LLC_TYPE: [&'static str; 3] = ["Internal", "Customer", "Supplier"];

    pub const CUSTOMER: [&'static str; 12] = [
        "BOSCH",
        "VALEO",
        "DENSO",
        "BROSE",
        "MAHLE",
        "NIDEC",
        "BORGWARNER",
        "MARELLI",
        "VITESCO",
        "SEG AUTOMOTIVE",
        "JOHNSON ELECTRIC",
        "OTHER",
    ];

    pub const PRODUCT_FAMILY: [&'static str; 6] = [
        "Brush card",
        "Brush holder",
        "Choke",
        "Carbon brush",
        "Slip ring",
        "Assembly",
    ];

    pub const PRODUCT_TYPE: [&'static str; 5] = [
        "ABS",
        "EPS",
        "Fuel pump",
        "Starter",
        "Wiper",
    ];

    pub const QUALITY_DETECTION: [&'static str; 4] = [
        "Internal audit",
        "Customer complaint",
        "Production control",
        "Final inspection",
    ];

    pub const APPLICATION: [&'static str; 5] = [
        "Powertrain",
        "Chassis",
        "Body",
        "Thermal",
        "Other",
    ];

    pub const PRODUCT_LINE: [&'static str; 4] = [
        "PL1 - Brush cards",
        "PL2 - Carbon brushes",
        "PL3 - Chokes",
        "PL4 - Assemblies",
    ];

    pub const FAILURE_MODE: [&'static str; 6] = [
        "Dimensional",
        "Electrical",
        "Visual",
        "Material",
        "Functional",
        "Contamination",
    ];

    pub const PROCESS: [&'static str; 6] = [
        "Stamping",
        "Molding",
        "Welding",
        "Soldering",
        "Assembly",
        "Inspection",
    ];

    pub const ORIGIN: [&'static str; 5] = [
        "Design",
        "Process",
        "Supplier",
        "Handling",
        "Maintenance",
    ];
}

/// Routing table from plant to the project-manager validator notified
/// when a record is submitted for review.
const PLANT_VALIDATOR: [(&str, &str); 11] = [
    ("TEST Plant", "ons.ghariani@avocarbon.com"),
    ("FRANKFURT Plant", "dagmar.ansinn@avocarbon.com"),
    ("KUNSHAN Plant", "allan.riegel@avocarbon.com"),
    ("MONTERREY Plant", "hector.olivares@avocarbon.com"),
    ("CHENNAI Plant", "sridhar.b@avocarbon.com"),
    ("SCEET Plant", "imed.benalaya@avocarbon.com"),
    ("ANHUI Plant", "samtak.joo@avocarbon.com"),
    ("CYCLAM Plant", "florence.paradis@avocarbon.com"),
    ("TIANJIN Plant", "yang.yang@avocarbon.com"),
    ("SAME Plant", "salah.benachour@avocarbon.com"),
    ("POITIERS Plant", "sebastien.charpentier@avocarbon.com"),
];

/// Validator email for a plant, exact match only.
pub fn validator_for_plant(plant: &str) -> Option<&'static str> {
    PLANT_VALIDATOR
        .iter()
        .find(|(name, _)| *name == plant)
        .map(|(_, email)| *email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_plants_resolve_to_a_validator() {
        assert_eq!(
            validator_for_plant("SCEET Plant"),
            Some("imed.benalaya@avocarbon.com")
        );
        assert_eq!(
            validator_for_plant("TIANJIN Plant"),
            Some("yang.yang@avocarbon.com")
        );
    }

    #[test]
    fn unknown_or_mismatched_plants_resolve_to_none() {
        assert_eq!(validator_for_plant("MARS Plant"), None);
        assert_eq!(validator_for_plant("sceet plant"), None);
        assert_eq!(validator_for_plant(""), None);
    }
}
