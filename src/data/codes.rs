use std::fmt;

/// ISO 3166-1 alpha-3 country code, the key used by the map data.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CountryCode([u8; 3]);

impl CountryCode {
    /// Parse a 3-letter ASCII code, normalizing to uppercase.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    pub fn as_str(&self) -> &str {
        // Constructed from ASCII only
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (alpha-3, alpha-2, display name) for every country in the Europe map
/// data. The record set keys countries by alpha-2, the map by alpha-3;
/// this table bridges the two conventions.
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("ALB", "AL", "Albania"),
    ("AUT", "AT", "Austria"),
    ("BEL", "BE", "Belgium"),
    ("BGR", "BG", "Bulgaria"),
    ("BIH", "BA", "Bosnia and Herzegovina"),
    ("BLR", "BY", "Belarus"),
    ("CHE", "CH", "Switzerland"),
    ("CYP", "CY", "Cyprus"),
    ("CZE", "CZ", "Czechia"),
    ("DEU", "DE", "Germany"),
    ("DNK", "DK", "Denmark"),
    ("ESP", "ES", "Spain"),
    ("EST", "EE", "Estonia"),
    ("FIN", "FI", "Finland"),
    ("FRA", "FR", "France"),
    ("GBR", "GB", "United Kingdom"),
    ("GEO", "GE", "Georgia"),
    ("GRC", "GR", "Greece"),
    ("HRV", "HR", "Croatia"),
    ("HUN", "HU", "Hungary"),
    ("IRL", "IE", "Ireland"),
    ("ISL", "IS", "Iceland"),
    ("ITA", "IT", "Italy"),
    ("LTU", "LT", "Lithuania"),
    ("LUX", "LU", "Luxembourg"),
    ("LVA", "LV", "Latvia"),
    ("MDA", "MD", "Moldova"),
    ("MKD", "MK", "North Macedonia"),
    ("MLT", "MT", "Malta"),
    ("MNE", "ME", "Montenegro"),
    ("NLD", "NL", "Netherlands"),
    ("NOR", "NO", "Norway"),
    ("POL", "PL", "Poland"),
    ("PRT", "PT", "Portugal"),
    ("ROU", "RO", "Romania"),
    ("SRB", "RS", "Serbia"),
    ("SVK", "SK", "Slovakia"),
    ("SVN", "SI", "Slovenia"),
    ("SWE", "SE", "Sweden"),
    ("TUR", "TR", "Turkey"),
    ("UKR", "UA", "Ukraine"),
];

/// Countries outside the dashboard's EU scope. Their borders are hidden by
/// default and they are excluded from selection unless the non-EU layer is
/// toggled on. This is the one and only visibility mask.
const NON_EU: &[&str] = &[
    "ALB", "BLR", "BIH", "GEO", "ISL", "MKD", "MNE", "SRB", "TUR", "UKR",
];

/// The single country-visibility predicate: part of the dashboard's EU scope.
pub fn is_eu(code: CountryCode) -> bool {
    !NON_EU.iter().any(|c| *c == code.as_str())
}

/// Map a record's alpha-2 code to the map's alpha-3 code.
pub fn alpha2_to_alpha3(alpha2: &str) -> Option<CountryCode> {
    COUNTRIES
        .iter()
        .find(|(_, a2, _)| a2.eq_ignore_ascii_case(alpha2))
        .and_then(|(a3, _, _)| CountryCode::parse(a3))
}

/// Display name for a country, falling back to the raw code.
pub fn display_name(code: CountryCode) -> &'static str {
    COUNTRIES
        .iter()
        .find(|(a3, _, _)| *a3 == code.as_str())
        .map(|(_, _, name)| *name)
        .unwrap_or("Unknown")
}
