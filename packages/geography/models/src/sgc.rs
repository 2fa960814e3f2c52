//! Standard Geographical Classification (SGC) lookups for the ten
//! Canadian provinces and three territories.

/// Two-digit SGC codes for every province and territory.
pub const PROVINCE_SGC: &[&str] = &[
    "10", "11", "12", "13", "24", "35", "46", "47", "48", "59", "60", "61", "62",
];

/// Returns the lowercase province id for an SGC code, or `"??"` if unknown.
#[must_use]
pub fn province_id(sgc: &str) -> &'static str {
    match sgc {
        "10" => "nl",
        "11" => "pe",
        "12" => "ns",
        "13" => "nb",
        "24" => "qc",
        "35" => "on",
        "46" => "mb",
        "47" => "sk",
        "48" => "ab",
        "59" => "bc",
        "60" => "yt",
        "61" => "nt",
        "62" => "nu",
        _ => "??",
    }
}

/// Returns the SGC code for a province id, case-insensitively.
#[must_use]
pub fn sgc_code(id: &str) -> Option<&'static str> {
    match id.to_lowercase().as_str() {
        "nl" => Some("10"),
        "pe" => Some("11"),
        "ns" => Some("12"),
        "nb" => Some("13"),
        "qc" => Some("24"),
        "on" => Some("35"),
        "mb" => Some("46"),
        "sk" => Some("47"),
        "ab" => Some("48"),
        "bc" => Some("59"),
        "yt" => Some("60"),
        "nt" => Some("61"),
        "nu" => Some("62"),
        _ => None,
    }
}

/// Returns the uppercase abbreviation used for chart axis labels, or
/// `"??"` if the province id is unknown.
#[must_use]
pub fn axis_abbr(id: &str) -> &'static str {
    match id.to_lowercase().as_str() {
        "ab" => "AB",
        "bc" => "BC",
        "mb" => "MB",
        "nb" => "NB",
        "nl" => "NL",
        "ns" => "NS",
        "nt" => "NT",
        "nu" => "NU",
        "on" => "ON",
        "pe" => "PE",
        "qc" => "QC",
        "sk" => "SK",
        "yt" => "YT",
        _ => "??",
    }
}

/// Resolves an official or display province name to its lowercase id.
///
/// Accepts the Statistics Canada spelling (`"Newfoundland and Labrador"`),
/// the display spelling (`"Newfoundland & Labrador"`), and the legacy
/// `"Yukon Territory"` form still found in some boundary files.
#[must_use]
pub fn id_for_name(name: &str) -> Option<&'static str> {
    match name {
        "Alberta" => Some("ab"),
        "British Columbia" => Some("bc"),
        "Manitoba" => Some("mb"),
        "New Brunswick" => Some("nb"),
        "Newfoundland and Labrador" | "Newfoundland & Labrador" => Some("nl"),
        "Northwest Territories" => Some("nt"),
        "Nova Scotia" => Some("ns"),
        "Nunavut" => Some("nu"),
        "Ontario" => Some("on"),
        "Prince Edward Island" => Some("pe"),
        "Quebec" => Some("qc"),
        "Saskatchewan" => Some("sk"),
        "Yukon" | "Yukon Territory" => Some("yt"),
        _ => None,
    }
}

/// Resolves a province field of any common spelling to its lowercase
/// id: a two-digit SGC code, a two-letter id in any case, or a name.
#[must_use]
pub fn resolve(field: &str) -> Option<&'static str> {
    let field = field.trim();

    if field.is_empty() {
        return None;
    }

    let id = province_id(field);
    if id != "??" {
        return Some(id);
    }

    if let Some(code) = sgc_code(field) {
        return Some(province_id(code));
    }

    id_for_name(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgc_count() {
        assert_eq!(PROVINCE_SGC.len(), 13);
    }

    #[test]
    fn id_roundtrip() {
        for sgc in PROVINCE_SGC {
            let id = province_id(sgc);
            assert_ne!(id, "??");
            assert_eq!(sgc_code(id), Some(*sgc));
        }
    }

    #[test]
    fn abbr_coverage() {
        for sgc in PROVINCE_SGC {
            assert_ne!(axis_abbr(province_id(sgc)), "??");
        }
    }

    #[test]
    fn unknown_sgc() {
        assert_eq!(province_id("99"), "??");
        assert_eq!(sgc_code("zz"), None);
        assert_eq!(axis_abbr("zz"), "??");
    }

    #[test]
    fn case_insensitive_sgc_code() {
        assert_eq!(sgc_code("AB"), Some("48"));
        assert_eq!(sgc_code("Ab"), Some("48"));
    }

    #[test]
    fn name_variants() {
        assert_eq!(id_for_name("Yukon"), Some("yt"));
        assert_eq!(id_for_name("Yukon Territory"), Some("yt"));
        assert_eq!(id_for_name("Newfoundland and Labrador"), Some("nl"));
        assert_eq!(id_for_name("Newfoundland & Labrador"), Some("nl"));
        assert_eq!(id_for_name("Acadia"), None);
    }

    #[test]
    fn resolve_accepts_code_id_and_name() {
        assert_eq!(resolve("48"), Some("ab"));
        assert_eq!(resolve("AB"), Some("ab"));
        assert_eq!(resolve(" Alberta "), Some("ab"));
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("Texas"), None);
    }
}
