/// A selectable region. The code only ever appears inside prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub code: &'static str,
}

pub const DEFAULT_REGION: &str = "United States";
const FALLBACK_CODE: &str = "US";

pub const REGIONS: [Region; 10] = [
    Region { name: "United States", code: "US" },
    Region { name: "Global", code: "GLOBAL" },
    Region { name: "United Kingdom", code: "GB" },
    Region { name: "Canada", code: "CA" },
    Region { name: "Australia", code: "AU" },
    Region { name: "Germany", code: "DE" },
    Region { name: "France", code: "FR" },
    Region { name: "India", code: "IN" },
    Region { name: "Brazil", code: "BR" },
    Region { name: "Mexico", code: "MX" },
];

/// Short code for a display name; unknown names map to "US".
pub fn code_for(name: &str) -> &'static str {
    REGIONS
        .iter()
        .find(|r| r.name == name)
        .map(|r| r.code)
        .unwrap_or(FALLBACK_CODE)
}

/// Display names in the order the region picker shows them.
pub fn sorted_names() -> Vec<&'static str> {
    let mut names: Vec<_> = REGIONS.iter().map(|r| r.name).collect();
    names.sort_unstable();
    names
}
