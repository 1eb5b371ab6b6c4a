// 🏷️ Resolver Configuration - Tables as Data
// Every jurisdiction-tuned heuristic lives here so it can be swapped per county
// without touching parsing code.

use crate::affixes::{AffixClass, AffixEntry};
use crate::error::{ResolveError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// STRATEGY ENUMS
// ============================================================================

/// How to order the tokens of a comma-free person name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOrder {
    /// ALL-CAPS → LAST FIRST MIDDLE, anything else → FIRST MIDDLE LAST
    Auto,

    /// Tax-roll export convention: LAST FIRST MIDDLE
    LastFirst,

    /// Display convention: FIRST MIDDLE LAST
    FirstLast,
}

impl Default for NameOrder {
    fn default() -> Self {
        NameOrder::Auto
    }
}

/// What to do with a fragment that contains digits but no company keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitPolicy {
    /// Report `name_contains_digits` and emit nothing
    Reject,

    /// Emit the fragment as a Company and report `company_fallback`
    Company,
}

impl Default for DigitPolicy {
    fn default() -> Self {
        DigitPolicy::Reject
    }
}

// ============================================================================
// RESOLVER CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Relationship/legal phrases stripped before parsing (e.g. "ET AL", "C/O")
    pub noise_phrases: Vec<String>,

    /// Whole-word tokens/phrases that make a fragment a Company
    pub company_keywords: Vec<String>,

    /// Entity suffixes after which a bare number is an interest share, not a name
    pub company_suffixes: Vec<String>,

    /// Honorific prefixes and generational/professional suffixes
    pub affixes: Vec<AffixEntry>,

    /// Which suffix class wins when several trail a name (first = highest)
    pub suffix_priority: Vec<AffixClass>,

    /// Lowercase-able surname particles ("VAN", "DE") that bind to the surname
    pub surname_particles: Vec<String>,

    pub name_order: NameOrder,

    /// Treat "/" as a party separator (some counties use it for co-owners)
    pub split_on_slash: bool,

    pub digit_policy: DigitPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            noise_phrases: to_strings(&[
                "ET AL", "ETAL", "ET UX", "ETUX", "ET VIR", "ETVIR",
                "CO-TRUSTEES", "CO-TRUSTEE", "CO-TTEE",
                "TRUSTEES", "TRUSTEE", "TTEES", "TTEE",
                "U/A", "U/D/T", "UDT", "A/K/A", "AKA", "F/B/O", "FBO", "C/O",
                "H/W", "JTWROS", "JT TEN",
                "LIFE ESTATE", "LIFE EST", "L/E",
            ]),
            company_keywords: to_strings(&[
                // Entity suffixes
                "INC", "INCORPORATED", "LLC", "L.L.C.", "LLP", "PLLC", "CORP",
                "CORPORATION", "CO", "COMPANY", "LTD", "LIMITED", "LP", "L.P.",
                "PLC", "PA", "P.A.", "PC",
                // Trust / estate
                "TRUST", "TRUSTEE", "TRUSTEES", "ESTATE", "FOUNDATION",
                "REVOCABLE", "IRREVOCABLE",
                // Institutional
                "CHURCH", "MINISTRIES", "SCHOOL", "UNIVERSITY", "COLLEGE",
                "COUNTY", "CITY", "TOWN OF", "VILLAGE OF", "STATE OF",
                "AUTHORITY", "DISTRICT", "DEPARTMENT", "DEPT", "COMMISSION",
                "BOARD", "AGENCY", "UNITED STATES", "GOVERNMENT", "HOSPITAL",
                "ASSOCIATION", "ASSN", "HOA", "HOMEOWNERS", "CONDOMINIUM",
                "SOCIETY", "CLUB",
                // Commercial
                "HOLDINGS", "PROPERTIES", "PROPERTY", "REALTY", "INVESTMENTS",
                "INVESTORS", "PARTNERS", "PARTNERSHIP", "ENTERPRISES", "GROUP",
                "BANK", "MORTGAGE", "FINANCIAL", "CREDIT UNION", "SAVINGS",
                "DEVELOPMENT", "DEVELOPERS", "BUILDERS", "VENTURES", "CAPITAL",
                "FUND", "MANAGEMENT", "SERVICES", "HOUSING", "FARMS", "RANCH",
            ]),
            company_suffixes: to_strings(&[
                "INC", "LLC", "LLP", "PLLC", "CORP", "CO", "LTD", "LP", "PLC", "PA", "TRUST",
            ]),
            affixes: default_affixes(),
            suffix_priority: vec![
                AffixClass::Generational,
                AffixClass::Professional,
                AffixClass::Status,
            ],
            surname_particles: to_strings(&[
                "DE", "DEL", "DELA", "DELLA", "LA", "LE", "DA", "DI", "DOS", "DU",
                "VAN", "VON", "DER", "DEN", "ST", "BIN", "TER",
            ]),
            name_order: NameOrder::Auto,
            split_on_slash: true,
            digit_policy: DigitPolicy::Reject,
        }
    }
}

impl ResolverConfig {
    /// Load a jurisdiction tuning file (JSON). Missing fields keep defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse a tuning document from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ResolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder: add one more company keyword
    pub fn with_company_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.company_keywords.push(keyword.into());
        self
    }

    /// Builder: force a name-order strategy
    pub fn with_name_order(mut self, order: NameOrder) -> Self {
        self.name_order = order;
        self
    }

    /// Builder: choose the digit policy
    pub fn with_digit_policy(mut self, policy: DigitPolicy) -> Self {
        self.digit_policy = policy;
        self
    }

    /// Reject tables that would make the engine silently misbehave
    pub fn validate(&self) -> Result<()> {
        if let Some(entry) = self.affixes.iter().find(|a| a.canonical.trim().is_empty()) {
            return Err(ResolveError::Config(format!(
                "affix entry with aliases {:?} has an empty canonical form",
                entry.aliases
            )));
        }

        if self.company_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ResolveError::Config(
                "company_keywords contains an empty keyword".to_string(),
            ));
        }

        if self.noise_phrases.iter().any(|k| k.trim().is_empty()) {
            return Err(ResolveError::Config(
                "noise_phrases contains an empty phrase".to_string(),
            ));
        }

        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn affix(canonical: &str, class: AffixClass, aliases: &[&str]) -> AffixEntry {
    AffixEntry {
        canonical: canonical.to_string(),
        class,
        aliases: to_strings(aliases),
    }
}

fn default_affixes() -> Vec<AffixEntry> {
    use AffixClass::*;

    vec![
        // Honorific prefixes
        affix("Mr.", Honorific, &["MR", "MISTER"]),
        affix("Mrs.", Honorific, &["MRS"]),
        affix("Ms.", Honorific, &["MS"]),
        affix("Miss", Honorific, &["MISS"]),
        affix("Dr.", Honorific, &["DR", "DOCTOR"]),
        affix("Rev.", Honorific, &["REV", "REVEREND"]),
        affix("Capt.", Honorific, &["CAPT", "CAPTAIN"]),
        affix("Col.", Honorific, &["COL", "COLONEL"]),
        affix("Lt.", Honorific, &["LT", "LIEUTENANT"]),
        affix("Sgt.", Honorific, &["SGT", "SERGEANT"]),
        affix("Maj.", Honorific, &["MAJ"]),
        affix("Gen.", Honorific, &["GEN"]),
        affix("Adm.", Honorific, &["ADM"]),
        affix("Hon.", Honorific, &["HON", "HONORABLE"]),
        affix("Prof.", Honorific, &["PROF", "PROFESSOR"]),
        affix("Sir", Honorific, &["SIR"]),
        affix("Fr.", Honorific, &["FR"]),
        // Generational suffixes
        affix("Jr.", Generational, &["JR", "JUNIOR"]),
        affix("Sr.", Generational, &["SR", "SENIOR"]),
        affix("II", Generational, &["II", "2ND"]),
        affix("III", Generational, &["III", "3RD"]),
        affix("IV", Generational, &["IV", "4TH"]),
        // Professional suffixes
        affix("MD", Professional, &["MD", "M D"]),
        affix("PhD", Professional, &["PHD", "PH D"]),
        affix("Esq.", Professional, &["ESQ", "ESQUIRE"]),
        affix("DDS", Professional, &["DDS"]),
        affix("DVM", Professional, &["DVM"]),
        affix("CPA", Professional, &["CPA"]),
        affix("JD", Professional, &["JD"]),
        affix("RN", Professional, &["RN"]),
        // Status suffixes
        affix("Ret.", Status, &["RET", "RETIRED"]),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.name_order, NameOrder::Auto);
        assert_eq!(config.suffix_priority[0], AffixClass::Generational);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ResolverConfig::from_json_str(
            r#"{ "name_order": "first_last", "company_keywords": ["GMBH"] }"#,
        )
        .unwrap();

        assert_eq!(config.name_order, NameOrder::FirstLast);
        assert_eq!(config.company_keywords, vec!["GMBH".to_string()]);
        // Untouched tables fall back to defaults
        assert!(config.noise_phrases.iter().any(|p| p == "ET AL"));
        assert!(config.split_on_slash);
    }

    #[test]
    fn test_empty_canonical_rejected() {
        let result = ResolverConfig::from_json_str(
            r#"{ "affixes": [ { "canonical": " ", "class": "honorific", "aliases": ["X"] } ] }"#,
        );
        assert!(matches!(result, Err(ResolveError::Config(_))));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let result = ResolverConfig::from_json_str(r#"{ "name_order": 7 }"#);
        assert!(matches!(result, Err(ResolveError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "digit_policy": "company", "split_on_slash": false }}"#).unwrap();

        let config = ResolverConfig::from_file(file.path()).unwrap();
        assert_eq!(config.digit_policy, DigitPolicy::Company);
        assert!(!config.split_on_slash);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ResolverConfig::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(ResolveError::Io(_))));
    }

    #[test]
    fn test_builders() {
        let config = ResolverConfig::default()
            .with_company_keyword("GMBH")
            .with_name_order(NameOrder::LastFirst)
            .with_digit_policy(DigitPolicy::Company);

        assert!(config.company_keywords.iter().any(|k| k == "GMBH"));
        assert_eq!(config.name_order, NameOrder::LastFirst);
        assert_eq!(config.digit_policy, DigitPolicy::Company);
    }
}
