// 📄 Document Contract - What the scraping side hands us, and what we hand back
//
// Input (camelCase as scrapers emit it; snake_case accepted too):
//   {
//     "currentOwnerRaw": ["SMITH JOHN & MARY", {"name": "ACME LLC", "mailing_address": "PO BOX 1"}],
//     "salesByDate": {"2020-05-01": ["DOE JANE"], "null": ["ROE RICHARD"]},
//     "sales": [{"date": "2015-03-02", "grantees": ["..."], "grantors": ["..."]}],
//     "priorOwnersRaw": ["..."]
//   }
//
// Output: { "owners_by_date": {...}, "invalid_owners": [...] }

use crate::data_quality::InvalidFragment;
use crate::error::Result;
use crate::temporal::OwnerTimeline;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// OWNER ENTRY
// ============================================================================

/// One raw owner field: a bare string, or a string with a mailing address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerEntry {
    Raw(String),
    Detailed {
        name: String,
        #[serde(default, alias = "mailingAddress")]
        mailing_address: Option<String>,
    },
}

impl OwnerEntry {
    pub fn text(&self) -> &str {
        match self {
            OwnerEntry::Raw(text) => text,
            OwnerEntry::Detailed { name, .. } => name,
        }
    }

    pub fn mailing_address(&self) -> Option<&str> {
        match self {
            OwnerEntry::Raw(_) => None,
            OwnerEntry::Detailed { mailing_address, .. } => mailing_address.as_deref(),
        }
    }
}

impl From<&str> for OwnerEntry {
    fn from(text: &str) -> Self {
        OwnerEntry::Raw(text.to_string())
    }
}

impl From<String> for OwnerEntry {
    fn from(text: String) -> Self {
        OwnerEntry::Raw(text)
    }
}

// ============================================================================
// SALE RECORD
// ============================================================================

/// One sale-history row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaleRecord {
    /// ISO date, `unknown_date_N`, or null when upstream date parsing failed
    pub date: Option<String>,

    /// Buyers: owners as of this date
    pub grantees: Vec<OwnerEntry>,

    /// Sellers: prior owners unless they show up as a grantee somewhere
    pub grantors: Vec<OwnerEntry>,
}

// ============================================================================
// RAW OWNER INPUT
// ============================================================================

/// Flat form: one string plus where it belongs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOwnerInput {
    pub text: String,

    pub date: Option<String>,

    /// "current", or a sale-row index that groups several strings into one sale
    pub bucket: Option<String>,

    pub mailing_address: Option<String>,
}

impl RawOwnerInput {
    pub fn new(text: impl Into<String>) -> Self {
        RawOwnerInput {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn with_mailing_address(mut self, address: impl Into<String>) -> Self {
        self.mailing_address = Some(address.into());
        self
    }

    fn entry(&self) -> OwnerEntry {
        match &self.mailing_address {
            Some(address) => OwnerEntry::Detailed {
                name: self.text.clone(),
                mailing_address: Some(address.clone()),
            },
            None => OwnerEntry::Raw(self.text.clone()),
        }
    }
}

// ============================================================================
// DOCUMENT INPUT
// ============================================================================

/// Everything known about one property record's owners
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocumentInput {
    #[serde(rename = "currentOwnerRaw", alias = "current_owner_raw")]
    pub current_owner_raw: Vec<OwnerEntry>,

    /// Grantee strings per sale date, in document order. A `null` date key
    /// (JSON "null" or "") means upstream date parsing failed.
    #[serde(
        rename = "salesByDate",
        alias = "sales_by_date",
        deserialize_with = "ordered_sales_map"
    )]
    pub sales_by_date: Vec<(Option<String>, Vec<OwnerEntry>)>,

    pub sales: Vec<SaleRecord>,

    #[serde(rename = "priorOwnersRaw", alias = "prior_owners_raw")]
    pub prior_owners_raw: Vec<OwnerEntry>,
}

impl DocumentInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document. A structurally wrong document (e.g. `salesByDate`
    /// not being a map) is the one fatal error.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_current(mut self, entry: impl Into<OwnerEntry>) -> Self {
        self.current_owner_raw.push(entry.into());
        self
    }

    pub fn with_sale_on(mut self, date: Option<&str>, grantees: Vec<OwnerEntry>) -> Self {
        self.sales_by_date.push((date.map(str::to_string), grantees));
        self
    }

    pub fn with_sale(mut self, sale: SaleRecord) -> Self {
        self.sales.push(sale);
        self
    }

    pub fn with_prior_owner(mut self, entry: impl Into<OwnerEntry>) -> Self {
        self.prior_owners_raw.push(entry.into());
        self
    }

    /// Group flat inputs: bucket "current" → current owners; a bucket label
    /// or a date → one sale per label/date; neither → prior owners.
    pub fn from_raw_inputs(inputs: Vec<RawOwnerInput>) -> Self {
        let mut doc = DocumentInput::new();
        let mut sale_index: HashMap<String, usize> = HashMap::new();

        for input in inputs {
            let entry = input.entry();
            let bucket = input.bucket.as_deref().map(str::trim).filter(|b| !b.is_empty());
            let date = input.date.as_deref().map(str::trim).filter(|d| !d.is_empty());

            let group = match (bucket, date) {
                (Some(b), _) if b.eq_ignore_ascii_case("current") => {
                    doc.current_owner_raw.push(entry);
                    continue;
                }
                (Some(b), _) => format!("row:{}", b),
                (None, Some(d)) => format!("date:{}", d),
                (None, None) => {
                    doc.prior_owners_raw.push(entry);
                    continue;
                }
            };

            let index = *sale_index.entry(group).or_insert_with(|| {
                doc.sales.push(SaleRecord::default());
                doc.sales.len() - 1
            });

            let sale = &mut doc.sales[index];
            if sale.date.is_none() {
                sale.date = date.map(str::to_string);
            }
            sale.grantees.push(entry);
        }

        doc
    }

    /// Every sale date label in the document, for unknown-bucket reservation
    pub fn sale_dates(&self) -> impl Iterator<Item = &str> {
        self.sales_by_date
            .iter()
            .filter_map(|(date, _)| date.as_deref())
            .chain(self.sales.iter().filter_map(|s| s.date.as_deref()))
    }
}

/// Keep `salesByDate` in document order and map "null"/"" keys to None
fn ordered_sales_map<'de, D>(deserializer: D) -> std::result::Result<Vec<(Option<String>, Vec<OwnerEntry>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SalesVisitor;

    impl<'de> Visitor<'de> for SalesVisitor {
        type Value = Vec<(Option<String>, Vec<OwnerEntry>)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of sale date to grantee strings")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut sales = Vec::new();
            while let Some((date, grantees)) = map.next_entry::<String, Vec<OwnerEntry>>()? {
                let date = match date.trim() {
                    "" | "null" => None,
                    d => Some(d.to_string()),
                };
                sales.push((date, grantees));
            }
            Ok(sales)
        }

        fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(SalesVisitor)
}

// ============================================================================
// OUTPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionOutput {
    pub owners_by_date: OwnerTimeline,
    pub invalid_owners: Vec<InvalidFragment>,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;

    #[test]
    fn test_from_json_camel_case() {
        let doc = DocumentInput::from_json(
            r#"{
                "currentOwnerRaw": ["SMITH JOHN", {"name": "ACME LLC", "mailing_address": "PO BOX 1"}],
                "salesByDate": {"2020-05-01": ["DOE JANE"], "null": ["ROE RICHARD"], "1999-01-01": []},
                "priorOwnersRaw": ["OLD OWNER"]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.current_owner_raw.len(), 2);
        assert_eq!(doc.current_owner_raw[1].text(), "ACME LLC");
        assert_eq!(doc.current_owner_raw[1].mailing_address(), Some("PO BOX 1"));

        // Document order kept
        assert_eq!(doc.sales_by_date[0].0.as_deref(), Some("2020-05-01"));
        assert_eq!(doc.sales_by_date[1].0, None);
        assert_eq!(doc.sales_by_date[2].0.as_deref(), Some("1999-01-01"));
        assert_eq!(doc.prior_owners_raw, vec![OwnerEntry::from("OLD OWNER")]);
    }

    #[test]
    fn test_from_json_snake_case_and_sales() {
        let doc = DocumentInput::from_json(
            r#"{
                "current_owner_raw": ["SMITH JOHN"],
                "sales": [{"date": null, "grantees": ["DOE JANE"], "grantors": ["ROE RICHARD"]}]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.current_owner_raw.len(), 1);
        assert_eq!(doc.sales.len(), 1);
        assert_eq!(doc.sales[0].date, None);
        assert_eq!(doc.sales[0].grantors[0].text(), "ROE RICHARD");
    }

    #[test]
    fn test_empty_document() {
        let doc = DocumentInput::from_json("{}").unwrap();
        assert_eq!(doc, DocumentInput::new());
    }

    #[test]
    fn test_structural_error_is_fatal() {
        let err = DocumentInput::from_json(r#"{"salesByDate": ["not", "a", "map"]}"#).unwrap_err();
        assert!(matches!(err, ResolveError::Json(_)));
    }

    #[test]
    fn test_from_raw_inputs_groups() {
        let doc = DocumentInput::from_raw_inputs(vec![
            RawOwnerInput::new("SMITH JOHN").with_bucket("current"),
            RawOwnerInput::new("DOE JANE").with_date("2020-05-01").with_bucket("0"),
            RawOwnerInput::new("DOE JOHN").with_bucket("0"),
            RawOwnerInput::new("ROE RICHARD").with_date("1999-01-01"),
            RawOwnerInput::new("ROE ALICE").with_date("1999-01-01"),
            RawOwnerInput::new("OLD OWNER").with_mailing_address("1 MAIN ST"),
        ]);

        assert_eq!(doc.current_owner_raw, vec![OwnerEntry::from("SMITH JOHN")]);
        assert_eq!(doc.sales.len(), 2);
        assert_eq!(doc.sales[0].date.as_deref(), Some("2020-05-01"));
        assert_eq!(doc.sales[0].grantees.len(), 2);
        assert_eq!(doc.sales[1].grantees.len(), 2);
        assert_eq!(doc.prior_owners_raw[0].mailing_address(), Some("1 MAIN ST"));
    }

    #[test]
    fn test_sale_dates() {
        let doc = DocumentInput::new()
            .with_sale_on(Some("unknown_date_2"), vec![])
            .with_sale_on(None, vec![])
            .with_sale(SaleRecord {
                date: Some("2001-01-01".to_string()),
                ..Default::default()
            });

        let dates: Vec<&str> = doc.sale_dates().collect();
        assert_eq!(dates, vec!["unknown_date_2", "2001-01-01"]);
    }
}
