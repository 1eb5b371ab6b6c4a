use super::non_blank;
use serde::Serialize;

/// Legal entity owner: LLCs, trusts, churches, government bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    mailing_address: Option<String>,
}

impl Company {
    /// None when the cleaned name is empty
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return None;
        }

        Some(Company {
            name,
            mailing_address: None,
        })
    }

    pub fn with_mailing_address(mut self, address: Option<String>) -> Self {
        if let Some(address) = non_blank(address) {
            self.mailing_address = Some(address);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mailing_address(&self) -> Option<&str> {
        self.mailing_address.as_deref()
    }

    pub(crate) fn backfill_from(&mut self, other: &Company) {
        if self.mailing_address.is_none() {
            self.mailing_address = other.mailing_address.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_is_refused() {
        assert!(Company::new("").is_none());
        assert!(Company::new("   ").is_none());
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(Company::new("  ACME LLC ").unwrap().name(), "ACME LLC");
    }
}
