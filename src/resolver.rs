// 🧭 Owner Resolver - The whole pipeline, per raw string and per document
//
// raw → Normalizer → CompositeSplitter → EntityClassifier
//     → PersonNameParser (affixes + ordering, ParseContext threaded)
//     → Deduplicator → TimelineAssembler
//
// Every rejection goes to the InvalidCollector; nothing here returns an
// error for bad data.

use crate::affixes::AffixTable;
use crate::classifier::{Classification, EntityClassifier};
use crate::config::{DigitPolicy, ResolverConfig};
use crate::data_quality::{InvalidCollector, ReasonCode};
use crate::deduplication::Deduplicator;
use crate::document::{DocumentInput, OwnerEntry, ResolutionOutput};
use crate::entities::{Company, ParsedOwner};
use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::person::{ParseContext, PersonNameParser};
use crate::splitter::CompositeSplitter;
use crate::temporal::TimelineAssembler;

// ============================================================================
// OWNER RESOLVER
// ============================================================================

/// Built once from a config; holds no per-document state, so one resolver
/// can serve any number of documents (and threads) at once.
#[derive(Debug, Clone)]
pub struct OwnerResolver {
    normalizer: Normalizer,
    splitter: CompositeSplitter,
    classifier: EntityClassifier,
    parser: PersonNameParser,
    digit_policy: DigitPolicy,
}

impl OwnerResolver {
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;

        let affixes = AffixTable::new(&config.affixes, &config.suffix_priority);

        Ok(OwnerResolver {
            normalizer: Normalizer::new(&config.noise_phrases, &config.company_suffixes)?,
            splitter: CompositeSplitter::new(config.split_on_slash, &config.surname_particles),
            classifier: EntityClassifier::new(&config.company_keywords)?,
            parser: PersonNameParser::new(affixes, &config.surname_particles, config.name_order),
            digit_policy: config.digit_policy,
        })
    }

    /// Resolver with the built-in tables
    pub fn with_defaults() -> Result<Self> {
        Self::new(ResolverConfig::default())
    }

    /// Resolve one raw owner string into zero or more owners
    pub fn resolve_raw(
        &self,
        raw: &str,
        mailing_address: Option<&str>,
        invalid: &mut InvalidCollector,
    ) -> Vec<ParsedOwner> {
        self.resolve_raw_in(raw, mailing_address, ParseContext::new(), invalid)
    }

    /// Same as `resolve_raw`, starting from a caller-supplied context
    /// (e.g. a forced name order for one jurisdiction's field).
    pub fn resolve_raw_in(
        &self,
        raw: &str,
        mailing_address: Option<&str>,
        mut ctx: ParseContext,
        invalid: &mut InvalidCollector,
    ) -> Vec<ParsedOwner> {
        if raw.trim().is_empty() {
            return Vec::new();
        }

        let cleaned = self.normalizer.normalize(raw);
        if cleaned.is_empty() {
            invalid.record(raw.trim(), ReasonCode::EmptyAfterClean);
            return Vec::new();
        }

        let split = self
            .splitter
            .split(&cleaned, &self.classifier, self.parser.affixes());
        if split.reinstated {
            invalid.record(cleaned, ReasonCode::UnparseableOrEmpty);
            return Vec::new();
        }

        let address = mailing_address.map(str::to_string);
        let mut owners = Vec::with_capacity(split.fragments.len());

        for fragment in split.fragments {
            match self.classifier.classify(&fragment, self.parser.affixes()) {
                Classification::Company => {
                    if let Some(company) = Company::new(fragment.as_str()) {
                        owners.push(company.with_mailing_address(address.clone()).into());
                    }
                }

                Classification::DigitBearing => match self.digit_policy {
                    DigitPolicy::Reject => {
                        invalid.record(fragment, ReasonCode::NameContainsDigits);
                    }
                    DigitPolicy::Company => {
                        if let Some(company) = Company::new(fragment.as_str()) {
                            owners.push(company.with_mailing_address(address.clone()).into());
                        }
                        invalid.record(fragment, ReasonCode::CompanyFallback);
                    }
                },

                Classification::Person => match self.parser.parse(&fragment, &ctx) {
                    Ok(parse) => {
                        if parse.affix_starved {
                            invalid.record(fragment.as_str(), ReasonCode::AmbiguousOrIncompletePersonName);
                        }
                        ctx = ctx.with_previous_last_name(parse.person.last_name());
                        owners.push(parse.person.with_mailing_address(address.clone()).into());
                    }
                    Err(reason) => invalid.record(fragment, reason),
                },
            }
        }

        owners
    }

    /// Resolve a list of owner fields into one deduplicated group
    pub fn resolve_entries(
        &self,
        entries: &[OwnerEntry],
        invalid: &mut InvalidCollector,
    ) -> Vec<ParsedOwner> {
        let mut dedup = Deduplicator::new();
        for entry in entries {
            dedup.extend(self.resolve_raw(entry.text(), entry.mailing_address(), invalid));
        }
        dedup.into_owners()
    }

    /// Resolve a whole property record into its owner timeline
    pub fn resolve_document(&self, doc: &DocumentInput) -> ResolutionOutput {
        let mut invalid = InvalidCollector::new();
        let mut assembler = TimelineAssembler::new();

        for date in doc.sale_dates() {
            assembler.reserve_label(date);
        }

        assembler.add_current(self.resolve_entries(&doc.current_owner_raw, &mut invalid));

        for (date, grantees) in &doc.sales_by_date {
            let owners = self.resolve_entries(grantees, &mut invalid);
            assembler.add_sale(date.as_deref(), owners);
        }

        for sale in &doc.sales {
            let owners = self.resolve_entries(&sale.grantees, &mut invalid);
            assembler.add_sale(sale.date.as_deref(), owners);
        }

        // Sellers never seen as a buyer or current owner are the only trace
        // of earlier ownership
        let mut leftovers = Deduplicator::new();
        let sellers = doc
            .sales
            .iter()
            .flat_map(|sale| sale.grantors.iter())
            .chain(doc.prior_owners_raw.iter());

        for entry in sellers {
            for owner in self.resolve_raw(entry.text(), entry.mailing_address(), &mut invalid) {
                if !assembler.contains_key(&owner.canonical_key()) {
                    leftovers.push(owner);
                }
            }
        }
        assembler.add_leftovers(leftovers.into_owners());

        let output = ResolutionOutput {
            owners_by_date: assembler.finish(),
            invalid_owners: invalid.finish(),
        };

        tracing::debug!(
            buckets = output.owners_by_date.len(),
            owners = output.owners_by_date.owner_count(),
            invalid = output.invalid_owners.len(),
            "resolved document"
        );

        output
    }
}

// ============================================================================
// TESTS
// ============================================================================
