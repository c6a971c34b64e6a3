use std::collections::{BTreeMap, HashMap};

use crate::charts::histogram::Bin;
use crate::data::codes::{self, CountryCode};
use crate::data::Posting;

/// Active dashboard filters applied before binning.
#[derive(Default)]
pub struct Filters<'a> {
    /// Selected skill tags; empty means all skills
    pub skills: &'a [String],
    /// Focused map country, if any
    pub country: Option<CountryCode>,
}

impl Filters<'_> {
    fn matches(&self, posting: &Posting) -> bool {
        if !self.skills.is_empty()
            && !self
                .skills
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&posting.skill))
        {
            return false;
        }
        if let Some(focused) = self.country {
            if codes::alpha2_to_alpha3(&posting.country) != Some(focused) {
                return false;
            }
        }
        true
    }
}

/// Postings per calendar month, chronological. Records with an unparseable
/// date are skipped (best-effort, matching the histograms' error model).
pub fn by_month(postings: &[Posting], filters: &Filters) -> Vec<Bin> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for posting in postings.iter().filter(|p| filters.matches(p)) {
        if let Some(month) = month_key(&posting.date) {
            *counts.entry(month).or_default() += 1;
        }
    }
    counts.into_iter().map(|(k, v)| Bin::new(k, v)).collect()
}

/// Postings per skill, descending by count.
pub fn by_skill(postings: &[Posting], filters: &Filters) -> Vec<Bin> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for posting in postings.iter().filter(|p| filters.matches(p)) {
        *counts.entry(posting.skill.as_str()).or_default() += 1;
    }
    sorted_desc(counts)
}

/// Postings per country (display names), descending by count.
pub fn by_country(postings: &[Posting], filters: &Filters) -> Vec<Bin> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for posting in postings.iter().filter(|p| filters.matches(p)) {
        let name = codes::alpha2_to_alpha3(&posting.country)
            .map(codes::display_name)
            .unwrap_or(posting.country.as_str());
        *counts.entry(name).or_default() += 1;
    }
    sorted_desc(counts)
}

/// "YYYY-MM" prefix of a "YYYY-MM-DD" date.
fn month_key(date: &str) -> Option<&str> {
    let month = date.get(0..7)?;
    let bytes = month.as_bytes();
    let shaped = bytes[0..4].iter().all(|b| b.is_ascii_digit())
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(|b| b.is_ascii_digit());
    shaped.then_some(month)
}

fn sorted_desc(counts: HashMap<&str, u64>) -> Vec<Bin> {
    let mut bins: Vec<Bin> = counts.into_iter().map(|(k, v)| Bin::new(k, v)).collect();
    // Name as tiebreaker keeps the output deterministic
    bins.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    bins
}
