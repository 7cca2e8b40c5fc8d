//! Profile feature builder
//!
//! Runs the extractor over a population of bios and looking-for texts and
//! joins the results into one [`FeatureTable`]. Only users present in both
//! inputs survive the join.

use crate::error::MatchError;
use crate::schema::{FeatureSchema, FeatureTable};
use brewmatch_core::{FeatureExtractor, FeatureRecord, LexiconSet, RawProfile};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Builds a feature table from raw profile text
pub struct ProfileFeatureBuilder<'a> {
    extractor: FeatureExtractor<'a>,
    schema: FeatureSchema,
    parallel: bool,
}

impl<'a> ProfileFeatureBuilder<'a> {
    /// Builder using the default parser and sentiment scorer
    pub fn new(lexicons: &'a LexiconSet) -> Self {
        Self::with_extractor(FeatureExtractor::with_defaults(lexicons))
    }

    pub fn with_extractor(extractor: FeatureExtractor<'a>) -> Self {
        Self {
            schema: FeatureSchema::from_lexicons(extractor.lexicons()),
            extractor,
            parallel: true,
        }
    }

    /// Toggle per-user parallel extraction
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// De-duplicate, extract, inner-join and expand
    pub fn build(
        &self,
        bios: &[RawProfile],
        looking_for: &[RawProfile],
    ) -> Result<FeatureTable, MatchError> {
        let bios = dedup_first("bio", bios);
        let wishes = dedup_first("looking_for", looking_for);

        let by_uid: HashMap<&str, &RawProfile> =
            wishes.iter().map(|p| (p.uid.as_str(), *p)).collect();
        let bio_uids: HashSet<&str> = bios.iter().map(|p| p.uid.as_str()).collect();

        let mut pairs = Vec::with_capacity(bios.len());
        let mut excluded = 0usize;
        for bio in &bios {
            match by_uid.get(bio.uid.as_str()) {
                Some(wish) => pairs.push((*bio, *wish)),
                None => {
                    debug!(uid = %bio.uid, "no looking_for row, user excluded");
                    excluded += 1;
                }
            }
        }
        for wish in &wishes {
            if !bio_uids.contains(wish.uid.as_str()) {
                debug!(uid = %wish.uid, "no bio row, user excluded");
                excluded += 1;
            }
        }
        if excluded > 0 {
            warn!(excluded, "users missing from one input were excluded");
        }
        info!(
            bios = bios.len(),
            looking_for = wishes.len(),
            joined = pairs.len(),
            "profiles joined"
        );

        let records: Vec<FeatureRecord> = if self.parallel {
            pairs
                .par_iter()
                .map(|(bio, wish)| self.extract(bio, wish))
                .collect()
        } else {
            pairs.iter().map(|(bio, wish)| self.extract(bio, wish)).collect()
        };

        let table = FeatureTable::from_records(self.schema.clone(), records);
        if table.is_empty() {
            return Err(MatchError::EmptyTable);
        }

        info!(
            users = table.len(),
            columns = self.schema.column_names().len(),
            "feature table built"
        );
        Ok(table)
    }

    fn extract(&self, bio: &RawProfile, wish: &RawProfile) -> FeatureRecord {
        self.extractor.extract_record(&bio.uid, bio.text(), wish.text())
    }
}

/// Keep the first row per uid, in input order
fn dedup_first<'p>(source: &str, rows: &'p [RawProfile]) -> Vec<&'p RawProfile> {
    let mut seen = HashSet::with_capacity(rows.len());
    let kept: Vec<&RawProfile> = rows
        .iter()
        .filter(|row| seen.insert(row.uid.as_str()))
        .collect();

    if kept.len() < rows.len() {
        debug!(source, dropped = rows.len() - kept.len(), "duplicate uids dropped");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewmatch_core::PreferenceFlag;

    fn bios() -> Vec<RawProfile> {
        vec![
            RawProfile::new("1", "I love hiking and yoga. 9/10 humor."),
            RawProfile::new("2", "Movie nights and board games."),
            RawProfile::new("1", "This duplicate should be ignored: I hate hiking."),
            RawProfile::missing("3"),
            RawProfile::new("4", "Only a bio, no looking_for row."),
        ]
    }

    fn wishes() -> Vec<RawProfile> {
        vec![
            RawProfile::new("2", "Someone funny with shared hobbies."),
            RawProfile::new("1", "Kind and honest. Faith matters."),
            RawProfile::new("3", ""),
            RawProfile::new("5", "Orphan looking_for row."),
        ]
    }

    #[test]
    fn test_inner_join_in_bio_order() {
        let lexicons = LexiconSet::builtin();
        let table = ProfileFeatureBuilder::new(&lexicons)
            .parallel(false)
            .build(&bios(), &wishes())
            .unwrap();

        assert_eq!(table.uids().collect::<Vec<_>>(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let lexicons = LexiconSet::builtin();
        let table = ProfileFeatureBuilder::new(&lexicons)
            .build(&bios(), &wishes())
            .unwrap();

        let schema = table.schema();
        let row = table.row(table.index_of("1").unwrap()).unwrap();
        let sports = schema.interest_index("sports").unwrap();
        assert!(row.interests[sports] > 5);
        let humor = schema.trait_index("humor").unwrap();
        assert_eq!(row.traits[humor], 9);
        let religion = schema.preference_index("religion").unwrap();
        assert_eq!(row.preference(religion), Some(PreferenceFlag::Religious));
    }

    #[test]
    fn test_missing_text_yields_empty_features() {
        let lexicons = LexiconSet::builtin();
        let table = ProfileFeatureBuilder::new(&lexicons)
            .build(&bios(), &wishes())
            .unwrap();
        let row = table.row(table.index_of("3").unwrap()).unwrap();
        assert!(row.interests.iter().all(|&s| s == 0));
        assert!(row.traits.iter().all(|&s| s == 0));
        assert!(row.preferences.iter().all(Option::is_none));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let lexicons = LexiconSet::builtin();
        let parallel = ProfileFeatureBuilder::new(&lexicons).build(&bios(), &wishes()).unwrap();
        let sequential = ProfileFeatureBuilder::new(&lexicons)
            .parallel(false)
            .build(&bios(), &wishes())
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_empty_join_is_an_error() {
        let lexicons = LexiconSet::builtin();
        let result = ProfileFeatureBuilder::new(&lexicons).build(
            &[RawProfile::new("a", "music")],
            &[RawProfile::new("b", "music")],
        );
        assert!(matches!(result, Err(MatchError::EmptyTable)));
    }
}
