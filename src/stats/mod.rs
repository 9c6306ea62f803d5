//! Ranking statistics over the per-category emission tables.
//!
//! Five statistic kinds are supported (plus `all`):
//!
//! - `max-year` / `min-year`: top-3 single observations per category
//! - `max-total` / `min-total`: top-3 per-country totals per category
//! - `most-improved`: top-3 `max(value) / first-chronological value` ratios
//!
//! Ordering is sorted by unrounded score with a stable sort, so equal scores
//! keep first-appearance order (countries in input order, observations in
//! input order). Values are rounded only for presentation: 1 decimal for
//! year/total kinds, 2 for most-improved.

use std::collections::BTreeMap;

use crate::domain::{Observation, RatingKind};

/// A labeled aggregate score (`{kind}_{category}_{country}`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub label: String,
    pub score: f64,
}

/// All requested rankings, keyed by category. Maps for kinds that were not
/// requested stay empty.
#[derive(Debug, Clone, Default)]
pub struct Ratings {
    pub max_year: BTreeMap<String, Vec<Observation>>,
    pub min_year: BTreeMap<String, Vec<Observation>>,
    pub max_total: BTreeMap<String, Vec<ScoreEntry>>,
    pub min_total: BTreeMap<String, Vec<ScoreEntry>>,
    pub most_improved: BTreeMap<String, Vec<ScoreEntry>>,
}

const TOP_N: usize = 3;

/// Compute the requested ranking statistics.
///
/// `categories` and `countries` fix the iteration order, which in turn fixes
/// the tie-break order of equal scores.
pub fn rank(
    observations: &[Observation],
    categories: &[String],
    countries: &[String],
    rating_type: RatingKind,
) -> Ratings {
    let mut ratings = Ratings::default();

    for category in categories {
        let one_gas: Vec<&Observation> = observations
            .iter()
            .filter(|obs| &obs.category == category)
            .collect();

        if rating_type.wants(RatingKind::MaxYear) {
            ratings
                .max_year
                .insert(category.clone(), top_by_year(&one_gas, true));
        }
        if rating_type.wants(RatingKind::MinYear) {
            ratings
                .min_year
                .insert(category.clone(), top_by_year(&one_gas, false));
        }
        if rating_type.wants(RatingKind::MaxTotal) {
            let totals = country_totals(&one_gas, category, countries, "max_total");
            ratings
                .max_total
                .insert(category.clone(), top_scores(totals, true, 1));
        }
        if rating_type.wants(RatingKind::MinTotal) {
            let totals = country_totals(&one_gas, category, countries, "min_total");
            ratings
                .min_total
                .insert(category.clone(), top_scores(totals, false, 1));
        }
        if rating_type.wants(RatingKind::MostImproved) {
            let ratios = improvement_ratios(&one_gas, category, countries);
            ratings
                .most_improved
                .insert(category.clone(), top_scores(ratios, true, 2));
        }
    }

    ratings
}

/// Top-3 observations by value; descending when `max` is set.
///
/// Fewer than 3 observations yield a shorter list, never padded.
fn top_by_year(observations: &[&Observation], max: bool) -> Vec<Observation> {
    let mut with_value: Vec<&Observation> =
        observations.iter().copied().filter(|o| o.value.is_some()).collect();

    with_value.sort_by(|a, b| {
        let (a, b) = (a.value.unwrap_or(f64::NAN), b.value.unwrap_or(f64::NAN));
        let ord = a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal);
        if max { ord.reverse() } else { ord }
    });

    with_value
        .into_iter()
        .take(TOP_N)
        .map(|obs| Observation {
            value: obs.value.map(|v| round_to(v, 1)),
            ..obs.clone()
        })
        .collect()
}

/// Per-country value totals for one category, labeled `{kind}_{category}_{country}`.
///
/// Missing values are ignored in the sum; a country without observations
/// contributes a zero total, matching the source dataset's reporting.
fn country_totals(
    observations: &[&Observation],
    category: &str,
    countries: &[String],
    kind: &str,
) -> Vec<ScoreEntry> {
    countries
        .iter()
        .map(|country| {
            let total: f64 = observations
                .iter()
                .filter(|obs| &obs.country == country)
                .filter_map(|obs| obs.value)
                .sum();
            ScoreEntry {
                label: format!("{kind}_{category}_{country}"),
                score: total,
            }
        })
        .collect()
}

/// Per-country improvement ratios for one category.
///
/// The ratio is `max(value) / value at the first chronological year`. A
/// country with no observations is skipped entirely. A zero or negative
/// baseline makes the ratio undefined (the original logic silently produced
/// inf/NaN); such countries are excluded from the ranking, as is any
/// non-finite ratio.
fn improvement_ratios(
    observations: &[&Observation],
    category: &str,
    countries: &[String],
) -> Vec<ScoreEntry> {
    let mut out = Vec::new();
    for country in countries {
        let mut rows: Vec<&&Observation> = observations
            .iter()
            .filter(|obs| &obs.country == country && obs.value.is_some())
            .collect();
        if rows.is_empty() {
            continue;
        }
        rows.sort_by_key(|obs| obs.year);

        let baseline = rows[0].value.unwrap_or(f64::NAN);
        let max = rows
            .iter()
            .filter_map(|obs| obs.value)
            .fold(f64::NEG_INFINITY, f64::max);

        if baseline <= 0.0 {
            continue;
        }
        let ratio = max / baseline;
        if !ratio.is_finite() {
            continue;
        }

        out.push(ScoreEntry {
            label: format!("most-improved_{category}_{country}"),
            score: ratio,
        });
    }
    out
}

/// Stable top-3 cut over labeled scores, rounded for presentation.
fn top_scores(mut entries: Vec<ScoreEntry>, max: bool, decimals: u32) -> Vec<ScoreEntry> {
    entries.sort_by(|a, b| {
        let ord = a
            .score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal);
        if max { ord.reverse() } else { ord }
    });

    entries
        .into_iter()
        .take(TOP_N)
        .map(|e| ScoreEntry {
            score: round_to(e.score, decimals),
            ..e
        })
        .collect()
}

fn round_to(v: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (v * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(country: &str, year: i32, value: f64, category: &str) -> Observation {
        Observation {
            country: country.to_string(),
            year,
            value: Some(value),
            category: category.to_string(),
        }
    }

    fn co2_fixture() -> (Vec<Observation>, Vec<String>, Vec<String>) {
        let data = vec![
            obs("A", 2000, 10.0, "co2"),
            obs("A", 2001, 20.0, "co2"),
            obs("A", 2002, 5.0, "co2"),
        ];
        (data, vec!["co2".to_string()], vec!["A".to_string()])
    }

    #[test]
    fn max_year_orders_descending() {
        let (data, categories, countries) = co2_fixture();
        let ratings = rank(&data, &categories, &countries, RatingKind::MaxYear);

        let top = &ratings.max_year["co2"];
        let years: Vec<i32> = top.iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2001, 2000, 2002]);
        assert_eq!(top[0].value, Some(20.0));
    }

    #[test]
    fn min_year_is_reverse_of_max_year() {
        let (data, categories, countries) = co2_fixture();
        let ratings = rank(&data, &categories, &countries, RatingKind::All);

        let max_years: Vec<i32> = ratings.max_year["co2"].iter().map(|o| o.year).collect();
        let mut min_years: Vec<i32> = ratings.min_year["co2"].iter().map(|o| o.year).collect();
        min_years.reverse();
        assert_eq!(max_years, min_years);
    }

    #[test]
    fn most_improved_ratio_from_first_chronological_value() {
        let (data, categories, countries) = co2_fixture();
        let ratings = rank(&data, &categories, &countries, RatingKind::MostImproved);

        let top = &ratings.most_improved["co2"];
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].label, "most-improved_co2_A");
        assert_eq!(top[0].score, 2.0);
    }

    #[test]
    fn most_improved_excludes_zero_baseline_and_absent_countries() {
        let data = vec![
            obs("Zero", 2000, 0.0, "co2"),
            obs("Zero", 2001, 50.0, "co2"),
            obs("Ok", 2000, 10.0, "co2"),
            obs("Ok", 2001, 30.0, "co2"),
        ];
        let categories = vec!["co2".to_string()];
        let countries = vec![
            "Zero".to_string(),
            "Ok".to_string(),
            "Absent".to_string(),
        ];
        let ratings = rank(&data, &categories, &countries, RatingKind::MostImproved);

        let top = &ratings.most_improved["co2"];
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].label, "most-improved_co2_Ok");
        assert_eq!(top[0].score, 3.0);
    }

    #[test]
    fn totals_sum_per_country_and_rank_descending() {
        let data = vec![
            obs("A", 2000, 1.0, "co2"),
            obs("A", 2001, 2.0, "co2"),
            obs("B", 2000, 10.0, "co2"),
            obs("C", 2000, 5.0, "co2"),
            obs("D", 2000, 0.5, "co2"),
        ];
        let categories = vec!["co2".to_string()];
        let countries: Vec<String> =
            ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        let ratings = rank(&data, &categories, &countries, RatingKind::All);

        let max_labels: Vec<&str> = ratings.max_total["co2"]
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(
            max_labels,
            vec!["max_total_co2_B", "max_total_co2_C", "max_total_co2_A"]
        );
        assert_eq!(ratings.max_total["co2"][0].score, 10.0);

        let min_labels: Vec<&str> = ratings.min_total["co2"]
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(
            min_labels,
            vec!["min_total_co2_D", "min_total_co2_A", "min_total_co2_C"]
        );
    }

    #[test]
    fn totals_ignore_missing_values() {
        let mut data = vec![obs("A", 2000, 1.5, "co2")];
        data.push(Observation {
            country: "A".to_string(),
            year: 2001,
            value: None,
            category: "co2".to_string(),
        });
        let ratings = rank(
            &data,
            &["co2".to_string()],
            &["A".to_string()],
            RatingKind::MaxTotal,
        );
        assert_eq!(ratings.max_total["co2"][0].score, 1.5);
    }

    #[test]
    fn stable_tie_break_keeps_input_order() {
        let data = vec![
            obs("First", 2000, 7.0, "co2"),
            obs("Second", 2000, 7.0, "co2"),
        ];
        let countries = vec!["First".to_string(), "Second".to_string()];
        let ratings = rank(&data, &["co2".to_string()], &countries, RatingKind::MaxTotal);

        let labels: Vec<&str> = ratings.max_total["co2"]
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, vec!["max_total_co2_First", "max_total_co2_Second"]);
    }

    #[test]
    fn fewer_than_three_entries_are_not_padded() {
        let data = vec![obs("A", 2000, 1.0, "co2")];
        let ratings = rank(
            &data,
            &["co2".to_string()],
            &["A".to_string()],
            RatingKind::MaxYear,
        );
        assert_eq!(ratings.max_year["co2"].len(), 1);
    }
}
