//! Peer ranking: score a cohort of applicants against one institution
//! context and contextualize the spread with percentile bands.

use crate::adapters;
use crate::models::{
    ApplicantRecord, CohortBands, HistoricalDistribution, InstitutionMetrics, PercentileBand,
    RankedApplicant, ScoreBreakdown,
};
use crate::scoring;

/// Scores every applicant against the same institution context and
/// returns them ranked by overall score, best first.
pub fn rank_cohort(
    records: &[ApplicantRecord],
    institution: &InstitutionMetrics,
    history: &HistoricalDistribution,
) -> Vec<RankedApplicant> {
    let mut ranked: Vec<RankedApplicant> = records
        .iter()
        .map(|record| {
            let metrics = adapters::applicant_metrics(record);
            RankedApplicant {
                rank: 0,
                full_name: record.full_name.clone(),
                email: record.email.clone(),
                cohort: record.cohort.clone(),
                breakdown: scoring::score_breakdown(&metrics, institution, history),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.breakdown
            .overall
            .partial_cmp(&a.breakdown.overall)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    ranked
}

/// (p25, p50, p75) of one score dimension, linearly interpolated. An
/// empty cohort yields a zero band rather than an error.
pub fn percentile_band(values: &[f64]) -> PercentileBand {
    PercentileBand {
        p25: percentile(values, 25.0),
        p50: percentile(values, 50.0),
        p75: percentile(values, 75.0),
    }
}

pub fn cohort_bands(breakdowns: &[ScoreBreakdown]) -> CohortBands {
    let collect = |pick: fn(&ScoreBreakdown) -> f64| -> Vec<f64> {
        breakdowns.iter().map(pick).collect()
    };
    CohortBands {
        overall: percentile_band(&collect(|b| b.overall)),
        academic: percentile_band(&collect(|b| b.academic)),
        activity: percentile_band(&collect(|b| b.activity)),
        award: percentile_band(&collect(|b| b.award)),
    }
}

fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let position = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(name: &str, gpa: f64, sat: Option<i32>) -> ApplicantRecord {
        ApplicantRecord {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            cohort: "2027".to_string(),
            gpa: Some(gpa),
            gpa_scale: Some(4.0),
            sat,
            act: None,
            toefl: None,
            activity_count: 0,
            award_count: 0,
            national_award_count: 0,
            international_award_count: 0,
            activities: Vec::new(),
            awards: Vec::new(),
        }
    }

    #[test]
    fn cohort_is_ranked_by_overall_descending() {
        let records = vec![
            record("Avery", 3.2, None),
            record("Jules", 4.0, Some(1560)),
            record("Kiara", 3.6, Some(1450)),
        ];
        let ranked = rank_cohort(
            &records,
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].full_name, "Jules");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].full_name, "Kiara");
        assert_eq!(ranked[2].full_name, "Avery");
        assert_eq!(ranked[2].rank, 3);
        assert!(ranked[0].breakdown.overall >= ranked[1].breakdown.overall);
    }

    #[test]
    fn empty_cohort_ranks_to_nothing() {
        let ranked = rank_cohort(
            &[],
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn band_of_single_value_is_flat() {
        let band = percentile_band(&[42.0]);
        assert_eq!(band.p25, 42.0);
        assert_eq!(band.p50, 42.0);
        assert_eq!(band.p75, 42.0);
    }

    #[test]
    fn band_interpolates_between_observations() {
        let band = percentile_band(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(band.p25, 20.0);
        assert_eq!(band.p50, 30.0);
        assert_eq!(band.p75, 40.0);

        let band = percentile_band(&[10.0, 20.0]);
        assert_eq!(band.p25, 12.5);
        assert_eq!(band.p50, 15.0);
        assert_eq!(band.p75, 17.5);
    }

    #[test]
    fn empty_band_is_zero() {
        let band = percentile_band(&[]);
        assert_eq!(band.p25, 0.0);
        assert_eq!(band.p50, 0.0);
        assert_eq!(band.p75, 0.0);
    }

    #[test]
    fn cohort_bands_cover_all_dimensions() {
        let breakdowns = vec![
            ScoreBreakdown {
                academic: 50.0,
                activity: 30.0,
                award: 20.0,
                overall: 38.0,
            },
            ScoreBreakdown {
                academic: 70.0,
                activity: 50.0,
                award: 60.0,
                overall: 62.0,
            },
        ];
        let bands = cohort_bands(&breakdowns);
        assert_eq!(bands.overall.p50, 50.0);
        assert_eq!(bands.academic.p50, 60.0);
        assert_eq!(bands.activity.p50, 40.0);
        assert_eq!(bands.award.p50, 40.0);
    }
}
