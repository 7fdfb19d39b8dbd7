//! Component scorers and the composite aggregator. Everything here is a
//! pure function over the adapter-built metric structures; the same inputs
//! always produce the same breakdown.

use crate::constants::{
    ACT_DEFAULTS, DEEP_ACTIVITY_HOURS, LEADERSHIP_KEYWORDS, MIN_SAMPLE_SIZE, SAT_DEFAULTS,
    SCORING_WEIGHTS, TestDefaults,
};
use crate::models::{
    ActivityProfile, ApplicantMetrics, AwardProfile, HistoricalDistribution, InstitutionMetrics,
    ScoreBreakdown,
};
use crate::normalize::normalize_gpa;
use crate::stats::{empirical_percentile, parametric_percentile};

/// Computes all three component scores and the fixed-weight overall.
/// The overall is exactly `academic * 0.5 + activity * 0.3 + award * 0.2`.
pub fn score_breakdown(
    applicant: &ApplicantMetrics,
    institution: &InstitutionMetrics,
    history: &HistoricalDistribution,
) -> ScoreBreakdown {
    let academic = academic_score(applicant, institution, history);
    let activity = activity_score(&applicant.activities);
    let award = award_score(&applicant.awards);
    let overall = academic * SCORING_WEIGHTS.academic
        + activity * SCORING_WEIGHTS.activity
        + award * SCORING_WEIGHTS.award;
    ScoreBreakdown {
        academic,
        activity,
        award,
        overall,
    }
}

/// Academic score: baseline 50, plus a GPA term where a 3.0 GPA nets
/// zero, a standardized-test bonus of up to ±15, and a TOEFL adjustment
/// of up to ±5. Clamped to [0, 100].
pub fn academic_score(
    applicant: &ApplicantMetrics,
    institution: &InstitutionMetrics,
    history: &HistoricalDistribution,
) -> f64 {
    let mut score = 50.0;

    if let Some(gpa) = applicant.gpa {
        let gpa4 = normalize_gpa(gpa, applicant.gpa_scale.unwrap_or(4.0));
        // 0-40 contribution shifted so a 3.0 GPA contributes nothing.
        score += gpa4 * 10.0 - 30.0;
    }

    score += standardized_test_bonus(applicant, institution, history);

    if let Some(toefl) = applicant.toefl_score {
        score += ((toefl - 100.0) * 0.25).clamp(-5.0, 5.0);
    }

    score.clamp(0.0, 100.0)
}

/// Standardized-test bonus in [-15, +15]. SAT is preferred; ACT is only
/// consulted when no SAT value exists. Each family walks the same
/// fallback chain: platform sample, institution percentile band,
/// institution average, fixed default average.
fn standardized_test_bonus(
    applicant: &ApplicantMetrics,
    institution: &InstitutionMetrics,
    history: &HistoricalDistribution,
) -> f64 {
    if let Some(sat) = applicant.sat_score {
        return test_bonus(
            sat,
            &SAT_DEFAULTS,
            institution.sat25.zip(institution.sat75),
            institution.sat_avg,
            Some(&history.sat_values),
        );
    }
    if let Some(act) = applicant.act_score {
        // The platform history carries no ACT sample, so the ACT chain
        // starts at the institution band.
        return test_bonus(
            act,
            &ACT_DEFAULTS,
            institution.act25.zip(institution.act75),
            institution.act_avg,
            None,
        );
    }
    0.0
}

fn test_bonus(
    score: f64,
    defaults: &TestDefaults,
    band: Option<(f64, f64)>,
    avg: Option<f64>,
    sample: Option<&[f64]>,
) -> f64 {
    if let Some(sample) = sample {
        if sample.len() >= MIN_SAMPLE_SIZE {
            return bonus_from_percentile(empirical_percentile(score, sample));
        }
    }
    if let Some((p25, p75)) = band {
        return bonus_from_percentile(parametric_percentile(score, p25, p75));
    }
    let avg = avg.unwrap_or(defaults.average);
    ((score - avg) / defaults.points_per_bonus).clamp(-15.0, 15.0)
}

/// Maps a percentile in [0, 1] onto the ±15 bonus range, with the median
/// contributing nothing.
fn bonus_from_percentile(percentile: f64) -> f64 {
    (percentile - 0.5) * 30.0
}

/// Activity score. With per-activity detail: 20 base, up to 30 for
/// count, 15 for leadership roles, 15 for sustained depth, plus a
/// diversity bonus. Without detail: the legacy 30 + 5 per activity,
/// capped at +50. Clamped to [0, 100].
pub fn activity_score(profile: &ActivityProfile) -> f64 {
    let score = match profile {
        ActivityProfile::Detailed(details) => {
            let leadership = details
                .iter()
                .filter(|d| is_leadership_role(&d.role))
                .count();
            let deep = details
                .iter()
                .filter(|d| d.total_hours > DEEP_ACTIVITY_HOURS)
                .count();
            let categories: std::collections::HashSet<&str> = details
                .iter()
                .map(|d| d.category.as_str())
                .filter(|c| !c.is_empty())
                .collect();
            let diversity = match categories.len() {
                0..=2 => 0.0,
                3..=4 => 5.0,
                _ => 10.0,
            };

            20.0 + (details.len() as f64 * 3.0).min(30.0)
                + (leadership as f64 * 5.0).min(15.0)
                + (deep as f64 * 5.0).min(15.0)
                + diversity
        }
        ActivityProfile::CountOnly(count) => 30.0 + (*count as f64 * 5.0).min(50.0),
    };
    score.clamp(0.0, 100.0)
}

fn is_leadership_role(role: &str) -> bool {
    let role = role.to_lowercase();
    LEADERSHIP_KEYWORDS.iter().any(|kw| role.contains(kw))
}

/// Award score. With per-award tier points, a direct sum; otherwise the
/// legacy count model: 20 base, +20 per international award (cap 40),
/// +15 per national (cap 30), +5 per remaining award (cap 20). Clamped
/// to [0, 100].
pub fn award_score(profile: &AwardProfile) -> f64 {
    let score = match profile {
        AwardProfile::Tiered(points) => points.iter().sum(),
        AwardProfile::Counts {
            international,
            national,
            other,
        } => {
            20.0 + (*international as f64 * 20.0).min(40.0)
                + (*national as f64 * 15.0).min(30.0)
                + (*other as f64 * 5.0).min(20.0)
        }
    };
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityDetail;

    fn applicant() -> ApplicantMetrics {
        ApplicantMetrics::default()
    }

    fn detail(category: &str, role: &str, hours: f64) -> ActivityDetail {
        ActivityDetail {
            category: category.to_string(),
            role: role.to_string(),
            total_hours: hours,
        }
    }

    #[test]
    fn weights_sum_to_one_exactly() {
        assert_eq!(
            SCORING_WEIGHTS.academic + SCORING_WEIGHTS.activity + SCORING_WEIGHTS.award,
            1.0
        );
    }

    #[test]
    fn empty_profile_hits_documented_baselines() {
        let breakdown = score_breakdown(
            &applicant(),
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        assert_eq!(breakdown.academic, 50.0);
        assert_eq!(breakdown.activity, 30.0);
        assert_eq!(breakdown.award, 20.0);
        assert_eq!(breakdown.overall, 38.0);
    }

    #[test]
    fn overall_is_exactly_the_weighted_sum() {
        let mut a = applicant();
        a.gpa = Some(3.9);
        a.gpa_scale = Some(4.0);
        a.sat_score = Some(1510.0);
        a.activities = ActivityProfile::CountOnly(4);
        let breakdown = score_breakdown(
            &a,
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        assert_eq!(
            breakdown.overall,
            breakdown.academic * 0.5 + breakdown.activity * 0.3 + breakdown.award * 0.2
        );
    }

    #[test]
    fn scoring_is_idempotent() {
        let mut a = applicant();
        a.gpa = Some(3.4);
        a.sat_score = Some(1380.0);
        let inst = InstitutionMetrics {
            sat25: Some(1350.0),
            sat75: Some(1520.0),
            ..Default::default()
        };
        let history = HistoricalDistribution::default();
        let first = score_breakdown(&a, &inst, &history);
        let second = score_breakdown(&a, &inst, &history);
        assert_eq!(first, second);
    }

    #[test]
    fn gpa_three_point_five_nets_plus_five() {
        let mut a = applicant();
        a.gpa = Some(3.5);
        a.gpa_scale = Some(4.0);
        let got = academic_score(
            &a,
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        assert_eq!(got, 55.0);
    }

    #[test]
    fn gpa_below_three_pulls_the_score_down() {
        let mut a = applicant();
        a.gpa = Some(2.5);
        let got = academic_score(
            &a,
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        assert_eq!(got, 45.0);
    }

    #[test]
    fn toefl_extremes_shift_exactly_five_points() {
        let mut base = applicant();
        base.gpa = Some(3.5);
        let neutral = academic_score(
            &base,
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );

        let mut high = base.clone();
        high.toefl_score = Some(120.0);
        let mut low = base.clone();
        low.toefl_score = Some(80.0);

        let inst = InstitutionMetrics::default();
        let history = HistoricalDistribution::default();
        assert_eq!(academic_score(&high, &inst, &history), neutral + 5.0);
        assert_eq!(academic_score(&low, &inst, &history), neutral - 5.0);
    }

    #[test]
    fn sat_bonus_uses_institution_band_when_no_sample() {
        let mut a = applicant();
        a.sat_score = Some(1580.0);
        let inst = InstitutionMetrics {
            sat25: Some(1520.0),
            sat75: Some(1580.0),
            ..Default::default()
        };
        let got = academic_score(&a, &inst, &HistoricalDistribution::default());
        // 75th percentile maps to a +7.5 bonus.
        assert!((got - 57.5).abs() < 0.01);
    }

    #[test]
    fn platform_sample_outranks_institution_band() {
        let mut a = applicant();
        a.sat_score = Some(1600.0);
        let inst = InstitutionMetrics {
            sat25: Some(1520.0),
            sat75: Some(1580.0),
            ..Default::default()
        };
        let history = HistoricalDistribution {
            sat_values: (0..30).map(|i| 1200.0 + i as f64 * 10.0).collect(),
            ..Default::default()
        };
        // At the top of the sample the empirical percentile is 1.0, so the
        // bonus is the full +15 regardless of the band.
        let got = academic_score(&a, &inst, &history);
        assert_eq!(got, 65.0);
    }

    #[test]
    fn short_sample_is_ignored() {
        let mut a = applicant();
        a.sat_score = Some(1550.0);
        let inst = InstitutionMetrics {
            sat25: Some(1520.0),
            sat75: Some(1580.0),
            ..Default::default()
        };
        let history = HistoricalDistribution {
            sat_values: vec![1000.0, 1100.0, 1200.0],
            ..Default::default()
        };
        // Three observations fall below the threshold; the band's median
        // contributes nothing.
        let got = academic_score(&a, &inst, &history);
        assert!((got - 50.0).abs() < 1e-6);
    }

    #[test]
    fn average_only_institution_uses_linear_model() {
        let mut a = applicant();
        a.sat_score = Some(1500.0);
        let inst = InstitutionMetrics {
            sat_avg: Some(1400.0),
            ..Default::default()
        };
        let got = academic_score(&a, &inst, &HistoricalDistribution::default());
        assert_eq!(got, 55.0);
    }

    #[test]
    fn no_institution_data_falls_back_to_default_average() {
        let mut a = applicant();
        a.sat_score = Some(1600.0);
        let got = academic_score(
            &a,
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        // (1600 - 1400) / 20 = +10
        assert_eq!(got, 60.0);
    }

    #[test]
    fn act_is_consulted_only_without_sat() {
        let mut act_only = applicant();
        act_only.act_score = Some(36.0);
        let got = academic_score(
            &act_only,
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        // (36 - 31.5) scaled into SAT context: 4.5 * (1600/36) / 20 = +10
        assert!((got - 60.0).abs() < 1e-9);

        let mut both = act_only.clone();
        both.sat_score = Some(1400.0);
        let with_sat = academic_score(
            &both,
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        // The SAT sits at the default average, so the perfect ACT is ignored.
        assert_eq!(with_sat, 50.0);
    }

    #[test]
    fn academic_score_is_clamped() {
        let mut a = applicant();
        a.gpa = Some(0.0);
        a.gpa_scale = Some(4.0);
        a.sat_score = Some(400.0);
        a.toefl_score = Some(0.0);
        let got = academic_score(
            &a,
            &InstitutionMetrics::default(),
            &HistoricalDistribution::default(),
        );
        assert_eq!(got, 0.0);
    }

    #[test]
    fn detailed_activities_accumulate_quality_terms() {
        let details = vec![
            detail("stem", "Team Captain", 250.0),
            detail("arts", "member", 40.0),
            detail("service", "Founder", 120.0),
            detail("athletics", "member", 90.0),
        ];
        // 20 base + 12 count + 10 leadership + 5 depth + 5 diversity
        assert_eq!(activity_score(&ActivityProfile::Detailed(details)), 52.0);
    }

    #[test]
    fn chinese_leadership_titles_are_recognized() {
        let details = vec![detail("stem", "机器人社队长", 50.0)];
        // 20 base + 3 count + 5 leadership
        assert_eq!(activity_score(&ActivityProfile::Detailed(details)), 28.0);
    }

    #[test]
    fn detailed_activity_terms_are_capped() {
        let details: Vec<ActivityDetail> = (0..15)
            .map(|i| detail(&format!("cat{i}"), "president", 500.0))
            .collect();
        // 20 + 30 + 15 + 15 + 10, every term at its cap
        assert_eq!(activity_score(&ActivityProfile::Detailed(details)), 90.0);
    }

    #[test]
    fn count_only_path_keeps_legacy_shape() {
        assert_eq!(activity_score(&ActivityProfile::CountOnly(0)), 30.0);
        assert_eq!(activity_score(&ActivityProfile::CountOnly(4)), 50.0);
        assert_eq!(activity_score(&ActivityProfile::CountOnly(25)), 80.0);
    }

    #[test]
    fn tiered_awards_sum_and_clamp() {
        assert_eq!(award_score(&AwardProfile::Tiered(vec![25.0, 15.0])), 40.0);
        assert_eq!(award_score(&AwardProfile::Tiered(vec![])), 0.0);
        assert_eq!(
            award_score(&AwardProfile::Tiered(vec![25.0; 10])),
            100.0
        );
    }

    #[test]
    fn counted_awards_follow_legacy_caps() {
        assert_eq!(
            award_score(&AwardProfile::Counts {
                international: 0,
                national: 0,
                other: 0
            }),
            20.0
        );
        assert_eq!(
            award_score(&AwardProfile::Counts {
                international: 1,
                national: 1,
                other: 1
            }),
            60.0
        );
        assert_eq!(
            award_score(&AwardProfile::Counts {
                international: 5,
                national: 5,
                other: 10
            }),
            100.0
        );
    }
}
