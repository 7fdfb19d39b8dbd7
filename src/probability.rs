//! Admission probability, reach/match/safety tiering, and the data
//! confidence estimate. The probability model is a fixed heuristic kept
//! for compatibility: the institution's base rate scaled by 1.2 per ten
//! overall points away from 50, bounded so the engine never claims
//! certainty either way.

use crate::constants::{
    DEFAULT_ACCEPTANCE_RATE, MODERATE_MATCH_MIN, MODERATE_RATE_MAX, MODERATE_SAFETY_MIN,
    OPEN_MATCH_MIN, OPEN_SAFETY_MIN, PROBABILITY_CEILING, PROBABILITY_FLOOR, SELECTIVE_MATCH_MIN,
    SELECTIVE_RATE_MAX,
};
use crate::models::{
    ActivityProfile, ApplicantMetrics, AwardProfile, Confidence, HistoricalDistribution,
    InstitutionMetrics, Prediction, Tier,
};
use crate::scoring;

/// Evaluates one applicant against one institution. This is the single
/// entry point shared by prediction, ranking, and school-list tiering so
/// the formula cannot drift between call sites.
pub fn evaluate(
    applicant: &ApplicantMetrics,
    institution: &InstitutionMetrics,
    history: &HistoricalDistribution,
) -> Prediction {
    let breakdown = scoring::score_breakdown(applicant, institution, history);
    let probability = admission_probability(breakdown.overall, institution.acceptance_rate);
    let tier = classify_tier(probability, institution.acceptance_rate);
    let confidence = estimate_confidence(applicant, institution);
    Prediction {
        breakdown,
        probability,
        tier,
        confidence,
    }
}

/// Probability in [0.05, 0.95]: acceptance fraction (or the 0.30 default)
/// times 1.2^((overall - 50) / 10).
pub fn admission_probability(overall: f64, acceptance_rate: Option<f64>) -> f64 {
    let base = acceptance_rate.unwrap_or(DEFAULT_ACCEPTANCE_RATE) / 100.0;
    let odds_factor = 1.2_f64.powf((overall - 50.0) / 10.0);
    (base * odds_factor).clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING)
}

/// Tier by acceptance-rate bracket. Each bracket carries its own
/// probability thresholds; the most selective bracket never yields a
/// safety.
pub fn classify_tier(probability: f64, acceptance_rate: Option<f64>) -> Tier {
    let rate = acceptance_rate.unwrap_or(DEFAULT_ACCEPTANCE_RATE);
    if rate < SELECTIVE_RATE_MAX {
        if probability >= SELECTIVE_MATCH_MIN {
            Tier::Match
        } else {
            Tier::Reach
        }
    } else if rate < MODERATE_RATE_MAX {
        if probability >= MODERATE_SAFETY_MIN {
            Tier::Safety
        } else if probability >= MODERATE_MATCH_MIN {
            Tier::Match
        } else {
            Tier::Reach
        }
    } else if probability >= OPEN_SAFETY_MIN {
        Tier::Safety
    } else if probability >= OPEN_MATCH_MIN {
        Tier::Match
    } else {
        Tier::Reach
    }
}

/// Counts six data-presence signals and buckets the total. Informational
/// only; a low-confidence profile still scores.
pub fn estimate_confidence(
    applicant: &ApplicantMetrics,
    institution: &InstitutionMetrics,
) -> Confidence {
    let has_activities = match &applicant.activities {
        ActivityProfile::Detailed(details) => !details.is_empty(),
        ActivityProfile::CountOnly(count) => *count > 0,
    };
    let has_awards = match &applicant.awards {
        AwardProfile::Tiered(points) => !points.is_empty(),
        AwardProfile::Counts {
            international,
            national,
            other,
        } => international + national + other > 0,
    };
    let has_test_avg = institution.sat_avg.is_some()
        || institution.act_avg.is_some()
        || (institution.sat25.is_some() && institution.sat75.is_some());

    let signals = [
        applicant.gpa.is_some(),
        applicant.sat_score.is_some() || applicant.act_score.is_some(),
        has_activities,
        has_awards,
        institution.acceptance_rate.is_some(),
        has_test_avg,
    ];
    match signals.iter().filter(|&&s| s).count() {
        0..=2 => Confidence::Low,
        3..=4 => Confidence::Medium,
        _ => Confidence::High,
    }
}
