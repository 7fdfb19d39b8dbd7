//! Boundary between persisted records and the engine's strict input
//! structures. All "is this field present" decisions happen here, exactly
//! once: downstream scorers only ever see one resolved shape.

use crate::constants::{AWARD_LEVEL_DEFAULT, AWARD_LEVEL_SCORES, COMPETITION_TIERS};
use crate::models::{
    ActivityDetail, ActivityProfile, ApplicantMetrics, ApplicantRecord, AwardProfile, AwardRecord,
    HistoricalDistribution, InstitutionMetrics, InstitutionRecord, ScoreSampleRecord,
};
use crate::normalize::{parse_range, parse_range_midpoint};

pub fn applicant_metrics(record: &ApplicantRecord) -> ApplicantMetrics {
    ApplicantMetrics {
        gpa: record.gpa,
        gpa_scale: record.gpa_scale,
        sat_score: record.sat.map(f64::from),
        act_score: record.act.map(f64::from),
        toefl_score: record.toefl.map(f64::from),
        activities: activity_profile(record),
        awards: award_profile(record),
    }
}

/// Detailed rows win over the legacy count column; records imported
/// before per-activity tracking existed fall back to the count.
fn activity_profile(record: &ApplicantRecord) -> ActivityProfile {
    if record.activities.is_empty() {
        return ActivityProfile::CountOnly(record.activity_count.max(0) as usize);
    }
    let details = record
        .activities
        .iter()
        .map(|row| ActivityDetail {
            category: row.category.clone().unwrap_or_default(),
            role: row.role.clone().unwrap_or_default(),
            total_hours: row.total_hours.unwrap_or(0.0),
        })
        .collect();
    ActivityProfile::Detailed(details)
}

/// Per-award tier points when award rows exist, otherwise the legacy
/// level counts. The "other" count is whatever remains of the total after
/// the national and international columns.
fn award_profile(record: &ApplicantRecord) -> AwardProfile {
    if record.awards.is_empty() {
        let international = record.international_award_count.max(0) as usize;
        let national = record.national_award_count.max(0) as usize;
        let other = (record.award_count
            - record.international_award_count
            - record.national_award_count)
            .max(0) as usize;
        return AwardProfile::Counts {
            international,
            national,
            other,
        };
    }
    AwardProfile::Tiered(record.awards.iter().map(award_tier_points).collect())
}

/// Tier points for one award: a recognized competition name is the most
/// precise source, the award level is the coarser fallback, and an award
/// with neither gets the floor value.
fn award_tier_points(award: &AwardRecord) -> f64 {
    if let Some(competition) = &award.competition {
        let name = competition.to_lowercase();
        if let Some((_, points)) = COMPETITION_TIERS.iter().find(|(key, _)| name.contains(key)) {
            return *points;
        }
    }
    if let Some(level) = &award.level {
        let level = level.to_lowercase();
        if let Some((_, points)) = AWARD_LEVEL_SCORES.iter().find(|(key, _)| level.contains(key)) {
            return *points;
        }
    }
    AWARD_LEVEL_DEFAULT
}

pub fn institution_metrics(record: &InstitutionRecord) -> InstitutionMetrics {
    let sat_band = record.sat_range.as_deref().and_then(parse_range);
    let act_band = record.act_range.as_deref().and_then(parse_range);
    InstitutionMetrics {
        acceptance_rate: record
            .acceptance_rate
            .as_deref()
            .and_then(parse_range_midpoint)
            .map(|rate| rate.clamp(0.0, 100.0)),
        sat_avg: record.sat_avg.map(f64::from),
        sat25: sat_band.map(|(low, _)| low),
        sat75: sat_band.map(|(_, high)| high),
        act_avg: record.act_avg.map(f64::from),
        act25: act_band.map(|(low, _)| low),
        act75: act_band.map(|(_, high)| high),
        rank: record
            .rank
            .as_deref()
            .and_then(parse_range_midpoint)
            .map(|rank| rank.round().max(1.0) as u32),
    }
}

/// Splits the raw history rows into the three sorted sample arrays.
pub fn historical_distribution(samples: &[ScoreSampleRecord]) -> HistoricalDistribution {
    let mut distribution = HistoricalDistribution {
        sat_values: samples
            .iter()
            .filter_map(|s| s.sat.map(f64::from))
            .collect(),
        gpa_values: samples.iter().filter_map(|s| s.gpa).collect(),
        toefl_values: samples
            .iter()
            .filter_map(|s| s.toefl.map(f64::from))
            .collect(),
    };
    distribution
        .sat_values
        .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    distribution
        .gpa_values
        .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    distribution
        .toefl_values
        .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    distribution
}
