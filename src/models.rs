use serde::Serialize;
use uuid::Uuid;

// ---- Engine input structures -------------------------------------------
//
// Built by the adapters in `adapters.rs`; everything downstream of that
// boundary sees exactly one shape per field, with the absent-vs-zero
// distinction carried by Option.

#[derive(Debug, Clone, Default)]
pub struct ApplicantMetrics {
    pub gpa: Option<f64>,
    pub gpa_scale: Option<f64>,
    pub sat_score: Option<f64>,
    pub act_score: Option<f64>,
    pub toefl_score: Option<f64>,
    pub activities: ActivityProfile,
    pub awards: AwardProfile,
}

/// Activity data resolved once at the adapter boundary: either full
/// per-activity detail or a bare legacy count.
#[derive(Debug, Clone)]
pub enum ActivityProfile {
    Detailed(Vec<ActivityDetail>),
    CountOnly(usize),
}

impl Default for ActivityProfile {
    fn default() -> Self {
        Self::CountOnly(0)
    }
}

#[derive(Debug, Clone)]
pub struct ActivityDetail {
    pub category: String,
    pub role: String,
    pub total_hours: f64,
}

/// Award data resolved once at the adapter boundary: per-award tier
/// points, or the legacy level counts.
#[derive(Debug, Clone)]
pub enum AwardProfile {
    Tiered(Vec<f64>),
    Counts {
        international: usize,
        national: usize,
        other: usize,
    },
}

impl Default for AwardProfile {
    fn default() -> Self {
        Self::Counts {
            international: 0,
            national: 0,
            other: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstitutionMetrics {
    /// Percent in [0, 100].
    pub acceptance_rate: Option<f64>,
    pub sat_avg: Option<f64>,
    pub sat25: Option<f64>,
    pub sat75: Option<f64>,
    pub act_avg: Option<f64>,
    pub act25: Option<f64>,
    pub act75: Option<f64>,
    pub rank: Option<u32>,
}

/// Previously observed scores across the platform's own population, each
/// array sorted ascending. An array is only consulted when it holds at
/// least `constants::MIN_SAMPLE_SIZE` observations.
#[derive(Debug, Clone, Default)]
pub struct HistoricalDistribution {
    pub sat_values: Vec<f64>,
    pub gpa_values: Vec<f64>,
    pub toefl_values: Vec<f64>,
}

// ---- Engine outputs ----------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub academic: f64,
    pub activity: f64,
    pub award: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Reach,
    Match,
    Safety,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reach => "reach",
            Self::Match => "match",
            Self::Safety => "safety",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One applicant evaluated against one institution.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub breakdown: ScoreBreakdown,
    pub probability: f64,
    pub tier: Tier,
    pub confidence: Confidence,
}

/// 25th/50th/75th percentile of one score dimension across a cohort.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PercentileBand {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CohortBands {
    pub overall: PercentileBand,
    pub academic: PercentileBand,
    pub activity: PercentileBand,
    pub award: PercentileBand,
}

#[derive(Debug, Clone)]
pub struct RankedApplicant {
    pub rank: usize,
    pub full_name: String,
    pub email: String,
    pub cohort: String,
    pub breakdown: ScoreBreakdown,
}

/// One institution on an applicant's school list.
#[derive(Debug, Clone)]
pub struct SchoolMatch {
    pub institution: String,
    pub acceptance_rate: Option<f64>,
    pub rank: Option<u32>,
    pub prediction: Prediction,
}

// ---- Persisted records (storage-layer shapes) --------------------------

#[derive(Debug, Clone)]
pub struct ApplicantRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub cohort: String,
    pub gpa: Option<f64>,
    pub gpa_scale: Option<f64>,
    pub sat: Option<i32>,
    pub act: Option<i32>,
    pub toefl: Option<i32>,
    pub activity_count: i32,
    pub award_count: i32,
    pub national_award_count: i32,
    pub international_award_count: i32,
    pub activities: Vec<ActivityRecord>,
    pub awards: Vec<AwardRecord>,
}

#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub category: Option<String>,
    pub role: Option<String>,
    pub total_hours: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AwardRecord {
    pub title: String,
    pub competition: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InstitutionRecord {
    pub id: Uuid,
    pub name: String,
    pub acceptance_rate: Option<String>,
    pub sat_range: Option<String>,
    pub sat_avg: Option<i32>,
    pub act_range: Option<String>,
    pub act_avg: Option<i32>,
    pub rank: Option<String>,
}

/// One row of the platform score history; any subset of the three values
/// may be present.
#[derive(Debug, Clone, Copy)]
pub struct ScoreSampleRecord {
    pub sat: Option<i32>,
    pub gpa: Option<f64>,
    pub toefl: Option<i32>,
}
