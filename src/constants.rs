//! Shared scoring configuration. Every scorer reads its weights, tier
//! tables, and fallback defaults from here; nothing below may redefine them.

/// Component weights for the overall score. Must sum to exactly 1.0.
pub struct ScoringWeights {
    pub academic: f64,
    pub activity: f64,
    pub award: f64,
}

pub const SCORING_WEIGHTS: ScoringWeights = ScoringWeights {
    academic: 0.50,
    activity: 0.30,
    award: 0.20,
};

/// Minimum number of platform observations before an empirical sample
/// outranks institution-published data.
pub const MIN_SAMPLE_SIZE: usize = 30;

/// Per-family constants for the linear difference-from-average bonus
/// model: the average assumed when an institution publishes nothing, and
/// the score difference worth one bonus point.
pub struct TestDefaults {
    pub average: f64,
    pub points_per_bonus: f64,
}

pub const SAT_DEFAULTS: TestDefaults = TestDefaults {
    average: 1400.0,
    points_per_bonus: 20.0,
};

/// ACT equivalents, rescaled from the SAT constants by the 36:1600 ratio.
pub const ACT_DEFAULTS: TestDefaults = TestDefaults {
    average: 31.5,
    points_per_bonus: 20.0 * 36.0 / 1600.0,
};

/// Fallback acceptance rate (percent) when an institution does not
/// publish one.
pub const DEFAULT_ACCEPTANCE_RATE: f64 = 30.0;

pub const PROBABILITY_FLOOR: f64 = 0.05;
pub const PROBABILITY_CEILING: f64 = 0.95;

/// Acceptance-rate bracket boundaries (percent) for tier classification.
pub const SELECTIVE_RATE_MAX: f64 = 15.0;
pub const MODERATE_RATE_MAX: f64 = 30.0;

/// Probability thresholds per bracket. The selective bracket has no
/// safety threshold: no school admitting under 15% is ever a safety.
pub const SELECTIVE_MATCH_MIN: f64 = 0.25;
pub const MODERATE_SAFETY_MIN: f64 = 0.60;
pub const MODERATE_MATCH_MIN: f64 = 0.30;
pub const OPEN_SAFETY_MIN: f64 = 0.50;
pub const OPEN_MATCH_MIN: f64 = 0.25;

/// Cumulative hours above which an activity counts as sustained depth.
pub const DEEP_ACTIVITY_HOURS: f64 = 200.0;

/// Role keywords that mark a leadership position. Matched
/// case-insensitively as substrings of the stored role text.
pub const LEADERSHIP_KEYWORDS: &[&str] = &[
    "president",
    "captain",
    "founder",
    "chair",
    "head",
    "lead",
    "director",
    "organizer",
    "主席",
    "会长",
    "社长",
    "队长",
    "部长",
    "创始人",
    "负责人",
];

/// Tier points for recognized competitions, scanned in order with the
/// first matching entry winning. Keys are matched as substrings of the
/// lowercased competition name, most specific first.
pub const COMPETITION_TIERS: &[(&str, f64)] = &[
    ("imo", 25.0),
    ("ioi", 25.0),
    ("ipho", 24.0),
    ("icho", 24.0),
    ("ibo", 23.0),
    ("isef", 22.0),
    ("igem", 20.0),
    ("usamo", 20.0),
    ("aime", 14.0),
    ("amc", 10.0),
    ("olympiad", 18.0),
    ("deca", 8.0),
    ("hosa", 8.0),
];

/// Coarser points by award level, used when the competition is unknown.
/// Ordered most specific first: "international" would otherwise match the
/// "national" key as a substring.
pub const AWARD_LEVEL_SCORES: &[(&str, f64)] = &[
    ("international", 20.0),
    ("national", 15.0),
    ("regional", 8.0),
    ("state", 8.0),
    ("school", 4.0),
];

/// Points for an award whose competition and level are both unknown.
pub const AWARD_LEVEL_DEFAULT: f64 = 5.0;
