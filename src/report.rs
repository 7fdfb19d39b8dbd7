use std::fmt::Write;

use chrono::NaiveDate;

use crate::constants::MIN_SAMPLE_SIZE;
use crate::models::{
    ApplicantRecord, HistoricalDistribution, SchoolMatch, ScoreBreakdown, Tier,
};
use crate::stats;

pub fn build_report(
    applicant: &ApplicantRecord,
    matches: &[SchoolMatch],
    history: &HistoricalDistribution,
    generated_on: NaiveDate,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Admission Competitiveness Report");
    let _ = writeln!(
        output,
        "Generated for {} ({}) on {}",
        applicant.full_name, applicant.email, generated_on
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Profile");
    match applicant.gpa {
        Some(gpa) => {
            let scale = applicant.gpa_scale.unwrap_or(4.0);
            let _ = writeln!(output, "- GPA: {gpa:.2} on a {scale:.1} scale");
        }
        None => {
            let _ = writeln!(output, "- GPA: not reported");
        }
    }
    if let Some(sat) = applicant.sat {
        let _ = writeln!(output, "- SAT: {sat}");
    }
    if let Some(act) = applicant.act {
        let _ = writeln!(output, "- ACT: {act}");
    }
    if let Some(toefl) = applicant.toefl {
        let _ = writeln!(output, "- TOEFL: {toefl}");
    }
    let _ = writeln!(
        output,
        "- Activities: {} recorded, awards: {}",
        if applicant.activities.is_empty() {
            applicant.activity_count.max(0) as usize
        } else {
            applicant.activities.len()
        },
        if applicant.awards.is_empty() {
            applicant.award_count.max(0) as usize
        } else {
            applicant.awards.len()
        }
    );
    for award in &applicant.awards {
        match &award.competition {
            Some(competition) => {
                let _ = writeln!(output, "  - {} ({competition})", award.title);
            }
            None => {
                let _ = writeln!(output, "  - {}", award.title);
            }
        }
    }

    append_platform_context(&mut output, applicant, history);

    let _ = writeln!(output);
    let _ = writeln!(output, "## School List");
    if matches.is_empty() {
        let _ = writeln!(output, "No institutions on file.");
    } else {
        for tier in [Tier::Reach, Tier::Match, Tier::Safety] {
            let group: Vec<&SchoolMatch> = matches
                .iter()
                .filter(|m| m.prediction.tier == tier)
                .collect();
            if group.is_empty() {
                continue;
            }
            let _ = writeln!(output);
            let _ = writeln!(output, "### {}", capitalize(tier.label()));
            for school in group {
                let _ = writeln!(
                    output,
                    "- {}: probability {:.0}%, overall {:.1} ({}), confidence {}",
                    school.institution,
                    school.prediction.probability * 100.0,
                    school.prediction.breakdown.overall,
                    format_components(&school.prediction.breakdown),
                    school.prediction.confidence.label()
                );
            }
        }
    }

    output
}

fn format_components(breakdown: &ScoreBreakdown) -> String {
    format!(
        "academic {:.1}, activity {:.1}, award {:.1}",
        breakdown.academic, breakdown.activity, breakdown.award
    )
}

/// Platform percentile lines, shown only for samples large enough to be
/// meaningful.
fn append_platform_context(
    output: &mut String,
    applicant: &ApplicantRecord,
    history: &HistoricalDistribution,
) {
    let mut lines = Vec::new();
    if let Some(sat) = applicant.sat {
        if history.sat_values.len() >= MIN_SAMPLE_SIZE {
            let pct = stats::empirical_percentile(f64::from(sat), &history.sat_values);
            lines.push(format!(
                "- SAT {sat} sits at the {:.0}th percentile of platform applicants",
                pct * 100.0
            ));
        }
    }
    if let Some(gpa) = applicant.gpa {
        if history.gpa_values.len() >= MIN_SAMPLE_SIZE {
            let pct = stats::empirical_percentile(gpa, &history.gpa_values);
            lines.push(format!(
                "- GPA {gpa:.2} sits at the {:.0}th percentile of platform applicants",
                pct * 100.0
            ));
        }
    }
    if let Some(toefl) = applicant.toefl {
        if history.toefl_values.len() >= MIN_SAMPLE_SIZE {
            let pct = stats::empirical_percentile(f64::from(toefl), &history.toefl_values);
            lines.push(format!(
                "- TOEFL {toefl} sits at the {:.0}th percentile of platform applicants",
                pct * 100.0
            ));
        }
    }

    if lines.is_empty() {
        return;
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Platform Context");
    for line in lines {
        let _ = writeln!(output, "{line}");
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
