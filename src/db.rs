use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    ActivityRecord, ApplicantRecord, AwardRecord, InstitutionRecord, ScoreSampleRecord,
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let applicants = vec![
        (
            Uuid::parse_str("7f1c3e82-62b1-4a34-9a76-5f0d2b9f1e10")?,
            "Mei Chen",
            "mei.chen@admitpath.io",
            "2027",
            Some(3.9),
            Some(4.0),
            Some(1540),
            None::<i32>,
            Some(112),
        ),
        (
            Uuid::parse_str("2ab4c6d8-10ef-4b5c-8d3a-90e1f2a3b4c5")?,
            "Diego Alvarez",
            "diego.alvarez@admitpath.io",
            "2027",
            Some(4.3),
            Some(5.0),
            None,
            Some(33),
            None,
        ),
        (
            Uuid::parse_str("9c8b7a65-4321-4fed-bc0a-112233445566")?,
            "Sana Iqbal",
            "sana.iqbal@admitpath.io",
            "2026",
            Some(88.0),
            Some(100.0),
            Some(1380),
            None,
            Some(99),
        ),
    ];

    for (id, name, email, cohort, gpa, gpa_scale, sat, act, toefl) in applicants {
        sqlx::query(
            r#"
            INSERT INTO admitpath.applicants
            (id, full_name, email, cohort, gpa, gpa_scale, sat, act, toefl,
             activity_count, award_count, national_award_count, international_award_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, 0, 0, 0)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name, cohort = EXCLUDED.cohort
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(cohort)
        .bind(gpa)
        .bind(gpa_scale)
        .bind(sat)
        .bind(act)
        .bind(toefl)
        .execute(pool)
        .await?;
    }

    // Reseeding replaces the detail rows wholesale so reruns stay clean.
    for email in [
        "mei.chen@admitpath.io",
        "diego.alvarez@admitpath.io",
        "sana.iqbal@admitpath.io",
    ] {
        let applicant_id = applicant_id_by_email(pool, email).await?;
        sqlx::query("DELETE FROM admitpath.activities WHERE applicant_id = $1")
            .bind(applicant_id)
            .execute(pool)
            .await?;
        sqlx::query("DELETE FROM admitpath.awards WHERE applicant_id = $1")
            .bind(applicant_id)
            .execute(pool)
            .await?;
    }

    let activities = vec![
        ("mei.chen@admitpath.io", "stem", "Robotics Team Captain", 340.0),
        ("mei.chen@admitpath.io", "service", "Volunteer Tutor", 120.0),
        ("mei.chen@admitpath.io", "arts", "Orchestra Member", 210.0),
        ("diego.alvarez@admitpath.io", "athletics", "Soccer Team 队长", 260.0),
        ("diego.alvarez@admitpath.io", "stem", "Math Club Member", 80.0),
    ];

    for (email, category, role, hours) in activities {
        let applicant_id = applicant_id_by_email(pool, email).await?;
        sqlx::query(
            r#"
            INSERT INTO admitpath.activities (id, applicant_id, category, role, total_hours)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(applicant_id)
        .bind(category)
        .bind(role)
        .bind(hours)
        .execute(pool)
        .await?;
    }

    let awards = vec![
        (
            "mei.chen@admitpath.io",
            "Silver Medal",
            Some("Physics Olympiad"),
            Some("national"),
        ),
        (
            "mei.chen@admitpath.io",
            "Finalist",
            Some("ISEF"),
            Some("international"),
        ),
        (
            "diego.alvarez@admitpath.io",
            "First Prize",
            None,
            Some("regional"),
        ),
    ];

    for (email, title, competition, level) in awards {
        let applicant_id = applicant_id_by_email(pool, email).await?;
        sqlx::query(
            r#"
            INSERT INTO admitpath.awards (id, applicant_id, title, competition, level)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(applicant_id)
        .bind(title)
        .bind(competition)
        .bind(level)
        .execute(pool)
        .await?;
    }

    let institutions = vec![
        (
            "Crestwood University",
            Some("4-6%"),
            Some("1470-1570"),
            Some(1520),
            Some("33-35"),
            None::<i32>,
            Some("12"),
        ),
        (
            "Harborview College",
            Some("22%"),
            Some("1350-1480"),
            None,
            None,
            Some(31),
            Some("48"),
        ),
        (
            "Lakeshore State University",
            Some("58%"),
            None,
            Some(1240),
            None,
            None,
            Some("120-140"),
        ),
        ("Open Plains College", None, None, None, None, None, None),
    ];

    for (name, rate, sat_range, sat_avg, act_range, act_avg, rank) in institutions {
        sqlx::query(
            r#"
            INSERT INTO admitpath.institutions
            (id, name, acceptance_rate, sat_range, sat_avg, act_range, act_avg, rank)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (name) DO UPDATE
            SET acceptance_rate = EXCLUDED.acceptance_rate,
                sat_range = EXCLUDED.sat_range,
                sat_avg = EXCLUDED.sat_avg,
                act_range = EXCLUDED.act_range,
                act_avg = EXCLUDED.act_avg,
                rank = EXCLUDED.rank
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(rate)
        .bind(sat_range)
        .bind(sat_avg)
        .bind(act_range)
        .bind(act_avg)
        .bind(rank)
        .execute(pool)
        .await?;
    }

    let history = vec![
        (
            "a1000000-0000-4000-8000-000000000001",
            Some(1510),
            Some(3.9),
            Some(110),
            NaiveDate::from_ymd_opt(2025, 11, 3).context("invalid date")?,
        ),
        (
            "a1000000-0000-4000-8000-000000000002",
            Some(1360),
            Some(3.4),
            None,
            NaiveDate::from_ymd_opt(2025, 12, 18).context("invalid date")?,
        ),
        (
            "a1000000-0000-4000-8000-000000000003",
            None,
            Some(3.7),
            Some(101),
            NaiveDate::from_ymd_opt(2026, 1, 22).context("invalid date")?,
        ),
        (
            "a1000000-0000-4000-8000-000000000004",
            Some(1450),
            None,
            Some(95),
            NaiveDate::from_ymd_opt(2026, 2, 9).context("invalid date")?,
        ),
    ];

    for (id, sat, gpa, toefl, recorded_at) in history {
        sqlx::query(
            r#"
            INSERT INTO admitpath.score_history (id, sat, gpa, toefl, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(Uuid::parse_str(id)?)
        .bind(sat)
        .bind(gpa)
        .bind(toefl)
        .bind(recorded_at)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn applicant_id_by_email(pool: &PgPool, email: &str) -> anyhow::Result<Uuid> {
    let row = sqlx::query("SELECT id FROM admitpath.applicants WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .with_context(|| format!("no applicant record for {email}"))?;
    Ok(row.get("id"))
}

pub async fn fetch_applicants(
    pool: &PgPool,
    cohort: Option<&str>,
    email: Option<&str>,
) -> anyhow::Result<Vec<ApplicantRecord>> {
    let mut query = String::from(
        "SELECT id, full_name, email, cohort, gpa, gpa_scale, sat, act, toefl, \
         activity_count, award_count, national_award_count, international_award_count \
         FROM admitpath.applicants WHERE TRUE",
    );

    if cohort.is_some() {
        query.push_str(" AND cohort = $1");
    } else if email.is_some() {
        query.push_str(" AND email = $1");
    }
    query.push_str(" ORDER BY full_name");

    let mut rows = sqlx::query(&query);
    if let Some(value) = cohort {
        rows = rows.bind(value);
    } else if let Some(value) = email {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    let mut applicants = Vec::new();

    for row in records {
        let id: Uuid = row.get("id");
        applicants.push(ApplicantRecord {
            id,
            full_name: row.get("full_name"),
            email: row.get("email"),
            cohort: row.get("cohort"),
            gpa: row.get("gpa"),
            gpa_scale: row.get("gpa_scale"),
            sat: row.get("sat"),
            act: row.get("act"),
            toefl: row.get("toefl"),
            activity_count: row.get("activity_count"),
            award_count: row.get("award_count"),
            national_award_count: row.get("national_award_count"),
            international_award_count: row.get("international_award_count"),
            activities: fetch_activities(pool, id).await?,
            awards: fetch_awards(pool, id).await?,
        });
    }

    Ok(applicants)
}

pub async fn fetch_applicant_by_email(
    pool: &PgPool,
    email: &str,
) -> anyhow::Result<ApplicantRecord> {
    let mut applicants = fetch_applicants(pool, None, Some(email)).await?;
    applicants
        .pop()
        .with_context(|| format!("no applicant found for {email}"))
}

async fn fetch_activities(pool: &PgPool, applicant_id: Uuid) -> anyhow::Result<Vec<ActivityRecord>> {
    let rows = sqlx::query(
        "SELECT category, role, total_hours FROM admitpath.activities WHERE applicant_id = $1",
    )
    .bind(applicant_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ActivityRecord {
            category: row.get("category"),
            role: row.get("role"),
            total_hours: row.get("total_hours"),
        })
        .collect())
}

async fn fetch_awards(pool: &PgPool, applicant_id: Uuid) -> anyhow::Result<Vec<AwardRecord>> {
    let rows = sqlx::query(
        "SELECT title, competition, level FROM admitpath.awards WHERE applicant_id = $1",
    )
    .bind(applicant_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| AwardRecord {
            title: row.get("title"),
            competition: row.get("competition"),
            level: row.get("level"),
        })
        .collect())
}

pub async fn fetch_institutions(
    pool: &PgPool,
    name: Option<&str>,
) -> anyhow::Result<Vec<InstitutionRecord>> {
    let mut query = String::from(
        "SELECT id, name, acceptance_rate, sat_range, sat_avg, act_range, act_avg, rank \
         FROM admitpath.institutions",
    );
    if name.is_some() {
        query.push_str(" WHERE lower(name) = lower($1)");
    }
    query.push_str(" ORDER BY name");

    let mut rows = sqlx::query(&query);
    if let Some(value) = name {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    Ok(records
        .into_iter()
        .map(|row| InstitutionRecord {
            id: row.get("id"),
            name: row.get("name"),
            acceptance_rate: row.get("acceptance_rate"),
            sat_range: row.get("sat_range"),
            sat_avg: row.get("sat_avg"),
            act_range: row.get("act_range"),
            act_avg: row.get("act_avg"),
            rank: row.get("rank"),
        })
        .collect())
}

pub async fn fetch_institution_by_name(
    pool: &PgPool,
    name: &str,
) -> anyhow::Result<InstitutionRecord> {
    let mut institutions = fetch_institutions(pool, Some(name)).await?;
    institutions
        .pop()
        .with_context(|| format!("no institution found named {name}"))
}

pub async fn fetch_score_history(pool: &PgPool) -> anyhow::Result<Vec<ScoreSampleRecord>> {
    let rows = sqlx::query("SELECT sat, gpa, toefl FROM admitpath.score_history")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| ScoreSampleRecord {
            sat: row.get("sat"),
            gpa: row.get("gpa"),
            toefl: row.get("toefl"),
        })
        .collect())
}

pub async fn import_applicants_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        full_name: String,
        email: String,
        cohort: String,
        gpa: Option<f64>,
        gpa_scale: Option<f64>,
        sat: Option<i32>,
        act: Option<i32>,
        toefl: Option<i32>,
        activity_count: Option<i32>,
        award_count: Option<i32>,
        national_award_count: Option<i32>,
        international_award_count: Option<i32>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut upserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        sqlx::query(
            r#"
            INSERT INTO admitpath.applicants
            (id, full_name, email, cohort, gpa, gpa_scale, sat, act, toefl,
             activity_count, award_count, national_award_count, international_award_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                cohort = EXCLUDED.cohort,
                gpa = EXCLUDED.gpa,
                gpa_scale = EXCLUDED.gpa_scale,
                sat = EXCLUDED.sat,
                act = EXCLUDED.act,
                toefl = EXCLUDED.toefl,
                activity_count = EXCLUDED.activity_count,
                award_count = EXCLUDED.award_count,
                national_award_count = EXCLUDED.national_award_count,
                international_award_count = EXCLUDED.international_award_count
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.full_name)
        .bind(&row.email)
        .bind(&row.cohort)
        .bind(row.gpa)
        .bind(row.gpa_scale)
        .bind(row.sat)
        .bind(row.act)
        .bind(row.toefl)
        .bind(row.activity_count.unwrap_or(0))
        .bind(row.award_count.unwrap_or(0))
        .bind(row.national_award_count.unwrap_or(0))
        .bind(row.international_award_count.unwrap_or(0))
        .execute(pool)
        .await?;
        upserted += 1;
    }

    Ok(upserted)
}

pub async fn import_institutions_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        name: String,
        acceptance_rate: Option<String>,
        sat_range: Option<String>,
        sat_avg: Option<i32>,
        act_range: Option<String>,
        act_avg: Option<i32>,
        rank: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut upserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        sqlx::query(
            r#"
            INSERT INTO admitpath.institutions
            (id, name, acceptance_rate, sat_range, sat_avg, act_range, act_avg, rank)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (name) DO UPDATE
            SET acceptance_rate = EXCLUDED.acceptance_rate,
                sat_range = EXCLUDED.sat_range,
                sat_avg = EXCLUDED.sat_avg,
                act_range = EXCLUDED.act_range,
                act_avg = EXCLUDED.act_avg,
                rank = EXCLUDED.rank
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.name)
        .bind(&row.acceptance_rate)
        .bind(&row.sat_range)
        .bind(row.sat_avg)
        .bind(&row.act_range)
        .bind(row.act_avg)
        .bind(&row.rank)
        .execute(pool)
        .await?;
        upserted += 1;
    }

    Ok(upserted)
}
