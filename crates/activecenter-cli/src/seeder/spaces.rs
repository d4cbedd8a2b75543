use activecenter_core::AppError;
use activecenter_db::{Criteria, Repository};
use activecenter_models::{CreateSpaceDto, Space};

/// Outcome of a seeding run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: Vec<String>,
    pub skipped: Vec<String>,
}

fn space(
    title: &str,
    description: &str,
    price_hour: f64,
    max_people: i32,
    details: &str,
    characteristics: &[&str],
) -> CreateSpaceDto {
    CreateSpaceDto {
        title: title.to_string(),
        description: description.to_string(),
        price_hour,
        max_people: Some(max_people),
        details: Some(details.to_string()),
        characteristics: characteristics.iter().map(|c| c.to_string()).collect(),
    }
}

/// The facilities every club starts with.
pub fn default_spaces() -> Vec<CreateSpaceDto> {
    vec![
        space(
            "Tennis Court",
            "Clay tennis court with night lighting",
            20.0,
            4,
            "Rackets available at the front desk",
            &["Clay surface", "Night lighting"],
        ),
        space(
            "Swimming Pool",
            "Heated semi-olympic pool",
            15.0,
            30,
            "Swimming cap required",
            &["Heated", "Six lanes", "Lifeguard"],
        ),
        space(
            "Football Field",
            "Synthetic grass five-a-side field",
            40.0,
            10,
            "Bibs and balls included",
            &["Synthetic grass", "Floodlights"],
        ),
        space(
            "Paddle Court",
            "Glass-walled paddle court",
            18.0,
            4,
            "Indoor, available all year",
            &["Glass walls", "Indoor"],
        ),
        space(
            "Basketball Court",
            "Indoor hardwood court",
            25.0,
            10,
            "Scoreboard on request",
            &["Hardwood floor", "Scoreboard"],
        ),
        space(
            "Gym",
            "Weights and cardio room",
            8.0,
            25,
            "Towel required",
            &["Free weights", "Cardio machines", "Lockers"],
        ),
    ]
}

/// Inserts every default space whose title is not already taken.
///
/// Running it twice is harmless: the second run skips everything.
pub async fn seed_spaces(repo: &dyn Repository<Space>) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();

    for dto in default_spaces() {
        if repo.find_one(Criteria::Key(&dto.title)).await?.is_some() {
            report.skipped.push(dto.title);
            continue;
        }

        let title = dto.title.clone();
        repo.save(Space::new(dto)).await?;
        report.inserted.push(title);
    }

    Ok(report)
}
