use url::Url;

use super::domain::{Coordinates, ProfileDraft, ProfileSubmission};

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 120;
pub const MAX_PICTURES: usize = 6;
pub const MAX_TEXT_LEN: usize = 255;

/// Malformed or out-of-range input. Raised before any state is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("page must be at least 1 (found {0})")]
    PageOutOfRange(u32),
    #[error("page size must be between 1 and {max} (found {found})")]
    PageSizeOutOfRange { found: u32, max: u32 },
    #[error("latitude must be between -90 and 90 (found {0})")]
    LatitudeOutOfRange(f64),
    #[error("longitude must be between -180 and 180 (found {0})")]
    LongitudeOutOfRange(f64),
    #[error("latitude and longitude must be supplied together")]
    IncompleteCoordinates,
    #[error("age must be between 18 and 120 (found {0})")]
    AgeOutOfRange(u32),
    #[error("name must not be blank")]
    BlankName,
    #[error("between 1 and 6 pictures are required (found {0})")]
    PictureCount(usize),
    #[error("picture reference is not an http(s) URL: {0}")]
    InvalidPictureUrl(String),
    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("actors cannot record interest in their own profile")]
    SelfInterest,
}

/// Both halves of a coordinate pair or neither.
pub fn coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<Coordinates>, ValidationError> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(latitude), Some(longitude)) => {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(ValidationError::LatitudeOutOfRange(latitude));
            }
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(ValidationError::LongitudeOutOfRange(longitude));
            }
            Ok(Some(Coordinates::new(latitude, longitude)))
        }
        _ => Err(ValidationError::IncompleteCoordinates),
    }
}

pub fn age(value: u32) -> Result<u8, ValidationError> {
    if !(MIN_AGE..=MAX_AGE).contains(&value) {
        return Err(ValidationError::AgeOutOfRange(value));
    }
    u8::try_from(value).map_err(|_| ValidationError::AgeOutOfRange(value))
}

/// Convert an inbound submission into a draft the directory can persist.
pub fn profile_draft(submission: ProfileSubmission) -> Result<ProfileDraft, ValidationError> {
    let name = submission.name.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::BlankName);
    }
    if name.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_TEXT_LEN,
        });
    }

    let age = age(u32::from(submission.age))?;

    if submission.pictures.is_empty() || submission.pictures.len() > MAX_PICTURES {
        return Err(ValidationError::PictureCount(submission.pictures.len()));
    }
    let pictures = submission
        .pictures
        .into_iter()
        .map(picture_url)
        .collect::<Result<Vec<_>, _>>()?;

    let location = coordinates(submission.latitude, submission.longitude)?;
    let bio = optional_text("bio", submission.bio)?;
    let city = optional_text("city", submission.city)?;

    Ok(ProfileDraft {
        name,
        age,
        pictures,
        location,
        bio,
        city,
    })
}

fn picture_url(raw: String) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(trimmed.to_string())
        }
        _ => Err(ValidationError::InvalidPictureUrl(raw)),
    }
}

fn optional_text(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(Some(trimmed.to_string()))
}
