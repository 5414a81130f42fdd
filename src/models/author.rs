use super::format_date_medium;
use chrono::NaiveDate;
use thiserror::Error;

pub const PERSON_NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(raw: &str) -> Result<Self, PersonNameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PersonNameError::Empty);
        }
        if trimmed.chars().count() > PERSON_NAME_MAX_LEN {
            return Err(PersonNameError::TooLong {
                max: PERSON_NAME_MAX_LEN,
            });
        }
        Ok(Self(trimmed.into()))
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersonNameError {
    #[error("must be specified")]
    Empty,
    #[error("must not exceed {max} characters")]
    TooLong { max: usize },
}

#[derive(Debug, Clone)]
pub struct Author {
    id: i64,
    first_name: PersonName,
    family_name: PersonName,
    date_of_birth: Option<NaiveDate>,
    date_of_death: Option<NaiveDate>,
}

impl Author {
    pub const fn new(
        id: i64,
        first_name: PersonName,
        family_name: PersonName,
        date_of_birth: Option<NaiveDate>,
        date_of_death: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            first_name,
            family_name,
            date_of_birth,
            date_of_death,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub const fn family_name(&self) -> &PersonName {
        &self.family_name
    }

    pub const fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    pub const fn date_of_death(&self) -> Option<NaiveDate> {
        self.date_of_death
    }

    /// Full name, or an empty string unless both name parts are present.
    #[must_use]
    pub fn name(&self) -> String {
        if self.first_name.as_str().is_empty() || self.family_name.as_str().is_empty() {
            return String::new();
        }
        format!("{} {}", self.first_name, self.family_name)
    }

    #[must_use]
    pub fn birth_date_formatted(&self) -> String {
        self.date_of_birth
            .map_or_else(|| "N/A".to_string(), format_date_medium)
    }

    #[must_use]
    pub fn death_date_formatted(&self) -> String {
        self.date_of_death
            .map_or_else(|| "current".to_string(), format_date_medium)
    }

    #[must_use]
    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            self.birth_date_formatted(),
            self.death_date_formatted()
        )
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }
}

#[derive(Debug)]
pub struct CreateAuthorRequest {
    first_name: PersonName,
    family_name: PersonName,
    date_of_birth: Option<NaiveDate>,
    date_of_death: Option<NaiveDate>,
}

impl CreateAuthorRequest {
    pub const fn new(
        first_name: PersonName,
        family_name: PersonName,
        date_of_birth: Option<NaiveDate>,
        date_of_death: Option<NaiveDate>,
    ) -> Self {
        Self {
            first_name,
            family_name,
            date_of_birth,
            date_of_death,
        }
    }

    pub const fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub const fn family_name(&self) -> &PersonName {
        &self.family_name
    }

    pub const fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    pub const fn date_of_death(&self) -> Option<NaiveDate> {
        self.date_of_death
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct CreateAuthorError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct FindAuthorRequest {
    id: i64,
}

impl FindAuthorRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum FindAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindAllAuthorsError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct DeleteAuthorRequest {
    id: i64,
}

impl DeleteAuthorRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error("Author with id \"{id}\" still has books")]
    HasDependents { id: i64 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
