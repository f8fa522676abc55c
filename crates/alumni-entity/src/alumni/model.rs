//! Alumni directory record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A graduate listed in the alumni directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Alumni {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub graduation_year: i32,
    pub degree: String,
    pub field_of_study: String,
    pub current_company: Option<String>,
    pub current_position: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alumni {
    /// Case-insensitive substring match over name, email and company.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.email.as_str()),
            self.current_company.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Overwrite every editable field.
    pub fn apply(&mut self, fields: AlumniFields) {
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.email = fields.email;
        self.phone = fields.phone;
        self.graduation_year = fields.graduation_year;
        self.degree = fields.degree;
        self.field_of_study = fields.field_of_study;
        self.current_company = fields.current_company;
        self.current_position = fields.current_position;
        self.city = fields.city;
        self.country = fields.country;
        self.updated_at = Utc::now();
    }
}

/// Editable fields of an alumni record, used for both create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlumniFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub graduation_year: i32,
    pub degree: String,
    pub field_of_study: String,
    pub current_company: Option<String>,
    pub current_position: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl AlumniFields {
    /// Materialize a new record with a fresh id.
    pub fn into_record(self) -> Alumni {
        let now = Utc::now();
        Alumni {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            graduation_year: self.graduation_year,
            degree: self.degree,
            field_of_study: self.field_of_study,
            current_company: self.current_company,
            current_position: self.current_position,
            city: self.city,
            country: self.country,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Number of directory records added in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AlumniYearCount {
    pub year: i32,
    pub total_alumni: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> AlumniFields {
        AlumniFields {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.edu".into(),
            phone: None,
            graduation_year: 1843,
            degree: "BSc".into(),
            field_of_study: "Mathematics".into(),
            current_company: Some("Analytical Engines Ltd".into()),
            current_position: None,
            city: Some("London".into()),
            country: None,
        }
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let record = fields().into_record();
        assert!(record.matches("lovelace"));
        assert!(record.matches("ENGINES"));
        assert!(!record.matches("babbage"));
    }
}
