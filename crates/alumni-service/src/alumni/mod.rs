//! Alumni directory service.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use alumni_core::error::AppError;
use alumni_core::result::AppResult;
use alumni_core::types::{PageRequest, PageResponse};
use alumni_database::store::AlumniStore;
use alumni_entity::alumni::{Alumni, AlumniFields, AlumniYearCount};

use crate::validation::{require_non_blank, validate_email, validate_phone};

const MIN_GRADUATION_YEAR: i32 = 1900;
const MAX_GRADUATION_YEAR: i32 = 2100;

#[derive(Debug, Clone)]
pub struct AlumniService {
    store: Arc<dyn AlumniStore>,
}

impl AlumniService {
    pub fn new(store: Arc<dyn AlumniStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, page: PageRequest) -> AppResult<PageResponse<Alumni>> {
        self.store.list(page).await
    }

    /// Substring search over name, email and company.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Alumni>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::validation("Search query is required"));
        }
        self.store.search(query).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Alumni> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Alumni not found"))
    }

    pub async fn create(&self, fields: AlumniFields) -> AppResult<Alumni> {
        validate_fields(&fields)?;
        let record = self.store.create(&fields).await?;
        info!(alumni_id = %record.id, email = %record.email, "Alumni created");
        Ok(record)
    }

    /// Replaces every editable field.
    pub async fn update(&self, id: Uuid, fields: AlumniFields) -> AppResult<Alumni> {
        validate_fields(&fields)?;
        self.get(id).await?;
        let record = self.store.update(id, &fields).await?;
        info!(alumni_id = %id, "Alumni updated");
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::not_found("Alumni not found"));
        }
        info!(alumni_id = %id, "Alumni deleted");
        Ok(())
    }

    /// Directory size per year records were added, newest year first.
    pub async fn statistics(&self) -> AppResult<Vec<AlumniYearCount>> {
        self.store.count_by_year().await
    }
}

fn validate_fields(fields: &AlumniFields) -> AppResult<()> {
    require_non_blank(&fields.first_name, "First name")?;
    require_non_blank(&fields.last_name, "Last name")?;
    require_non_blank(&fields.degree, "Degree")?;
    require_non_blank(&fields.field_of_study, "Field of study")?;
    validate_email(&fields.email)?;
    if !(MIN_GRADUATION_YEAR..=MAX_GRADUATION_YEAR).contains(&fields.graduation_year) {
        return Err(AppError::validation(format!(
            "Graduation year must be between {MIN_GRADUATION_YEAR} and {MAX_GRADUATION_YEAR}"
        )));
    }
    if let Some(phone) = &fields.phone {
        validate_phone(phone)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use alumni_core::ErrorKind;
    use alumni_core::types::PageRequest;
    use alumni_entity::alumni::AlumniFields;

    use crate::testing::TestServices;

    fn fields(email: &str) -> AlumniFields {
        AlumniFields {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: email.into(),
            phone: Some("5550001111".into()),
            graduation_year: 1934,
            degree: "PhD".into(),
            field_of_study: "Mathematics".into(),
            current_company: Some("US Navy".into()),
            current_position: Some("Rear Admiral".into()),
            city: None,
            country: None,
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let svc = TestServices::new();
        let created = svc.alumni.create(fields("grace@yale.edu")).await.unwrap();
        assert_eq!(svc.alumni.get(created.id).await.unwrap(), created);

        let mut changed = fields("grace@yale.edu");
        changed.city = Some("Arlington".into());
        let updated = svc.alumni.update(created.id, changed).await.unwrap();
        assert_eq!(updated.city.as_deref(), Some("Arlington"));

        svc.alumni.delete(created.id).await.unwrap();
        assert_eq!(
            svc.alumni.get(created.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            svc.alumni.delete(created.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_validation() {
        let svc = TestServices::new();

        let mut year = fields("a@b.edu");
        year.graduation_year = 1899;
        assert_eq!(svc.alumni.create(year).await.unwrap_err().kind, ErrorKind::Validation);

        let mut degree = fields("a@b.edu");
        degree.degree = " ".into();
        assert_eq!(svc.alumni.create(degree).await.unwrap_err().kind, ErrorKind::Validation);

        let mut phone = fields("a@b.edu");
        phone.phone = Some("12345".into());
        assert_eq!(svc.alumni.create(phone).await.unwrap_err().kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let svc = TestServices::new();
        svc.alumni.create(fields("grace@yale.edu")).await.unwrap();
        let err = svc.alumni.create(fields("grace@yale.edu")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_statistics_count_records_by_year_added() {
        let svc = TestServices::new();
        assert!(svc.alumni.statistics().await.unwrap().is_empty());

        for i in 0..3 {
            svc.alumni.create(fields(&format!("grace{i}@yale.edu"))).await.unwrap();
        }

        let stats = svc.alumni.statistics().await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].year, chrono::Utc::now().year());
        assert_eq!(stats[0].total_alumni, 3);
    }

    #[tokio::test]
    async fn test_search_and_paging() {
        let svc = TestServices::new();
        for i in 0..3 {
            svc.alumni.create(fields(&format!("grace{i}@yale.edu"))).await.unwrap();
        }

        assert_eq!(svc.alumni.search("navy").await.unwrap().len(), 3);
        assert!(svc.alumni.search("ibm").await.unwrap().is_empty());
        assert_eq!(
            svc.alumni.search("  ").await.unwrap_err().kind,
            ErrorKind::Validation
        );

        let page = svc.alumni.list(PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
    }
}
