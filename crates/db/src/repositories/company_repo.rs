//! Repository for the singleton `company_profile` row.

use sqlx::PgPool;

use crate::models::company::{CompanyProfile, UpdateCompanyProfile};

const COLUMNS: &str = "id, name, address_line1, address_line2, city, state, country, \
                       postal_code, contact_email, contact_phone, created_at, updated_at";

/// Provides read/update access to the company profile.
pub struct CompanyProfileRepo;

impl CompanyProfileRepo {
    /// Fetch the profile. The row is seeded by migration; exactly one
    /// exists.
    pub async fn get(pool: &PgPool) -> Result<CompanyProfile, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM company_profile ORDER BY id LIMIT 1");
        sqlx::query_as::<_, CompanyProfile>(&query)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        input: &UpdateCompanyProfile,
    ) -> Result<CompanyProfile, sqlx::Error> {
        let query = format!(
            "UPDATE company_profile SET \
                name = COALESCE($1, name), \
                address_line1 = COALESCE($2, address_line1), \
                address_line2 = COALESCE($3, address_line2), \
                city = COALESCE($4, city), \
                state = COALESCE($5, state), \
                country = COALESCE($6, country), \
                postal_code = COALESCE($7, postal_code), \
                contact_email = COALESCE($8, contact_email), \
                contact_phone = COALESCE($9, contact_phone) \
             WHERE id = (SELECT id FROM company_profile ORDER BY id LIMIT 1) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompanyProfile>(&query)
            .bind(input.name.as_deref())
            .bind(input.address_line1.as_deref())
            .bind(input.address_line2.as_deref())
            .bind(input.city.as_deref())
            .bind(input.state.as_deref())
            .bind(input.country.as_deref())
            .bind(input.postal_code.as_deref())
            .bind(input.contact_email.as_deref())
            .bind(input.contact_phone.as_deref())
            .fetch_one(pool)
            .await
    }
}
