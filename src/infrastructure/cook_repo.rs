use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cook::{Cook, CookUpdate, NewCook, PaymentInfo};
use crate::domain::errors::DomainError;
use crate::domain::geo::Coordinates;
use crate::domain::order::Rating;
use crate::domain::ports::{CookRepository, PaymentDirectory};
use crate::domain::user::{NewUser, User};
use crate::schema::{cooks, users};

use super::models::{CookChangeset, CookRow, NewCookRow, NewUserRow, UserRow};

pub struct DieselCookRepository {
    pool: DbPool,
}

impl DieselCookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Fold `rating` into the cook's aggregate. The row is locked with
/// `SELECT ... FOR UPDATE` so concurrent ratings for one cook queue up
/// instead of overwriting each other. Must run inside a transaction.
pub(super) fn apply_rating(
    conn: &mut PgConnection,
    cook_id: Uuid,
    rating: Rating,
) -> Result<Cook, DomainError> {
    let row = cooks::table
        .find(cook_id)
        .select(CookRow::as_select())
        .for_update()
        .first::<CookRow>(conn)
        .optional()?
        .ok_or(DomainError::NotFound("Cook"))?;

    let aggregate = Cook::from(row).rating.record(rating);

    let row = diesel::update(cooks::table.find(cook_id))
        .set((
            cooks::average_rating.eq(aggregate.average),
            cooks::rating_count.eq(aggregate.count),
        ))
        .returning(CookRow::as_returning())
        .get_result::<CookRow>(conn)?;

    Ok(row.into())
}

impl CookRepository for DieselCookRepository {
    fn register(&self, account: NewUser, cook: NewCook) -> Result<(User, Cook), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. The login account
            let user: User = diesel::insert_into(users::table)
                .values(&NewUserRow::new(account))
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(conn)?
                .try_into()?;

            // 2. The public profile, linked to the account
            let cook: Cook = diesel::insert_into(cooks::table)
                .values(&NewCookRow::new(Some(user.id), cook))
                .returning(CookRow::as_returning())
                .get_result::<CookRow>(conn)?
                .into();

            Ok((user, cook))
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Cook>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = cooks::table
            .find(id)
            .select(CookRow::as_select())
            .first::<CookRow>(&mut conn)
            .optional()?;

        Ok(row.map(Cook::from))
    }

    fn list(&self) -> Result<Vec<Cook>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<CookRow> = cooks::table
            .select(CookRow::as_select())
            .order(cooks::created_at.desc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Cook::from).collect())
    }

    fn find_by_pincode(&self, pincode: &str) -> Result<Vec<Cook>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<CookRow> = cooks::table
            .filter(cooks::pincode.eq(pincode))
            .select(CookRow::as_select())
            .order(cooks::created_at.desc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Cook::from).collect())
    }

    fn find_near(&self, center: Coordinates, radius_km: f64) -> Result<Vec<Cook>, DomainError> {
        let mut conn = self.pool.get()?;
        let bbox = center.bounding_box(radius_km);
        let (min_lat, max_lat) = bbox.latitude;

        let mut query = cooks::table
            .filter(cooks::latitude.between(min_lat, max_lat))
            .select(CookRow::as_select())
            .into_boxed();
        if let Some((min_lon, max_lon)) = bbox.longitude {
            query = query.filter(cooks::longitude.between(min_lon, max_lon));
        }

        let rows: Vec<CookRow> = query.load(&mut conn)?;
        Ok(rows.into_iter().map(Cook::from).collect())
    }

    fn update(&self, id: Uuid, update: CookUpdate) -> Result<Option<Cook>, DomainError> {
        if update.is_empty() {
            return self.find_by_id(id);
        }

        let mut conn = self.pool.get()?;

        let row = diesel::update(cooks::table.find(id))
            .set(&CookChangeset::from(update))
            .returning(CookRow::as_returning())
            .get_result::<CookRow>(&mut conn)
            .optional()?;

        Ok(row.map(Cook::from))
    }
}

impl PaymentDirectory for DieselCookRepository {
    fn payment_info(&self, cook_id: Uuid) -> Result<Option<PaymentInfo>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = cooks::table
            .find(cook_id)
            .select((cooks::name, cooks::upi_id))
            .first::<(String, String)>(&mut conn)
            .optional()?;

        Ok(row.map(|(name, upi_id)| PaymentInfo::new(name, &upi_id)))
    }
}
