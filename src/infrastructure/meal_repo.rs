use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::meal::{Meal, NewMeal, StockUpdate};
use crate::domain::ports::MealRepository;
use crate::schema::meals;

use super::models::{MealRow, NewMealRow, StockChangeset};

pub struct DieselMealRepository {
    pool: DbPool,
}

impl DieselMealRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_meals(rows: Vec<MealRow>) -> Result<Vec<Meal>, DomainError> {
    rows.into_iter().map(Meal::try_from).collect()
}

impl MealRepository for DieselMealRepository {
    fn create(&self, meal: NewMeal) -> Result<Meal, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(meals::table)
            .values(&NewMealRow::new(meal))
            .returning(MealRow::as_returning())
            .get_result::<MealRow>(&mut conn)?
            .try_into()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Meal>, DomainError> {
        let mut conn = self.pool.get()?;

        meals::table
            .find(id)
            .select(MealRow::as_select())
            .first::<MealRow>(&mut conn)
            .optional()?
            .map(Meal::try_from)
            .transpose()
    }

    fn list_orderable(&self, cook_id: Option<Uuid>) -> Result<Vec<Meal>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = meals::table
            .filter(meals::is_available.eq(true))
            .filter(meals::quantity_available.gt(0))
            .select(MealRow::as_select())
            .order(meals::created_at.desc())
            .into_boxed();
        if let Some(cook_id) = cook_id {
            query = query.filter(meals::cook_id.eq(cook_id));
        }

        to_meals(query.load(&mut conn)?)
    }

    fn list_by_cook(&self, cook_id: Uuid) -> Result<Vec<Meal>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = meals::table
            .filter(meals::cook_id.eq(cook_id))
            .select(MealRow::as_select())
            .order(meals::created_at.desc())
            .load(&mut conn)?;

        to_meals(rows)
    }

    fn update_stock(&self, id: Uuid, update: StockUpdate) -> Result<Option<Meal>, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(meals::table.find(id))
            .set(&StockChangeset::from(update))
            .returning(MealRow::as_returning())
            .get_result::<MealRow>(&mut conn)
            .optional()?
            .map(Meal::try_from)
            .transpose()
    }
}
