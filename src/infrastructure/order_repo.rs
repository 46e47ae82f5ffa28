use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cook::Cook;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderStatus, Rating};
use crate::domain::ports::OrderRepository;
use crate::schema::orders;

use super::cook_repo::apply_rating;
use super::models::{NewOrderRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn lock_order(conn: &mut PgConnection, id: Uuid) -> Result<Order, DomainError> {
    orders::table
        .find(id)
        .select(OrderRow::as_select())
        .for_update()
        .first::<OrderRow>(conn)
        .optional()?
        .ok_or(DomainError::NotFound("Order"))?
        .try_into()
}

fn to_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    rows.into_iter().map(Order::try_from).collect()
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(orders::table)
            .values(&NewOrderRow::new(order))
            .returning(OrderRow::as_returning())
            .get_result::<OrderRow>(&mut conn)?
            .try_into()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .optional()?
            .map(Order::try_from)
            .transpose()
    }

    fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::customer_id.eq(customer_id))
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        to_orders(rows)
    }

    fn list_by_cook(&self, cook_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::cook_id.eq(cook_id))
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .load(&mut conn)?;

        to_orders(rows)
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let mut order = lock_order(conn, id)?;
            order.transition_to(status)?;

            diesel::update(orders::table.find(id))
                .set((
                    orders::status.eq(order.status.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .returning(OrderRow::as_returning())
                .get_result::<OrderRow>(conn)?
                .try_into()
        })
    }

    fn rate(
        &self,
        id: Uuid,
        rating: Rating,
        review_text: Option<String>,
    ) -> Result<(Order, Cook), DomainError> {
        let mut conn = self.pool.get()?;

        // Order row first, then the cook row: a fixed lock order keeps
        // concurrent ratings from deadlocking.
        conn.transaction::<_, DomainError, _>(|conn| {
            let mut order = lock_order(conn, id)?;
            order.rate(rating, review_text)?;

            let order: Order = diesel::update(orders::table.find(id))
                .set((
                    orders::status.eq(order.status.as_str()),
                    orders::rating.eq(order.rating.map(Rating::value)),
                    orders::review_text.eq(order.review_text.clone()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .returning(OrderRow::as_returning())
                .get_result::<OrderRow>(conn)?
                .try_into()?;

            let cook = apply_rating(conn, order.cook_id, rating)?;
            Ok((order, cook))
        })
    }
}
