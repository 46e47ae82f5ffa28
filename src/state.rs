use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::checkout::{CheckoutService, PaymentInfoResolver};
use crate::application::cook_service::CookService;
use crate::application::meal_service::MealService;
use crate::application::order_service::OrderService;
use crate::db::DbPool;
use crate::domain::ports::{
    CookRepository, MealRepository, OrderRepository, PaymentDirectory, UserRepository,
};
use crate::infrastructure::{
    DieselCookRepository, DieselMealRepository, DieselOrderRepository, DieselUserRepository,
    MemoryStore,
};

/// Services shared by every worker. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub cooks: CookService,
    pub meals: MealService,
    pub orders: OrderService,
    pub checkout: CheckoutService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cooks: Arc<dyn CookRepository>,
        payments: Arc<dyn PaymentDirectory>,
        meals: Arc<dyn MealRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        let order_service = OrderService::new(orders.clone(), meals.clone());
        Self {
            auth: AuthService::new(users),
            cooks: CookService::new(cooks.clone(), meals.clone(), orders),
            meals: MealService::new(meals, cooks),
            checkout: CheckoutService::new(
                PaymentInfoResolver::new(payments),
                order_service.clone(),
            ),
            orders: order_service,
        }
    }

    /// Diesel repositories over one shared pool.
    pub fn postgres(pool: DbPool) -> Self {
        let cooks = Arc::new(DieselCookRepository::new(pool.clone()));
        Self::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            cooks.clone(),
            cooks,
            Arc::new(DieselMealRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool)),
        )
    }

    /// Everything backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )
    }
}
