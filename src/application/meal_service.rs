use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::meal::{Meal, NewMeal, StockUpdate};
use crate::domain::ports::{CookRepository, MealRepository};

#[derive(Clone)]
pub struct MealService {
    meals: Arc<dyn MealRepository>,
    cooks: Arc<dyn CookRepository>,
}

impl MealService {
    pub fn new(meals: Arc<dyn MealRepository>, cooks: Arc<dyn CookRepository>) -> Self {
        Self { meals, cooks }
    }

    pub fn create(&self, meal: NewMeal) -> Result<Meal, DomainError> {
        meal.validate()?;
        if self.cooks.find_by_id(meal.cook_id)?.is_none() {
            return Err(DomainError::NotFound("Cook"));
        }
        let meal = self.meals.create(meal)?;
        log::info!("Cook {} listed meal {} ({})", meal.cook_id, meal.id, meal.name);
        Ok(meal)
    }

    /// Meals customers can order right now.
    pub fn list(&self, cook_id: Option<Uuid>) -> Result<Vec<Meal>, DomainError> {
        self.meals.list_orderable(cook_id)
    }

    pub fn get(&self, id: Uuid) -> Result<Meal, DomainError> {
        self.meals.find_by_id(id)?.ok_or(DomainError::NotFound("Meal"))
    }

    pub fn update_stock(&self, id: Uuid, update: StockUpdate) -> Result<Meal, DomainError> {
        update.validate()?;
        self.meals
            .update_stock(id, update)?
            .ok_or(DomainError::NotFound("Meal"))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::cook::{Availability, Location, NewCook};
    use crate::domain::geo::Coordinates;
    use crate::domain::meal::MealCategory;
    use crate::domain::user::{NewUser, Role};
    use crate::infrastructure::MemoryStore;

    fn setup() -> (MealService, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let (_, cook) = store
            .register(
                NewUser {
                    name: "Lata".into(),
                    email: "lata@example.in".into(),
                    password_hash: "hash".into(),
                    phone: "9100000000".into(),
                    role: Role::Cook,
                },
                NewCook {
                    name: "Lata".into(),
                    bio: "Bengali sweets".into(),
                    specialties: vec![],
                    cuisine_types: vec!["Bengali".into()],
                    availability: Availability::default(),
                    location: Location {
                        coordinates: Coordinates::new(22.5726, 88.3639),
                        pincode: "700001".into(),
                        neighborhood: "BBD Bagh".into(),
                    },
                    kitchen_image_urls: vec!["a".into(), "b".into(), "c".into()],
                    upi_id: "lata@upi".into(),
                },
            )
            .unwrap();
        (MealService::new(store.clone(), store), cook.id)
    }

    fn new_meal(cook_id: Uuid, name: &str) -> NewMeal {
        NewMeal {
            cook_id,
            name: name.into(),
            description: None,
            image_url: "https://img.example/meal.jpg".into(),
            price: BigDecimal::from_str("80.00").unwrap(),
            calories: 350,
            quantity_available: 4,
            category: MealCategory::Dessert,
            tags: vec!["sweet".into()],
        }
    }

    #[test]
    fn create_requires_existing_cook() {
        let (svc, _) = setup();
        let err = svc.create(new_meal(Uuid::new_v4(), "Rasgulla")).unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Cook")));
    }

    #[test]
    fn sold_out_meals_are_not_listed() {
        let (svc, cook_id) = setup();
        let rasgulla = svc.create(new_meal(cook_id, "Rasgulla")).unwrap();
        let sandesh = svc.create(new_meal(cook_id, "Sandesh")).unwrap();

        svc.update_stock(
            sandesh.id,
            StockUpdate {
                quantity_available: Some(0),
                is_available: None,
            },
        )
        .unwrap();

        let listed: Vec<Uuid> = svc.list(Some(cook_id)).unwrap().iter().map(|m| m.id).collect();
        assert_eq!(listed, vec![rasgulla.id]);
        assert!(svc.list(Some(Uuid::new_v4())).unwrap().is_empty());
    }

    #[test]
    fn stock_update_validation_and_missing_meal() {
        let (svc, _) = setup();
        assert!(matches!(
            svc.update_stock(Uuid::new_v4(), StockUpdate::default()),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            svc.update_stock(
                Uuid::new_v4(),
                StockUpdate {
                    quantity_available: Some(1),
                    is_available: None,
                }
            ),
            Err(DomainError::NotFound("Meal"))
        ));
    }
}
