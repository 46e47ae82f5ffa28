use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::cook::{
    geocode_pincode, validate_coordinates, Availability, Cook, CookUpdate, Location, NearbyCook,
    NewCook, PaymentInfo,
};
use crate::domain::errors::DomainError;
use crate::domain::geo::{Coordinates, DEFAULT_SEARCH_RADIUS_KM};
use crate::domain::ports::{CookRepository, MealRepository, OrderRepository};
use crate::domain::user::{Role, Signup, User};

use super::analytics::{summarize, CookAnalytics, Period};
use super::auth_service::new_account;

/// Everything needed to open a cook account and publish the profile.
#[derive(Debug, Clone)]
pub struct CookRegistration {
    pub account: Signup,
    pub bio: String,
    pub specialties: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub availability: Availability,
    pub pincode: String,
    pub neighborhood: String,
    /// Falls back to the pincode table when absent.
    pub coordinates: Option<Coordinates>,
    pub kitchen_image_urls: Vec<String>,
    pub upi_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CookSearch {
    Near(Coordinates),
    Pincode(String),
    All,
}

#[derive(Clone)]
pub struct CookService {
    cooks: Arc<dyn CookRepository>,
    meals: Arc<dyn MealRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl CookService {
    pub fn new(
        cooks: Arc<dyn CookRepository>,
        meals: Arc<dyn MealRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            cooks,
            meals,
            orders,
        }
    }

    pub fn register(&self, registration: CookRegistration) -> Result<(User, Cook), DomainError> {
        let coordinates = match registration.coordinates {
            Some(c) => c,
            None => geocode_pincode(&registration.pincode).ok_or_else(|| {
                DomainError::invalid(format!(
                    "cannot locate pincode {}, please supply coordinates",
                    registration.pincode
                ))
            })?,
        };

        let profile = NewCook {
            name: registration.account.name.trim().to_string(),
            bio: registration.bio,
            specialties: registration.specialties,
            cuisine_types: registration.cuisine_types,
            availability: registration.availability,
            location: Location {
                coordinates,
                pincode: registration.pincode.trim().to_string(),
                neighborhood: registration.neighborhood,
            },
            kitchen_image_urls: registration.kitchen_image_urls,
            upi_id: registration.upi_id.trim().to_string(),
        };
        profile.validate()?;
        let account = new_account(registration.account, Role::Cook)?;

        let (user, cook) = self.cooks.register(account, profile)?;
        log::info!("Registered cook {} for account {}", cook.id, user.id);
        Ok((user, cook))
    }

    pub fn get(&self, id: Uuid) -> Result<Cook, DomainError> {
        self.cooks.find_by_id(id)?.ok_or(DomainError::NotFound("Cook"))
    }

    pub fn search(&self, search: CookSearch) -> Result<Vec<Cook>, DomainError> {
        match search {
            CookSearch::Near(center) => Ok(self
                .nearby(center, DEFAULT_SEARCH_RADIUS_KM)?
                .into_iter()
                .map(|n| n.cook)
                .collect()),
            CookSearch::Pincode(pincode) => self.by_pincode(&pincode),
            CookSearch::All => self.cooks.list(),
        }
    }

    /// Cooks within `radius_km` of `center`, closest first.
    pub fn nearby(&self, center: Coordinates, radius_km: f64) -> Result<Vec<NearbyCook>, DomainError> {
        validate_coordinates(&center)?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(DomainError::invalid("max_distance must be a positive number"));
        }

        let mut found: Vec<NearbyCook> = self
            .cooks
            .find_near(center, radius_km)?
            .into_iter()
            .map(|cook| NearbyCook {
                distance_km: center.distance_to(&cook.location.coordinates),
                cook,
            })
            .filter(|n| n.distance_km <= radius_km)
            .collect();
        found.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        log::debug!(
            "Found {} cooks within {radius_km} km of ({}, {})",
            found.len(),
            center.latitude,
            center.longitude
        );
        Ok(found)
    }

    pub fn by_pincode(&self, pincode: &str) -> Result<Vec<Cook>, DomainError> {
        let pincode = pincode.trim();
        if pincode.is_empty() {
            return Err(DomainError::invalid("pincode is required"));
        }
        self.cooks.find_by_pincode(pincode)
    }

    pub fn update(&self, id: Uuid, update: CookUpdate) -> Result<Cook, DomainError> {
        update.validate()?;
        self.cooks
            .update(id, update)?
            .ok_or(DomainError::NotFound("Cook"))
    }

    pub fn payment_details(&self, id: Uuid) -> Result<PaymentInfo, DomainError> {
        Ok(self.get(id)?.payment_info())
    }

    pub fn analytics(
        &self,
        id: Uuid,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<CookAnalytics, DomainError> {
        let cook = self.get(id)?;
        let orders = self.orders.list_by_cook(cook.id)?;
        let meals = self.meals.list_by_cook(cook.id)?;
        Ok(summarize(&orders, &meals, period, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    fn service() -> CookService {
        let store = Arc::new(MemoryStore::new());
        CookService::new(store.clone(), store.clone(), store)
    }

    fn registration(email: &str, pincode: &str) -> CookRegistration {
        CookRegistration {
            account: Signup {
                name: "Meera".into(),
                email: email.into(),
                password: "pw".into(),
                phone: "9000000000".into(),
            },
            bio: "Gujarati thalis".into(),
            specialties: vec!["Diabetic-friendly".into()],
            cuisine_types: vec!["Gujarati".into()],
            availability: Availability::default(),
            pincode: pincode.into(),
            neighborhood: "Kalbadevi".into(),
            coordinates: None,
            kitchen_image_urls: vec!["1".into(), "2".into(), "3".into()],
            upi_id: "meera@upi".into(),
        }
    }

    #[test]
    fn register_geocodes_known_pincode() {
        let svc = service();
        let (user, cook) = svc.register(registration("m@x.in", "400001")).unwrap();
        assert_eq!(user.role, Role::Cook);
        assert_eq!(cook.account_id, Some(user.id));
        assert_eq!(cook.location.coordinates, Coordinates::new(18.9220, 72.8311));
        assert_eq!(cook.rating.count, 0);
    }

    #[test]
    fn register_unknown_pincode_requires_coordinates() {
        let svc = service();
        let err = svc.register(registration("m@x.in", "123456")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let mut reg = registration("m@x.in", "123456");
        reg.coordinates = Some(Coordinates::new(19.0, 73.0));
        assert!(svc.register(reg).is_ok());
    }

    #[test]
    fn register_requires_three_kitchen_images() {
        let svc = service();
        let mut reg = registration("m@x.in", "400001");
        reg.kitchen_image_urls.truncate(2);
        assert!(matches!(svc.register(reg), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn nearby_filters_and_sorts_by_distance() {
        let svc = service();
        let mut close = registration("close@x.in", "400001");
        close.coordinates = Some(Coordinates::new(18.9310, 72.8311));
        let mut closer = registration("closer@x.in", "400001");
        closer.coordinates = Some(Coordinates::new(18.9225, 72.8311));
        let (_, close) = svc.register(close).unwrap();
        let (_, closer) = svc.register(closer).unwrap();
        svc.register(registration("far@x.in", "110001")).unwrap();

        let found = svc.nearby(Coordinates::new(18.9220, 72.8311), 5.0).unwrap();
        let ids: Vec<Uuid> = found.iter().map(|n| n.cook.id).collect();
        assert_eq!(ids, vec![closer.id, close.id]);
        assert!((found[1].distance_km - 1.0008).abs() < 0.01);
    }

    #[test]
    fn nearby_rejects_bad_radius() {
        let svc = service();
        assert!(svc.nearby(Coordinates::new(0.0, 0.0), 0.0).is_err());
        assert!(svc.nearby(Coordinates::new(95.0, 0.0), 5.0).is_err());
    }

    #[test]
    fn rating_fields_are_not_updatable_and_missing_cook_is_404() {
        let svc = service();
        let err = svc
            .update(
                Uuid::new_v4(),
                CookUpdate {
                    bio: Some("x".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Cook")));
    }

    #[test]
    fn payment_details_use_upi_id() {
        let svc = service();
        let (_, cook) = svc.register(registration("m@x.in", "400001")).unwrap();
        let info = svc.payment_details(cook.id).unwrap();
        assert_eq!(info.vendor_name, "Meera");
        assert_eq!(info.payment_identifier, "meera@upi");
    }
}
