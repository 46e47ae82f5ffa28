use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::geo::Coordinates;
use super::order::Rating;

/// Shown in place of a payment identifier that cannot be resolved.
pub const PAYMENT_INFO_UNAVAILABLE: &str = "payment information unavailable";

/// Minimum number of kitchen photos when any are supplied.
pub const MIN_KITCHEN_IMAGES: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Availability {
    pub morning: bool,
    pub afternoon: bool,
    pub evening: bool,
    pub time_slots: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub coordinates: Coordinates,
    pub pincode: String,
    pub neighborhood: String,
}

/// Running mean of all ratings a cook has received.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: i32,
}

impl RatingAggregate {
    pub fn record(self, rating: Rating) -> Self {
        let count = self.count + 1;
        let average =
            (self.average * f64::from(self.count) + f64::from(rating.value())) / f64::from(count);
        Self { average, count }
    }
}

#[derive(Debug, Clone)]
pub struct Cook {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub name: String,
    pub bio: String,
    pub specialties: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub availability: Availability,
    pub location: Location,
    pub kitchen_image_urls: Vec<String>,
    pub upi_id: String,
    pub rating: RatingAggregate,
    pub created_at: DateTime<Utc>,
}

impl Cook {
    pub fn payment_info(&self) -> PaymentInfo {
        PaymentInfo::new(self.name.clone(), &self.upi_id)
    }
}

/// A cook paired with its distance from a search point.
#[derive(Debug, Clone)]
pub struct NearbyCook {
    pub cook: Cook,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInfo {
    pub vendor_name: String,
    pub payment_identifier: String,
}

impl PaymentInfo {
    pub fn new(vendor_name: String, upi_id: &str) -> Self {
        let payment_identifier = if upi_id.trim().is_empty() {
            PAYMENT_INFO_UNAVAILABLE.to_string()
        } else {
            upi_id.to_string()
        };
        Self {
            vendor_name,
            payment_identifier,
        }
    }

    pub fn unavailable(vendor_name: String) -> Self {
        Self {
            vendor_name,
            payment_identifier: PAYMENT_INFO_UNAVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCook {
    pub name: String,
    pub bio: String,
    pub specialties: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub availability: Availability,
    pub location: Location,
    pub kitchen_image_urls: Vec<String>,
    pub upi_id: String,
}

impl NewCook {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("name", &self.name),
            ("bio", &self.bio),
            ("pincode", &self.location.pincode),
            ("neighborhood", &self.location.neighborhood),
            ("upi_id", &self.upi_id),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::invalid(format!("{field} is required")));
            }
        }
        if self.kitchen_image_urls.len() < MIN_KITCHEN_IMAGES {
            return Err(DomainError::invalid(format!(
                "at least {MIN_KITCHEN_IMAGES} kitchen images are required"
            )));
        }
        validate_coordinates(&self.location.coordinates)
    }
}

/// Partial profile update. Rating fields are not client-writable.
#[derive(Debug, Clone, Default)]
pub struct CookUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub cuisine_types: Option<Vec<String>>,
    pub availability: Option<Availability>,
    pub neighborhood: Option<String>,
    pub kitchen_image_urls: Option<Vec<String>>,
    pub upi_id: Option<String>,
}

impl CookUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.bio.is_none()
            && self.specialties.is_none()
            && self.cuisine_types.is_none()
            && self.availability.is_none()
            && self.neighborhood.is_none()
            && self.kitchen_image_urls.is_none()
            && self.upi_id.is_none()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::invalid("name cannot be empty"));
            }
        }
        match &self.kitchen_image_urls {
            Some(urls) if !urls.is_empty() && urls.len() < MIN_KITCHEN_IMAGES => {
                Err(DomainError::invalid(format!(
                    "if providing kitchen images, at least {MIN_KITCHEN_IMAGES} are required"
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn apply(self, cook: &mut Cook) {
        if let Some(v) = self.name {
            cook.name = v;
        }
        if let Some(v) = self.bio {
            cook.bio = v;
        }
        if let Some(v) = self.specialties {
            cook.specialties = v;
        }
        if let Some(v) = self.cuisine_types {
            cook.cuisine_types = v;
        }
        if let Some(v) = self.availability {
            cook.availability = v;
        }
        if let Some(v) = self.neighborhood {
            cook.location.neighborhood = v;
        }
        if let Some(v) = self.kitchen_image_urls {
            cook.kitchen_image_urls = v;
        }
        if let Some(v) = self.upi_id {
            cook.upi_id = v;
        }
    }
}

pub fn validate_coordinates(c: &Coordinates) -> Result<(), DomainError> {
    if !(-90.0..=90.0).contains(&c.latitude) || !(-180.0..=180.0).contains(&c.longitude) {
        return Err(DomainError::invalid(format!(
            "coordinates out of range: lat {}, lon {}",
            c.latitude, c.longitude
        )));
    }
    Ok(())
}

/// Coordinates for the pincodes the marketplace launched in.
pub fn geocode_pincode(pincode: &str) -> Option<Coordinates> {
    let (lat, lon) = match pincode.trim() {
        "400001" => (18.9220, 72.8311),
        "110001" => (28.6139, 77.2090),
        "600001" => (13.0827, 80.2707),
        "700001" => (22.5726, 88.3639),
        "560001" => (12.9716, 77.5946),
        "382350" => (23.2156, 72.6369),
        _ => return None,
    };
    Some(Coordinates::new(lat, lon))
}
