//! Revenue and rating summaries for a cook's dashboard.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::meal::Meal;
use crate::domain::order::{Order, OrderStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    Week,
    #[default]
    Month,
    ThreeMonths,
    Year,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::ThreeMonths => "3months",
            Period::Year => "year",
        }
    }

    /// First instant included in the period ending at `now`.
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Period::Week => now - Duration::days(7),
            Period::Month => start_of_day(now.date_naive().with_day(1)),
            Period::ThreeMonths => now.checked_sub_months(Months::new(3)).unwrap_or(now),
            Period::Year => start_of_day(now.date_naive().with_ordinal(1)),
        }
    }
}

fn start_of_day(date: Option<NaiveDate>) -> DateTime<Utc> {
    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl FromStr for Period {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "3months" => Ok(Period::ThreeMonths),
            "year" => Ok(Period::Year),
            other => Err(DomainError::invalid(format!(
                "invalid period '{other}', expected week, month, 3months or year"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealRevenue {
    pub meal_id: Uuid,
    pub meal_name: String,
    pub revenue: BigDecimal,
    pub orders: usize,
    pub average_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: BigDecimal,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CookAnalytics {
    pub period: Period,
    pub completed_orders: usize,
    pub pending_orders: usize,
    pub cancelled_orders: usize,
    pub total_revenue: BigDecimal,
    pub average_order_value: BigDecimal,
    /// Mean of the ratings on completed orders, 0 when none are rated.
    pub average_rating: f64,
    pub meals: Vec<MealRevenue>,
    pub daily: Vec<DailyRevenue>,
}

/// Stored total, or the meal's current price times quantity for orders
/// placed before totals were recorded.
fn order_revenue(order: &Order, meal: Option<&Meal>) -> BigDecimal {
    match (&order.total_price, meal) {
        (Some(total), _) => total.clone(),
        (None, Some(meal)) => meal.price.clone() * BigDecimal::from(order.quantity),
        (None, None) => BigDecimal::zero(),
    }
}

fn mean(total: &BigDecimal, count: usize) -> BigDecimal {
    if count == 0 {
        BigDecimal::zero()
    } else {
        (total.clone() / BigDecimal::from(count as u64)).round(2)
    }
}

pub fn summarize(
    orders: &[Order],
    meals: &[Meal],
    period: Period,
    now: DateTime<Utc>,
) -> CookAnalytics {
    let meals_by_id: HashMap<Uuid, &Meal> = meals.iter().map(|m| (m.id, m)).collect();
    let completed: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .collect();

    let total_revenue: BigDecimal = completed
        .iter()
        .map(|o| order_revenue(o, meals_by_id.get(&o.meal_id).copied()))
        .sum();

    let ratings: Vec<i32> = completed
        .iter()
        .filter_map(|o| o.rating.map(|r| r.value()))
        .collect();
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64
    };

    // Per meal, over all completed orders.
    let mut per_meal: HashMap<Uuid, (BigDecimal, usize)> = HashMap::new();
    for order in &completed {
        let Some(meal) = meals_by_id.get(&order.meal_id) else {
            continue;
        };
        let entry = per_meal
            .entry(order.meal_id)
            .or_insert_with(|| (BigDecimal::zero(), 0));
        entry.0 += order_revenue(order, Some(meal));
        entry.1 += 1;
    }
    let mut meal_rows: Vec<MealRevenue> = per_meal
        .into_iter()
        .filter_map(|(meal_id, (revenue, count))| {
            meals_by_id.get(&meal_id).map(|meal| MealRevenue {
                meal_id,
                meal_name: meal.name.clone(),
                average_price: mean(&revenue, count),
                revenue,
                orders: count,
            })
        })
        .collect();
    meal_rows.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.meal_name.cmp(&b.meal_name))
    });

    // Per day, only inside the period.
    let since = period.start(now);
    let mut per_day: BTreeMap<NaiveDate, (BigDecimal, usize)> = BTreeMap::new();
    for order in completed.iter().filter(|o| o.created_at >= since) {
        let entry = per_day
            .entry(order.created_at.date_naive())
            .or_insert_with(|| (BigDecimal::zero(), 0));
        entry.0 += order_revenue(order, meals_by_id.get(&order.meal_id).copied());
        entry.1 += 1;
    }

    CookAnalytics {
        period,
        completed_orders: completed.len(),
        pending_orders: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Placed)
            .count(),
        cancelled_orders: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Cancelled)
            .count(),
        average_order_value: mean(&total_revenue, completed.len()),
        total_revenue,
        average_rating,
        meals: meal_rows,
        daily: per_day
            .into_iter()
            .map(|(date, (revenue, orders))| DailyRevenue {
                date,
                revenue,
                orders,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::domain::meal::MealCategory;
    use crate::domain::order::Rating;

    fn meal(name: &str, price: &str) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            cook_id: Uuid::nil(),
            name: name.into(),
            description: None,
            image_url: String::new(),
            price: BigDecimal::from_str(price).unwrap(),
            calories: 0,
            quantity_available: 1,
            is_available: true,
            category: MealCategory::Other,
            tags: vec![],
            created_at: Utc::now(),
        }
    }

    fn order(meal: &Meal, qty: i32, status: OrderStatus, at: DateTime<Utc>) -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            cook_id: meal.cook_id,
            meal_id: meal.id,
            quantity: qty,
            total_price: None,
            status,
            rating: None,
            review_text: None,
            created_at: at,
        }
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn summarizes_completed_orders() {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap();
        let thali = meal("Thali", "120.00");
        let poha = meal("Poha", "40.00");

        let mut rated = order(&thali, 2, OrderStatus::Completed, now - Duration::days(1));
        rated.rating = Some(Rating::new(4).unwrap());
        let mut stored_total = order(&poha, 1, OrderStatus::Completed, now);
        stored_total.total_price = Some(dec("45.00"));
        let orders = vec![
            rated,
            stored_total,
            order(&poha, 3, OrderStatus::Placed, now),
            order(&thali, 1, OrderStatus::Cancelled, now),
            order(&thali, 1, OrderStatus::Completed, now - Duration::days(60)),
        ];

        let stats = summarize(&orders, &[thali.clone(), poha.clone()], Period::Month, now);

        assert_eq!(stats.completed_orders, 3);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.cancelled_orders, 1);
        assert_eq!(stats.total_revenue, dec("405.00"));
        assert_eq!(stats.average_order_value, dec("135.00"));
        assert!((stats.average_rating - 4.0).abs() < f64::EPSILON);

        assert_eq!(stats.meals[0].meal_name, "Thali");
        assert_eq!(stats.meals[0].revenue, dec("360.00"));
        assert_eq!(stats.meals[0].orders, 2);
        assert_eq!(stats.meals[1].revenue, dec("45.00"));

        // The 60-day-old order falls outside June.
        assert_eq!(stats.daily.len(), 2);
        assert_eq!(stats.daily[0].date, NaiveDate::from_ymd_opt(2025, 6, 19).unwrap());
        assert_eq!(stats.daily[0].revenue, dec("240.00"));
    }

    #[test]
    fn empty_history_is_all_zero() {
        let stats = summarize(&[], &[], Period::Week, Utc::now());
        assert_eq!(stats.completed_orders, 0);
        assert_eq!(stats.total_revenue, BigDecimal::zero());
        assert_eq!(stats.average_order_value, BigDecimal::zero());
        assert_eq!(stats.average_rating, 0.0);
        assert!(stats.daily.is_empty());
    }

    #[test]
    fn period_boundaries() {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap();
        assert_eq!(
            Period::Month.start(now),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            Period::Year.start(now),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            Period::ThreeMonths.start(now),
            Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
        );
        assert!(Period::from_str("decade").is_err());
        assert_eq!(Period::from_str("3months").unwrap(), Period::ThreeMonths);
    }
}
