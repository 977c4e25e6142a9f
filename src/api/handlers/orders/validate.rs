//! Field validation for order creation and partial updates.
//!
//! Violations are collected into a single list so clients get the full
//! correction set in one round trip instead of one error per request.

use chrono::{DateTime, Utc};

use super::types::{CreateOrderRequest, UpdateOrderRequest};

const SPORTS: [&str; 3] = ["Tennis", "Badminton", "Squash"];
const TENSION_MIN: i32 = 10;
const TENSION_MAX: i32 = 70;
const NOTES_MAX: usize = 1000;
const TEXT_MIN: usize = 3;

/// Validates a creation payload, returning every violated rule.
pub(super) fn validate_create(input: &CreateOrderRequest) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    check_sport(&input.sport, &mut errors);
    check_tension(&input.tension, &mut errors);
    check_pickup_date(input.pickup_date, &mut errors);
    check_price(input.price, &mut errors);
    if let Some(notes) = &input.notes {
        check_notes(notes, &mut errors);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validates a partial-update payload. Only supplied fields are checked,
/// absent fields are left untouched.
pub(super) fn validate_update(input: &UpdateOrderRequest) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(sport) = &input.sport {
        check_sport(sport, &mut errors);
    }
    if let Some(racket_model) = &input.racket_model {
        check_text("racket_model", racket_model, &mut errors);
    }
    if let Some(string) = &input.string {
        check_text("string", string, &mut errors);
    }
    if let Some(tension) = &input.tension {
        check_tension(tension, &mut errors);
    }
    if let Some(pickup_date) = input.pickup_date {
        check_pickup_date(pickup_date, &mut errors);
    }
    if let Some(price) = input.price {
        check_price(price, &mut errors);
    }
    if let Some(notes) = &input.notes {
        check_notes(notes, &mut errors);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_sport(sport: &str, errors: &mut Vec<String>) {
    if !SPORTS.contains(&sport) {
        errors.push(format!(
            "sport must be one of: {}, got '{sport}'",
            SPORTS.join(", ")
        ));
    }
}

fn check_tension(tension: &str, errors: &mut Vec<String>) {
    match tension.trim().parse::<i32>() {
        Ok(value) if (TENSION_MIN..=TENSION_MAX).contains(&value) => {}
        Ok(value) => {
            errors.push(format!(
                "tension must be between {TENSION_MIN} and {TENSION_MAX}, got {value}"
            ));
        }
        Err(_) => {
            errors.push(format!("tension must be an integer, got '{tension}'"));
        }
    }
}

fn check_pickup_date(pickup_date: DateTime<Utc>, errors: &mut Vec<String>) {
    if pickup_date <= Utc::now() {
        errors.push("pickup_date must be in the future".to_string());
    }
}

fn check_price(price: f64, errors: &mut Vec<String>) {
    if price <= 0.0 {
        errors.push(format!("price must be greater than 0, got {price}"));
    }
}

fn check_notes(notes: &str, errors: &mut Vec<String>) {
    if notes.chars().count() > NOTES_MAX {
        errors.push(format!("notes must be at most {NOTES_MAX} characters"));
    }
}

fn check_text(field: &str, value: &str, errors: &mut Vec<String>) {
    if value.trim().chars().count() < TEXT_MIN {
        errors.push(format!("{field} must be at least {TEXT_MIN} characters"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_create() -> CreateOrderRequest {
        CreateOrderRequest {
            sport: "Tennis".to_string(),
            racket_model: "Pro Staff".to_string(),
            string: "Poly".to_string(),
            tension: "25".to_string(),
            pickup_date: Utc::now() + Duration::days(1),
            notes: None,
            price: 20.0,
        }
    }

    #[test]
    fn accepts_valid_create() {
        assert!(validate_create(&valid_create()).is_ok());
    }

    #[test]
    fn accepts_all_sports() {
        for sport in ["Tennis", "Badminton", "Squash"] {
            let mut input = valid_create();
            input.sport = sport.to_string();
            assert!(validate_create(&input).is_ok(), "{sport} should be valid");
        }
    }

    #[test]
    fn rejects_unknown_sport() {
        let mut input = valid_create();
        input.sport = "Padel".to_string();
        let errors = validate_create(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("sport"));
    }

    #[test]
    fn rejects_non_numeric_tension() {
        let mut input = valid_create();
        input.tension = "tight".to_string();
        let errors = validate_create(&input).unwrap_err();
        assert!(errors[0].contains("integer"));
    }

    #[test]
    fn rejects_tension_out_of_range() {
        for tension in ["9", "71", "-5", "500"] {
            let mut input = valid_create();
            input.tension = tension.to_string();
            let errors = validate_create(&input).unwrap_err();
            assert!(errors[0].contains("between"), "tension {tension}");
        }
    }

    #[test]
    fn accepts_tension_boundaries() {
        for tension in ["10", "70"] {
            let mut input = valid_create();
            input.tension = tension.to_string();
            assert!(validate_create(&input).is_ok(), "tension {tension}");
        }
    }

    #[test]
    fn rejects_past_pickup_date() {
        let mut input = valid_create();
        input.pickup_date = Utc::now() - Duration::hours(1);
        let errors = validate_create(&input).unwrap_err();
        assert!(errors[0].contains("future"));
    }

    #[test]
    fn rejects_non_positive_price() {
        for price in [0.0, -5.0] {
            let mut input = valid_create();
            input.price = price;
            let errors = validate_create(&input).unwrap_err();
            assert!(errors[0].contains("price"), "price {price}");
        }
    }

    #[test]
    fn rejects_oversized_notes() {
        let mut input = valid_create();
        input.notes = Some("x".repeat(1001));
        let errors = validate_create(&input).unwrap_err();
        assert!(errors[0].contains("notes"));
    }

    #[test]
    fn accepts_notes_at_limit() {
        let mut input = valid_create();
        input.notes = Some("x".repeat(1000));
        assert!(validate_create(&input).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let input = CreateOrderRequest {
            sport: "Chess".to_string(),
            racket_model: "Pro Staff".to_string(),
            string: "Poly".to_string(),
            tension: "95".to_string(),
            pickup_date: Utc::now() - Duration::days(1),
            notes: Some("x".repeat(2000)),
            price: -1.0,
        };
        let errors = validate_create(&input).unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn update_accepts_empty_payload() {
        assert!(validate_update(&UpdateOrderRequest::default()).is_ok());
    }

    #[test]
    fn update_checks_only_supplied_fields() {
        let input = UpdateOrderRequest {
            tension: Some("80".to_string()),
            ..UpdateOrderRequest::default()
        };
        let errors = validate_update(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("tension"));
    }

    #[test]
    fn update_rejects_short_text_fields() {
        let input = UpdateOrderRequest {
            racket_model: Some("ab".to_string()),
            string: Some("  x ".to_string()),
            ..UpdateOrderRequest::default()
        };
        let errors = validate_update(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn update_collects_multiple_violations() {
        let input = UpdateOrderRequest {
            sport: Some("Golf".to_string()),
            price: Some(0.0),
            ..UpdateOrderRequest::default()
        };
        let errors = validate_update(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
