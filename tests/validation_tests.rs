//! Link configuration validation integration tests
//!
//! Exercises the public validation pipeline: first-error-wins ordering,
//! boundary values and nested error paths.

use urlynk::models::{
    DeviceType, ExpiryRule, GeoLocation, HourRange, LinkConfig, OsType, Restrictions,
    RoutingRule, SmartRouting,
};
use urlynk::utils::url_validator::is_valid_url;
use urlynk::validation::{
    BoxEdge, HourField, MIN_EXPIRY_HORIZON_MS, ValidationError, validate, validate_at,
    validate_geo_location, validate_hour_range,
};

const NOW: i64 = 1_750_000_000_000;
const MINUTE_MS: i64 = 60 * 1000;

fn base() -> LinkConfig {
    LinkConfig::new("https://example.com")
}

// =============================================================================
// URL acceptance
// =============================================================================

#[test]
fn test_is_valid_url_accepts_http_and_https() {
    for url in [
        "http://example.com",
        "https://example.com/path?q=1#frag",
        "https://sub.example.co.uk:8443/a/b",
        "http://127.0.0.1:8080",
        "  https://example.com  ",
    ] {
        assert!(is_valid_url(url), "{} should be accepted", url);
    }
}

#[test]
fn test_is_valid_url_rejects_other_schemes_and_garbage() {
    for url in [
        "",
        "   ",
        "ftp://example.com",
        "javascript:alert(1)",
        "example.com",
        "https://",
        "not a url",
    ] {
        assert!(!is_valid_url(url), "{} should be rejected", url);
    }
}

#[test]
fn test_invalid_url_reported_before_anything_else() {
    let config = LinkConfig::new("ftp://example.com")
        .with_password("   ")
        .with_expiry_rules(vec![ExpiryRule::click_based(0)]);

    let err = validate_at(&config, NOW).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidUrl(_)));
    assert!(err.to_string().starts_with("Invalid URL"));
}

// =============================================================================
// Top-level field order
// =============================================================================

#[test]
fn test_top_level_checks_run_in_declared_order() {
    // id 先于 domain
    let config = base().with_id("  ").with_domain("bad");
    assert_eq!(validate_at(&config, NOW), Err(ValidationError::BlankId));

    // domain 先于 webhook
    let config = base().with_domain("bad").with_webhook_url("ftp://hook");
    assert_eq!(validate_at(&config, NOW), Err(ValidationError::InvalidDomain));

    // webhook 先于 password
    let config = base().with_webhook_url("nope").with_password("");
    assert!(matches!(
        validate_at(&config, NOW),
        Err(ValidationError::InvalidWebhookUrl(_))
    ));

    // password 先于 startTime
    let config = base().with_password(" ").with_start_time(NOW - 1);
    assert_eq!(validate_at(&config, NOW), Err(ValidationError::BlankPassword));
}

#[test]
fn test_valid_full_configuration() {
    let restrictions = Restrictions {
        allowed_os: Some(vec![OsType::Android, OsType::Ios]),
        allowed_devices: Some(vec![DeviceType::Mobile]),
        max_clicks_per_device: Some(3),
        working_hours: Some(vec![HourRange::new(9, 17)]),
        included_locations: Some(vec![GeoLocation::new("Delhi", [28.4, 28.9, 76.8, 77.3])]),
        excluded_locations: None,
    };
    let routing = SmartRouting {
        os_based: Some(vec![RoutingRule::new(
            "https://example.com/ios",
            vec![OsType::Ios, OsType::Macos],
        )]),
        device_based: None,
        time_based: Some(vec![RoutingRule::new(
            "https://example.com/night",
            vec![HourRange::new(0, 5)],
        )]),
        loc_based: None,
    };

    let config = base()
        .with_id("abc123")
        .with_domain("go.example.com")
        .with_webhook_url("https://hooks.example.com/click")
        .with_password("secret")
        .with_start_time(NOW + MINUTE_MS)
        .with_expiry_rules(vec![
            ExpiryRule::click_based(100),
            ExpiryRule::time_based(NOW + 2 * MIN_EXPIRY_HORIZON_MS),
        ])
        .with_restrictions(restrictions)
        .with_smart_routing(routing);

    assert_eq!(validate_at(&config, NOW), Ok(()));
}

#[test]
fn test_start_time_boundary() {
    assert_eq!(validate_at(&base().with_start_time(NOW), NOW), Ok(()));
    assert_eq!(
        validate_at(&base().with_start_time(NOW - 1), NOW),
        Err(ValidationError::StartTimeInPast)
    );
}

// =============================================================================
// Expiry rules
// =============================================================================

#[test]
fn test_click_based_boundary() {
    let zero = base().with_expiry_rules(vec![ExpiryRule::click_based(0)]);
    assert_eq!(
        validate_at(&zero, NOW),
        Err(ValidationError::NonPositiveClicks)
    );

    let one = base().with_expiry_rules(vec![ExpiryRule::click_based(1)]);
    assert_eq!(validate_at(&one, NOW), Ok(()));
}

#[test]
fn test_time_based_horizon() {
    let too_soon = base().with_expiry_rules(vec![ExpiryRule::time_based(
        NOW + 23 * 60 * MINUTE_MS + 59 * MINUTE_MS,
    )]);
    assert_eq!(
        validate_at(&too_soon, NOW),
        Err(ValidationError::ExpiryTooSoon)
    );

    let far_enough =
        base().with_expiry_rules(vec![ExpiryRule::time_based(NOW + MIN_EXPIRY_HORIZON_MS + 1000)]);
    assert_eq!(validate_at(&far_enough, NOW), Ok(()));
}

#[test]
fn test_duplicate_expiry_kind() {
    let config = base().with_expiry_rules(vec![
        ExpiryRule::click_based(5),
        ExpiryRule::click_based(10),
    ]);
    assert_eq!(
        validate_at(&config, NOW),
        Err(ValidationError::DuplicateEntries("Expiry"))
    );
}

#[test]
fn test_empty_expiry_list() {
    let config = base().with_expiry_rules(vec![]);
    assert_eq!(
        validate_at(&config, NOW),
        Err(ValidationError::EmptyCollection("Expiry"))
    );
}

// =============================================================================
// Hour ranges and locations
// =============================================================================

#[test]
fn test_hour_range_rules() {
    assert_eq!(
        validate_hour_range(&HourRange::new(5, 3)),
        Err(ValidationError::HourOrder)
    );
    assert_eq!(validate_hour_range(&HourRange::new(5, 5)), Ok(()));
    assert_eq!(
        validate_hour_range(&HourRange::new(24, 24)),
        Err(ValidationError::HourOutOfRange(HourField::Start))
    );
    assert_eq!(
        validate_hour_range(&HourRange::new(0, -1)),
        Err(ValidationError::HourOutOfRange(HourField::End))
    );
}

#[test]
fn test_geo_location_rules() {
    assert_eq!(
        validate_geo_location(&GeoLocation::new("North Pole", [91.0, 0.0, 0.0, 0.0])),
        Err(ValidationError::CoordinateOutOfRange(BoxEdge::SouthLat))
    );
    assert_eq!(
        validate_geo_location(&GeoLocation::new("Somewhere", [10.0, 20.0, 10.0, 20.0])),
        Ok(())
    );
    assert_eq!(
        validate_geo_location(&GeoLocation::new("  ", [10.0, 20.0, 10.0, 20.0])),
        Err(ValidationError::BlankAddress)
    );
    assert_eq!(
        validate_geo_location(&GeoLocation::new("Flipped", [20.0, 10.0, 10.0, 20.0])),
        Err(ValidationError::LatitudeOrder)
    );
}

// =============================================================================
// Nested paths
// =============================================================================

#[test]
fn test_nested_working_hours_error_message() {
    let config = base().with_restrictions(Restrictions {
        working_hours: Some(vec![HourRange::new(5, 3)]),
        ..Restrictions::default()
    });

    let err = validate_at(&config, NOW).unwrap_err();
    assert_eq!(err.root_cause(), &ValidationError::HourOrder);
    assert_eq!(err.path(), Some("restrictions workingHrs"));
    assert_eq!(
        err.to_string(),
        "Start hr cannot be greater than end hr: restrictions workingHrs"
    );
}

#[test]
fn test_restrictions_empty_os_list_rejected() {
    let config = base().with_restrictions(Restrictions {
        allowed_os: Some(vec![]),
        ..Restrictions::default()
    });
    assert!(matches!(
        validate_at(&config, NOW).unwrap_err().root_cause(),
        ValidationError::EmptyCollection(_)
    ));
}

#[test]
fn test_smart_routing_rule_url_checked() {
    let config = base().with_smart_routing(SmartRouting {
        device_based: Some(vec![RoutingRule::new("mailto:x", vec![DeviceType::Tablet])]),
        ..SmartRouting::default()
    });

    let err = validate_at(&config, NOW).unwrap_err();
    assert!(matches!(err.root_cause(), ValidationError::InvalidUrl(_)));
}

#[test]
fn test_absent_nested_structures_are_skipped() {
    let config = base()
        .with_restrictions(Restrictions::default())
        .with_smart_routing(SmartRouting::default());
    assert_eq!(validate(&config), Ok(()));
}
