//! 嵌套结构的验证规则
//!
//! 每个结构的验证入口统一处理"缺省即跳过"，调用方只在字段存在时递归。

use crate::models::{
    DeviceType, ExpiryRule, ExpiryType, GeoLocation, HourRange, OsType, Restrictions,
    RoutingRule, SmartRouting,
};
use crate::utils::url_validator::validate_url;

use super::{BoxEdge, HourField, MIN_EXPIRY_HORIZON_MS, ValidationError};

/// 集合内判重所用的唯一性键
pub(crate) trait UniqueKey {
    fn same_key(&self, other: &Self) -> bool;
}

impl UniqueKey for ExpiryRule {
    // 同一规则集中每种类型至多一条，与 value 无关
    fn same_key(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl UniqueKey for OsType {
    fn same_key(&self, other: &Self) -> bool {
        self == other
    }
}

impl UniqueKey for DeviceType {
    fn same_key(&self, other: &Self) -> bool {
        self == other
    }
}

impl UniqueKey for HourRange {
    fn same_key(&self, other: &Self) -> bool {
        self == other
    }
}

impl UniqueKey for GeoLocation {
    fn same_key(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: UniqueKey> UniqueKey for RoutingRule<T> {
    fn same_key(&self, other: &Self) -> bool {
        self.url.trim() == other.url.trim()
            && self.targets.len() == other.targets.len()
            && self
                .targets
                .iter()
                .zip(&other.targets)
                .all(|(a, b)| a.same_key(b))
    }
}

pub(crate) fn has_duplicates<T: UniqueKey>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, a)| items[i + 1..].iter().any(|b| a.same_key(b)))
}

/// 集合通用检查：非空 → 无重复 → 逐项验证
pub(crate) fn check_collection<T: UniqueKey>(
    items: &[T],
    name: &'static str,
    mut validate_item: impl FnMut(&T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCollection(name));
    }
    if has_duplicates(items) {
        return Err(ValidationError::DuplicateEntries(name));
    }
    items.iter().try_for_each(|item| validate_item(item))
}

fn no_item_checks<T>(_: &T) -> Result<(), ValidationError> {
    Ok(())
}

/// 单条过期规则
pub fn validate_expiry_rule(rule: &ExpiryRule, now_ms: i64) -> Result<(), ValidationError> {
    match rule.kind {
        ExpiryType::ClickBased if rule.value <= 0 => Err(ValidationError::NonPositiveClicks),
        ExpiryType::TimeBased if rule.value < now_ms.saturating_add(MIN_EXPIRY_HORIZON_MS) => {
            Err(ValidationError::ExpiryTooSoon)
        }
        _ => Ok(()),
    }
}

/// 小时区间：两端在 [0, 23] 内且起始不晚于结束
pub fn validate_hour_range(range: &HourRange) -> Result<(), ValidationError> {
    const HOURS: std::ops::RangeInclusive<i32> = 0..=23;

    if !HOURS.contains(&range.start_hr) {
        return Err(ValidationError::HourOutOfRange(HourField::Start));
    }
    if !HOURS.contains(&range.end_hr) {
        return Err(ValidationError::HourOutOfRange(HourField::End));
    }
    if range.start_hr > range.end_hr {
        return Err(ValidationError::HourOrder);
    }
    Ok(())
}

/// 地理位置：地址非空，四条边在取值范围内，南 ≤ 北，西 ≤ 东
///
/// NaN 不落在任何闭区间内，因此也会被范围检查拒绝。
pub fn validate_geo_location(location: &GeoLocation) -> Result<(), ValidationError> {
    if location.address.trim().is_empty() {
        return Err(ValidationError::BlankAddress);
    }

    let edges = [
        (BoxEdge::SouthLat, location.south_lat()),
        (BoxEdge::NorthLat, location.north_lat()),
        (BoxEdge::WestLng, location.west_lng()),
        (BoxEdge::EastLng, location.east_lng()),
    ];
    for (edge, value) in edges {
        let limit = edge.limit();
        if !(-limit..=limit).contains(&value) {
            return Err(ValidationError::CoordinateOutOfRange(edge));
        }
    }

    if location.south_lat() > location.north_lat() {
        return Err(ValidationError::LatitudeOrder);
    }
    if location.west_lng() > location.east_lng() {
        return Err(ValidationError::LongitudeOrder);
    }
    Ok(())
}

/// 访问限制
///
/// 顺序：clicksPerDevice → os → devices → workingHrs → inclLoc → exclLoc。
/// os/devices 存在时必须非空。
pub fn validate_restrictions(restrictions: &Restrictions) -> Result<(), ValidationError> {
    if let Some(clicks) = restrictions.max_clicks_per_device
        && clicks <= 0
    {
        return Err(ValidationError::NonPositiveClicksPerDevice);
    }

    if let Some(os) = restrictions.allowed_os.as_deref() {
        check_collection(os, "Restrictions os", no_item_checks)?;
    }

    if let Some(devices) = restrictions.allowed_devices.as_deref() {
        check_collection(devices, "Restrictions devices", no_item_checks)?;
    }

    if let Some(hours) = restrictions.working_hours.as_deref() {
        check_collection(hours, "Restrictions workingHrs", |range| {
            validate_hour_range(range)
                .map_err(|e| ValidationError::nested("restrictions workingHrs", e))
        })?;
    }

    if let Some(locations) = restrictions.included_locations.as_deref() {
        check_collection(locations, "Restrictions inclLoc", |location| {
            validate_geo_location(location)
                .map_err(|e| ValidationError::nested("restrictions inclLoc", e))
        })?;
    }

    if let Some(locations) = restrictions.excluded_locations.as_deref() {
        check_collection(locations, "Restrictions exclLoc", |location| {
            validate_geo_location(location)
                .map_err(|e| ValidationError::nested("restrictions exclLoc", e))
        })?;
    }

    Ok(())
}

/// 单条路由规则：URL 有效、targets 非空且无重复、每个 target 有效
fn validate_routing_rule<T: UniqueKey>(
    rule: &RoutingRule<T>,
    validate_target: impl FnMut(&T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    validate_url(&rule.url).map_err(ValidationError::InvalidUrl)?;
    check_collection(&rule.targets, "Targets", validate_target)
}

fn validate_routing_rules<T: UniqueKey>(
    rules: Option<&[RoutingRule<T>]>,
    path: &'static str,
    validate_target: fn(&T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    let Some(rules) = rules else {
        return Ok(());
    };
    check_collection(rules, "Rules", |rule| {
        validate_routing_rule(rule, validate_target)
    })
    .map_err(|e| ValidationError::nested(path, e))
}

/// 智能路由
///
/// 顺序：osBased → deviceBased → timeBased → locBased。
/// 每类规则列表存在时必须非空且无重复规则。
pub fn validate_smart_routing(routing: &SmartRouting) -> Result<(), ValidationError> {
    validate_routing_rules(
        routing.os_based.as_deref(),
        "osBased smartRouting",
        no_item_checks,
    )?;
    validate_routing_rules(
        routing.device_based.as_deref(),
        "deviceBased smartRouting",
        no_item_checks,
    )?;
    validate_routing_rules(
        routing.time_based.as_deref(),
        "timeBased smartRouting",
        validate_hour_range,
    )?;
    validate_routing_rules(
        routing.loc_based.as_deref(),
        "locBased smartRouting",
        validate_geo_location,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_750_000_000_000;
    const MINUTE: i64 = 60 * 1000;

    #[test]
    fn test_click_based_boundary() {
        assert_eq!(
            validate_expiry_rule(&ExpiryRule::click_based(0), NOW),
            Err(ValidationError::NonPositiveClicks)
        );
        assert_eq!(validate_expiry_rule(&ExpiryRule::click_based(1), NOW), Ok(()));
    }

    #[test]
    fn test_time_based_boundary() {
        let almost = NOW + 23 * 60 * MINUTE + 59 * MINUTE;
        assert_eq!(
            validate_expiry_rule(&ExpiryRule::time_based(almost), NOW),
            Err(ValidationError::ExpiryTooSoon)
        );
        let exactly = NOW + MIN_EXPIRY_HORIZON_MS;
        assert_eq!(validate_expiry_rule(&ExpiryRule::time_based(exactly), NOW), Ok(()));
    }

    #[test]
    fn test_time_based_does_not_overflow() {
        assert_eq!(
            validate_expiry_rule(&ExpiryRule::time_based(i64::MAX - 1), i64::MAX - 1),
            Err(ValidationError::ExpiryTooSoon)
        );
    }

    #[test]
    fn test_hour_range() {
        assert_eq!(validate_hour_range(&HourRange::new(5, 5)), Ok(()));
        assert_eq!(validate_hour_range(&HourRange::new(0, 23)), Ok(()));
        assert_eq!(
            validate_hour_range(&HourRange::new(5, 3)),
            Err(ValidationError::HourOrder)
        );
        assert_eq!(
            validate_hour_range(&HourRange::new(-1, 3)),
            Err(ValidationError::HourOutOfRange(HourField::Start))
        );
        assert_eq!(
            validate_hour_range(&HourRange::new(3, 24)),
            Err(ValidationError::HourOutOfRange(HourField::End))
        );
    }

    #[test]
    fn test_geo_location() {
        assert_eq!(
            validate_geo_location(&GeoLocation::new("X", [10.0, 20.0, 10.0, 20.0])),
            Ok(())
        );
        assert_eq!(
            validate_geo_location(&GeoLocation::new("X", [91.0, 0.0, 0.0, 0.0])),
            Err(ValidationError::CoordinateOutOfRange(BoxEdge::SouthLat))
        );
        assert_eq!(
            validate_geo_location(&GeoLocation::new("X", [0.0, 0.0, 0.0, 180.5])),
            Err(ValidationError::CoordinateOutOfRange(BoxEdge::EastLng))
        );
        assert_eq!(
            validate_geo_location(&GeoLocation::new("X", [20.0, 10.0, 0.0, 0.0])),
            Err(ValidationError::LatitudeOrder)
        );
        assert_eq!(
            validate_geo_location(&GeoLocation::new("X", [0.0, 0.0, 20.0, 10.0])),
            Err(ValidationError::LongitudeOrder)
        );
        assert_eq!(
            validate_geo_location(&GeoLocation::new("   ", [0.0, 0.0, 0.0, 0.0])),
            Err(ValidationError::BlankAddress)
        );
        assert_eq!(
            validate_geo_location(&GeoLocation::new("X", [f64::NAN, 0.0, 0.0, 0.0])),
            Err(ValidationError::CoordinateOutOfRange(BoxEdge::SouthLat))
        );
    }

    #[test]
    fn test_has_duplicates() {
        assert!(!has_duplicates::<OsType>(&[]));
        assert!(!has_duplicates(&[OsType::Android, OsType::Ios]));
        assert!(has_duplicates(&[
            OsType::Android,
            OsType::Ios,
            OsType::Android
        ]));
        assert!(has_duplicates(&[
            ExpiryRule::time_based(1),
            ExpiryRule::time_based(2)
        ]));
        assert!(has_duplicates(&[
            GeoLocation::new("Paris", [48.8, 48.9, 2.2, 2.4]),
            GeoLocation::new(" Paris", [48.8, 48.9, 2.2, 2.4]),
        ]));
    }

    #[test]
    fn test_restrictions_order() {
        // clicksPerDevice 先于 os 检查
        let restrictions = Restrictions {
            max_clicks_per_device: Some(0),
            allowed_os: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            validate_restrictions(&restrictions),
            Err(ValidationError::NonPositiveClicksPerDevice)
        );

        let restrictions = Restrictions {
            allowed_os: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            validate_restrictions(&restrictions),
            Err(ValidationError::EmptyCollection("Restrictions os"))
        );

        let restrictions = Restrictions {
            allowed_devices: Some(vec![DeviceType::Mobile, DeviceType::Mobile]),
            ..Default::default()
        };
        assert_eq!(
            validate_restrictions(&restrictions),
            Err(ValidationError::DuplicateEntries("Restrictions devices"))
        );
    }

    #[test]
    fn test_excluded_location_error_path() {
        let restrictions = Restrictions {
            excluded_locations: Some(vec![GeoLocation::new("", [0.0, 1.0, 0.0, 1.0])]),
            ..Default::default()
        };
        let err = validate_restrictions(&restrictions).unwrap_err();
        assert_eq!(err.path(), Some("restrictions exclLoc"));
        assert_eq!(err.root_cause(), &ValidationError::BlankAddress);
    }

    #[test]
    fn test_smart_routing_rules() {
        let routing = SmartRouting {
            os_based: Some(vec![RoutingRule::new(
                "https://example.com/ios",
                vec![OsType::Ios, OsType::Ios],
            )]),
            ..Default::default()
        };
        let err = validate_smart_routing(&routing).unwrap_err();
        assert_eq!(err.to_string(), "Targets contain duplicates: osBased smartRouting");

        let routing = SmartRouting {
            device_based: Some(vec![RoutingRule::new("not-a-url", vec![DeviceType::Tablet])]),
            ..Default::default()
        };
        let err = validate_smart_routing(&routing).unwrap_err();
        assert!(matches!(err.root_cause(), ValidationError::InvalidUrl(_)));
        assert_eq!(err.path(), Some("deviceBased smartRouting"));

        let routing = SmartRouting {
            time_based: Some(vec![RoutingRule::new(
                "https://example.com/night",
                Vec::<HourRange>::new(),
            )]),
            ..Default::default()
        };
        assert_eq!(
            validate_smart_routing(&routing).unwrap_err().root_cause(),
            &ValidationError::EmptyCollection("Targets")
        );

        let routing = SmartRouting {
            loc_based: Some(vec![RoutingRule::new(
                "https://example.com/eu",
                vec![GeoLocation::new("EU", [34.0, 71.0, -25.0, 45.0])],
            )]),
            time_based: Some(vec![RoutingRule::new(
                "https://example.com/night",
                vec![HourRange::new(22, 23), HourRange::new(0, 5)],
            )]),
            ..Default::default()
        };
        assert_eq!(validate_smart_routing(&routing), Ok(()));
    }

    #[test]
    fn test_rule_lists_must_be_non_empty_and_unique() {
        let routing = SmartRouting {
            os_based: Some(vec![]),
            ..Default::default()
        };
        let err = validate_smart_routing(&routing).unwrap_err();
        assert_eq!(err.to_string(), "Rules cannot be empty: osBased smartRouting");

        let rule = RoutingRule::new("https://example.com/m", vec![DeviceType::Mobile]);
        let routing = SmartRouting {
            device_based: Some(vec![rule.clone(), rule]),
            ..Default::default()
        };
        assert_eq!(
            validate_smart_routing(&routing).unwrap_err().root_cause(),
            &ValidationError::DuplicateEntries("Rules")
        );
    }
}
