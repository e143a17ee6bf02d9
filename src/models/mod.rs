pub mod enums;
pub mod link;

pub use enums::{DeviceType, ExpiryType, OsType};
pub use link::{
    ExpiryRule, GeoLocation, HourRange, LinkConfig, RestrictionAxis, Restrictions, RoutingAxis,
    RoutingRule, SmartRouting,
};
