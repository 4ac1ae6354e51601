use crate::shelly_cloud::DeviceStatus;

/// Battery readings below this, raw value (gen 1) or percent (gen 3), report
/// as low.
pub const LOW_BATTERY_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatteryStatus {
    #[default]
    Normal,
    Low,
}

/// Canonical, generation-agnostic reading derived from one raw device status.
/// `None` marks a quantity whose block matched neither known firmware
/// generation in the last committed status.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub battery: BatteryStatus,
}

impl Reading {
    /// Classifies a raw status into canonical form. Each quantity is detected
    /// independently, first generation checked before third, first match wins.
    pub fn from_status(status: &DeviceStatus) -> Self {
        Self {
            temperature_c: temperature_of(status),
            humidity_pct: humidity_of(status),
            battery: battery_of(status),
        }
    }

    /// Carries the previous value forward for any quantity this status did not
    /// deliver in a recognized shape. Last-known-good beats a hard failure
    /// once a reading exists; battery is always recomputed since absence of
    /// battery data legitimately means `Normal`.
    pub fn merged_with(self, previous: &Reading) -> Self {
        Self {
            temperature_c: self.temperature_c.or(previous.temperature_c),
            humidity_pct: self.humidity_pct.or(previous.humidity_pct),
            battery: self.battery,
        }
    }
}

// A generation only matches when the block carries its nested value; a gutted
// block falls through to the next generation like an absent one.

fn temperature_of(status: &DeviceStatus) -> Option<f64> {
    if let Some(t_c) = status.tmp.as_ref().and_then(|tmp| tmp.t_c) {
        // support for first gen H&T
        return Some(t_c);
    }
    // support for third gen H&T
    status.temperature.as_ref().and_then(|t| t.t_c)
}

fn humidity_of(status: &DeviceStatus) -> Option<f64> {
    if let Some(value) = status.hum.as_ref().and_then(|hum| hum.value) {
        return Some(value);
    }
    status.humidity.as_ref().and_then(|h| h.rh)
}

fn battery_of(status: &DeviceStatus) -> BatteryStatus {
    let gen1_low = status
        .bat
        .as_ref()
        .and_then(|bat| bat.value)
        .is_some_and(|value| value < LOW_BATTERY_THRESHOLD);
    let gen3_low = status
        .device_power
        .as_ref()
        .and_then(|power| power.battery)
        .and_then(|battery| battery.percent)
        .is_some_and(|percent| percent < LOW_BATTERY_THRESHOLD);

    if gen1_low || gen3_low {
        BatteryStatus::Low
    } else {
        // No battery block at all is not an error, just a normal report
        BatteryStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_from(value: serde_json::Value) -> DeviceStatus {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_first_gen_classification() {
        let status = status_from(json!({
            "tmp": { "tC": 21.5 },
            "hum": { "value": 55 },
            "bat": { "value": 12 }
        }));

        let reading = Reading::from_status(&status);
        assert_eq!(reading.temperature_c, Some(21.5));
        assert_eq!(reading.humidity_pct, Some(55.0));
        assert_eq!(reading.battery, BatteryStatus::Normal);
    }

    #[test]
    fn test_third_gen_classification() {
        let status = status_from(json!({
            "temperature:0": { "tC": 19.0 },
            "humidity:0": { "rh": 48 },
            "devicepower:0": { "battery": { "percent": 5 } }
        }));

        let reading = Reading::from_status(&status);
        assert_eq!(reading.temperature_c, Some(19.0));
        assert_eq!(reading.humidity_pct, Some(48.0));
        assert_eq!(reading.battery, BatteryStatus::Low);
    }

    #[test]
    fn test_first_gen_wins_over_third_gen() {
        let status = status_from(json!({
            "tmp": { "tC": -4.25 },
            "temperature:0": { "tC": 30.0 }
        }));

        let reading = Reading::from_status(&status);
        assert_eq!(reading.temperature_c, Some(-4.25));
    }

    #[test]
    fn test_mixed_generation_payload() {
        // Not expected in practice, but each quantity is detected on its own
        let status = status_from(json!({
            "tmp": { "tC": 21.5 },
            "humidity:0": { "rh": 48 }
        }));

        let reading = Reading::from_status(&status);
        assert_eq!(reading.temperature_c, Some(21.5));
        assert_eq!(reading.humidity_pct, Some(48.0));
        assert_eq!(reading.battery, BatteryStatus::Normal);
    }

    #[test]
    fn test_unrecognized_shape_yields_no_values() {
        let status = status_from(json!({ "fw": "20230913-112003" }));

        let reading = Reading::from_status(&status);
        assert_eq!(reading.temperature_c, None);
        assert_eq!(reading.humidity_pct, None);
        assert_eq!(reading.battery, BatteryStatus::Normal);
    }

    #[test]
    fn test_gutted_block_only_fails_its_own_quantity() {
        let status = status_from(json!({
            "tmp": {},
            "hum": { "value": 55 }
        }));

        let reading = Reading::from_status(&status);
        assert_eq!(reading.temperature_c, None);
        assert_eq!(reading.humidity_pct, Some(55.0));
        assert_eq!(reading.battery, BatteryStatus::Normal);
    }

    #[test]
    fn test_gutted_first_gen_block_falls_through_to_third_gen() {
        let status = status_from(json!({
            "tmp": {},
            "temperature:0": { "tC": 30.0 }
        }));

        assert_eq!(Reading::from_status(&status).temperature_c, Some(30.0));
    }

    #[test]
    fn test_battery_threshold_boundary() {
        let exactly_threshold = status_from(json!({ "bat": { "value": 10 } }));
        assert_eq!(
            Reading::from_status(&exactly_threshold).battery,
            BatteryStatus::Normal
        );

        let just_below = status_from(json!({ "bat": { "value": 9.9 } }));
        assert_eq!(Reading::from_status(&just_below).battery, BatteryStatus::Low);

        let gen3_boundary = status_from(json!({
            "devicepower:0": { "battery": { "percent": 10 } }
        }));
        assert_eq!(
            Reading::from_status(&gen3_boundary).battery,
            BatteryStatus::Normal
        );
    }

    #[test]
    fn test_battery_low_from_either_generation() {
        let status = status_from(json!({
            "bat": { "value": 50 },
            "devicepower:0": { "battery": { "percent": 3 } }
        }));

        assert_eq!(Reading::from_status(&status).battery, BatteryStatus::Low);
    }

    #[test]
    fn test_merge_retains_previous_values() {
        let previous = Reading {
            temperature_c: Some(21.5),
            humidity_pct: Some(55.0),
            battery: BatteryStatus::Low,
        };
        let unrecognized = Reading::from_status(&status_from(json!({ "fw": "x" })));

        let merged = unrecognized.merged_with(&previous);
        assert_eq!(merged.temperature_c, Some(21.5));
        assert_eq!(merged.humidity_pct, Some(55.0));
        // Battery is recomputed from the new status, not carried forward
        assert_eq!(merged.battery, BatteryStatus::Normal);
    }

    #[test]
    fn test_merge_prefers_fresh_values() {
        let previous = Reading {
            temperature_c: Some(21.5),
            humidity_pct: Some(55.0),
            battery: BatteryStatus::Normal,
        };
        let fresh = Reading::from_status(&status_from(json!({
            "tmp": { "tC": 22.0 },
            "hum": { "value": 60 }
        })));

        let merged = fresh.merged_with(&previous);
        assert_eq!(merged.temperature_c, Some(22.0));
        assert_eq!(merged.humidity_pct, Some(60.0));
    }
}
