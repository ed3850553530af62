use net::{MoodLabel, Reading};

/// Safety-relevant limits in canonical units (percent and °C).
///
/// Evaluation order is fixed: soil before temperature before light, low
/// before high. The first limit crossed decides the mood; a field the
/// reading does not carry never fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub low_soil: f64,
    pub high_soil: f64,
    pub low_temp: f64,
    pub high_temp: f64,
    pub low_light: f64,
    pub high_light: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_soil: 30.0,
            high_soil: 90.0,
            low_temp: 10.0,
            high_temp: 35.0,
            low_light: 20.0,
            high_light: 95.0,
        }
    }
}

impl Thresholds {
    /// The mood forced by the first crossed limit, if any.
    pub fn evaluate(&self, reading: &Reading) -> Option<MoodLabel> {
        let below = |v: Option<f64>, limit: f64| v.is_some_and(|v| v < limit);
        let above = |v: Option<f64>, limit: f64| v.is_some_and(|v| v > limit);

        if below(reading.moisture, self.low_soil) {
            Some(MoodLabel::Thirsty)
        } else if above(reading.moisture, self.high_soil) {
            Some(MoodLabel::Overwatered)
        } else if below(reading.temperature, self.low_temp) {
            Some(MoodLabel::Cold)
        } else if above(reading.temperature, self.high_temp) {
            Some(MoodLabel::Hot)
        } else if below(reading.light, self.low_light) {
            Some(MoodLabel::LowLight)
        } else if above(reading.light, self.high_light) {
            Some(MoodLabel::HighLight)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(soil: f64, light: f64, temp: f64) -> Reading {
        Reading {
            moisture: Some(soil),
            light: Some(light),
            temperature: Some(temp),
            ..Reading::default()
        }
    }

    #[test]
    fn soil_outranks_everything() {
        let t = Thresholds::default();
        assert_eq!(t.evaluate(&reading(15.0, 5.0, 50.0)), Some(MoodLabel::Thirsty));
        assert_eq!(t.evaluate(&reading(97.0, 5.0, 2.0)), Some(MoodLabel::Overwatered));
    }

    #[test]
    fn temperature_outranks_light() {
        let t = Thresholds::default();
        assert_eq!(t.evaluate(&reading(50.0, 5.0, 2.0)), Some(MoodLabel::Cold));
        assert_eq!(t.evaluate(&reading(50.0, 99.0, 40.0)), Some(MoodLabel::Hot));
    }

    #[test]
    fn light_limits() {
        let t = Thresholds::default();
        assert_eq!(t.evaluate(&reading(50.0, 5.0, 22.0)), Some(MoodLabel::LowLight));
        assert_eq!(t.evaluate(&reading(50.0, 99.0, 22.0)), Some(MoodLabel::HighLight));
    }

    #[test]
    fn comfortable_reading_fires_nothing() {
        let t = Thresholds::default();
        assert_eq!(t.evaluate(&reading(55.0, 70.0, 24.0)), None);
    }

    #[test]
    fn limits_are_strict() {
        let t = Thresholds::default();
        assert_eq!(t.evaluate(&reading(30.0, 20.0, 10.0)), None);
    }

    #[test]
    fn missing_fields_never_fire() {
        let t = Thresholds::default();
        let only_light = Reading {
            light: Some(3.0),
            ..Reading::default()
        };
        assert_eq!(t.evaluate(&only_light), Some(MoodLabel::LowLight));
        assert_eq!(t.evaluate(&Reading::default()), None);
    }
}
