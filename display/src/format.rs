use net::Reading;

pub const UNKNOWN: &str = "--";
pub const SEND_FAILED: &str = "Error: Could not send message.";

/// Care notes shown by the info modal.
pub const INFO_TEXT: &str = "\
Money Plant (Epipremnum aureum)

Sunlight: bright, indirect light. Tolerates lower light but grows slower; \
keep out of harsh afternoon sun.
Watering: water when the top few centimetres of soil are dry. \
Do not let the pot sit in water.
Soil: a loose, well-draining potting mix.
Toxicity: toxic to cats, dogs and people if eaten. Keep away from pets and children.";

pub fn user_line(text: &str) -> String {
    format!("You: {text}")
}

pub fn plant_line(text: &str) -> String {
    format!("PlantAI: {text}")
}

/// Live-data labels, ready to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingLabels {
    pub temperature: String,
    pub humidity: String,
    pub light: String,
    pub moisture: String,
}

fn label(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map_or_else(|| UNKNOWN.to_string(), fmt)
}

impl From<&Reading> for ReadingLabels {
    fn from(r: &Reading) -> Self {
        Self {
            temperature: format!("Temperature: {}", label(r.temperature, |v| format!("{v:.1} °C"))),
            humidity: format!("Humidity: {}", label(r.humidity, |v| format!("{v:.1} %"))),
            light: format!("Ambient Light: {}", label(r.light, |v| format!("{v:.0} %"))),
            moisture: format!("Soil Moisture: {}", label(r.moisture, |v| format!("{v:.0} %"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_and_unknown() {
        let labels = ReadingLabels::from(&Reading {
            temperature: Some(24.1),
            humidity: Some(55.0),
            light: Some(70.2),
            moisture: None,
            taken_at: None,
        });
        assert_eq!(labels.temperature, "Temperature: 24.1 °C");
        assert_eq!(labels.humidity, "Humidity: 55.0 %");
        assert_eq!(labels.light, "Ambient Light: 70 %");
        assert_eq!(labels.moisture, "Soil Moisture: --");
    }
}
