use crate::data::FossilRecord;
use crate::format::{fixed1, number};

/// Shown while no glyph is hovered
pub const PLACEHOLDER: &str = "Hover over a dinosaur to see details.";

/// What the detail panel displays
#[derive(Clone, Debug, PartialEq)]
pub enum Detail {
    Placeholder,
    Record {
        title: String,
        /// `(label, value)` rows
        rows: Vec<(&'static str, String)>,
    },
}

impl Detail {
    pub fn for_record(record: &FossilRecord) -> Self {
        let rows = vec![
            ("Type", record.kind.to_string()),
            ("Diet", record.diet.to_string()),
            ("Length", format!("{} m", number(record.length_m))),
            (
                "Time Range",
                format!("{} – {} MYA", number(record.max_ma), number(record.min_ma)),
            ),
            (
                "Existed for",
                format!("{} million years", fixed1(record.duration_ma())),
            ),
            ("Region", record.region.clone()),
            ("Family", record.family_label().to_string()),
        ];
        Detail::Record {
            title: record.name.clone(),
            rows,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Detail::Placeholder => None,
            Detail::Record { title, .. } => Some(title),
        }
    }

    /// Value of the row labelled `label`
    pub fn value(&self, label: &str) -> Option<&str> {
        match self {
            Detail::Placeholder => None,
            Detail::Record { rows, .. } => rows
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Diet, DinoType};

    fn rex() -> FossilRecord {
        FossilRecord {
            name: "Tyrannosaurus".into(),
            kind: DinoType::LargeTheropod,
            diet: Diet::Carnivorous,
            length_m: 12.3,
            max_ma: 70.0,
            min_ma: 65.0,
            lng: -104.0,
            lat: 46.0,
            region: "North America".into(),
            family: None,
        }
    }

    #[test]
    fn test_record_detail() {
        let detail = Detail::for_record(&rex());
        assert_eq!(detail.title(), Some("Tyrannosaurus"));
        assert_eq!(detail.value("Type"), Some("large theropod"));
        assert_eq!(detail.value("Diet"), Some("carnivorous"));
        assert_eq!(detail.value("Length"), Some("12.3 m"));
        assert_eq!(detail.value("Time Range"), Some("70 – 65 MYA"));
        assert_eq!(detail.value("Existed for"), Some("5.0 million years"));
        assert_eq!(detail.value("Family"), Some("Unknown"));
    }

    #[test]
    fn test_nan_fields_render() {
        let mut record = rex();
        record.length_m = f64::NAN;
        let detail = Detail::for_record(&record);
        assert_eq!(detail.value("Length"), Some("NaN m"));
        assert_eq!(Detail::Placeholder.value("Length"), None);
    }
}
