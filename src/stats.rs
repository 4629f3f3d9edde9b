use std::collections::HashSet;

use crate::data::FossilRecord;
use crate::format::fixed1;

/// Aggregates over the records currently shown on the map
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    pub visible_count: usize,
    /// Distinct `region` labels
    pub location_count: usize,
    /// Mean body length ignoring NaN, 0 when there is nothing to average
    pub avg_length: f64,
}

impl Stats {
    pub fn compute<'a>(visible: impl IntoIterator<Item = &'a FossilRecord>) -> Self {
        let mut visible_count = 0;
        let mut regions = HashSet::new();
        let (mut sum, mut counted) = (0.0, 0usize);

        for record in visible {
            visible_count += 1;
            regions.insert(record.region.as_str());
            if !record.length_m.is_nan() {
                sum += record.length_m;
                counted += 1;
            }
        }

        Self {
            visible_count,
            location_count: regions.len(),
            avg_length: if counted == 0 { 0.0 } else { sum / counted as f64 },
        }
    }

    pub fn avg_length_label(&self) -> String {
        fixed1(self.avg_length)
    }
}
