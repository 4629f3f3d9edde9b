use std::fmt;
use std::time::Duration;

use crate::data::{DinoType, FossilRecord};

/// Opacity of glyphs that pass the filter
pub const SHOWN_OPACITY: f64 = 1.0;
/// Opacity of glyphs that are filtered out; they stay on the map
pub const FADED_OPACITY: f64 = 0.08;
/// Duration of the opacity transition after a selection
pub const FILTER_TRANSITION: Duration = Duration::from_millis(300);

/// The single active type restriction
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Type(DinoType),
}

impl Filter {
    /// Inverse of [`Filter::data_value`]
    pub fn parse(value: &str) -> Self {
        match value {
            "all" => Filter::All,
            other => Filter::Type(DinoType::parse(other)),
        }
    }

    /// Value carried by the filter button: `"all"` or the type string
    pub fn data_value(&self) -> &str {
        match self {
            Filter::All => "all",
            Filter::Type(kind) => kind.as_str(),
        }
    }

    /// Button caption
    pub fn label(&self) -> String {
        match self {
            Filter::All => "All".to_string(),
            Filter::Type(kind) => title_case(kind.as_str()),
        }
    }

    pub fn matches(&self, kind: &DinoType) -> bool {
        match self {
            Filter::All => true,
            Filter::Type(selected) => selected == kind,
        }
    }

    pub fn target_opacity(&self, kind: &DinoType) -> f64 {
        if self.matches(kind) {
            SHOWN_OPACITY
        } else {
            FADED_OPACITY
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_value())
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Filter buttons and the exclusive selection among them
#[derive(Clone, Debug)]
pub struct FilterController {
    options: Vec<Filter>,
    active: usize,
}

impl FilterController {
    /// `All`, the six known types, then unknown types from `records` in
    /// first-seen order
    pub fn new(records: &[FossilRecord]) -> Self {
        let mut options = vec![Filter::All];
        options.extend(DinoType::KNOWN.into_iter().map(Filter::Type));
        for record in records {
            let option = Filter::Type(record.kind.clone());
            if !record.kind.is_known() && !options.contains(&option) {
                options.push(option);
            }
        }
        Self { options, active: 0 }
    }

    pub fn options(&self) -> &[Filter] {
        &self.options
    }

    pub fn active(&self) -> &Filter {
        &self.options[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Make `filter` the only active option. Unlisted filters are ignored.
    pub fn select(&mut self, filter: &Filter) -> Option<&Filter> {
        let index = self.options.iter().position(|f| f == filter)?;
        self.select_index(index)
    }

    pub fn select_index(&mut self, index: usize) -> Option<&Filter> {
        if index >= self.options.len() {
            return None;
        }
        self.active = index;
        Some(&self.options[index])
    }

    /// Step the selection forwards or backwards, wrapping around
    pub fn cycle(&mut self, forward: bool) -> &Filter {
        let len = self.options.len();
        self.active = if forward {
            (self.active + 1) % len
        } else {
            (self.active + len - 1) % len
        };
        &self.options[self.active]
    }
}
