use std::fmt;
use std::io::Read;

use thiserror::Error;

/// Errors raised while reading the fossil table
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{0}` in header")]
    MissingColumn(&'static str),
}

/// Taxonomic group of a fossil record
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DinoType {
    SmallTheropod,
    LargeTheropod,
    Sauropod,
    Ornithopod,
    Ceratopsian,
    ArmoredDinosaur,
    /// Any label outside the known groups, kept verbatim
    Other(String),
}

impl DinoType {
    /// Known groups in display order
    pub const KNOWN: [DinoType; 6] = [
        DinoType::SmallTheropod,
        DinoType::LargeTheropod,
        DinoType::Sauropod,
        DinoType::Ornithopod,
        DinoType::Ceratopsian,
        DinoType::ArmoredDinosaur,
    ];

    /// Exact, case-sensitive match of the source label
    pub fn parse(label: &str) -> Self {
        match label {
            "small theropod" => DinoType::SmallTheropod,
            "large theropod" => DinoType::LargeTheropod,
            "sauropod" => DinoType::Sauropod,
            "ornithopod" => DinoType::Ornithopod,
            "ceratopsian" => DinoType::Ceratopsian,
            "armored dinosaur" => DinoType::ArmoredDinosaur,
            other => DinoType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DinoType::SmallTheropod => "small theropod",
            DinoType::LargeTheropod => "large theropod",
            DinoType::Sauropod => "sauropod",
            DinoType::Ornithopod => "ornithopod",
            DinoType::Ceratopsian => "ceratopsian",
            DinoType::ArmoredDinosaur => "armored dinosaur",
            DinoType::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DinoType::Other(_))
    }
}

impl fmt::Display for DinoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diet category
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diet {
    Carnivorous,
    Herbivorous,
    Omnivorous,
    Other(String),
}

impl Diet {
    pub fn parse(label: &str) -> Self {
        match label {
            "carnivorous" => Diet::Carnivorous,
            "herbivorous" => Diet::Herbivorous,
            "omnivorous" => Diet::Omnivorous,
            other => Diet::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Diet::Carnivorous => "carnivorous",
            Diet::Herbivorous => "herbivorous",
            Diet::Omnivorous => "omnivorous",
            Diet::Other(label) => label,
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the fossil table
#[derive(Clone, Debug, PartialEq)]
pub struct FossilRecord {
    pub name: String,
    pub kind: DinoType,
    pub diet: Diet,
    pub length_m: f64,
    pub max_ma: f64,
    pub min_ma: f64,
    pub lng: f64,
    pub lat: f64,
    pub region: String,
    pub family: Option<String>,
}

impl FossilRecord {
    /// Span between the interval bounds, in millions of years
    pub fn duration_ma(&self) -> f64 {
        self.max_ma - self.min_ma
    }

    /// Family name for display
    pub fn family_label(&self) -> &str {
        match self.family.as_deref() {
            Some(family) if !family.is_empty() => family,
            _ => "Unknown",
        }
    }
}

/// Loose numeric coercion: surrounding whitespace is ignored, blank text is
/// zero and anything unparseable is NaN.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Column positions resolved from the header row
struct Columns {
    name: usize,
    kind: usize,
    diet: usize,
    length_m: usize,
    max_ma: usize,
    min_ma: usize,
    lng: usize,
    lat: usize,
    region: usize,
    family: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, RecordError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(RecordError::MissingColumn(name));
        Ok(Self {
            name: require("name")?,
            kind: require("type")?,
            diet: require("diet")?,
            length_m: require("length_m")?,
            max_ma: require("max_ma")?,
            min_ma: require("min_ma")?,
            lng: require("lng")?,
            lat: require("lat")?,
            region: require("region")?,
            family: find("family"),
        })
    }
}

/// Parse fossil records from CSV text with a header row
pub fn read_records<R: Read>(reader: R) -> Result<Vec<FossilRecord>, RecordError> {
    let mut table = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::resolve(table.headers()?)?;
    let mut records = Vec::new();

    for row in table.records() {
        let row = row?;
        let text = |idx: usize| row.get(idx).unwrap_or("").to_string();
        // A short row has no value at all, which is NaN rather than zero
        let number = |idx: usize| row.get(idx).map(parse_number).unwrap_or(f64::NAN);

        records.push(FossilRecord {
            name: text(columns.name),
            kind: DinoType::parse(row.get(columns.kind).unwrap_or("")),
            diet: Diet::parse(row.get(columns.diet).unwrap_or("")),
            length_m: number(columns.length_m),
            max_ma: number(columns.max_ma),
            min_ma: number(columns.min_ma),
            lng: number(columns.lng),
            lat: number(columns.lat),
            region: text(columns.region),
            family: columns
                .family
                .and_then(|idx| row.get(idx))
                .filter(|family| !family.is_empty())
                .map(str::to_string),
        });
    }

    Ok(records)
}
