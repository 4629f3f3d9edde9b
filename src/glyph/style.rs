use glam::DVec2;

use crate::braille::Rgb;
use crate::data::{Diet, DinoType};

/// Colour for types without an entry in the palette
pub const DEFAULT_COLOR: Rgb = Rgb::new(0x99, 0x99, 0x99);

/// Marker shown when a type has no registered icon
pub const FALLBACK_EMOJI: &str = "🦖";

/// Corner radius of the herbivore square, scene units
pub const CORNER_RADIUS: f64 = 6.0;
/// Triangle half-extent relative to glyph size
const TRIANGLE_FACTOR: f64 = 1.3;
/// Icon edge relative to glyph size
const ICON_FACTOR: f64 = 2.2;
/// Emoji font size relative to glyph size
const EMOJI_FACTOR: f64 = 1.4;

/// Palette colour for a type, or `None` when unregistered
pub fn type_color(kind: &DinoType) -> Option<Rgb> {
    let hex = match kind {
        DinoType::SmallTheropod => "#e7d63cff",
        DinoType::LargeTheropod => "#c91c09ff",
        DinoType::Sauropod => "#11a0d0ff",
        DinoType::Ornithopod => "#5216a0ff",
        DinoType::Ceratopsian => "#48ba0aff",
        DinoType::ArmoredDinosaur => "#f39c12",
        DinoType::Other(_) => return None,
    };
    Rgb::from_hex(hex)
}

/// Terminal icon for a type, or `None` when unregistered
pub fn type_icon(kind: &DinoType) -> Option<&'static str> {
    match kind {
        DinoType::SmallTheropod => Some("t"),
        DinoType::LargeTheropod => Some("T"),
        DinoType::Sauropod => Some("S"),
        DinoType::Ornithopod => Some("O"),
        DinoType::Ceratopsian => Some("C"),
        DinoType::ArmoredDinosaur => Some("A"),
        DinoType::Other(_) => None,
    }
}

/// Background shape encoding diet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DietShape {
    /// Carnivorous
    Circle,
    /// Herbivorous
    RoundedSquare,
    /// Omnivorous
    Triangle,
    /// Unknown diet: a circle drawn more transparent
    DefaultCircle,
}

impl DietShape {
    pub fn for_diet(diet: &Diet) -> Self {
        match diet {
            Diet::Carnivorous => DietShape::Circle,
            Diet::Herbivorous => DietShape::RoundedSquare,
            Diet::Omnivorous => DietShape::Triangle,
            Diet::Other(_) => DietShape::DefaultCircle,
        }
    }

    pub fn fill_opacity(self) -> f64 {
        match self {
            DietShape::DefaultCircle => 0.8,
            _ => 0.9,
        }
    }

    /// Largest distance from the centre along either axis
    pub fn half_extent(self, size: f64) -> f64 {
        match self {
            DietShape::Triangle => size * TRIANGLE_FACTOR,
            _ => size,
        }
    }

    /// Whether `offset` from the glyph centre lies inside the shape
    pub fn contains(self, offset: DVec2, size: f64) -> bool {
        if !(size.is_finite() && size > 0.0) {
            return false;
        }
        match self {
            DietShape::Circle | DietShape::DefaultCircle => offset.length_squared() <= size * size,
            DietShape::RoundedSquare => {
                let corner = CORNER_RADIUS.min(size);
                crate::map::geometry::rounded_square_contains(
                    offset.x.abs(),
                    offset.y.abs(),
                    size,
                    size - corner,
                    corner,
                )
            }
            DietShape::Triangle => {
                crate::map::geometry::triangle_contains(offset.x, offset.y, size * TRIANGLE_FACTOR)
            }
        }
    }
}

/// Overlay identifying the taxonomic type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeMarker {
    Icon(&'static str),
    Emoji,
}

impl TypeMarker {
    pub fn for_type(kind: &DinoType) -> Self {
        match type_icon(kind) {
            Some(icon) => TypeMarker::Icon(icon),
            None => TypeMarker::Emoji,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TypeMarker::Icon(icon) => icon,
            TypeMarker::Emoji => FALLBACK_EMOJI,
        }
    }

    /// Icon edge length or emoji font size for a glyph of `size`
    pub fn extent(self, size: f64) -> f64 {
        match self {
            TypeMarker::Icon(_) => size * ICON_FACTOR,
            TypeMarker::Emoji => size * EMOJI_FACTOR,
        }
    }

    /// Whether `offset` lies in the marker's square box
    pub fn contains(self, offset: DVec2, size: f64) -> bool {
        let half = self.extent(size) / 2.0;
        half > 0.0 && offset.x.abs() <= half && offset.y.abs() <= half
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette() {
        assert_eq!(type_color(&DinoType::Sauropod), Some(Rgb::new(0x11, 0xa0, 0xd0)));
        assert_eq!(
            type_color(&DinoType::ArmoredDinosaur),
            Some(Rgb::new(0xf3, 0x9c, 0x12))
        );
        for kind in DinoType::KNOWN {
            assert!(type_color(&kind).is_some());
            assert!(type_icon(&kind).is_some());
        }
        assert_eq!(type_color(&DinoType::Other("pterosaur".into())), None);
    }

    #[test]
    fn test_diet_shapes() {
        assert_eq!(DietShape::for_diet(&Diet::Carnivorous), DietShape::Circle);
        assert_eq!(DietShape::for_diet(&Diet::Herbivorous), DietShape::RoundedSquare);
        assert_eq!(DietShape::for_diet(&Diet::Omnivorous), DietShape::Triangle);
        assert_eq!(
            DietShape::for_diet(&Diet::Other("insectivorous".into())),
            DietShape::DefaultCircle
        );
        assert_eq!(DietShape::DefaultCircle.fill_opacity(), 0.8);
        assert_eq!(DietShape::Triangle.fill_opacity(), 0.9);
    }

    #[test]
    fn test_shape_containment() {
        let size = 10.0;
        assert!(DietShape::Circle.contains(DVec2::new(6.0, 6.0), size));
        assert!(!DietShape::Circle.contains(DVec2::new(8.0, 8.0), size));
        assert!(DietShape::RoundedSquare.contains(DVec2::new(9.0, 0.0), size));
        assert!(!DietShape::RoundedSquare.contains(DVec2::new(9.9, 9.9), size));
        // Apex at (0, -13), base at y = 13
        assert!(DietShape::Triangle.contains(DVec2::new(0.0, -12.0), size));
        assert!(DietShape::Triangle.contains(DVec2::new(12.0, 12.9), size));
        assert!(!DietShape::Triangle.contains(DVec2::new(8.0, -8.0), size));
        assert!(!DietShape::Circle.contains(DVec2::ZERO, f64::NAN));
    }

    #[test]
    fn test_markers() {
        assert_eq!(TypeMarker::for_type(&DinoType::Ceratopsian), TypeMarker::Icon("C"));
        let other = TypeMarker::for_type(&DinoType::Other("pterosaur".into()));
        assert_eq!(other, TypeMarker::Emoji);
        assert_eq!(other.symbol(), FALLBACK_EMOJI);
        assert!((TypeMarker::Icon("C").extent(10.0) - 22.0).abs() < 1e-12);
        assert!((TypeMarker::Emoji.extent(10.0) - 14.0).abs() < 1e-12);
        assert!(TypeMarker::Icon("C").contains(DVec2::new(10.5, -10.5), 10.0));
        assert!(!TypeMarker::Emoji.contains(DVec2::new(7.5, 0.0), 10.0));
    }
}
