//! Text blocks drawn inside element boxes and their measured size.
//!
//! Widths come from shaping the text with cosmic-text against the system
//! fonts. Hosts without a usable font fall back to a per-character estimate.

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use log::info;

use blueprint_core::{
    geometry::Size,
    model::{Element, ElementKind, Location},
};

pub const NAME_FONT_SIZE: f32 = 16.0;
pub const KIND_FONT_SIZE: f32 = 12.0;
pub const DESCRIPTION_FONT_SIZE: f32 = 13.0;

const MEASURE_FAMILY: &str = "Arial";
const BOX_WIDTH: f32 = 240.0;
const PADDING: f32 = 16.0;
const LINE_SPACING: f32 = 1.3;
const FALLBACK_ADVANCE: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

impl From<FontWeight> for Weight {
    fn from(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Normal => Weight::NORMAL,
            FontWeight::Bold => Weight::BOLD,
        }
    }
}

/// Owns the font database, which is expensive to load.
struct TextMeasurer {
    font_system: Mutex<FontSystem>,
}

impl TextMeasurer {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    fn width(&self, text: &str, font_size: f32, weight: FontWeight) -> f32 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let metrics = Metrics::new(font_size, line_height(font_size));
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new()
            .family(Family::Name(MEASURE_FAMILY))
            .weight(weight.into());
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        // Rightmost glyph edge over all runs.
        let measured = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
            .fold(0.0_f32, f32::max);

        if measured > 0.0 {
            measured
        } else {
            estimate(text, font_size)
        }
    }
}

static MEASURER: OnceLock<TextMeasurer> = OnceLock::new();

fn estimate(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * FALLBACK_ADVANCE
}

/// Rendered width of a single line of `text`.
pub fn text_width(text: &str, font_size: f32, weight: FontWeight) -> f32 {
    MEASURER
        .get_or_init(TextMeasurer::new)
        .width(text, font_size, weight)
}

pub fn line_height(font_size: f32) -> f32 {
    font_size * LINE_SPACING
}

/// Greedy word wrap against a pixel width. Words wider than `max_width`
/// get a line of their own.
pub fn wrap(text: &str, font_size: f32, weight: FontWeight, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() {
            let candidate = format!("{current} {word}");
            if text_width(&candidate, font_size, weight) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        } else {
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// The three text sections of an element box.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementText {
    pub name: Vec<String>,
    pub kind: String,
    pub description: Vec<String>,
    widest: f32,
}

impl ElementText {
    pub fn for_element(element: &Element) -> Self {
        let kind = match element.kind() {
            ElementKind::Person => "[Person]".to_string(),
            ElementKind::SoftwareSystem {
                location: Location::External,
                ..
            } => "[Software System, External]".to_string(),
            ElementKind::SoftwareSystem { .. } => "[Software System]".to_string(),
            ElementKind::Container { technology, .. } if technology.trim().is_empty() => {
                "[Container]".to_string()
            }
            ElementKind::Container { technology, .. } => format!("[Container: {technology}]"),
        };

        let inner = BOX_WIDTH - PADDING * 2.0;
        let name = wrap(element.name(), NAME_FONT_SIZE, FontWeight::Bold, inner);
        let description = wrap(
            element.description(),
            DESCRIPTION_FONT_SIZE,
            FontWeight::Normal,
            inner,
        );

        let widest = name
            .iter()
            .map(|line| text_width(line, NAME_FONT_SIZE, FontWeight::Bold))
            .chain(std::iter::once(text_width(
                &kind,
                KIND_FONT_SIZE,
                FontWeight::Normal,
            )))
            .chain(
                description
                    .iter()
                    .map(|line| text_width(line, DESCRIPTION_FONT_SIZE, FontWeight::Normal)),
            )
            .fold(0.0_f32, f32::max);

        Self {
            name,
            kind,
            description,
            widest,
        }
    }

    /// Box size needed to hold the text with padding. Boxes keep a common
    /// width unless a line cannot be broken to fit it.
    pub fn size(&self) -> Size {
        let width = PADDING.mul_add(2.0, self.widest).max(BOX_WIDTH);
        let height = PADDING * 2.0
            + line_height(NAME_FONT_SIZE) * self.name.len() as f32
            + line_height(KIND_FONT_SIZE)
            + line_height(DESCRIPTION_FONT_SIZE) * self.description.len() as f32;
        Size::new(width, height)
    }

    pub fn padding(&self) -> f32 {
        PADDING
    }
}

#[cfg(test)]
mod tests {
    use blueprint_core::model::Model;

    use super::*;

    #[test]
    fn test_width_grows_with_text() {
        let short = text_width("Public API", DESCRIPTION_FONT_SIZE, FontWeight::Normal);
        let long = text_width("Public API Gateway", DESCRIPTION_FONT_SIZE, FontWeight::Normal);
        assert!(short > 0.0);
        assert!(long > short);
        assert_eq!(text_width("   ", DESCRIPTION_FONT_SIZE, FontWeight::Normal), 0.0);
    }

    #[test]
    fn test_wrap_fits_width() {
        let text = "Gets the last published item data for user in";
        let lines = wrap(text, DESCRIPTION_FONT_SIZE, FontWeight::Normal, 100.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
        for line in lines.iter().filter(|line| line.contains(' ')) {
            assert!(
                text_width(line, DESCRIPTION_FONT_SIZE, FontWeight::Normal) <= 100.0,
                "{line:?} overflows"
            );
        }
        assert!(wrap("  ", DESCRIPTION_FONT_SIZE, FontWeight::Normal, 100.0).is_empty());
    }

    #[test]
    fn test_wide_word_gets_own_line() {
        let lines = wrap(
            "Supercalifragilisticexpialidocious word",
            DESCRIPTION_FONT_SIZE,
            FontWeight::Normal,
            40.0,
        );
        assert_eq!(lines, vec!["Supercalifragilisticexpialidocious", "word"]);
    }

    #[test]
    fn test_kind_lines() {
        let mut model = Model::new();
        let core = model.add_software_system("NvaCore", "Core").unwrap();
        let orcid = model
            .add_software_system_with_location("Orcid", "Orcid", Location::External)
            .unwrap();
        let user = model.add_person("Creator", "A user").unwrap();
        let db = model
            .add_container(core, "Data storage", "The data store", "AWS DynamoDB")
            .unwrap();

        let kind = |id| ElementText::for_element(model.element(id).unwrap()).kind;
        assert_eq!(kind(core), "[Software System]");
        assert_eq!(kind(orcid), "[Software System, External]");
        assert_eq!(kind(user), "[Person]");
        assert_eq!(kind(db), "[Container: AWS DynamoDB]");
    }

    #[test]
    fn test_size_grows_with_description() {
        let mut model = Model::new();
        let short = model.add_person("A", "Short").unwrap();
        let long = model
            .add_person(
                "B",
                "A user who administers NVA users on behalf of an institution and more",
            )
            .unwrap();

        let short = ElementText::for_element(model.element(short).unwrap()).size();
        let long = ElementText::for_element(model.element(long).unwrap()).size();
        assert_eq!(short.width(), BOX_WIDTH);
        assert_eq!(long.width(), BOX_WIDTH);
        assert!(long.height() > short.height());
    }

    #[test]
    fn test_unbreakable_name_widens_box() {
        let mut model = Model::new();
        let id = model
            .add_person("W".repeat(48), "A person with a very long handle")
            .unwrap();

        let size = ElementText::for_element(model.element(id).unwrap()).size();
        assert!(size.width() > BOX_WIDTH);
    }
}
