use fontdb::{Database, Family, Query};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

/// Width of an average glyph relative to the font size, used when no font
/// face can be found.
const FALLBACK_CHAR_WIDTH: f32 = 0.56;

static MEASURER: Lazy<Mutex<Measurer>> = Lazy::new(|| Mutex::new(Measurer::new()));

/// Measured width of `text`, falling back to a per-character estimate.
pub fn text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    measure_text_width(text, font_size, font_family).unwrap_or_else(|| estimate_width(text, font_size))
}

pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * FALLBACK_CHAR_WIDTH
}

pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

/// Horizontal advances per character in font units, per family.
struct FamilyMetrics {
    units_per_em: f32,
    advances: HashMap<char, Option<u16>>,
    face_id: fontdb::ID,
}

struct Measurer {
    db: Database,
    loaded_system_fonts: bool,
    families: HashMap<String, Option<FamilyMetrics>>,
}

impl Measurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            families: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = font_family.trim().to_string();
        if !self.families.contains_key(&key) {
            let metrics = self.load_family(font_family);
            self.families.insert(key.clone(), metrics);
        }

        let missing: Vec<char> = {
            let metrics = self.families.get(&key)?.as_ref()?;
            text.chars()
                .filter(|ch| !metrics.advances.contains_key(ch))
                .collect()
        };
        if !missing.is_empty() {
            self.cache_advances(&key, &missing);
        }

        let metrics = self.families.get(&key)?.as_ref()?;
        let scale = font_size / metrics.units_per_em;
        let width = text
            .chars()
            .map(|ch| match metrics.advances.get(&ch).copied().flatten() {
                Some(advance) => advance as f32 * scale,
                None => font_size * FALLBACK_CHAR_WIDTH,
            })
            .sum::<f32>();
        Some(width.max(0.0))
    }

    fn load_family(&mut self, font_family: &str) -> Option<FamilyMetrics> {
        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let names: Vec<&str> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .copied()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "monospace" => Family::Monospace,
                "sans-serif" | "system-ui" => Family::SansSerif,
                _ => Family::Name(name),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        let face_id = self.db.query(&Query {
            families: &families,
            ..Query::default()
        })?;
        let units_per_em = self
            .db
            .with_face_data(face_id, |data, index| {
                Face::parse(data, index).ok().map(|face| face.units_per_em().max(1))
            })
            .flatten()?;
        Some(FamilyMetrics {
            units_per_em: units_per_em as f32,
            advances: HashMap::new(),
            face_id,
        })
    }

    fn cache_advances(&mut self, key: &str, chars: &[char]) {
        let Some(Some(metrics)) = self.families.get_mut(key) else {
            return;
        };
        let face_id = metrics.face_id;
        let advances = self
            .db
            .with_face_data(face_id, |data, index| {
                let face = Face::parse(data, index).ok()?;
                Some(
                    chars
                        .iter()
                        .map(|ch| {
                            let advance = face
                                .glyph_index(*ch)
                                .and_then(|glyph| face.glyph_hor_advance(glyph));
                            (*ch, advance)
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .flatten()
            .unwrap_or_else(|| chars.iter().map(|ch| (*ch, None)).collect());
        metrics.advances.extend(advances);
    }
}
