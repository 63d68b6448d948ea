//! Face grid data model shown in the text box portrait slot.
use bevy::prelude::*;
use rand::Rng;

pub const GRID_ROWS: usize = 3;
pub const GRID_COLS: usize = 3;
pub const SECTION_COUNT: usize = GRID_ROWS * GRID_COLS;

/// Half extent of the random offset a generated feature may take inside its section.
const FEATURE_JITTER: f32 = 30.0;

/// Chance that a generated section receives a feature.
const FEATURE_CHANCE: f64 = 0.5;

/// Kinds of feature that can sit in a face section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceFeature {
    Eye,
    Brow,
    Nose,
    Mouth,
    Mole,
}

impl FaceFeature {
    pub const ALL: [FaceFeature; 5] = [
        FaceFeature::Eye,
        FaceFeature::Brow,
        FaceFeature::Nose,
        FaceFeature::Mouth,
        FaceFeature::Mole,
    ];

    /// Glyph used when drawing the feature in the UI portrait.
    pub fn glyph(self) -> &'static str {
        match self {
            FaceFeature::Eye => "o",
            FaceFeature::Brow => "~",
            FaceFeature::Nose => "^",
            FaceFeature::Mouth => "=",
            FaceFeature::Mole => ".",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedFeature {
    pub feature: FaceFeature,
    /// Offset from the section centre, in portrait pixels.
    pub offset: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceSection {
    pub color: Color,
    pub features: Vec<PlacedFeature>,
}

impl Default for FaceSection {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            features: Vec::new(),
        }
    }
}

/// Nine sections in row-major order, 0 = upper left, 8 = lower right.
///
/// Section indices outside `0..9` are ignored by every mutator.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct FaceGrid {
    sections: [FaceSection; SECTION_COUNT],
}

impl FaceGrid {
    pub fn section(&self, index: usize) -> Option<&FaceSection> {
        self.sections.get(index)
    }

    pub fn sections(&self) -> &[FaceSection] {
        &self.sections
    }

    pub fn place_feature(&mut self, index: usize, feature: FaceFeature, offset: Vec2) {
        if let Some(section) = self.sections.get_mut(index) {
            section.features.push(PlacedFeature { feature, offset });
        }
    }

    pub fn clear_section_features(&mut self, index: usize) {
        if let Some(section) = self.sections.get_mut(index) {
            section.features.clear();
        }
    }

    pub fn set_section_color(&mut self, index: usize, color: Color) {
        if let Some(section) = self.sections.get_mut(index) {
            section.color = color;
        }
    }

    /// Random colour per section; roughly half the sections get one random feature.
    pub fn procedurally_generate(&mut self, rng: &mut impl Rng) {
        for index in 0..SECTION_COUNT {
            let color = Color::hsv(
                rng.gen_range(0.0..360.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
            );
            self.set_section_color(index, color);
            self.clear_section_features(index);

            if rng.gen_bool(FEATURE_CHANCE) {
                let feature = FaceFeature::ALL[rng.gen_range(0..FaceFeature::ALL.len())];
                let offset = Vec2::new(
                    rng.gen_range(-FEATURE_JITTER..FEATURE_JITTER),
                    rng.gen_range(-FEATURE_JITTER..FEATURE_JITTER),
                );
                self.place_feature(index, feature, offset);
            }
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        let mut grid = Self::default();
        grid.procedurally_generate(rng);
        grid
    }

    /// Same colour and same number of features in every section.
    ///
    /// Feature kinds and offsets are not compared.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn compare(&self, other: &FaceGrid) -> bool {
        self.sections
            .iter()
            .zip(other.sections.iter())
            .all(|(a, b)| a.color == b.color && a.features.len() == b.features.len())
    }
}

/// UI node holding the 3×3 portrait of the current speaker.
#[derive(Component, Debug)]
pub struct PortraitSlot;

/// One section of the portrait; carries its row-major index.
#[derive(Component, Debug, Clone, Copy)]
pub struct PortraitCell(pub usize);

/// Text glyphs drawn inside a portrait cell.
#[derive(Component, Debug, Clone, Copy)]
pub struct PortraitGlyphs(pub usize);
