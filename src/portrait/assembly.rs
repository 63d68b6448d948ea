//! Mixing whole faces out of several nine-piece sets.
use bevy::prelude::*;
use rand::Rng;

use super::components::{FaceFeature, FaceGrid, SECTION_COUNT};

/// One square of a face set.
#[derive(Debug, Clone, PartialEq)]
pub struct FacePiece {
    pub color: Color,
    pub feature: Option<FaceFeature>,
}

/// Up to nine pieces in row-major order. Short sets leave later sections untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacePieceSet {
    pub pieces: Vec<FacePiece>,
}

impl FacePieceSet {
    /// A skin tone with brows, eyes, nose and mouth in the usual places.
    pub fn toned(skin: Color, accent: Color) -> Self {
        let layout = [
            None,
            Some(FaceFeature::Brow),
            None,
            Some(FaceFeature::Eye),
            Some(FaceFeature::Nose),
            Some(FaceFeature::Eye),
            None,
            Some(FaceFeature::Mouth),
            None,
        ];
        let pieces = layout
            .into_iter()
            .enumerate()
            .map(|(index, feature)| {
                let color = if index == 1 { accent } else { skin };
                FacePiece { color, feature }
            })
            .collect();
        Self { pieces }
    }
}

/// Piece sets customers' faces are assembled from.
#[derive(Resource, Debug, Clone)]
pub struct FaceLibrary {
    sets: Vec<FacePieceSet>,
}

impl Default for FaceLibrary {
    fn default() -> Self {
        Self::new(vec![
            FacePieceSet::toned(Color::srgb(0.96, 0.82, 0.7), Color::srgb(0.55, 0.35, 0.2)),
            FacePieceSet::toned(Color::srgb(0.82, 0.62, 0.45), Color::srgb(0.2, 0.15, 0.1)),
            FacePieceSet::toned(Color::srgb(0.45, 0.3, 0.2), Color::srgb(0.1, 0.08, 0.05)),
            FacePieceSet::toned(Color::srgb(0.7, 0.85, 0.6), Color::srgb(0.8, 0.2, 0.3)),
        ])
    }
}

impl FaceLibrary {
    pub fn new(sets: Vec<FacePieceSet>) -> Self {
        Self { sets }
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Picks the set for every section at random. `None` when the library is empty.
    pub fn generate_random_face(&self, rng: &mut impl Rng) -> Option<FaceGrid> {
        if self.sets.is_empty() {
            warn!("Face library has no piece sets");
            return None;
        }
        let selection: Vec<i32> = (0..SECTION_COUNT)
            .map(|_| rng.gen_range(0..self.sets.len()) as i32)
            .collect();
        self.generate_face_from_selection(&selection)
    }

    /// `selection[i]` names the set section `i` is taken from and is clamped
    /// into range. Anything other than nine entries yields `None`.
    pub fn generate_face_from_selection(&self, selection: &[i32]) -> Option<FaceGrid> {
        if self.sets.is_empty() || selection.len() != SECTION_COUNT {
            return None;
        }

        let last = self.sets.len() as i32 - 1;
        let mut grid = FaceGrid::default();
        for (index, &choice) in selection.iter().enumerate() {
            let set_index = choice.clamp(0, last) as usize;
            let Some(piece) = self.sets[set_index].pieces.get(index) else {
                debug!("Set {} has no piece for section {}", set_index, index);
                continue;
            };
            grid.set_section_color(index, piece.color);
            if let Some(feature) = piece.feature {
                grid.place_feature(index, feature, Vec2::ZERO);
            }
        }
        Some(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn two_sets() -> FaceLibrary {
        FaceLibrary::new(vec![
            FacePieceSet::toned(Color::BLACK, Color::BLACK),
            FacePieceSet::toned(Color::WHITE, Color::WHITE),
        ])
    }

    #[test]
    fn selection_indices_are_clamped() {
        let library = two_sets();
        let grid = library
            .generate_face_from_selection(&[-5, 0, 1, 7, 1, 0, 0, 1, 99])
            .unwrap();

        assert_eq!(grid.section(0).unwrap().color, Color::BLACK);
        assert_eq!(grid.section(3).unwrap().color, Color::WHITE);
        assert_eq!(grid.section(8).unwrap().color, Color::WHITE);
        assert_eq!(grid.section(4).unwrap().features[0].feature, FaceFeature::Nose);
    }

    #[test]
    fn wrong_selection_length_is_a_no_op() {
        let library = two_sets();
        assert!(library.generate_face_from_selection(&[0, 1]).is_none());
        assert!(FaceLibrary::new(Vec::new())
            .generate_face_from_selection(&[0; 9])
            .is_none());
    }

    #[test]
    fn short_sets_leave_sections_default() {
        let library = FaceLibrary::new(vec![FacePieceSet {
            pieces: vec![FacePiece {
                color: Color::BLACK,
                feature: Some(FaceFeature::Eye),
            }],
        }]);
        let grid = library.generate_face_from_selection(&[0; 9]).unwrap();

        assert_eq!(grid.section(0).unwrap().features.len(), 1);
        assert_eq!(grid.section(5).unwrap().color, Color::WHITE);
    }

    #[test]
    fn random_face_draws_from_library_sets() {
        let library = FaceLibrary::default();
        let grid = library
            .generate_random_face(&mut StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!(grid.section(4).unwrap().features.len(), 1);
        assert!(FaceLibrary::new(Vec::new())
            .generate_random_face(&mut StdRng::seed_from_u64(3))
            .is_none());
    }
}
