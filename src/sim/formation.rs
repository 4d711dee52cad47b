//! Invader formations
//!
//! A formation is a CSV grid, one text line per row. Any cell holding `1` is
//! an invader at that (column, row); everything else is empty space.

use std::path::{Path, PathBuf};

use glam::Vec2;

/// World position of grid cell (0, 0)
pub const FORMATION_ORIGIN: Vec2 = Vec2::new(-1.5, 2.0);
/// Horizontal distance between columns
pub const COLUMN_SPACING: f32 = 0.66;
/// Vertical distance between rows
pub const ROW_SPACING: f32 = 0.5;

/// A single invader slot in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub col: u32,
    pub row: u32,
}

impl GridCell {
    /// Where an invader in this cell starts
    pub fn world_position(&self) -> Vec2 {
        Vec2::new(
            FORMATION_ORIGIN.x + COLUMN_SPACING * self.col as f32,
            FORMATION_ORIGIN.y - ROW_SPACING * self.row as f32,
        )
    }
}

/// The invader layout for one level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formation {
    pub cells: Vec<GridCell>,
}

impl Formation {
    pub fn parse(text: &str) -> Self {
        let mut cells = Vec::new();
        for (row, line) in text.lines().enumerate() {
            for (col, cell) in line.split(',').enumerate() {
                if cell.trim().parse::<i64>() == Ok(1) {
                    cells.push(GridCell {
                        col: col as u32,
                        row: row as u32,
                    });
                }
            }
        }
        Self { cells }
    }

    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// File name used for a level's formation
pub fn formation_file_name(level: u32) -> String {
    format!("inv_formation{}.csv", level)
}

/// Supplies the formation for each level (levels start at 1)
pub trait FormationSource {
    /// Missing or unreadable levels yield an empty formation
    fn formation_for_level(&self, level: u32) -> Formation;
}

/// Formations read from `inv_formation{level}.csv` files in a directory
#[derive(Debug, Clone)]
pub struct DirFormations {
    dir: PathBuf,
}

impl DirFormations {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FormationSource for DirFormations {
    fn formation_for_level(&self, level: u32) -> Formation {
        let path = self.dir.join(formation_file_name(level));
        match Formation::load(&path) {
            Ok(formation) => formation,
            Err(e) => {
                log::warn!("No formation for level {} at {}: {}", level, path.display(), e);
                Formation::default()
            }
        }
    }
}

const BUILTIN_LEVELS: [&str; 2] = [
    include_str!("../../assets/levels/inv_formation1.csv"),
    include_str!("../../assets/levels/inv_formation2.csv"),
];

/// Formations compiled into the binary (used by the web build)
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFormations;

impl FormationSource for BuiltinFormations {
    fn formation_for_level(&self, level: u32) -> Formation {
        let text = (level as usize)
            .checked_sub(1)
            .and_then(|i| BUILTIN_LEVELS.get(i));
        match text {
            Some(text) => Formation::parse(text),
            None => {
                log::warn!("No built-in formation for level {}", level);
                Formation::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell_at_origin() {
        let f = Formation::parse("1");
        assert_eq!(f.cells, vec![GridCell { col: 0, row: 0 }]);
        let pos = f.cells[0].world_position();
        assert!((pos - Vec2::new(-1.5, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_only_ones_become_invaders() {
        let f = Formation::parse("1,0,2,1\nx,,1\n");
        assert_eq!(
            f.cells,
            vec![
                GridCell { col: 0, row: 0 },
                GridCell { col: 3, row: 0 },
                GridCell { col: 2, row: 1 },
            ]
        );
    }

    #[test]
    fn test_blank_lines_still_count_as_rows() {
        let f = Formation::parse("0,0\n\n0,1");
        assert_eq!(f.cells, vec![GridCell { col: 1, row: 2 }]);
    }

    #[test]
    fn test_tolerates_whitespace_and_crlf() {
        let f = Formation::parse(" 1 ,0\r\n0, 1\r\n");
        assert_eq!(f.len(), 2);
        assert_eq!(f.cells[1], GridCell { col: 1, row: 1 });
    }

    #[test]
    fn test_world_position_offsets() {
        let pos = GridCell { col: 2, row: 3 }.world_position();
        assert!((pos.x - (-1.5 + 1.32)).abs() < 1e-5);
        assert!((pos.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_missing_directory_level_is_empty() {
        let source = DirFormations::new("/nonexistent/invaderers/levels");
        assert!(source.formation_for_level(1).is_empty());
    }

    #[test]
    fn test_builtin_levels() {
        let source = BuiltinFormations;
        assert!(!source.formation_for_level(1).is_empty());
        assert!(!source.formation_for_level(2).is_empty());
        assert!(source.formation_for_level(0).is_empty());
        assert!(source.formation_for_level(3).is_empty());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(formation_file_name(2), "inv_formation2.csv");
    }
}
