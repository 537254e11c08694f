use serde::{Deserialize, Serialize};

use super::action::Action;
use super::state::{BoardStatus, StateKey};
use crate::error::BoardError;

/// Relative offset to a neighboring cell.
///
/// Neighbors are stored tagged with the direction used to reach them: a
/// jump's landing coordinate is `neighbor + the same direction`, so losing
/// the tag would break legal-move generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub drow: i32,
    pub dcol: i32,
}

impl Direction {
    const fn new(drow: i32, dcol: i32) -> Self {
        Direction { drow, dcol }
    }
}

// Six-neighbor patterns for the two supported lattices.
const DIAMOND_DIRECTIONS: [Direction; 6] = [
    Direction::new(-1, 0),
    Direction::new(-1, 1),
    Direction::new(0, -1),
    Direction::new(0, 1),
    Direction::new(1, -1),
    Direction::new(1, 0),
];
const TRIANGLE_DIRECTIONS: [Direction; 6] = [
    Direction::new(-1, -1),
    Direction::new(-1, 0),
    Direction::new(0, -1),
    Direction::new(0, 1),
    Direction::new(1, 0),
    Direction::new(1, 1),
];

/// Grid coordinate (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    /// The coordinate one step along `dir`, or `None` when it would leave
    /// the grid on the negative side.
    pub fn offset(self, dir: Direction) -> Option<Coord> {
        let row = self.row as i64 + dir.drow as i64;
        let col = self.col as i64 + dir.dcol as i64;
        if row < 0 || col < 0 {
            return None;
        }
        Some(Coord::new(row as usize, col as usize))
    }
}

/// Board layout: which cells of the `size x size` grid exist and which
/// six-neighbor pattern connects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardShape {
    #[serde(alias = "d")]
    Diamond,
    #[serde(alias = "t")]
    Triangle,
}

impl BoardShape {
    fn directions(self) -> &'static [Direction; 6] {
        match self {
            BoardShape::Diamond => &DIAMOND_DIRECTIONS,
            BoardShape::Triangle => &TRIANGLE_DIRECTIONS,
        }
    }

    /// Whether `(row, col)` is a present cell for this shape.
    fn contains(self, size: usize, row: usize, col: usize) -> bool {
        match self {
            BoardShape::Diamond => row < size && col < size,
            BoardShape::Triangle => row < size && col <= row,
        }
    }
}

/// Board construction parameters, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub shape: BoardShape,
    pub size: usize,
    /// Coordinates of cells that start empty.
    pub holes: Vec<(usize, usize)>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            shape: BoardShape::Diamond,
            size: 4,
            holes: vec![(2, 1)],
        }
    }
}

#[derive(Debug, Clone)]
struct Cell {
    is_peg: bool,
    neighbors: Vec<(Direction, Coord)>,
}

/// The peg board: a grid of optional cells with a precomputed,
/// direction-tagged neighbor graph.
///
/// The neighbor graph and the cell enumeration order are fixed at
/// construction; only peg occupancy changes while playing.
#[derive(Debug, Clone)]
pub struct Board {
    shape: BoardShape,
    size: usize,
    grid: Vec<Vec<Option<Cell>>>,
    holes: Vec<Coord>,
    /// Present cells in row-major order; defines encoding and action
    /// enumeration order.
    order: Vec<Coord>,
}

impl Board {
    /// Build the board with every present cell pegged, then clear the
    /// configured holes. A hole coordinate that is not a present cell is a
    /// fatal configuration error.
    pub fn new(config: &BoardConfig) -> Result<Board, BoardError> {
        let size = config.size;
        let mut grid: Vec<Vec<Option<Cell>>> = vec![vec![None; size]; size];
        let mut order = Vec::new();

        for row in 0..size {
            for col in 0..size {
                if config.shape.contains(size, row, col) {
                    grid[row][col] = Some(Cell {
                        is_peg: true,
                        neighbors: Vec::new(),
                    });
                    order.push(Coord::new(row, col));
                }
            }
        }

        for &coord in &order {
            let mut neighbors = Vec::new();
            for &dir in config.shape.directions() {
                if let Some(n) = coord.offset(dir) {
                    if n.row < size && n.col < size && grid[n.row][n.col].is_some() {
                        neighbors.push((dir, n));
                    }
                }
            }
            if let Some(cell) = grid[coord.row][coord.col].as_mut() {
                cell.neighbors = neighbors;
            }
        }

        let holes: Vec<Coord> = config
            .holes
            .iter()
            .map(|&(row, col)| Coord::new(row, col))
            .collect();

        let mut board = Board {
            shape: config.shape,
            size,
            grid,
            holes,
            order,
        };
        board.clear_holes()?;
        Ok(board)
    }

    fn clear_holes(&mut self) -> Result<(), BoardError> {
        for i in 0..self.holes.len() {
            let hole = self.holes[i];
            match self.cell_mut(hole) {
                Some(cell) => cell.is_peg = false,
                None => {
                    return Err(BoardError::InvalidHole {
                        row: hole.row,
                        col: hole.col,
                    })
                }
            }
        }
        Ok(())
    }

    fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.grid.get(coord.row)?.get(coord.col)?.as_ref()
    }

    fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.grid.get_mut(coord.row)?.get_mut(coord.col)?.as_mut()
    }

    fn set_peg(&mut self, coord: Coord, value: bool) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.is_peg = value;
        }
    }

    pub fn shape(&self) -> BoardShape {
        self.shape
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of present cells (pegged or empty); also the encoding length.
    pub fn cell_count(&self) -> usize {
        self.order.len()
    }

    /// Whether `coord` is a present cell.
    pub fn contains(&self, coord: Coord) -> bool {
        self.cell(coord).is_some()
    }

    pub fn is_peg(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(|cell| cell.is_peg)
    }

    /// Direction-tagged neighbors of `coord`; empty for absent cells.
    pub fn neighbors_of(&self, coord: Coord) -> &[(Direction, Coord)] {
        self.cell(coord)
            .map(|cell| cell.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Enumerate every legal jump in a deterministic order (row-major empty
    /// cells, fixed direction order per cell).
    ///
    /// For each empty cell, each pegged neighbor is checked for a pegged
    /// cell one further step along the same direction; that far peg jumps
    /// over the near peg into the empty cell.
    pub fn legal_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        for &coord in &self.order {
            let cell = match self.cell(coord) {
                Some(cell) => cell,
                None => continue,
            };
            if cell.is_peg {
                continue;
            }
            for &(dir, near) in &cell.neighbors {
                if !self.is_peg(near) {
                    continue;
                }
                if let Some(far) = near.offset(dir) {
                    if self.is_peg(far) {
                        actions.push(Action::new(far, near, coord));
                    }
                }
            }
        }
        actions
    }

    /// Apply a jump: `from` and `over` lose their pegs, `to` gains one.
    ///
    /// No validation happens here; the action must come from
    /// `legal_actions()` on the current occupancy.
    pub fn apply(&mut self, action: &Action) {
        self.set_peg(action.from, false);
        self.set_peg(action.over, false);
        self.set_peg(action.to, true);
    }

    /// Canonical occupancy encoding in enumeration order.
    pub fn encode(&self) -> StateKey {
        StateKey::new(
            self.order
                .iter()
                .map(|&coord| if self.is_peg(coord) { '1' } else { '0' })
                .collect(),
        )
    }

    pub fn peg_count(&self) -> usize {
        self.order.iter().filter(|&&c| self.is_peg(c)).count()
    }

    /// Restore the initial configuration: all cells pegged except the holes.
    pub fn reset(&mut self) {
        for i in 0..self.order.len() {
            let coord = self.order[i];
            self.set_peg(coord, true);
        }
        for i in 0..self.holes.len() {
            let hole = self.holes[i];
            self.set_peg(hole, false);
        }
    }

    /// Terminal classification, computed from occupancy and legal moves.
    pub fn status(&self) -> BoardStatus {
        if self.peg_count() == 1 {
            BoardStatus::Win
        } else if self.legal_actions().is_empty() {
            BoardStatus::Loss
        } else {
            BoardStatus::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond(size: usize, holes: Vec<(usize, usize)>) -> Board {
        Board::new(&BoardConfig {
            shape: BoardShape::Diamond,
            size,
            holes,
        })
        .unwrap()
    }

    fn triangle(size: usize, holes: Vec<(usize, usize)>) -> Board {
        Board::new(&BoardConfig {
            shape: BoardShape::Triangle,
            size,
            holes,
        })
        .unwrap()
    }

    /// All present cells except the listed pegs become holes.
    fn holes_except(shape: BoardShape, size: usize, pegs: &[(usize, usize)]) -> Vec<(usize, usize)> {
        let full = Board::new(&BoardConfig {
            shape,
            size,
            holes: vec![],
        })
        .unwrap();
        (0..size)
            .flat_map(|r| (0..size).map(move |c| (r, c)))
            .filter(|&(r, c)| full.contains(Coord::new(r, c)) && !pegs.contains(&(r, c)))
            .collect()
    }

    #[test]
    fn test_diamond_cell_count() {
        assert_eq!(diamond(4, vec![]).cell_count(), 16);
    }

    #[test]
    fn test_triangle_cell_count() {
        // Row r holds r+1 cells.
        assert_eq!(triangle(5, vec![]).cell_count(), 15);
    }

    #[test]
    fn test_invalid_hole_rejected() {
        let err = Board::new(&BoardConfig {
            shape: BoardShape::Diamond,
            size: 3,
            holes: vec![(3, 0)],
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "hole coordinate (3,0) is not a cell on the board");

        // Upper-right half is absent on a triangle.
        assert!(Board::new(&BoardConfig {
            shape: BoardShape::Triangle,
            size: 3,
            holes: vec![(0, 1)],
        })
        .is_err());
    }

    #[test]
    fn test_holes_start_empty() {
        let board = diamond(4, vec![(2, 1)]);
        assert!(!board.is_peg(Coord::new(2, 1)));
        assert_eq!(board.peg_count(), 15);
    }

    #[test]
    fn test_diamond_neighbor_counts() {
        let board = diamond(3, vec![]);
        assert_eq!(board.neighbors_of(Coord::new(1, 1)).len(), 6);
        assert_eq!(board.neighbors_of(Coord::new(0, 0)).len(), 2);
        assert_eq!(board.neighbors_of(Coord::new(0, 2)).len(), 3);
    }

    #[test]
    fn test_triangle_neighbor_counts() {
        let board = triangle(3, vec![]);
        // Apex connects only downward.
        assert_eq!(board.neighbors_of(Coord::new(0, 0)).len(), 2);
        assert_eq!(board.neighbors_of(Coord::new(1, 0)).len(), 4);
    }

    #[test]
    fn test_neighbors_carry_direction_to_landing_cell() {
        let board = triangle(3, vec![]);
        for &(dir, n) in board.neighbors_of(Coord::new(0, 0)) {
            assert_eq!(n.row as i64, dir.drow as i64);
            assert_eq!(n.col as i64, dir.dcol as i64);
        }
    }

    #[test]
    fn test_encode_order_is_row_major() {
        let board = diamond(2, vec![(0, 0)]);
        assert_eq!(board.encode().as_str(), "0111");
    }

    #[test]
    fn test_single_jump_line() {
        // Two pegs in a row next to the only empty cell: exactly one jump.
        let holes = holes_except(BoardShape::Diamond, 3, &[(0, 1), (0, 2)]);
        let mut board = diamond(3, holes);
        let actions = board.legal_actions();
        assert_eq!(actions.len(), 1);

        let action = actions[0];
        assert_eq!(action.from, Coord::new(0, 2));
        assert_eq!(action.over, Coord::new(0, 1));
        assert_eq!(action.to, Coord::new(0, 0));

        board.apply(&action);
        assert_eq!(board.peg_count(), 1);
        assert_eq!(board.status(), BoardStatus::Win);
    }

    #[test]
    fn test_triangle_opening_jumps() {
        // Classic opening: apex empty, two pegs can jump into it.
        let board = triangle(5, vec![(0, 0)]);
        let actions = board.legal_actions();
        assert_eq!(actions.len(), 2);
        for action in &actions {
            assert_eq!(action.to, Coord::new(0, 0));
        }
    }

    #[test]
    fn test_every_legal_action_removes_exactly_one_peg() {
        for board in [diamond(4, vec![(2, 1)]), triangle(5, vec![(0, 0)])] {
            let before = board.peg_count();
            for action in board.legal_actions() {
                assert!(board.is_peg(action.from));
                assert!(board.is_peg(action.over));
                assert!(!board.is_peg(action.to));

                let mut next = board.clone();
                next.apply(&action);
                assert_eq!(next.peg_count(), before - 1);
                assert!(!next.is_peg(action.from));
                assert!(!next.is_peg(action.over));
                assert!(next.is_peg(action.to));
            }
        }
    }

    #[test]
    fn test_status_loss_when_stuck() {
        // Two isolated pegs: more than one peg, no legal jump.
        let holes = holes_except(BoardShape::Diamond, 3, &[(0, 0), (2, 2)]);
        let board = diamond(3, holes);
        assert!(board.legal_actions().is_empty());
        assert_eq!(board.status(), BoardStatus::Loss);
    }

    #[test]
    fn test_status_neutral_mid_game() {
        let board = diamond(4, vec![(2, 1)]);
        assert_eq!(board.status(), BoardStatus::Neutral);
    }

    #[test]
    fn test_status_is_exclusive() {
        // Statuses over a handful of positions: exactly one classification
        // per position, by construction of the three predicates.
        for board in [
            diamond(4, vec![(2, 1)]),
            diamond(3, holes_except(BoardShape::Diamond, 3, &[(0, 0), (2, 2)])),
            diamond(3, holes_except(BoardShape::Diamond, 3, &[(1, 1)])),
        ] {
            let win = board.peg_count() == 1;
            let loss = board.peg_count() != 1 && board.legal_actions().is_empty();
            let neutral = board.peg_count() != 1 && !board.legal_actions().is_empty();
            assert_eq!(
                [win, loss, neutral].iter().filter(|&&b| b).count(),
                1,
                "statuses must be mutually exclusive"
            );
        }
    }

    #[test]
    fn test_reset_restores_initial_holes() {
        let mut board = diamond(4, vec![(2, 1)]);
        let initial = board.encode();

        let action = board.legal_actions()[0];
        board.apply(&action);
        assert_ne!(board.encode(), initial);

        board.reset();
        assert_eq!(board.encode(), initial);
        assert_eq!(board.peg_count(), 15);
    }

    #[test]
    fn test_shape_parses_from_aliases() {
        let config: BoardConfig = toml::from_str("shape = \"d\"\nsize = 3").unwrap();
        assert_eq!(config.shape, BoardShape::Diamond);
        let config: BoardConfig = toml::from_str("shape = \"triangle\"\nsize = 3").unwrap();
        assert_eq!(config.shape, BoardShape::Triangle);
        assert!(toml::from_str::<BoardConfig>("shape = \"hex\"").is_err());
    }
}
