use std::fmt;

use super::board::Coord;

/// A single peg jump: the peg at `from` leaps over the peg at `over` and
/// lands on the empty cell at `to`, removing `over` from the board.
///
/// Actions are only valid for the board configuration they were generated
/// from; applying one changes the occupancy of all three cells, so a stale
/// action must not be reapplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub from: Coord,
    pub over: Coord,
    pub to: Coord,
}

impl Action {
    pub fn new(from: Coord, over: Coord, to: Coord) -> Self {
        Action { from, over, to }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}) -> ({},{})",
            self.from.row, self.from.col, self.to.row, self.to.col
        )
    }
}
