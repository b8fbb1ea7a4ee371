use super::types::{Coord, Mark, Outcome, Player};

pub type Grid<T> = [[T; 3]; 3];

/// Rows, then columns, then the two diagonals.
pub const LINES: [[Coord; 3]; 8] = [
    [Coord { row: 0, col: 0 }, Coord { row: 0, col: 1 }, Coord { row: 0, col: 2 }],
    [Coord { row: 1, col: 0 }, Coord { row: 1, col: 1 }, Coord { row: 1, col: 2 }],
    [Coord { row: 2, col: 0 }, Coord { row: 2, col: 1 }, Coord { row: 2, col: 2 }],
    [Coord { row: 0, col: 0 }, Coord { row: 1, col: 0 }, Coord { row: 2, col: 0 }],
    [Coord { row: 0, col: 1 }, Coord { row: 1, col: 1 }, Coord { row: 2, col: 1 }],
    [Coord { row: 0, col: 2 }, Coord { row: 1, col: 2 }, Coord { row: 2, col: 2 }],
    [Coord { row: 0, col: 0 }, Coord { row: 1, col: 1 }, Coord { row: 2, col: 2 }],
    [Coord { row: 0, col: 2 }, Coord { row: 1, col: 1 }, Coord { row: 2, col: 0 }],
];

/// A cell that can take part in a three-in-a-row check.
///
/// Local boards hold [`Mark`]s. The meta-grid holds each local board's
/// [`Outcome`], where `Drawn` fills its cell but belongs to nobody.
pub trait LineCell: Copy {
    fn owner(&self) -> Option<Player>;
    fn filled(&self) -> bool;
}

impl LineCell for Mark {
    fn owner(&self) -> Option<Player> {
        self.player()
    }

    fn filled(&self) -> bool {
        !self.is_empty()
    }
}

impl LineCell for Outcome {
    fn owner(&self) -> Option<Player> {
        self.winner()
    }

    fn filled(&self) -> bool {
        self.is_decided()
    }
}

fn at<T: Copy>(grid: &Grid<T>, coord: Coord) -> T {
    grid[coord.row][coord.col]
}

fn line_owner<C: LineCell>(grid: &Grid<C>, line: &[Coord; 3]) -> Option<Player> {
    let first = at(grid, line[0]).owner()?;
    line[1..]
        .iter()
        .all(|&coord| at(grid, coord).owner() == Some(first))
        .then_some(first)
}

pub fn check_win<C: LineCell>(grid: &Grid<C>) -> Option<Player> {
    check_win_with_line(grid).map(|(player, _)| player)
}

pub fn check_win_with_line<C: LineCell>(grid: &Grid<C>) -> Option<(Player, [Coord; 3])> {
    LINES
        .iter()
        .find_map(|line| line_owner(grid, line).map(|player| (player, *line)))
}

pub fn classify<C: LineCell>(grid: &Grid<C>) -> Outcome {
    if let Some(player) = check_win(grid) {
        return Outcome::Won(player);
    }

    let full = grid.iter().all(|row| row.iter().all(|cell| cell.filled()));
    if full {
        Outcome::Drawn
    } else {
        Outcome::Ongoing
    }
}
