use std::fmt::Write as _;

use lane_cascade_core::{Cell, CellCoord, Direction, Event, PieceKind, Player};
use lane_cascade_world::BoardState;

/// Letter shown for a piece kind: `A` for kind zero, `B` for kind one and so on.
pub(crate) fn kind_symbol(kind: PieceKind) -> char {
    char::from(b'A'.wrapping_add(kind.get() % 26))
}

/// Draws the board with the top row first and column indices underneath.
pub(crate) fn board(board: &BoardState) -> String {
    let size = board.size();
    let mut out = String::new();

    for row in (0..size).rev() {
        let _ = write!(out, "{row:>2} ");
        for column in 0..size {
            let symbol = match board.get(CellCoord::new(column, row)) {
                Ok(Cell::Occupied(kind)) => kind_symbol(kind),
                Ok(Cell::Empty) | Err(_) => '.',
            };
            out.push(' ');
            out.push(symbol);
        }
        out.push('\n');
    }

    out.push_str("   ");
    for column in 0..size {
        let _ = write!(out, "{:>2}", column % 10);
    }
    out.push('\n');
    out
}

fn player_label(player: Player) -> &'static str {
    match player {
        Player::One => "player 1",
        Player::Two => "player 2",
    }
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "up",
        Direction::Down => "down",
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

fn coord(at: CellCoord) -> String {
    format!("({},{})", at.column(), at.row())
}

/// One-line description of an event.
pub(crate) fn describe(event: &Event) -> String {
    match event {
        Event::BoardPopulated { size } => format!("board populated ({size}x{size})"),
        Event::PieceSpawned { piece, at } => {
            format!("spawned {} #{} at {}", kind_symbol(piece.kind), piece.id.get(), coord(*at))
        }
        Event::BoardRejected { reason } => format!("board rejected: {reason}"),
        Event::InsertionRejected {
            player,
            direction,
            lane,
            reason,
        } => format!(
            "{} cannot insert {} {lane}: {reason}",
            player_label(*player),
            direction_label(*direction)
        ),
        Event::PieceEjected { piece, from } => format!(
            "ejected {} #{} from {}",
            kind_symbol(piece.kind),
            piece.id.get(),
            coord(*from)
        ),
        Event::PieceMoved { piece, from, to } => {
            format!("#{} moved {} -> {}", piece.get(), coord(*from), coord(*to))
        }
        Event::PieceInserted {
            piece,
            at,
            direction,
        } => format!(
            "inserted {} #{} at {} from {}",
            kind_symbol(piece.kind),
            piece.id.get(),
            coord(*at),
            direction_label(*direction)
        ),
        Event::PieceRemoved { piece, at } => format!(
            "removed {} #{} at {}",
            kind_symbol(piece.kind),
            piece.id.get(),
            coord(*at)
        ),
        Event::ScoreGained {
            player,
            amount,
            centroid,
        } => format!(
            "{} +{amount} around ({:.1},{:.1})",
            player_label(*player),
            centroid.x,
            centroid.y
        ),
        Event::CascadeStepCompleted {
            iteration,
            fell,
            removed,
        } => format!("cascade step {iteration}: fell={fell} removed={removed}"),
        Event::CascadeCapReached { iterations } => {
            format!("cascade stopped at the {iterations}-iteration cap")
        }
        Event::BoardStable { iterations } => format!("board stable after {iterations} iterations"),
        Event::TurnChanged { player } => format!("{} to move", player_label(*player)),
    }
}
