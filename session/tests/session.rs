use std::{cell::RefCell, rc::Rc};

use lane_cascade_core::{
    BoardLayout, Cell, Direction, Event, InsertionError, PieceKind, Player,
};
use lane_cascade_session::{Session, SessionConfig};
use lane_cascade_world::Rules;

fn empty_session(config: SessionConfig) -> Session {
    let layout = BoardLayout::empty(config.board_size).expect("valid size");
    Session::from_layout(config, layout).expect("valid layout")
}

#[test]
fn subscribers_see_each_event_in_subscription_order() {
    let mut session = empty_session(SessionConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    for name in ["audio", "animation", "score-ui"] {
        let seen = Rc::clone(&seen);
        session.subscribe(Box::new(move |event: &Event| {
            seen.borrow_mut().push((name, event.clone()));
        }));
    }

    let events = session
        .request_insert(Direction::Up, 2)
        .expect("legal insertion");

    let seen = seen.borrow();
    assert_eq!(seen.len(), events.len() * 3);
    for (index, event) in events.iter().enumerate() {
        let names: Vec<&str> = seen[index * 3..index * 3 + 3]
            .iter()
            .map(|(name, seen_event)| {
                assert_eq!(seen_event, event);
                *name
            })
            .collect();
        assert_eq!(names, ["audio", "animation", "score-ui"]);
    }
}

#[test]
fn settled_insertion_rotates_turn_and_redraws_pending_piece() {
    let mut session = empty_session(SessionConfig {
        seed: 11,
        ..SessionConfig::default()
    });
    let pending = session.pending();

    let events = session
        .request_insert(Direction::Left, 0)
        .expect("legal insertion");

    assert!(events.contains(&Event::TurnChanged {
        player: Player::Two,
    }));
    assert_eq!(session.active_player(), Player::Two);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::PieceInserted { piece, .. } if piece.kind == pending
    )));
}

#[test]
fn rejected_insertion_reports_reason_and_keeps_turn() {
    let mut session = empty_session(SessionConfig::default());
    let pending = session.pending();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.subscribe(Box::new(move |event: &Event| {
        sink.borrow_mut().push(event.clone());
    }));

    let result = session.request_insert(Direction::Down, 1);

    assert_eq!(
        result,
        Err(InsertionError::UnsupportedDirection(Direction::Down))
    );
    assert_eq!(session.active_player(), Player::One);
    assert_eq!(session.pending(), pending);
    assert!(matches!(
        seen.borrow().as_slice(),
        [Event::InsertionRejected { .. }]
    ));
}

#[test]
fn cleared_run_is_credited_to_the_inserting_player() {
    let config = SessionConfig {
        board_size: 3,
        kinds: 2,
        seed: 5,
        rules: Rules {
            points_per_piece: 25,
            ..Rules::default()
        },
        rotate_on_stable: false,
    };
    let reference = empty_session(config);
    let pending = reference.pending();
    let other = PieceKind::new(1 - pending.get());
    // Row zero holds two pieces of the pending kind; dropping a third completes it.
    let layout = BoardLayout::from_fn(3, |coord| match (coord.column(), coord.row()) {
        (0, 0) | (1, 0) => Cell::Occupied(pending),
        (0, 1) => Cell::Occupied(other),
        _ => Cell::Empty,
    })
    .expect("valid layout");
    let mut session = Session::from_layout(config, layout).expect("valid layout");

    let _ = session
        .request_insert(Direction::Up, 2)
        .expect("legal insertion");

    assert_eq!(session.scoreboard().total(Player::One), 75);
    assert_eq!(session.scoreboard().total(Player::Two), 0);
    assert_eq!(session.active_player(), Player::One);
}

#[test]
fn same_seed_replays_identically() {
    let play = || {
        let mut session = Session::new(SessionConfig {
            seed: 99,
            ..SessionConfig::default()
        })
        .expect("valid config");
        let mut stream = session.opening_events().to_vec();
        for (direction, lane) in [
            (Direction::Left, 1),
            (Direction::Up, 3),
            (Direction::Right, 4),
            (Direction::Up, 0),
        ] {
            if let Ok(events) = session.request_insert(direction, lane) {
                stream.extend(events);
            }
        }
        (stream, session.scoreboard().total(Player::One))
    };

    assert_eq!(play(), play());
}
