//! Lazy game tree
//!
//! The full tree of a game is far too large to build up front. Each move
//! holds a [`Lazy`] subtree instead: a one-shot producer that runs the first
//! time the move is applied and caches its position from then on.
//!
//! Memoization uses `Rc` and `RefCell` and is single-threaded. A parallel
//! search would need an `Arc`/`OnceLock` variant of [`Lazy`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::game::{Move, Position};

/// Shared handle to a move's successor position
pub type Subtree = Rc<Lazy<Position>>;

enum State<T> {
    Pending(Box<dyn FnOnce() -> T>),
    Forcing,
    Ready(Rc<T>),
}

/// Deferred, memoized value
pub struct Lazy<T> {
    state: RefCell<State<T>>,
}

impl<T> Lazy<T> {
    pub fn new(producer: impl FnOnce() -> T + 'static) -> Self {
        Self {
            state: RefCell::new(State::Pending(Box::new(producer))),
        }
    }

    /// Already-computed value
    pub fn ready(value: T) -> Self {
        Self {
            state: RefCell::new(State::Ready(Rc::new(value))),
        }
    }

    /// Run the producer on first call; afterwards return the cached value.
    ///
    /// Panics if the producer forces this same cell.
    pub fn force(&self) -> Rc<T> {
        {
            let state = self.state.borrow();
            if let State::Ready(value) = &*state {
                return Rc::clone(value);
            }
        }

        let producer = match self.state.replace(State::Forcing) {
            State::Pending(producer) => producer,
            State::Forcing => panic!("lazy value forced while it was being computed"),
            State::Ready(_) => unreachable!("ready state returned above"),
        };

        let value = Rc::new(producer());
        *self.state.borrow_mut() = State::Ready(Rc::clone(&value));
        value
    }

    pub fn is_forced(&self) -> bool {
        matches!(&*self.state.borrow(), State::Ready(_))
    }
}

impl<T> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.borrow() {
            State::Pending(_) => "pending",
            State::Forcing => "forcing",
            State::Ready(_) => "ready",
        };
        f.debug_tuple("Lazy").field(&state).finish()
    }
}

/// View of `position` that stops `depth` moves below it.
///
/// Positions at the limit keep their board but show no moves, and are marked
/// as cut off so they are not mistaken for finished games. Nothing in the
/// underlying tree is computed until the view itself is explored; subtrees
/// the view forces are cached in the underlying tree too.
pub fn limit_depth(position: &Position, depth: usize) -> Position {
    if depth == 0 {
        return Position {
            config: position.config,
            player: position.player,
            board: position.board.clone(),
            moves: Vec::new(),
            cut_off: position.cut_off || !position.moves.is_empty(),
        };
    }

    let moves = position
        .moves
        .iter()
        .map(|mv| {
            let underlying = Rc::clone(&mv.next);
            let next = Lazy::new(move || limit_depth(&underlying.force(), depth - 1));
            Move::new(mv.label, Rc::new(next))
        })
        .collect();

    Position {
        config: position.config,
        player: position.player,
        board: position.board.clone(),
        moves,
        cut_off: position.cut_off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Hex, Player};
    use crate::config::GameConfig;
    use std::cell::Cell;

    fn sample() -> Position {
        let config = GameConfig::default();
        let cells = [(0, 3), (1, 1), (0, 2), (1, 1)]
            .iter()
            .map(|&(p, d)| Hex::new(Player(p), d))
            .collect();
        Position::root(config, Board::from_cells(&config, cells))
    }

    #[test]
    fn test_lazy_runs_producer_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let lazy = Lazy::new(move || {
            counter.set(counter.get() + 1);
            vec![1, 2, 3]
        });

        assert!(!lazy.is_forced());
        assert_eq!(calls.get(), 0);

        let first = lazy.force();
        let second = lazy.force();
        assert!(lazy.is_forced());
        assert_eq!(calls.get(), 1);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*first, vec![1, 2, 3]);
    }

    #[test]
    fn test_lazy_ready() {
        let lazy = Lazy::ready(7);
        assert!(lazy.is_forced());
        assert_eq!(*lazy.force(), 7);
        assert_eq!(format!("{:?}", lazy), "Lazy(\"ready\")");
    }

    #[test]
    fn test_move_memoizes_position() {
        let position = sample();
        let a = position.moves()[0].apply();
        let b = position.moves()[0].apply();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_depth_zero_hides_moves() {
        let position = sample();
        let view = limit_depth(&position, 0);
        assert!(view.moves().is_empty());
        assert!(view.is_cut_off());
        assert!(!view.is_terminal());
        assert_eq!(view.board(), position.board());
        assert_eq!(view.player(), position.player());
    }

    #[test]
    fn test_depth_zero_keeps_real_terminal() {
        let config = GameConfig::default();
        let cells = vec![Hex::new(Player(1), 2); 4];
        let position = Position::root(config, Board::from_cells(&config, cells));
        let view = limit_depth(&position, 0);
        assert!(view.is_terminal());
        assert!(!view.is_cut_off());
    }

    #[test]
    fn test_view_is_lazy_and_shares_underlying_tree() {
        let position = sample();
        let view = limit_depth(&position, 2);

        assert_eq!(view.moves().len(), position.moves().len());
        assert!(position.moves().iter().all(|m| !m.is_applied()));

        let child = view.moves()[0].apply();
        // Forcing the view forced the real move as well
        assert!(position.moves()[0].is_applied());
        assert_eq!(child.board(), position.moves()[0].apply().board());
        assert_eq!(child.moves().len(), position.moves()[0].apply().moves().len());

        // 1 -> 3 leaves A with only a pass, hidden by the limit
        let grandchild = child.moves()[1].apply();
        assert!(grandchild.moves().is_empty());
        assert!(grandchild.is_cut_off());

        // Passing hands B a turn with no attacks: a real game end
        let finished = child.moves()[0].apply();
        assert!(finished.moves().is_empty());
        assert!(finished.is_terminal());
    }

    #[test]
    fn test_view_labels_match() {
        let position = sample();
        let view = limit_depth(&position, 1);
        let real: Vec<_> = position.moves().iter().map(Move::label).collect();
        let seen: Vec<_> = view.moves().iter().map(Move::label).collect();
        assert_eq!(real, seen);
    }
}
