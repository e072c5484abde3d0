use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::foundation::core::{Point, Player};

const ORTHOGONALS: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Outcome of [`BoardState::attempt_move`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveResult {
    /// Whether the move was legal and committed.
    pub accepted: bool,
    /// Points whose stones were removed by the move (empty when rejected).
    pub captured: BTreeSet<Point>,
}

impl MoveResult {
    fn rejected() -> Self {
        Self::default()
    }
}

/// Cheap position fingerprint: stones on the board per player.
type Fingerprint = (u32, u32);

/// Fixed-size grid simulator enforcing capture, self-capture and ko rules.
///
/// Rejected moves leave the state exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    width: u32,
    height: u32,
    cells: Vec<Option<Player>>,
    stones: [u32; 2],
    captured: [u32; 2],
    history: HashMap<Fingerprint, Vec<Vec<Option<Player>>>>,
    allow_self_capture: bool,
}

impl BoardState {
    /// Empty `width`×`height` board. Self-capture is forbidden unless enabled.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize) * (height as usize)],
            stones: [0; 2],
            captured: [0; 2],
            history: HashMap::new(),
            allow_self_capture: false,
        }
    }

    /// Allow multi-stone groups to capture themselves.
    pub fn with_self_capture(mut self, allow: bool) -> Self {
        self.allow_self_capture = allow;
        self
    }

    /// Board width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Board height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Owner of `p`, `None` for empty or out-of-grid points.
    pub fn get(&self, p: Point) -> Option<Player> {
        self.index(p).and_then(|i| self.cells[i])
    }

    /// Stones of `player` currently on the board.
    pub fn stone_count(&self, player: Player) -> u32 {
        self.stones[player.index()]
    }

    /// Stones of `player` removed by captures so far.
    pub fn captured_count(&self, player: Player) -> u32 {
        self.captured[player.index()]
    }

    /// Whether `p` lies inside the grid.
    pub fn contains(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }

    /// Mark `p` as owned by `player` without any legality check (setup placement).
    pub fn place_initial(&mut self, p: Point, player: Player) {
        let Some(i) = self.index(p) else {
            tracing::warn!(point = %p, "setup stone outside the board ignored");
            return;
        };
        if let Some(prev) = self.cells[i] {
            self.stones[prev.index()] -= 1;
        }
        self.cells[i] = Some(player);
        self.stones[player.index()] += 1;
    }

    /// Empty `p` regardless of its owner.
    pub fn clear(&mut self, p: Point) {
        let Some(i) = self.index(p) else {
            tracing::warn!(point = %p, "clear outside the board ignored");
            return;
        };
        if let Some(prev) = self.cells[i].take() {
            self.stones[prev.index()] -= 1;
        }
    }

    /// Whether `player` could legally play at `p` right now.
    pub fn is_legal(&self, p: Point, player: Player) -> bool {
        self.clone().attempt_move(p, player).accepted
    }

    /// Play a stone for `player` at `p`, resolving captures, self-capture and ko.
    pub fn attempt_move(&mut self, p: Point, player: Player) -> MoveResult {
        let Some(idx) = self.index(p) else {
            return MoveResult::rejected();
        };
        if self.cells[idx].is_some() {
            return MoveResult::rejected();
        }

        let before_cells = self.cells.clone();
        let before_stones = self.stones;
        let before_captured = self.captured;
        let before_fingerprint = self.fingerprint();

        self.cells[idx] = Some(player);
        self.stones[player.index()] += 1;

        let opponent = player.opponent();
        let mut captured = BTreeSet::new();
        let neighbors: Vec<Point> = self.neighbors(p).collect();
        for n in neighbors {
            if self.get(n) != Some(opponent) {
                continue;
            }
            let group = self.group_at(n);
            if self.liberty_count(&group) == 0 {
                self.remove_group(&group, opponent);
                captured.extend(group);
            }
        }
        let n_opponent_captured = captured.len();

        let own_group = self.group_at(p);
        let own_liberties = self.liberty_count(&own_group);
        let fragile = n_opponent_captured == 1 && own_group.len() == 1;

        if fragile {
            let seen = self
                .history
                .get(&self.fingerprint())
                .is_some_and(|prev| prev.iter().any(|cells| *cells == self.cells));
            if seen {
                tracing::debug!(point = %p, "ko repetition rejected");
                self.cells = before_cells;
                self.stones = before_stones;
                self.captured = before_captured;
                return MoveResult::rejected();
            }
        }

        if n_opponent_captured == 0 && own_liberties == 0 {
            if self.allow_self_capture && own_group.len() > 1 {
                self.remove_group(&own_group, player);
                captured.extend(own_group);
                return MoveResult {
                    accepted: true,
                    captured,
                };
            }
            tracing::debug!(point = %p, "self-capture rejected");
            self.cells = before_cells;
            self.stones = before_stones;
            self.captured = before_captured;
            return MoveResult::rejected();
        }

        if fragile && own_liberties == 1 {
            self.history
                .entry(before_fingerprint)
                .or_default()
                .push(before_cells);
        }

        MoveResult {
            accepted: true,
            captured,
        }
    }

    fn fingerprint(&self) -> Fingerprint {
        (self.stones[0], self.stones[1])
    }

    fn index(&self, p: Point) -> Option<usize> {
        self.contains(p)
            .then(|| (p.y as usize) * (self.width as usize) + p.x as usize)
    }

    fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        ORTHOGONALS.iter().filter_map(move |&(dx, dy)| {
            let x = i64::from(p.x) + dx;
            let y = i64::from(p.y) + dy;
            let in_grid =
                (0..i64::from(self.width)).contains(&x) && (0..i64::from(self.height)).contains(&y);
            in_grid.then(|| Point::new(x as u32, y as u32))
        })
    }

    /// Maximal same-owner orthogonally connected set containing `start`.
    fn group_at(&self, start: Point) -> Vec<Point> {
        let Some(owner) = self.get(start) else {
            return Vec::new();
        };
        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];
        let mut group = Vec::new();
        while let Some(p) = stack.pop() {
            let Some(i) = self.index(p) else { continue };
            if visited[i] || self.cells[i] != Some(owner) {
                continue;
            }
            visited[i] = true;
            group.push(p);
            stack.extend(self.neighbors(p));
        }
        group
    }

    fn liberty_count(&self, group: &[Point]) -> usize {
        let mut liberties = BTreeSet::new();
        for &p in group {
            for n in self.neighbors(p) {
                if self.get(n).is_none() {
                    liberties.insert(n);
                }
            }
        }
        liberties.len()
    }

    fn remove_group(&mut self, group: &[Point], owner: Player) {
        for &p in group {
            if let Some(i) = self.index(p) {
                self.cells[i] = None;
            }
        }
        let n = group.len() as u32;
        self.stones[owner.index()] -= n;
        self.captured[owner.index()] += n;
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = match self.get(Point::new(x, y)) {
                    None => '.',
                    Some(Player::Black) => 'X',
                    Some(Player::White) => 'O',
                };
                write!(f, "{c}")?;
                if x + 1 < self.width {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/board/state.rs"]
mod tests;
