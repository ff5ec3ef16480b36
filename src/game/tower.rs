//! Tower model.
//!
//! A tower is a stack of levels, each level holding up to three blocks laid side by
//! side. A level stands as long as its middle block is in place or both edge blocks
//! are.

use std::{fmt, ops::Range};

/// Number of block slots in a level.
pub const SLOTS: usize = 3;

/// Position of a block inside its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Left,
    Middle,
    Right,
}

impl Slot {
    const ALL: [Slot; SLOTS] = [Slot::Left, Slot::Middle, Slot::Right];

    fn index(&self) -> usize {
        match self {
            Slot::Left => 0,
            Slot::Middle => 1,
            Slot::Right => 2,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Left => write!(f, "left"),
            Slot::Middle => write!(f, "middle"),
            Slot::Right => write!(f, "right"),
        }
    }
}

/// One level of the tower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    blocks: [bool; SLOTS],
}

impl Level {
    /// A level with all three blocks.
    pub fn full() -> Self {
        Level {
            blocks: [true; SLOTS],
        }
    }

    /// A level without blocks.
    pub fn empty() -> Self {
        Level {
            blocks: [false; SLOTS],
        }
    }

    pub fn has(&self, slot: Slot) -> bool {
        self.blocks[slot.index()]
    }

    pub fn count(&self) -> usize {
        self.blocks.iter().filter(|block| **block).count()
    }

    pub fn is_complete(&self) -> bool {
        self.count() == SLOTS
    }

    pub fn is_stable(&self) -> bool {
        self.has(Slot::Middle) || (self.has(Slot::Left) && self.has(Slot::Right))
    }

    /// Returns whether the level would still stand without the block at `slot`.
    fn stands_without(&self, slot: Slot) -> bool {
        let mut level = self.clone();
        level.blocks[slot.index()] = false;
        level.is_stable()
    }
}

/// A block position in the tower. Levels are numbered from the ground, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub level: usize,
    pub slot: Slot,
}

/// The tower being played.
#[derive(Debug, Clone)]
pub struct Tower {
    /// Levels from the ground up
    levels: Vec<Level>,
    /// A block has been pulled and not placed yet
    holding: bool,
    /// Pulls and placements made so far
    moves: u32,
}

impl Tower {
    /// Builds a tower of `height` complete levels (at least one).
    pub fn new(height: usize) -> Self {
        Tower {
            levels: vec![Level::full(); height.max(1)],
            holding: false,
            moves: 0,
        }
    }

    pub fn height(&self) -> usize {
        self.levels.len()
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    #[cfg(test)]
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Blocks missing from the levels below the top one.
    pub fn missing_blocks(&self) -> usize {
        let below_top = self.levels.len().saturating_sub(1);
        self.levels[..below_top]
            .iter()
            .map(|level| SLOTS - level.count())
            .sum()
    }

    /// Blocks that may be pulled and leave their level standing.
    pub fn safe_pulls(&self) -> Vec<Position> {
        self.pullable()
            .filter(|position| self.levels[position.level].stands_without(position.slot))
            .collect()
    }

    /// Blocks that may be pulled but bring their level down.
    pub fn risky_pulls(&self) -> Vec<Position> {
        self.pullable()
            .filter(|position| !self.levels[position.level].stands_without(position.slot))
            .collect()
    }

    /// Removes the block at `position` and puts it in hand.
    ///
    /// Returns whether the level still stands.
    pub fn pull(&mut self, position: Position) -> bool {
        let level = &mut self.levels[position.level];
        level.blocks[position.slot.index()] = false;

        self.holding = true;
        self.moves += 1;

        level.is_stable()
    }

    /// Puts the held block on top of the tower and returns its position.
    ///
    /// A complete top level gets a new level above it; otherwise the block goes in
    /// the first free slot of the top level.
    pub fn place(&mut self) -> Position {
        if self.levels.last().is_none_or(Level::is_complete) {
            self.levels.push(Level::empty());
        }

        let level = self.levels.len() - 1;
        let top = &mut self.levels[level];
        let slot = Slot::ALL
            .into_iter()
            .find(|slot| !top.has(*slot))
            .unwrap_or(Slot::Left);
        top.blocks[slot.index()] = true;

        self.holding = false;
        self.moves += 1;

        Position { level, slot }
    }

    /// Levels blocks can be pulled from: everything below the top level, and below
    /// the level under it when the top is still being built.
    fn pullable_levels(&self) -> Range<usize> {
        let top = self.levels.len() - 1;
        if self.levels[top].is_complete() {
            0..top
        } else {
            0..top.saturating_sub(1)
        }
    }

    fn pullable(&self) -> impl Iterator<Item = Position> + '_ {
        self.pullable_levels().flat_map(move |level| {
            Slot::ALL
                .into_iter()
                .filter(move |slot| self.levels[level].has(*slot))
                .map(move |slot| Position { level, slot })
        })
    }
}
