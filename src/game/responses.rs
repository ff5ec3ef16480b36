//! Chat texts of the game outcomes.
//!
//! Texts describing what the player did start with `"You "`; the dispatcher swaps
//! that word for the player's name.

use crate::game::tower::Slot;

pub fn format_started(height: usize) -> String {
    format!("You start a new game of Jenga. The tower stands {height} levels tall.")
}

pub fn format_reset(height: usize) -> String {
    format!("You reset the game. A fresh tower of {height} levels is ready.")
}

pub fn format_already_running(height: usize, moves: u32) -> String {
    format!(
        "A game is already in progress: {height} levels after {moves} moves. Type `!resetjenga` to start over."
    )
}

pub fn format_no_game() -> String {
    "There is no game in progress. Type `!startjenga` to begin.".to_owned()
}

pub fn format_already_holding() -> String {
    "You are already holding a block. Type `!placeblock` to put it on top.".to_owned()
}

pub fn format_not_holding() -> String {
    "You have no block in hand. Type `!pullblock` first.".to_owned()
}

pub fn format_nothing_to_pull(height: usize) -> String {
    format!(
        "No block can be pulled from a tower of {height} levels. Type `!resetjenga` to start over."
    )
}

/// Level numbers are shown counting from 1 at the ground.
pub fn format_pulled(level: usize, slot: Slot, height: usize) -> String {
    format!(
        "You carefully pull the {slot} block from level {}. The tower wobbles but holds at {height} levels.",
        level + 1
    )
}

pub fn format_pull_collapse(level: usize, slot: Slot, moves: u32) -> String {
    format!(
        "You pull the {slot} block from level {} and the tower comes crashing down! Game over after {moves} moves. Type `!startjenga` to play again.",
        level + 1
    )
}

pub fn format_placed(level: usize, height: usize) -> String {
    format!(
        "You place the block on level {}. The tower now stands {height} levels tall.",
        level + 1
    )
}

pub fn format_place_collapse(level: usize, moves: u32) -> String {
    format!(
        "You place the block on level {} and the whole tower topples over! Game over after {moves} moves. Type `!startjenga` to play again.",
        level + 1
    )
}
