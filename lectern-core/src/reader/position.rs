//! Pure pagination state: which verse of which chapter is current, and where
//! a page turn leads

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a page turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// `+1` or `-1`
    pub fn delta(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward" | "next" | "+1" | "1" => Ok(Direction::Forward),
            "backward" | "back" | "previous" | "prev" | "-1" => Ok(Direction::Backward),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Reading position: chapter number and 1-based verse index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub chapter: u32,
    pub verse: u32,
}

impl Position {
    pub fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

/// Verse to select once a chapter's verses are loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseTarget {
    First,
    Last,
    Index(u32),
}

impl VerseTarget {
    /// Resolve against a verse count; an empty chapter resolves to 1
    pub fn resolve(self, count: u32) -> u32 {
        let max = count.max(1);
        match self {
            VerseTarget::First => 1,
            VerseTarget::Last => max,
            VerseTarget::Index(index) => index.clamp(1, max),
        }
    }
}

/// What a page turn does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Move to another verse of the loaded chapter
    Within(u32),
    /// Load another chapter and select `target` in it
    Chapter { chapter: u32, target: VerseTarget },
    /// Backward from the first verse of the first chapter
    StartOfText,
    /// Forward from the last verse of the last chapter
    EndOfText,
    /// Nothing is loaded to turn through
    NoVerses,
}

/// Position within a text plus the bounds needed to plan turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    chapter: u32,
    verse_index: u32,
    verse_count: u32,
    last_chapter: u32,
}

impl Pagination {
    /// Start at verse 1 of `chapter` with nothing loaded yet
    pub fn new(chapter: u32, last_chapter: u32) -> Self {
        let last_chapter = last_chapter.max(1);
        Self {
            chapter: chapter.clamp(1, last_chapter),
            verse_index: 1,
            verse_count: 0,
            last_chapter,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.chapter, self.verse_index)
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse_index(&self) -> u32 {
        self.verse_index
    }

    pub fn verse_count(&self) -> u32 {
        self.verse_count
    }

    pub fn last_chapter(&self) -> u32 {
        self.last_chapter
    }

    /// Clamp a requested chapter into the text
    pub fn clamp_chapter(&self, chapter: u32) -> u32 {
        chapter.clamp(1, self.last_chapter)
    }

    /// Where a turn in `direction` leads from the current position
    pub fn plan_turn(&self, direction: Direction) -> Step {
        if self.verse_count == 0 {
            return Step::NoVerses;
        }

        match direction {
            Direction::Forward if self.verse_index >= self.verse_count => {
                if self.chapter < self.last_chapter {
                    Step::Chapter {
                        chapter: self.chapter + 1,
                        target: VerseTarget::First,
                    }
                } else {
                    Step::EndOfText
                }
            }
            Direction::Backward if self.verse_index <= 1 => {
                if self.chapter > 1 {
                    Step::Chapter {
                        chapter: self.chapter - 1,
                        target: VerseTarget::Last,
                    }
                } else {
                    Step::StartOfText
                }
            }
            _ => {
                let next = (self.verse_index as i64 + direction.delta())
                    .clamp(1, self.verse_count as i64);
                Step::Within(next as u32)
            }
        }
    }

    /// Select a verse of the loaded chapter, clamped into range
    pub fn select(&mut self, target: VerseTarget) {
        self.verse_index = target.resolve(self.verse_count);
    }

    /// Install a freshly loaded chapter and re-clamp the verse index
    pub fn install(&mut self, chapter: u32, verse_count: u32, target: VerseTarget) {
        self.chapter = self.clamp_chapter(chapter);
        self.verse_count = verse_count;
        self.select(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(chapter: u32, verse: u32, count: u32, last: u32) -> Pagination {
        let mut p = Pagination::new(chapter, last);
        p.install(chapter, count, VerseTarget::Index(verse));
        p
    }

    #[test]
    fn test_forward_crosses_chapter() {
        let p = loaded(2, 5, 5, 114);
        assert_eq!(
            p.plan_turn(Direction::Forward),
            Step::Chapter {
                chapter: 3,
                target: VerseTarget::First
            }
        );
    }

    #[test]
    fn test_backward_crosses_to_last_verse() {
        let p = loaded(3, 1, 10, 114);
        assert_eq!(
            p.plan_turn(Direction::Backward),
            Step::Chapter {
                chapter: 2,
                target: VerseTarget::Last
            }
        );
    }

    #[test]
    fn test_bounds_of_text() {
        assert_eq!(loaded(1, 1, 7, 114).plan_turn(Direction::Backward), Step::StartOfText);
        assert_eq!(loaded(114, 6, 6, 114).plan_turn(Direction::Forward), Step::EndOfText);
        assert_eq!(Pagination::new(1, 5).plan_turn(Direction::Forward), Step::NoVerses);
    }

    #[test]
    fn test_within_chapter() {
        assert_eq!(loaded(1, 3, 7, 114).plan_turn(Direction::Forward), Step::Within(4));
        assert_eq!(loaded(1, 3, 7, 114).plan_turn(Direction::Backward), Step::Within(2));
    }

    #[test]
    fn test_install_reclamps() {
        let mut p = loaded(1, 99, 7, 114);
        assert_eq!(p.verse_index(), 7);

        p.install(2, 286, VerseTarget::Last);
        assert_eq!(p.position(), Position::new(2, 286));

        p.install(3, 0, VerseTarget::Last);
        assert_eq!(p.verse_index(), 1);
        assert_eq!(p.verse_count(), 0);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("next".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!("-1".parse::<Direction>().unwrap(), Direction::Backward);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
