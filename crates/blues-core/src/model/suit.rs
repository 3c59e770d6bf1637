use core::fmt;
use serde::{Deserialize, Serialize};

/// Colour groups. There is exactly one blue suit, four black and three red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Black,
    Red,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Blue, Color::Black, Color::Red];

    pub fn suits(self) -> impl Iterator<Item = Suit> {
        Suit::ALL.into_iter().filter(move |suit| suit.color() == self)
    }

    /// How many concrete cards of one rank carry this colour.
    pub const fn suit_count(self) -> u8 {
        match self {
            Color::Blue => 1,
            Color::Black => 4,
            Color::Red => 3,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Color::Blue => "B",
            Color::Black => "K",
            Color::Red => "R",
        };
        f.write_str(symbol)
    }
}

/// Suits are declared in ascending point weight, so the discriminant is the weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Blue = 0,
    Tilde = 1,
    Oval = 2,
    Spade = 3,
    Club = 4,
    Diamond = 5,
    Heart = 6,
    Wedge = 7,
}

impl Suit {
    pub const ALL: [Suit; 8] = [
        Suit::Blue,
        Suit::Tilde,
        Suit::Oval,
        Suit::Spade,
        Suit::Club,
        Suit::Diamond,
        Suit::Heart,
        Suit::Wedge,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Blue),
            1 => Some(Suit::Tilde),
            2 => Some(Suit::Oval),
            3 => Some(Suit::Spade),
            4 => Some(Suit::Club),
            5 => Some(Suit::Diamond),
            6 => Some(Suit::Heart),
            7 => Some(Suit::Wedge),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn weight(self) -> u8 {
        self as u8
    }

    pub const fn color(self) -> Color {
        match self {
            Suit::Blue => Color::Blue,
            Suit::Tilde | Suit::Oval | Suit::Spade | Suit::Club => Color::Black,
            Suit::Diamond | Suit::Heart | Suit::Wedge => Color::Red,
        }
    }

    pub const fn is_blue(self) -> bool {
        matches!(self, Suit::Blue)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Blue => "B",
            Suit::Tilde => "~",
            Suit::Oval => "⬯",
            Suit::Spade => "♠",
            Suit::Club => "♣",
            Suit::Diamond => "♦",
            Suit::Heart => "♥",
            Suit::Wedge => "≷",
        };
        f.write_str(symbol)
    }
}
