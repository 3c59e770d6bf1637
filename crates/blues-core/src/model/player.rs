use core::fmt;
use serde::{Deserialize, Serialize};

pub const SEAT_COUNT: usize = 4;

/// Seating position; seat order is also the order of pond collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
}

impl Seat {
    pub const LOOP: [Seat; SEAT_COUNT] = [Seat::One, Seat::Two, Seat::Three, Seat::Four];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::One),
            1 => Some(Seat::Two),
            2 => Some(Seat::Three),
            3 => Some(Seat::Four),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::Three,
            Seat::Three => Seat::Four,
            Seat::Four => Seat::One,
        }
    }

    pub fn others(self) -> impl Iterator<Item = Seat> {
        Seat::LOOP.into_iter().filter(move |seat| *seat != self)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.index() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::Seat;

    #[test]
    fn next_wraps_around() {
        assert_eq!(Seat::Four.next(), Seat::One);
    }

    #[test]
    fn others_excludes_self() {
        let others: Vec<_> = Seat::Two.others().collect();
        assert_eq!(others, vec![Seat::One, Seat::Three, Seat::Four]);
    }

    #[test]
    fn index_roundtrip_and_labels() {
        for (i, seat) in Seat::LOOP.iter().enumerate() {
            assert_eq!(Seat::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
        }
        assert_eq!(Seat::One.to_string(), "P1");
    }
}
