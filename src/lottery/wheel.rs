// ephemeral seat distribution for one draw: player tickets spread evenly
// around the rim, the configured number of empty seats filling the gaps,
// one uniform pick over the whole rim deciding the outcome
#[derive(Debug, Clone)]
pub struct Wheel {
    seats: Vec<Option<String>>,
}

impl Wheel {
    /// Lay out `tickets.len() + losing` seats with the player tickets at
    /// even intervals, probing forward on collision. Empty seats lose.
    pub fn deal(tickets: &[String], losing: usize) -> Self {
        let players = tickets.len();
        let total = players + losing;
        let mut seats: Vec<Option<String>> = vec![None; total];
        if players == 0 {
            return Self { seats };
        }
        let step = total as f64 / players as f64;
        let mut acc = 0f64;
        for ticket in tickets {
            let mut idx = (acc.round() as usize).min(total - 1);
            while seats[idx].is_some() {
                idx = (idx + 1) % total;
            }
            seats[idx] = Some(ticket.clone());
            acc += step;
        }
        Self { seats }
    }

    /// Uniform pick over every seat; `None` is a losing seat. Callers must
    /// not spin an empty wheel; check [`Wheel::is_empty`] first.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        let idx = rng.random_range(0..self.seats.len());
        self.seats[idx].as_deref()
    }

    pub fn seats(&self) -> &[Option<String>] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

impl Display for Wheel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let rim = self
            .seats
            .iter()
            .map(|seat| seat.as_deref().unwrap_or("·"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "({})", rim)
    }
}

use rand::Rng;
use std::fmt::Display;
