//! Request generations for date-scoped loads.
//!
//! Each load takes a ticket; only a response carrying the latest ticket may
//! change the map.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Default, Clone)]
pub struct Generations {
    latest: u64,
}

impl Generations {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_is_current() {
        let mut g = Generations::default();
        let a = g.issue();
        assert!(g.is_current(a));
        let b = g.issue();
        assert!(!g.is_current(a));
        assert!(g.is_current(b));
        assert!(a < b);
    }
}
