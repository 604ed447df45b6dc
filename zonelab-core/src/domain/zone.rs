//! Price bands that arm an entry: the ladder's entry zone and the psychological box.

use serde::{Deserialize, Serialize};

use super::position::Side;

/// Entry zone anchored on the level the previous crossing bar went through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryZone {
    pub top: f64,
    pub bottom: f64,
    /// The active level the zone is centred on.
    pub mid: f64,
    pub created_bar: usize,
    pub expiry_bar: usize,
    /// `None` until the zone is armed for a side.
    pub activation: Option<Side>,
}

impl EntryZone {
    pub fn around(level: f64, half_width: f64, created_bar: usize, lifetime: usize) -> Self {
        Self {
            top: level + half_width,
            bottom: level - half_width,
            mid: level,
            created_bar,
            expiry_bar: created_bar.saturating_add(lifetime),
            activation: None,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activation.is_some()
    }

    pub fn is_expired_at(&self, bar_index: usize) -> bool {
        bar_index >= self.expiry_bar
    }

    /// The edge a position on `side` is anchored at: top for long, bottom for short.
    pub fn edge(&self, side: Side) -> f64 {
        match side {
            Side::Long => self.top,
            Side::Short => self.bottom,
        }
    }
}

/// Box around a psychological (round-number) level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsychBox {
    pub mid: f64,
    pub top: f64,
    pub bottom: f64,
    /// Break direction; kept after a retest or reverse clears `broken`.
    pub bias: Option<Side>,
    pub broken: bool,
}

impl PsychBox {
    pub fn around(mid: f64, half_width: f64, bias: Option<Side>, broken: bool) -> Self {
        Self {
            mid,
            top: mid + half_width,
            bottom: mid - half_width,
            bias,
            broken,
        }
    }

    pub fn is_bull(&self) -> Option<bool> {
        self.bias.map(Side::is_long)
    }

    /// Zone of action line for a trade in `side`: top for long, bottom for short.
    pub fn action_line(&self, side: Side) -> f64 {
        match side {
            Side::Long => self.top,
            Side::Short => self.bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_zone_expiry_saturates() {
        let zone = EntryZone::around(20.0, 0.5, 7, usize::MAX);
        assert_eq!(zone.expiry_bar, usize::MAX);
        assert!(!zone.is_expired_at(8));
    }

    #[test]
    fn entry_zone_expiry_is_inclusive() {
        let zone = EntryZone::around(20.0, 0.5, 10, 40);
        assert_eq!(zone.top, 20.5);
        assert_eq!(zone.bottom, 19.5);
        assert_eq!(zone.expiry_bar, 50);
        assert!(!zone.is_expired_at(49));
        assert!(zone.is_expired_at(50));
        assert!(!zone.is_activated());
    }

    #[test]
    fn entry_zone_edges() {
        let zone = EntryZone::around(20.0, 0.5, 0, 1);
        assert_eq!(zone.edge(Side::Long), 20.5);
        assert_eq!(zone.edge(Side::Short), 19.5);
    }

    #[test]
    fn psych_box_bias() {
        let b = PsychBox::around(2000.0, 0.5, Some(Side::Long), true);
        assert_eq!(b.is_bull(), Some(true));
        assert_eq!(b.action_line(Side::Long), 2000.5);
        assert_eq!(b.action_line(Side::Short), 1999.5);
        assert_eq!(PsychBox::around(5.0, 0.5, None, false).is_bull(), None);
    }
}
