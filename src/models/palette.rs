use serde::Serialize;

/// Card styling tuple: card background, card border, and the hex (no `#`)
/// fed to the avatar service as the initials background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardColor {
    pub bg: &'static str,
    pub border: &'static str,
    pub avatar: &'static str,
}

pub const CARD_COLORS: [CardColor; 12] = [
    CardColor { bg: "#1a1a2e", border: "#4a4a6a", avatar: "4a4a6a" }, // Deep Navy
    CardColor { bg: "#1e3a2f", border: "#3d7a5f", avatar: "3d7a5f" }, // Forest Green
    CardColor { bg: "#2d1b3d", border: "#6b3d8a", avatar: "6b3d8a" }, // Royal Purple
    CardColor { bg: "#3d2b1b", border: "#8a6b3d", avatar: "8a6b3d" }, // Warm Brown
    CardColor { bg: "#1b2d3d", border: "#3d6b8a", avatar: "3d6b8a" }, // Ocean Blue
    CardColor { bg: "#3d1b2d", border: "#8a3d6b", avatar: "8a3d6b" }, // Berry Pink
    CardColor { bg: "#2d3d1b", border: "#6b8a3d", avatar: "6b8a3d" }, // Olive Green
    CardColor { bg: "#3d2d2d", border: "#8a5a5a", avatar: "8a5a5a" }, // Dusty Rose
    CardColor { bg: "#1a2e2e", border: "#00c9c8", avatar: "00c9c8" }, // Cyan Teal
    CardColor { bg: "#2e1a2e", border: "#ff6b9d", avatar: "ff6b9d" }, // Hot Pink
    CardColor { bg: "#2e2e1a", border: "#ffd93d", avatar: "ffd93d" }, // Golden Yellow
    CardColor { bg: "#1a2e1a", border: "#6bcb77", avatar: "6bcb77" }, // Fresh Green
];

impl CardColor {
    /// Color for the card at the given list position. Wraps around the
    /// palette so adjacent cards never share a color.
    pub fn pick(index: usize) -> CardColor {
        CARD_COLORS[index % CARD_COLORS.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_wraps_around_the_palette() {
        for i in 0..CARD_COLORS.len() {
            assert_eq!(CardColor::pick(i), CardColor::pick(i + CARD_COLORS.len()));
        }
    }

    #[test]
    fn adjacent_positions_never_collide() {
        for i in 0..(CARD_COLORS.len() * 2) {
            assert_ne!(CardColor::pick(i), CardColor::pick(i + 1));
        }
    }

    #[test]
    fn palette_entries_are_distinct() {
        for (i, a) in CARD_COLORS.iter().enumerate() {
            for b in &CARD_COLORS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
