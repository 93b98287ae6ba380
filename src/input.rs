/*!
Digital input abstraction with edge polling.

Behavior:
- Buttons are represented as a bitmask: Up (bit 0), Down (bit 1).
- A frontend feeds the live button state via `set_button`/`set_state_mask`.
- `poll` compares the live state against the snapshot taken by the previous
  poll and returns which buttons transitioned to pressed and which to
  released since then. Holding a button therefore produces a pressed edge
  exactly once, and the game's paddle-velocity logic reacts to edges, not
  levels.

This mirrors the scan-then-diff contract of handheld key hardware: one scan
per tick, with "went down" and "went up" masks derived from consecutive
scans.
*/

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
}

impl Button {
    #[inline]
    fn mask(self) -> u8 {
        match self {
            Button::Up => 1 << 0,
            Button::Down => 1 << 1,
        }
    }
}

/// Pressed/released transition masks for one poll.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    pressed: u8,
    released: u8,
}

impl Edges {
    /// Did this button transition to pressed since the previous poll?
    #[inline]
    pub fn just_pressed(&self, button: Button) -> bool {
        self.pressed & button.mask() != 0
    }

    /// Did this button transition to released since the previous poll?
    #[inline]
    pub fn just_released(&self, button: Button) -> bool {
        self.released & button.mask() != 0
    }
}

/// Latches live button state and derives per-tick edges.
#[derive(Clone, Debug, Default)]
pub struct InputPort {
    // Live button states. Bit set = held.
    current: u8,
    // Snapshot taken by the previous poll.
    previous: u8,
}

impl InputPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a button's live state.
    pub fn set_button(&mut self, button: Button, held: bool) {
        if held {
            self.current |= button.mask();
        } else {
            self.current &= !button.mask();
        }
    }

    /// Replace the entire live state with the provided mask.
    pub fn set_state_mask(&mut self, mask: u8) {
        self.current = mask;
    }

    /// Is the button held right now (level, not edge)?
    #[inline]
    pub fn held(&self, button: Button) -> bool {
        self.current & button.mask() != 0
    }

    /// Diff the live state against the previous poll's snapshot.
    pub fn poll(&mut self) -> Edges {
        let edges = Edges {
            pressed: self.current & !self.previous,
            released: self.previous & !self.current,
        };
        self.previous = self.current;
        edges
    }
}
