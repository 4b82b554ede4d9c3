use pose::Person;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    Absent,
    Confirming,
    Present,
}

/// Hysteresis over per-frame pose scores.
///
/// A single confident frame does not start a round, and a single missed
/// frame does not end one: entry requires `confirm_threshold` consecutive
/// confident frames, exit requires `exit_threshold` consecutive misses.
/// Collisions should only be applied while the state is `Present`.
pub struct PresenceTracker {
    state: PresenceState,
    min_pose_score: f32,
    confirm_threshold: u32,
    exit_threshold: u32,
    confirm_count: u32,
    miss_count: u32,
}

impl PresenceTracker {
    pub fn new(min_pose_score: f32, confirm_threshold: u32, exit_threshold: u32) -> Self {
        Self {
            state: PresenceState::Absent,
            min_pose_score,
            confirm_threshold,
            exit_threshold,
            confirm_count: 0,
            miss_count: 0,
        }
    }

    pub fn state(&self) -> PresenceState {
        self.state
    }

    pub fn is_present(&self) -> bool {
        self.state == PresenceState::Present
    }

    /// Feed one frame's result; `None` means no pose was decoded this tick.
    /// Returns the new state if it changed.
    pub fn update(&mut self, pose: Option<&Person>) -> Option<PresenceState> {
        let confident = pose.is_some_and(|p| p.score >= self.min_pose_score);
        let old_state = self.state;

        match self.state {
            PresenceState::Absent => {
                if confident {
                    self.state = PresenceState::Confirming;
                    self.confirm_count = 1;
                    self.miss_count = 0;
                }
            }
            PresenceState::Confirming => {
                if confident {
                    self.confirm_count += 1;
                    if self.confirm_count >= self.confirm_threshold {
                        self.state = PresenceState::Present;
                        self.miss_count = 0;
                    }
                } else {
                    self.state = PresenceState::Absent;
                    self.confirm_count = 0;
                }
            }
            PresenceState::Present => {
                if confident {
                    self.miss_count = 0;
                } else {
                    self.miss_count += 1;
                    if self.miss_count >= self.exit_threshold {
                        self.state = PresenceState::Absent;
                        self.confirm_count = 0;
                        self.miss_count = 0;
                    }
                }
            }
        }

        if old_state != self.state {
            tracing::debug!(from = ?old_state, to = ?self.state, "Presence changed");
            Some(self.state)
        } else {
            None
        }
    }
}
