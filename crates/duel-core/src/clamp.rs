//! Power cap enforcement.
//!
//! Two-player actions can push a player's power above [`POWER_CAP`]. The
//! excess is cut off and debited from the owning team's score, so the score
//! never keeps credit for power a player is not allowed to hold.

use crate::effect::{Effect, ScoreCause, StateWriter};
use crate::entity::PlayerId;
use crate::scenario::Scenario;

/// Highest power a player may hold after an action.
pub const POWER_CAP: u32 = 1000;

pub(crate) fn clamp_power(writer: &mut StateWriter<'_>, player: PlayerId) {
    let power = writer.power(player);
    if power > POWER_CAP {
        let excess = i64::from(power - POWER_CAP);
        writer.adjust_score(player.team(), -excess, ScoreCause::Clamp);
        writer.set_power(player, POWER_CAP);
    }
}

/// Cap `player`'s power at [`POWER_CAP`], debiting the team by the excess.
///
/// Returns the applied effects: empty when the player was within the cap.
pub fn enforce_power_cap(scenario: &mut Scenario, player: PlayerId) -> Vec<Effect> {
    let mut writer = StateWriter::new(scenario);
    clamp_power(&mut writer, player);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TeamId;

    fn scenario(power: u32) -> (Scenario, PlayerId) {
        let mut s = Scenario::new();
        let t = s.add_team("Circe");
        let p = s.add_player(t, "Odysseus", 0, true).unwrap();
        s[p].set_power(power);
        s[t].adjust_score(i64::from(power));
        (s, p)
    }

    #[test]
    fn within_cap_is_untouched() {
        let (mut s, p) = scenario(POWER_CAP);
        assert!(enforce_power_cap(&mut s, p).is_empty());
        assert_eq!(s[p].power(), 1000);
        assert_eq!(s[TeamId(0)].score(), 1000);
    }

    #[test]
    fn excess_is_cut_and_debited() {
        let (mut s, p) = scenario(1450);
        let effects = enforce_power_cap(&mut s, p);

        assert_eq!(s[p].power(), 1000);
        assert_eq!(s[TeamId(0)].score(), 1000);
        assert_eq!(
            effects[0],
            Effect::ScoreAdjusted {
                team: TeamId(0),
                delta: -450,
                cause: ScoreCause::Clamp,
            }
        );
    }

    #[test]
    fn clamping_twice_is_a_no_op() {
        let (mut s, p) = scenario(2000);
        assert_eq!(enforce_power_cap(&mut s, p).len(), 2);
        assert!(enforce_power_cap(&mut s, p).is_empty());
        assert_eq!(s[TeamId(0)].score(), 1000);
    }
}
