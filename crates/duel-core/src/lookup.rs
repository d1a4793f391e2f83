//! Name resolution over a [`Scenario`].
//!
//! Lookup is a read-only view: it scans the live team/member lists every time,
//! so renames and absorptions performed by `super` are reflected immediately.

use crate::entity::PlayerId;
use crate::scenario::Scenario;
use crate::DuelError;

impl Scenario {
    /// Find a player by exact name.
    ///
    /// Scans teams in creation order, then members in insertion order, and
    /// returns the first match. An empty `name` never matches, so absorbed
    /// players are unreachable.
    pub fn find_player(&self, name: &str) -> Option<PlayerId> {
        if name.is_empty() {
            return None;
        }
        self.players()
            .find(|(_, player)| player.name() == name)
            .map(|(id, _)| id)
    }

    /// Like [`find_player`](Self::find_player), but a missing name is a
    /// [`DuelError::UnknownPlayer`].
    pub fn resolve_player(&self, name: &str) -> Result<PlayerId, DuelError> {
        self.find_player(name).ok_or_else(|| DuelError::UnknownPlayer {
            name: name.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::TeamId;
    use crate::scenario::Scenario;
    use crate::DuelError;

    fn scenario() -> Scenario {
        let mut s = Scenario::new();
        let t0 = s.add_team("Merlin");
        let t1 = s.add_team("Morgana");
        s.add_player(t0, "Arthur", 100, true).unwrap();
        s.add_player(t0, "Lancelot", 90, true).unwrap();
        s.add_player(t1, "Mordred", 80, true).unwrap();
        s
    }

    #[test]
    fn finds_players_across_teams() {
        let s = scenario();
        let id = s.find_player("Mordred").unwrap();
        assert_eq!(id.team(), TeamId(1));
        assert_eq!(id.slot(), 0);
        assert_eq!(s.find_player("Lancelot").unwrap().slot(), 1);
    }

    #[test]
    fn wizards_are_not_players() {
        let s = scenario();
        assert!(s.find_player("Merlin").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let s = scenario();
        assert!(s.find_player("arthur").is_none());
    }

    #[test]
    fn empty_name_never_matches_absorbed_players() {
        let mut s = scenario();
        let id = s.find_player("Lancelot").unwrap();
        s[id].absorb();

        assert!(s.find_player("Lancelot").is_none());
        assert!(s.find_player("").is_none());
    }

    #[test]
    fn renamed_player_resolves_under_new_name_only() {
        let mut s = scenario();
        let id = s.find_player("Arthur").unwrap();
        s[id].rename("S_0");

        assert_eq!(s.find_player("S_0"), Some(id));
        assert!(s.find_player("Arthur").is_none());
    }

    #[test]
    fn resolve_reports_the_missing_name() {
        let s = scenario();
        assert_eq!(
            s.resolve_player("Gawain"),
            Err(DuelError::UnknownPlayer {
                name: "Gawain".to_owned()
            })
        );
    }
}
