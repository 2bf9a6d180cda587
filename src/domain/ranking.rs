use crate::domain::entities::{Participant, RankedParticipant};

// Sorts by points descending. The sort is stable, so ties keep sheet read
// order and identical input always ranks identically.
pub fn rank(mut participants: Vec<Participant>) -> Vec<RankedParticipant> {
    participants.sort_by(|a, b| b.points.cmp(&a.points));

    participants
        .into_iter()
        .enumerate()
        .map(|(index, participant)| RankedParticipant {
            position: index + 1,
            participant,
        })
        .collect()
}
