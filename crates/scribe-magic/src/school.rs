//! The six schools of magic and per-enchantment skill requirements.

use std::fmt;

use rand::Rng;
use scribe_esm::types::Effect;

/// Source of the random adjustments applied to skill requirements and
/// spell costs.
///
/// Every [`rand::Rng`] is a `CostRoll`; tests can plug in a fixed sequence.
pub trait CostRoll {
    /// A uniformly distributed integer in `low..=high`.
    fn roll(&mut self, low: i32, high: i32) -> i32;
}

impl<R: Rng + ?Sized> CostRoll for R {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        self.gen_range(low..=high)
    }
}

/// A school of magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum School {
    Alteration,
    Conjuration,
    Destruction,
    Illusion,
    Mysticism,
    Restoration,
}

// Effect ids per school, from the base game's magic effect table.
const ALTERATION_EFFECTS: &[u16] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
const CONJURATION_EFFECTS: &[u16] = &[
    101, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111, 112, 113, 114, 115, 116, 118, 119, 120,
    121, 122, 123, 124, 125, 126, 127, 128, 129, 130, 131, 134,
];
const DESTRUCTION_EFFECTS: &[u16] = &[
    14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37,
    38, 132, 133, 135, 136,
];
const ILLUSION_EFFECTS: &[u16] = &[
    39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 54, 55, 56,
];
const MYSTICISM_EFFECTS: &[u16] = &[
    53, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67, 68, 85, 86, 87, 88, 89,
];
const RESTORATION_EFFECTS: &[u16] = &[
    69, 70, 71, 72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 83, 84, 90, 91, 92, 93, 94, 95, 96, 97,
    98, 99, 100, 117,
];

impl School {
    /// All schools, in the order requirements are listed.
    pub const ALL: [School; 6] = [
        School::Alteration,
        School::Conjuration,
        School::Destruction,
        School::Illusion,
        School::Mysticism,
        School::Restoration,
    ];

    /// Name as used by the scripting language (`player->Get<name>`).
    pub fn name(self) -> &'static str {
        match self {
            School::Alteration => "Alteration",
            School::Conjuration => "Conjuration",
            School::Destruction => "Destruction",
            School::Illusion => "Illusion",
            School::Mysticism => "Mysticism",
            School::Restoration => "Restoration",
        }
    }

    /// Hex RGB colour used in book markup.
    pub fn color(self) -> &'static str {
        match self {
            School::Alteration => "5A2458",
            School::Conjuration => "642D00",
            School::Destruction => "9B0000",
            School::Illusion => "113D25",
            School::Mysticism => "383C9C",
            School::Restoration => "001BB9",
        }
    }

    /// How much each tick of duration adds to the requirement.
    pub fn duration_weight(self) -> f64 {
        match self {
            School::Alteration => 0.15,
            School::Conjuration => 0.25,
            School::Destruction => 0.08,
            School::Illusion | School::Mysticism | School::Restoration => 0.2,
        }
    }

    /// Magic effect ids belonging to the school.
    pub fn effect_ids(self) -> &'static [u16] {
        match self {
            School::Alteration => ALTERATION_EFFECTS,
            School::Conjuration => CONJURATION_EFFECTS,
            School::Destruction => DESTRUCTION_EFFECTS,
            School::Illusion => ILLUSION_EFFECTS,
            School::Mysticism => MYSTICISM_EFFECTS,
            School::Restoration => RESTORATION_EFFECTS,
        }
    }

    /// The school an effect id belongs to.
    pub fn classify(effect_id: u16) -> Option<School> {
        School::ALL
            .into_iter()
            .find(|school| school.effect_ids().contains(&effect_id))
    }
}

impl fmt::Display for School {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Duration given to instantaneous effects (0 or 1 tick).
const INSTANT_DURATION: i32 = 40;

/// Running skill requirement of one school for one enchantment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchoolStat {
    pub school: School,
    /// Skill needed, 0 when no effect of the school has been seen.
    pub accumulated_cost: i32,
}

impl SchoolStat {
    pub fn new(school: School) -> Self {
        Self {
            school,
            accumulated_cost: 0,
        }
    }

    /// Raise the requirement for one effect of this school.
    ///
    /// The estimate is the mean magnitude plus a duration term, clamped to
    /// `0..=100`. When it beats the current requirement it is jittered
    /// (upwards near 0, downwards near 100, either way otherwise) and
    /// truncated. The requirement never decreases: a jittered value below
    /// the current requirement is discarded, even though the estimate beat
    /// it. Returns whether it changed.
    pub fn update_cost<R: CostRoll + ?Sized>(
        &mut self,
        duration_ticks: i32,
        min_magnitude: i32,
        max_magnitude: i32,
        roll: &mut R,
    ) -> bool {
        let duration = if duration_ticks <= 1 {
            INSTANT_DURATION
        } else {
            duration_ticks
        };

        let mean = (f64::from(min_magnitude) + f64::from(max_magnitude)) / 2.0;
        let raw = (mean + self.school.duration_weight() * f64::from(duration)).clamp(0.0, 100.0);
        if raw <= f64::from(self.accumulated_cost) {
            return false;
        }

        let jitter = if raw <= 10.0 {
            roll.roll(0, 10)
        } else if raw >= 90.0 {
            roll.roll(-10, 0)
        } else {
            roll.roll(-4, 4)
        };
        // Not re-clamped: the jitter direction keeps the result in 0..=100.
        let cost = (raw + f64::from(jitter)).trunc() as i32;

        // Jitter can push a winning estimate back under the current value.
        if cost > self.accumulated_cost {
            self.accumulated_cost = cost;
            true
        } else {
            false
        }
    }
}

/// Fresh requirements for all six schools.
///
/// Create one per enchantment; it is never shared between enchantments.
#[derive(Debug, Clone)]
pub struct SchoolStats {
    stats: [SchoolStat; 6],
}

impl Default for SchoolStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SchoolStats {
    pub fn new() -> Self {
        Self {
            stats: School::ALL.map(SchoolStat::new),
        }
    }

    /// The stat of the school an effect id belongs to.
    pub fn classify_mut(&mut self, effect_id: u16) -> Option<&mut SchoolStat> {
        let school = School::classify(effect_id)?;
        self.stats.iter_mut().find(|s| s.school == school)
    }

    /// Account for one effect. Effects outside every school are ignored.
    pub fn apply<R: CostRoll + ?Sized>(&mut self, effect: &Effect, roll: &mut R) {
        if let Some(stat) = self.classify_mut(effect.effect_id.get()) {
            stat.update_cost(
                effect.duration.get(),
                effect.min_magnitude.get(),
                effect.max_magnitude.get(),
                roll,
            );
        }
    }

    /// Score every effect of an enchantment.
    pub fn from_effects<R, I>(effects: I, roll: &mut R) -> Self
    where
        R: CostRoll + ?Sized,
        I: IntoIterator<Item = Effect>,
    {
        let mut stats = Self::new();
        for effect in effects {
            stats.apply(&effect, roll);
        }
        stats
    }

    pub fn get(&self, school: School) -> &SchoolStat {
        // ALL and stats share the same order.
        &self.stats[School::ALL.iter().position(|s| *s == school).unwrap_or(0)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchoolStat> {
        self.stats.iter()
    }

    /// Schools with a non-zero requirement, in [`School::ALL`] order.
    pub fn required(&self) -> impl Iterator<Item = &SchoolStat> {
        self.stats.iter().filter(|s| s.accumulated_cost > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Replays fixed rolls, clamped into the requested range.
    struct Scripted(VecDeque<i32>);

    impl CostRoll for Scripted {
        fn roll(&mut self, low: i32, high: i32) -> i32 {
            self.0.pop_front().unwrap_or(0).clamp(low, high)
        }
    }

    fn scripted(rolls: &[i32]) -> Scripted {
        Scripted(rolls.iter().copied().collect())
    }

    #[test]
    fn test_schools_are_disjoint() {
        for (i, a) in School::ALL.iter().enumerate() {
            for b in &School::ALL[i + 1..] {
                assert!(a.effect_ids().iter().all(|id| !b.effect_ids().contains(id)));
            }
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(School::classify(0), Some(School::Alteration));
        assert_eq!(School::classify(23), Some(School::Destruction));
        assert_eq!(School::classify(53), Some(School::Mysticism));
        assert_eq!(School::classify(117), Some(School::Restoration));
        assert_eq!(School::classify(134), Some(School::Conjuration));
        assert_eq!(School::classify(137), None);
    }

    #[test]
    fn test_update_cost_exact() {
        // (20 + 30) / 2 + 0.08 * 5 = 25.4, jitter +3 -> 28
        let mut stat = SchoolStat::new(School::Destruction);
        assert!(stat.update_cost(5, 20, 30, &mut scripted(&[3])));
        assert_eq!(stat.accumulated_cost, 28);
    }

    #[test]
    fn test_instant_duration_is_boosted() {
        // 10 + 0.2 * 40 = 18, no jitter
        for ticks in [0, 1] {
            let mut stat = SchoolStat::new(School::Restoration);
            stat.update_cost(ticks, 10, 10, &mut scripted(&[0]));
            assert_eq!(stat.accumulated_cost, 18);
        }
    }

    #[test]
    fn test_jitter_direction() {
        // Low estimates only go up.
        let mut low = SchoolStat::new(School::Destruction);
        low.update_cost(2, 1, 1, &mut scripted(&[-4]));
        assert_eq!(low.accumulated_cost, 1);

        // High estimates only go down.
        let mut high = SchoolStat::new(School::Destruction);
        high.update_cost(2, 200, 200, &mut scripted(&[7]));
        assert_eq!(high.accumulated_cost, 100);
        let mut high = SchoolStat::new(School::Destruction);
        high.update_cost(2, 200, 200, &mut scripted(&[-10]));
        assert_eq!(high.accumulated_cost, 90);
    }

    #[test]
    fn test_lower_estimate_leaves_cost() {
        let mut stat = SchoolStat::new(School::Illusion);
        stat.update_cost(10, 50, 50, &mut scripted(&[0]));
        assert_eq!(stat.accumulated_cost, 52);
        assert!(!stat.update_cost(10, 20, 20, &mut scripted(&[4])));
        assert_eq!(stat.accumulated_cost, 52);
    }

    #[test]
    fn test_jitter_below_current_is_discarded() {
        let mut stat = SchoolStat::new(School::Illusion);
        stat.update_cost(10, 50, 50, &mut scripted(&[0]));
        assert_eq!(stat.accumulated_cost, 52);

        // 51 + 0.2 * 10 = 53 beats 52, but 53 - 4 does not.
        assert!(!stat.update_cost(10, 51, 51, &mut scripted(&[-4])));
        assert_eq!(stat.accumulated_cost, 52);
        assert!(stat.update_cost(10, 51, 51, &mut scripted(&[1])));
        assert_eq!(stat.accumulated_cost, 54);
    }

    #[test]
    fn test_monotonic_with_random_rolls() {
        let mut rng = StdRng::seed_from_u64(7);
        for seed_mag in 0..200 {
            let mut stat = SchoolStat::new(School::Conjuration);
            let mut last = 0;
            for step in (0..20).rev() {
                stat.update_cost(step, seed_mag - step * 3, seed_mag, &mut rng);
                assert!(stat.accumulated_cost >= last);
                assert!((0..=100).contains(&stat.accumulated_cost));
                last = stat.accumulated_cost;
            }
        }
    }

    #[test]
    fn test_negative_magnitudes_clamp_to_zero() {
        let mut stat = SchoolStat::new(School::Alteration);
        assert!(!stat.update_cost(2, -500, -500, &mut scripted(&[10])));
        assert_eq!(stat.accumulated_cost, 0);
    }

    #[test]
    fn test_stats_first_school_only() {
        let mut stats = SchoolStats::new();
        stats.classify_mut(23).unwrap().accumulated_cost = 30;
        assert_eq!(stats.get(School::Destruction).accumulated_cost, 30);
        assert!(stats.classify_mut(999).is_none());

        let required: Vec<School> = stats.required().map(|s| s.school).collect();
        assert_eq!(required, vec![School::Destruction]);
        assert_eq!(stats.iter().count(), 6);
    }
}
