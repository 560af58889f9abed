use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::MatchEvent;

/// Min/max spans of a dataset, used to seed range filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterBounds {
    pub hour_min: i64,
    pub hour_max: i64,
    pub minute_min: i64,
    pub minute_max: i64,
    pub goals_min: i64,
    pub goals_max: i64,
}

impl FilterBounds {
    pub fn from_events(events: &[MatchEvent]) -> Self {
        let span = |values: &mut dyn Iterator<Item = i64>| -> (i64, i64) {
            let mut min = i64::MAX;
            let mut max = i64::MIN;
            for v in values {
                min = min.min(v);
                max = max.max(v);
            }
            if min > max { (0, 0) } else { (min, max) }
        };

        let (hour_min, hour_max) = span(&mut events.iter().map(|e| e.hour));
        let (minute_min, minute_max) = span(&mut events.iter().map(|e| e.minute));
        let (goals_min, goals_max) = span(&mut events.iter().map(|e| e.total_goals));
        Self {
            hour_min,
            hour_max,
            minute_min,
            minute_max,
            goals_min,
            goals_max,
        }
    }
}

/// Row filter applied before the ranking pipeline. `None` sets keep every
/// league/team; a team set keeps a row when either side is selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    pub leagues: Option<HashSet<String>>,
    pub teams: Option<HashSet<String>>,
    pub hour_range: (i64, i64),
    pub minute_range: (i64, i64),
    pub min_total_goals: i64,
}

impl FilterSpec {
    /// A spec that keeps every row of a dataset with the given bounds.
    pub fn permissive(bounds: &FilterBounds) -> Self {
        Self {
            leagues: None,
            teams: None,
            hour_range: (bounds.hour_min, bounds.hour_max),
            minute_range: (bounds.minute_min, bounds.minute_max),
            min_total_goals: bounds.goals_min,
        }
    }

    pub fn matches(&self, e: &MatchEvent) -> bool {
        if let Some(leagues) = &self.leagues
            && !leagues.contains(&e.league)
        {
            return false;
        }
        if let Some(teams) = &self.teams
            && !teams.contains(&e.home_team)
            && !teams.contains(&e.away_team)
        {
            return false;
        }
        e.hour >= self.hour_range.0
            && e.hour <= self.hour_range.1
            && e.minute >= self.minute_range.0
            && e.minute <= self.minute_range.1
            && e.total_goals >= self.min_total_goals
    }

    pub fn apply(&self, events: &[MatchEvent]) -> Vec<MatchEvent> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterBounds, FilterSpec};
    use crate::dataset::MatchEvent;
    use std::collections::{HashMap, HashSet};

    fn event(league: &str, minute: i64, hour: i64, home: &str, away: &str, hg: i64, ag: i64) -> MatchEvent {
        MatchEvent::new(
            league.to_string(),
            minute,
            hour,
            home.to_string(),
            away.to_string(),
            hg,
            ag,
            HashMap::new(),
        )
    }

    fn sample() -> Vec<MatchEvent> {
        vec![
            event("Liga A", 10, 14, "Alfa", "Beta", 2, 1),
            event("Liga B", 80, 21, "Gama", "Delta", 0, 0),
            event("Liga A", 45, 18, "Beta", "Gama", 3, 2),
        ]
    }

    #[test]
    fn bounds_cover_dataset_spans() {
        let bounds = FilterBounds::from_events(&sample());
        assert_eq!((bounds.hour_min, bounds.hour_max), (14, 21));
        assert_eq!((bounds.minute_min, bounds.minute_max), (10, 80));
        assert_eq!((bounds.goals_min, bounds.goals_max), (0, 5));
    }

    #[test]
    fn bounds_of_empty_dataset_are_zero() {
        let bounds = FilterBounds::from_events(&[]);
        assert_eq!((bounds.hour_min, bounds.hour_max), (0, 0));
        assert_eq!((bounds.goals_min, bounds.goals_max), (0, 0));
    }

    #[test]
    fn permissive_spec_keeps_everything() {
        let events = sample();
        let spec = FilterSpec::permissive(&FilterBounds::from_events(&events));
        assert_eq!(spec.apply(&events).len(), events.len());
    }

    #[test]
    fn team_filter_matches_either_side() {
        let events = sample();
        let mut spec = FilterSpec::permissive(&FilterBounds::from_events(&events));
        spec.teams = Some(HashSet::from(["Beta".to_string()]));
        let kept = spec.apply(&events);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.home_team == "Beta" || e.away_team == "Beta"));
    }

    #[test]
    fn league_and_goal_filters_compose() {
        let events = sample();
        let mut spec = FilterSpec::permissive(&FilterBounds::from_events(&events));
        spec.leagues = Some(HashSet::from(["Liga A".to_string()]));
        spec.min_total_goals = 4;
        let kept = spec.apply(&events);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].matchup_label, "Beta x Gama");
    }
}
