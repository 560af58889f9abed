use std::collections::VecDeque;

use crate::dataset::MatchEvent;
use crate::filters::{FilterBounds, FilterSpec};
use crate::rankings::{
    GoalRankings, HourRankRow, OddsCategoryRow, OverRates, RankingConfig, compute_goal_rankings,
    over_rates,
};

const LOG_CAPACITY: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Hours,
    Matchups,
    Minutes,
    Odds,
    HomeTeams,
    AwayTeams,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Hours,
        Tab::Matchups,
        Tab::Minutes,
        Tab::Odds,
        Tab::HomeTeams,
        Tab::AwayTeams,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Hours => "Hours",
            Tab::Matchups => "Matchups",
            Tab::Minutes => "Minutes",
            Tab::Odds => "Odds",
            Tab::HomeTeams => "Home Teams",
            Tab::AwayTeams => "Away Teams",
        }
    }

    pub fn next(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

pub struct AppState {
    pub events: Vec<MatchEvent>,
    pub bounds: FilterBounds,
    pub filter: FilterSpec,
    pub config: RankingConfig,
    pub rankings: GoalRankings,
    pub rates: OverRates,
    pub filtered_len: usize,
    pub tab: Tab,
    pub odds_index: usize,
    pub scroll: usize,
    pub search_editing: bool,
    pub search_draft: String,
    pub source_label: String,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(events: Vec<MatchEvent>, source_label: String) -> Self {
        let bounds = FilterBounds::from_events(&events);
        let mut state = Self {
            filter: FilterSpec::permissive(&bounds),
            bounds,
            events,
            config: RankingConfig::default(),
            rankings: GoalRankings::default(),
            rates: OverRates::default(),
            filtered_len: 0,
            tab: Tab::Hours,
            odds_index: 0,
            scroll: 0,
            search_editing: false,
            search_draft: String::new(),
            source_label,
            logs: VecDeque::new(),
        };
        state.recompute();
        state
    }

    /// Re-runs the whole pipeline against the current filter and search.
    /// Over-rates come from the row filter alone; the hour search only
    /// narrows the ranked products, like the original dashboard.
    pub fn recompute(&mut self) {
        let filtered = self.filter.apply(&self.events);
        self.filtered_len = filtered.len();
        self.rates = over_rates(&filtered);
        self.rankings = compute_goal_rankings(&filtered, &self.config);
        self.scroll = 0;
        if self.odds_index >= self.rankings.odds.len() {
            self.odds_index = 0;
        }
    }

    pub fn push_log(&mut self, line: String) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub fn top_hour(&self) -> Option<&HourRankRow> {
        self.rankings.by_hour.first()
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.scroll = 0;
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
        self.scroll = 0;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.scroll = 0;
    }

    pub fn cycle_odds_column(&mut self) {
        if !self.rankings.odds.is_empty() {
            self.odds_index = (self.odds_index + 1) % self.rankings.odds.len();
            self.scroll = 0;
        }
    }

    pub fn current_odds_profile(&self) -> Option<(&str, &[OddsCategoryRow])> {
        self.rankings
            .odds
            .get(self.odds_index)
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    pub fn current_row_count(&self) -> usize {
        match self.tab {
            Tab::Hours => self.rankings.by_hour.len(),
            Tab::Matchups => self.rankings.matchups.len(),
            Tab::Minutes => self.rankings.by_minute.len(),
            Tab::Odds => self
                .current_odds_profile()
                .map(|(_, rows)| rows.len())
                .unwrap_or(0),
            Tab::HomeTeams => self.rankings.home_teams.len(),
            Tab::AwayTeams => self.rankings.away_teams.len(),
        }
    }

    pub fn scroll_down(&mut self, step: usize) {
        let max = self.current_row_count().saturating_sub(1);
        self.scroll = (self.scroll + step).min(max);
    }

    pub fn scroll_up(&mut self, step: usize) {
        self.scroll = self.scroll.saturating_sub(step);
    }

    pub fn begin_search_edit(&mut self) {
        self.search_editing = true;
        self.search_draft = self.config.hour_search.clone();
    }

    pub fn cancel_search_edit(&mut self) {
        self.search_editing = false;
        self.search_draft.clear();
    }

    pub fn apply_search(&mut self) {
        self.config.hour_search = self.search_draft.trim().to_string();
        self.search_editing = false;
        self.recompute();
    }

    pub fn clear_search(&mut self) {
        if !self.config.hour_search.is_empty() {
            self.config.hour_search.clear();
            self.recompute();
        }
    }

    pub fn adjust_min_goals(&mut self, delta: i64) {
        let next = (self.filter.min_total_goals + delta)
            .clamp(self.bounds.goals_min, self.bounds.goals_max);
        if next != self.filter.min_total_goals {
            self.filter.min_total_goals = next;
            self.recompute();
        }
    }
}
