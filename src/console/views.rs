//! Row adapters and summary figures for the bet, payout, flight and player views.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::console::filter::{self, Filterable, ListQuery, SortConfig, SortDirection, SortValue};
use crate::models::bet::{BetDetail, BetResult};
use crate::models::flight::FlightDetail;
use crate::models::payout::{PayoutDetail, PayoutStatus};
use crate::models::player::{Player, PlayerStatus};

fn bet_result(result: BetResult) -> &'static str {
    match result {
        BetResult::Win => "win",
        BetResult::Lose => "lose",
        BetResult::Pending => "pending",
    }
}

fn payout_status(status: PayoutStatus) -> &'static str {
    match status {
        PayoutStatus::Pending => "pending",
        PayoutStatus::Approved => "approved",
        PayoutStatus::Rejected => "rejected",
    }
}

fn player_status(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Active => "active",
        PlayerStatus::Banned => "banned",
    }
}

impl Filterable for BetDetail {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(2);
        if let Some(player) = &self.player {
            fields.push(player.username.as_str());
        }
        if let Some(flight) = &self.flight {
            fields.push(flight.flight_number.as_str());
        }
        fields
    }

    fn status(&self) -> Option<&str> {
        Some(bet_result(self.bet.result))
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.bet.created_at)
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "player" => self
                .player
                .as_ref()
                .map_or(SortValue::Missing, |p| SortValue::Text(p.username.clone())),
            "amount" => SortValue::Number(self.bet.amount),
            "odds" => SortValue::Number(self.bet.odds),
            "payout" => SortValue::Number(self.bet.payout),
            "date" => SortValue::Time(self.bet.created_at),
            _ => SortValue::Missing,
        }
    }
}

impl Filterable for PayoutDetail {
    fn search_fields(&self) -> Vec<&str> {
        self.player
            .as_ref()
            .map(|p| vec![p.username.as_str()])
            .unwrap_or_default()
    }

    fn status(&self) -> Option<&str> {
        Some(payout_status(self.payout.status))
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.payout.created_at)
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "player" => self
                .player
                .as_ref()
                .map_or(SortValue::Missing, |p| SortValue::Text(p.username.clone())),
            "amount" => SortValue::Number(self.payout.amount),
            "date" => SortValue::Time(self.payout.created_at),
            _ => SortValue::Missing,
        }
    }
}

impl Filterable for FlightDetail {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.flight.flight_number.as_str()]
    }

    fn status(&self) -> Option<&str> {
        None
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.flight.start_time)
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "flightNumber" => SortValue::Text(self.flight.flight_number.clone()),
            "multiplier" => SortValue::Number(self.flight.multiplier),
            "players" => SortValue::Number(f64::from(self.flight.players)),
            "date" => SortValue::Time(self.flight.start_time),
            _ => SortValue::Missing,
        }
    }
}

impl Filterable for Player {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.username.as_str()]
    }

    fn status(&self) -> Option<&str> {
        Some(player_status(self.status))
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "username" => SortValue::Text(self.username.clone()),
            "balance" => SortValue::Number(self.balance),
            "date" => SortValue::Time(self.created_at),
            _ => SortValue::Missing,
        }
    }
}

/// Bet and payout lists open newest first.
pub fn newest_first() -> ListQuery {
    ListQuery {
        sort: Some(SortConfig::new("date", SortDirection::Desc)),
        ..ListQuery::default()
    }
}

pub fn bet_history(rows: &[BetDetail], query: &ListQuery, now: DateTime<Utc>) -> Vec<BetDetail> {
    filter::apply(rows, query, now)
}

/// Payout list selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutQuery {
    pub list: ListQuery,
    pub show_only_pending: bool,
}

impl Default for PayoutQuery {
    fn default() -> Self {
        Self {
            list: newest_first(),
            show_only_pending: false,
        }
    }
}

pub fn payouts(rows: &[PayoutDetail], query: &PayoutQuery, now: DateTime<Utc>) -> Vec<PayoutDetail> {
    let mut out = filter::apply(rows, &query.list, now);
    if query.show_only_pending {
        out.retain(|p| p.payout.status == PayoutStatus::Pending);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplierBand {
    Low,
    Medium,
    High,
}

impl MultiplierBand {
    pub fn contains(self, multiplier: f64) -> bool {
        match self {
            Self::Low => multiplier < 2.0,
            Self::Medium => (2.0..4.0).contains(&multiplier),
            Self::High => multiplier >= 4.0,
        }
    }
}

impl FromStr for MultiplierBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("Unknown multiplier band '{other}'")),
        }
    }
}

/// Flight history selectors; no band means every multiplier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightQuery {
    pub list: ListQuery,
    pub band: Option<MultiplierBand>,
}

/// Flights without a flight plan are not part of the history.
pub fn flight_history(
    rows: &[FlightDetail],
    query: &FlightQuery,
    now: DateTime<Utc>,
) -> Vec<FlightDetail> {
    let mut out = filter::apply(rows, &query.list, now);
    out.retain(|f| {
        f.flight.flight_plan_id.is_some()
            && query.band.map_or(true, |band| band.contains(f.flight.multiplier))
    });
    out
}

pub fn players(rows: &[Player], query: &ListQuery, now: DateTime<Utc>) -> Vec<Player> {
    filter::apply(rows, query, now)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BetStats {
    pub total_bets: usize,
    pub total_wagered: f64,
    pub total_payout: f64,
    /// Percentage of bets that won, 0 when there are none.
    pub win_rate: f64,
}

impl BetStats {
    pub fn from_rows(rows: &[BetDetail]) -> Self {
        let total_bets = rows.len();
        let wins = rows.iter().filter(|b| b.bet.result == BetResult::Win).count();
        Self {
            total_bets,
            total_wagered: rows.iter().map(|b| b.bet.amount).sum(),
            total_payout: rows.iter().map(|b| b.bet.payout).sum(),
            win_rate: if total_bets == 0 {
                0.0
            } else {
                wins as f64 / total_bets as f64 * 100.0
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayoutStats {
    pub total_payouts: usize,
    pub total_amount: f64,
    pub approved: usize,
    pub pending: usize,
}

impl PayoutStats {
    pub fn from_rows(rows: &[PayoutDetail]) -> Self {
        let count = |status: PayoutStatus| rows.iter().filter(|p| p.payout.status == status).count();
        Self {
            total_payouts: rows.len(),
            total_amount: rows.iter().map(|p| p.payout.amount).sum(),
            approved: count(PayoutStatus::Approved),
            pending: count(PayoutStatus::Pending),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightStats {
    pub total_flights: usize,
    /// Mean multiplier rendered with two decimals.
    pub average_multiplier: String,
    pub highest_multiplier: f64,
    pub total_players: i64,
}

impl FlightStats {
    pub fn from_rows(rows: &[FlightDetail]) -> Self {
        let total_flights = rows.len();
        let sum: f64 = rows.iter().map(|f| f.flight.multiplier).sum();
        let average = if total_flights == 0 {
            0.0
        } else {
            sum / total_flights as f64
        };
        Self {
            total_flights,
            average_multiplier: format!("{average:.2}"),
            highest_multiplier: rows
                .iter()
                .map(|f| f.flight.multiplier)
                .fold(0.0, f64::max),
            total_players: rows.iter().map(|f| i64::from(f.flight.players)).sum(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub total_players: usize,
    pub active_players: usize,
    pub total_balance: f64,
}

impl PlayerStats {
    pub fn from_rows(rows: &[Player]) -> Self {
        Self {
            total_players: rows.len(),
            active_players: rows
                .iter()
                .filter(|p| p.status == PlayerStatus::Active)
                .count(),
            total_balance: rows.iter().map(|p| p.balance).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::filter::DateWindow;
    use crate::models::bet::Bet;
    use crate::models::flight::Flight;
    use crate::models::payout::Payout;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn player(username: &str, status: PlayerStatus, balance: f64) -> Player {
        Player {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            balance,
            status,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn flight(number: &str, multiplier: f64, players: i32, planned: bool) -> FlightDetail {
        FlightDetail {
            flight: Flight {
                id: Uuid::new_v4(),
                flight_number: number.to_string(),
                start_time: now() - Duration::hours(1),
                end_time: None,
                result: None,
                multiplier,
                players,
                flight_plan_id: planned.then(Uuid::new_v4),
                created_at: now(),
                updated_at: now(),
            },
            flight_plan: None,
        }
    }

    fn bet(username: &str, number: &str, amount: f64, result: BetResult, age: Duration) -> BetDetail {
        let f = flight(number, 2.5, 1, true);
        let payout = if result == BetResult::Win { amount * 2.5 } else { 0.0 };
        BetDetail {
            bet: Bet {
                id: Uuid::new_v4(),
                player_id: Uuid::new_v4(),
                flight_id: Some(f.flight.id),
                amount,
                odds: 2.5,
                result,
                payout,
                created_at: now() - age,
                updated_at: now() - age,
            },
            player: Some(player(username, PlayerStatus::Active, 0.0)),
            flight: Some(f.flight),
        }
    }

    fn payout(username: &str, amount: f64, status: PayoutStatus) -> PayoutDetail {
        PayoutDetail {
            payout: Payout {
                id: Uuid::new_v4(),
                player_id: Uuid::new_v4(),
                amount,
                status,
                requested_at: now(),
                processed_at: None,
                created_at: now(),
                updated_at: now(),
            },
            player: Some(player(username, PlayerStatus::Active, 0.0)),
        }
    }

    #[test]
    fn bets_search_player_or_flight_and_open_newest_first() {
        let rows = vec![
            bet("ace", "AV-100", 500.0, BetResult::Win, Duration::days(2)),
            bet("bolt", "AV-200", 1000.0, BetResult::Lose, Duration::hours(1)),
            bet("cruise", "ZX-300", 50.0, BetResult::Pending, Duration::days(10)),
        ];

        let all = bet_history(&rows, &newest_first(), now());
        let order: Vec<f64> = all.iter().map(|b| b.bet.amount).collect();
        assert_eq!(order, vec![1000.0, 500.0, 50.0]);

        let query = ListQuery { search: "zx".into(), ..newest_first() };
        assert_eq!(bet_history(&rows, &query, now()).len(), 1);

        let query = ListQuery { search: "BOLT".into(), ..newest_first() };
        assert_eq!(bet_history(&rows, &query, now())[0].bet.amount, 1000.0);

        let query = ListQuery { date: DateWindow::ThisWeek, ..newest_first() };
        assert_eq!(bet_history(&rows, &query, now()).len(), 2);
    }

    #[test]
    fn bet_stats_over_filtered_rows() {
        let rows = vec![
            bet("ace", "AV-1", 500.0, BetResult::Win, Duration::hours(1)),
            bet("bolt", "AV-2", 1000.0, BetResult::Lose, Duration::hours(1)),
        ];
        let stats = BetStats::from_rows(&rows);
        assert_eq!(stats.total_bets, 2);
        assert_eq!(stats.total_wagered, 1500.0);
        assert_eq!(stats.total_payout, 1250.0);
        assert_eq!(stats.win_rate, 50.0);
        assert_eq!(BetStats::from_rows(&[]).win_rate, 0.0);
    }

    #[test]
    fn pending_toggle_and_payout_stats() {
        let rows = vec![
            payout("ace", 100.0, PayoutStatus::Pending),
            payout("bolt", 250.0, PayoutStatus::Approved),
            payout("cruise", 50.0, PayoutStatus::Rejected),
        ];

        let stats = PayoutStats::from_rows(&payouts(&rows, &PayoutQuery::default(), now()));
        assert_eq!(
            stats,
            PayoutStats { total_payouts: 3, total_amount: 400.0, approved: 1, pending: 1 }
        );

        let query = PayoutQuery { show_only_pending: true, ..PayoutQuery::default() };
        let pending = payouts(&rows, &query, now());
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].payout.amount, 100.0);

        let query = PayoutQuery {
            list: ListQuery { status: "approved".into(), ..newest_first() },
            show_only_pending: false,
        };
        assert_eq!(payouts(&rows, &query, now())[0].payout.amount, 250.0);
    }

    #[test]
    fn payout_date_window_follows_creation_time() {
        let mut old = payout("ace", 100.0, PayoutStatus::Pending);
        old.payout.created_at = now() - Duration::days(3);
        let fresh = payout("bolt", 250.0, PayoutStatus::Pending);
        let rows = vec![old, fresh];

        let query = PayoutQuery {
            list: ListQuery { date: DateWindow::Today, ..newest_first() },
            show_only_pending: false,
        };
        let today = payouts(&rows, &query, now());
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].payout.amount, 250.0);

        let all = payouts(&rows, &PayoutQuery::default(), now());
        assert_eq!(all[0].payout.amount, 250.0);
    }

    #[test]
    fn multiplier_band_edges() {
        assert!(MultiplierBand::Low.contains(1.99));
        assert!(!MultiplierBand::Low.contains(2.0));
        assert!(MultiplierBand::Medium.contains(2.0));
        assert!(!MultiplierBand::Medium.contains(4.0));
        assert!(MultiplierBand::High.contains(4.0));
        assert_eq!("medium".parse::<MultiplierBand>(), Ok(MultiplierBand::Medium));
        assert!("extreme".parse::<MultiplierBand>().is_err());
    }

    #[test]
    fn flight_history_skips_unplanned_and_applies_band() {
        let rows = vec![
            flight("AV-1", 1.5, 10, true),
            flight("AV-2", 3.0, 20, true),
            flight("AV-3", 8.0, 5, true),
            flight("AV-4", 9.9, 99, false),
        ];

        let all = flight_history(&rows, &FlightQuery::default(), now());
        assert_eq!(all.len(), 3);

        let stats = FlightStats::from_rows(&all);
        assert_eq!(stats.total_flights, 3);
        assert_eq!(stats.average_multiplier, "4.17");
        assert_eq!(stats.highest_multiplier, 8.0);
        assert_eq!(stats.total_players, 35);

        let query = FlightQuery { band: Some(MultiplierBand::High), ..FlightQuery::default() };
        let high = flight_history(&rows, &query, now());
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].flight.flight_number, "AV-3");

        assert_eq!(FlightStats::from_rows(&[]).average_multiplier, "0.00");
    }

    #[test]
    fn players_filter_by_status_and_sum_balance() {
        let rows = vec![
            player("ace", PlayerStatus::Active, 100.0),
            player("bolt", PlayerStatus::Banned, 40.0),
            player("acorn", PlayerStatus::Active, 10.5),
        ];

        let stats = PlayerStats::from_rows(&players(&rows, &ListQuery::default(), now()));
        assert_eq!(stats.total_players, 3);
        assert_eq!(stats.active_players, 2);
        assert_eq!(stats.total_balance, 150.5);

        let query = ListQuery { search: "ac".into(), status: "active".into(), ..ListQuery::default() };
        assert_eq!(players(&rows, &query, now()).len(), 2);

        let mut query = ListQuery::default();
        query.sort_by("balance");
        query.sort_by("balance");
        let sorted = players(&rows, &query, now());
        assert_eq!(sorted[0].username, "ace");
    }
}
