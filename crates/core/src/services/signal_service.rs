use chrono::{DateTime, Local, SecondsFormat};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::fields::parse_datetime;
use crate::models::signals::{MonthlySignals, Signal, SignalStats, SignalsSection, SubscriberStats};
use crate::models::subscriber::{LoginCode, Subscriber};

/// Number of individual signals exported to the dashboard.
pub const RECENT_SIGNALS: usize = 10;

/// Reduces the signal bot's performance history and subscriber list to
/// dashboard aggregates.
pub struct SignalService;

impl SignalService {
    pub fn new() -> Self {
        Self
    }

    /// Build the `konan_signals` section.
    pub fn section(&self, signals: &[Signal], subscribers: &[Subscriber], now: DateTime<Local>) -> SignalsSection {
        SignalsSection {
            stats: self.stats(signals),
            recent_signals: self.recent(signals),
            monthly: self.monthly(signals),
            subscribers: self.subscriber_stats(subscribers, now),
        }
    }

    pub fn stats(&self, signals: &[Signal]) -> SignalStats {
        let wins: Vec<f64> = signals.iter().filter(|s| s.is_win()).map(|s| s.pnl).collect();
        let losses: Vec<f64> = signals.iter().filter(|s| s.is_loss()).map(|s| s.pnl).collect();
        let closed = wins.len() + losses.len();

        let best_trade = signals.iter().map(|s| s.pnl).fold(None, |acc: Option<f64>, p| {
            Some(acc.map_or(p, |a| a.max(p)))
        });
        let worst_trade = signals.iter().map(|s| s.pnl).fold(None, |acc: Option<f64>, p| {
            Some(acc.map_or(p, |a| a.min(p)))
        });

        SignalStats {
            total_signals: signals.len(),
            wins: wins.len(),
            losses: losses.len(),
            pending: signals.len() - closed,
            win_rate: if closed > 0 {
                round1(wins.len() as f64 / closed as f64 * 100.0)
            } else {
                0.0
            },
            total_pnl: round2(signals.iter().map(|s| s.pnl).sum()),
            avg_win: round2(mean(&wins)),
            avg_loss: round2(mean(&losses)),
            best_trade: round2(best_trade.unwrap_or(0.0)),
            worst_trade: round2(worst_trade.unwrap_or(0.0)),
        }
    }

    /// The most recent signals, newest first. Signals with an unreadable
    /// timestamp sort after every dated one.
    pub fn recent(&self, signals: &[Signal]) -> Vec<Signal> {
        let mut dated: Vec<(Option<DateTime<Local>>, &Signal)> =
            signals.iter().map(|s| (s.published(), s)).collect();
        dated.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        dated
            .into_iter()
            .take(RECENT_SIGNALS)
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// Per-month counts keyed by `YYYY-MM` of the publish date.
    pub fn monthly(&self, signals: &[Signal]) -> BTreeMap<String, MonthlySignals> {
        let mut months: BTreeMap<String, MonthlySignals> = BTreeMap::new();
        for signal in signals {
            let Some(published) = signal.published() else {
                continue;
            };
            let entry = months.entry(published.format("%Y-%m").to_string()).or_default();
            entry.signals += 1;
            if signal.is_win() {
                entry.wins += 1;
            }
            entry.pnl += signal.pnl;
        }
        for month in months.values_mut() {
            month.pnl = round2(month.pnl);
        }
        months
    }

    pub fn subscriber_stats(&self, subscribers: &[Subscriber], now: DateTime<Local>) -> SubscriberStats {
        let active: Vec<&Subscriber> = subscribers.iter().filter(|s| s.is_active(now)).collect();
        SubscriberStats {
            total: subscribers.len(),
            active: active.len(),
            revenue: round2(active.iter().map(|s| s.price).sum()),
        }
    }

    /// Codes the dashboard accepts at login.
    ///
    /// Only active subscribers contribute. The access code lives as long as
    /// the subscription; the login code needs its own expiry in the future.
    pub fn login_codes(&self, subscribers: &[Subscriber], now: DateTime<Local>) -> Vec<LoginCode> {
        let mut codes = Vec::new();
        for sub in subscribers {
            let Some(expiry) = sub.active_until(now) else {
                continue;
            };
            if let Some(code) = &sub.access_code {
                codes.push(login_code(sub, code, expiry));
            }
            let login_expiry = sub
                .login_code_expires
                .as_deref()
                .and_then(parse_datetime)
                .filter(|exp| *exp > now);
            if let (Some(code), Some(exp)) = (&sub.login_code, login_expiry) {
                codes.push(login_code(sub, code, exp));
            }
        }
        codes
    }
}

impl Default for SignalService {
    fn default() -> Self {
        Self::new()
    }
}

fn login_code(sub: &Subscriber, code: &str, expires: DateTime<Local>) -> LoginCode {
    LoginCode {
        telegram_id: sub.telegram_id.clone(),
        code: code.to_string(),
        expires: expires.to_rfc3339_opts(SecondsFormat::Secs, false),
        name: sub.name.clone(),
        plan: sub.plan.clone(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
