use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{ConsumptionTimeInterval, ConsumptionType};

/// One time-bucketed series, oldest bucket first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionSequence {
    #[serde(rename = "k")]
    pub kind: i64,
    #[serde(rename = "p")]
    pub period: i64,
    #[serde(rename = "v", default)]
    pub values: Vec<f64>,
}

impl ConsumptionSequence {
    pub fn matches(&self, kind: ConsumptionType, interval: ConsumptionTimeInterval) -> bool {
        self.kind == kind.code() && self.period == interval.code()
    }
}

/// Latest sequence list of a device and when it last changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionHistory {
    sequences: Vec<ConsumptionSequence>,
    last_changed: DateTime<Utc>,
}

impl Default for ConsumptionHistory {
    fn default() -> Self {
        Self {
            sequences: Vec::new(),
            last_changed: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Reporting lag of the cloud; change stamps are pushed back by this much.
const REPORTING_LAG_HOURS: i64 = 1;

impl ConsumptionHistory {
    pub fn sequences(&self) -> &[ConsumptionSequence] {
        &self.sequences
    }

    pub fn last_changed(&self) -> DateTime<Utc> {
        self.last_changed
    }

    pub fn record(&mut self, fetched: Vec<ConsumptionSequence>) -> bool {
        self.record_at(fetched, Utc::now())
    }

    /// Store a freshly fetched list. Returns whether it differs from the
    /// previous one. The very first list only sets the baseline.
    pub fn record_at(&mut self, fetched: Vec<ConsumptionSequence>, now: DateTime<Utc>) -> bool {
        let mut deduped: Vec<ConsumptionSequence> = Vec::with_capacity(fetched.len());
        for sequence in fetched {
            if !deduped
                .iter()
                .any(|s| s.kind == sequence.kind && s.period == sequence.period)
            {
                deduped.push(sequence);
            }
        }

        let changed = !self.sequences.is_empty() && self.sequences != deduped;
        if changed {
            self.last_changed = now - Duration::hours(REPORTING_LAG_HOURS);
        }
        self.sequences = deduped;
        changed
    }

    pub fn last_value(&self, kind: ConsumptionType, interval: ConsumptionTimeInterval) -> Option<f64> {
        self.sequences
            .iter()
            .find(|s| s.matches(kind, interval))
            .and_then(|s| s.values.last().copied())
    }

    /// Sum of the last-month series for one consumption type.
    pub fn monthly_total(&self, kind: ConsumptionType) -> Option<f64> {
        self.sequences
            .iter()
            .find(|s| s.matches(kind, ConsumptionTimeInterval::LastMonth))
            .map(|s| s.values.iter().sum())
    }
}

/// Last-month figures of the energy account report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyAccount(Map<String, Value>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Heating,
    Water,
}

impl EnergyAccount {
    pub fn new(raw: Map<String, Value>) -> Self {
        Self(raw)
    }

    fn last_month_row(&self, usage: Usage) -> Option<&Value> {
        let rows = self.0.get("LastMonth")?.as_array()?;
        match usage {
            Usage::Heating => rows.first(),
            Usage::Water => rows.get(1),
        }
    }

    pub fn gas_last_month(&self, usage: Usage) -> Option<f64> {
        self.last_month_row(usage)?.get("gas")?.as_f64()
    }

    pub fn electricity_last_month(&self, usage: Usage) -> Option<f64> {
        self.last_month_row(usage)?.get("elect")?.as_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn seq(kind: i64, period: i64, values: &[f64]) -> ConsumptionSequence {
        ConsumptionSequence {
            kind,
            period,
            values: values.to_vec(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn last_value_of_exact_pair() {
        let mut h = ConsumptionHistory::default();
        h.record_at(vec![seq(7, 1, &[10.0, 12.0, 15.0]), seq(7, 3, &[1.0])], now());
        assert_eq!(
            h.last_value(ConsumptionType::CentralHeatingGas, ConsumptionTimeInterval::LastDay),
            Some(15.0)
        );
        assert_eq!(
            h.last_value(ConsumptionType::CentralHeatingGas, ConsumptionTimeInterval::LastWeek),
            None
        );
        assert_eq!(
            h.last_value(ConsumptionType::DomesticHotWaterGas, ConsumptionTimeInterval::LastDay),
            None
        );
    }

    #[test]
    fn empty_series_has_no_last_value() {
        let mut h = ConsumptionHistory::default();
        h.record_at(vec![seq(7, 1, &[])], now());
        assert_eq!(
            h.last_value(ConsumptionType::CentralHeatingGas, ConsumptionTimeInterval::LastDay),
            None
        );
    }

    #[test]
    fn change_stamp_lags_one_hour() {
        let mut h = ConsumptionHistory::default();
        assert!(!h.record_at(vec![seq(1, 1, &[1.0])], now()));
        assert_eq!(h.last_changed(), DateTime::<Utc>::UNIX_EPOCH);

        assert!(h.record_at(vec![seq(1, 1, &[1.0, 2.0])], now()));
        assert_eq!(h.last_changed(), now() - Duration::hours(1));

        let later = now() + Duration::hours(5);
        assert!(!h.record_at(vec![seq(1, 1, &[1.0, 2.0])], later));
        assert_eq!(h.last_changed(), now() - Duration::hours(1));
    }

    #[test]
    fn duplicate_pairs_keep_first() {
        let mut h = ConsumptionHistory::default();
        h.record_at(vec![seq(1, 1, &[5.0]), seq(1, 1, &[9.0])], now());
        assert_eq!(h.sequences().len(), 1);
        assert_eq!(
            h.last_value(ConsumptionType::CentralHeatingTotalEnergy, ConsumptionTimeInterval::LastDay),
            Some(5.0)
        );
    }

    #[test]
    fn monthly_total_sums_last_month_series() {
        let mut h = ConsumptionHistory::default();
        h.record_at(vec![seq(20, 3, &[1.5, 2.5, 3.0]), seq(20, 1, &[100.0])], now());
        assert_eq!(h.monthly_total(ConsumptionType::CentralHeatingElectricity), Some(7.0));
        assert_eq!(h.monthly_total(ConsumptionType::DomesticHotWaterElectricity), None);
    }

    #[test]
    fn energy_account_rows() {
        let raw = serde_json::json!({"LastMonth": [{"gas": 120.0, "elect": 3.0}, {"gas": 40.0}]});
        let account = EnergyAccount::new(raw.as_object().unwrap().clone());
        assert_eq!(account.gas_last_month(Usage::Heating), Some(120.0));
        assert_eq!(account.electricity_last_month(Usage::Heating), Some(3.0));
        assert_eq!(account.gas_last_month(Usage::Water), Some(40.0));
        assert_eq!(account.electricity_last_month(Usage::Water), None);
        assert_eq!(EnergyAccount::default().gas_last_month(Usage::Heating), None);
    }
}
