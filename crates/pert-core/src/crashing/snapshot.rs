use crate::activity::Activity;

/// Remaining crash capacity below this is treated as none.
pub(crate) const CRASH_EPSILON: f64 = 1e-9;

/// Normal and crash parameters of one activity, fixed for a crashing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrashParameters {
    pub normal_time: f64,
    /// `None` when absent, negative, or not finite.
    pub crash_time: Option<f64>,
    pub normal_cost: f64,
    pub crash_cost: f64,
}

impl CrashParameters {
    /// `normal_time` is the resolved duration, so PERT activities crash from
    /// their expected time.
    pub fn from_activity(activity: &Activity, normal_time: f64) -> Self {
        let normal_cost = activity.cost.filter(|c| c.is_finite()).unwrap_or(0.0);
        let crash_cost = activity
            .crash_cost
            .filter(|c| c.is_finite())
            .unwrap_or(normal_cost);
        let crash_time = activity
            .crash_time
            .filter(|t| t.is_finite() && *t >= 0.0);
        Self {
            normal_time,
            crash_time,
            normal_cost,
            crash_cost,
        }
    }

    /// Cost per unit of time saved. `None` when the activity cannot be
    /// shortened at all, or when its crash cost is below its normal cost.
    pub fn slope(&self) -> Option<f64> {
        let crash_time = self.crash_time?;
        if self.normal_time <= crash_time || self.crash_cost < self.normal_cost {
            return None;
        }
        Some((self.crash_cost - self.normal_cost) / (self.normal_time - crash_time))
    }

    pub fn max_crashable(&self) -> f64 {
        match self.crash_time {
            Some(crash_time) => (self.normal_time - crash_time).max(0.0),
            None => 0.0,
        }
    }

    /// Time still available to cut from `current`.
    pub fn remaining(&self, current: f64) -> f64 {
        match self.crash_time {
            Some(crash_time) => (current - crash_time).max(0.0),
            None => 0.0,
        }
    }
}

/// Immutable crash parameters for every activity, by network index.
#[derive(Debug, Clone)]
pub struct CrashSnapshot {
    params: Vec<CrashParameters>,
}

impl CrashSnapshot {
    pub fn capture(activities: &[Activity], durations: &[f64]) -> Self {
        let params = activities
            .iter()
            .zip(durations)
            .map(|(activity, &normal)| CrashParameters::from_activity(activity, normal))
            .collect();
        Self { params }
    }

    pub fn get(&self, idx: usize) -> &CrashParameters {
        &self.params[idx]
    }

    /// Working copy of the normal durations; the crashing loop mutates this,
    /// never the snapshot.
    pub fn normal_durations(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.normal_time).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_defaults() {
        let mut activity = Activity::new("A", "").with_duration(5.0);
        activity.crash_time = Some(3.0);
        activity.cost = Some(100.0);
        let params = CrashParameters::from_activity(&activity, 5.0);
        // crash cost falls back to the normal cost
        assert_eq!(params.crash_cost, 100.0);
        assert_eq!(params.slope(), Some(0.0));
        assert_eq!(params.max_crashable(), 2.0);
    }

    #[test]
    fn slope_per_unit_time() {
        let activity = Activity::new("A", "")
            .with_duration(6.0)
            .with_crash(1000.0, 1600.0, 4.0);
        let params = CrashParameters::from_activity(&activity, 6.0);
        assert_eq!(params.slope(), Some(300.0));
        assert_eq!(params.remaining(5.0), 1.0);
    }

    #[test]
    fn not_crashable_without_room() {
        let activity = Activity::new("A", "")
            .with_duration(4.0)
            .with_crash(10.0, 20.0, 4.0);
        let params = CrashParameters::from_activity(&activity, 4.0);
        assert_eq!(params.slope(), None);
        assert_eq!(params.max_crashable(), 0.0);

        let plain = CrashParameters::from_activity(&Activity::new("B", "").with_duration(4.0), 4.0);
        assert_eq!(plain.slope(), None);
        assert_eq!(plain.normal_cost, 0.0);
    }

    #[test]
    fn cheaper_crash_cost_is_not_crashable() {
        let activity = Activity::new("A", "")
            .with_duration(5.0)
            .with_crash(500.0, 300.0, 3.0);
        let params = CrashParameters::from_activity(&activity, 5.0);
        assert_eq!(params.slope(), None);
    }

    #[test]
    fn non_finite_crash_time_is_absent() {
        let mut activity = Activity::new("A", "").with_duration(4.0);
        activity.crash_time = Some(f64::NAN);
        let params = CrashParameters::from_activity(&activity, 4.0);
        assert_eq!(params.crash_time, None);
    }

    #[test]
    fn working_copy_is_detached() {
        let activities = vec![
            Activity::new("A", "").with_duration(3.0),
            Activity::new("B", "").with_estimates(1.0, 2.0, 9.0),
        ];
        let snapshot = CrashSnapshot::capture(&activities, &[3.0, 3.0]);
        let mut working = snapshot.normal_durations();
        working[0] = 1.0;
        assert_eq!(snapshot.get(0).normal_time, 3.0);
        assert_eq!(snapshot.len(), 2);
    }
}
