/// Percentage dials for one split. The dials are independent: they are not
/// required to sum to 100, and controller/superior apply to the residual pool
/// rather than the gross amount. Each record stores the snapshot it was
/// computed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionConfig {
    pub taker_percentage: f64,
    pub controller_percentage: f64,
    pub superior_percentage: f64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            taker_percentage: 80.0,
            controller_percentage: 15.0,
            superior_percentage: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeDistribution {
    pub taker: f64,
    pub controller: f64,
    pub superior: f64,
    pub pool: f64,
    pub platform: f64,
}

/// Computes the tiered split for one per-person amount.
///
/// The taker keeps their percentage of the per-person amount; the remainder is
/// the pool. Controller and superior each draw their percentage from the pool,
/// the superior draw dropping to zero when no effective superior exists. The
/// platform keeps whatever is left, which can go negative when the pool dials
/// sum past 100. No rounding or clamping happens here.
pub fn compute(
    per_person_amount: f64,
    config: DistributionConfig,
    superior_present: bool,
) -> IncomeDistribution {
    let taker = per_person_amount * config.taker_percentage / 100.0;
    let pool = per_person_amount * (100.0 - config.taker_percentage) / 100.0;
    let controller = pool * config.controller_percentage / 100.0;
    let superior = if superior_present {
        pool * config.superior_percentage / 100.0
    } else {
        0.0
    };
    let platform = pool - controller - superior;

    IncomeDistribution {
        taker,
        controller,
        superior,
        pool,
        platform,
    }
}

#[cfg(test)]
mod tests {
    use super::{DistributionConfig, compute};

    #[test]
    fn default_dials_split_a_hundred_with_superior() {
        let distribution = compute(100.0, DistributionConfig::default(), true);
        assert!((distribution.taker - 80.0).abs() < 1e-9);
        assert!((distribution.pool - 20.0).abs() < 1e-9);
        assert!((distribution.controller - 3.0).abs() < 1e-9);
        assert!((distribution.superior - 1.0).abs() < 1e-9);
        assert!((distribution.platform - 16.0).abs() < 1e-9);
    }

    #[test]
    fn absent_superior_share_flows_to_platform() {
        let distribution = compute(100.0, DistributionConfig::default(), false);
        assert_eq!(distribution.superior, 0.0);
        assert!((distribution.platform - 17.0).abs() < 1e-9);
    }

    #[test]
    fn pool_dials_past_hundred_leave_platform_negative() {
        let config = DistributionConfig {
            taker_percentage: 80.0,
            controller_percentage: 70.0,
            superior_percentage: 50.0,
        };
        let distribution = compute(100.0, config, true);
        assert!((distribution.controller - 14.0).abs() < 1e-9);
        assert!((distribution.superior - 10.0).abs() < 1e-9);
        assert!((distribution.platform - (-4.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_dials_push_everything_to_platform() {
        let config = DistributionConfig {
            taker_percentage: 0.0,
            controller_percentage: 0.0,
            superior_percentage: 0.0,
        };
        let distribution = compute(60.0, config, true);
        assert_eq!(distribution.taker, 0.0);
        assert!((distribution.pool - 60.0).abs() < 1e-9);
        assert!((distribution.platform - 60.0).abs() < 1e-9);
    }
}
