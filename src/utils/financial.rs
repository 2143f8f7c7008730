pub const DAYS_PER_YEAR: f64 = 365.2425;

pub fn calc_annualized_return_rate_by_start_end(
    start_value: f64,
    end_value: f64,
    days: u64,
) -> Option<f64> {
    if start_value > 0.0 && end_value > 0.0 && days > 0 {
        return Some((end_value / start_value).powf(DAYS_PER_YEAR / days as f64) - 1.0);
    }

    None
}

pub fn calc_max_drawdown(values: &[f64]) -> Option<f64> {
    if values.len() > 1 {
        let mut peak = 0.0;
        let mut max_dd = 0.0;

        for &p in values.iter() {
            if p > peak {
                peak = p;
            }

            let dd = (peak - p) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }

        return Some(max_dd);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_annualized_return_rate_by_start_end() {
        let arr = calc_annualized_return_rate_by_start_end(100.0, 110.0, 365).unwrap();
        assert!((arr - 0.1).abs() < 0.001);

        assert!(calc_annualized_return_rate_by_start_end(0.0, 110.0, 365).is_none());
        assert!(calc_annualized_return_rate_by_start_end(100.0, 110.0, 0).is_none());
    }

    #[test]
    fn test_calc_max_drawdown() {
        assert_eq!(
            calc_max_drawdown(&[100.0, 120.0, 90.0, 110.0]),
            Some(0.25)
        );
        assert_eq!(calc_max_drawdown(&[100.0, 110.0, 120.0]), Some(0.0));
        assert!(calc_max_drawdown(&[100.0]).is_none());
        assert!(calc_max_drawdown(&[]).is_none());
    }
}
