use crate::error::TransferError;
use crate::spline::AkimaSpline;
use crate::TransferFunction;

/// Which column of a CAMB-style seven-column transfer function table to
/// interpolate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CambColumn {
    Cdm,
    Baryon,
    Total,
}

/// CAMB-style table: `k, T_c, T_b, T_gamma, T_r, T_nu, T_tot`, one row
/// per k, interpolated with an Akima spline in (log10 k, log10 T).
#[derive(Debug, Clone, PartialEq)]
pub struct CambTable {
    spline: AkimaSpline,
    k_min: f64,
    k_max: f64,
}

impl CambTable {
    pub fn parse(contents: &str, column: CambColumn) -> Result<Self, TransferError> {
        let mut log_k = Vec::new();
        let mut log_t = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 7 {
                continue;
            }
            let parsed: Result<Vec<f64>, _> = cols[..7].iter().map(|c| c.parse::<f64>()).collect();
            let Ok(values) = parsed else {
                continue;
            };
            let k = values[0];
            let t = match column {
                CambColumn::Cdm => values[1],
                CambColumn::Baryon => values[2],
                CambColumn::Total => values[6],
            };
            if k <= 0.0 || t <= 0.0 {
                continue;
            }
            log_k.push(k.log10());
            log_t.push(t.log10());
        }
        if log_k.len() < 2 {
            return Err(TransferError::BadTable(
                "CAMB table needs at least two valid rows".into(),
            ));
        }
        if !log_k.windows(2).all(|w| w[0] < w[1]) {
            return Err(TransferError::BadTable(
                "CAMB table requires strictly monotone k".into(),
            ));
        }
        let k_min = 10f64.powf(log_k[0]);
        let k_max = 10f64.powf(*log_k.last().unwrap());
        Ok(CambTable {
            spline: AkimaSpline::new(log_k, log_t),
            k_min,
            k_max,
        })
    }

    pub fn t(&self, k: f64) -> Result<f64, TransferError> {
        if k <= 0.0 {
            return Err(TransferError::BadTable(
                "CAMB table transfer function is only defined for k > 0".into(),
            ));
        }
        Ok(10f64.powf(self.spline.eval(k.log10())))
    }

    pub fn k_min(&self) -> f64 {
        self.k_min
    }

    pub fn k_max(&self) -> f64 {
        self.k_max
    }
}

impl TransferFunction for CambTable {
    fn t(&self, k: f64) -> Result<f64, TransferError> {
        CambTable::t(self, k)
    }

    fn k_min(&self) -> f64 {
        CambTable::k_min(self)
    }

    fn k_max(&self) -> f64 {
        CambTable::k_max(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
0.001 1.0 0.9 0.1 0.1 0.0 1.0
0.01  0.9 0.8 0.1 0.1 0.0 0.9
0.1   0.5 0.4 0.1 0.1 0.0 0.48
1.0   0.05 0.04 0.01 0.01 0.0 0.048
";

    #[test]
    fn parses_total_column() {
        let tf = CambTable::parse(SAMPLE, CambColumn::Total).unwrap();
        assert!((tf.t(0.001).unwrap() - 1.0).abs() < 1e-6);
        assert!(tf.t(0.05).unwrap() > 0.0);
    }

    #[test]
    fn selects_baryon_column_distinct_from_total() {
        let total = CambTable::parse(SAMPLE, CambColumn::Total).unwrap();
        let baryon = CambTable::parse(SAMPLE, CambColumn::Baryon).unwrap();
        assert!((total.t(1.0).unwrap() - baryon.t(1.0).unwrap()).abs() > 1e-6);
    }
}
