use crate::error::TransferError;
use crate::TransferFunction;

/// A (k, T) table loaded from a plain two-column ASCII file, linearly
/// interpolated. Lines whose first non-whitespace character is not part
/// of a number are skipped, matching the plain transfer-function table
/// format in the external interfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Tabulated {
    k: Vec<f64>,
    t: Vec<f64>,
}

impl Tabulated {
    pub fn from_columns(k: Vec<f64>, t: Vec<f64>) -> Result<Self, TransferError> {
        if k.len() != t.len() || k.len() < 2 {
            return Err(TransferError::BadTable(
                "tabulated transfer function needs at least two (k, T) rows".into(),
            ));
        }
        if !k.windows(2).all(|w| w[0] < w[1]) {
            return Err(TransferError::BadTable(
                "tabulated transfer function requires strictly monotone k".into(),
            ));
        }
        Ok(Tabulated { k, t })
    }

    pub fn parse(contents: &str) -> Result<Self, TransferError> {
        let mut k = Vec::new();
        let mut t = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut cols = line.split_whitespace();
            let (Some(ks), Some(ts)) = (cols.next(), cols.next()) else {
                continue;
            };
            let (Ok(kv), Ok(tv)) = (ks.parse::<f64>(), ts.parse::<f64>()) else {
                continue; // non-numeric header/comment line
            };
            k.push(kv);
            t.push(tv);
        }
        Self::from_columns(k, t)
    }

    pub fn t(&self, k: f64) -> Result<f64, TransferError> {
        if k <= 0.0 {
            return Err(TransferError::BadTable(
                "tabulated transfer function is only defined for k > 0".into(),
            ));
        }
        let k = k.clamp(self.k[0], *self.k.last().unwrap());
        let idx = match self.k.binary_search_by(|probe| probe.partial_cmp(&k).unwrap()) {
            Ok(i) => return Ok(self.t[i]),
            Err(0) => return Ok(self.t[0]),
            Err(i) if i >= self.k.len() => return Ok(*self.t.last().unwrap()),
            Err(i) => i,
        };
        let (k0, k1) = (self.k[idx - 1], self.k[idx]);
        let (t0, t1) = (self.t[idx - 1], self.t[idx]);
        let frac = (k - k0) / (k1 - k0);
        Ok(t0 + frac * (t1 - t0))
    }

    pub fn k_min(&self) -> f64 {
        self.k[0]
    }

    pub fn k_max(&self) -> f64 {
        *self.k.last().unwrap()
    }
}

impl TransferFunction for Tabulated {
    fn t(&self, k: f64) -> Result<f64, TransferError> {
        Tabulated::t(self, k)
    }

    fn k_min(&self) -> f64 {
        Tabulated::k_min(self)
    }

    fn k_max(&self) -> f64 {
        Tabulated::k_max(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_linearly() {
        let tf = Tabulated::from_columns(vec![0.1, 1.0, 10.0], vec![1.0, 0.5, 0.1]).unwrap();
        let mid = tf.t(0.55).unwrap();
        assert!((mid - 0.75).abs() < 1e-12, "mid={mid}");
    }

    #[test]
    fn parses_and_skips_header_lines() {
        let text = "# k T\n0.1 1.0\n1.0 0.5\n10.0 0.1\n";
        let tf = Tabulated::parse(text).unwrap();
        assert_eq!(tf.k_min(), 0.1);
        assert_eq!(tf.k_max(), 10.0);
    }

    #[test]
    fn rejects_non_monotone_k() {
        assert!(Tabulated::from_columns(vec![1.0, 0.5], vec![1.0, 2.0]).is_err());
    }
}
