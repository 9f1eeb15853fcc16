/// Running sum of one scalar observable raised to a fixed power.
pub struct Statistics {
    pub count: usize,
    pub aggregate: f64,
    pub power: i32,
}

impl Statistics {
    pub fn new(power: i32) -> Self {
        Self {
            count: 0,
            aggregate: 0.0,
            power,
        }
    }

    pub fn update(&mut self, value: f64) {
        self.count += 1;
        self.aggregate += if self.power == 1 {
            value
        } else {
            value.powi(self.power)
        };
    }

    /// Time average, or `None` before the first update.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.aggregate / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_powers() {
        let mut s1 = Statistics::new(1);
        let mut s2 = Statistics::new(2);
        assert_eq!(s1.average(), None);
        for v in [1.0, -2.0, 3.0] {
            s1.update(v);
            s2.update(v);
        }
        assert_relative_eq!(s1.average().unwrap(), 2.0 / 3.0);
        assert_relative_eq!(s2.average().unwrap(), 14.0 / 3.0);
    }
}
