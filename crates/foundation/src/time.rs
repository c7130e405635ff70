/// Wall-clock timestamp in milliseconds since the Unix epoch.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Millis(pub f64);

impl Millis {
    pub fn after(self, delay_ms: f64) -> Self {
        Millis(self.0 + delay_ms.max(0.0))
    }

    /// Integer milliseconds, used for file names.
    pub fn as_whole(self) -> u64 {
        if self.0.is_finite() && self.0 > 0.0 {
            self.0.floor() as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Millis;

    #[test]
    fn after_never_goes_backwards() {
        assert_eq!(Millis(10.0).after(5.0), Millis(15.0));
        assert_eq!(Millis(10.0).after(-5.0), Millis(10.0));
    }

    #[test]
    fn whole_millis_truncates_and_rejects_garbage() {
        assert_eq!(Millis(1_700_000_000_123.9).as_whole(), 1_700_000_000_123);
        assert_eq!(Millis(f64::NAN).as_whole(), 0);
        assert_eq!(Millis(-4.0).as_whole(), 0);
    }
}
