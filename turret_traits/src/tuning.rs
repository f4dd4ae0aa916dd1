/// Live-tunable operator values, re-read by the control loop every tick.
///
/// Every read carries the caller's default; a missing or malformed entry must
/// never fault the loop, it just yields `default`.
pub trait Tuning {
    fn number(&self, key: &str, default: f64) -> f64;
}

impl<T: Tuning + ?Sized> Tuning for Box<T> {
    fn number(&self, key: &str, default: f64) -> f64 {
        (**self).number(key, default)
    }
}

impl<T: Tuning + ?Sized> Tuning for std::sync::Arc<T> {
    fn number(&self, key: &str, default: f64) -> f64 {
        (**self).number(key, default)
    }
}
