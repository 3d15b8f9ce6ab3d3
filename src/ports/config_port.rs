//! Configuration access port trait.

/// Section/key lookup over an equant configuration.
///
/// Typed getters return `default` when the key is absent or does not parse,
/// so range checks belong to `domain::config_validation`.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
}
