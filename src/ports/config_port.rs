//! Configuration access port trait.

pub trait ConfigPort {
    /// Raw value of `key` in `section`, `None` when absent. Typed parsing and
    /// defaults are the caller's business.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
