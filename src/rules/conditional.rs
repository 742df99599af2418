/// Configuration that is either fixed or switched on run-time conditions.
///
/// Conditions are opaque tags here; the interpreter owns the vocabulary.
/// An unknown tag simply never matches, so the default always applies.
#[derive(Debug, Clone)]
pub enum Conditional<T> {
    Static(T),
    Switch {
        orders: Vec<(String, T)>,
        default: T,
    },
}

impl<T> Conditional<T> {
    pub fn resolve(&self, matches: impl Fn(&str) -> bool) -> &T {
        match self {
            Conditional::Static(value) => value,
            Conditional::Switch { orders, default } => orders
                .iter()
                .find(|(condition, _)| matches(condition))
                .map(|(_, value)| value)
                .unwrap_or(default),
        }
    }

    pub fn default_value(&self) -> &T {
        match self {
            Conditional::Static(value) => value,
            Conditional::Switch { default, .. } => default,
        }
    }
}
