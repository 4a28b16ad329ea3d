//! Shared primitive types: the timebase, evaluable attributes, and the
//! deterministic RNG used by random selection.

pub use kurbo::{Point, Rect, Vec2};

/// Time value handed into `update`, in seconds.
///
/// Monotonically non-decreasing at the scene root; combinators hand their
/// children locally remapped values (`outer_time - delay`).
pub type Timebase = f64;

/// An attribute that is either a constant or a function of the local timebase.
///
/// Evaluated once per `update` and cached by the owning node for `draw`.
/// Evaluation must be pure apart from the node's own cached fields.
pub enum Eval<T> {
    Constant(T),
    TimeFn(Box<dyn Fn(Timebase) -> T>),
}

impl<T: Clone> Eval<T> {
    /// Wrap a closure of the local timebase.
    pub fn time(f: impl Fn(Timebase) -> T + 'static) -> Self {
        Self::TimeFn(Box::new(f))
    }

    /// Evaluate at `t`.
    pub fn get(&self, t: Timebase) -> T {
        match self {
            Self::Constant(v) => v.clone(),
            Self::TimeFn(f) => f(t),
        }
    }
}

impl<T> From<T> for Eval<T> {
    fn from(value: T) -> Self {
        Self::Constant(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Eval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::TimeFn(_) => f.write_str("TimeFn(..)"),
        }
    }
}

/// A 2D attribute given either as one evaluable point or as two evaluable
/// scalar components.
pub enum Vec2Attr {
    Point(Eval<Point>),
    Xy(Eval<f64>, Eval<f64>),
}

impl Vec2Attr {
    pub fn point(p: impl Into<Eval<Point>>) -> Self {
        Self::Point(p.into())
    }

    pub fn xy(x: impl Into<Eval<f64>>, y: impl Into<Eval<f64>>) -> Self {
        Self::Xy(x.into(), y.into())
    }

    pub fn get(&self, t: Timebase) -> Point {
        match self {
            Self::Point(p) => p.get(t),
            Self::Xy(x, y) => Point::new(x.get(t), y.get(t)),
        }
    }
}

impl std::fmt::Debug for Vec2Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Point(p) => f.debug_tuple("Point").field(p).finish(),
            Self::Xy(x, y) => f.debug_tuple("Xy").field(x).field(y).finish(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the wall clock. Good enough for non-reproducible scenes;
    /// tests seed explicitly.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64 ^ d.as_secs())
            .unwrap_or(0x5EED);
        Self::new(nanos)
    }

    pub fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Discrete uniform draw over `0..n`. `n` must be non-zero.
    pub fn next_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        (self.next_u64() % n as u64) as usize
    }
}
