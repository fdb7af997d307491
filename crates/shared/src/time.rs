use chrono::{DateTime, Utc};

/// Abstracts over wall-clock time so deadline logic can be driven by a fixed
/// instant in tests instead of racing the real clock.
#[derive(Debug, Clone, Copy)]
pub enum Now {
    Real,
    Fake(DateTime<Utc>),
}

impl Now {
    pub fn now(self) -> DateTime<Utc> {
        match self {
            Now::Real => Utc::now(),
            Now::Fake(instant) => instant,
        }
    }
}

impl Default for Now {
    fn default() -> Self {
        Now::Real
    }
}
