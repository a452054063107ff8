use serde::{Deserialize, Serialize};

/// A rupee amount read off the ticker page. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, String> {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("Price must be a finite non-negative number, got {value}"));
        }
        Ok(Price(value))
    }

    /// Reads a price out of loosely formatted ticker text such as `₹7,860.50/qtl`.
    ///
    /// Everything that is not an ASCII digit or `.` is dropped, then the
    /// longest leading decimal number is taken (`1.2.3` reads as `1.2`).
    /// Text with no number in it reads as zero.
    pub fn parse_lenient(text: &str) -> Self {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let mut end = 0;
        let mut seen_dot = false;
        for (i, c) in cleaned.char_indices() {
            if c == '.' {
                if seen_dot {
                    break;
                }
                seen_dot = true;
            }
            end = i + 1;
        }

        cleaned[..end]
            .parse::<f64>()
            .ok()
            .and_then(|v| Price::new(v).ok())
            .unwrap_or_default()
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }
}
