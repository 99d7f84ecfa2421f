//! Synthetic rice price payloads.
//!
//! Produces a `RawDataset` shaped like a BPS response (same key layout and
//! code tables) so the whole pipeline can run without an API key.
//!
//! Price model per grade:
//! - level that compounds `annual_growth` per year from `start_year`
//! - seasonal swing peaking before the main harvest (Feb/Mar)
//! - Gaussian noise proportional to the level
//!
//! Output is deterministic for a given seed.

use std::f64::consts::PI;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::data::PriceSource;
use crate::domain::{MonthLookup, QualityGrade, RawDataset, RawRecord, RawValue, YearLookup};
use crate::error::AppError;

/// Relative seasonal amplitude.
const SEASONAL_AMPLITUDE: f64 = 0.015;

#[derive(Debug, Clone)]
pub struct SampleSource {
    pub seed: u64,
    pub start_year: i32,
    pub end_year: i32,
    pub annual_growth: f64,
    /// Noise standard deviation as a fraction of the price level.
    pub noise_rel: f64,
}

impl Default for SampleSource {
    fn default() -> Self {
        Self {
            seed: 42,
            start_year: 2013,
            end_year: 2024,
            annual_growth: 0.035,
            noise_rel: 0.004,
        }
    }
}

impl SampleSource {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// Rupiah/kg level in the first sample year.
fn base_price(grade: QualityGrade) -> f64 {
    match grade {
        QualityGrade::Premium => 9_800.0,
        QualityGrade::Medium => 9_300.0,
        QualityGrade::LowQuality => 8_900.0,
    }
}

impl PriceSource for SampleSource {
    fn describe(&self) -> String {
        format!(
            "synthetic sample (seed {}, {}-{})",
            self.seed, self.start_year, self.end_year
        )
    }

    fn fetch(&self) -> Result<RawDataset, AppError> {
        if self.end_year < self.start_year {
            return Err(AppError::Validation("Sample end year precedes start year.".to_string()));
        }
        if self.start_year < 1900 {
            return Err(AppError::Validation("Sample years must be 1900 or later.".to_string()));
        }
        if !(self.noise_rel.is_finite() && self.noise_rel >= 0.0 && self.annual_growth.is_finite()) {
            return Err(AppError::Validation("Invalid sample noise/growth settings.".to_string()));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let normal = Normal::new(0.0, 1.0).map_err(|e| AppError::Numerical(format!("Noise distribution error: {e}")))?;

        let mut records = Vec::new();
        for grade in QualityGrade::ALL {
            for year in self.start_year..=self.end_year {
                let year_code = year - 1900;
                for month in 1..=12u32 {
                    let elapsed = (year - self.start_year) as f64 + (month as f64 - 1.0) / 12.0;
                    let level = base_price(grade) * (1.0 + self.annual_growth).powf(elapsed);
                    let season = SEASONAL_AMPLITUDE * (2.0 * PI * (month as f64 - 2.5) / 12.0).cos();
                    let noise = self.noise_rel * normal.sample(&mut rng);
                    let price = (level * (1.0 + season + noise)).round();

                    let key = format!("{}5000{year_code}{month}", grade.code());
                    records.push(RawRecord::new(key, RawValue::Number(price)));
                }
            }
        }

        let years = YearLookup::new(
            (self.start_year..=self.end_year)
                .map(|y| ((y - 1900).to_string(), y))
                .collect(),
        );
        // BPS lists the annual period as code 13; the lookup drops it.
        let months = MonthLookup::new((1..=13).map(|m| (m.to_string(), m)).collect());

        log::info!("generated {} synthetic record(s)", records.len());
        Ok(RawDataset { records, years, months })
    }
}
