//! Record draws, risk base and calibrated labelling.

use rand::distributions::{Bernoulli, Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Normal, Poisson, Triangular};

use super::{SynthConfig, SynthError};
use crate::models::{
    IncomeTier, PatientRecord, SpecialtyTier, MAX_CONSECUTIVE_MISSED, MAX_PATIENT_AGE,
    MIN_PATIENT_AGE,
};
use crate::pipeline::logistic::{logit, sigmoid};

const INCOME_TIER_WEIGHTS: [f64; 3] = [0.40, 0.35, 0.25];
const HIGH_RISK_SPECIALTY_SHARE: f64 = 0.30;

const CALIBRATION_ITERATIONS: usize = 100;
const CALIBRATION_TOLERANCE: f64 = 1e-10;

/// One generated observation: the nine features plus the label.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub record: PatientRecord,
    pub no_show: bool,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub rows: Vec<DatasetRow>,
    /// Shift added to every risk base so the mean probability hits the target.
    pub intercept_shift: f64,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Share of rows labelled as a no-show.
    pub fn positive_rate(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let positives = self.rows.iter().filter(|r| r.no_show).count();
        positives as f64 / self.rows.len() as f64
    }
}

struct Distributions {
    age: Normal<f64>,
    income_tier: WeightedIndex<f64>,
    affinity: Normal<f64>,
    high_risk_specialty: Bernoulli,
    missed: Poisson<f64>,
    absenteeism: Beta<f64>,
    days_since_last: Triangular<f64>,
    days_since_first: Triangular<f64>,
    noise: Normal<f64>,
}

fn distribution_error(err: impl std::fmt::Display) -> SynthError {
    SynthError::Distribution(err.to_string())
}

impl Distributions {
    fn new() -> Result<Self, SynthError> {
        Ok(Self {
            age: Normal::new(65.0, 15.0).map_err(distribution_error)?,
            income_tier: WeightedIndex::new(INCOME_TIER_WEIGHTS).map_err(distribution_error)?,
            affinity: Normal::new(60.0, 20.0).map_err(distribution_error)?,
            high_risk_specialty: Bernoulli::new(HIGH_RISK_SPECIALTY_SHARE)
                .map_err(distribution_error)?,
            missed: Poisson::new(0.5).map_err(distribution_error)?,
            absenteeism: Beta::new(0.9, 5.0).map_err(distribution_error)?,
            // rand_distr takes (min, max, mode)
            days_since_last: Triangular::new(7.0, 30.0, 12.0).map_err(distribution_error)?,
            days_since_first: Triangular::new(30.0, 120.0, 65.0).map_err(distribution_error)?,
            noise: Normal::new(0.0, 0.3).map_err(distribution_error)?,
        })
    }
}

fn caregiver_probability(age: u8) -> f64 {
    if age > 75 {
        0.6
    } else if age > 65 {
        0.4
    } else {
        0.2
    }
}

fn pick<'a>(rng: &mut StdRng, choices: &'a [&'a str]) -> &'a str {
    choices[rng.gen_range(0..choices.len())]
}

fn draw_record(rng: &mut StdRng, dist: &Distributions) -> Result<PatientRecord, SynthError> {
    // `as` truncates toward zero and saturates, then the clamp applies.
    let age = (dist.age.sample(rng) as i64).clamp(MIN_PATIENT_AGE as i64, MAX_PATIENT_AGE as i64)
        as u8;

    let tier = IncomeTier::ALL[dist.income_tier.sample(rng)];
    let neighborhood = pick(rng, tier.neighborhoods());

    let tier_offset = match tier {
        IncomeTier::Low => -20.0,
        IncomeTier::Middle => 0.0,
        IncomeTier::High => 15.0,
    };
    let age_penalty = (age as f64 - 60.0).max(0.0) * 0.6;
    let affinity =
        (dist.affinity.sample(rng) - age_penalty + tier_offset).clamp(0.0, 100.0) as u8;

    let has_caregiver = Bernoulli::new(caregiver_probability(age))
        .map_err(distribution_error)?
        .sample(rng);

    let specialty_tier = if dist.high_risk_specialty.sample(rng) {
        SpecialtyTier::HighRisk
    } else {
        SpecialtyTier::Standard
    };
    let specialty = pick(rng, specialty_tier.specialties());

    let missed = (dist.missed.sample(rng) as u64).min(MAX_CONSECUTIVE_MISSED as u64) as u8;

    Ok(PatientRecord {
        patient_age: age,
        patient_neighborhood: neighborhood.to_string(),
        digital_affinity_score: affinity,
        has_caregiver,
        appointment_specialty: specialty.to_string(),
        consecutive_missed_appointments: missed,
        historical_absenteeism_rate: dist.absenteeism.sample(rng),
        days_since_last_appointment: dist.days_since_last.sample(rng) as u32,
        days_since_first_appointment: dist.days_since_first.sample(rng) as u32,
    })
}

/// Deterministic part of the linear risk base for one record.
pub fn risk_base(record: &PatientRecord) -> f64 {
    let mut risk = 0.0;
    risk += (record.patient_age as f64 - 60.0).max(0.0) * 0.05;
    risk += (record.digital_affinity_score as f64 - 50.0) * -0.02;
    if !record.has_caregiver {
        risk += 0.5;
    }
    match IncomeTier::of_neighborhood(&record.patient_neighborhood) {
        Some(IncomeTier::Low) => risk += 0.3,
        Some(IncomeTier::High) => risk -= 0.3,
        _ => {}
    }
    if SpecialtyTier::of_specialty(&record.appointment_specialty) == Some(SpecialtyTier::HighRisk)
    {
        risk += 0.25;
    }
    risk += record.consecutive_missed_appointments as f64 * 0.2;
    risk += record.historical_absenteeism_rate * 1.5;
    risk += (record.days_since_last_appointment as f64 - 14.0).max(0.0) * 0.02;
    risk += (70.0 - record.days_since_first_appointment as f64).max(0.0) * 0.01;
    risk
}

fn mean_probability(bases: &[f64], shift: f64) -> f64 {
    bases.iter().map(|b| sigmoid(b + shift)).sum::<f64>() / bases.len() as f64
}

/// Intercept shift that makes the mean of `sigmoid(base + shift)` equal
/// `target_rate`.
///
/// Starts from the logit difference between the target and the current mean
/// and brackets the root around it; the mean is monotone in the shift.
pub fn calibrate_intercept(bases: &[f64], target_rate: f64) -> f64 {
    if bases.is_empty() {
        return 0.0;
    }

    let current = mean_probability(bases, 0.0).clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON);
    let guess = logit(target_rate) - logit(current);

    let mut width = 1.0;
    let mut low = guess - width;
    let mut high = guess + width;
    while mean_probability(bases, low) > target_rate && width < 1e6 {
        width *= 2.0;
        low = guess - width;
    }
    while mean_probability(bases, high) < target_rate && width < 1e6 {
        width *= 2.0;
        high = guess + width;
    }

    for _ in 0..CALIBRATION_ITERATIONS {
        let mid = 0.5 * (low + high);
        if mean_probability(bases, mid) < target_rate {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < CALIBRATION_TOLERANCE {
            break;
        }
    }
    0.5 * (low + high)
}

/// Generate a labelled dataset.
///
/// All feature draws happen first, followed by one uniform draw per row for
/// the label, so a given seed always yields the same dataset.
pub fn generate(config: &SynthConfig) -> Result<Dataset, SynthError> {
    config.validate()?;

    let dist = Distributions::new()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let records = (0..config.rows)
        .map(|_| draw_record(&mut rng, &dist))
        .collect::<Result<Vec<_>, _>>()?;

    let bases: Vec<f64> = records
        .iter()
        .map(|record| risk_base(record) + dist.noise.sample(&mut rng))
        .collect();

    let intercept_shift = calibrate_intercept(&bases, config.target_rate);

    let rows = records
        .into_iter()
        .zip(&bases)
        .map(|(record, base)| {
            let probability = sigmoid(base + intercept_shift);
            let no_show = probability > rng.gen::<f64>();
            DatasetRow { record, no_show }
        })
        .collect();

    let dataset = Dataset {
        rows,
        intercept_shift,
    };
    tracing::info!(
        rows = dataset.len(),
        seed = config.seed,
        intercept_shift,
        positive_rate = dataset.positive_rate(),
        "Synthetic dataset generated"
    );
    Ok(dataset)
}
