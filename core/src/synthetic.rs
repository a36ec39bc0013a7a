//! Synthetic roster generation for demos and property tests.
//!
//! All generation is deterministic: same (seed, size) = same roster.

use crate::{
    error::ResilienceResult,
    name_generator::NameGenerator,
    rng::RosterRng,
    roster::{CoverageModel, CriticalityTier, RoleTier, StaffMember},
};

const SPECIALTIES: &[&str] = &["inpatient", "clinic", "procedures", "night_call", "icu"];

const CREDENTIALS: &[&str] = &["supervision", "sedation", "ultrasound", "peds"];

pub fn generate_roster(seed: u64, size: usize) -> ResilienceResult<CoverageModel> {
    let mut rng = RosterRng::new(seed);
    let staff = (0..size).map(|i| generate_member(&mut rng, i)).collect();
    CoverageModel::new(staff)
}

fn generate_member(rng: &mut RosterRng, index: usize) -> StaffMember {
    let roll = rng.next_f64();
    let role = if roll < 0.25 {
        RoleTier::Attending
    } else if roll < 0.60 {
        RoleTier::Senior
    } else {
        RoleTier::Junior
    };

    let (lo, hi) = match role {
        RoleTier::Attending => (12.0, 18.0),
        RoleTier::Senior    => (8.0, 14.0),
        RoleTier::Junior    => (5.0, 10.0),
    };
    // One decimal place keeps generated rosters readable in JSON dumps.
    let weight = (rng.range_f64(lo, hi) * 10.0).round() / 10.0;

    let criticality = match role {
        RoleTier::Attending if weight >= 15.0 => CriticalityTier::Critical,
        RoleTier::Attending                   => CriticalityTier::High,
        RoleTier::Senior if weight >= 12.0    => CriticalityTier::High,
        RoleTier::Senior                      => CriticalityTier::Medium,
        RoleTier::Junior if weight >= 8.0     => CriticalityTier::Medium,
        RoleTier::Junior                      => CriticalityTier::Low,
    };

    let specialty = *rng.pick(SPECIALTIES);
    let credentials: Vec<&str> = CREDENTIALS
        .iter()
        .copied()
        .filter(|_| rng.chance(if role == RoleTier::Junior { 0.1 } else { 0.3 }))
        .collect();

    let name = NameGenerator::generate_staff_name(rng, role);
    StaffMember::new(format!("staff-{index:03}"), name, role, specialty, weight, criticality)
        .with_credentials(credentials)
}
