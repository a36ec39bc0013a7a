//! Deterministic staff name generation from curated lists.
//!
//! Same RNG seed = same names.

use crate::{rng::RosterRng, roster::RoleTier};

pub struct NameGenerator;

impl NameGenerator {
    /// Attendings are titled; trainees are listed by plain name.
    pub fn generate_staff_name(rng: &mut RosterRng, role: RoleTier) -> String {
        let first = Self::generate_first_name(rng);
        let last = Self::generate_last_name(rng);
        match role {
            RoleTier::Attending => format!("Dr. {first} {last}"),
            RoleTier::Senior | RoleTier::Junior => format!("{first} {last}"),
        }
    }

    pub fn generate_first_name(rng: &mut RosterRng) -> &'static str {
        *rng.pick(Self::first_names())
    }

    pub fn generate_last_name(rng: &mut RosterRng) -> &'static str {
        *rng.pick(Self::last_names())
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Amara", "Benedikt", "Chioma", "Dmitri", "Eleanor", "Farid", "Gretchen",
            "Hiroshi", "Ingrid", "Jamal", "Keiko", "Lorenzo", "Marisol", "Nikhil",
            "Odette", "Pavel", "Quinn", "Rosalind", "Santiago", "Tamsin", "Umar",
            "Valentina", "Wendell", "Ximena", "Yusuf", "Zofia", "Anders", "Beatriz",
            "Cormac", "Delphine", "Emeka", "Freya", "Gideon", "Hana", "Ivo", "Jolene",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Abernathy", "Bjornstad", "Castellanos", "Dubois", "Eze", "Fitzgerald",
            "Grunwald", "Hashemi", "Iwasaki", "Jovanovic", "Kowalczyk", "Lindqvist",
            "Mbeki", "Nakamura", "Okonkwo", "Petrakis", "Quintero", "Ramaswamy",
            "Szabo", "Thorne", "Ueda", "Vasquez", "Whitfield", "Yilmaz", "Zielinski",
            "Achterberg", "Brennan", "Chaudhry", "Delacroix", "Espinoza",
        ]
    }
}
