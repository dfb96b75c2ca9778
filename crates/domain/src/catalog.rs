use crate::{ExerciseDef, Weight, WorkoutPlan};

/// Plans offered when no plans have been stored.
pub static PLANS: std::sync::LazyLock<Vec<WorkoutPlan>> =
    std::sync::LazyLock::new(|| [PLAN_A, PLAN_B].iter().map(WorkoutPlan::from).collect());

#[must_use]
pub fn default_plans() -> Vec<WorkoutPlan> {
    PLANS.clone()
}

/// The exercises of all built-in plans.
#[must_use]
pub fn default_exercises() -> Vec<ExerciseDef> {
    PLANS
        .iter()
        .flat_map(|plan| plan.exercises.iter().cloned())
        .collect()
}

struct CatalogPlan {
    id: &'static str,
    name: &'static str,
    exercises: &'static [CatalogExercise],
}

impl From<&CatalogPlan> for WorkoutPlan {
    fn from(value: &CatalogPlan) -> Self {
        WorkoutPlan {
            id: value.id.into(),
            name: value.name.to_string(),
            exercises: value.exercises.iter().map(ExerciseDef::from).collect(),
            hidden: false,
        }
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
struct CatalogExercise {
    id: &'static str,
    name: &'static str,
    sets: u32,
    reps: &'static str,
    notes: &'static str,
    is_duration: bool,
    superset_id: Option<&'static str>,
    default_weight: Option<f32>,
    tags: &'static [&'static str],
}

impl CatalogExercise {
    const fn default() -> Self {
        Self {
            id: "",
            name: "",
            sets: 3,
            reps: "10",
            notes: "",
            is_duration: false,
            superset_id: None,
            default_weight: None,
            tags: &[],
        }
    }
}

impl From<&CatalogExercise> for ExerciseDef {
    fn from(value: &CatalogExercise) -> Self {
        ExerciseDef {
            id: value.id.into(),
            name: value.name.to_string(),
            sets: value.sets,
            reps: value.reps.to_string(),
            notes: value.notes.to_string(),
            is_duration: value.is_duration,
            is_circuit: false,
            superset_id: value.superset_id.map(Into::into),
            default_weight: value.default_weight.and_then(|w| Weight::new(w).ok()),
            tags: value.tags.iter().map(ToString::to_string).collect(),
        }
    }
}

const WARMUP: CatalogExercise = CatalogExercise {
    name: "Aerobic activation and mobility",
    sets: 1,
    reps: "10' + 10'",
    is_duration: true,
    tags: &["Cardio"],
    ..CatalogExercise::default()
};

const STRETCHING: CatalogExercise = CatalogExercise {
    name: "General stretching",
    sets: 1,
    reps: "10'",
    is_duration: true,
    tags: &["Cardio"],
    ..CatalogExercise::default()
};

const CRISS_CROSS: CatalogExercise = CatalogExercise {
    name: "Criss-cross",
    reps: "20",
    notes: "Circuit exercise 1",
    tags: &["Abs"],
    ..CatalogExercise::default()
};

const MOUNTAIN_CLIMBER: CatalogExercise = CatalogExercise {
    name: "Mountain climber",
    reps: "20 m.",
    notes: "Circuit exercise 2",
    tags: &["Abs", "Cardio"],
    ..CatalogExercise::default()
};

const CRUNCH: CatalogExercise = CatalogExercise {
    name: "Crunch with legs at 90°",
    reps: "12",
    notes: "Circuit exercise 3",
    tags: &["Abs"],
    ..CatalogExercise::default()
};

const PLANK: CatalogExercise = CatalogExercise {
    name: "Forearm plank",
    reps: "30\"",
    notes: "Circuit exercise 4. Rest 1' at the end.",
    is_duration: true,
    tags: &["Abs"],
    ..CatalogExercise::default()
};

const PLAN_A: CatalogPlan = CatalogPlan {
    id: "A",
    name: "Plan A",
    exercises: &[
        CatalogExercise {
            id: "a_warmup",
            ..WARMUP
        },
        CatalogExercise {
            id: "a_abs_1",
            superset_id: Some("a_abs_circuit"),
            ..CRISS_CROSS
        },
        CatalogExercise {
            id: "a_abs_2",
            superset_id: Some("a_abs_circuit"),
            ..MOUNTAIN_CLIMBER
        },
        CatalogExercise {
            id: "a_abs_3",
            superset_id: Some("a_abs_circuit"),
            ..CRUNCH
        },
        CatalogExercise {
            id: "a_abs_4",
            superset_id: Some("a_abs_circuit"),
            ..PLANK
        },
        CatalogExercise {
            id: "a_rdl",
            name: "Barbell Romanian deadlift",
            tags: &["Hamstrings", "Glutes", "Back"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "a_lunges",
            name: "Stationary lunges",
            reps: "10 per side",
            notes: "With 6+6 kg dumbbells. Rest 1'",
            default_weight: Some(6.0),
            tags: &["Quads", "Glutes"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "a_squat",
            name: "Smith machine squat",
            notes: "Load: 10+10 kg",
            default_weight: Some(20.0),
            tags: &["Quads", "Glutes"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "a_tbar",
            name: "T-bar row",
            tags: &["Back"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "a_lat",
            name: "Lat pulldown",
            tags: &["Back"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "a_pushdown",
            name: "Pushdown",
            reps: "12",
            tags: &["Triceps"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "a_french",
            name: "Overhead cable French press",
            notes: "Load: 7.5 kg",
            default_weight: Some(7.5),
            tags: &["Triceps"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "a_calf",
            name: "Leg press calf raise",
            reps: "12/15",
            notes: "Load: 70 kg",
            default_weight: Some(70.0),
            tags: &["Calves"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "a_stretch",
            ..STRETCHING
        },
    ],
};

const PLAN_B: CatalogPlan = CatalogPlan {
    id: "B",
    name: "Plan B",
    exercises: &[
        CatalogExercise {
            id: "b_warmup",
            ..WARMUP
        },
        CatalogExercise {
            id: "b_abs_1",
            superset_id: Some("b_abs_circuit"),
            ..CRISS_CROSS
        },
        CatalogExercise {
            id: "b_abs_2",
            superset_id: Some("b_abs_circuit"),
            ..MOUNTAIN_CLIMBER
        },
        CatalogExercise {
            id: "b_abs_3",
            superset_id: Some("b_abs_circuit"),
            ..CRUNCH
        },
        CatalogExercise {
            id: "b_abs_4",
            superset_id: Some("b_abs_circuit"),
            ..PLANK
        },
        CatalogExercise {
            id: "b_bench",
            name: "Bench press",
            sets: 4,
            reps: "8",
            tags: &["Chest", "Triceps"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "b_chest",
            name: "Chest press",
            reps: "12",
            notes: "Seat 6.\nLoad: 25 kg",
            default_weight: Some(25.0),
            tags: &["Chest"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "b_croci",
            name: "Incline dumbbell fly",
            notes: "Bench inclined at 30°",
            tags: &["Chest"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "b_bicep_low",
            name: "Low cable curl",
            sets: 4,
            tags: &["Biceps"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "b_bicep_45",
            name: "Incline dumbbell curl",
            tags: &["Biceps"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "b_military",
            name: "Seated dumbbell shoulder press",
            sets: 4,
            reps: "8",
            tags: &["Shoulders"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "b_lat_raise",
            name: "Single-arm cable lateral raise",
            reps: "10 per arm",
            notes: "Torso leaning",
            tags: &["Shoulders"],
            ..CatalogExercise::default()
        },
        CatalogExercise {
            id: "b_stretch",
            ..STRETCHING
        },
    ],
};
