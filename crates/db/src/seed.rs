//! Catalog seeding.
//!
//! The task catalog is fixed for a deployment; editing it at runtime is
//! out of scope. Seeding is a no-op once the table has any rows, and
//! insert-if-absent per name below that, so repeated startups never
//! duplicate entries.

use sqlx::PgPool;

use crate::models::task_type::CreateTaskType;
use crate::repositories::TaskTypeRepo;

/// Outcome of a seeding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    pub inserted: usize,
    pub skipped: usize,
    pub already_seeded: bool,
}

const TOILET_INSTRUCTIONS: &str = "1. Vacuum floor\n2. Clean toilet bowl with toilet cleaner\n3. Wipe sink, mirror & door handle\n4. Mop floor\n5. Empty trash bin\n6. Refill toilet paper if needed";

const SHOWER_INSTRUCTIONS: &str = "1. Scrub shower walls and floor\n2. Clean drain\n3. Wipe mirrors and sinks\n4. Mop floor\n5. Empty trash";

const FRIDGE_INSTRUCTIONS: &str =
    "Clean the fridge you use most. If that's in your room, you are 'Backup'.";

const FRIDGE_LOCATION: &str = "Look for the number on the fridge, as they are not in a particular order and they are subject to change in the future.";

/// The corridor's weekly task catalog.
pub const TASK_TYPE_DEFINITIONS: &[CreateTaskType] = &[
    CreateTaskType {
        name: "Toilet 1",
        category: "toilet",
        description: "Clean toilet 1 (the closest to the main entrance)",
        instructions: TOILET_INSTRUCTIONS,
        estimated_duration_minutes: Some(45),
        location: Some("Closest to main entrance, diagonally opposite kitchen"),
    },
    CreateTaskType {
        name: "Toilet 2",
        category: "toilet",
        description: "Clean toilet 2 (the one next to toilet 1 with the john deer tractor poster)",
        instructions: TOILET_INSTRUCTIONS,
        estimated_duration_minutes: Some(45),
        location: Some("Next to toilet 1, diagonally opposite kitchen"),
    },
    CreateTaskType {
        name: "Toilet 3",
        category: "toilet",
        description: "Clean toilet 3 (aka ladies toilet)",
        instructions: TOILET_INSTRUCTIONS,
        estimated_duration_minutes: Some(45),
        location: Some(
            "Close to the end of the hall on the right side, after the laundry room.",
        ),
    },
    CreateTaskType {
        name: "Toilet 4",
        category: "toilet",
        description: "Clean toilet 4 (male only toilet)",
        instructions: TOILET_INSTRUCTIONS,
        estimated_duration_minutes: Some(45),
        location: Some(
            "Right next to toilet 3, in the very end of the hall on the right side.",
        ),
    },
    CreateTaskType {
        name: "Shower 1",
        category: "shower",
        description: "Clean shower room 1",
        instructions: SHOWER_INSTRUCTIONS,
        estimated_duration_minutes: Some(60),
        location: Some(
            "Is the shower closest to the main entrance, diagonally opposite kitchen",
        ),
    },
    CreateTaskType {
        name: "Shower 2",
        category: "shower",
        description: "Clean shower room 2",
        instructions: SHOWER_INSTRUCTIONS,
        estimated_duration_minutes: Some(60),
        location: Some("Is the shower next to shower 1, diagonally opposite kitchen"),
    },
    CreateTaskType {
        name: "Shower 3",
        category: "shower",
        description: "Clean shower room 3",
        instructions: SHOWER_INSTRUCTIONS,
        estimated_duration_minutes: Some(60),
        location: Some("On the right wing of the corridor, in the very end of the hall"),
    },
    CreateTaskType {
        name: "Shower 4",
        category: "shower",
        description: "Clean shower room D",
        instructions: SHOWER_INSTRUCTIONS,
        estimated_duration_minutes: Some(60),
        location: Some("On the left wing of the corridor, in the very end of the hall"),
    },
    CreateTaskType {
        name: "Kitchen A",
        category: "kitchen",
        description: "Clean stove, oven & extractor hood",
        instructions: "Clean stove, oven & extractor hood. Wipe down surfaces.",
        estimated_duration_minutes: Some(50),
        location: Some("Main kitchen"),
    },
    CreateTaskType {
        name: "Kitchen E",
        category: "kitchen",
        description: "Clean exterior surfaces",
        instructions: "Clean floor, walls, table, outsides of cupboards/fridges, windows, couches (also behind couch). Deep-clean (behind) stove.",
        estimated_duration_minutes: Some(45),
        location: Some("Main kitchen"),
    },
    CreateTaskType {
        name: "Kitchen I",
        category: "kitchen",
        description: "Clean interior and dishes",
        instructions: "Clean insides of cupboards and microwave, sort dishes. Clean kitchen-block.",
        estimated_duration_minutes: Some(35),
        location: Some("Main kitchen"),
    },
    CreateTaskType {
        name: "Fridge 1",
        category: "fridge",
        description: "Clean communal fridge #1",
        instructions: FRIDGE_INSTRUCTIONS,
        estimated_duration_minutes: Some(40),
        location: Some(FRIDGE_LOCATION),
    },
    CreateTaskType {
        name: "Fridge 2",
        category: "fridge",
        description: "Clean communal fridge #2",
        instructions: FRIDGE_INSTRUCTIONS,
        estimated_duration_minutes: Some(40),
        location: Some(FRIDGE_LOCATION),
    },
    CreateTaskType {
        name: "Fridge 3",
        category: "fridge",
        description: "Clean communal fridge #3",
        instructions: FRIDGE_INSTRUCTIONS,
        estimated_duration_minutes: Some(40),
        location: Some(FRIDGE_LOCATION),
    },
    CreateTaskType {
        name: "Fridge 4",
        category: "fridge",
        description: "Clean communal fridge #4",
        instructions: FRIDGE_INSTRUCTIONS,
        estimated_duration_minutes: Some(40),
        location: Some(FRIDGE_LOCATION),
    },
    CreateTaskType {
        name: "Hall Cleaning",
        category: "hallway",
        description: "Vacuum and mop floor of the hall",
        instructions: "Vacuum and mop the floor of Main hall and Side hall. Make pictures of stuff we don't use, remove if nobody claims/no need.",
        estimated_duration_minutes: Some(40),
        location: Some("Entire Hall"),
    },
    CreateTaskType {
        name: "Wash Room",
        category: "laundry",
        description: "Clean laundry room",
        instructions: "Wash, hang and fold corridor wash. Deep-clean the machines and empty container.",
        estimated_duration_minutes: Some(40),
        location: Some("Laundry room"),
    },
    CreateTaskType {
        name: "Trash Paper, Glass & Plastic",
        category: "trash",
        description: "Empty paper/cardboard, glass and plastic bins",
        instructions: "Empty the paper/cardboard, glass and plastic bins to outside containers",
        estimated_duration_minutes: Some(25),
        location: Some("Kitchen"),
    },
    CreateTaskType {
        name: "Trash Kitchen",
        category: "trash",
        description: "Empty kitchen trash",
        instructions: "Empty the kitchen trash bin and clean the crates at the beginning of the hall",
        estimated_duration_minutes: Some(15),
        location: Some("Kitchen/Hall"),
    },
];

/// Seed the task catalog.
pub async fn seed_task_types(pool: &PgPool) -> Result<SeedOutcome, sqlx::Error> {
    if TaskTypeRepo::count(pool).await? > 0 {
        return Ok(SeedOutcome {
            inserted: 0,
            skipped: TASK_TYPE_DEFINITIONS.len(),
            already_seeded: true,
        });
    }

    let mut inserted = 0;
    for definition in TASK_TYPE_DEFINITIONS {
        if TaskTypeRepo::find_by_name(pool, definition.name).await?.is_some() {
            continue;
        }
        TaskTypeRepo::insert(pool, definition).await?;
        inserted += 1;
    }

    tracing::info!(inserted, "Task catalog seeded");

    Ok(SeedOutcome {
        inserted,
        skipped: TASK_TYPE_DEFINITIONS.len() - inserted,
        already_seeded: false,
    })
}
