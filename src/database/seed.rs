use indexmap::IndexMap;
use thiserror::Error;

use crate::models::Activity;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("activity name must not be empty")]
    EmptyName,
    #[error("activity {0:?} is defined more than once")]
    DuplicateActivity(String),
    #[error("activity {0:?} must allow at least one participant")]
    ZeroCapacity(String),
    #[error("activity {activity:?} lists {email} more than once")]
    DuplicateParticipant { activity: String, email: String },
}

pub struct SeedActivity {
    pub name: &'static str,
    pub description: &'static str,
    pub schedule: &'static str,
    pub max_participants: u32,
    pub participants: &'static [&'static str],
}

const SEED_ACTIVITIES: &[SeedActivity] = &[
    SeedActivity {
        name: "Chess Club",
        description: "Learn strategies and compete in chess tournaments",
        schedule: "Fridays, 3:30 PM - 5:00 PM",
        max_participants: 12,
        participants: &["michael@mergington.edu", "daniel@mergington.edu"],
    },
    SeedActivity {
        name: "Programming Class",
        description: "Learn programming fundamentals and build software projects",
        schedule: "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
        max_participants: 20,
        participants: &["emma@mergington.edu", "sophia@mergington.edu"],
    },
    SeedActivity {
        name: "Gym Class",
        description: "Physical education and sports activities",
        schedule: "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
        max_participants: 30,
        participants: &["john@mergington.edu", "olivia@mergington.edu"],
    },
    SeedActivity {
        name: "Basketball",
        description: "Practice drills and play in the inter-school league",
        schedule: "Wednesdays, 4:00 PM - 5:30 PM",
        max_participants: 15,
        participants: &["james@mergington.edu"],
    },
    SeedActivity {
        name: "Tennis Club",
        description: "Improve your technique and play friendly matches",
        schedule: "Tuesdays and Saturdays, 10:00 AM - 11:30 AM",
        max_participants: 10,
        participants: &["lucas@mergington.edu"],
    },
    SeedActivity {
        name: "Art Studio",
        description: "Explore painting, drawing and sculpture",
        schedule: "Mondays, 3:30 PM - 5:00 PM",
        max_participants: 18,
        participants: &["ava@mergington.edu"],
    },
    SeedActivity {
        name: "Drama Club",
        description: "Rehearse and perform in the school plays",
        schedule: "Thursdays, 4:00 PM - 6:00 PM",
        max_participants: 25,
        participants: &["mia@mergington.edu", "noah@mergington.edu"],
    },
    SeedActivity {
        name: "Science Club",
        description: "Hands-on experiments and science fair projects",
        schedule: "Wednesdays, 3:30 PM - 5:00 PM",
        max_participants: 20,
        participants: &["liam@mergington.edu"],
    },
    SeedActivity {
        name: "Debate Team",
        description: "Build argumentation skills and compete in debate tournaments",
        schedule: "Fridays, 4:00 PM - 5:30 PM",
        max_participants: 16,
        participants: &["isabella@mergington.edu"],
    },
];

/// The registry every process starts from.
pub fn seed_activities() -> Result<IndexMap<String, Activity>, SeedError> {
    build_activities(SEED_ACTIVITIES)
}

/// Validates seed entries and builds the registry map, keeping entry order.
pub fn build_activities(entries: &[SeedActivity]) -> Result<IndexMap<String, Activity>, SeedError> {
    let mut activities = IndexMap::with_capacity(entries.len());

    for entry in entries {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(SeedError::EmptyName);
        }
        if activities.contains_key(entry.name) {
            return Err(SeedError::DuplicateActivity(entry.name.to_string()));
        }
        if entry.max_participants == 0 {
            return Err(SeedError::ZeroCapacity(entry.name.to_string()));
        }

        let mut participants: Vec<String> = Vec::with_capacity(entry.participants.len());
        for email in entry.participants {
            if participants.iter().any(|p| p == email) {
                return Err(SeedError::DuplicateParticipant {
                    activity: entry.name.to_string(),
                    email: email.to_string(),
                });
            }
            participants.push(email.to_string());
        }

        activities.insert(
            entry.name.to_string(),
            Activity {
                description: entry.description.to_string(),
                schedule: entry.schedule.to_string(),
                max_participants: entry.max_participants,
                participants,
            },
        );
    }

    Ok(activities)
}
