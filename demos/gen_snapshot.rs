//! Generate a snapshot for validation testing

fn main() {
    let json = r#"{
        "timeOnTask": 95,
        "plannedTime": 120,
        "focusRating": 4,
        "recoveryTimes": [15, 40],
        "clarityRating": 4,
        "indecisionMarkers": 1,
        "regulationRating": 3,
        "moodVariability": 1.2,
        "journalEntries": 2,
        "practiceMinutes": 45,
        "importantTasksCompleted": 1,
        "calendarDensity": 78,
        "eveningEvents": 3
    }"#;

    match ei_core::signals_to_snapshot(json, "demo-user") {
        Ok(snapshot) => print!("{snapshot}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
