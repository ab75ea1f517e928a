use crate::domain::Track;

/// Built-in tracks used to seed the demo playlist.
pub fn sample_tracks() -> Vec<Track> {
    vec![
        Track::new("Y6FWFKXu1FY", "Aap Ki Kashish")
            .with_artists(["Himesh Reshammiya", "Krishna", "Ahir"])
            .with_album("Aashiq Banaya Aapne"),
    ]
}
