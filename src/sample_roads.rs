// Sample roads used by the sensor feed until real hardware is wired in.

use crate::shared_data::RoadMetrics;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct SampleRoad {
    pub id: &'static str,
    pub name: &'static str,
    pub location: &'static str,
    pub capacity: i64,
    pub base_vehicles: i64,
    pub base_pollution: f64,
}

pub fn sample_roads() -> Vec<SampleRoad> {
    vec![
        SampleRoad {
            id: "nasr",
            name: "Nasr Main Road",
            location: "Cairo - Nasr City",
            capacity: 100,
            base_vehicles: 85,
            base_pollution: 78.0,
        },
        SampleRoad {
            id: "army",
            name: "Army Road",
            location: "Cairo - Abbassia",
            capacity: 100,
            base_vehicles: 45,
            base_pollution: 42.0,
        },
        SampleRoad {
            id: "ring",
            name: "Ring Road",
            location: "Cairo - Fifth Settlement",
            capacity: 150,
            base_vehicles: 120,
            base_pollution: 85.0,
        },
        SampleRoad {
            id: "salah-salem",
            name: "Salah Salem Road",
            location: "Cairo - Heliopolis",
            capacity: 120,
            base_vehicles: 35,
            base_pollution: 35.0,
        },
    ]
}

// Baseline readings for every sample road at `timestamp`.
pub fn sample_readings(timestamp: u64) -> Vec<RoadMetrics> {
    sample_roads()
        .iter()
        .map(|road| {
            RoadMetrics::new(
                road.id,
                timestamp,
                road.base_vehicles,
                road.capacity,
                road.base_pollution,
            )
        })
        .collect()
}

/// Baseline readings with random drift, kept inside valid ranges.
pub fn jittered_readings<R: Rng>(rng: &mut R, timestamp: u64, max_drift: i64) -> Vec<RoadMetrics> {
    sample_roads()
        .iter()
        .map(|road| {
            let vehicle_drift = rng.random_range(-max_drift..=max_drift);
            let pollution_drift = rng.random_range(-max_drift..=max_drift) as f64;
            RoadMetrics::new(
                road.id,
                timestamp,
                (road.base_vehicles + vehicle_drift).max(0),
                road.capacity,
                (road.base_pollution + pollution_drift).clamp(0.0, 100.0),
            )
        })
        .collect()
}
