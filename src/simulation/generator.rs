use chrono::Utc;

use crate::models::{AirQuality, Location, VitalsSample, ECG_SAMPLE_COUNT};

use super::random::{pick_index, uniform_u32, unit, RandomSource};

const FALL_PROBABILITY: f64 = 0.02;
const SOUND_ALERT_PROBABILITY: f64 = 0.05;
/// Full width of the GPS jitter window, in degrees.
const LOCATION_JITTER_DEG: f64 = 0.01;

/// Produces synthetic readings around a fixed reference location.
#[derive(Debug, Clone, Copy, Default)]
pub struct VitalsGenerator {
    reference: Location,
}

impl VitalsGenerator {
    /// Draws consumed by one call to [`VitalsGenerator::generate`].
    pub const DRAWS_PER_SAMPLE: usize = 12 + ECG_SAMPLE_COUNT;

    pub fn new(reference: Location) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> Location {
        self.reference
    }

    /// Draw order is fixed: heart rate, SpO2, systolic, diastolic, temperature,
    /// stress, air quality, fall, sound, ECG points, lat, lng, battery.
    pub fn generate(&self, rng: &mut dyn RandomSource) -> VitalsSample {
        let heart_rate = uniform_u32(rng, 60, 40);
        let sp_o2 = uniform_u32(rng, 90, 10);
        let systolic = uniform_u32(rng, 110, 30);
        let diastolic = uniform_u32(rng, 70, 20);
        let temperature = format!("{:.1}", 36.0 + unit(rng) * 2.0);
        let stress_level = uniform_u32(rng, 0, 100);
        let air_quality = AirQuality::ALL[pick_index(rng, AirQuality::ALL.len())];
        let fall_detected = unit(rng) < FALL_PROBABILITY;
        let sound_alert = unit(rng) < SOUND_ALERT_PROBABILITY;
        let ecg = (0..ECG_SAMPLE_COUNT)
            .map(|_| unit(rng) * 2.0 - 1.0)
            .collect();
        let location = Location {
            lat: self.reference.lat + (unit(rng) - 0.5) * LOCATION_JITTER_DEG,
            lng: self.reference.lng + (unit(rng) - 0.5) * LOCATION_JITTER_DEG,
        };
        let battery = uniform_u32(rng, 20, 80);

        VitalsSample {
            heart_rate,
            sp_o2,
            blood_pressure: format!("{systolic}/{diastolic}"),
            temperature,
            stress_level,
            air_quality,
            fall_detected,
            sound_alert,
            ecg,
            location,
            battery,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BloodPressure;
    use crate::simulation::random::testing::SequenceRandom;
    use crate::simulation::StdRandom;

    #[test]
    fn generated_samples_respect_ranges() {
        let generator = VitalsGenerator::default();
        let mut rng = StdRandom::seeded(2024);

        for _ in 0..500 {
            let sample = generator.generate(&mut rng);

            assert_eq!(sample.ecg.len(), ECG_SAMPLE_COUNT);
            assert!(sample.ecg.iter().all(|point| (-1.0..=1.0).contains(point)));

            let bp: BloodPressure = sample.blood_pressure.parse().unwrap();
            assert!((110..140).contains(&bp.systolic), "systolic {}", bp.systolic);
            assert!((70..90).contains(&bp.diastolic), "diastolic {}", bp.diastolic);

            assert!((20..100).contains(&sample.battery));
            assert!((60..100).contains(&sample.heart_rate));
            assert!((90..100).contains(&sample.sp_o2));
            assert!(sample.stress_level < 100);

            let temperature = sample.temperature_celsius().unwrap();
            assert!((36.0..=38.0).contains(&temperature));
            assert_eq!(sample.temperature.split('.').nth(1).map(str::len), Some(1));

            assert!((sample.location.lat - 40.7128).abs() <= 0.005 + 1e-9);
            assert!((sample.location.lng + 74.0060).abs() <= 0.005 + 1e-9);
        }
    }

    #[test]
    fn consumes_a_fixed_number_of_draws() {
        let mut values = vec![0.5; VitalsGenerator::DRAWS_PER_SAMPLE];
        values.push(0.0);
        let mut rng = SequenceRandom::new(values, 0.75);

        VitalsGenerator::default().generate(&mut rng);
        assert_eq!(rng.next_f64(), 0.0);
        assert_eq!(rng.next_f64(), 0.75);
    }

    #[test]
    fn low_draws_trigger_fall_and_sound_flags() {
        let sample = VitalsGenerator::default().generate(&mut SequenceRandom::constant(0.0));
        assert!(sample.fall_detected);
        assert!(sample.sound_alert);
        assert_eq!(sample.heart_rate, 60);
        assert_eq!(sample.blood_pressure, "110/70");
        assert_eq!(sample.temperature, "36.0");
        assert_eq!(sample.air_quality, AirQuality::Good);
        assert!(sample.ecg.iter().all(|point| *point == -1.0));

        let calm = VitalsGenerator::default().generate(&mut SequenceRandom::constant(0.5));
        assert!(!calm.fall_detected);
        assert!(!calm.sound_alert);
        assert_eq!(calm.air_quality, AirQuality::Moderate);
        assert_eq!(calm.location, Location::default());
    }

    #[test]
    fn jitters_around_custom_reference() {
        let reference = Location {
            lat: 51.5074,
            lng: -0.1278,
        };
        let sample = VitalsGenerator::new(reference).generate(&mut SequenceRandom::constant(0.0));
        assert!((sample.location.lat - (51.5074 - 0.005)).abs() < 1e-9);
        assert!((sample.location.lng - (-0.1278 - 0.005)).abs() < 1e-9);
    }
}
