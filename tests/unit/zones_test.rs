//! Unit tests for zone classification.

use trainspec::metrics::zones::{
    classify, classify_pace, PowerZones, SampleSeries, TimedSample, Zone, ZoneDistribution,
};

fn assert_sums_to_hundred(dist: &ZoneDistribution) {
    assert!((dist.total() - 100.0).abs() <= 0.2, "total was {}", dist.total());
}

#[test]
fn test_constant_200w_at_ftp_250_is_tempo() {
    let samples = SampleSeries::Values(vec![200.0; 1800]);
    let dist = classify(&samples, Some(250.0));

    assert_eq!(dist.z3, 100.0);
    for zone in [Zone::Z1, Zone::Z2, Zone::Z4, Zone::Z5, Zone::Z6, Zone::Z7] {
        assert_eq!(dist.get(zone), 0.0);
    }
}

#[test]
fn test_mixed_ride_sums_to_hundred() {
    // 10 min Z2, 3 x (4 min Z5, 3 min Z1), then a 7 s sprint
    let mut values = vec![170.0; 600];
    for _ in 0..3 {
        values.extend(vec![290.0; 240]);
        values.extend(vec![120.0; 180]);
    }
    values.extend(vec![420.0; 7]);

    let dist = classify(&SampleSeries::Values(values), Some(250.0));
    assert_sums_to_hundred(&dist);
    assert!(dist.z2 > dist.z1);
    assert!(dist.z7 > 0.0);
    assert_eq!(dist.dominant(), Some(Zone::Z5));
}

#[test]
fn test_uneven_buckets_still_sum_exactly() {
    let samples = SampleSeries::Values(vec![100.0, 200.0, 200.0, 300.0, 300.0, 300.0, 400.0]);
    let dist = classify(&samples, Some(250.0));
    assert_eq!(dist.total(), 100.0);
}

#[test]
fn test_empty_series_is_all_zero() {
    let dist = classify(&SampleSeries::Timed(vec![]), Some(250.0));
    assert_eq!(dist, ZoneDistribution::default());
}

#[test]
fn test_timed_and_bare_series_agree() {
    let bare = SampleSeries::Values(vec![150.0, 260.0, 260.0]);
    let timed = SampleSeries::Timed(vec![
        TimedSample { t: Some(10.0), v: 150.0 },
        TimedSample { t: Some(11.0), v: 260.0 },
        TimedSample { t: None, v: 260.0 },
    ]);
    assert_eq!(classify(&bare, Some(250.0)), classify(&timed, Some(250.0)));
}

#[test]
fn test_nan_samples_ignored() {
    let samples = SampleSeries::Values(vec![200.0, f64::NAN]);
    assert_eq!(classify(&samples, Some(250.0)).z3, 100.0);
}

#[test]
fn test_threshold_pace_zones() {
    // Threshold 4:00/km. 5:00/km is 80% (Z3), 3:45/km is ~107% (Z5).
    let samples = SampleSeries::Values(vec![300.0, 300.0, 300.0, 225.0]);
    let dist = classify_pace(&samples, Some(240.0));
    assert_eq!(dist.z3, 75.0);
    assert_eq!(dist.z5, 25.0);
}

#[test]
fn test_power_zones_from_ftp_200() {
    let zones = PowerZones::from_ftp(200.0);

    // Z1: below 55% = 0-109W, Z2 starts at 110W
    let z1 = zones.band(Zone::Z1).unwrap();
    assert_eq!(z1.min_watts, 0);
    assert_eq!(z1.max_watts, Some(109));
    assert_eq!(zones.band(Zone::Z2).unwrap().min_watts, 110);

    // Z4: 91-105% = 182-210W
    let z4 = zones.band(Zone::Z4).unwrap();
    assert_eq!(z4.min_watts, 182);
    assert_eq!(z4.max_watts, Some(210));

    // Z7: >150% = 302W+
    let z7 = zones.band(Zone::Z7).unwrap();
    assert_eq!(z7.min_watts, 302);
    assert_eq!(z7.max_watts, None);
}

#[test]
fn test_power_zone_lookup_matches_classifier() {
    let zones = PowerZones::from_ftp(200.0);
    for watts in [0.0, 110.0, 111.0, 180.0, 210.0, 240.0, 300.0, 301.0, 900.0] {
        let dist = classify(&SampleSeries::Values(vec![watts]), Some(200.0));
        assert_eq!(dist.get(zones.zone_for(watts)), 100.0, "watts {}", watts);
    }
}

#[test]
fn test_samples_on_55_percent_land_in_endurance() {
    let samples = SampleSeries::Values(vec![137.5; 60]);
    let dist = classify(&samples, Some(250.0));
    assert_eq!(dist.z2, 100.0);
    assert_eq!(dist.z1, 0.0);
    assert_eq!(PowerZones::from_ftp(250.0).zone_for(137.5), Zone::Z2);
}

#[test]
fn test_zero_ftp_uses_floor() {
    let zones = PowerZones::from_ftp(0.0);
    assert_eq!(zones.ftp, 1.0);
    assert_eq!(zones.zone_for(100.0), Zone::Z7);
}

#[test]
fn test_distribution_serializes_with_zone_keys() {
    let dist = classify(&SampleSeries::Values(vec![200.0]), Some(250.0));
    let json = serde_json::to_value(dist).unwrap();
    assert_eq!(json["Z3"], 100.0);
    assert_eq!(json["Z1"], 0.0);
}
