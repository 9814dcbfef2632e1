//! Property tests for metric derivation

use fieldmap_core::units::{round2, ACRES_PER_HECTARE};
use fieldmap_core::{LatLng, ShapeKind};
use fieldmap_designer::metrics::derive_from_coords;
use proptest::prelude::*;

fn rectangle(lat: f64, lng: f64, dlat: f64, dlng: f64) -> Vec<LatLng> {
    vec![
        LatLng::new(lat, lng),
        LatLng::new(lat, lng + dlng),
        LatLng::new(lat + dlat, lng + dlng),
        LatLng::new(lat + dlat, lng),
    ]
}

proptest! {
    #[test]
    fn prop_acres_follow_hectares(
        lat in -60.0f64..60.0,
        lng in -170.0f64..170.0,
        dlat in 0.0005f64..0.05,
        dlng in 0.0005f64..0.05,
    ) {
        let m = derive_from_coords(ShapeKind::Polygon, &rectangle(lat, lng, dlat, dlng));
        prop_assert!(m.warnings.is_empty());
        prop_assert_eq!(round2(m.area_ha * ACRES_PER_HECTARE), round2(m.area_acres));
        prop_assert!(m.area_ha > 0.0);
    }

    #[test]
    fn prop_centroid_inside_rectangle(
        lat in -60.0f64..60.0,
        lng in -170.0f64..170.0,
        dlat in 0.0005f64..0.05,
        dlng in 0.0005f64..0.05,
    ) {
        let m = derive_from_coords(ShapeKind::Polygon, &rectangle(lat, lng, dlat, dlng));
        let c = m.centroid.unwrap();
        prop_assert!(c.lat > lat && c.lat < lat + dlat);
        prop_assert!(c.lng > lng && c.lng < lng + dlng);
    }

    #[test]
    fn prop_derivation_is_total(
        coords in prop::collection::vec((-90.0f64..90.0, -180.0f64..180.0), 0..8),
        polygon in any::<bool>(),
    ) {
        let coords: Vec<LatLng> = coords.into_iter().map(LatLng::from).collect();
        let kind = if polygon { ShapeKind::Polygon } else { ShapeKind::Line };
        let m = derive_from_coords(kind, &coords);
        prop_assert!(m.area_sq_meters.is_finite() && m.area_sq_meters >= 0.0);
        prop_assert!(m.length_km.is_finite() && m.length_km >= 0.0);
    }
}

#[test]
fn test_low_latitude_hectare() {
    // 100 m x 100 m just south of the equator
    let dlat = 100.0 / 110_574.0;
    let dlng = 100.0 / 111_319.49;
    let m = derive_from_coords(ShapeKind::Polygon, &rectangle(-1.0, -48.0, dlat, dlng));
    assert!((m.area_ha - 1.0).abs() < 0.01, "area_ha = {}", m.area_ha);
    assert!((m.area_acres - 2.471).abs() < 0.03);
}
